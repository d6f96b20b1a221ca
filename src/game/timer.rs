use std::time::{Duration, Instant};

/// Active time of one side. Paused intervals are excluded and the value is frozen while
/// paused or after `finish`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SideTimer {
    start: Option<Instant>,
    paused_total: Duration,
    pause_start: Option<Instant>,
    end: Option<Instant>,
}

impl SideTimer {
    pub fn started(now: Instant) -> Self {
        SideTimer {
            start: Some(now),
            ..Self::default()
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.start.is_none() {
            *self = Self::started(now);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_start.is_some()
    }

    pub fn pause(&mut self, now: Instant) {
        if self.start.is_some() && self.end.is_none() && self.pause_start.is_none() {
            self.pause_start = Some(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let Some(paused_at) = self.pause_start.take() {
            self.paused_total += now.saturating_duration_since(paused_at);
        }
    }

    /// Freezes the timer. An open pause is closed first so it stays excluded.
    pub fn finish(&mut self, now: Instant) {
        if self.start.is_none() || self.end.is_some() {
            return;
        }
        self.resume(now);
        self.end = Some(now);
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        let Some(start) = self.start else {
            return Duration::ZERO;
        };
        let until = self.end.or(self.pause_start).unwrap_or(now);
        until
            .saturating_duration_since(start)
            .saturating_sub(self.paused_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn idle_timer_reads_zero() {
        let t0 = Instant::now();
        let mut timer = SideTimer::default();
        assert_eq!(timer.elapsed(t0 + ms(500)), Duration::ZERO);
        timer.pause(t0 + ms(600));
        assert!(!timer.is_paused());
        timer.finish(t0 + ms(700));
        timer.start(t0 + ms(1_000));
        assert_eq!(timer.elapsed(t0 + ms(1_500)), ms(500));
    }

    #[test]
    fn elapsed_is_monotonic_while_running() {
        let t0 = Instant::now();
        let timer = SideTimer::started(t0);
        let mut last = Duration::ZERO;
        for step in 0..20 {
            let value = timer.elapsed(t0 + ms(step * 37));
            assert!(value >= last);
            last = value;
        }
        assert_eq!(last, ms(19 * 37));
    }

    #[test]
    fn paused_interval_is_excluded_and_frozen() {
        let t0 = Instant::now();
        let mut timer = SideTimer::started(t0);
        timer.pause(t0 + ms(1_000));
        assert!(timer.is_paused());
        assert_eq!(timer.elapsed(t0 + ms(1_500)), ms(1_000));
        assert_eq!(timer.elapsed(t0 + ms(2_500)), ms(1_000));

        timer.resume(t0 + ms(3_000));
        assert!(!timer.is_paused());
        assert_eq!(timer.elapsed(t0 + ms(3_000)), ms(1_000));
        assert_eq!(timer.elapsed(t0 + ms(3_250)), ms(1_250));
    }

    #[test]
    fn pausing_twice_keeps_the_first_instant() {
        let t0 = Instant::now();
        let mut timer = SideTimer::started(t0);
        timer.pause(t0 + ms(100));
        timer.pause(t0 + ms(400));
        timer.resume(t0 + ms(600));
        assert_eq!(timer.elapsed(t0 + ms(600)), ms(100));
    }

    #[test]
    fn finish_freezes_and_closes_an_open_pause() {
        let t0 = Instant::now();
        let mut timer = SideTimer::started(t0);
        timer.pause(t0 + ms(2_000));
        timer.finish(t0 + ms(5_000));
        assert!(!timer.is_paused());
        assert_eq!(timer.elapsed(t0 + ms(9_000)), ms(2_000));

        timer.finish(t0 + ms(10_000));
        timer.pause(t0 + ms(11_000));
        assert_eq!(timer.elapsed(t0 + ms(12_000)), ms(2_000));
    }

    #[test]
    fn start_only_takes_effect_once() {
        let t0 = Instant::now();
        let mut timer = SideTimer::default();
        timer.start(t0 + ms(100));
        timer.start(t0 + ms(900));
        assert_eq!(timer.elapsed(t0 + ms(1_100)), ms(1_000));
    }
}
