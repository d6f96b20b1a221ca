use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;

use super::app::fail;
use super::paint::{self, Rgb};
use super::state::AppState;
use crate::error::GameError;
use crate::game::turn::Outcome;

pub const CHART_TITLE: &str = "Player vs AI Time Comparison";
pub const CHART_Y_LABEL: &str = "Time (seconds)";
const TICK_COUNT: usize = 5;

const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 56.0;
const MARGIN_BOTTOM: f64 = 48.0;
const BAR_FILL: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    fn bottom(&self) -> f64 {
        self.y + self.height
    }

    fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

#[derive(Clone, Debug)]
pub struct Bar {
    pub label: &'static str,
    pub seconds: f64,
    pub color: Rgb,
    pub rect: Rect,
}

/// Geometry of a two-bar chart, independent of any drawing surface.
#[derive(Clone, Debug)]
pub struct ChartLayout {
    pub plot: Rect,
    pub axis_max: f64,
    /// (value, y) pairs from the baseline up.
    pub ticks: Vec<(f64, f64)>,
    pub bars: [Bar; 2],
}

/// Smallest 1, 2 or 5 times a power of ten that is at least `value`.
pub fn axis_max(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powi(value.log10().floor() as i32);
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|step| step * magnitude)
        .find(|candidate| *candidate >= value)
        .unwrap_or(10.0 * magnitude)
}

pub fn layout(width: f64, height: f64, outcome: &Outcome) -> ChartLayout {
    let plot = Rect {
        x: MARGIN_LEFT,
        y: MARGIN_TOP,
        width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(0.0),
        height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(0.0),
    };
    let player = outcome.player.as_secs_f64();
    let ai = outcome.ai.as_secs_f64();
    let top = axis_max(player.max(ai));
    let y_of = |value: f64| plot.bottom() - value / top * plot.height;

    let ticks = (0..TICK_COUNT)
        .map(|step| {
            let value = top * step as f64 / (TICK_COUNT - 1) as f64;
            (value, y_of(value))
        })
        .collect();

    let slot = plot.width / 2.0;
    let bar_width = slot * BAR_FILL;
    let bar = |slot_index: usize, label, seconds: f64, color| {
        let x = plot.x + slot * slot_index as f64 + (slot - bar_width) / 2.0;
        let y = y_of(seconds);
        Bar {
            label,
            seconds,
            color,
            rect: Rect {
                x,
                y,
                width: bar_width,
                height: plot.bottom() - y,
            },
        }
    };

    ChartLayout {
        plot,
        axis_max: top,
        ticks,
        bars: [
            bar(0, "Player", player, paint::PLAYER_BLUE),
            bar(1, "AI", ai, paint::AI_RED),
        ],
    }
}

fn tick_label(value: f64, axis_max: f64) -> String {
    if axis_max >= TICK_COUNT as f64 - 1.0 && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

pub fn draw_chart(
    cr: &cairo::Context,
    width: f64,
    height: f64,
    outcome: &Outcome,
) -> Result<(), cairo::Error> {
    let chart = layout(width, height, outcome);
    let plot = chart.plot;

    cr.set_antialias(cairo::Antialias::Best);
    paint::set_rgb(cr, paint::WHITE);
    cr.paint()?;

    paint::show_text_centered(
        cr,
        CHART_TITLE,
        20.0,
        true,
        paint::BLACK,
        width / 2.0,
        MARGIN_TOP / 2.0,
    );

    cr.set_line_width(1.0);
    for &(value, y) in &chart.ticks {
        cr.set_source_rgb(0.85, 0.85, 0.85);
        cr.move_to(plot.x, y);
        cr.line_to(plot.x + plot.width, y);
        cr.stroke()?;
        paint::show_text_centered(
            cr,
            &tick_label(value, chart.axis_max),
            12.0,
            false,
            paint::BLACK,
            plot.x - 18.0,
            y,
        );
    }

    paint::set_rgb(cr, paint::BLACK);
    cr.move_to(plot.x, plot.y);
    cr.line_to(plot.x, plot.bottom());
    cr.line_to(plot.x + plot.width, plot.bottom());
    cr.stroke()?;

    cr.save()?;
    cr.translate(16.0, plot.y + plot.height / 2.0);
    cr.rotate(-90f64.to_radians());
    paint::show_text_centered(cr, CHART_Y_LABEL, 14.0, false, paint::BLACK, 0.0, 0.0);
    cr.restore()?;

    for bar in &chart.bars {
        let rect = bar.rect;
        paint::set_rgb(cr, bar.color);
        cr.rectangle(rect.x, rect.y, rect.width, rect.height);
        cr.fill()?;

        let value = format!("{:.2}s", bar.seconds);
        paint::show_text_centered(
            cr,
            &value,
            14.0,
            true,
            paint::BLACK,
            rect.center_x(),
            rect.y - 12.0,
        );
        paint::show_text_centered(
            cr,
            bar.label,
            14.0,
            false,
            paint::BLACK,
            rect.center_x(),
            plot.bottom() + MARGIN_BOTTOM / 2.0,
        );
    }
    Ok(())
}

pub fn build_chart_area(state: &Rc<RefCell<AppState>>) -> gtk::DrawingArea {
    let area = gtk::DrawingArea::builder()
        .content_width(520)
        .content_height(360)
        .hexpand(true)
        .vexpand(true)
        .build();
    area.add_css_class("duel-chart");

    let state_draw = state.clone();
    area.set_draw_func(move |_, cr, width, height| {
        let Some(outcome) = state_draw.borrow().outcome else {
            return;
        };
        if let Err(err) = draw_chart(cr, width as f64, height as f64, &outcome) {
            let state_fail = state_draw.clone();
            glib::idle_add_local_once(move || fail(&state_fail, GameError::Render(err)));
        }
    });
    area
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn outcome(player_ms: u64, ai_ms: u64) -> Outcome {
        Outcome {
            player: Duration::from_millis(player_ms),
            ai: Duration::from_millis(ai_ms),
        }
    }

    #[test]
    fn axis_max_rounds_up_to_a_nice_value() {
        assert_eq!(axis_max(0.0), 1.0);
        assert_eq!(axis_max(-3.0), 1.0);
        assert_eq!(axis_max(0.4), 0.5);
        assert_eq!(axis_max(7.3), 10.0);
        assert_eq!(axis_max(12.0), 20.0);
        assert_eq!(axis_max(20.0), 20.0);
        assert_eq!(axis_max(51.0), 100.0);
    }

    #[test]
    fn bars_are_proportional_to_times() {
        let chart = layout(600.0, 400.0, &outcome(5_000, 10_000));
        assert_eq!(chart.axis_max, 10.0);
        let [player, ai] = &chart.bars;
        assert_eq!(player.label, "Player");
        assert_eq!(ai.label, "AI");
        assert!((ai.rect.height - chart.plot.height).abs() < 1e-9);
        assert!((player.rect.height * 2.0 - ai.rect.height).abs() < 1e-9);
        assert!((player.rect.bottom() - ai.rect.bottom()).abs() < 1e-9);
        assert!(player.rect.x < ai.rect.x);
    }

    #[test]
    fn ticks_span_baseline_to_axis_max() {
        let chart = layout(600.0, 400.0, &outcome(3_000, 1_500));
        assert_eq!(chart.ticks.len(), TICK_COUNT);
        let (first_value, first_y) = chart.ticks[0];
        let (last_value, last_y) = chart.ticks[TICK_COUNT - 1];
        assert_eq!(first_value, 0.0);
        assert_eq!(first_y, chart.plot.bottom());
        assert_eq!(last_value, 5.0);
        assert!((last_y - chart.plot.y).abs() < 1e-9);
    }

    #[test]
    fn zero_times_draw_flat_bars() {
        let chart = layout(600.0, 400.0, &outcome(0, 0));
        assert_eq!(chart.axis_max, 1.0);
        assert!(chart.bars.iter().all(|bar| bar.rect.height == 0.0));
    }
}
