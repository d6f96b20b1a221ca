use std::cmp::Ordering;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use super::assets::ImageId;
use super::board::Board;
use super::picker;
use super::timer::SideTimer;

pub const MATCH_ACK_DELAY: Duration = Duration::from_millis(200);
pub const MATCH_ACK_DURATION: Duration = Duration::from_millis(500);
pub const MISMATCH_HOLD: Duration = Duration::from_secs(1);
pub const AI_THINK_DELAY: Duration = Duration::from_secs(1);
pub const AI_REVEAL_HOLD: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Ai => "AI",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    InProgress,
    Finished,
}

/// Face-up tiles waiting to be evaluated, oldest first.
#[derive(Clone, Debug, Default)]
pub struct RevealSet {
    indices: Vec<usize>,
}

impl RevealSet {
    pub const CAPACITY: usize = 2;

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.indices.len() >= Self::CAPACITY
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Adds `index`, evicting the oldest entry when full. Already revealed tiles are refused.
    pub fn reveal(&mut self, index: usize) -> bool {
        if self.contains(index) {
            return false;
        }
        if self.is_full() {
            self.indices.remove(0);
        }
        self.indices.push(index);
        true
    }

    pub fn pair(&self) -> Option<[usize; 2]> {
        match self.indices.as_slice() {
            &[first, second] => Some([first, second]),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Revealed,
    Matched,
    Mismatched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    Player,
    Ai,
    Tie,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub player: Duration,
    pub ai: Duration,
}

impl Outcome {
    pub fn winner(&self) -> Winner {
        match self.player.cmp(&self.ai) {
            Ordering::Less => Winner::Player,
            Ordering::Greater => Winner::Ai,
            Ordering::Equal => Winner::Tie,
        }
    }

    pub fn banner(&self) -> String {
        match self.winner() {
            Winner::Player => format!("You Win! {:.2}s", self.player.as_secs_f64()),
            Winner::Ai => format!("AI Wins! {:.2}s", self.ai.as_secs_f64()),
            Winner::Tie => "It's a Tie!".to_string(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Player {:.2}s | AI {:.2}s",
            self.player.as_secs_f64(),
            self.ai.as_secs_f64()
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileFace {
    Hidden,
    Revealed,
    Removed,
}

#[derive(Clone, Debug)]
pub struct TileView {
    pub row: usize,
    pub col: usize,
    pub identity: ImageId,
    pub face: TileFace,
}

/// Everything the presentation needs for one frame.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub tiles: Vec<TileView>,
    pub turn: Side,
    pub phase: GamePhase,
    pub matched_ack: bool,
    pub player_elapsed: Duration,
    pub outcome: Option<Outcome>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Selecting,
    Matched { ack_at: Instant, clear_at: Instant },
    Mismatched { clear_at: Instant },
    AiThinking { reveal_at: Instant },
    AiRevealed { evaluate_at: Instant },
    Finished,
}

pub struct TurnController<R> {
    board: Board,
    reveal: RevealSet,
    turn: Side,
    stage: Stage,
    player: SideTimer,
    ai: SideTimer,
    rng: R,
}

impl<R: Rng> TurnController<R> {
    pub fn new(board: Board, rng: R, now: Instant) -> Self {
        TurnController {
            board,
            reveal: RevealSet::default(),
            turn: Side::Player,
            stage: Stage::Selecting,
            player: SideTimer::started(now),
            ai: SideTimer::default(),
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub fn reveal_set(&self) -> &RevealSet {
        &self.reveal
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn phase(&self) -> GamePhase {
        if self.stage == Stage::Finished {
            GamePhase::Finished
        } else {
            GamePhase::InProgress
        }
    }

    pub fn accepts_input(&self) -> bool {
        self.turn == Side::Player && self.stage == Stage::Selecting
    }

    pub fn matched_ack_visible(&self, now: Instant) -> bool {
        matches!(self.stage, Stage::Matched { ack_at, .. } if now >= ack_at)
    }

    pub fn player_elapsed(&self, now: Instant) -> Duration {
        self.player.elapsed(now)
    }

    pub fn ai_elapsed(&self, now: Instant) -> Duration {
        self.ai.elapsed(now)
    }

    #[cfg(test)]
    pub fn is_player_paused(&self) -> bool {
        self.player.is_paused()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        (self.stage == Stage::Finished).then(|| Outcome {
            player: self.player.elapsed(Instant::now()),
            ai: self.ai.elapsed(Instant::now()),
        })
    }

    pub fn click(&mut self, index: usize, now: Instant) -> ClickOutcome {
        if !self.accepts_input() {
            return ClickOutcome::Ignored;
        }
        // Any press on the player's turn ends a mismatch pause, even a refused one.
        self.player.resume(now);

        if index >= self.board.len() || self.board.is_matched(index) {
            return ClickOutcome::Ignored;
        }
        if !self.reveal.reveal(index) {
            debug!(index, "tile already revealed");
            return ClickOutcome::Ignored;
        }
        debug!(index, "player revealed tile");

        if !self.reveal.is_full() {
            return ClickOutcome::Revealed;
        }
        if self.evaluate(now) {
            ClickOutcome::Matched
        } else {
            ClickOutcome::Mismatched
        }
    }

    /// Runs every pacing step that is due at `now`. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        loop {
            match self.stage {
                Stage::Matched { clear_at, .. } | Stage::Mismatched { clear_at }
                    if clear_at <= now =>
                {
                    self.resolve_pair(clear_at);
                }
                Stage::AiThinking { reveal_at } if reveal_at <= now => {
                    self.ai_reveal(reveal_at);
                }
                Stage::AiRevealed { evaluate_at } if evaluate_at <= now => {
                    self.evaluate(evaluate_at);
                }
                _ => break,
            }
            changed = true;
        }
        changed
    }

    pub fn snapshot(&self, now: Instant) -> Snapshot {
        let tiles = self
            .board
            .tiles()
            .iter()
            .map(|tile| {
                let face = if self.reveal.contains(tile.index) {
                    TileFace::Revealed
                } else if tile.matched {
                    TileFace::Removed
                } else {
                    TileFace::Hidden
                };
                TileView {
                    row: tile.row,
                    col: tile.col,
                    identity: tile.identity.clone(),
                    face,
                }
            })
            .collect();

        Snapshot {
            tiles,
            turn: self.turn,
            phase: self.phase(),
            matched_ack: self.matched_ack_visible(now),
            player_elapsed: self.player.elapsed(now),
            outcome: self.outcome(),
        }
    }

    fn evaluate(&mut self, at: Instant) -> bool {
        let Some([first, second]) = self.reveal.pair() else {
            return false;
        };

        if self.board.same_identity(first, second) {
            self.board.mark_matched(&[first, second]);
            info!(side = self.turn.label(), first, second, "pair matched");
            if self.board.all_matched() {
                self.player.finish(at);
                self.ai.finish(at);
                info!(side = self.turn.label(), "board cleared");
            }
            let ack_at = at + MATCH_ACK_DELAY;
            self.stage = Stage::Matched {
                ack_at,
                clear_at: ack_at + MATCH_ACK_DURATION,
            };
            true
        } else {
            debug!(side = self.turn.label(), first, second, "pair mismatched");
            let hold = match self.turn {
                Side::Player => {
                    self.player.pause(at);
                    MISMATCH_HOLD
                }
                Side::Ai => Duration::ZERO,
            };
            self.stage = Stage::Mismatched { clear_at: at + hold };
            false
        }
    }

    fn resolve_pair(&mut self, at: Instant) {
        self.reveal.clear();
        if self.board.all_matched() {
            self.stage = Stage::Finished;
            if let Some(outcome) = self.outcome() {
                info!(
                    player_secs = outcome.player.as_secs_f64(),
                    ai_secs = outcome.ai.as_secs_f64(),
                    winner = ?outcome.winner(),
                    "game finished"
                );
            }
            return;
        }
        match self.turn {
            Side::Player => self.begin_ai_turn(at),
            Side::Ai => self.begin_player_turn(),
        }
    }

    fn begin_player_turn(&mut self) {
        self.turn = Side::Player;
        self.stage = Stage::Selecting;
        debug!("player turn");
    }

    fn begin_ai_turn(&mut self, at: Instant) {
        self.turn = Side::Ai;
        self.ai.start(at);
        self.stage = Stage::AiThinking {
            reveal_at: at + AI_THINK_DELAY,
        };
        debug!("ai turn");
    }

    fn ai_reveal(&mut self, at: Instant) {
        let excluded = self.reveal.as_slice().to_vec();
        self.reveal.clear();
        let picks = picker::pick(&self.board, &excluded, &mut self.rng);
        if picks.is_empty() {
            debug!("ai has nothing to pick");
            self.begin_player_turn();
            return;
        }
        debug!(?picks, "ai revealed tiles");
        for idx in picks {
            self.reveal.reveal(idx);
        }
        self.stage = Stage::AiRevealed {
            evaluate_at: at + AI_REVEAL_HOLD,
        };
    }
}
