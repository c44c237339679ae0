//! Game session - one game's complete state and the operations on it
//!
//! The session owns the stage, the active piece, the piece source, the hold
//! slot and all counters. Frontends call its operations in response to input
//! and timer events and read its state (or a [`GameSnapshot`]) to render.
//!
//! # Lock processing
//!
//! ```text
//! ACTIVE --(piece can't fall)--> LOCKED --no full rows--> spawn, ACTIVE
//!                                   \
//!                                    `--full rows--> CLEARING (gravity paused)
//!                                                       |
//!                                           CLEAR_FLASH_MS elapsed
//!                                                       v
//!                               FLUSH: remove rows, score, spawn, resume gravity
//! ```
//!
//! Every input operation is a no-op (returns `false`) unless the phase is
//! [`Phase::Active`].
//!
//! # Timing
//!
//! [`Session::tick`] is the single clock input. It advances the flash timer
//! while clearing and the gravity accumulator otherwise. Gravity is paused
//! whenever `drop_interval_ms` is `None`.

use std::mem;

use log::{debug, info};

use crate::collision::check_collision;
use crate::config::SessionConfig;
use crate::high_scores::HighScores;
use crate::hold::{HoldOutcome, HoldSlot};
use crate::player::Player;
use crate::rng::Randomizer;
use crate::scoring::{calculate_level, calculate_line_score, drop_interval_ms};
use crate::snapshot::GameSnapshot;
use crate::stage::{RowSet, Stage};
use crate::types::{GameAction, PieceKind, CLEAR_FLASH_MS};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created but `reset()` has not been called yet
    NotStarted,
    /// A piece is falling
    Active,
    /// Full rows are flashing; gravity is paused
    Clearing,
    /// Terminal until `reset()`
    GameOver,
}

/// A single game, generic over its piece source.
///
/// Any infinite `Iterator<Item = PieceKind>` works as a source. If a finite
/// source runs dry the last piece repeats.
#[derive(Debug, Clone)]
pub struct Session<R = Randomizer> {
    stage: Stage,
    player: Option<Player>,
    pieces: R,
    next: PieceKind,
    hold: HoldSlot,
    high_scores: HighScores,
    score: u32,
    level: u32,
    rows_cleared: u32,
    started: bool,
    game_over: bool,
    /// `None` pauses gravity
    drop_interval_ms: Option<u32>,
    gravity_timer_ms: u32,
    clearing_rows: RowSet,
    clear_timer_ms: u32,
}

impl Session<Randomizer> {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_pieces(
            Randomizer::new(config.randomizer, config.seed),
            config.high_score_capacity,
        )
    }
}

impl Default for Session<Randomizer> {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl<R: Iterator<Item = PieceKind>> Session<R> {
    pub fn with_pieces(mut pieces: R, high_score_capacity: usize) -> Self {
        let next = pieces.next().unwrap_or(PieceKind::I);
        Self {
            stage: Stage::new(),
            player: None,
            pieces,
            next,
            hold: HoldSlot::new(),
            high_scores: HighScores::new(high_score_capacity),
            score: 0,
            level: 0,
            rows_cleared: 0,
            started: false,
            game_over: false,
            drop_interval_ms: None,
            gravity_timer_ms: 0,
            clearing_rows: RowSet::new(),
            clear_timer_ms: 0,
        }
    }

    /// Restore a persisted ranking, bounded to this session's capacity.
    pub fn with_high_scores(mut self, restored: HighScores) -> Self {
        let capacity = self.high_scores.capacity();
        self.high_scores = HighScores::from_scores(capacity, Vec::from(restored));
        self
    }

    /// Start a new game. Keeps the high-score list and the piece source.
    pub fn reset(&mut self) {
        self.stage.clear();
        self.player = None;
        self.hold = HoldSlot::new();
        self.score = 0;
        self.level = 0;
        self.rows_cleared = 0;
        self.clearing_rows.clear();
        self.clear_timer_ms = 0;
        self.started = true;
        self.game_over = false;

        if self.spawn_next() {
            self.arm_gravity(drop_interval_ms(self.level));
        }
        info!("new game started, first piece {:?}", self.player.map(|p| p.kind));
    }

    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::NotStarted
        } else if self.game_over {
            Phase::GameOver
        } else if !self.clearing_rows.is_empty() {
            Phase::Clearing
        } else {
            Phase::Active
        }
    }

    fn is_active(&self) -> bool {
        self.phase() == Phase::Active
    }

    /// Move the active piece one column (`-1` left, `1` right)
    pub fn move_horizontal(&mut self, direction: i8) -> bool {
        if !is_unit(direction) || !self.is_active() {
            return false;
        }
        let Some(player) = self.player.as_mut() else {
            return false;
        };
        if !player.try_move(&self.stage, direction) {
            return false;
        }
        self.stage.restamp(player);
        true
    }

    /// Rotate the active piece (`1` clockwise, `-1` counter-clockwise)
    pub fn rotate(&mut self, direction: i8) -> bool {
        if !is_unit(direction) || !self.is_active() {
            return false;
        }
        let Some(player) = self.player.as_mut() else {
            return false;
        };
        if !player.try_rotate(&self.stage, direction) {
            return false;
        }
        self.stage.restamp(player);
        true
    }

    /// One gravity step. Returns true if the piece moved down; when it can't,
    /// the piece locks and false is returned.
    pub fn soft_drop_tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(player) = self.player.as_mut() else {
            return false;
        };
        if player.step_down(&self.stage) {
            self.stage.restamp(player);
            return true;
        }
        self.lock_piece();
        false
    }

    /// Drop straight down and lock in the same call
    pub fn hard_drop(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(player) = self.player.as_mut() else {
            return false;
        };
        let distance = player.drop_to_floor(&self.stage);
        debug!("hard drop {:?} by {} rows", player.kind, distance);
        self.lock_piece();
        true
    }

    /// Bank the active piece, or swap it with the banked one
    pub fn hold(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(player) = self.player else {
            return false;
        };
        match self.hold.hold(player.kind) {
            HoldOutcome::Unavailable => false,
            HoldOutcome::Stored => {
                debug!("hold stored {:?}", player.kind);
                self.spawn_next();
                // Spawning re-arms the slot; this piece came from a hold.
                self.hold.spend();
                true
            }
            HoldOutcome::Swapped(kind) => {
                debug!("hold swapped {:?} for {:?}", player.kind, kind);
                self.place_spawned(kind);
                true
            }
        }
    }

    /// Stop gravity. Idempotent.
    pub fn pause_gravity(&mut self) {
        self.drop_interval_ms = None;
        self.gravity_timer_ms = 0;
    }

    /// Restart gravity at `interval_ms`, re-arming the timer from zero.
    /// Ignored outside the active phase (gravity stays paused while clearing).
    pub fn resume_gravity(&mut self, interval_ms: u32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.arm_gravity(interval_ms);
        true
    }

    /// Remove the flashing rows and continue with the next piece.
    ///
    /// [`Session::tick`] calls this once the flash window has elapsed; it is
    /// public so an external timer can drive it instead.
    pub fn flush_rows(&mut self) -> bool {
        if self.phase() != Phase::Clearing {
            return false;
        }
        let rows = mem::take(&mut self.clearing_rows);
        let removed = self.stage.remove_rows(&rows);

        self.score = self
            .score
            .saturating_add(calculate_line_score(removed, self.level));
        self.rows_cleared = self.rows_cleared.saturating_add(removed as u32);
        self.level = calculate_level(self.rows_cleared);
        self.clear_timer_ms = 0;
        self.player = None;
        debug!(
            "flushed rows {:?}: score {}, level {}, rows {}",
            rows.as_slice(),
            self.score,
            self.level,
            self.rows_cleared
        );

        if self.spawn_next() {
            self.arm_gravity(drop_interval_ms(self.level));
        }
        true
    }

    /// Advance the clock. Returns true if the stage changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        match self.phase() {
            Phase::Clearing => {
                self.clear_timer_ms = self.clear_timer_ms.saturating_add(elapsed_ms);
                if self.clear_timer_ms >= CLEAR_FLASH_MS {
                    return self.flush_rows();
                }
                false
            }
            Phase::Active => {
                let Some(interval) = self.drop_interval_ms else {
                    return false;
                };
                self.gravity_timer_ms = self.gravity_timer_ms.saturating_add(elapsed_ms);
                if self.gravity_timer_ms < interval {
                    return false;
                }
                self.gravity_timer_ms = 0;
                self.soft_drop_tick();
                true
            }
            Phase::NotStarted | Phase::GameOver => false,
        }
    }

    /// Dispatch an input action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_horizontal(-1),
            GameAction::MoveRight => self.move_horizontal(1),
            GameAction::RotateCw => self.rotate(1),
            GameAction::RotateCcw => self.rotate(-1),
            GameAction::SoftDrop => {
                if !self.is_active() {
                    return false;
                }
                self.pause_gravity();
                self.soft_drop_tick();
                true
            }
            GameAction::SoftDropRelease => self.resume_gravity(drop_interval_ms(self.level)),
            GameAction::HardDrop => match self.phase() {
                // The drop key doubles as START.
                Phase::NotStarted | Phase::GameOver => {
                    self.reset();
                    true
                }
                Phase::Active | Phase::Clearing => self.hard_drop(),
            },
            GameAction::Hold => self.hold(),
            GameAction::Restart => {
                self.reset();
                true
            }
        }
    }

    fn arm_gravity(&mut self, interval_ms: u32) {
        self.drop_interval_ms = Some(interval_ms.max(1));
        self.gravity_timer_ms = 0;
    }

    /// Take the `next` piece and draw a replacement
    fn draw_piece(&mut self) -> PieceKind {
        let replacement = self.pieces.next().unwrap_or(self.next);
        mem::replace(&mut self.next, replacement)
    }

    /// Spawn from the generator. False means the game just ended.
    fn spawn_next(&mut self) -> bool {
        let kind = self.draw_piece();
        self.hold.rearm();
        self.place_spawned(kind)
    }

    /// Put `kind` at the spawn location, or end the game if it doesn't fit
    fn place_spawned(&mut self, kind: PieceKind) -> bool {
        let player = Player::spawn(kind);
        self.stage.sweep_falling();
        if check_collision(&player, &self.stage, (0, 0)) {
            debug!("spawn of {:?} blocked", kind);
            self.player = None;
            self.enter_game_over();
            return false;
        }
        self.stage.stamp(&player);
        self.player = Some(player);
        true
    }

    /// The active piece can't fall any further: merge it and decide what's next
    fn lock_piece(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.collided = true;
        let player = *player;
        self.stage.restamp(&player);
        debug!("locked {:?} at ({}, {})", player.kind, player.x, player.y);

        // Cells above row 0 have no place in the stage. Merging only the
        // visible part would leave a cut piece behind, so this is a top out.
        if player.is_above_top() {
            debug!("lock out: {:?} locked above the stage", player.kind);
            self.enter_game_over();
            return;
        }

        let rows = self.stage.full_rows();
        if rows.is_empty() {
            self.spawn_next();
            return;
        }

        debug!("clearing rows {:?}", rows.as_slice());
        self.clearing_rows = rows;
        self.clear_timer_ms = 0;
        self.pause_gravity();
    }

    fn enter_game_over(&mut self) {
        self.game_over = true;
        self.pause_gravity();
        self.clearing_rows.clear();
        let rank = if self.score > 0 {
            self.high_scores.record(self.score)
        } else {
            None
        };
        info!(
            "game over: score {}, level {}, rows {}, rank {:?}",
            self.score, self.level, self.rows_cleared, rank
        );
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The current piece, including a collided one frozen during a clear
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    /// The falling (not yet collided) piece
    pub fn active(&self) -> Option<&Player> {
        self.player.as_ref().filter(|p| !p.collided)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn drop_interval_ms(&self) -> Option<u32> {
        self.drop_interval_ms
    }

    pub fn clearing_rows(&self) -> &[u8] {
        &self.clearing_rows
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn held_piece(&self) -> Option<PieceKind> {
        self.hold.held()
    }

    pub fn can_hold(&self) -> bool {
        self.hold.can_hold()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.stage.write_grid(&mut out.stage);
        out.phase = self.phase();
        out.score = self.score;
        out.level = self.level;
        out.rows_cleared = self.rows_cleared;
        out.clearing_rows.clone_from(&self.clearing_rows);
        out.next = self.next;
        out.hold = self.hold.held();
        out.can_hold = self.hold.can_hold();
        out.drop_interval_ms = self.drop_interval_ms;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

fn is_unit(direction: i8) -> bool {
    direction == 1 || direction == -1
}
