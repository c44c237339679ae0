use crate::session::Phase;
use crate::stage::RowSet;
use crate::types::{Cell, PieceKind, STAGE_HEIGHT, STAGE_WIDTH};

/// Everything a frontend needs to draw one frame.
///
/// The stage grid already has the active piece stamped into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub stage: [[Cell; STAGE_WIDTH as usize]; STAGE_HEIGHT as usize],
    pub phase: Phase,
    pub score: u32,
    pub level: u32,
    pub rows_cleared: u32,
    /// Rows flashing before removal; empty unless `phase` is `Clearing`
    pub clearing_rows: RowSet,
    pub next: PieceKind,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    /// `None` while gravity is paused
    pub drop_interval_ms: Option<u32>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.stage = [[Cell::Empty; STAGE_WIDTH as usize]; STAGE_HEIGHT as usize];
        self.phase = Phase::NotStarted;
        self.score = 0;
        self.level = 0;
        self.rows_cleared = 0;
        self.clearing_rows.clear();
        self.next = PieceKind::I;
        self.hold = None;
        self.can_hold = true;
        self.drop_interval_ms = None;
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn is_clearing_row(&self, y: usize) -> bool {
        self.clearing_rows.iter().any(|&row| row as usize == y)
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Active
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            stage: [[Cell::Empty; STAGE_WIDTH as usize]; STAGE_HEIGHT as usize],
            phase: Phase::NotStarted,
            score: 0,
            level: 0,
            rows_cleared: 0,
            clearing_rows: RowSet::new(),
            next: PieceKind::I,
            hold: None,
            can_hold: true,
            drop_interval_ms: None,
        }
    }
}
