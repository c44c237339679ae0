//! Shared types - plain data used by the engine, the input layer and the renderer
//!
//! Everything here is dependency-free so it can be used from any context
//! (core simulation, terminal rendering, tests).
//!
//! # Stage Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//!
//! Rows above row 0 are unbounded: a piece may hang partially above the
//! visible stage.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep of the terminal runner |
//! | `BASE_DROP_MS` | 1000 | Gravity base before the level step is applied |
//! | `DROP_STEP_MS` | 100 | Gravity gets this much faster per level |
//! | `MIN_DROP_INTERVAL_MS` | 100 | Gravity floor |
//! | `CLEAR_FLASH_MS` | 400 | Flash window before full rows are removed |
//!
//! # Examples
//!
//! ```
//! use falling_blocks_types::{Cell, CellState, PieceKind, Rotation, STAGE_HEIGHT, STAGE_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! let cell = Cell::Merged(PieceKind::O);
//! assert_eq!(cell.state(), CellState::Merged);
//! assert_eq!(Cell::Empty.state(), CellState::Clear);
//!
//! assert_eq!(STAGE_WIDTH, 10);
//! assert_eq!(STAGE_HEIGHT, 20);
//! ```

/// Stage width in cells (10 columns)
pub const STAGE_WIDTH: u8 = 10;

/// Stage height in cells (20 rows)
pub const STAGE_HEIGHT: u8 = 20;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity base in milliseconds
pub const BASE_DROP_MS: u32 = 1000;

/// Gravity speed-up per level in milliseconds
pub const DROP_STEP_MS: u32 = 100;

/// Gravity never gets faster than this
pub const MIN_DROP_INTERVAL_MS: u32 = 100;

/// How long completed rows flash before they are removed
pub const CLEAR_FLASH_MS: u32 = 400;

/// Cleared rows needed per level
pub const ROWS_PER_LEVEL: u32 = 10;

/// Default capacity of the high-score list
pub const HIGH_SCORE_CAPACITY: usize = 10;

/// Largest accepted high-score list capacity
pub const MAX_HIGH_SCORE_CAPACITY: usize = 100;

/// Delayed Auto Shift - delay before a held direction key starts repeating
pub const DEFAULT_DAS_MS: u32 = 150;

/// Auto Repeat Rate - interval between repeated moves once DAS has elapsed
pub const DEFAULT_ARR_MS: u32 = 50;

/// Interval between repeated soft-drop steps while the drop key is held
pub const SOFT_DROP_REPEAT_MS: u32 = 50;

/// Line clear scoring table
///
/// Base points for clearing N rows at level 0. Multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];


/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, straight bar
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
/// - **O**: Yellow, 2x2 square
/// - **S**: Green, S-shaped
/// - **T**: Purple, T-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All piece kinds, in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use falling_blocks_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Single uppercase letter, as shown in the side panel
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }

    /// Position in [`PieceKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::J => 1,
            PieceKind::L => 2,
            PieceKind::O => 3,
            PieceKind::S => 4,
            PieceKind::T => 5,
            PieceKind::Z => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Rotation states of a piece
///
/// - **North**: Spawn orientation
/// - **East**: Rotated 90° clockwise
/// - **South**: Rotated 180°
/// - **West**: Rotated 90° counter-clockwise
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use falling_blocks_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Number of clockwise quarter turns away from North
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Visual state of a stage cell
///
/// - **Clear**: empty, or occupied by the falling (uncommitted) piece
/// - **Merged**: permanently locked into the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Clear,
    Merged,
}

/// A cell on the stage
///
/// An empty cell has no piece kind and is always `Clear`; the enum makes an
/// empty merged cell unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Stamped by the active piece this step
    Falling(PieceKind),
    /// Locked into the stage
    Merged(PieceKind),
}

impl Cell {
    pub fn kind(&self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Falling(kind) | Cell::Merged(kind) => Some(*kind),
        }
    }

    pub fn state(&self) -> CellState {
        match self {
            Cell::Merged(_) => CellState::Merged,
            Cell::Empty | Cell::Falling(_) => CellState::Clear,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, Cell::Merged(_))
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Actions the input layer can send to a session
///
/// Each action maps onto one session operation; see
/// `Session::apply_action` in the core crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Down key pressed: pause gravity and drop one row
    SoftDrop,
    /// Down key released: resume gravity at the level interval
    SoftDropRelease,
    /// Drop until the piece locks; starts a new game when not playing
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Bank the active piece (once per spawned piece)
    Hold,
    /// Start over at any time
    Restart,
}

impl GameAction {
    /// Parse action from a camelCase name
    ///
    /// # Examples
    ///
    /// ```
    /// use falling_blocks_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("hold"), Some(GameAction::Hold));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "softdroprelease" => Some(GameAction::SoftDropRelease),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::SoftDropRelease => "softDropRelease",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
            GameAction::Restart => "restart",
        }
    }
}
