//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every game rule and all session state. It has no
//! dependency on terminals or I/O, so it can be driven headless, from a
//! terminal frontend, or from tests with a scripted piece sequence.
//!
//! # Module Structure
//!
//! - [`stage`]: 10x20 grid of cells, row detection and removal
//! - [`pieces`]: the seven piece matrices, their colors and rotation
//! - [`player`]: the falling piece and its movement
//! - [`collision`]: placement tests against walls, floor and locked cells
//! - [`rng`]: uniform and 7-bag piece sources
//! - [`scoring`]: row scores, levels and gravity speed
//! - [`hold`]: the once-per-piece hold slot
//! - [`high_scores`]: bounded best-first score list
//! - [`session`]: one game, tying all of the above together
//! - [`snapshot`]: read-only frame data for renderers
//! - [`config`]: environment-driven session settings
//!
//! # Game Rules
//!
//! - **Spawn**: centered, topmost mino on row 0; a blocked spawn ends the game
//! - **Rotation**: quarter turns of the piece matrix, no wall kicks
//! - **Locking**: a piece that can't fall locks immediately; locking with a
//!   mino above the stage ends the game
//! - **Clears**: full rows flash for 400ms with gravity paused, then vanish
//! - **Hold**: once per spawned piece
//! - **Scoring**: 40/100/300/1200 times (level + 1)
//!
//! # Example
//!
//! ```
//! use falling_blocks_core::{Session, SessionConfig};
//! use falling_blocks_types::GameAction;
//!
//! let mut session = Session::new(&SessionConfig::default());
//! session.reset();
//!
//! session.apply_action(GameAction::MoveRight);
//! session.apply_action(GameAction::RotateCw);
//! session.apply_action(GameAction::HardDrop);
//!
//! assert!(!session.game_over());
//! assert_eq!(session.stage().merged_count(), 4);
//! ```
//!
//! # Timing
//!
//! Call [`Session::tick`](session::Session::tick) every frame with the
//! elapsed milliseconds. Gravity starts at 900ms per row and speeds up by
//! 100ms per level down to 100ms.

pub mod collision;
pub mod config;
pub mod high_scores;
pub mod hold;
pub mod pieces;
pub mod player;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod stage;

pub use falling_blocks_types as types;

// Re-export commonly used types for convenience
pub use collision::check_collision;
pub use config::{ConfigError, SessionConfig};
pub use high_scores::HighScores;
pub use hold::{HoldOutcome, HoldSlot};
pub use pieces::{color, get_shape, get_spawn_shape, Shape};
pub use player::Player;
pub use rng::{BagRandomizer, Randomizer, RandomizerKind, SimpleRng, UniformRandomizer};
pub use scoring::{calculate_level, calculate_line_score, drop_interval_ms};
pub use session::{Phase, Session};
pub use snapshot::GameSnapshot;
pub use stage::{RowSet, Stage};
