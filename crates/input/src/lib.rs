//! Terminal input - maps `crossterm` key events to game actions.
//!
//! Independent of any UI framework. [`map`] translates single key events into
//! [`crate::types::GameAction`]s; [`handler`] adds DAS/ARR repeats and
//! soft-drop release tracking for terminals with or without key-release
//! events.

pub mod handler;
pub mod map;

pub use falling_blocks_types as types;

pub use handler::{ActionBatch, InputHandler};
pub use map::{handle_key_event, should_quit};
