//! Terminal frontend - renders session snapshots to a terminal.
//!
//! Frames are drawn into a plain [`FrameBuffer`] and flushed by the
//! [`TerminalRenderer`], which only writes the cells that changed since the
//! previous frame. [`GameView`] is pure and can be tested without a
//! terminal.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use falling_blocks_core as core;
pub use falling_blocks_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
