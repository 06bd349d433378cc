//! Terminal UI module for the flap board.
//!
//! Provides the interactive ratatui display and the palette shared with
//! the plain-text renderer.

pub mod colors;
pub mod tui;

pub use colors::{parse_color, Theme};
