//! flapboard - a retro split-flap text display for the terminal.
//!
//! The [`board`] module holds the display model and flip math and can be
//! driven without any terminal at all; [`ui`] draws it with ratatui.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use flapboard::board::{Alignment, Board, BoardSpec, FixedPacer, LineDescriptor, SnapEngine};
//!
//! let spec = BoardSpec {
//!     lines: vec![LineDescriptor::new("Hi").with_alignment(Alignment::Right)],
//!     line_length: 6,
//!     ..BoardSpec::default()
//! };
//! let board = Board::mount(spec, Arc::new(SnapEngine::new()), Box::new(FixedPacer(0.03)), Duration::ZERO);
//! assert_eq!(board.snapshot(Duration::ZERO).texts(), vec!["    hi"]);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod logging;
pub mod ui;

pub use error::{FlapboardError, Result};
