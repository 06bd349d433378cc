//! Ratatui-based TUI module for the flap board.
//!
//! Provides:
//! - The interactive application loop
//! - Board and control widgets
//! - Easing and tween primitives shared with the board's timelines

pub mod animation;
pub mod app;
pub mod widgets;

pub use animation::{AnimationState, Easing, Tween, Tweenable};
pub use app::{Action, App, AppState, TerminalGuard};
pub use widgets::{BoardWidget, ControlsWidget};
