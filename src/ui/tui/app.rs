//! TUI application state and main loop.
//!
//! Owns the mounted board, maps keys to board actions and draws one frame
//! per animation tick.

use std::io::{self, stdout, Stdout};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use super::animation::AnimationState;
use super::widgets::{BoardWidget, ControlsWidget};
use crate::board::{Board, Clock, SystemClock};
use crate::error::Result;

/// Application state for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Showing the board
    Running,
    /// Exiting
    Exiting,
}

/// A user action on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Flip every line to its text
    Play,
    /// Flip every line to blanks
    Blank,
    /// Show or hide the background grid
    ToggleGrid,
    /// Leave the application
    Quit,
}

impl Action {
    /// Map a key press to an action.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Self::Quit)
            }
            KeyCode::Char('p') | KeyCode::Enter => Some(Self::Play),
            KeyCode::Char('b') => Some(Self::Blank),
            KeyCode::Char('g') => Some(Self::ToggleGrid),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }
}

/// The main TUI application.
#[derive(Debug)]
pub struct App {
    /// Current state
    state: AppState,
    /// The board on display
    board: Board,
    /// Board time source
    clock: Box<dyn Clock>,
    /// Frame pacing
    animation: AnimationState,
    /// Whether to draw colors
    use_color: bool,
}

impl App {
    /// Create an application around a mounted board.
    ///
    /// The clock must be the one the board was mounted against.
    pub fn new(board: Board, clock: Box<dyn Clock>) -> Self {
        Self {
            state: AppState::Running,
            board,
            clock,
            animation: AnimationState::new(30),
            use_color: true,
        }
    }

    /// Create an application on the wall clock.
    pub fn with_system_clock(board: Board, clock: SystemClock) -> Self {
        Self::new(board, Box::new(clock))
    }

    /// Set the target frame rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.animation = AnimationState::new(fps);
        self
    }

    /// Enable or disable colors.
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Check if should continue running.
    pub fn is_running(&self) -> bool {
        !matches!(self.state, AppState::Exiting)
    }

    /// Get current state.
    pub fn state(&self) -> AppState {
        self.state
    }

    /// The board on display.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Apply an action. Play and Blank are ignored when the board hides its
    /// controls.
    pub fn apply(&mut self, action: Action) {
        let now = self.clock.now();
        match action {
            Action::Play if self.board.show_controls() => self.board.play_all(now),
            Action::Blank if self.board.show_controls() => self.board.blank_all(now),
            Action::Play | Action::Blank => {
                tracing::debug!(?action, "controls hidden, ignoring");
            }
            Action::ToggleGrid => {
                let shown = self.board.toggle_grid();
                tracing::debug!(shown, "grid toggled");
            }
            Action::Quit => self.state = AppState::Exiting,
        }
    }

    /// Handle one terminal event.
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if let Some(action) = Action::from_key(key) {
                self.apply(action);
            }
        }
    }

    /// Render to a ratatui frame.
    pub fn render(&self, frame: &mut Frame) {
        let now = self.clock.now();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let board = BoardWidget::new(&self.board, now).with_color(self.use_color);
        frame.render_widget(board, chunks[0]);

        let controls =
            ControlsWidget::new(self.board.show_controls()).animating(self.board.is_animating(now));
        frame.render_widget(controls, chunks[1]);
    }

    /// Draw and handle input until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.is_running() {
            terminal.draw(|frame| self.render(frame))?;
            if event::poll(self.animation.until_next_frame())? {
                self.handle_event(event::read()?);
            }
            self.animation.tick();
        }
        Ok(())
    }
}

/// Puts the terminal into TUI mode and restores it when dropped, on every
/// exit path.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    /// Initialize terminal for TUI mode.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(Self { terminal })
    }

    /// The terminal to draw on.
    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
