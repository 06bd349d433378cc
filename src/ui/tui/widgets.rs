//! Ratatui widgets for the flap board.
//!
//! Provides:
//! - The board itself, one flap cell per slot
//! - The control bar offering Play and Blank

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::animation::Tweenable;
use crate::board::Board;
use crate::ui::colors::{rgb_of, Theme};

// ============================================================================
// Board Widget
// ============================================================================

/// Columns taken by one flap cell, gap excluded.
const CELL_WIDTH: u16 = 3;

/// Draws every slot of a board as it looks at one instant.
#[derive(Debug, Clone, Copy)]
pub struct BoardWidget<'a> {
    /// Board to draw
    board: &'a Board,
    /// Sampling time
    now: Duration,
    /// Palette
    theme: Theme,
    /// Whether to emit colors at all
    use_color: bool,
}

impl<'a> BoardWidget<'a> {
    /// Create a board widget sampled at `now`.
    pub fn new(board: &'a Board, now: Duration) -> Self {
        Self {
            board,
            now,
            theme: Theme::default(),
            use_color: true,
        }
    }

    /// Set the palette.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Enable or disable colors.
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Size the board needs: a gap column around every cell and a gap row
    /// around every line.
    pub fn size(&self) -> (u16, u16) {
        let slots = u16::try_from(self.board.line_length()).unwrap_or(u16::MAX);
        let lines = u16::try_from(self.board.lines().len()).unwrap_or(u16::MAX);
        (
            slots.saturating_mul(CELL_WIDTH + 1).saturating_add(1),
            lines.saturating_mul(2).saturating_add(1),
        )
    }

    /// Render as plain text, one framed row per line.
    pub fn render_string(&self) -> String {
        let width = self.board.line_length();
        let mut output = String::new();
        output.push_str(&format!("┌{}┐\n", "─".repeat(width)));
        for line in self.board.lines() {
            let text: String = line
                .flipper()
                .slots()
                .iter()
                .map(|s| s.faces(self.now).visible_top().glyph)
                .collect();
            output.push_str(&format!("│{}│\n", text));
        }
        output.push_str(&format!("└{}┘", "─".repeat(width)));
        output
    }

    fn glyph_style(&self, color: Color, brightness: f32, mid_flip: bool) -> Style {
        if !self.use_color {
            return if mid_flip {
                Style::default().add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default()
            };
        }

        let base = match color {
            Color::Reset => Theme::color(self.theme.foreground),
            other => other,
        };
        let fg = match rgb_of(base) {
            Some(rgb) => {
                let flap = (self.theme.flap.0, self.theme.flap.1, self.theme.flap.2);
                let (r, g, b) = flap.lerp(&rgb, brightness.clamp(0.0, 1.0) as f64);
                Color::Rgb(r, g, b)
            }
            None => base,
        };

        let mut style = Style::default()
            .fg(fg)
            .bg(Theme::color(self.theme.flap))
            .add_modifier(Modifier::BOLD);
        if mid_flip {
            style = style
                .add_modifier(Modifier::UNDERLINED)
                .underline_color(Theme::color(self.theme.hinge));
        }
        style
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.size();
        if area.width < width || area.height < height {
            let notice = Paragraph::new("terminal too small for the board");
            notice.render(area, buf);
            return;
        }

        let x0 = area.x + (area.width - width) / 2;
        let y0 = area.y + (area.height - height) / 2;

        if self.board.show_grid() {
            let dot = if self.use_color {
                Style::default().fg(Theme::color(self.theme.grid))
            } else {
                Style::default()
            };
            for y in (y0..y0 + height).step_by(2) {
                for x in (x0..x0 + width).step_by(2) {
                    buf.set_string(x, y, "·", dot);
                }
            }
        }

        for (row, line) in self.board.lines().iter().enumerate() {
            let y = y0 + 1 + row as u16 * 2;
            for (col, slot) in line.flipper().slots().iter().enumerate() {
                let x = x0 + 1 + col as u16 * (CELL_WIDTH + 1);
                let faces = slot.faces(self.now);
                let face = faces.visible_top();
                let style = self.glyph_style(slot.color(), face.brightness, faces.is_mid_flip());
                buf.set_string(x, y, format!(" {} ", face.glyph), style);
            }
        }
    }
}

// ============================================================================
// Controls Widget
// ============================================================================

/// Key hints for the board's actions.
#[derive(Debug, Clone, Copy)]
pub struct ControlsWidget {
    /// Whether Play and Blank are offered
    show_actions: bool,
    /// Whether a flip is still running
    animating: bool,
    /// Palette
    theme: Theme,
}

impl ControlsWidget {
    /// Create a control bar.
    pub fn new(show_actions: bool) -> Self {
        Self {
            show_actions,
            animating: false,
            theme: Theme::default(),
        }
    }

    /// Mark the board as mid-flip.
    pub fn animating(mut self, animating: bool) -> Self {
        self.animating = animating;
        self
    }

    fn actions(&self) -> Vec<(&'static str, &'static str)> {
        let mut actions = Vec::new();
        if self.show_actions {
            actions.push(("p", "Play"));
            actions.push(("b", "Blank"));
        }
        actions.push(("g", "Grid"));
        actions.push(("q", "Quit"));
        actions
    }

    /// Render as a formatted string.
    pub fn render_string(&self) -> String {
        let hints: Vec<String> = self
            .actions()
            .iter()
            .map(|(key, label)| format!("[{}] {}", key, label))
            .collect();
        let mut output = hints.join("   ");
        if self.animating {
            output.push_str("   ·flipping·");
        }
        output
    }
}

impl Widget for ControlsWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let key_style = Style::default()
            .fg(Theme::color(self.theme.accent))
            .add_modifier(Modifier::BOLD);
        let label_style = Style::default().fg(Theme::color(self.theme.muted));

        let mut spans = Vec::new();
        for (i, (key, label)) in self.actions().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(format!("[{}]", key), key_style));
            spans.push(Span::styled(format!(" {}", label), label_style));
        }
        if self.animating {
            spans.push(Span::styled("   ·flipping·", label_style));
        }

        Paragraph::new(Line::from(spans))
            .centered()
            .render(area, buf);
    }
}
