//! The display surface: every line shown together, mounted as one unit.

use std::sync::Arc;
use std::time::Duration;

use ratatui::style::Color;
use serde::Serialize;

use super::alphabet::{Alphabet, DEFAULT_CHARACTERS};
use super::line::{Alignment, FlipLine, LineId};
use super::timeline::{StepPacer, TimelineEngine};

/// Default number of slots per line.
pub const DEFAULT_LINE_LENGTH: usize = 12;

/// One line as the caller describes it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDescriptor {
    /// Text shown on play
    pub text: String,
    /// Slot color
    pub color: Color,
    /// Edge the text hugs
    pub alignment: Alignment,
    /// Extra spin cycles per flip
    pub pad: u32,
}

impl LineDescriptor {
    /// Left-aligned line with the default padding factor of 1.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Color::Reset,
            alignment: Alignment::Left,
            pad: 1,
        }
    }

    /// Set the alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the padding factor.
    pub fn with_pad(mut self, pad: u32) -> Self {
        self.pad = pad;
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Everything needed to mount a board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSpec {
    /// Lines, top to bottom
    pub lines: Vec<LineDescriptor>,
    /// Slots per line
    pub line_length: usize,
    /// Characters the slots cycle through
    pub characters: String,
    /// Draw the background grid
    pub show_grid: bool,
    /// Offer the Play and Blank actions
    pub show_controls: bool,
    /// Lower-case line text before playing it
    pub fold_case: bool,
}

impl Default for BoardSpec {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            line_length: DEFAULT_LINE_LENGTH,
            characters: DEFAULT_CHARACTERS.to_string(),
            show_grid: false,
            show_controls: true,
            fold_case: true,
        }
    }
}

impl BoardSpec {
    /// Whether switching from `self` to `other` needs a full rebuild.
    pub fn is_structural_change(&self, other: &Self) -> bool {
        self.lines != other.lines
            || self.line_length != other.line_length
            || self.characters != other.characters
    }
}

/// A line's configuration bound to its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct LineConfig {
    /// Identity assigned at mount
    pub id: LineId,
    /// What the caller asked for
    pub descriptor: LineDescriptor,
}

/// A configured line and the controller animating it.
#[derive(Debug)]
pub struct MountedLine {
    config: LineConfig,
    flipper: FlipLine,
}

impl MountedLine {
    /// The line's configuration.
    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    /// The controller owning the line's slots.
    pub fn flipper(&self) -> &FlipLine {
        &self.flipper
    }
}

/// Characters showing on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSnapshot {
    /// Line identity
    pub id: String,
    /// Configured alignment
    pub alignment: Alignment,
    /// Characters on display
    pub text: String,
}

/// Characters showing on the whole board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    /// Slots per line
    pub line_length: usize,
    /// Lines, top to bottom
    pub lines: Vec<LineSnapshot>,
}

impl BoardSnapshot {
    /// Line texts only.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

/// The split-flap board.
///
/// Owns every line controller. Structural reconfiguration tears the whole
/// board down and rebuilds it; dropping the board releases every timeline.
#[derive(Debug)]
pub struct Board {
    spec: BoardSpec,
    alphabet: Arc<Alphabet>,
    engine: Arc<dyn TimelineEngine>,
    pacer: Box<dyn StepPacer>,
    lines: Vec<MountedLine>,
}

impl Board {
    /// Build every line and play it once.
    pub fn mount(
        spec: BoardSpec,
        engine: Arc<dyn TimelineEngine>,
        pacer: Box<dyn StepPacer>,
        now: Duration,
    ) -> Self {
        let mut board = Self {
            alphabet: Arc::new(Alphabet::new(&spec.characters)),
            spec,
            engine,
            pacer,
            lines: Vec::new(),
        };
        board.build(now);
        board
    }

    fn build(&mut self, now: Duration) {
        self.alphabet = Arc::new(Alphabet::new(&self.spec.characters));
        self.lines = self
            .spec
            .lines
            .iter()
            .map(|descriptor| {
                let flipper = FlipLine::new(
                    Arc::clone(&self.alphabet),
                    Arc::clone(&self.engine),
                    self.spec.line_length,
                )
                .with_pad(descriptor.pad)
                .with_color(descriptor.color);
                MountedLine {
                    config: LineConfig {
                        id: flipper.id(),
                        descriptor: descriptor.clone(),
                    },
                    flipper,
                }
            })
            .collect();
        tracing::debug!(
            lines = self.lines.len(),
            line_length = self.spec.line_length,
            alphabet = self.alphabet.len(),
            "board mounted"
        );
        self.play_all(now);
    }

    /// Apply a new spec. Returns `true` when the board was rebuilt.
    ///
    /// Changing the lines, the line length or the characters rebuilds
    /// everything from scratch; display toggles are applied in place.
    pub fn reconfigure(&mut self, spec: BoardSpec, now: Duration) -> bool {
        let structural = self.spec.is_structural_change(&spec);
        self.spec = spec;
        if structural {
            self.teardown(now);
            self.build(now);
        }
        structural
    }

    /// Cancel every flip and drop every line.
    pub fn teardown(&mut self, now: Duration) {
        for line in &mut self.lines {
            line.flipper.cancel(now);
        }
        let count = self.lines.len();
        self.lines.clear();
        tracing::debug!(lines = count, "board torn down");
    }

    /// Flip every line to its configured text.
    pub fn play_all(&mut self, now: Duration) {
        let fold_case = self.spec.fold_case;
        for line in &mut self.lines {
            let descriptor = &line.config.descriptor;
            let text = if fold_case {
                descriptor.text.to_lowercase()
            } else {
                descriptor.text.clone()
            };
            line.flipper
                .run(&text, descriptor.alignment, now, self.pacer.as_mut());
        }
        tracing::debug!(lines = self.lines.len(), "play");
    }

    /// Flip every line to blanks.
    pub fn blank_all(&mut self, now: Duration) {
        for line in &mut self.lines {
            line.flipper
                .run("", Alignment::Left, now, self.pacer.as_mut());
        }
        tracing::debug!(lines = self.lines.len(), "blank");
    }

    /// Flip the background grid on or off.
    pub fn toggle_grid(&mut self) -> bool {
        self.spec.show_grid = !self.spec.show_grid;
        self.spec.show_grid
    }

    /// Mounted lines, top to bottom.
    pub fn lines(&self) -> &[MountedLine] {
        &self.lines
    }

    /// The spec the board was last mounted with.
    pub fn spec(&self) -> &BoardSpec {
        &self.spec
    }

    /// Slots per line.
    pub fn line_length(&self) -> usize {
        self.spec.line_length
    }

    /// The alphabet shared by every slot.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Whether the grid is drawn.
    pub fn show_grid(&self) -> bool {
        self.spec.show_grid
    }

    /// Whether the Play and Blank actions are offered.
    pub fn show_controls(&self) -> bool {
        self.spec.show_controls
    }

    /// Whether any slot is still flipping.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.lines.iter().any(|l| l.flipper.is_animating(now))
    }

    /// Characters showing at `now`.
    pub fn snapshot(&self, now: Duration) -> BoardSnapshot {
        BoardSnapshot {
            line_length: self.spec.line_length,
            lines: self
                .lines
                .iter()
                .map(|l| LineSnapshot {
                    id: l.config.id.to_string(),
                    alignment: l.config.descriptor.alignment,
                    text: l.flipper.text(now),
                })
                .collect(),
        }
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        // Dropping the slots releases their timelines.
        self.lines.clear();
    }
}
