//! A fixed-length row of flap slots.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::alphabet::{Alphabet, BLANK};
use super::slot::{FlipPlan, Slot};
use super::timeline::{StepPacer, TimelineEngine};

/// Which edge of the line text hugs. Padding goes on the opposite side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Text starts at the first slot
    #[default]
    Left,
    /// Text ends at the last slot
    Right,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Stable identity of a mounted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(Uuid);

impl LineId {
    /// Allocate a fresh identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Truncate `text` to `length` characters, then pad with blanks on the side
/// opposite `alignment`.
///
/// Truncation keeps the leading characters for both alignments.
pub fn compose(text: &str, length: usize, alignment: Alignment) -> Vec<char> {
    let mut chars: Vec<char> = text.chars().take(length).collect();
    let missing = length - chars.len();
    match alignment {
        Alignment::Left => chars.extend(std::iter::repeat(BLANK).take(missing)),
        Alignment::Right => {
            chars.splice(0..0, std::iter::repeat(BLANK).take(missing));
        }
    }
    chars
}

/// Owns the slots of one line and fans text out to them.
#[derive(Debug)]
pub struct FlipLine {
    id: LineId,
    alphabet: Arc<Alphabet>,
    engine: Arc<dyn TimelineEngine>,
    slots: Vec<Slot>,
    pad: u32,
    color: Color,
}

impl FlipLine {
    /// Create a line of `length` blank slots.
    pub fn new(alphabet: Arc<Alphabet>, engine: Arc<dyn TimelineEngine>, length: usize) -> Self {
        let mut line = Self {
            id: LineId::new(),
            alphabet,
            engine,
            slots: Vec::new(),
            pad: 0,
            color: Color::Reset,
        };
        line.set_length(length);
        line
    }

    /// Set the padding factor of every slot.
    pub fn with_pad(mut self, pad: u32) -> Self {
        self.set_pad(pad);
        self
    }

    /// Set the color of every slot.
    pub fn with_color(mut self, color: Color) -> Self {
        self.set_color(color);
        self
    }

    /// Identity assigned at creation.
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the line has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slots, left to right.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Padding factor shared by the slots.
    pub fn pad(&self) -> u32 {
        self.pad
    }

    /// Color shared by the slots.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Drop every slot and create exactly `length` fresh blank ones.
    pub fn set_length(&mut self, length: usize) {
        let (pad, color) = (self.pad, self.color);
        let alphabet = &self.alphabet;
        let engine = self.engine.as_ref();
        self.slots.clear();
        self.slots.extend((0..length).map(|_| {
            Slot::new(Arc::clone(alphabet), engine)
                .with_pad(pad)
                .with_color(color)
        }));
    }

    /// Change the padding factor without resizing.
    pub fn set_pad(&mut self, pad: u32) {
        self.pad = pad;
        for slot in &mut self.slots {
            slot.set_pad(pad);
        }
    }

    /// Change the color without resizing.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        for slot in &mut self.slots {
            slot.set_color(color);
        }
    }

    /// Flip the line to show `text`.
    ///
    /// Slot `i` starts `i / length` seconds after the first, so the change
    /// ripples across the line.
    pub fn run(
        &mut self,
        text: &str,
        alignment: Alignment,
        now: Duration,
        pacer: &mut dyn StepPacer,
    ) -> Vec<FlipPlan> {
        let length = self.slots.len();
        let target = compose(text, length, alignment);
        self.slots
            .iter_mut()
            .zip(target)
            .enumerate()
            .map(|(i, (slot, c))| {
                let delay = Duration::from_secs_f64(i as f64 / length as f64);
                slot.flip(c, delay, now, pacer)
            })
            .collect()
    }

    /// Cancel every flip in progress.
    pub fn cancel(&mut self, now: Duration) {
        for slot in &mut self.slots {
            slot.cancel(now);
        }
    }

    /// Whether any slot is still flipping.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.slots.iter().any(|s| s.is_animating(now))
    }

    /// The characters showing at `now`.
    pub fn text(&self, now: Duration) -> String {
        self.slots.iter().map(|s| s.current_char(now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::timeline::{FixedPacer, SnapEngine, TweenEngine};

    fn line(length: usize, engine: Arc<dyn TimelineEngine>) -> FlipLine {
        FlipLine::new(Arc::new(Alphabet::default()), engine, length)
    }

    #[test]
    fn test_compose_pads_opposite_alignment() {
        assert_eq!(
            compose("Hi", 6, Alignment::Right).iter().collect::<String>(),
            "    Hi"
        );
        assert_eq!(
            compose("hi", 6, Alignment::Left).iter().collect::<String>(),
            "hi    "
        );
    }

    #[test]
    fn test_compose_truncates() {
        assert_eq!(
            compose("component", 4, Alignment::Right)
                .iter()
                .collect::<String>(),
            "comp"
        );
        assert_eq!(compose("", 3, Alignment::Left), vec![' ', ' ', ' ']);
        assert!(compose("abc", 0, Alignment::Left).is_empty());
    }

    #[test]
    fn test_run_settles_on_composed_text() {
        let mut line = line(6, Arc::new(SnapEngine::new()));
        let mut pacer = FixedPacer(0.03);
        line.run("hi", Alignment::Right, Duration::ZERO, &mut pacer);
        assert_eq!(line.text(Duration::ZERO), "    hi");
    }

    #[test]
    fn test_unknown_characters_render_blank() {
        let mut line = line(4, Arc::new(SnapEngine::new()));
        let mut pacer = FixedPacer(0.03);
        line.run("a#B!", Alignment::Left, Duration::ZERO, &mut pacer);
        assert_eq!(line.text(Duration::ZERO), "a  !");
    }

    #[test]
    fn test_delays_ripple_left_to_right() {
        let mut line = line(4, Arc::new(TweenEngine::new())).with_pad(1);
        let mut pacer = FixedPacer(0.03);
        let plans = line.run("abcd", Alignment::Left, Duration::ZERO, &mut pacer);

        let delays: Vec<f64> = plans.iter().map(|p| p.delay.as_secs_f64()).collect();
        assert_eq!(delays, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_second_identical_run_has_no_shift() {
        let mut line = line(8, Arc::new(TweenEngine::new())).with_pad(2);
        let mut pacer = FixedPacer(0.03);
        line.run("again", Alignment::Right, Duration::ZERO, &mut pacer);

        let settled = Duration::from_secs(60);
        assert!(!line.is_animating(settled));
        let plans = line.run("again", Alignment::Right, settled, &mut pacer);
        assert!(plans.iter().all(|p| p.steps() == 0));
        assert_eq!(line.text(settled), "   again");
    }

    #[test]
    fn test_set_length_replaces_slots() {
        let engine = Arc::new(TweenEngine::new());
        let mut line = line(12, engine.clone());
        let mut pacer = FixedPacer(0.03);
        line.run("splitflap", Alignment::Left, Duration::ZERO, &mut pacer);
        assert!(line.is_animating(Duration::from_millis(10)));

        line.set_length(5);
        assert_eq!(line.len(), 5);
        assert_eq!(engine.live_timelines(), 5);
        assert!(!line.is_animating(Duration::from_millis(10)));
        assert_eq!(line.text(Duration::ZERO), "     ");
    }

    #[test]
    fn test_pad_and_color_apply_to_every_slot() {
        let mut line = line(3, Arc::new(SnapEngine::new()));
        line.set_pad(4);
        line.set_color(Color::Yellow);
        assert!(line.slots().iter().all(|s| s.pad() == 4));
        assert!(line.slots().iter().all(|s| s.color() == Color::Yellow));
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn test_line_ids_are_unique() {
        let engine: Arc<dyn TimelineEngine> = Arc::new(SnapEngine::new());
        let a = line(1, Arc::clone(&engine));
        let b = line(1, engine);
        assert_ne!(a.id(), b.id());
    }
}
