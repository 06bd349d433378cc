//! A single flap slot and its flip sequence.
//!
//! A slot is plain data (alphabet, padding factor, color) plus one
//! [`Timeline`] handle holding its scrub position in alphabet steps. The
//! character on display is always derived from that position.

use std::sync::Arc;
use std::time::Duration;

use ratatui::style::Color;

use super::alphabet::Alphabet;
use super::timeline::{StepPacer, Timeline, TimelineEngine};

/// The arithmetic behind one flip request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipPlan {
    /// Alphabet index showing when the request arrived
    pub current: usize,
    /// Alphabet index of the requested character
    pub desired: usize,
    /// Forward cyclic distance from `current` to `desired`
    pub shift: usize,
    /// Extra steps (whole cycles) appended to exaggerate the spin
    pub padding: usize,
    /// Start offset before the flip begins moving
    pub delay: Duration,
    /// Time spent moving
    pub duration: Duration,
}

impl FlipPlan {
    /// Compute shift and padding for a flip from `current` to `desired`.
    pub fn new(alphabet: &Alphabet, current: usize, desired: usize, pad: u32) -> Self {
        let shift = alphabet.forward_shift(current, desired);
        let padding = if current == desired {
            0
        } else {
            pad as usize * alphabet.len()
        };
        Self {
            current,
            desired,
            shift,
            padding,
            delay: Duration::ZERO,
            duration: Duration::ZERO,
        }
    }

    /// Total alphabet steps the flip travels.
    pub fn steps(&self) -> usize {
        self.shift + self.padding
    }
}

/// One of the four overlapping sub-faces of a flap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Character printed on the face
    pub glyph: char,
    /// Rotation about the horizontal hinge, in degrees
    pub rotation: f32,
    /// 0.0 is fully shaded, 1.0 fully lit
    pub brightness: f32,
}

/// The visual state of a flap at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotFaces {
    /// Upper half of the incoming character
    pub unfold_top: Face,
    /// Lower half of the incoming character, swinging down
    pub unfold_bottom: Face,
    /// Upper half of the outgoing character, swinging away
    pub fold_top: Face,
    /// Lower half of the outgoing character
    pub fold_bottom: Face,
    /// Progress through the current step, in `[0, 1)`
    pub progress: f32,
}

impl SlotFaces {
    fn at(alphabet: &Alphabet, position: f64) -> Self {
        let step = position.floor();
        let progress = (position - step) as f32;
        let outgoing = alphabet.char_at(step as usize);
        let incoming = alphabet.char_at(step as usize + 1);

        Self {
            unfold_top: Face {
                glyph: incoming,
                rotation: 0.0,
                brightness: progress,
            },
            unfold_bottom: Face {
                glyph: incoming,
                rotation: 180.0 * (1.0 - progress),
                brightness: 1.0,
            },
            fold_top: Face {
                glyph: outgoing,
                rotation: -180.0 * progress,
                brightness: 1.0,
            },
            fold_bottom: Face {
                glyph: outgoing,
                rotation: 0.0,
                brightness: 1.0 - progress,
            },
            progress,
        }
    }

    /// Face covering the top half of the cell.
    pub fn visible_top(&self) -> Face {
        if self.fold_top.rotation > -90.0 {
            self.fold_top
        } else {
            self.unfold_top
        }
    }

    /// Face covering the bottom half of the cell.
    pub fn visible_bottom(&self) -> Face {
        if self.unfold_bottom.rotation < 90.0 {
            self.unfold_bottom
        } else {
            self.fold_bottom
        }
    }

    /// Whether the flap is between two characters.
    pub fn is_mid_flip(&self) -> bool {
        self.progress > 0.0
    }
}

/// A single character cell of the board.
#[derive(Debug)]
pub struct Slot {
    alphabet: Arc<Alphabet>,
    pad: u32,
    color: Color,
    timeline: Box<dyn Timeline>,
}

impl Slot {
    /// Create a slot resting on the blank.
    pub fn new(alphabet: Arc<Alphabet>, engine: &dyn TimelineEngine) -> Self {
        Self {
            alphabet,
            pad: 0,
            color: Color::Reset,
            timeline: engine.create(),
        }
    }

    /// Set the padding factor.
    pub fn with_pad(mut self, pad: u32) -> Self {
        self.pad = pad;
        self
    }

    /// Set the display color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Padding factor applied to future flips.
    pub fn pad(&self) -> u32 {
        self.pad
    }

    /// Change the padding factor.
    pub fn set_pad(&mut self, pad: u32) {
        self.pad = pad;
    }

    /// Display color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Change the display color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// The alphabet this slot cycles through.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn position(&self, now: Duration) -> f64 {
        self.timeline.position(now).max(0.0)
    }

    /// Character on the folding faces at `now`.
    pub fn current_char(&self, now: Duration) -> char {
        self.alphabet.char_at(self.position(now).floor() as usize)
    }

    /// Visual state of the four sub-faces at `now`.
    pub fn faces(&self, now: Duration) -> SlotFaces {
        SlotFaces::at(&self.alphabet, self.position(now))
    }

    /// Whether a flip is still in progress at `now`.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.timeline.is_animating(now)
    }

    /// Flip forward to `target`, starting after `delay`.
    ///
    /// Characters outside the alphabet become the blank. Any flip still in
    /// flight is replaced; the new one starts from wherever the old one was.
    pub fn flip(
        &mut self,
        target: char,
        delay: Duration,
        now: Duration,
        pacer: &mut dyn StepPacer,
    ) -> FlipPlan {
        let len = self.alphabet.len();
        let position = self.position(now);
        let step = position.floor();
        let raw = step as usize % len;
        let cycle_start = step - raw as f64;

        let current = self.alphabet.index_of(self.alphabet.char_at(raw));
        let desired = self.alphabet.index_of(target);
        let mut plan = FlipPlan::new(&self.alphabet, current, desired, self.pad);
        if plan.steps() == 0 && position > step {
            // Part-way past the requested glyph: go round again to land on it.
            plan.shift = len;
            plan.padding = self.pad as usize * len;
        }

        // The trailing blank shares index 0 with the leading one; continue
        // from the next cycle's leading blank so the flip stays forward.
        let base = if raw == current { current } else { len + current };
        let steps = plan.steps();
        if steps > 0 {
            plan.duration = Duration::from_secs_f64(steps as f64 * pacer.step_seconds());
            plan.delay = delay;
        }

        self.timeline.animate(
            now,
            position - cycle_start,
            (base + steps) as f64,
            plan.delay,
            plan.duration,
        );

        tracing::trace!(
            glyph = %target,
            current = plan.current,
            desired = plan.desired,
            shift = plan.shift,
            padding = plan.padding,
            "flip scheduled"
        );
        plan
    }

    /// Stop any flip in progress.
    pub fn cancel(&mut self, now: Duration) {
        self.timeline.cancel(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::timeline::{FixedPacer, SnapEngine, TweenEngine};
    use crate::ui::tui::animation::Easing;

    fn slot(characters: &str, engine: &dyn TimelineEngine) -> Slot {
        Slot::new(Arc::new(Alphabet::new(characters)), engine)
    }

    #[test]
    fn test_new_slot_is_blank() {
        let engine = SnapEngine::new();
        let slot = slot("abc", &engine);
        assert_eq!(slot.current_char(Duration::ZERO), ' ');
    }

    #[test]
    fn test_plan_matches_examples() {
        let alphabet = Alphabet::new("ab");
        let to_b = FlipPlan::new(&alphabet, 1, 2, 0);
        assert_eq!(to_b.shift, 1);
        let to_blank = FlipPlan::new(&alphabet, 2, 0, 0);
        assert_eq!(to_blank.shift, 2);
    }

    #[test]
    fn test_padding_only_when_moving() {
        let alphabet = Alphabet::new("ab");
        assert_eq!(FlipPlan::new(&alphabet, 1, 2, 2).padding, 8);
        assert_eq!(FlipPlan::new(&alphabet, 1, 1, 2).padding, 0);
    }

    #[test]
    fn test_flip_lands_on_target() {
        let engine = SnapEngine::new();
        let mut slot = slot("ab", &engine).with_pad(3);
        let mut pacer = FixedPacer(0.04);

        for target in ['a', 'b', ' ', 'b', 'a', 'a', ' '] {
            slot.flip(target, Duration::ZERO, Duration::ZERO, &mut pacer);
            assert_eq!(slot.current_char(Duration::ZERO), target);
        }
    }

    #[test]
    fn test_unknown_target_becomes_blank() {
        let engine = SnapEngine::new();
        let mut slot = slot("ab", &engine);
        let mut pacer = FixedPacer(0.04);
        slot.flip('a', Duration::ZERO, Duration::ZERO, &mut pacer);
        let plan = slot.flip('Q', Duration::ZERO, Duration::ZERO, &mut pacer);
        assert_eq!(plan.desired, 0);
        assert_eq!(slot.current_char(Duration::ZERO), ' ');
    }

    #[test]
    fn test_trailing_blank_rebases_forward() {
        let engine = SnapEngine::new();
        let mut slot = slot("ab", &engine);
        let mut pacer = FixedPacer(0.04);

        // 'b' (2) -> blank takes two steps and rests on the leading blank.
        slot.flip('b', Duration::ZERO, Duration::ZERO, &mut pacer);
        let plan = slot.flip(' ', Duration::ZERO, Duration::ZERO, &mut pacer);
        assert_eq!(plan.shift, 2);
        let plan = slot.flip('a', Duration::ZERO, Duration::ZERO, &mut pacer);
        assert_eq!(plan.current, 0);
        assert_eq!(plan.shift, 1);
        assert_eq!(slot.current_char(Duration::ZERO), 'a');
    }

    #[test]
    fn test_mid_flight_trailing_blank_lands_forward() {
        let engine = TweenEngine::new().with_easing(Easing::Linear);
        let mut slot = slot("ab", &engine);
        let mut pacer = FixedPacer(0.1);
        slot.flip('b', Duration::ZERO, Duration::ZERO, &mut pacer);

        let start = Duration::from_secs(1);
        slot.flip(' ', Duration::ZERO, start, &mut pacer);
        let mid = start + Duration::from_millis(150);
        assert_eq!(slot.current_char(mid), ' ');

        let plan = slot.flip('a', Duration::ZERO, mid, &mut pacer);
        assert_eq!(plan.current, 0);
        assert_eq!(plan.shift, 1);
        assert_eq!(slot.current_char(Duration::from_secs(5)), 'a');
    }

    #[test]
    fn test_duration_scales_with_steps() {
        let engine = TweenEngine::new();
        let mut slot = slot("abcd", &engine).with_pad(1);
        let mut pacer = FixedPacer(0.05);
        let plan = slot.flip('c', Duration::ZERO, Duration::ZERO, &mut pacer);

        // shift 3 plus one full padding cycle of 6 steps
        assert_eq!(plan.steps(), 9);
        assert!((plan.duration.as_secs_f64() - 0.45).abs() < 1e-9);
        assert!(slot.is_animating(Duration::from_millis(200)));
        assert_eq!(slot.current_char(Duration::from_millis(450)), 'c');
    }

    #[test]
    fn test_same_character_is_a_no_op() {
        let engine = TweenEngine::new();
        let mut slot = slot("abcd", &engine).with_pad(4);
        let mut pacer = FixedPacer(0.05);
        slot.flip('b', Duration::ZERO, Duration::ZERO, &mut pacer);

        let settled = Duration::from_secs(10);
        let plan = slot.flip('b', Duration::ZERO, settled, &mut pacer);
        assert_eq!(plan.steps(), 0);
        assert!(!slot.is_animating(settled));
        assert_eq!(slot.current_char(settled), 'b');
    }

    #[test]
    fn test_retarget_mid_flight_keeps_moving_forward() {
        let engine = TweenEngine::new();
        let alphabet = Arc::new(Alphabet::default());
        let mut slot = Slot::new(Arc::clone(&alphabet), &engine);
        let mut pacer = FixedPacer(0.05);
        slot.flip('z', Duration::ZERO, Duration::ZERO, &mut pacer);

        let mid = Duration::from_millis(300);
        let before = alphabet.index_of(slot.current_char(mid));
        assert!(before > 0 && before < alphabet.index_of('z'));

        let plan = slot.flip('e', Duration::ZERO, mid, &mut pacer);
        assert_eq!(plan.current, before);
        let mut last = slot.current_char(mid);
        let mut prev_index = alphabet.index_of(last);
        let mut t = mid;
        let end = mid + plan.duration;
        let mut wrapped = false;
        while t <= end {
            let c = slot.current_char(t);
            let index = alphabet.index_of(c);
            if index < prev_index {
                assert!(!wrapped, "moved backwards more than one wrap");
                wrapped = true;
            }
            prev_index = index;
            last = c;
            t += Duration::from_millis(5);
        }
        assert!(wrapped);
        assert_eq!(slot.current_char(end), 'e');
        assert_eq!(last, 'e');
    }

    #[test]
    fn test_retarget_to_folding_glyph_goes_round() {
        let engine = TweenEngine::new().with_easing(Easing::Linear);
        let mut slot = slot("abcd", &engine);
        let mut pacer = FixedPacer(0.1);
        slot.flip('d', Duration::ZERO, Duration::ZERO, &mut pacer);

        let mid = Duration::from_millis(150);
        assert_eq!(slot.current_char(mid), 'a');
        assert!((slot.faces(mid).progress - 0.5).abs() < 1e-6);

        let plan = slot.flip('a', Duration::ZERO, mid, &mut pacer);
        assert_eq!(plan.current, plan.desired);
        assert_eq!(plan.shift, 6);
        assert!(slot.is_animating(mid + Duration::from_millis(10)));

        let mut last = slot.position(mid);
        let end = mid + plan.duration;
        let mut t = mid;
        while t <= end {
            let position = slot.position(t);
            assert!(position >= last, "position went from {last} to {position}");
            last = position;
            t += Duration::from_millis(5);
        }
        assert!(!slot.faces(end).is_mid_flip());
        assert_eq!(slot.current_char(end), 'a');
    }

    #[test]
    fn test_faces_show_two_glyphs_mid_flip() {
        let alphabet = Alphabet::new("ab");
        let faces = SlotFaces::at(&alphabet, 1.25);
        assert_eq!(faces.fold_top.glyph, 'a');
        assert_eq!(faces.unfold_top.glyph, 'b');
        assert!(faces.is_mid_flip());
        assert_eq!(faces.visible_top().glyph, 'a');
        assert_eq!(faces.visible_bottom().glyph, 'a');

        let faces = SlotFaces::at(&alphabet, 1.75);
        assert_eq!(faces.visible_top().glyph, 'b');
        assert_eq!(faces.visible_bottom().glyph, 'b');
        assert!((faces.unfold_top.brightness - 0.75).abs() < 1e-6);
        assert!((faces.fold_bottom.brightness - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_settled_faces_show_one_glyph() {
        let alphabet = Alphabet::new("ab");
        let faces = SlotFaces::at(&alphabet, 2.0);
        assert!(!faces.is_mid_flip());
        assert_eq!(faces.visible_top().glyph, 'b');
        assert_eq!(faces.visible_bottom().glyph, 'b');
    }
}
