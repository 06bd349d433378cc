//! Animation primitives for the flap board.
//!
//! Provides:
//! - Easing functions (linear, quadratic ease-in/out)
//! - Tween interpolation sampled against an explicit clock
//! - Frame pacing for the render loop

use std::time::{Duration, Instant};

/// Easing functions for smooth animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation (no easing)
    Linear,
    /// Quadratic ease-in (slow start)
    EaseIn,
    /// Quadratic ease-out (slow end), the classic `power1.out`
    #[default]
    EaseOut,
    /// Quadratic ease-in-out (slow start and end)
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Trait for values that can be tweened.
pub trait Tweenable: Clone {
    /// Interpolate between two values.
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Tweenable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Tweenable for u8 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        let from = *self as f64;
        let to = *other as f64;
        (from + (to - from) * t).round() as u8
    }
}

impl Tweenable for (u8, u8, u8) {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        (
            self.0.lerp(&other.0, t),
            self.1.lerp(&other.1, t),
            self.2.lerp(&other.2, t),
        )
    }
}

/// A tween between two values, sampled at caller-supplied times.
///
/// Times are offsets from an arbitrary epoch (usually the board's clock),
/// which keeps the tween deterministic under test.
#[derive(Debug, Clone)]
pub struct Tween<T: Tweenable> {
    /// Starting value
    from: T,
    /// Ending value
    to: T,
    /// When the tween was scheduled
    scheduled_at: Duration,
    /// Wait before the value starts moving
    delay: Duration,
    /// Animation duration once started
    duration: Duration,
    /// Easing function
    easing: Easing,
}

impl<T: Tweenable> Tween<T> {
    /// Create a tween scheduled at `now`.
    pub fn new(from: T, to: T, now: Duration, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            scheduled_at: now,
            delay: Duration::ZERO,
            duration,
            easing,
        }
    }

    /// Hold the starting value for `delay` before moving.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// When the tween reaches its target.
    pub fn ends_at(&self) -> Duration {
        self.scheduled_at + self.delay + self.duration
    }

    /// Check if the tween has finished at `now`.
    pub fn is_complete(&self, now: Duration) -> bool {
        now >= self.ends_at()
    }

    /// Progress in `[0, 1]` after easing.
    pub fn progress(&self, now: Duration) -> f64 {
        let start = self.scheduled_at + self.delay;
        if now <= start {
            return 0.0;
        }
        if self.is_complete(now) || self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = (now - start).as_secs_f64();
        self.easing.apply(elapsed / self.duration.as_secs_f64())
    }

    /// Get the value at `now`.
    pub fn value_at(&self, now: Duration) -> T {
        if self.is_complete(now) {
            return self.to.clone();
        }
        self.from.lerp(&self.to, self.progress(now))
    }
}

/// Frame pacing for the render loop.
#[derive(Debug, Clone)]
pub struct AnimationState {
    /// Current frame number
    pub frame: u64,
    /// Target FPS
    pub target_fps: u32,
    /// Frame duration
    pub frame_duration: Duration,
    /// Last update time
    pub last_update: Instant,
}

impl AnimationState {
    /// Create a new animation state with target FPS.
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            frame: 0,
            target_fps,
            frame_duration: Duration::from_secs_f64(1.0 / target_fps as f64),
            last_update: Instant::now(),
        }
    }

    /// Check if enough time has passed for a new frame.
    pub fn should_update(&self) -> bool {
        self.last_update.elapsed() >= self.frame_duration
    }

    /// Time left before the next frame is due.
    pub fn until_next_frame(&self) -> Duration {
        self.frame_duration.saturating_sub(self.last_update.elapsed())
    }

    /// Update the animation state for a new frame.
    pub fn tick(&mut self) {
        if self.should_update() {
            self.frame = self.frame.wrapping_add(1);
            self.last_update = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_linear() {
        let easing = Easing::Linear;
        assert!((easing.apply(0.0) - 0.0).abs() < 0.001);
        assert!((easing.apply(0.5) - 0.5).abs() < 0.001);
        assert!((easing.apply(1.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_easing_ease_in() {
        let easing = Easing::EaseIn;
        assert!(easing.apply(0.5) < 0.5); // Should be slower at start
        assert!((easing.apply(1.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_easing_ease_out() {
        let easing = Easing::EaseOut;
        assert!((easing.apply(0.0) - 0.0).abs() < 0.001);
        assert!(easing.apply(0.5) > 0.5); // Should be faster at start
        assert!((easing.apply(1.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_easing_clamps_input() {
        let easing = Easing::Linear;
        assert!((easing.apply(-0.5) - 0.0).abs() < 0.001);
        assert!((easing.apply(1.5) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_tween_holds_during_delay() {
        let tween = Tween::new(
            0.0_f64,
            10.0_f64,
            Duration::ZERO,
            Duration::from_secs(1),
            Easing::Linear,
        )
        .with_delay(Duration::from_millis(500));

        assert_eq!(tween.value_at(Duration::from_millis(250)), 0.0);
        assert!((tween.value_at(Duration::from_millis(1000)) - 5.0).abs() < 0.001);
        assert_eq!(tween.value_at(Duration::from_millis(1500)), 10.0);
        assert!(tween.is_complete(Duration::from_millis(1500)));
    }

    #[test]
    fn test_zero_duration_tween_completes_immediately() {
        let tween = Tween::new(1.0_f64, 3.0, Duration::from_secs(2), Duration::ZERO, Easing::EaseOut);
        assert_eq!(tween.value_at(Duration::from_secs(2)), 3.0);
    }

    #[test]
    fn test_tween_color() {
        let from = (0_u8, 0_u8, 0_u8);
        let to = (255_u8, 255_u8, 255_u8);
        let result = from.lerp(&to, 0.5);
        assert_eq!(result, (128, 128, 128));
    }

    #[test]
    fn test_animation_state_new() {
        let state = AnimationState::new(60);
        assert_eq!(state.target_fps, 60);
        assert_eq!(state.frame_duration, Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn test_animation_state_zero_fps_is_clamped() {
        let state = AnimationState::new(0);
        assert_eq!(state.target_fps, 1);
    }
}
