//! The animation engine seam.
//!
//! A slot never talks to a concrete animation backend. It owns a boxed
//! [`Timeline`] created by whatever [`TimelineEngine`] the board was built
//! with, and all sampling happens at explicit times handed out by a
//! [`Clock`].

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ui::tui::animation::{Easing, Tween};

/// Scrub position of one slot, measured in alphabet steps.
pub trait Timeline: fmt::Debug {
    /// Position at `now`.
    fn position(&self, now: Duration) -> f64;

    /// Replace any in-flight animation with one from `from` to `to`.
    fn animate(&mut self, now: Duration, from: f64, to: f64, delay: Duration, duration: Duration);

    /// Stop animating, freezing at the position reached by `now`.
    fn cancel(&mut self, now: Duration);

    /// Whether the position is still changing at `now`.
    fn is_animating(&self, now: Duration) -> bool;
}

/// Factory for slot timelines.
pub trait TimelineEngine: fmt::Debug {
    /// Create a timeline resting at position 0 (the blank).
    fn create(&self) -> Box<dyn Timeline>;

    /// Number of timelines created by this engine that are still alive.
    fn live_timelines(&self) -> usize;
}

/// Decrements the owning engine's live count when dropped.
#[derive(Debug)]
struct LiveToken(Arc<AtomicUsize>);

impl LiveToken {
    fn issue(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveToken {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Eased tween backend used by the interactive display.
#[derive(Debug, Default)]
pub struct TweenEngine {
    easing: Easing,
    live: Arc<AtomicUsize>,
}

impl TweenEngine {
    /// Create an engine using quadratic ease-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

impl TimelineEngine for TweenEngine {
    fn create(&self) -> Box<dyn Timeline> {
        Box::new(TweenTimeline {
            rest: 0.0,
            tween: None,
            easing: self.easing,
            _live: LiveToken::issue(&self.live),
        })
    }

    fn live_timelines(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
struct TweenTimeline {
    rest: f64,
    tween: Option<Tween<f64>>,
    easing: Easing,
    _live: LiveToken,
}

impl Timeline for TweenTimeline {
    fn position(&self, now: Duration) -> f64 {
        match &self.tween {
            Some(tween) => tween.value_at(now),
            None => self.rest,
        }
    }

    fn animate(&mut self, now: Duration, from: f64, to: f64, delay: Duration, duration: Duration) {
        self.rest = to;
        self.tween = Some(Tween::new(from, to, now, duration, self.easing).with_delay(delay));
    }

    fn cancel(&mut self, now: Duration) {
        self.rest = self.position(now);
        self.tween = None;
    }

    fn is_animating(&self, now: Duration) -> bool {
        self.tween.as_ref().is_some_and(|t| !t.is_complete(now))
    }
}

/// Backend that lands on the target immediately.
///
/// Used for headless rendering and when animations are disabled.
#[derive(Debug, Default)]
pub struct SnapEngine {
    live: Arc<AtomicUsize>,
}

impl SnapEngine {
    /// Create a snapping engine.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimelineEngine for SnapEngine {
    fn create(&self) -> Box<dyn Timeline> {
        Box::new(SnapTimeline {
            position: 0.0,
            _live: LiveToken::issue(&self.live),
        })
    }

    fn live_timelines(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
struct SnapTimeline {
    position: f64,
    _live: LiveToken,
}

impl Timeline for SnapTimeline {
    fn position(&self, _now: Duration) -> f64 {
        self.position
    }

    fn animate(&mut self, _now: Duration, _from: f64, to: f64, _delay: Duration, _duration: Duration) {
        self.position = to;
    }

    fn cancel(&mut self, _now: Duration) {}

    fn is_animating(&self, _now: Duration) -> bool {
        false
    }
}

/// Seconds each alphabet step of a flip takes.
pub trait StepPacer: fmt::Debug {
    /// Draw the per-step duration for one flip.
    fn step_seconds(&mut self) -> f64;
}

/// Default bounds for the per-step flip duration, in seconds.
pub const STEP_SECONDS: (f64, f64) = (0.02, 0.06);

/// Uniformly random per-step duration, so repeated flips never look uniform.
#[derive(Debug)]
pub struct RandomPacer {
    rng: StdRng,
    min: f64,
    max: f64,
}

impl RandomPacer {
    /// Pacer seeded from system entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible pacer.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            min: STEP_SECONDS.0,
            max: STEP_SECONDS.1,
        }
    }

    /// Override the bounds. Reversed bounds are swapped.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min.min(max).max(0.0);
        self.max = max.max(min).max(0.0);
        self
    }
}

impl Default for RandomPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepPacer for RandomPacer {
    fn step_seconds(&mut self) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        self.rng.gen_range(self.min..=self.max)
    }
}

/// Constant per-step duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedPacer(pub f64);

impl StepPacer for FixedPacer {
    fn step_seconds(&mut self) -> f64 {
        self.0.max(0.0)
    }
}

/// Source of board time.
pub trait Clock: fmt::Debug {
    /// Time elapsed since the clock's epoch.
    fn now(&self) -> Duration;
}

/// Monotonic wall clock starting at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Start a clock now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Hand-driven clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an absolute time.
    pub fn set(&self, at: Duration) {
        self.now.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
