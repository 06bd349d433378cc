//! The split-flap board.
//!
//! Leaf to root: [`Alphabet`] (cyclic character set), [`Slot`] (one flap
//! and its flip math), [`FlipLine`] (a fixed-length row of slots) and
//! [`Board`] (every line shown together). Animation backends plug in
//! through [`TimelineEngine`].

pub mod alphabet;
pub mod line;
pub mod slot;
pub mod surface;
pub mod timeline;

pub use alphabet::{Alphabet, BLANK, DEFAULT_CHARACTERS};
pub use line::{compose, Alignment, FlipLine, LineId};
pub use slot::{Face, FlipPlan, Slot, SlotFaces};
pub use surface::{
    Board, BoardSnapshot, BoardSpec, LineConfig, LineDescriptor, LineSnapshot, MountedLine,
    DEFAULT_LINE_LENGTH,
};
pub use timeline::{
    Clock, FixedPacer, ManualClock, RandomPacer, SnapEngine, StepPacer, SystemClock, Timeline,
    TimelineEngine, TweenEngine,
};
