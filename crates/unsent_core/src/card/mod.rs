//! Card presentation engine.
//!
//! # Responsibility
//! - Own one explicit state object per mounted card (flip, effect arming,
//!   typewriter prompt).
//! - Drive timed transitions from cancellable timers tied to the card's
//!   mount lifetime.
//! - Render card faces and the detail panel from state plus the style
//!   resolver.
//!
//! # Invariants
//! - Each mount starts at the front face with the effect waiting.
//! - Unmounting cancels every timer of that card; a timer that fires for a
//!   missing card, or through a replaced handle, has no effect.
//! - The typewriter never changes flip or effect state.

pub mod effect;
pub mod engine;
pub mod render;
pub mod timer;
pub mod typewriter;
