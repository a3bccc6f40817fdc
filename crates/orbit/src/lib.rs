//! Rotation and animation core for items laid out on a circle.
//!
//! The crate owns no window or widget. Hosts plug in through a handful of
//! traits: [`RenderSink`] receives per-item placements, [`FrameScheduler`]
//! delivers display frames, [`Timer`] backs the resize debounce and
//! [`PointerSource`] feeds the gesture tracker.

pub mod debounce;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod transition;

#[cfg(test)]
pub(crate) mod testing;

pub use debounce::{Debouncer, Timer};
pub use easing::Easing;
pub use error::OrbitError;
pub use geometry::{Point, Projection};
pub use gesture::{DragDelta, GestureTracker, PointerEvent, PointerSource};
pub use layout::{
    Carousel, Direction, Item, Motion, Phase, Placement, Radius, RenderSink, RotationState,
};
pub use transition::{FrameScheduler, FrameToken, Step, Transition, Transitioner};
