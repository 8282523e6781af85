//! The timeline layout core: pure, UI-free, unit-tested.

pub mod coords;
pub mod grid;
pub mod interact;
pub mod tracks;
pub mod window;

pub use grid::{compose, Metrics, TimelineLayout};
pub use interact::{InteractionController, InteractionState, ResizeEdge};
pub use window::VirtualWindow;
