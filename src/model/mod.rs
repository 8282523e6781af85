pub mod board;
pub mod swimlane;
pub mod task;

pub use board::{Board, GroupMode};
pub use swimlane::{Person, StatusColumn, Swimlane};
pub use task::Task;
