//! Tasks: named, described sequences of recorded actions, and their storage

pub mod store;
pub mod types;

pub use store::TaskStore;
pub use types::{Action, Task};
