//! Workflow execution: scheduling, state handling, and run reporting.

mod executor;
mod observer;
mod options;

pub use executor::Engine;
pub use observer::{RunObserver, RunProgress};
pub use options::{RunOptions, RunSummary};
