//! Command implementations for sleeplog.

mod completions;
mod report;
mod sleep;

pub use completions::completions;
pub use report::{averages, history, status};
pub use sleep::{log, nap, sleep, wake};
