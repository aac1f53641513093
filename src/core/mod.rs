//! Core utilities shared by the sleep model and the CLI.

pub mod time;

pub use time::{
    duration_to_hours, elapsed_hours, format_hours, parse_duration, parse_instant, split_hours,
};
