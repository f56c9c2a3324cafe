//! Starbase: lists worker ship templates and fans them out over SQS

pub mod handler;
pub mod utils;

pub use handler::{process_fanout_records, process_timed_event};
