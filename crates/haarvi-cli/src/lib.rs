//! CLI library components for the HAARVI follow-up scheduler.

pub mod commands;
pub mod logging;
pub mod types;
