//! Application layer: command handlers, the dispatch table and applying results.

pub mod commands;
pub mod outcome;
pub mod registry;
