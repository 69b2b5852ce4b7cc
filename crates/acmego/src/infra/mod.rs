//! Infrastructure adapters for acme, the plumber, subprocesses, HTTP and config.

pub mod acme;
pub mod config;
pub mod logging;
pub mod playground;
pub mod plumb;
pub mod process;
