//! This crate is intended to contain code that is required to provide or
//! improve the observability of a binary. That includes initialization logic
//! for logging as well as logging helper functions.
mod config;
pub mod panic_hook;
pub mod tracing;

pub use config::Config;
