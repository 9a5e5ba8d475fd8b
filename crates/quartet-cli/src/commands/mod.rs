//! Command implementations.
//!
//! - [`build`] - run the four variants once
//! - [`watch`] - supervise one watcher per variant
//!
//! Each command takes the resolved project root and the engine and returns a
//! `Result`; exit codes are decided by the runner.

pub mod build;
pub mod watch;

pub use build::execute as build_execute;
pub use watch::execute as watch_execute;
