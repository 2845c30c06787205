//! Generic filter-chain engine.
//!
//! This module provides:
//! - The `Handler` trait: a single processing stage that may forward
//!   zero or more items to its successor
//! - `Chain`: an ordered sequence of handlers terminated by a `Sink`
//! - File-path stages for glob expansion and pattern exclusion

pub mod file_filters;
pub mod handler;

pub use file_filters::{ExcludeHandler, GlobExpandHandler};
pub use handler::{Chain, Handler, Next, Sink};
