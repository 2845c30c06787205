//! docscout library
//!
//! Discovers Python source files under a root directory, parses each
//! into a syntax tree, and extracts a hierarchy of named, documentable
//! entities (modules, classes, functions, async functions) with their
//! qualified scope paths and docstrings. Discovery and record
//! processing run through composable filter chains; rendering is left
//! to downstream consumers.

pub mod ast_engine;
pub mod chain;
pub mod config;
pub mod error;
pub mod pipeline;

pub use ast_engine::{NodeSpan, ParsedSource, ScopeVisitor, ScopedKind, ScopedNode, SourceParser};
pub use chain::{Chain, ExcludeHandler, GlobExpandHandler, Handler, Next, Sink};
pub use config::ExtractConfig;
pub use error::ExtractError;
pub use pipeline::{Pipeline, PipelineBuilder};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ast_engine::{ScopeVisitor, ScopedKind, ScopedNode};
    pub use crate::chain::{Chain, Handler, Next, Sink};
    pub use crate::config::ExtractConfig;
    pub use crate::error::ExtractError;
    pub use crate::pipeline::{Pipeline, PipelineBuilder};
}

/// Default include pattern for source discovery
pub const DEFAULT_INCLUDE_PATTERN: &str = "**/*.py";
