//! AST engine for source parsing and scoped entity extraction.
//!
//! This module provides:
//! - Tree-sitter based Python parsing behind a minimal capability
//!   surface (child enumeration, node kind, declared name, docstring)
//! - The scope visitor that turns one parsed file into a tree of
//!   qualified, documentable entities

pub mod parser;
pub mod visitor;

pub use parser::{ParsedSource, SourceParser};
pub use visitor::{NodeSpan, ScopeVisitor, ScopedKind, ScopedNode};
