//! Pipeline composition: file discovery, per-file extraction, and the
//! node chain over produced records.
//!
//! The whole pipeline is single-threaded and synchronous; ordering is
//! deterministic end to end. File-chain output order is preserved into
//! the per-file extraction order, and within a file the visitor emits
//! entities in lexical source order.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::ast_engine::{ScopeVisitor, ScopedNode, SourceParser};
use crate::chain::{Chain, ExcludeHandler, GlobExpandHandler, Handler};
use crate::config::ExtractConfig;
use crate::error::ExtractError;

/// Accumulates the two handler lists and builds a [`Pipeline`].
///
/// Append-only; both `add_*` methods return the builder for chaining.
pub struct PipelineBuilder {
    file_handlers: Vec<Box<dyn Handler<PathBuf>>>,
    node_handlers: Vec<Box<dyn Handler<ScopedNode>>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            file_handlers: Vec::new(),
            node_handlers: Vec::new(),
        }
    }

    /// Append a stage to the file chain.
    pub fn add_file_handler(mut self, handler: impl Handler<PathBuf> + 'static) -> Self {
        self.file_handlers.push(Box::new(handler));
        self
    }

    /// Append a stage to the node chain.
    pub fn add_node_handler(mut self, handler: impl Handler<ScopedNode> + 'static) -> Self {
        self.node_handlers.push(Box::new(handler));
        self
    }

    /// Wrap both handler lists in chains.
    pub fn build(self) -> Pipeline {
        Pipeline {
            file_chain: Chain::new(self.file_handlers),
            node_chain: Chain::new(self.node_handlers),
            parser: SourceParser::new(),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the file chain and the node chain, built once and reused
/// across many files.
pub struct Pipeline {
    file_chain: Chain<PathBuf>,
    node_chain: Chain<ScopedNode>,
    parser: SourceParser,
}

impl Pipeline {
    /// Standard pipeline for a configuration: glob expansion followed
    /// by exclusion on the file side, an empty (echoing) node chain.
    ///
    /// Malformed patterns surface here, at construction.
    pub fn from_config(config: &ExtractConfig) -> Result<Self, ExtractError> {
        Ok(PipelineBuilder::new()
            .add_file_handler(GlobExpandHandler::new(&config.include)?)
            .add_file_handler(ExcludeHandler::new(&config.exclude)?)
            .build())
    }

    /// Feed the root into the file chain; returns the accepted file
    /// paths in discovery order.
    pub fn run_files(&self, root: &Path) -> Result<Vec<PathBuf>, ExtractError> {
        debug!(root = %root.display(), "discovering source files");
        let files = self.file_chain.handle(root.to_path_buf())?;
        info!(count = files.len(), "source files accepted");
        Ok(files)
    }

    /// Extract records from each file, preserving input order.
    ///
    /// Returns one output sequence per file. The first read or parse
    /// failure aborts the whole call; callers wanting per-file
    /// isolation call [`Pipeline::extract_file`] per file instead.
    pub fn run_ast(&self, files: &[PathBuf]) -> Result<Vec<Vec<ScopedNode>>, ExtractError> {
        files.iter().map(|file| self.extract_file(file)).collect()
    }

    /// Parse and visit one file, then run its record tree through the
    /// node chain.
    pub fn extract_file(&self, file: &Path) -> Result<Vec<ScopedNode>, ExtractError> {
        let content = fs::read_to_string(file).map_err(|source| ExtractError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let parsed = self.parser.parse(file, &content)?;

        let module_id = file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("module");
        let tree = ScopeVisitor::visit(&parsed, module_id);
        debug!(module = module_id, entities = tree.flatten().len(), "visited file");

        self.node_chain.handle(tree)
    }
}
