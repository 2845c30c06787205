//! Error types for discovery, parsing, and chain processing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the extraction pipeline.
///
/// Pattern errors are raised at chain construction, never per item.
/// Filesystem and parse errors propagate synchronously out of the
/// `handle` or `run_ast` call that triggered them.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Malformed glob pattern supplied in the configuration.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory enumeration failed mid-walk.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// A source file did not parse; no records are produced for it.
    #[error("syntax error in {path} at line {line}, column {column}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    /// The bundled grammar could not be loaded into the parser.
    #[error("failed to load python grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
}
