//! Error types for enginepack
//!
//! Structural errors abort the affected output computation and propagate to
//! the build's top level. Non-fatal configuration problems are not errors;
//! they are surfaced as [`crate::config::ConfigWarning`] values.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for composition operations
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Main error type for composition operations
#[derive(Error, Debug)]
pub enum ComposeError {
    /// Two trees merged without `overwrite` both claim the same output path
    #[error("output collision: two trees both produce '{path}'")]
    OutputCollision { path: String },

    /// The include/exclude route-split calls for one engine disagree on
    /// their entry or external arguments
    #[error("route split arguments disagree for engine '{package}'")]
    SplitAmbiguity { package: String },

    /// A filter matched no files and `allow_empty` was not set
    #[error("filter matched no files (include: {patterns:?})")]
    EmptyFilterResult { patterns: Vec<String> },

    /// A concatenation found no input files and `allow_none` was not set
    #[error("no input files found for '{output_file}'")]
    NothingToConcatenate { output_file: String },

    /// A lazy engine is nested inside another lazy engine
    #[error("lazy engine '{inner}' is nested inside lazy engine '{outer}'; nested lazy boundaries are not supported")]
    NestedLazyBoundary { inner: String, outer: String },

    /// An include/exclude glob pattern failed to compile
    #[error("invalid pattern '{pattern}': {message}")]
    BadPattern { pattern: String, message: String },

    /// A directory walk failed while loading an asset tree from disk
    #[error("failed to read asset tree under {root}: {message}")]
    TreeRead { root: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
