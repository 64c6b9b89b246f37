//! Error taxonomy for the TeX → SVG pipeline.
//!
//! Every variant is terminal for the request. Nothing in this crate retries.

use std::path::PathBuf;
use thiserror::Error;

use crate::compiler::LogExcerpt;

#[derive(Debug, Error)]
pub enum TexError {
    #[error("{compiler} output is either pdf or xdv, got {format}")]
    UnsupportedFormat { compiler: String, format: String },

    #[error("Tex compiler {0} unknown")]
    UnknownCompiler(String),

    #[error("{compiler} failed but did not produce a log file. Check your LaTeX installation.")]
    ToolchainMissing { compiler: String },

    #[error(
        "{compiler} error converting to {}. See log output above or the log file: {}",
        .format.trim_start_matches('.'),
        .log_path.display()
    )]
    CompilationError {
        compiler: String,
        format: String,
        log_path: PathBuf,
        excerpts: Vec<LogExcerpt>,
    },

    #[error(
        "Your installation does not support converting {extension} files to SVG. \
         Consider updating dvisvgm to at least version 2.4."
    )]
    ConversionUnsupported { extension: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
