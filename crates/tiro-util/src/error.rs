//! Error types for the ambient support crate.
//!
//! `tiro-ir` itself raises no recoverable errors: its precondition
//! violations are program bugs that abort via `debug_assert!`/`panic!`. The
//! error types below cover the two places this support crate's own services
//! can be misused by a caller outside this workspace's scope (a lowering
//! collaborator driving the interner or a source map).

use thiserror::Error;

/// Error type for symbol interning operations.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("failed to intern symbol: {0}")]
    InternFailed(String),

    #[error("symbol not found: index {index}")]
    NotFound { index: u32 },
}

/// Error type for source map operations.
#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("invalid source range: start {start} > end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("source range out of bounds: file has {file_len} bytes, range is {range_start}..{range_end}")]
    RangeOutOfBounds {
        file_len: usize,
        range_start: usize,
        range_end: usize,
    },

    #[error("invalid line number: {line} (file has {max_lines} lines)")]
    InvalidLineNumber { line: usize, max_lines: usize },
}

pub type SymbolResult<T> = std::result::Result<T, SymbolError>;
pub type SourceMapResult<T> = std::result::Result<T, SourceMapError>;
