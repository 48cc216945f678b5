//! Ambient support types shared by every stage of the Tiro compiler.
//!
//! This crate has no knowledge of the IR; it provides the primitives a later
//! stage builds on: a typed arena index (`index_vec`), an interned-string
//! handle (`symbol`), an opaque source location (`span`), and the error
//! types for both (`error`).

pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use error::{SourceMapError, SourceMapResult, SymbolError, SymbolResult};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, SourceRange};
pub use symbol::{InternerStats, Symbol};
