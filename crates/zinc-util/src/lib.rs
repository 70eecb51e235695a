//! zinc-util - Core utilities and foundation types.
//!
//! This crate provides the types shared by every phase of the zinc
//! compiler:
//!
//! - [`Span`] and [`SourceMap`] for source location tracking,
//! - [`Symbol`] for interned identifier strings,
//! - [`IndexVec`] and the [`Idx`] trait for typed-index storage,
//! - the arena node ids ([`DeclId`], [`StmtId`], [`ExprId`], [`TypeId`]),
//! - [`CompileError`], the fatal diagnostic every phase propagates.
//!
//! The node ids live here rather than in the parser crate so that the
//! semantic crate's scope stack can bind names to declarations without a
//! dependency cycle between the two crates.

pub mod error;
pub mod ids;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use error::{CompileError, ErrorKind, Result};
pub use ids::{DeclId, ExprId, StmtId, TypeId};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;

// Re-export commonly used collection types
pub use indexmap::IndexMap;
pub use rustc_hash::{FxHashMap, FxHashSet};
