//! zinc-sem - Semantic context for the C front-end.
//!
//! This crate holds the pieces of semantic state the parser consults
//! while building the AST:
//!
//! - [`TypeStore`], the arena of canonical [`Type`] values,
//! - [`DeclSpec`], the declaration-specifier accumulator and its
//!   collapse into a canonical type,
//! - [`ScopeStack`], the lexically-nested mapping from identifiers to
//!   declarations and from type names to types.
//!
//! Name resolution is a pure scope query performed at parse time; in
//! particular, whether an identifier is a typedef name (C's type/variable
//! ambiguity) is answered by [`ScopeStack::is_type_name`].

pub mod declspec;
pub mod scope;
pub mod types;

pub use declspec::{DeclSpec, Sign, StorageClass, TypeSpec, Width};
pub use scope::{ScopeFrame, ScopeStack};
pub use types::{Member, RecordKind, Type, TypeKind, TypeStore};
