//! Arena node identifiers.
//!
//! The AST and the type table are id-indexed arenas; nodes reference each
//! other through these handles rather than through owned pointers. The ids
//! are defined here, in the foundation crate, so that the scope stack in
//! `zinc-sem` can bind names to parser-arena declarations without the two
//! crates depending on each other.

use crate::define_idx;

define_idx!(
    /// Handle to a declaration in the AST arena
    DeclId
);

define_idx!(
    /// Handle to a statement in the AST arena
    StmtId
);

define_idx!(
    /// Handle to an expression in the AST arena
    ExprId
);

define_idx!(
    /// Handle to a type in the type table
    TypeId
);

impl DeclId {
    /// Reserved handle for not-yet-resolved declarations
    pub const DUMMY: DeclId = DeclId(u32::MAX);
}

impl TypeId {
    /// Reserved handle for not-yet-synthesised types
    pub const DUMMY: TypeId = TypeId(u32::MAX);
}
