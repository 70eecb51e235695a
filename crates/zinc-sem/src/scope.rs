//! The scope stack.
//!
//! Scopes are an ordered stack of frames. Each frame holds two maps: one
//! from identifiers to declarations, one from type names (typedefs and
//! tags) to types. Lookups walk from the innermost frame outward and
//! return the first hit; there is no shadowing diagnostic, the innermost
//! binding wins by definition.
//!
//! The bottom frame is the permanent file scope: it is created with the
//! stack and [`ScopeStack::exit`] never pops it.

use indexmap::IndexMap;
use zinc_util::{CompileError, DeclId, Result, Span, Symbol, TypeId};

/// One lexical scope level
#[derive(Debug, Default)]
pub struct ScopeFrame {
    /// Identifier -> declaration bindings
    decls: IndexMap<Symbol, DeclId>,
    /// Type-name -> type bindings (typedef names)
    types: IndexMap<Symbol, TypeId>,
}

/// Lexically-nested name environment
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    /// Create a stack holding only the file scope
    pub fn new() -> Self {
        Self {
            frames: vec![ScopeFrame::default()],
        }
    }

    /// Push a new innermost frame
    pub fn enter(&mut self) {
        self.frames.push(ScopeFrame::default());
    }

    /// Pop the innermost frame
    ///
    /// The file scope is permanent; a stray `exit` at depth 1 is a
    /// front-end bug.
    pub fn exit(&mut self) {
        debug_assert!(self.frames.len() > 1, "cannot exit the file scope");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Number of frames currently on the stack (file scope included)
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Bind a declaration in the innermost frame
    ///
    /// A duplicate binding at the same level is a fatal redefinition.
    pub fn install_decl(&mut self, name: Symbol, decl: DeclId, span: Span) -> Result<()> {
        let frame = self.frames.last_mut().expect("scope stack is never empty");
        if frame.decls.contains_key(&name) {
            return Err(CompileError::redefinition(
                format!("redefinition of '{}'", name),
                span,
            ));
        }
        frame.decls.insert(name, decl);
        Ok(())
    }

    /// Bind a typedef name in the innermost frame
    pub fn install_type(&mut self, name: Symbol, ty: TypeId) {
        let frame = self.frames.last_mut().expect("scope stack is never empty");
        frame.types.insert(name, ty);
    }

    /// Resolve an identifier to a declaration, innermost frame first
    pub fn lookup_decl(&self, name: Symbol) -> Option<DeclId> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.decls.get(&name).copied())
    }

    /// Resolve a type name, innermost frame first
    pub fn lookup_type(&self, name: Symbol) -> Option<TypeId> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.types.get(&name).copied())
    }

    /// Whether the identifier currently names a type
    ///
    /// This query is how the parser resolves C's type/variable ambiguity.
    pub fn is_type_name(&self, name: Symbol) -> bool {
        self.lookup_type(name).is_some()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
