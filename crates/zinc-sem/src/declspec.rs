//! Declaration-specifier accumulation and type synthesis.
//!
//! A [`DeclSpec`] is a mutable bag filled in while the parser consumes
//! specifier tokens (`static const unsigned long ...`). After every token
//! the parser may call [`DeclSpec::synthesize`] to collapse the current
//! bag into a canonical type; the synthesis is a pure function of the
//! accumulator state, so equal bags always produce equal type handles.

use zinc_util::{CompileError, Result, Span, TypeId};

use crate::types::TypeStore;

/// Storage class of a declaration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageClass {
    #[default]
    None,
    Typedef,
    Extern,
    Static,
    ThreadLocal,
}

impl StorageClass {
    fn keyword(self) -> &'static str {
        match self {
            StorageClass::None => "",
            StorageClass::Typedef => "typedef",
            StorageClass::Extern => "extern",
            StorageClass::Static => "static",
            StorageClass::ThreadLocal => "_Thread_local",
        }
    }
}

/// Base type-specifier keyword seen so far
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeSpec {
    #[default]
    Unspecified,
    Void,
    Bool,
    Char,
    Int,
    Float,
    Double,
}

impl TypeSpec {
    fn keyword(self) -> &'static str {
        match self {
            TypeSpec::Unspecified => "",
            TypeSpec::Void => "void",
            TypeSpec::Bool => "_Bool",
            TypeSpec::Char => "char",
            TypeSpec::Int => "int",
            TypeSpec::Float => "float",
            TypeSpec::Double => "double",
        }
    }
}

/// Width modifier accumulated from `short`/`long`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Width {
    #[default]
    None,
    Short,
    Long,
    LongLong,
}

/// Sign modifier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sign {
    #[default]
    None,
    Signed,
    Unsigned,
}

/// Mutable accumulator for one declaration's specifiers
///
/// Lives only during parsing; the collapsed [`TypeId`] is what the AST
/// keeps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclSpec {
    /// Storage class; at most one
    pub storage: StorageClass,
    /// `inline` seen
    pub is_inline: bool,
    /// `const` qualifier seen
    pub is_const: bool,
    /// `volatile` qualifier seen
    pub is_volatile: bool,
    /// `restrict` qualifier seen
    pub is_restrict: bool,
    /// `_Atomic` qualifier seen
    pub is_atomic: bool,
    /// Base type keyword
    pub type_spec: TypeSpec,
    /// Width modifiers
    pub width: Width,
    /// Sign modifier
    pub sign: Sign,
    /// Explicit type override (struct/union or typedef name)
    pub override_ty: Option<TypeId>,
}

impl DeclSpec {
    /// Fresh, empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a storage class
    ///
    /// At most one storage class may appear, and `typedef` is mutually
    /// exclusive with `extern`, `static`, `inline` and `_Thread_local`.
    pub fn set_storage(&mut self, storage: StorageClass, span: Span) -> Result<()> {
        if self.storage != StorageClass::None {
            return Err(CompileError::type_synthesis(
                format!(
                    "cannot combine '{}' with earlier '{}'",
                    storage.keyword(),
                    self.storage.keyword()
                ),
                span,
            ));
        }
        if storage == StorageClass::Typedef && self.is_inline {
            return Err(CompileError::type_synthesis(
                "cannot combine 'typedef' with 'inline'",
                span,
            ));
        }
        self.storage = storage;
        Ok(())
    }

    /// Record `inline`
    pub fn set_inline(&mut self, span: Span) -> Result<()> {
        if self.storage == StorageClass::Typedef {
            return Err(CompileError::type_synthesis(
                "cannot combine 'typedef' with 'inline'",
                span,
            ));
        }
        self.is_inline = true;
        Ok(())
    }

    /// Record a base type keyword
    pub fn set_type_spec(&mut self, spec: TypeSpec, span: Span) -> Result<()> {
        if self.type_spec != TypeSpec::Unspecified || self.override_ty.is_some() {
            return Err(CompileError::type_synthesis(
                format!("two or more data types in declaration ('{}')", spec.keyword()),
                span,
            ));
        }
        self.type_spec = spec;
        Ok(())
    }

    /// Record `short`
    pub fn add_short(&mut self, span: Span) -> Result<()> {
        match self.width {
            Width::None => {
                self.width = Width::Short;
                Ok(())
            }
            _ => Err(CompileError::type_synthesis(
                "cannot combine 'short' with earlier width",
                span,
            )),
        }
    }

    /// Record `long`; a second `long` makes `long long`
    pub fn add_long(&mut self, span: Span) -> Result<()> {
        match self.width {
            Width::None => {
                self.width = Width::Long;
                Ok(())
            }
            Width::Long => {
                self.width = Width::LongLong;
                Ok(())
            }
            _ => Err(CompileError::type_synthesis(
                "cannot combine 'long' with earlier width",
                span,
            )),
        }
    }

    /// Record `signed` or `unsigned`
    pub fn set_sign(&mut self, sign: Sign, span: Span) -> Result<()> {
        if self.sign != Sign::None && self.sign != sign {
            return Err(CompileError::type_synthesis(
                "cannot combine 'signed' and 'unsigned'",
                span,
            ));
        }
        self.sign = sign;
        Ok(())
    }

    /// Record an explicit type (struct/union or typedef name)
    pub fn set_override(&mut self, ty: TypeId, span: Span) -> Result<()> {
        if self.type_spec != TypeSpec::Unspecified || self.override_ty.is_some() {
            return Err(CompileError::type_synthesis(
                "two or more data types in declaration",
                span,
            ));
        }
        self.override_ty = Some(ty);
        Ok(())
    }

    /// Returns true if this declaration is a typedef
    pub fn is_typedef(&self) -> bool {
        self.storage == StorageClass::Typedef
    }

    /// Collapse the bag into a canonical type
    ///
    /// Implements the C11 specifier table; any combination outside the
    /// table is a fatal `TypeSynthesis` error. A bag with no type
    /// information at all falls back to `int`, so that intermediate
    /// synthesis while specifiers are still being consumed stays valid.
    pub fn synthesize(&self, store: &TypeStore, span: Span) -> Result<TypeId> {
        if let Some(ty) = self.override_ty {
            if self.width != Width::None || self.sign != Sign::None {
                return Err(CompileError::type_synthesis(
                    "width or sign modifiers cannot apply to this type",
                    span,
                ));
            }
            return Ok(ty);
        }

        let no_modifiers = self.width == Width::None && self.sign == Sign::None;

        match self.type_spec {
            TypeSpec::Void => {
                if !no_modifiers {
                    return Err(CompileError::type_synthesis(
                        "modifiers cannot apply to 'void'",
                        span,
                    ));
                }
                Ok(TypeStore::VOID)
            }
            TypeSpec::Bool => {
                if !no_modifiers {
                    return Err(CompileError::type_synthesis(
                        "modifiers cannot apply to '_Bool'",
                        span,
                    ));
                }
                Ok(TypeStore::BOOL)
            }
            TypeSpec::Char => {
                if self.width != Width::None {
                    return Err(CompileError::type_synthesis(
                        "width modifiers cannot apply to 'char'",
                        span,
                    ));
                }
                Ok(match self.sign {
                    Sign::Unsigned => TypeStore::UCHAR,
                    _ => TypeStore::CHAR,
                })
            }
            TypeSpec::Float => {
                if !no_modifiers {
                    return Err(CompileError::type_synthesis(
                        "modifiers cannot apply to 'float'",
                        span,
                    ));
                }
                Ok(TypeStore::FLOAT)
            }
            TypeSpec::Double => {
                if self.sign != Sign::None {
                    return Err(CompileError::type_synthesis(
                        "sign modifiers cannot apply to 'double'",
                        span,
                    ));
                }
                match self.width {
                    Width::None => Ok(TypeStore::DOUBLE),
                    Width::Long => Ok(TypeStore::LONG_DOUBLE),
                    _ => Err(CompileError::type_synthesis(
                        "invalid width for 'double'",
                        span,
                    )),
                }
            }
            TypeSpec::Int | TypeSpec::Unspecified => {
                let unsigned = self.sign == Sign::Unsigned;
                Ok(match self.width {
                    Width::Short => {
                        if unsigned {
                            TypeStore::USHORT
                        } else {
                            TypeStore::SHORT
                        }
                    }
                    Width::Long => {
                        if unsigned {
                            TypeStore::ULONG
                        } else {
                            TypeStore::LONG
                        }
                    }
                    Width::LongLong => {
                        if unsigned {
                            TypeStore::ULONG_LONG
                        } else {
                            TypeStore::LONG_LONG
                        }
                    }
                    Width::None => {
                        if unsigned {
                            TypeStore::UINT
                        } else {
                            TypeStore::INT
                        }
                    }
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zinc_util::{ErrorKind, Span};

    fn synth(build: impl FnOnce(&mut DeclSpec) -> Result<()>) -> Result<TypeId> {
        let store = TypeStore::new();
        let mut spec = DeclSpec::new();
        build(&mut spec)?;
        spec.synthesize(&store, Span::DUMMY)
    }

    #[test]
    fn test_plain_int() {
        let ty = synth(|s| s.set_type_spec(TypeSpec::Int, Span::DUMMY)).unwrap();
        assert_eq!(ty, TypeStore::INT);
    }

    #[test]
    fn test_unsigned_long_long() {
        // "long long unsigned" in any order collapses to the same type.
        let ty = synth(|s| {
            s.add_long(Span::DUMMY)?;
            s.add_long(Span::DUMMY)?;
            s.set_sign(Sign::Unsigned, Span::DUMMY)
        })
        .unwrap();
        assert_eq!(ty, TypeStore::ULONG_LONG);

        let ty2 = synth(|s| {
            s.set_sign(Sign::Unsigned, Span::DUMMY)?;
            s.add_long(Span::DUMMY)?;
            s.add_long(Span::DUMMY)
        })
        .unwrap();
        assert_eq!(ty, ty2);
    }

    #[test]
    fn test_short_int() {
        let ty = synth(|s| {
            s.add_short(Span::DUMMY)?;
            s.set_type_spec(TypeSpec::Int, Span::DUMMY)
        })
        .unwrap();
        assert_eq!(ty, TypeStore::SHORT);
    }

    #[test]
    fn test_bare_modifiers_imply_int() {
        let ty = synth(|s| s.set_sign(Sign::Unsigned, Span::DUMMY)).unwrap();
        assert_eq!(ty, TypeStore::UINT);

        let ty = synth(|s| s.add_long(Span::DUMMY)).unwrap();
        assert_eq!(ty, TypeStore::LONG);
    }

    #[test]
    fn test_char_signs() {
        let ty = synth(|s| s.set_type_spec(TypeSpec::Char, Span::DUMMY)).unwrap();
        assert_eq!(ty, TypeStore::CHAR);

        let ty = synth(|s| {
            s.set_sign(Sign::Unsigned, Span::DUMMY)?;
            s.set_type_spec(TypeSpec::Char, Span::DUMMY)
        })
        .unwrap();
        assert_eq!(ty, TypeStore::UCHAR);
    }

    #[test]
    fn test_long_double() {
        let ty = synth(|s| {
            s.add_long(Span::DUMMY)?;
            s.set_type_spec(TypeSpec::Double, Span::DUMMY)
        })
        .unwrap();
        assert_eq!(ty, TypeStore::LONG_DOUBLE);
    }

    #[test]
    fn test_synthesize_is_pure() {
        let store = TypeStore::new();
        let mut spec = DeclSpec::new();
        spec.add_long(Span::DUMMY).unwrap();
        spec.set_sign(Sign::Unsigned, Span::DUMMY).unwrap();

        let a = spec.synthesize(&store, Span::DUMMY).unwrap();
        let b = spec.synthesize(&store, Span::DUMMY).unwrap();
        assert_eq!(a, b);

        let mut equal_bag = DeclSpec::new();
        equal_bag.set_sign(Sign::Unsigned, Span::DUMMY).unwrap();
        equal_bag.add_long(Span::DUMMY).unwrap();
        assert_eq!(spec, equal_bag);
        assert_eq!(equal_bag.synthesize(&store, Span::DUMMY).unwrap(), a);
    }

    #[test]
    fn test_void_rejects_modifiers() {
        let err = synth(|s| {
            s.set_sign(Sign::Unsigned, Span::DUMMY)?;
            s.set_type_spec(TypeSpec::Void, Span::DUMMY)
        })
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeSynthesis);
    }

    #[test]
    fn test_short_long_conflict() {
        let store = TypeStore::new();
        let mut spec = DeclSpec::new();
        spec.add_short(Span::DUMMY).unwrap();
        let err = spec.add_long(Span::DUMMY).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeSynthesis);
        drop(store);
    }

    #[test]
    fn test_triple_long_rejected() {
        let mut spec = DeclSpec::new();
        spec.add_long(Span::DUMMY).unwrap();
        spec.add_long(Span::DUMMY).unwrap();
        assert!(spec.add_long(Span::DUMMY).is_err());
    }

    #[test]
    fn test_signed_unsigned_conflict() {
        let mut spec = DeclSpec::new();
        spec.set_sign(Sign::Signed, Span::DUMMY).unwrap();
        assert!(spec.set_sign(Sign::Unsigned, Span::DUMMY).is_err());
        // Repeating the same sign is accepted.
        assert!(spec.set_sign(Sign::Signed, Span::DUMMY).is_ok());
    }

    #[test]
    fn test_two_base_types_rejected() {
        let mut spec = DeclSpec::new();
        spec.set_type_spec(TypeSpec::Int, Span::DUMMY).unwrap();
        let err = spec.set_type_spec(TypeSpec::Double, Span::DUMMY).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeSynthesis);
    }

    #[test]
    fn test_typedef_exclusions() {
        let mut spec = DeclSpec::new();
        spec.set_storage(StorageClass::Typedef, Span::DUMMY).unwrap();
        assert!(spec.set_inline(Span::DUMMY).is_err());
        assert!(spec
            .set_storage(StorageClass::Static, Span::DUMMY)
            .is_err());

        let mut spec = DeclSpec::new();
        spec.set_inline(Span::DUMMY).unwrap();
        assert!(spec
            .set_storage(StorageClass::Typedef, Span::DUMMY)
            .is_err());
    }

    #[test]
    fn test_storage_class_is_single() {
        let mut spec = DeclSpec::new();
        spec.set_storage(StorageClass::Extern, Span::DUMMY).unwrap();
        let err = spec
            .set_storage(StorageClass::Static, Span::DUMMY)
            .unwrap_err();
        assert!(err.message.contains("extern"));
    }

    #[test]
    fn test_override_is_verbatim() {
        let mut store = TypeStore::new();
        let p = store.pointer_to(TypeStore::INT);
        let mut spec = DeclSpec::new();
        spec.set_override(p, Span::DUMMY).unwrap();
        assert_eq!(spec.synthesize(&store, Span::DUMMY).unwrap(), p);
    }

    #[test]
    fn test_override_rejects_modifiers() {
        let mut store = TypeStore::new();
        let p = store.pointer_to(TypeStore::INT);
        let mut spec = DeclSpec::new();
        spec.set_override(p, Span::DUMMY).unwrap();
        spec.set_sign(Sign::Unsigned, Span::DUMMY).unwrap();
        assert!(spec.synthesize(&store, Span::DUMMY).is_err());
    }
}
