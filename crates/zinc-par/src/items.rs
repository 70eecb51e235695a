//! Top-level item parsing: declaration specifiers, declarators, records,
//! typedefs, global variables, and function definitions.
//!
//! The declarator grammar is
//!
//! ```text
//! declarator  := pointer* ( '(' declarator ')' | identifier? ) suffix*
//! suffix      := '(' params ')' | '[' array-dim ']'
//! ```
//!
//! A declarator is first read into an intermediate chain, then the chain
//! is resolved against the specifier's base type: pointers apply first,
//! then the suffixes outside any parentheses, and finally the
//! parenthesised inner declarator is resolved against the result. This
//! yields the C reading where `int (*p)[10]` is a pointer to an array
//! and `int *p[10]` is an array of pointers.

use zinc_lex::{Token, TokenKind};
use zinc_sem::{DeclSpec, Member, RecordKind, Sign, StorageClass, Type, TypeKind, TypeSpec, Width};
use zinc_util::{CompileError, DeclId, Result, Span, StmtId, Symbol, TypeId};

use crate::ast::{Decl, DeclStmt, FunctionDecl, RecordDecl, Stmt, TypedefDecl, VarDecl};
use crate::Parser;

/// A resolved declarator: the declared name (absent for abstract
/// declarators) and the complete type
pub(crate) struct Declarator {
    pub name: Option<(Symbol, Span)>,
    pub ty: TypeId,
    /// Parameter list of the function type this declarator denotes
    /// directly; present only for declarators of the `name(params)`
    /// shape, which is what a function definition requires
    pub fn_params: Option<Vec<ParamInfo>>,
    pub span: Span,
}

/// One parameter from a function suffix
#[derive(Clone)]
pub(crate) struct ParamInfo {
    pub name: Option<Symbol>,
    pub ty: TypeId,
    pub span: Span,
}

/// The identifier-or-parentheses core of a declarator
enum DirectDeclarator {
    Name(Option<(Symbol, Span)>),
    Paren(Box<DeclaratorChain>),
}

/// An array or function suffix
enum TypeSuffix {
    Array(Option<u64>),
    Function(Vec<ParamInfo>),
}

/// Unresolved declarator shape
struct DeclaratorChain {
    pointers: usize,
    direct: DirectDeclarator,
    suffixes: Vec<TypeSuffix>,
}

impl<'a> Parser<'a> {
    /// Whether a token can begin (or continue) a declaration specifier:
    /// a type keyword, or an identifier currently bound to a type
    pub(crate) fn is_type_token(&self, token: &Token) -> bool {
        token.kind.is_decl_spec_keyword()
            || (token.kind == TokenKind::Ident
                && token.value.map_or(false, |sym| self.scopes.is_type_name(sym)))
    }

    // =========================================================================
    // TRANSLATION UNIT
    // =========================================================================

    /// Parse the whole input as a sequence of top-level items
    pub fn parse_translation_unit(&mut self) -> Result<()> {
        while self.current_kind() != TokenKind::Eof {
            self.parse_top_level()?;
        }
        Ok(())
    }

    /// One top-level item: a typedef, a function definition, or one or
    /// more global declarations
    fn parse_top_level(&mut self) -> Result<()> {
        let start = self.current_span();

        if !self.is_type_token(self.current()) {
            return Err(CompileError::unexpected(
                format!("expected a declaration, found {}", self.current().describe()),
                start,
            ));
        }

        let spec = self.parse_decl_specifiers()?;
        let base = spec.synthesize(&self.types, start)?;

        if spec.is_typedef() {
            let decls = self.parse_typedef_chain(base, start)?;
            self.ast.top_level.extend(decls);
            return Ok(());
        }

        // `struct S { ... };` and friends: nothing declared here, the
        // record declaration was recorded while parsing the specifier.
        if self.eat(TokenKind::Semicolon)? {
            return Ok(());
        }

        let declarator = self.parse_declarator(base)?;
        if self.types.is_function(declarator.ty) && self.current_kind() == TokenKind::LBrace {
            return self.parse_function_definition(&spec, declarator);
        }

        self.parse_global_tail(&spec, base, declarator)
    }

    /// Remaining declarators of a global declaration, first one included
    fn parse_global_tail(
        &mut self,
        spec: &DeclSpec,
        base: TypeId,
        first: Declarator,
    ) -> Result<()> {
        let mut declarator = first;
        loop {
            let decl = self.finish_global_declarator(spec, declarator)?;
            self.ast.top_level.push(decl);
            if !self.eat(TokenKind::Comma)? {
                break;
            }
            declarator = self.parse_declarator(base)?;
        }
        self.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    /// Build and install the declaration for one global declarator
    fn finish_global_declarator(&mut self, spec: &DeclSpec, d: Declarator) -> Result<DeclId> {
        let (name, name_span) = d.name.ok_or_else(|| {
            CompileError::bad_declarator("declaration requires an identifier", d.span)
        })?;

        let decl = if self.types.is_function(d.ty) {
            // Forward declaration; a definition would have taken the
            // function path before reaching here.
            self.ast.alloc_decl(Decl::Function(FunctionDecl {
                name,
                ty: d.ty,
                params: Vec::new(),
                locals: Vec::new(),
                body: None,
                storage: spec.storage,
                is_inline: spec.is_inline,
                span: d.span,
            }))
        } else {
            let init = if self.eat(TokenKind::Eq)? {
                Some(self.parse_initializer()?)
            } else {
                None
            };
            self.ast.alloc_decl(Decl::Var(VarDecl {
                name,
                ty: d.ty,
                init,
                storage: spec.storage,
                is_global: true,
                span: d.span,
            }))
        };

        self.scopes.install_decl(name, decl, name_span)?;
        Ok(decl)
    }

    /// `typedef` declarators: install each name as a type alias
    pub(crate) fn parse_typedef_chain(
        &mut self,
        base: TypeId,
        start: Span,
    ) -> Result<Vec<DeclId>> {
        let mut decls = Vec::new();
        loop {
            let d = self.parse_declarator(base)?;
            let (name, _) = d.name.ok_or_else(|| {
                CompileError::bad_declarator("typedef requires an identifier", d.span)
            })?;

            // The alias carries the typedef name on the type itself.
            let aliased_kind = self.types.kind(d.ty).clone();
            let aliased = self.types.alloc(Type::named(aliased_kind, name));

            let decl = self.ast.alloc_decl(Decl::Typedef(TypedefDecl {
                name,
                ty: aliased,
                span: start,
            }));
            self.scopes.install_type(name, aliased);
            decls.push(decl);

            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::Semicolon)?;
        Ok(decls)
    }

    /// An initialiser after `=`
    ///
    /// Braced initialiser lists have no grammar path yet.
    pub(crate) fn parse_initializer(&mut self) -> Result<zinc_util::ExprId> {
        if self.current_kind() == TokenKind::LBrace {
            return Err(CompileError::unimplemented(
                "initializer lists are not supported",
                self.current_span(),
            ));
        }
        self.parse_assignment_expression()
    }

    // =========================================================================
    // DECLARATION SPECIFIERS
    // =========================================================================

    /// Accumulate declaration specifiers while the current token is a
    /// type token
    ///
    /// The bag is re-synthesised after every token so the running type
    /// is always valid.
    pub(crate) fn parse_decl_specifiers(&mut self) -> Result<DeclSpec> {
        let mut spec = DeclSpec::new();

        loop {
            let token = *self.current();
            let span = token.span;
            if !self.is_type_token(&token) {
                break;
            }

            match token.kind {
                TokenKind::KwTypedef => {
                    self.consume()?;
                    spec.set_storage(StorageClass::Typedef, span)?;
                }
                TokenKind::KwExtern => {
                    self.consume()?;
                    spec.set_storage(StorageClass::Extern, span)?;
                }
                TokenKind::KwStatic => {
                    self.consume()?;
                    spec.set_storage(StorageClass::Static, span)?;
                }
                TokenKind::KwThreadLocal => {
                    self.consume()?;
                    spec.set_storage(StorageClass::ThreadLocal, span)?;
                }
                TokenKind::KwInline => {
                    self.consume()?;
                    spec.set_inline(span)?;
                }
                TokenKind::KwConst => {
                    self.consume()?;
                    spec.is_const = true;
                }
                TokenKind::KwVolatile => {
                    self.consume()?;
                    spec.is_volatile = true;
                }
                TokenKind::KwRestrict => {
                    self.consume()?;
                    spec.is_restrict = true;
                }
                TokenKind::KwAtomic => {
                    self.consume()?;
                    spec.is_atomic = true;
                }
                TokenKind::KwVoid => {
                    self.consume()?;
                    spec.set_type_spec(TypeSpec::Void, span)?;
                }
                TokenKind::KwBool => {
                    self.consume()?;
                    spec.set_type_spec(TypeSpec::Bool, span)?;
                }
                TokenKind::KwChar => {
                    self.consume()?;
                    spec.set_type_spec(TypeSpec::Char, span)?;
                }
                TokenKind::KwInt => {
                    self.consume()?;
                    spec.set_type_spec(TypeSpec::Int, span)?;
                }
                TokenKind::KwFloat => {
                    self.consume()?;
                    spec.set_type_spec(TypeSpec::Float, span)?;
                }
                TokenKind::KwDouble => {
                    self.consume()?;
                    spec.set_type_spec(TypeSpec::Double, span)?;
                }
                TokenKind::KwShort => {
                    self.consume()?;
                    spec.add_short(span)?;
                }
                TokenKind::KwLong => {
                    self.consume()?;
                    spec.add_long(span)?;
                }
                TokenKind::KwSigned => {
                    self.consume()?;
                    spec.set_sign(Sign::Signed, span)?;
                }
                TokenKind::KwUnsigned => {
                    self.consume()?;
                    spec.set_sign(Sign::Unsigned, span)?;
                }
                TokenKind::KwStruct | TokenKind::KwUnion => {
                    let ty = self.parse_record()?;
                    spec.set_override(ty, span)?;
                }
                TokenKind::KwEnum => {
                    return Err(CompileError::unimplemented(
                        "enum declarations are not supported",
                        span,
                    ));
                }
                TokenKind::KwAuto | TokenKind::KwRegister => {
                    return Err(CompileError::unimplemented(
                        format!("storage class '{}' is not supported", token.text()),
                        span,
                    ));
                }
                TokenKind::KwNoreturn | TokenKind::KwAlignas | TokenKind::KwComplex => {
                    return Err(CompileError::unimplemented(
                        format!("'{}' is not supported", token.text()),
                        span,
                    ));
                }
                TokenKind::Ident => {
                    // A typedef name can only supply the base type; once
                    // the bag has type information the identifier is the
                    // declarator.
                    if spec.type_spec != TypeSpec::Unspecified
                        || spec.override_ty.is_some()
                        || spec.width != Width::None
                        || spec.sign != Sign::None
                    {
                        break;
                    }
                    let sym = token.value.expect("identifier token carries its spelling");
                    let ty = self
                        .scopes
                        .lookup_type(sym)
                        .expect("is_type_token guarantees a type binding");
                    self.consume()?;
                    spec.set_override(ty, span)?;
                    break;
                }
                _ => break,
            }

            // Keep the running type valid between specifier tokens.
            spec.synthesize(&self.types, span)?;
        }

        Ok(spec)
    }

    // =========================================================================
    // RECORDS
    // =========================================================================

    /// `struct`/`union` specifier: a reference to an existing tag, a
    /// forward declaration, or a full definition with a member list
    fn parse_record(&mut self) -> Result<TypeId> {
        let start = self.current_span();
        let kind = if self.eat(TokenKind::KwStruct)? {
            RecordKind::Struct
        } else {
            self.expect(TokenKind::KwUnion)?;
            RecordKind::Union
        };

        let tag = if self.current_kind() == TokenKind::Ident {
            let tok = self.consume()?;
            Some(tok.value.expect("identifier token carries its spelling"))
        } else {
            None
        };

        if self.current_kind() != TokenKind::LBrace {
            let Some(tag) = tag else {
                return Err(CompileError::unexpected(
                    "expected identifier or '{' after struct/union keyword",
                    self.current_span(),
                ));
            };
            if let Some(ty) = self.scopes.lookup_type(tag) {
                return Ok(ty);
            }
            // Forward declaration: an incomplete record.
            let ty = self.types.alloc(Type::named(
                TypeKind::Record {
                    kind,
                    members: Vec::new(),
                },
                tag,
            ));
            self.scopes.install_type(tag, ty);
            return Ok(ty);
        }

        self.expect(TokenKind::LBrace)?;
        let mut members: Vec<Member> = Vec::new();
        while !self.eat(TokenKind::RBrace)? {
            let mspan = self.current_span();
            let mspec = self.parse_decl_specifiers()?;
            if mspec.storage != StorageClass::None {
                return Err(CompileError::type_synthesis(
                    "storage class not allowed in member declaration",
                    mspan,
                ));
            }
            let mbase = mspec.synthesize(&self.types, mspan)?;
            loop {
                let d = self.parse_declarator(mbase)?;
                let (name, nspan) = d.name.ok_or_else(|| {
                    CompileError::bad_declarator("member declaration requires a name", d.span)
                })?;
                if members.iter().any(|m| m.name == name) {
                    return Err(CompileError::redefinition(
                        format!("duplicate member '{}'", name),
                        nspan,
                    ));
                }
                members.push(Member { name, ty: d.ty });
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::Semicolon)?;
        }

        let record = Type {
            kind: TypeKind::Record { kind, members },
            name: tag,
        };
        let ty = self.types.alloc(record);
        if let Some(tag) = tag {
            self.scopes.install_type(tag, ty);
        }

        let decl = self.ast.alloc_decl(Decl::Record(RecordDecl {
            name: tag,
            ty,
            span: start,
        }));
        if self.current_fn.is_none() {
            self.ast.top_level.push(decl);
        }

        Ok(ty)
    }

    // =========================================================================
    // DECLARATORS
    // =========================================================================

    /// Parse one (possibly abstract) declarator against a base type
    pub(crate) fn parse_declarator(&mut self, base: TypeId) -> Result<Declarator> {
        let start = self.current_span();
        let chain = self.parse_declarator_chain()?;

        let fn_params = match (&chain.direct, chain.pointers, chain.suffixes.first()) {
            (DirectDeclarator::Name(_), 0, Some(TypeSuffix::Function(params))) => {
                Some(params.clone())
            }
            _ => None,
        };

        let (ty, name) = self.apply_chain(chain, base)?;
        Ok(Declarator {
            name,
            ty,
            fn_params,
            span: start,
        })
    }

    /// Read the declarator shape without resolving it
    fn parse_declarator_chain(&mut self) -> Result<DeclaratorChain> {
        let mut pointers = 0;
        while self.eat(TokenKind::Star)? {
            pointers += 1;
            // Qualifiers may follow each '*'; they do not change the type
            // representation.
            while matches!(
                self.current_kind(),
                TokenKind::KwConst
                    | TokenKind::KwVolatile
                    | TokenKind::KwRestrict
                    | TokenKind::KwAtomic
            ) {
                self.consume()?;
            }
        }

        let direct = if self.current_kind() == TokenKind::LParen && self.paren_is_declarator()? {
            self.consume()?;
            let inner = self.parse_declarator_chain()?;
            self.expect(TokenKind::RParen)?;
            DirectDeclarator::Paren(Box::new(inner))
        } else if self.current_kind() == TokenKind::Ident {
            let tok = self.consume()?;
            let name = tok.value.expect("identifier token carries its spelling");
            DirectDeclarator::Name(Some((name, tok.span)))
        } else {
            DirectDeclarator::Name(None)
        };

        let mut suffixes = Vec::new();
        loop {
            if self.current_kind() == TokenKind::LParen {
                self.consume()?;
                let params = self.parse_param_list()?;
                suffixes.push(TypeSuffix::Function(params));
            } else if self.eat(TokenKind::LBracket)? {
                let len = self.parse_array_len()?;
                suffixes.push(TypeSuffix::Array(len));
            } else {
                break;
            }
        }

        Ok(DeclaratorChain {
            pointers,
            direct,
            suffixes,
        })
    }

    /// Disambiguate `(` after the pointer run: a parenthesised declarator
    /// if what follows is declarator material, a function suffix if it is
    /// a parameter list (type token or `)`)
    fn paren_is_declarator(&mut self) -> Result<bool> {
        let next = *self.peek()?;
        if next.kind == TokenKind::RParen {
            return Ok(false);
        }
        Ok(!self.is_type_token(&next))
    }

    /// Resolve a declarator chain against a base type
    ///
    /// Pointers bind first, then the suffixes (innermost last), then the
    /// parenthesised inner declarator sees the result as its base.
    fn apply_chain(
        &mut self,
        chain: DeclaratorChain,
        base: TypeId,
    ) -> Result<(TypeId, Option<(Symbol, Span)>)> {
        let mut ty = base;
        for _ in 0..chain.pointers {
            ty = self.types.pointer_to(ty);
        }

        for suffix in chain.suffixes.into_iter().rev() {
            ty = match suffix {
                TypeSuffix::Array(len) => self.types.array_of(ty, len),
                TypeSuffix::Function(params) => {
                    let param_types = params.iter().map(|p| p.ty).collect();
                    self.types.function(ty, param_types)
                }
            };
        }

        match chain.direct {
            DirectDeclarator::Name(name) => Ok((ty, name)),
            DirectDeclarator::Paren(inner) => self.apply_chain(*inner, ty),
        }
    }

    /// Parameter list after `(`; consumes the closing `)`
    ///
    /// `()` and `(void)` are the empty list. Parameter types undergo
    /// C's adjustment: arrays decay to pointers, functions to function
    /// pointers.
    fn parse_param_list(&mut self) -> Result<Vec<ParamInfo>> {
        if self.eat(TokenKind::RParen)? {
            return Ok(Vec::new());
        }
        if self.current_kind() == TokenKind::KwVoid && self.peek()?.kind == TokenKind::RParen {
            self.consume()?;
            self.consume()?;
            return Ok(Vec::new());
        }

        let mut params = Vec::new();
        loop {
            if self.current_kind() == TokenKind::Ellipsis {
                return Err(CompileError::unimplemented(
                    "variadic functions are not supported",
                    self.current_span(),
                ));
            }

            let pspan = self.current_span();
            let pspec = self.parse_decl_specifiers()?;
            if pspec.storage != StorageClass::None {
                return Err(CompileError::type_synthesis(
                    "storage class not allowed in parameter declaration",
                    pspan,
                ));
            }
            let pbase = pspec.synthesize(&self.types, pspan)?;
            let d = self.parse_declarator(pbase)?;
            let ty = self.decay_param_type(d.ty);
            params.push(ParamInfo {
                name: d.name.map(|(name, _)| name),
                ty,
                span: d.name.map(|(_, span)| span).unwrap_or(pspan),
            });

            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    /// Array-to-pointer and function-to-pointer parameter adjustment
    fn decay_param_type(&mut self, ty: TypeId) -> TypeId {
        match self.types.kind(ty) {
            TypeKind::Array { elem, .. } => {
                let elem = *elem;
                self.types.pointer_to(elem)
            }
            TypeKind::Function { .. } => self.types.pointer_to(ty),
            _ => ty,
        }
    }

    /// Array dimension after `[`; consumes the closing `]`
    ///
    /// Empty brackets give an unknown length; otherwise an integer
    /// constant is required (there are no variable-length arrays).
    fn parse_array_len(&mut self) -> Result<Option<u64>> {
        if self.eat(TokenKind::RBracket)? {
            return Ok(None);
        }

        if self.current_kind() == TokenKind::Number {
            let tok = *self.current();
            if let Some(value) = crate::expr::int_value_of(tok.text()) {
                self.consume()?;
                self.expect(TokenKind::RBracket)?;
                return Ok(Some(value));
            }
        }

        Err(CompileError::unimplemented(
            "array length must be an integer constant",
            self.current_span(),
        ))
    }

    // =========================================================================
    // FUNCTION DEFINITIONS
    // =========================================================================

    /// A function definition: declarator of function type followed by a
    /// compound body
    fn parse_function_definition(
        &mut self,
        spec: &DeclSpec,
        declarator: Declarator,
    ) -> Result<()> {
        let (name, name_span) = declarator.name.ok_or_else(|| {
            CompileError::bad_declarator("function definition requires a name", declarator.span)
        })?;

        if self.scopes.lookup_decl(name).is_some() {
            return Err(CompileError::redefinition(
                format!("redefinition of '{}'", name),
                name_span,
            ));
        }

        let params = declarator.fn_params.ok_or_else(|| {
            CompileError::bad_declarator(
                "function definition requires a parameter list",
                declarator.span,
            )
        })?;

        let decl = self.ast.alloc_decl(Decl::Function(FunctionDecl {
            name,
            ty: declarator.ty,
            params: Vec::new(),
            locals: Vec::new(),
            body: None,
            storage: spec.storage,
            is_inline: spec.is_inline,
            span: declarator.span,
        }));
        self.scopes.install_decl(name, decl, name_span)?;
        self.ast.top_level.push(decl);

        self.current_fn = Some(decl);
        let body = self.with_scope(|p| {
            let mut param_ids = Vec::new();
            for param in &params {
                let pname = param.name.ok_or_else(|| {
                    CompileError::bad_declarator("parameter name omitted", param.span)
                })?;
                let pid = p.ast.alloc_decl(Decl::Var(VarDecl {
                    name: pname,
                    ty: param.ty,
                    init: None,
                    storage: StorageClass::None,
                    is_global: false,
                    span: param.span,
                }));
                p.scopes.install_decl(pname, pid, param.span)?;
                param_ids.push(pid);
            }
            if let Decl::Function(f) = p.ast.decl_mut(decl) {
                f.params = param_ids;
            }
            p.parse_statement()
        });
        self.current_fn = None;
        let body = body?;

        if let Decl::Function(f) = self.ast.decl_mut(decl) {
            f.body = Some(body);
        }
        Ok(())
    }

    // =========================================================================
    // DECLARATION STATEMENTS
    // =========================================================================

    /// A declaration in statement position; the declared variables attach
    /// to the enclosing function's local list
    pub(crate) fn parse_decl_stmt(&mut self) -> Result<StmtId> {
        let start = self.current_span();
        let spec = self.parse_decl_specifiers()?;
        let base = spec.synthesize(&self.types, start)?;

        let mut decls = Vec::new();

        if spec.is_typedef() {
            decls = self.parse_typedef_chain(base, start)?;
        } else if self.eat(TokenKind::Semicolon)? {
            // A bare record declaration in a block.
        } else {
            loop {
                let d = self.parse_declarator(base)?;
                let (name, name_span) = d.name.ok_or_else(|| {
                    CompileError::bad_declarator("declaration requires an identifier", d.span)
                })?;

                let id = if self.types.is_function(d.ty) {
                    self.ast.alloc_decl(Decl::Function(FunctionDecl {
                        name,
                        ty: d.ty,
                        params: Vec::new(),
                        locals: Vec::new(),
                        body: None,
                        storage: spec.storage,
                        is_inline: spec.is_inline,
                        span: d.span,
                    }))
                } else {
                    let init = if self.eat(TokenKind::Eq)? {
                        Some(self.parse_initializer()?)
                    } else {
                        None
                    };
                    let id = self.ast.alloc_decl(Decl::Var(VarDecl {
                        name,
                        ty: d.ty,
                        init,
                        storage: spec.storage,
                        is_global: false,
                        span: d.span,
                    }));
                    if let Some(func) = self.current_fn {
                        if let Decl::Function(f) = self.ast.decl_mut(func) {
                            f.locals.push(id);
                        }
                    }
                    id
                };

                self.scopes.install_decl(name, id, name_span)?;
                decls.push(id);

                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::Semicolon)?;
        }

        Ok(self.ast.alloc_stmt(Stmt::Decl(DeclStmt { decls, span: start })))
    }
}
