//! AST node definitions and the per-translation-unit arena.
//!
//! Nodes form three tagged sums: declarations, statements, and
//! expressions. All nodes live in one [`Ast`] arena and reference each
//! other by typed handle ([`DeclId`], [`StmtId`], [`ExprId`]); the arena
//! is dropped whole at the end of compilation. Parent-to-child handles
//! are the only edges, so the AST is a tree.
//!
//! Every expression carries the [`TypeId`] resolved for it during
//! parsing.

use zinc_sem::StorageClass;
use zinc_util::{DeclId, ExprId, IndexVec, Span, StmtId, Symbol, TypeId};

// =============================================================================
// DECLARATIONS
// =============================================================================

/// Declaration family
#[derive(Debug, Clone)]
pub enum Decl {
    /// Variable (global, local, or parameter)
    Var(VarDecl),
    /// Function declaration or definition
    Function(FunctionDecl),
    /// Struct/union declaration
    Record(RecordDecl),
    /// Typedef alias
    Typedef(TypedefDecl),
    /// Enumeration (recognised but not supported by the grammar)
    Enum(EnumDecl),
    /// Statement label
    Label(LabelDecl),
}

impl Decl {
    /// The declared name, if the declaration has one
    pub fn name(&self) -> Option<Symbol> {
        match self {
            Decl::Var(d) => Some(d.name),
            Decl::Function(d) => Some(d.name),
            Decl::Record(d) => d.name,
            Decl::Typedef(d) => Some(d.name),
            Decl::Enum(d) => d.name,
            Decl::Label(d) => Some(d.name),
        }
    }

    /// The declared type, for declarations that have one
    pub fn ty(&self) -> Option<TypeId> {
        match self {
            Decl::Var(d) => Some(d.ty),
            Decl::Function(d) => Some(d.ty),
            Decl::Record(d) => Some(d.ty),
            Decl::Typedef(d) => Some(d.ty),
            Decl::Enum(_) | Decl::Label(_) => None,
        }
    }

    /// The source range of the declaration
    pub fn span(&self) -> Span {
        match self {
            Decl::Var(d) => d.span,
            Decl::Function(d) => d.span,
            Decl::Record(d) => d.span,
            Decl::Typedef(d) => d.span,
            Decl::Enum(d) => d.span,
            Decl::Label(d) => d.span,
        }
    }
}

/// A variable declaration
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: Symbol,
    pub ty: TypeId,
    /// Initialiser expression, if present
    pub init: Option<ExprId>,
    pub storage: StorageClass,
    /// File-scope variables get static storage in the emitter
    pub is_global: bool,
    pub span: Span,
}

/// A function declaration or definition
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Symbol,
    /// The function type (return and parameter types)
    pub ty: TypeId,
    /// Parameter variable declarations, in order
    pub params: Vec<DeclId>,
    /// Block-scope variables declared in the body; the emitter computes
    /// stack layout from this list
    pub locals: Vec<DeclId>,
    /// `None` for forward declarations
    pub body: Option<StmtId>,
    pub storage: StorageClass,
    pub is_inline: bool,
    pub span: Span,
}

/// A struct or union declaration
#[derive(Debug, Clone)]
pub struct RecordDecl {
    /// Tag, if the record has one
    pub name: Option<Symbol>,
    /// The record type (kind and members live in the type store)
    pub ty: TypeId,
    pub span: Span,
}

/// A typedef alias
#[derive(Debug, Clone)]
pub struct TypedefDecl {
    pub name: Symbol,
    pub ty: TypeId,
    pub span: Span,
}

/// An enumeration declaration
///
/// The grammar reports `enum` as unimplemented; the node exists so the
/// declaration family and the emitter interface stay closed over it.
#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: Option<Symbol>,
    pub span: Span,
}

/// A statement label declaration
#[derive(Debug, Clone)]
pub struct LabelDecl {
    pub name: Symbol,
    pub span: Span,
}

// =============================================================================
// STATEMENTS
// =============================================================================

/// Statement family
#[derive(Debug, Clone)]
pub enum Stmt {
    Compound(CompoundStmt),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    Switch(SwitchStmt),
    Case(CaseStmt),
    Return(ReturnStmt),
    Break(Span),
    Continue(Span),
    Goto(GotoStmt),
    Labeled(LabeledStmt),
    Decl(DeclStmt),
    Expr(ExprStmt),
}

/// `{ ... }`; opens a scope during parsing
#[derive(Debug, Clone)]
pub struct CompoundStmt {
    pub stmts: Vec<StmtId>,
    pub span: Span,
}

/// `if (cond) then [else els]`
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub cond: ExprId,
    pub then_branch: StmtId,
    pub else_branch: Option<StmtId>,
    pub span: Span,
}

/// `while (cond) body`
#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub cond: ExprId,
    pub body: StmtId,
    pub span: Span,
}

/// `do body while (cond);`
#[derive(Debug, Clone)]
pub struct DoWhileStmt {
    pub body: StmtId,
    pub cond: ExprId,
    pub span: Span,
}

/// `for (init cond step) body`
///
/// The init and condition headers are `;`-terminated statements; the
/// step is a bare expression.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<StmtId>,
    pub cond: Option<StmtId>,
    pub step: Option<ExprId>,
    pub body: StmtId,
    pub span: Span,
}

/// `switch (cond) { ... }`
#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub cond: ExprId,
    /// Always a compound statement
    pub body: StmtId,
    pub span: Span,
}

/// `case value: body` or `default: body`
#[derive(Debug, Clone)]
pub struct CaseStmt {
    /// `None` for `default`
    pub value: Option<ExprId>,
    pub body: StmtId,
    pub is_default: bool,
    /// Unique per-translation-unit number the emitter uses for jump labels
    pub label: u32,
    pub span: Span,
}

/// `return [value];`
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<ExprId>,
    pub span: Span,
}

/// `goto label;` (recognised but reported unimplemented by the parser)
#[derive(Debug, Clone)]
pub struct GotoStmt {
    pub label: Symbol,
    pub span: Span,
}

/// `label: body`
#[derive(Debug, Clone)]
pub struct LabeledStmt {
    /// Handle to the `Decl::Label` for the label name
    pub decl: DeclId,
    pub body: StmtId,
    pub span: Span,
}

/// A declaration in statement position
#[derive(Debug, Clone)]
pub struct DeclStmt {
    pub decls: Vec<DeclId>,
    pub span: Span,
}

/// `expr;` — the expression is optional, covering the null statement
#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Option<ExprId>,
    pub span: Span,
}

impl Stmt {
    /// The source range of the statement
    pub fn span(&self) -> Span {
        match self {
            Stmt::Compound(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::Case(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Break(span) | Stmt::Continue(span) => *span,
            Stmt::Goto(s) => s.span,
            Stmt::Labeled(s) => s.span,
            Stmt::Decl(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `&x`
    AddressOf,
    /// `*x`
    Deref,
    /// `+x`
    Plus,
    /// `-x`
    Minus,
    /// `!x`
    Not,
    /// `~x`
    BitNot,
    /// `++x`
    PreIncrement,
    /// `--x`
    PreDecrement,
    /// `x++`
    PostIncrement,
    /// `x--`
    PostDecrement,
}

impl UnaryOp {
    /// Spelling used in dumps
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::AddressOf => "&",
            UnaryOp::Deref => "*",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreIncrement => "++pre",
            UnaryOp::PreDecrement => "--pre",
            UnaryOp::PostIncrement => "++post",
            UnaryOp::PostDecrement => "--post",
        }
    }
}

/// Binary operators, including the assignment family and the comma
/// operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Assign,
    MulAssign,
    DivAssign,
    ModAssign,
    AddAssign,
    SubAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    XorAssign,
    OrAssign,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Comma,
}

impl BinaryOp {
    /// Spelling used in dumps
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::ModAssign => "%=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::ShlAssign => "<<=",
            BinaryOp::ShrAssign => ">>=",
            BinaryOp::AndAssign => "&=",
            BinaryOp::XorAssign => "^=",
            BinaryOp::OrAssign => "|=",
            BinaryOp::LogicalOr => "||",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Comma => ",",
        }
    }

    /// Returns true for `=` and the compound assignment operators
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
                | BinaryOp::ModAssign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::ShlAssign
                | BinaryOp::ShrAssign
                | BinaryOp::AndAssign
                | BinaryOp::XorAssign
                | BinaryOp::OrAssign
        )
    }

    /// Returns true for operators whose result is the `int` 0/1
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Gt
                | BinaryOp::Le
                | BinaryOp::Ge
                | BinaryOp::LogicalAnd
                | BinaryOp::LogicalOr
        )
    }
}

/// Expression node payload
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer constant
    IntLit(i64),
    /// Floating constant
    FloatLit(f64),
    /// Character constant
    CharLit(char),
    /// String literal (decoded content)
    StrLit(Symbol),
    /// Reference to a declaration
    DeclRef(DeclId),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// `cond ? then_expr : else_expr`
    Conditional {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    /// `.` or `->` member access, resolved to a member index
    Member {
        base: ExprId,
        member: Symbol,
        index: usize,
        arrow: bool,
    },
    /// `base[index]`
    ArraySubscript {
        base: ExprId,
        index: ExprId,
    },
    /// `(type) operand`; the target type is the expression's type
    Cast {
        operand: ExprId,
    },
    /// Braced initialiser list (no grammar path constructs it yet)
    InitList {
        elems: Vec<ExprId>,
    },
}

/// An expression with its resolved type and source range
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    /// Resolved during parsing; never a dummy handle once parsing
    /// completes
    pub ty: TypeId,
    pub span: Span,
}

// =============================================================================
// ARENA
// =============================================================================

/// The AST arena for one translation unit
///
/// Owns every declaration, statement, and expression node. Handles into
/// the arena stay valid until the whole arena is dropped.
#[derive(Debug, Default)]
pub struct Ast {
    pub decls: IndexVec<DeclId, Decl>,
    pub stmts: IndexVec<StmtId, Stmt>,
    pub exprs: IndexVec<ExprId, Expr>,
    /// Top-level declarations in source order
    pub top_level: Vec<DeclId>,
}

impl Ast {
    /// Empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a declaration
    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        self.decls.push(decl)
    }

    /// Allocate a statement
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.push(stmt)
    }

    /// Allocate an expression
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.push(expr)
    }

    /// Look up a declaration
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id]
    }

    /// Mutable declaration access (used to attach bodies and locals)
    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id]
    }

    /// Look up a statement
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id]
    }

    /// Look up an expression
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }
}
