//! The AT&T-syntax assembly emitter.
//!
//! One visitor per declaration, statement, and expression variant.
//! Values are computed into `%rax`; binary operators spill the left
//! operand to the machine stack and the `depth` counter tracks
//! outstanding spills so calls can stay 16-byte aligned.

use rustc_hash::FxHashMap;
use zinc_par::{Ast, BinaryOp, Decl, ExprKind, FunctionDecl, Stmt, UnaryOp, VarDecl};
use zinc_sem::{StorageClass, TypeKind, TypeStore};
use zinc_util::{DeclId, ExprId, StmtId, Symbol, TypeId};

use crate::EmitError;

/// System V integer argument registers, in order
const ARG_REGS: [&str; 6] = ["%rdi", "%rsi", "%rdx", "%rcx", "%r8", "%r9"];

/// AST-to-assembly emitter for one translation unit
pub struct AsmEmitter<'a> {
    ast: &'a Ast,
    types: &'a TypeStore,
    out: String,
    /// Outstanding intermediate-value spills on the machine stack
    depth: usize,
    label_counter: u32,
    /// Frame offsets of the current function's parameters and locals
    offsets: FxHashMap<DeclId, i64>,
    break_labels: Vec<String>,
    continue_labels: Vec<String>,
    /// String literals to place in .rodata at the end
    strings: Vec<(String, Symbol)>,
}

impl<'a> AsmEmitter<'a> {
    /// Create an emitter over a finished AST
    pub fn new(ast: &'a Ast, types: &'a TypeStore) -> Self {
        Self {
            ast,
            types,
            out: String::new(),
            depth: 0,
            label_counter: 0,
            offsets: FxHashMap::default(),
            break_labels: Vec::new(),
            continue_labels: Vec::new(),
            strings: Vec::new(),
        }
    }

    /// Emit the whole translation unit, visiting each top-level
    /// declaration in source order
    pub fn emit_translation_unit(mut self) -> Result<String, EmitError> {
        let top_level = self.ast.top_level.clone();
        for decl in top_level {
            self.emit_decl(decl)?;
        }
        self.flush_strings();
        Ok(self.out)
    }

    // =========================================================================
    // OUTPUT HELPERS
    // =========================================================================

    fn ins(&mut self, text: impl AsRef<str>) {
        self.out.push_str("    ");
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn label(&mut self, name: &str) {
        self.out.push_str(name);
        self.out.push_str(":\n");
    }

    fn raw(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn new_label(&mut self) -> String {
        let label = format!(".L{}", self.label_counter);
        self.label_counter += 1;
        label
    }

    fn push(&mut self) {
        self.ins("pushq %rax");
        self.depth += 1;
    }

    fn pop(&mut self, reg: &str) {
        self.ins(format!("popq {}", reg));
        self.depth -= 1;
    }

    /// True for types whose "value" is their address
    fn is_aggregate(&self, ty: TypeId) -> bool {
        matches!(
            self.types.kind(ty),
            TypeKind::Array { .. } | TypeKind::Record { .. } | TypeKind::Function { .. }
        )
    }

    /// Load a value of the given type from `(addr_reg)` into `%rax`
    fn load(&mut self, ty: TypeId, addr_reg: &str) {
        if self.is_aggregate(ty) {
            if addr_reg != "%rax" {
                self.ins(format!("movq {}, %rax", addr_reg));
            }
            return;
        }
        let size = self.types.size_of(ty).max(1);
        let signed = self.types.is_signed(ty);
        let text = match (size, signed) {
            (1, true) => format!("movsbq ({}), %rax", addr_reg),
            (1, false) => format!("movzbq ({}), %rax", addr_reg),
            (2, true) => format!("movswq ({}), %rax", addr_reg),
            (2, false) => format!("movzwq ({}), %rax", addr_reg),
            (4, true) => format!("movslq ({}), %rax", addr_reg),
            (4, false) => format!("movl ({}), %eax", addr_reg),
            _ => format!("movq ({}), %rax", addr_reg),
        };
        self.ins(text);
    }

    /// Store `%rax` as a value of the given type into `(addr_reg)`
    fn store(&mut self, ty: TypeId, addr_reg: &str) {
        let size = self.types.size_of(ty).max(1);
        let text = match size {
            1 => format!("movb %al, ({})", addr_reg),
            2 => format!("movw %ax, ({})", addr_reg),
            4 => format!("movl %eax, ({})", addr_reg),
            _ => format!("movq %rax, ({})", addr_reg),
        };
        self.ins(text);
    }

    fn flush_strings(&mut self) {
        if self.strings.is_empty() {
            return;
        }
        self.raw(".section .rodata");
        let strings = std::mem::take(&mut self.strings);
        for (label, content) in strings {
            self.label(&label);
            let escaped: String = content
                .as_str()
                .chars()
                .flat_map(|c| c.escape_default())
                .collect();
            self.ins(format!(".string \"{}\"", escaped));
        }
    }

    // =========================================================================
    // DECLARATIONS
    // =========================================================================

    /// Declaration visitor; dispatches on the variant
    pub fn emit_decl(&mut self, id: DeclId) -> Result<(), EmitError> {
        match self.ast.decl(id) {
            Decl::Function(f) => {
                let f = f.clone();
                self.emit_function(&f)
            }
            Decl::Var(v) => {
                let v = v.clone();
                self.emit_global_var(&v)
            }
            // Types produce no code.
            Decl::Record(_) | Decl::Typedef(_) | Decl::Enum(_) | Decl::Label(_) => Ok(()),
        }
    }

    fn emit_global_var(&mut self, v: &VarDecl) -> Result<(), EmitError> {
        if v.storage == StorageClass::Extern {
            return Ok(());
        }
        let size = self.types.size_of(v.ty).max(1);
        let align = self.types.align_of(v.ty).max(1);

        match v.init {
            None => {
                self.raw(format!(".comm {},{},{}", v.name, size, align));
            }
            Some(init) => {
                let ExprKind::IntLit(value) = self.ast.expr(init).kind else {
                    return Err(EmitError::Unsupported(format!(
                        "non-constant initialiser for global '{}'",
                        v.name
                    )));
                };
                self.raw(".data");
                if v.storage != StorageClass::Static {
                    self.raw(format!(".globl {}", v.name));
                }
                self.label(&v.name.to_string());
                let directive = match size {
                    1 => "byte",
                    2 => "value",
                    4 => "long",
                    _ => "quad",
                };
                self.ins(format!(".{} {}", directive, value));
            }
        }
        Ok(())
    }

    fn emit_function(&mut self, f: &FunctionDecl) -> Result<(), EmitError> {
        let Some(body) = f.body else {
            // Forward declaration; the symbol is external.
            return Ok(());
        };

        if f.params.len() > ARG_REGS.len() {
            return Err(EmitError::TooManyArguments {
                max: ARG_REGS.len(),
                found: f.params.len(),
            });
        }

        // Frame layout: one 8-byte-aligned slot per parameter and local.
        self.offsets.clear();
        let mut offset = 0i64;
        for &decl in f.params.iter().chain(f.locals.iter()) {
            let ty = self.ast.decl(decl).ty().unwrap_or(TypeStore::INT);
            let size = (self.types.size_of(ty).max(1) + 7) / 8 * 8;
            offset -= size as i64;
            self.offsets.insert(decl, offset);
        }
        let frame = (-offset + 15) / 16 * 16;

        self.raw(".text");
        if f.storage != StorageClass::Static {
            self.raw(format!(".globl {}", f.name));
        }
        self.label(&f.name.to_string());
        self.ins("pushq %rbp");
        self.ins("movq %rsp, %rbp");
        if frame > 0 {
            self.ins(format!("subq ${}, %rsp", frame));
        }

        for (i, &param) in f.params.iter().enumerate() {
            let slot = self.offsets[&param];
            self.ins(format!("movq {}, {}(%rbp)", ARG_REGS[i], slot));
        }

        self.emit_stmt(body)?;

        // Fallback epilogue for bodies that fall off the end.
        self.ins("movl $0, %eax");
        self.ins("leave");
        self.ins("ret");
        Ok(())
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    /// Statement visitor; dispatches on the variant
    pub fn emit_stmt(&mut self, id: StmtId) -> Result<(), EmitError> {
        debug_assert_eq!(self.depth, 0, "spill stack must be balanced between statements");
        match self.ast.stmt(id).clone() {
            Stmt::Compound(s) => {
                for stmt in s.stmts {
                    self.emit_stmt(stmt)?;
                }
                Ok(())
            }
            Stmt::If(s) => {
                let else_label = self.new_label();
                let end_label = self.new_label();
                self.emit_expr(s.cond)?;
                self.ins("cmpq $0, %rax");
                self.ins(format!("je {}", else_label));
                self.emit_stmt(s.then_branch)?;
                self.ins(format!("jmp {}", end_label));
                self.label(&else_label);
                if let Some(els) = s.else_branch {
                    self.emit_stmt(els)?;
                }
                self.label(&end_label);
                Ok(())
            }
            Stmt::While(s) => {
                let begin = self.new_label();
                let end = self.new_label();
                self.label(&begin);
                self.emit_expr(s.cond)?;
                self.ins("cmpq $0, %rax");
                self.ins(format!("je {}", end));
                self.break_labels.push(end.clone());
                self.continue_labels.push(begin.clone());
                self.emit_stmt(s.body)?;
                self.continue_labels.pop();
                self.break_labels.pop();
                self.ins(format!("jmp {}", begin));
                self.label(&end);
                Ok(())
            }
            Stmt::DoWhile(s) => {
                let begin = self.new_label();
                let check = self.new_label();
                let end = self.new_label();
                self.label(&begin);
                self.break_labels.push(end.clone());
                self.continue_labels.push(check.clone());
                self.emit_stmt(s.body)?;
                self.continue_labels.pop();
                self.break_labels.pop();
                self.label(&check);
                self.emit_expr(s.cond)?;
                self.ins("cmpq $0, %rax");
                self.ins(format!("jne {}", begin));
                self.label(&end);
                Ok(())
            }
            Stmt::For(s) => {
                let begin = self.new_label();
                let step_label = self.new_label();
                let end = self.new_label();
                if let Some(init) = s.init {
                    self.emit_stmt(init)?;
                }
                self.label(&begin);
                if let Some(cond) = s.cond {
                    // The condition header is an expression statement.
                    if let Stmt::Expr(cond_stmt) = self.ast.stmt(cond).clone() {
                        if let Some(expr) = cond_stmt.expr {
                            self.emit_expr(expr)?;
                            self.ins("cmpq $0, %rax");
                            self.ins(format!("je {}", end));
                        }
                    }
                }
                self.break_labels.push(end.clone());
                self.continue_labels.push(step_label.clone());
                self.emit_stmt(s.body)?;
                self.continue_labels.pop();
                self.break_labels.pop();
                self.label(&step_label);
                if let Some(step) = s.step {
                    self.emit_expr(step)?;
                }
                self.ins(format!("jmp {}", begin));
                self.label(&end);
                Ok(())
            }
            Stmt::Switch(s) => self.emit_switch(&s),
            Stmt::Case(s) => {
                self.label(&format!(".Lcase{}", s.label));
                self.emit_stmt(s.body)
            }
            Stmt::Return(s) => {
                if let Some(value) = s.value {
                    self.emit_expr(value)?;
                }
                self.ins("leave");
                self.ins("ret");
                Ok(())
            }
            Stmt::Break(_) => match self.break_labels.last().cloned() {
                Some(label) => {
                    self.ins(format!("jmp {}", label));
                    Ok(())
                }
                None => Err(EmitError::StrayJump("break")),
            },
            Stmt::Continue(_) => match self.continue_labels.last().cloned() {
                Some(label) => {
                    self.ins(format!("jmp {}", label));
                    Ok(())
                }
                None => Err(EmitError::StrayJump("continue")),
            },
            Stmt::Goto(s) => Err(EmitError::Unsupported(format!("goto '{}'", s.label))),
            Stmt::Labeled(s) => {
                let label = self.new_label();
                self.label(&label);
                self.emit_stmt(s.body)
            }
            Stmt::Decl(s) => {
                for decl in s.decls {
                    self.emit_local_decl(decl)?;
                }
                Ok(())
            }
            Stmt::Expr(s) => {
                if let Some(expr) = s.expr {
                    self.emit_expr(expr)?;
                }
                Ok(())
            }
        }
    }

    fn emit_local_decl(&mut self, id: DeclId) -> Result<(), EmitError> {
        let Decl::Var(v) = self.ast.decl(id).clone() else {
            return Ok(());
        };
        let Some(init) = v.init else {
            return Ok(());
        };
        let slot = match self.offsets.get(&id) {
            Some(&slot) => slot,
            None => {
                return Err(EmitError::Unsupported(format!(
                    "local '{}' without a frame slot",
                    v.name
                )))
            }
        };
        self.emit_expr(init)?;
        self.ins(format!("leaq {}(%rbp), %rcx", slot));
        self.store(v.ty, "%rcx");
        Ok(())
    }

    fn emit_switch(&mut self, s: &zinc_par::SwitchStmt) -> Result<(), EmitError> {
        self.emit_expr(s.cond)?;
        let end = self.new_label();

        let Stmt::Compound(body) = self.ast.stmt(s.body).clone() else {
            return Err(EmitError::Unsupported("switch body shape".to_string()));
        };

        // Compare chain over the directly nested cases.
        let mut default_label = None;
        for &stmt in &body.stmts {
            if let Stmt::Case(case) = self.ast.stmt(stmt) {
                let label = format!(".Lcase{}", case.label);
                if case.is_default {
                    default_label = Some(label);
                    continue;
                }
                let value = case.value.expect("non-default case carries a value");
                let ExprKind::IntLit(value) = self.ast.expr(value).kind else {
                    return Err(EmitError::Unsupported(
                        "non-constant case value".to_string(),
                    ));
                };
                self.ins(format!("cmpq ${}, %rax", value));
                self.ins(format!("je {}", label));
            }
        }
        let fallthrough = default_label.unwrap_or_else(|| end.clone());
        self.ins(format!("jmp {}", fallthrough));

        self.break_labels.push(end.clone());
        self.emit_stmt(s.body)?;
        self.break_labels.pop();
        self.label(&end);
        Ok(())
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    /// Expression visitor; leaves the value in `%rax`
    pub fn emit_expr(&mut self, id: ExprId) -> Result<(), EmitError> {
        let expr = self.ast.expr(id).clone();
        match expr.kind {
            ExprKind::IntLit(value) => {
                if value as i32 as i64 == value {
                    self.ins(format!("movq ${}, %rax", value));
                } else {
                    self.ins(format!("movabsq ${}, %rax", value));
                }
                Ok(())
            }
            ExprKind::FloatLit(_) => Err(EmitError::Unsupported(
                "floating-point arithmetic".to_string(),
            )),
            ExprKind::CharLit(c) => {
                self.ins(format!("movq ${}, %rax", c as i64));
                Ok(())
            }
            ExprKind::StrLit(content) => {
                let label = format!(".Lstr{}", self.strings.len());
                self.strings.push((label.clone(), content));
                self.ins(format!("leaq {}(%rip), %rax", label));
                Ok(())
            }
            ExprKind::DeclRef(_)
            | ExprKind::Member { .. }
            | ExprKind::ArraySubscript { .. } => {
                self.emit_lvalue_address(id)?;
                self.load(expr.ty, "%rax");
                Ok(())
            }
            ExprKind::Unary { op, operand } => self.emit_unary(op, operand, expr.ty),
            ExprKind::Binary { op, lhs, rhs } => self.emit_binary(op, lhs, rhs),
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                let else_label = self.new_label();
                let end_label = self.new_label();
                self.emit_expr(cond)?;
                self.ins("cmpq $0, %rax");
                self.ins(format!("je {}", else_label));
                self.emit_expr(then_expr)?;
                self.ins(format!("jmp {}", end_label));
                self.label(&else_label);
                self.emit_expr(else_expr)?;
                self.label(&end_label);
                Ok(())
            }
            ExprKind::Call { callee, args } => self.emit_call(callee, &args),
            ExprKind::Cast { operand } => self.emit_expr(operand),
            ExprKind::InitList { .. } => {
                Err(EmitError::Unsupported("initializer lists".to_string()))
            }
        }
    }

    fn emit_unary(&mut self, op: UnaryOp, operand: ExprId, ty: TypeId) -> Result<(), EmitError> {
        match op {
            UnaryOp::AddressOf => self.emit_lvalue_address(operand),
            UnaryOp::Deref => {
                self.emit_expr(operand)?;
                self.load(ty, "%rax");
                Ok(())
            }
            UnaryOp::Plus => self.emit_expr(operand),
            UnaryOp::Minus => {
                self.emit_expr(operand)?;
                self.ins("negq %rax");
                Ok(())
            }
            UnaryOp::Not => {
                self.emit_expr(operand)?;
                self.ins("cmpq $0, %rax");
                self.ins("sete %al");
                self.ins("movzbq %al, %rax");
                Ok(())
            }
            UnaryOp::BitNot => {
                self.emit_expr(operand)?;
                self.ins("notq %rax");
                Ok(())
            }
            UnaryOp::PreIncrement | UnaryOp::PreDecrement => {
                let operand_ty = self.ast.expr(operand).ty;
                self.emit_lvalue_address(operand)?;
                self.ins("movq %rax, %rdx");
                self.load(operand_ty, "%rdx");
                let op_text = if op == UnaryOp::PreIncrement {
                    "addq $1, %rax"
                } else {
                    "subq $1, %rax"
                };
                self.ins(op_text);
                self.store(operand_ty, "%rdx");
                Ok(())
            }
            UnaryOp::PostIncrement | UnaryOp::PostDecrement => {
                let operand_ty = self.ast.expr(operand).ty;
                self.emit_lvalue_address(operand)?;
                self.ins("movq %rax, %rdx");
                self.load(operand_ty, "%rdx");
                self.ins("movq %rax, %rcx");
                let op_text = if op == UnaryOp::PostIncrement {
                    "addq $1, %rax"
                } else {
                    "subq $1, %rax"
                };
                self.ins(op_text);
                self.store(operand_ty, "%rdx");
                self.ins("movq %rcx, %rax");
                Ok(())
            }
        }
    }

    fn emit_binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> Result<(), EmitError> {
        // Assignment family: address of the left side, value of the right.
        if op == BinaryOp::Assign {
            let lhs_ty = self.ast.expr(lhs).ty;
            self.emit_lvalue_address(lhs)?;
            self.push();
            self.emit_expr(rhs)?;
            self.pop("%rcx");
            self.store(lhs_ty, "%rcx");
            return Ok(());
        }
        if op.is_assignment() {
            return self.emit_compound_assign(op, lhs, rhs);
        }

        // Short-circuit operators control evaluation order themselves.
        if op == BinaryOp::LogicalAnd || op == BinaryOp::LogicalOr {
            return self.emit_short_circuit(op, lhs, rhs);
        }

        if op == BinaryOp::Comma {
            self.emit_expr(lhs)?;
            self.emit_expr(rhs)?;
            return Ok(());
        }

        self.emit_expr(lhs)?;
        self.push();
        self.emit_expr(rhs)?;
        self.ins("movq %rax, %rcx");
        self.pop("%rax");

        match op {
            BinaryOp::Add => self.ins("addq %rcx, %rax"),
            BinaryOp::Sub => self.ins("subq %rcx, %rax"),
            BinaryOp::Mul => self.ins("imulq %rcx, %rax"),
            BinaryOp::Div => {
                self.ins("cqto");
                self.ins("idivq %rcx");
            }
            BinaryOp::Rem => {
                self.ins("cqto");
                self.ins("idivq %rcx");
                self.ins("movq %rdx, %rax");
            }
            BinaryOp::BitAnd => self.ins("andq %rcx, %rax"),
            BinaryOp::BitOr => self.ins("orq %rcx, %rax"),
            BinaryOp::BitXor => self.ins("xorq %rcx, %rax"),
            BinaryOp::Shl => self.ins("salq %cl, %rax"),
            BinaryOp::Shr => self.ins("sarq %cl, %rax"),
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => {
                self.ins("cmpq %rcx, %rax");
                let set = match op {
                    BinaryOp::Eq => "sete",
                    BinaryOp::Ne => "setne",
                    BinaryOp::Lt => "setl",
                    BinaryOp::Le => "setle",
                    BinaryOp::Gt => "setg",
                    _ => "setge",
                };
                self.ins(format!("{} %al", set));
                self.ins("movzbq %al, %rax");
            }
            _ => unreachable!("handled above"),
        }
        Ok(())
    }

    fn emit_compound_assign(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Result<(), EmitError> {
        let lhs_ty = self.ast.expr(lhs).ty;
        self.emit_lvalue_address(lhs)?;
        self.push();
        self.emit_expr(rhs)?;
        self.ins("movq %rax, %rcx");
        self.pop("%rdx");
        self.load(lhs_ty, "%rdx");

        match op {
            BinaryOp::AddAssign => self.ins("addq %rcx, %rax"),
            BinaryOp::SubAssign => self.ins("subq %rcx, %rax"),
            BinaryOp::MulAssign => self.ins("imulq %rcx, %rax"),
            BinaryOp::AndAssign => self.ins("andq %rcx, %rax"),
            BinaryOp::OrAssign => self.ins("orq %rcx, %rax"),
            BinaryOp::XorAssign => self.ins("xorq %rcx, %rax"),
            BinaryOp::ShlAssign => self.ins("salq %cl, %rax"),
            BinaryOp::ShrAssign => self.ins("sarq %cl, %rax"),
            BinaryOp::DivAssign | BinaryOp::ModAssign => {
                // idiv clobbers %rdx, which holds the target address.
                self.ins("pushq %rdx");
                self.depth += 1;
                self.ins("cqto");
                self.ins("idivq %rcx");
                if op == BinaryOp::ModAssign {
                    self.ins("movq %rdx, %rax");
                }
                self.pop("%rdx");
            }
            _ => unreachable!("not a compound assignment"),
        }

        self.store(lhs_ty, "%rdx");
        Ok(())
    }

    fn emit_short_circuit(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Result<(), EmitError> {
        let short = self.new_label();
        let end = self.new_label();
        let is_and = op == BinaryOp::LogicalAnd;

        self.emit_expr(lhs)?;
        self.ins("cmpq $0, %rax");
        self.ins(format!("{} {}", if is_and { "je" } else { "jne" }, short));
        self.emit_expr(rhs)?;
        self.ins("cmpq $0, %rax");
        self.ins(format!("{} {}", if is_and { "je" } else { "jne" }, short));
        self.ins(format!(
            "movq ${}, %rax",
            if is_and { 1 } else { 0 }
        ));
        self.ins(format!("jmp {}", end));
        self.label(&short);
        self.ins(format!(
            "movq ${}, %rax",
            if is_and { 0 } else { 1 }
        ));
        self.label(&end);
        Ok(())
    }

    fn emit_call(&mut self, callee: ExprId, args: &[ExprId]) -> Result<(), EmitError> {
        let ExprKind::DeclRef(decl) = self.ast.expr(callee).kind else {
            return Err(EmitError::Unsupported("indirect calls".to_string()));
        };
        let name = match self.ast.decl(decl) {
            Decl::Function(f) => f.name,
            _ => {
                return Err(EmitError::Unsupported(
                    "call of a non-function object".to_string(),
                ))
            }
        };
        if args.len() > ARG_REGS.len() {
            return Err(EmitError::TooManyArguments {
                max: ARG_REGS.len(),
                found: args.len(),
            });
        }

        for &arg in args {
            self.emit_expr(arg)?;
            self.push();
        }
        for i in (0..args.len()).rev() {
            self.pop(ARG_REGS[i]);
        }

        // Keep %rsp 16-byte aligned across the call.
        let misaligned = self.depth % 2 == 1;
        if misaligned {
            self.ins("subq $8, %rsp");
        }
        self.ins(format!("call {}", name));
        if misaligned {
            self.ins("addq $8, %rsp");
        }
        Ok(())
    }

    /// Compute the address of an lvalue expression into `%rax`
    fn emit_lvalue_address(&mut self, id: ExprId) -> Result<(), EmitError> {
        let expr = self.ast.expr(id).clone();
        match expr.kind {
            ExprKind::DeclRef(decl) => {
                if let Some(&slot) = self.offsets.get(&decl) {
                    self.ins(format!("leaq {}(%rbp), %rax", slot));
                    return Ok(());
                }
                let name = match self.ast.decl(decl) {
                    Decl::Var(v) => v.name,
                    Decl::Function(f) => f.name,
                    _ => {
                        return Err(EmitError::Unsupported(
                            "reference to a non-object declaration".to_string(),
                        ))
                    }
                };
                self.ins(format!("leaq {}(%rip), %rax", name));
                Ok(())
            }
            ExprKind::Unary {
                op: UnaryOp::Deref,
                operand,
            } => self.emit_expr(operand),
            ExprKind::ArraySubscript { base, index } => {
                let elem_size = self.types.size_of(expr.ty).max(1);
                self.emit_expr(base)?;
                self.push();
                self.emit_expr(index)?;
                self.ins(format!("imulq ${}, %rax", elem_size));
                self.ins("movq %rax, %rcx");
                self.pop("%rax");
                self.ins("addq %rcx, %rax");
                Ok(())
            }
            ExprKind::Member {
                base, index, arrow, ..
            } => {
                let base_ty = self.ast.expr(base).ty;
                let record_ty = if arrow {
                    self.types.pointee(base_ty).unwrap_or(base_ty)
                } else {
                    base_ty
                };
                if arrow {
                    self.emit_expr(base)?;
                } else {
                    self.emit_lvalue_address(base)?;
                }
                let offset = self.types.member_offset(record_ty, index);
                if offset > 0 {
                    self.ins(format!("addq ${}, %rax", offset));
                }
                Ok(())
            }
            ExprKind::Cast { operand } => self.emit_lvalue_address(operand),
            _ => Err(EmitError::Unsupported(
                "expression is not an lvalue".to_string(),
            )),
        }
    }
}
