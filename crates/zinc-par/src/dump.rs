//! Deterministic textual AST dump.
//!
//! One node per line, two-space indentation, the resolved type in
//! single quotes. The output depends only on the AST and type store
//! contents, so dumping the same tree twice yields identical text; the
//! tests rely on this.

use zinc_sem::TypeStore;
use zinc_util::{DeclId, ExprId, StmtId};

use crate::ast::{Ast, Decl, ExprKind, Stmt};

/// Render a translation unit as an indented tree
pub fn dump(ast: &Ast, types: &TypeStore) -> String {
    let mut dumper = Dumper {
        ast,
        types,
        out: String::new(),
        depth: 0,
    };
    dumper.line("TranslationUnit");
    dumper.depth += 1;
    for &decl in &ast.top_level {
        dumper.dump_decl(decl);
    }
    dumper.out
}

struct Dumper<'a> {
    ast: &'a Ast,
    types: &'a TypeStore,
    out: String,
    depth: usize,
}

impl<'a> Dumper<'a> {
    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn dump_decl(&mut self, id: DeclId) {
        match self.ast.decl(id) {
            Decl::Var(v) => {
                self.line(format!("Var {} '{}'", v.name, self.types.display(v.ty)));
                if let Some(init) = v.init {
                    self.nested(|d| d.dump_expr(init));
                }
            }
            Decl::Function(f) => {
                self.line(format!(
                    "Function {} '{}'",
                    f.name,
                    self.types.display(f.ty)
                ));
                let params = f.params.clone();
                let body = f.body;
                self.nested(|d| {
                    for param in params {
                        if let Decl::Var(p) = d.ast.decl(param) {
                            d.line(format!("Param {} '{}'", p.name, d.types.display(p.ty)));
                        }
                    }
                    if let Some(body) = body {
                        d.dump_stmt(body);
                    }
                });
            }
            Decl::Record(r) => {
                self.line(format!("Record '{}'", self.types.display(r.ty)));
            }
            Decl::Typedef(t) => {
                self.line(format!("Typedef {} '{}'", t.name, self.types.display(t.ty)));
            }
            Decl::Enum(e) => match e.name {
                Some(name) => self.line(format!("Enum {}", name)),
                None => self.line("Enum"),
            },
            Decl::Label(l) => {
                self.line(format!("Label {}", l.name));
            }
        }
    }

    fn dump_stmt(&mut self, id: StmtId) {
        match self.ast.stmt(id).clone() {
            Stmt::Compound(s) => {
                self.line("Compound");
                self.nested(|d| {
                    for stmt in s.stmts {
                        d.dump_stmt(stmt);
                    }
                });
            }
            Stmt::If(s) => {
                self.line("If");
                self.nested(|d| {
                    d.dump_expr(s.cond);
                    d.dump_stmt(s.then_branch);
                    if let Some(els) = s.else_branch {
                        d.dump_stmt(els);
                    }
                });
            }
            Stmt::While(s) => {
                self.line("While");
                self.nested(|d| {
                    d.dump_expr(s.cond);
                    d.dump_stmt(s.body);
                });
            }
            Stmt::DoWhile(s) => {
                self.line("DoWhile");
                self.nested(|d| {
                    d.dump_stmt(s.body);
                    d.dump_expr(s.cond);
                });
            }
            Stmt::For(s) => {
                self.line("For");
                self.nested(|d| {
                    if let Some(init) = s.init {
                        d.dump_stmt(init);
                    }
                    if let Some(cond) = s.cond {
                        d.dump_stmt(cond);
                    }
                    if let Some(step) = s.step {
                        d.dump_expr(step);
                    }
                    d.dump_stmt(s.body);
                });
            }
            Stmt::Switch(s) => {
                self.line("Switch");
                self.nested(|d| {
                    d.dump_expr(s.cond);
                    d.dump_stmt(s.body);
                });
            }
            Stmt::Case(s) => {
                if s.is_default {
                    self.line(format!("Default #{}", s.label));
                } else {
                    self.line(format!("Case #{}", s.label));
                }
                self.nested(|d| {
                    if let Some(value) = s.value {
                        d.dump_expr(value);
                    }
                    d.dump_stmt(s.body);
                });
            }
            Stmt::Return(s) => {
                self.line("Return");
                if let Some(value) = s.value {
                    self.nested(|d| d.dump_expr(value));
                }
            }
            Stmt::Break(_) => self.line("Break"),
            Stmt::Continue(_) => self.line("Continue"),
            Stmt::Goto(s) => self.line(format!("Goto {}", s.label)),
            Stmt::Labeled(s) => {
                let name = match self.ast.decl(s.decl) {
                    Decl::Label(l) => l.name,
                    _ => unreachable!("labeled statements reference label decls"),
                };
                self.line(format!("Labeled {}", name));
                self.nested(|d| d.dump_stmt(s.body));
            }
            Stmt::Decl(s) => {
                self.line("Decl");
                self.nested(|d| {
                    for decl in s.decls {
                        d.dump_decl(decl);
                    }
                });
            }
            Stmt::Expr(s) => {
                self.line("ExprStmt");
                if let Some(expr) = s.expr {
                    self.nested(|d| d.dump_expr(expr));
                }
            }
        }
    }

    fn dump_expr(&mut self, id: ExprId) {
        let expr = self.ast.expr(id).clone();
        let ty = self.types.display(expr.ty);
        match expr.kind {
            ExprKind::IntLit(value) => self.line(format!("IntLit {} '{}'", value, ty)),
            ExprKind::FloatLit(value) => self.line(format!("FloatLit {} '{}'", value, ty)),
            ExprKind::CharLit(value) => self.line(format!("CharLit {:?} '{}'", value, ty)),
            ExprKind::StrLit(value) => {
                self.line(format!("StrLit {:?} '{}'", value.as_str(), ty))
            }
            ExprKind::DeclRef(decl) => {
                let name = self
                    .ast
                    .decl(decl)
                    .name()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "<anonymous>".to_string());
                self.line(format!("DeclRef {} '{}'", name, ty));
            }
            ExprKind::Unary { op, operand } => {
                self.line(format!("Unary {} '{}'", op.symbol(), ty));
                self.nested(|d| d.dump_expr(operand));
            }
            ExprKind::Binary { op, lhs, rhs } => {
                self.line(format!("Binary {} '{}'", op.symbol(), ty));
                self.nested(|d| {
                    d.dump_expr(lhs);
                    d.dump_expr(rhs);
                });
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.line(format!("Conditional '{}'", ty));
                self.nested(|d| {
                    d.dump_expr(cond);
                    d.dump_expr(then_expr);
                    d.dump_expr(else_expr);
                });
            }
            ExprKind::Call { callee, args } => {
                self.line(format!("Call '{}'", ty));
                self.nested(|d| {
                    d.dump_expr(callee);
                    for arg in args {
                        d.dump_expr(arg);
                    }
                });
            }
            ExprKind::Member {
                base,
                member,
                index,
                arrow,
            } => {
                let op = if arrow { "->" } else { "." };
                self.line(format!("Member {}{} #{} '{}'", op, member, index, ty));
                self.nested(|d| d.dump_expr(base));
            }
            ExprKind::ArraySubscript { base, index } => {
                self.line(format!("ArraySubscript '{}'", ty));
                self.nested(|d| {
                    d.dump_expr(base);
                    d.dump_expr(index);
                });
            }
            ExprKind::Cast { operand } => {
                self.line(format!("Cast '{}'", ty));
                self.nested(|d| d.dump_expr(operand));
            }
            ExprKind::InitList { elems } => {
                self.line(format!("InitList '{}'", ty));
                self.nested(|d| {
                    for elem in elems {
                        d.dump_expr(elem);
                    }
                });
            }
        }
    }
}
