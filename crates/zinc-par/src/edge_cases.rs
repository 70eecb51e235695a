//! Parser edge cases and end-to-end scenarios.

use crate::ast::{Decl, ExprKind, Stmt};
use crate::{dump, parse, Ast, BinaryOp, Parser, UnaryOp};
use zinc_sem::{RecordKind, TypeKind, TypeStore};
use zinc_util::{ErrorKind, ExprId, Symbol};

fn parse_ok(source: &str) -> (Ast, TypeStore) {
    parse(source).expect("expected successful parse")
}

fn parse_err(source: &str) -> zinc_util::CompileError {
    parse(source).expect_err("expected parse failure")
}

/// The first top-level function with the given name
fn function<'a>(ast: &'a Ast, name: &str) -> &'a crate::FunctionDecl {
    let sym = Symbol::intern(name);
    ast.top_level
        .iter()
        .find_map(|&id| match ast.decl(id) {
            Decl::Function(f) if f.name == sym => Some(f),
            _ => None,
        })
        .expect("function not found")
}

/// The expression returned by the first `return` in the function body
fn return_expr(ast: &Ast, name: &str) -> ExprId {
    let f = function(ast, name);
    let body = f.body.expect("function has no body");
    let Stmt::Compound(compound) = ast.stmt(body) else {
        panic!("function body is not a compound statement");
    };
    compound
        .stmts
        .iter()
        .find_map(|&id| match ast.stmt(id) {
            Stmt::Return(r) => r.value,
            _ => None,
        })
        .expect("no return with a value")
}

/// Parse `expr` in a context where a, b, c, d are global ints
fn parse_return_of(expr: &str) -> (Ast, TypeStore, ExprId) {
    let source = format!("int a; int b; int c; int d; int f() {{ return {}; }}", expr);
    let (ast, types) = parse_ok(&source);
    let expr = return_expr(&ast, "f");
    (ast, types, expr)
}

// =============================================================================
// CONCRETE SCENARIOS
// =============================================================================

#[test]
fn test_scenario_minimal_main() {
    let (ast, types) = parse_ok("int main(void) { return 0; }");

    assert_eq!(ast.top_level.len(), 1);
    let main = function(&ast, "main");
    assert_eq!(types.display(main.ty), "int(void)");
    assert!(main.params.is_empty());

    let Stmt::Compound(body) = ast.stmt(main.body.unwrap()) else {
        panic!("expected compound body");
    };
    assert_eq!(body.stmts.len(), 1);
    let Stmt::Return(ret) = ast.stmt(body.stmts[0]) else {
        panic!("expected return");
    };
    let value = ast.expr(ret.value.unwrap());
    assert!(matches!(value.kind, ExprKind::IntLit(0)));
    assert_eq!(value.ty, TypeStore::INT);
}

#[test]
fn test_scenario_declarator_chain_initialisers() {
    let (ast, _) = parse_ok("int x = 1, y, z = 3;");

    assert_eq!(ast.top_level.len(), 3);
    let vars: Vec<_> = ast
        .top_level
        .iter()
        .map(|&id| match ast.decl(id) {
            Decl::Var(v) => v,
            _ => panic!("expected variable"),
        })
        .collect();

    assert_eq!(vars[0].name, Symbol::intern("x"));
    assert!(matches!(
        ast.expr(vars[0].init.unwrap()).kind,
        ExprKind::IntLit(1)
    ));
    assert_eq!(vars[1].name, Symbol::intern("y"));
    assert!(vars[1].init.is_none());
    assert_eq!(vars[2].name, Symbol::intern("z"));
    assert!(matches!(
        ast.expr(vars[2].init.unwrap()).kind,
        ExprKind::IntLit(3)
    ));
}

#[test]
fn test_scenario_typedef_function() {
    let (ast, types) = parse_ok("typedef unsigned int U; U f(U a) { return a + 1; }");

    let f = function(&ast, "f");
    let TypeKind::Function { ret, params } = types.kind(f.ty) else {
        panic!("expected function type");
    };
    assert_eq!(types.kind(*ret), &TypeKind::Int { signed: false });
    assert_eq!(params.len(), 1);
    assert_eq!(types.kind(params[0]), &TypeKind::Int { signed: false });

    // The `+` node takes the type of its operand.
    let plus = ast.expr(return_expr(&ast, "f"));
    let ExprKind::Binary { op, lhs, .. } = plus.kind else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(plus.ty, ast.expr(lhs).ty);
    assert_eq!(types.kind(plus.ty), &TypeKind::Int { signed: false });
}

#[test]
fn test_scenario_global_array_subscript() {
    let (ast, types) = parse_ok("int a[3]; int main() { return a[1]; }");

    let Decl::Var(a) = ast.decl(ast.top_level[0]) else {
        panic!("expected variable");
    };
    assert_eq!(
        types.kind(a.ty),
        &TypeKind::Array {
            elem: TypeStore::INT,
            len: Some(3)
        }
    );

    let subscript = ast.expr(return_expr(&ast, "main"));
    let ExprKind::ArraySubscript { base, index } = subscript.kind else {
        panic!("expected array subscript");
    };
    assert_eq!(subscript.ty, TypeStore::INT);
    let ExprKind::DeclRef(decl) = ast.expr(base).kind else {
        panic!("expected decl ref");
    };
    assert_eq!(decl, ast.top_level[0]);
    assert!(matches!(ast.expr(index).kind, ExprKind::IntLit(1)));
}

#[test]
fn test_scenario_struct_member_access() {
    let (ast, types) =
        parse_ok("struct P { int x; int y; }; int f(struct P p) { return p.x; }");

    let Decl::Record(record) = ast.decl(ast.top_level[0]) else {
        panic!("expected record declaration");
    };
    let TypeKind::Record { kind, members } = types.kind(record.ty) else {
        panic!("expected record type");
    };
    assert_eq!(*kind, RecordKind::Struct);
    assert_eq!(members.len(), 2);

    let member = ast.expr(return_expr(&ast, "f"));
    let ExprKind::Member {
        index,
        arrow,
        member: name,
        ..
    } = member.kind
    else {
        panic!("expected member access");
    };
    assert_eq!(name, Symbol::intern("x"));
    assert_eq!(index, 0);
    assert!(!arrow);
    assert_eq!(member.ty, TypeStore::INT);
}

#[test]
fn test_scenario_for_loop() {
    let (ast, _) =
        parse_ok("int f() { int i; for (i = 0; i < 10; i = i + 1) { } return i; }");

    let f = function(&ast, "f");
    let Stmt::Compound(body) = ast.stmt(f.body.unwrap()) else {
        panic!("expected compound body");
    };
    let for_stmt = body
        .stmts
        .iter()
        .find_map(|&id| match ast.stmt(id) {
            Stmt::For(s) => Some(s),
            _ => None,
        })
        .expect("no for statement");

    // init: `i = 0;` as an expression statement
    let Stmt::Expr(init) = ast.stmt(for_stmt.init.unwrap()) else {
        panic!("expected expression statement init");
    };
    let ExprKind::Binary { op, .. } = ast.expr(init.expr.unwrap()).kind else {
        panic!("expected assignment init");
    };
    assert_eq!(op, BinaryOp::Assign);

    // cond: `i < 10;`
    let Stmt::Expr(cond) = ast.stmt(for_stmt.cond.unwrap()) else {
        panic!("expected expression statement cond");
    };
    let ExprKind::Binary { op, .. } = ast.expr(cond.expr.unwrap()).kind else {
        panic!("expected comparison cond");
    };
    assert_eq!(op, BinaryOp::Lt);

    // step: `i = i + 1`
    let ExprKind::Binary { op, .. } = ast.expr(for_stmt.step.unwrap()).kind else {
        panic!("expected assignment step");
    };
    assert_eq!(op, BinaryOp::Assign);

    // body: `{ }`
    let Stmt::Compound(loop_body) = ast.stmt(for_stmt.body) else {
        panic!("expected compound loop body");
    };
    assert!(loop_body.stmts.is_empty());
}

// =============================================================================
// PRECEDENCE AND ASSOCIATIVITY
// =============================================================================

#[test]
fn test_assignment_is_right_associative() {
    let (ast, _, expr) = parse_return_of("a = b = c");
    let ExprKind::Binary { op, lhs, rhs } = ast.expr(expr).kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Assign);
    assert!(matches!(ast.expr(lhs).kind, ExprKind::DeclRef(_)));
    let ExprKind::Binary { op: inner, .. } = ast.expr(rhs).kind else {
        panic!("expected nested assignment");
    };
    assert_eq!(inner, BinaryOp::Assign);
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let (ast, _, expr) = parse_return_of("a + b * c");
    let ExprKind::Binary { op, lhs, rhs } = ast.expr(expr).kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(ast.expr(lhs).kind, ExprKind::DeclRef(_)));
    let ExprKind::Binary { op: inner, .. } = ast.expr(rhs).kind else {
        panic!("expected nested multiplication");
    };
    assert_eq!(inner, BinaryOp::Mul);
}

#[test]
fn test_relational_binds_tighter_than_equality() {
    let (ast, _, expr) = parse_return_of("a < b == c");
    let ExprKind::Binary { op, lhs, .. } = ast.expr(expr).kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Eq);
    let ExprKind::Binary { op: inner, .. } = ast.expr(lhs).kind else {
        panic!("expected nested relational");
    };
    assert_eq!(inner, BinaryOp::Lt);
}

#[test]
fn test_subtraction_is_left_associative() {
    let (ast, _, expr) = parse_return_of("a - b - c");
    let ExprKind::Binary { op, lhs, rhs } = ast.expr(expr).kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Sub);
    assert!(matches!(ast.expr(rhs).kind, ExprKind::DeclRef(_)));
    let ExprKind::Binary { op: inner, .. } = ast.expr(lhs).kind else {
        panic!("expected nested subtraction");
    };
    assert_eq!(inner, BinaryOp::Sub);
}

#[test]
fn test_conditional_expression() {
    let (ast, types, expr) = parse_return_of("a ? b : c");
    let node = ast.expr(expr);
    assert!(matches!(node.kind, ExprKind::Conditional { .. }));
    assert_eq!(node.ty, TypeStore::INT);
    drop(types);
}

#[test]
fn test_comparison_yields_int() {
    let (ast, _, expr) = parse_return_of("a <= b");
    assert_eq!(ast.expr(expr).ty, TypeStore::INT);
}

#[test]
fn test_comma_operator_takes_right_type() {
    let (ast, _, expr) = parse_return_of("a, b");
    let node = ast.expr(expr);
    let ExprKind::Binary { op, .. } = node.kind else {
        panic!("expected comma");
    };
    assert_eq!(op, BinaryOp::Comma);
    assert_eq!(node.ty, TypeStore::INT);
}

#[test]
fn test_compound_assignment_operators() {
    for (source, op) in [
        ("a += b", BinaryOp::AddAssign),
        ("a <<= b", BinaryOp::ShlAssign),
        ("a %= b", BinaryOp::ModAssign),
        ("a |= b", BinaryOp::OrAssign),
    ] {
        let (ast, _, expr) = parse_return_of(source);
        let ExprKind::Binary { op: found, .. } = ast.expr(expr).kind else {
            panic!("expected binary");
        };
        assert_eq!(found, op, "for {:?}", source);
    }
}

#[test]
fn test_unary_operators() {
    let (ast, types, expr) = parse_return_of("*&a");
    let node = ast.expr(expr);
    let ExprKind::Unary { op, operand } = node.kind else {
        panic!("expected unary");
    };
    assert_eq!(op, UnaryOp::Deref);
    assert_eq!(node.ty, TypeStore::INT);
    let inner = ast.expr(operand);
    assert!(matches!(
        inner.kind,
        ExprKind::Unary {
            op: UnaryOp::AddressOf,
            ..
        }
    ));
    assert!(types.is_pointer(inner.ty));
}

#[test]
fn test_postfix_and_prefix_increment() {
    let (ast, _, expr) = parse_return_of("a++");
    assert!(matches!(
        ast.expr(expr).kind,
        ExprKind::Unary {
            op: UnaryOp::PostIncrement,
            ..
        }
    ));

    let (ast, _, expr) = parse_return_of("--a");
    assert!(matches!(
        ast.expr(expr).kind,
        ExprKind::Unary {
            op: UnaryOp::PreDecrement,
            ..
        }
    ));
}

// =============================================================================
// DECLARATORS
// =============================================================================

#[test]
fn test_pointer_to_array_vs_array_of_pointers() {
    // `int (*p)[10]` is a pointer to an array of ten ints.
    let (ast, types) = parse_ok("int (*p)[10];");
    let Decl::Var(p) = ast.decl(ast.top_level[0]) else {
        panic!("expected variable");
    };
    let TypeKind::Pointer { base } = types.kind(p.ty) else {
        panic!("expected pointer, got {}", types.display(p.ty));
    };
    assert_eq!(
        types.kind(*base),
        &TypeKind::Array {
            elem: TypeStore::INT,
            len: Some(10)
        }
    );

    // `int *p[10]` is an array of ten pointers to int.
    let (ast, types) = parse_ok("int *p[10];");
    let Decl::Var(p) = ast.decl(ast.top_level[0]) else {
        panic!("expected variable");
    };
    let TypeKind::Array { elem, len } = types.kind(p.ty) else {
        panic!("expected array, got {}", types.display(p.ty));
    };
    assert_eq!(*len, Some(10));
    assert!(types.is_pointer(*elem));
}

#[test]
fn test_function_pointer_declarator() {
    let (ast, types) = parse_ok("int (*handler)(int);");
    let Decl::Var(v) = ast.decl(ast.top_level[0]) else {
        panic!("expected variable");
    };
    let TypeKind::Pointer { base } = types.kind(v.ty) else {
        panic!("expected pointer");
    };
    assert!(types.is_function(*base));
}

#[test]
fn test_unknown_array_length() {
    let (ast, types) = parse_ok("int buf[];");
    let Decl::Var(v) = ast.decl(ast.top_level[0]) else {
        panic!("expected variable");
    };
    assert_eq!(
        types.kind(v.ty),
        &TypeKind::Array {
            elem: TypeStore::INT,
            len: None
        }
    );
}

#[test]
fn test_parameter_decay() {
    let (ast, types) = parse_ok("int f(int a[10], int g(int));");
    let Decl::Function(f) = ast.decl(ast.top_level[0]) else {
        panic!("expected function");
    };
    let TypeKind::Function { params, .. } = types.kind(f.ty) else {
        panic!("expected function type");
    };
    // Array parameter decays to pointer.
    assert!(types.is_pointer(params[0]));
    assert_eq!(types.pointee(params[0]), Some(TypeStore::INT));
    // Function parameter decays to function pointer.
    let TypeKind::Pointer { base } = types.kind(params[1]) else {
        panic!("expected pointer");
    };
    assert!(types.is_function(*base));
}

#[test]
fn test_forward_declaration_then_call() {
    let (ast, _) = parse_ok("int g(int x); int f() { return g(1); }");
    let expr = return_expr(&ast, "f");
    let ExprKind::Call { ref args, .. } = ast.expr(expr).kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 1);
    assert_eq!(ast.expr(expr).ty, TypeStore::INT);
}

// =============================================================================
// TYPEDEFS AND SCOPES
// =============================================================================

#[test]
fn test_typedef_recognised_in_same_and_deeper_scope() {
    let (ast, _) = parse_ok("typedef int T; T x; int f(void) { T y; y = 1; return y; }");
    assert!(ast.top_level.len() >= 3);
}

#[test]
fn test_block_scoped_typedef_dies_with_its_scope() {
    // `L` is a typedef only inside f's body; after it, `L z;` cannot
    // start a declaration.
    let err = parse_err("int f(void) { typedef int L; L x; x = 0; return x; } L z;");
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
}

#[test]
fn test_shadowing_in_nested_scope() {
    let (ast, _) = parse_ok("int x; int f(void) { int x; x = 2; return x; }");
    let f = function(&ast, "f");
    assert_eq!(f.locals.len(), 1);
}

#[test]
fn test_cast_expression() {
    let (ast, types) = parse_ok("int f(void) { return (long)1; }");
    let expr = ast.expr(return_expr(&ast, "f"));
    assert!(matches!(expr.kind, ExprKind::Cast { .. }));
    assert_eq!(expr.ty, TypeStore::LONG);
    drop(types);
}

#[test]
fn test_cast_of_typedef_name() {
    let (ast, types) = parse_ok("typedef unsigned long size; int f(void) { return (size)1; }");
    let expr = ast.expr(return_expr(&ast, "f"));
    assert!(matches!(expr.kind, ExprKind::Cast { .. }));
    assert_eq!(types.kind(expr.ty), &TypeKind::Long { signed: false });
}

#[test]
fn test_parenthesised_expression_is_not_a_cast() {
    let (ast, _, expr) = parse_return_of("(a)");
    assert!(matches!(ast.expr(expr).kind, ExprKind::DeclRef(_)));
}

#[test]
fn test_sizeof_type_and_expression() {
    let (ast, _) = parse_ok("int f(void) { return sizeof(int); }");
    let expr = ast.expr(return_expr(&ast, "f"));
    assert!(matches!(expr.kind, ExprKind::IntLit(4)));
    assert_eq!(expr.ty, TypeStore::ULONG);

    let (ast, _) = parse_ok("int a[3]; int f() { return sizeof a; }");
    let expr = ast.expr(return_expr(&ast, "f"));
    assert!(matches!(expr.kind, ExprKind::IntLit(12)));
}

#[test]
fn test_arrow_member_access() {
    let (ast, _) =
        parse_ok("struct P { int x; int y; }; int f(struct P *p) { return p->y; }");
    let expr = ast.expr(return_expr(&ast, "f"));
    let ExprKind::Member { index, arrow, .. } = expr.kind else {
        panic!("expected member access");
    };
    assert!(arrow);
    assert_eq!(index, 1);
}

#[test]
fn test_string_and_char_literals() {
    let (ast, types) = parse_ok("int f(void) { return \"hi\"[0] + 'a'; }");
    let expr = ast.expr(return_expr(&ast, "f"));
    let ExprKind::Binary { lhs, rhs, .. } = expr.kind else {
        panic!("expected binary");
    };
    let lhs = ast.expr(lhs);
    assert!(matches!(lhs.kind, ExprKind::ArraySubscript { .. }));
    assert_eq!(lhs.ty, TypeStore::CHAR);
    let rhs = ast.expr(rhs);
    assert!(matches!(rhs.kind, ExprKind::CharLit('a')));
    assert_eq!(rhs.ty, TypeStore::INT);
    drop(types);
}

#[test]
fn test_labeled_statement_preserved() {
    let (ast, _) = parse_ok("int f(void) { done: return 0; }");
    let f = function(&ast, "f");
    let Stmt::Compound(body) = ast.stmt(f.body.unwrap()) else {
        panic!("expected compound");
    };
    let Stmt::Labeled(labeled) = ast.stmt(body.stmts[0]) else {
        panic!("expected labeled statement");
    };
    let Decl::Label(label) = ast.decl(labeled.decl) else {
        panic!("expected label declaration");
    };
    assert_eq!(label.name, Symbol::intern("done"));
}

#[test]
fn test_switch_with_cases() {
    let (ast, _) = parse_ok(
        "int f(int x) { switch (x) { case 1: return 1; default: return 0; } return 2; }",
    );
    let f = function(&ast, "f");
    let Stmt::Compound(body) = ast.stmt(f.body.unwrap()) else {
        panic!("expected compound");
    };
    let Stmt::Switch(switch) = ast.stmt(body.stmts[0]) else {
        panic!("expected switch");
    };
    let Stmt::Compound(switch_body) = ast.stmt(switch.body) else {
        panic!("switch body must be compound");
    };
    let mut labels = Vec::new();
    for &id in &switch_body.stmts {
        if let Stmt::Case(case) = ast.stmt(id) {
            labels.push((case.label, case.is_default));
        }
    }
    assert_eq!(labels.len(), 2);
    assert_ne!(labels[0].0, labels[1].0, "case labels must be unique");
    assert!(!labels[0].1);
    assert!(labels[1].1);
}

#[test]
fn test_while_do_while_break_continue() {
    let (ast, _) = parse_ok(
        "int f(int n) { while (n) { n = n - 1; if (n == 5) break; else continue; } \
         do { n = n + 1; } while (n < 3); return n; }",
    );
    assert!(ast
        .stmts
        .iter()
        .any(|s| matches!(s, Stmt::DoWhile(_))));
    assert!(ast.stmts.iter().any(|s| matches!(s, Stmt::Break(_))));
    assert!(ast.stmts.iter().any(|s| matches!(s, Stmt::Continue(_))));
}

// =============================================================================
// ERROR TAXONOMY
// =============================================================================

#[test]
fn test_missing_semicolon_is_unexpected_token() {
    let err = parse_err("int x");
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
}

#[test]
fn test_global_redefinition() {
    let err = parse_err("int x; int x;");
    assert_eq!(err.kind, ErrorKind::Redefinition);
}

#[test]
fn test_function_redefinition() {
    let err = parse_err("int f() { return 0; } int f() { return 1; }");
    assert_eq!(err.kind, ErrorKind::Redefinition);
}

#[test]
fn test_duplicate_member() {
    let err = parse_err("struct P { int x; int x; };");
    assert_eq!(err.kind, ErrorKind::Redefinition);
}

#[test]
fn test_undeclared_identifier() {
    let err = parse_err("int f() { return nope; }");
    assert_eq!(err.kind, ErrorKind::Undeclared);
    assert!(err.message.contains("nope"));
}

#[test]
fn test_unknown_member() {
    let err = parse_err("struct P { int x; }; int f(struct P p) { return p.z; }");
    assert_eq!(err.kind, ErrorKind::Undeclared);
    assert!(err.message.contains("'z'"));
}

#[test]
fn test_member_access_on_non_record() {
    let err = parse_err("int f(int x) { return x.y; }");
    assert_eq!(err.kind, ErrorKind::Undeclared);
}

#[test]
fn test_goto_is_unimplemented() {
    let err = parse_err("int f() { goto out; out: return 0; }");
    assert_eq!(err.kind, ErrorKind::Unimplemented);
}

#[test]
fn test_enum_is_unimplemented() {
    let err = parse_err("enum Color { Red };");
    assert_eq!(err.kind, ErrorKind::Unimplemented);
}

#[test]
fn test_initializer_list_is_unimplemented() {
    let err = parse_err("int x[3] = {1, 2, 3};");
    assert_eq!(err.kind, ErrorKind::Unimplemented);
}

#[test]
fn test_vla_is_unimplemented() {
    let err = parse_err("int f(int n) { int a[n]; return 0; }");
    assert_eq!(err.kind, ErrorKind::Unimplemented);
}

#[test]
fn test_alignas_is_unimplemented() {
    let err = parse_err("_Alignas(8) int x;");
    assert_eq!(err.kind, ErrorKind::Unimplemented);
}

#[test]
fn test_variadic_is_unimplemented() {
    let err = parse_err("int printf(char *fmt, ...);");
    assert_eq!(err.kind, ErrorKind::Unimplemented);
}

#[test]
fn test_invalid_specifier_combination() {
    let err = parse_err("unsigned void x;");
    assert_eq!(err.kind, ErrorKind::TypeSynthesis);
}

#[test]
fn test_typedef_static_conflict() {
    let err = parse_err("typedef static int T;");
    assert_eq!(err.kind, ErrorKind::TypeSynthesis);
}

#[test]
fn test_typedef_without_name() {
    let err = parse_err("typedef int;");
    assert_eq!(err.kind, ErrorKind::BadDeclarator);
}

#[test]
fn test_lex_error_surfaces() {
    let err = parse_err("int x = @;");
    assert_eq!(err.kind, ErrorKind::Lex);
}

// =============================================================================
// INVARIANTS
// =============================================================================

#[test]
fn test_scope_depth_restored_after_translation_unit() {
    let mut parser = Parser::new(
        "int g; struct P { int x; }; int f(int a) { int b; { int c; c = 1; b = c; } \
         for (int i = 0; i < a; i = i + 1) { b = b + i; } return b; }",
    )
    .unwrap();
    let depth_before = parser.scopes.depth();
    parser.parse_translation_unit().unwrap();
    assert_eq!(parser.scopes.depth(), depth_before);
    assert_eq!(parser.scopes.depth(), 1);
}

#[test]
fn test_scope_depth_restored_even_on_error() {
    let mut parser = Parser::new("int f(void) { { { return oops; } } }").unwrap();
    assert!(parser.parse_translation_unit().is_err());
    assert_eq!(parser.scopes.depth(), 1);
}

#[test]
fn test_every_expression_is_typed() {
    let (ast, _) = parse_ok(
        "struct P { int x; }; int g; \
         int f(struct P *p, int n) { \
             int local; \
             local = (n + 1) * 2 - g; \
             p->x = local > 0 ? local : -local; \
             return f(p, local) + sizeof(struct P); \
         }",
    );
    assert!(!ast.exprs.is_empty());
    for expr in ast.exprs.iter() {
        assert_ne!(expr.ty, zinc_util::TypeId::DUMMY);
    }
}

#[test]
fn test_typedef_lookup_identity() {
    // Two uses of the same typedef name resolve to the identical handle.
    let (ast, _) = parse_ok("typedef int T; T a; T b;");
    let (Decl::Var(a), Decl::Var(b)) = (ast.decl(ast.top_level[1]), ast.decl(ast.top_level[2]))
    else {
        panic!("expected variables");
    };
    assert_eq!(a.ty, b.ty);
}

#[test]
fn test_empty_translation_unit() {
    let (ast, _) = parse_ok("");
    assert!(ast.top_level.is_empty());
}

#[test]
fn test_locals_attach_to_enclosing_function() {
    let (ast, _) = parse_ok("int f(void) { int a; int b; { int c; c = 0; } a = b = 0; return a; }");
    let f = function(&ast, "f");
    assert_eq!(f.locals.len(), 3);
}

// =============================================================================
// DUMPER
// =============================================================================

#[test]
fn test_dump_is_deterministic() {
    let source = "struct P { int x; }; int g; int f(struct P p) { return p.x + g; }";
    let (ast, types) = parse_ok(source);
    let first = dump(&ast, &types);
    let second = dump(&ast, &types);
    assert_eq!(first, second);
}

#[test]
fn test_dump_shape_for_minimal_main() {
    let (ast, types) = parse_ok("int main(void) { return 0; }");
    let text = dump(&ast, &types);
    let expected = "TranslationUnit\n  Function main 'int(void)'\n    Compound\n      Return\n        IntLit 0 'int'\n";
    assert_eq!(text, expected);
}
