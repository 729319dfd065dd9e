use expect_test::{expect, Expect};

use pytran_ast::ast::*;
use pytran_diagnostics::span::{spanned, FileId, Span, Spanned};
use pytran_diagnostics::Diagnostics;

use crate::run_semantic_passes;

fn sp(line: u32, column: u32) -> Span {
    Span::new(FileId::default(), 0, 0, line, column)
}

fn name(line: u32, column: u32, ident: &str) -> Spanned<Expr> {
    let s = sp(line, column);
    spanned(
        s,
        Expr::Name(spanned(
            s,
            NameExpr {
                ident: spanned(s, ident.into()),
            },
        )),
    )
}

fn int(line: u32, column: u32, value: i64) -> Spanned<Expr> {
    let s = sp(line, column);
    spanned(s, Expr::Lit(spanned(s, LitExpr::Int(value))))
}

fn true_lit(line: u32, column: u32) -> Spanned<Expr> {
    let s = sp(line, column);
    spanned(s, Expr::Lit(spanned(s, LitExpr::Bool(true))))
}

fn binary(op: BinOp, lhs: Spanned<Expr>, rhs: Spanned<Expr>) -> Spanned<Expr> {
    let s = lhs.span();
    spanned(
        s,
        Expr::Binary(spanned(
            s,
            BinaryExpr {
                lhs: Box::new(lhs),
                op: spanned(s, op),
                rhs: Box::new(rhs),
            },
        )),
    )
}

fn call(line: u32, column: u32, func: &str, args: Vec<Spanned<Expr>>) -> Spanned<Expr> {
    let s = sp(line, column);
    spanned(
        s,
        Expr::Call(spanned(
            s,
            CallExpr {
                callee: Box::new(name(line, column, func)),
                args,
            },
        )),
    )
}

fn assign(line: u32, column: u32, target: &str, value: Spanned<Expr>) -> Spanned<Stmt> {
    let s = sp(line, column);
    spanned(
        s,
        Stmt::Assign(spanned(
            s,
            AssignStmt {
                target: name(line, column, target),
                value,
            },
        )),
    )
}

fn expr_stmt(expr: Spanned<Expr>) -> Spanned<Stmt> {
    let s = expr.span();
    spanned(s, Stmt::Expr(expr))
}

fn func_def(line: u32, ident: &str, params: &[&str], body: Vec<Spanned<Stmt>>) -> Spanned<Stmt> {
    let s = sp(line, 1);
    let params = params
        .iter()
        .enumerate()
        .map(|(i, p)| spanned(sp(line, 5 + i as u32), (*p).into()))
        .collect();
    spanned(
        s,
        Stmt::FunctionDef(spanned(
            s,
            FunctionDefStmt {
                ident: spanned(sp(line, 5), ident.into()),
                params,
                body,
            },
        )),
    )
}

fn class_def(line: u32, ident: &str, body: Vec<Spanned<Stmt>>) -> Spanned<Stmt> {
    let s = sp(line, 1);
    spanned(
        s,
        Stmt::ClassDef(spanned(
            s,
            ClassDefStmt {
                ident: spanned(sp(line, 7), ident.into()),
                bases: vec![],
                body,
            },
        )),
    )
}

fn if_stmt(line: u32, column: u32, cond: Spanned<Expr>, then_body: Vec<Spanned<Stmt>>) -> Spanned<Stmt> {
    let s = sp(line, column);
    spanned(
        s,
        Stmt::If(spanned(
            s,
            IfStmt {
                cond,
                then_body,
                elif_blocks: vec![],
                else_body: vec![],
            },
        )),
    )
}

fn while_loop(line: u32, body: Vec<Spanned<Stmt>>) -> Spanned<Stmt> {
    let s = sp(line, 1);
    spanned(
        s,
        Stmt::While(spanned(
            s,
            WhileStmt {
                cond: true_lit(line, 7),
                body,
            },
        )),
    )
}

fn ret(line: u32, column: u32, value: Option<Spanned<Expr>>) -> Spanned<Stmt> {
    let s = sp(line, column);
    spanned(s, Stmt::Return(spanned(s, ReturnStmt { value })))
}

fn pass(line: u32) -> Spanned<Stmt> {
    spanned(sp(line, 5), Stmt::Pass)
}

fn brk(line: u32, column: u32) -> Spanned<Stmt> {
    spanned(sp(line, column), Stmt::Break)
}

fn check(body: Vec<Spanned<Stmt>>, expect: Expect) {
    let program = Program { body };
    let diagnostics = Diagnostics::default();
    run_semantic_passes(&program, diagnostics.clone());
    expect.assert_eq(&diagnostics.render());
}

#[test]
fn undeclared_name_is_reported() {
    check(
        vec![expr_stmt(call(
            1,
            1,
            "print",
            vec![name(1, 7, "undefined_var")],
        ))],
        expect![[r#"
            1:7: [UNDECLARED_IDENTIFIER] Name 'undefined_var' is not defined
        "#]],
    );
}

#[test]
fn assigned_names_resolve() {
    check(
        vec![
            assign(1, 1, "x", int(1, 5, 42)),
            expr_stmt(call(2, 1, "print", vec![name(2, 7, "x")])),
        ],
        expect![[""]],
    );
}

#[test]
fn undeclared_function_call() {
    check(
        vec![expr_stmt(call(1, 1, "nope", vec![]))],
        expect![[r#"
            1:1: [UNDECLARED_IDENTIFIER] Function 'nope' is not defined
        "#]],
    );
}

#[test]
fn argument_count_mismatch() {
    check(
        vec![
            func_def(1, "foo", &["a", "b"], vec![pass(2)]),
            expr_stmt(call(3, 1, "foo", vec![int(3, 5, 1)])),
            // The right count is fine.
            expr_stmt(call(4, 1, "foo", vec![int(4, 5, 1), int(4, 8, 2)])),
        ],
        expect![[r#"
            3:1: [ARGUMENT_COUNT_MISMATCH] Function 'foo' expects 2 argument(s), got 1
        "#]],
    );
}

#[test]
fn duplicate_parameter() {
    check(
        vec![func_def(1, "foo", &["a", "a"], vec![pass(2)])],
        expect![[r#"
            1:6: [DUPLICATE_ARGUMENT] Parameter 'a' is duplicated in function definition
        "#]],
    );
}

#[test]
fn return_outside_function() {
    check(
        vec![ret(1, 1, None)],
        expect![[r#"
            1:1: [RETURN_OUTSIDE_FUNCTION] 'return' outside function
        "#]],
    );
    check(
        vec![func_def(1, "f", &[], vec![ret(2, 5, Some(int(2, 12, 1)))])],
        expect![[""]],
    );
}

#[test]
fn yield_outside_function() {
    check(
        vec![spanned(
            sp(1, 1),
            Stmt::Yield(spanned(sp(1, 1), YieldStmt { value: None })),
        )],
        expect![[r#"
            1:1: [YIELD_OUTSIDE_FUNCTION] 'yield' outside function
        "#]],
    );
}

#[test]
fn break_and_continue_outside_loop() {
    check(
        vec![
            brk(1, 1),
            spanned(sp(2, 1), Stmt::Continue),
        ],
        expect![[r#"
            1:1: [BREAK_OUTSIDE_LOOP] 'break' outside loop
            2:1: [CONTINUE_OUTSIDE_LOOP] 'continue' outside loop
        "#]],
    );
    check(vec![while_loop(1, vec![brk(2, 5)])], expect![[""]]);
}

#[test]
fn loop_context_resets_at_function_boundary() {
    // while True:
    //     def f():
    //         break
    check(
        vec![while_loop(1, vec![func_def(2, "f", &[], vec![brk(3, 9)])])],
        expect![[r#"
            3:9: [BREAK_OUTSIDE_LOOP] 'break' outside loop
        "#]],
    );
}

#[test]
fn break_in_loop_inside_function_is_legal() {
    // while True:
    //     def f():
    //         while True:
    //             if True:
    //                 break
    let inner_if = if_stmt(4, 13, true_lit(4, 16), vec![brk(5, 17)]);
    check(
        vec![while_loop(
            1,
            vec![func_def(
                2,
                "f",
                &[],
                vec![while_loop(3, vec![inner_if])],
            )],
        )],
        expect![[""]],
    );
}

#[test]
fn constant_division_by_zero() {
    check(
        vec![
            assign(1, 1, "x", binary(BinOp::Div, int(1, 5, 42), int(1, 10, 0))),
            assign(2, 1, "y", binary(BinOp::FloorDiv, int(2, 5, 7), int(2, 10, 0))),
        ],
        expect![[r#"
            1:5: [CONST_DIVISION_BY_ZERO] Division by zero (constant)
            2:5: [CONST_DIVISION_BY_ZERO] Division by zero (constant)
        "#]],
    );
}

#[test]
fn runtime_zero_is_not_flagged() {
    check(
        vec![
            assign(1, 1, "a", int(1, 5, 0)),
            assign(2, 1, "b", binary(BinOp::Div, int(2, 5, 1), name(2, 9, "a"))),
        ],
        expect![[""]],
    );
}

#[test]
fn redefining_a_builtin_warns() {
    check(
        vec![assign(1, 1, "list", int(1, 8, 5))],
        expect![[r#"
            1:1: [WARNING: REDEFINITION_BUILTIN] Redefining built-in 'list'
        "#]],
    );
}

#[test]
fn redeclaring_a_function_warns() {
    check(
        vec![
            func_def(1, "f", &[], vec![pass(2)]),
            func_def(3, "f", &[], vec![pass(4)]),
        ],
        expect![[r#"
            3:5: [WARNING: DUPLICATE_DECLARATION] 'f' is already declared in this scope (previous declaration at 1:5)
        "#]],
    );
}

#[test]
fn unreachable_code_after_return() {
    check(
        vec![func_def(
            1,
            "f",
            &[],
            vec![
                ret(2, 5, Some(int(2, 12, 1))),
                assign(3, 5, "x", int(3, 9, 2)),
            ],
        )],
        expect![[r#"
            3:5: [WARNING: DEAD_CODE] Unreachable code after 'return'
        "#]],
    );
}

#[test]
fn return_in_branch_does_not_kill_following_statements() {
    check(
        vec![func_def(
            1,
            "f",
            &[],
            vec![
                if_stmt(2, 5, true_lit(2, 8), vec![ret(3, 9, None)]),
                assign(4, 5, "x", int(4, 9, 1)),
            ],
        )],
        expect![[""]],
    );
}

#[test]
fn import_declares_the_module_name() {
    check(
        vec![
            spanned(
                sp(1, 1),
                Stmt::Import(spanned(
                    sp(1, 1),
                    ImportStmt {
                        module: spanned(sp(1, 8), "os".into()),
                    },
                )),
            ),
            assign(2, 1, "x", name(2, 5, "os")),
        ],
        expect![[""]],
    );
}

#[test]
fn class_name_resolves_as_callee() {
    check(
        vec![
            class_def(1, "Point", vec![pass(2)]),
            assign(3, 1, "p", call(3, 5, "Point", vec![])),
        ],
        expect![[""]],
    );
}

#[test]
fn block_declarations_do_not_escape() {
    // if True:
    //     x = 1
    // print(x)
    check(
        vec![
            if_stmt(1, 1, true_lit(1, 4), vec![assign(2, 5, "x", int(2, 9, 1))]),
            expr_stmt(call(3, 1, "print", vec![name(3, 7, "x")])),
        ],
        expect![[r#"
            3:7: [UNDECLARED_IDENTIFIER] Name 'x' is not defined
        "#]],
    );
}

#[test]
fn populated_table_mirrors_block_nesting() {
    let program = Program {
        body: vec![
            assign(1, 1, "x", int(1, 5, 1)),
            func_def(2, "f", &["a"], vec![assign(3, 5, "y", int(3, 9, 2))]),
        ],
    };
    let diagnostics = Diagnostics::default();
    let table = run_semantic_passes(&program, diagnostics.clone());

    assert!(diagnostics.is_empty());
    assert!(table.search("x").is_some());
    assert!(table.search("f").is_some());
    // The function body became a depth-1 scope holding the parameter and
    // the local.
    assert!(table.get_scope_tree().ends_with("  1: a(param), y(var)\n"));
    assert_eq!(table.get_statistics().max_depth, 1);
}
