use pytran_diagnostics::span::Spanned;

use crate::ast::*;

pub trait Visitor {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program)
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        walk_stmt(self, stmt)
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr)
    }
}

pub fn walk_program<T: Visitor + ?Sized>(visitor: &mut T, program: &Program) {
    for stmt in &program.body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<T: Visitor + ?Sized>(visitor: &mut T, stmt: &Stmt) {
    match stmt {
        Stmt::FunctionDef(Spanned(FunctionDefStmt { body, .. }, _)) => {
            for stmt in body {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::ClassDef(Spanned(ClassDefStmt { body, .. }, _)) => {
            for stmt in body {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::If(Spanned(
            IfStmt {
                cond,
                then_body,
                elif_blocks,
                else_body,
            },
            _,
        )) => {
            visitor.visit_expr(cond);
            for stmt in then_body {
                visitor.visit_stmt(stmt);
            }
            for (cond, body) in elif_blocks {
                visitor.visit_expr(cond);
                for stmt in body {
                    visitor.visit_stmt(stmt);
                }
            }
            for stmt in else_body {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::While(Spanned(WhileStmt { cond, body }, _)) => {
            visitor.visit_expr(cond);
            for stmt in body {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::For(Spanned(ForStmt { target, iter, body }, _)) => {
            visitor.visit_expr(target);
            visitor.visit_expr(iter);
            for stmt in body {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::Return(Spanned(ReturnStmt { value }, _)) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Yield(Spanned(YieldStmt { value }, _)) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Raise(Spanned(RaiseStmt { exc }, _)) => {
            if let Some(exc) = exc {
                visitor.visit_expr(exc);
            }
        }
        Stmt::Break | Stmt::Continue | Stmt::Pass => {}
        Stmt::Assign(Spanned(AssignStmt { target, value }, _)) => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        Stmt::Print(Spanned(PrintStmt { args }, _)) => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Stmt::Import(_) => {}
        Stmt::Expr(expr) => visitor.visit_expr(expr),
    }
}

pub fn walk_expr<T: Visitor + ?Sized>(visitor: &mut T, expr: &Expr) {
    match expr {
        Expr::Name(_) => {}
        Expr::Lit(_) => {}
        Expr::Binary(Spanned(BinaryExpr { lhs, op: _, rhs }, _)) => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Unary(Spanned(UnaryExpr { op: _, expr }, _)) => visitor.visit_expr(expr),
        Expr::Call(Spanned(CallExpr { callee, args }, _)) => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
    }
}
