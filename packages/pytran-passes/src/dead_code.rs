//! Unreachable-statement detection.
//!
//! Within any straight-line block, every statement after an unconditional
//! `return` or `raise` is unreachable. Flagging is per block: a `return`
//! inside an `if` body does not make the statements after the `if`
//! unreachable.

use pytran_ast::ast::*;
use pytran_ast::visitor::{walk_stmt, Visitor};
use pytran_diagnostics::span::Spanned;
use pytran_diagnostics::{Diagnostics, ErrorKind, SemanticError};

pub struct DeadCodeCheck {
    diagnostics: Diagnostics,
}

impl DeadCodeCheck {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    fn check_block(&mut self, body: &[Spanned<Stmt>]) {
        let mut terminator: Option<&str> = None;
        for stmt in body {
            if let Some(kw) = terminator {
                self.diagnostics.add(SemanticError::new(
                    ErrorKind::DeadCode,
                    format!("Unreachable code after '{kw}'"),
                    stmt.span(),
                ));
            } else {
                terminator = match &**stmt {
                    Stmt::Return(_) => Some("return"),
                    Stmt::Raise(_) => Some("raise"),
                    _ => None,
                };
            }
        }
    }
}

impl Visitor for DeadCodeCheck {
    fn visit_program(&mut self, program: &Program) {
        self.check_block(&program.body);
        for stmt in &program.body {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        match &**stmt {
            Stmt::FunctionDef(def) => self.check_block(&def.body),
            Stmt::ClassDef(def) => self.check_block(&def.body),
            Stmt::If(if_stmt) => {
                self.check_block(&if_stmt.then_body);
                for (_, body) in &if_stmt.elif_blocks {
                    self.check_block(body);
                }
                self.check_block(&if_stmt.else_body);
            }
            Stmt::While(while_stmt) => self.check_block(&while_stmt.body),
            Stmt::For(for_stmt) => self.check_block(&for_stmt.body),
            _ => {}
        }
        walk_stmt(self, stmt);
    }
}
