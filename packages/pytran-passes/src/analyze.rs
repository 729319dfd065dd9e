//! The semantic analysis pass.
//!
//! Walks the syntax tree once, re-creating the lexical scope topology in the
//! symbol table as it descends into block bodies, and runs the semantic
//! checks along the way. Diagnostics accumulate in the shared [`Diagnostics`]
//! sink; the pass never stops early, so one bad statement does not hide
//! problems elsewhere in the file.

use std::collections::{HashMap, HashSet};

use smol_str::SmolStr;

use pytran_ast::ast::*;
use pytran_ast::visitor::Visitor;
use pytran_diagnostics::span::{Span, Spanned};
use pytran_diagnostics::{Diagnostics, ErrorKind, SemanticError};
use pytran_symbols::{IdentKind, InsertError, InsertOutcome, ScopeId, SymbolTable};

use crate::builtins::{self, register_builtins};

pub struct SemanticAnalyzer {
    table: SymbolTable,
    diagnostics: Diagnostics,
    /// Declared arity of each function, keyed by the scope the `def` appears
    /// in. Resolved by ascending the scope chain like any other name.
    functions: HashMap<(ScopeId, SmolStr), usize>,
}

impl SemanticAnalyzer {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self::with_table(SymbolTable::new(), diagnostics)
    }

    /// Analyze against a caller-provided table, e.g. one with a non-default
    /// duplicate policy. The table must be fresh (global scope current).
    pub fn with_table(mut table: SymbolTable, diagnostics: Diagnostics) -> Self {
        register_builtins(&mut table);
        Self {
            table,
            diagnostics,
            functions: HashMap::new(),
        }
    }

    /// Analyze a whole translation unit and hand back the populated table.
    pub fn analyze(mut self, program: &Program) -> SymbolTable {
        self.visit_program(program);
        self.table
    }

    fn error(&self, kind: ErrorKind, message: String, span: Span) {
        self.diagnostics.add(SemanticError::new(kind, message, span));
    }

    /// Record a declaration, warning when it overwrites an existing local one.
    fn declare(&mut self, name: &str, kind: IdentKind, span: Span) {
        match self.table.insert(name, kind, None, span.line, span.column) {
            Ok(InsertOutcome::New) => {}
            Ok(InsertOutcome::Replaced { previous }) => self.error(
                ErrorKind::DuplicateDeclaration,
                format!(
                    "'{name}' is already declared in this scope (previous declaration at {}:{})",
                    previous.0, previous.1
                ),
                span,
            ),
            Err(InsertError::Duplicate(dup)) => {
                self.error(ErrorKind::DuplicateDeclaration, dup.to_string(), span)
            }
            Err(err) => self.error(ErrorKind::InvalidIdentifier, err.to_string(), span),
        }
    }

    /// Declare a name only if the current scope does not already hold it.
    /// Plain reassignment of an existing local is not a re-declaration.
    fn declare_if_new(&mut self, name: &str, kind: IdentKind, span: Span) {
        if self.table.search_local(name).is_none() {
            self.declare(name, kind, span);
        }
    }

    fn function_arity(&self, name: &str) -> Option<usize> {
        let mut scope = Some(self.table.current_scope());
        while let Some(id) = scope {
            if let Some(&arity) = self.functions.get(&(id, SmolStr::new(name))) {
                return Some(arity);
            }
            scope = self.table.parent_of(id);
        }
        None
    }

    fn visit_all(&mut self, body: &[Spanned<Stmt>]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    /// An indented block opens a scope; an empty body opens nothing.
    fn check_block(&mut self, body: &[Spanned<Stmt>]) {
        if body.is_empty() {
            return;
        }
        self.table.enter_scope();
        self.visit_all(body);
        self.table.exit_scope();
    }

    fn check_loop_block(&mut self, body: &[Spanned<Stmt>]) {
        if body.is_empty() {
            return;
        }
        self.table.enter_loop_scope();
        self.visit_all(body);
        self.table.exit_scope();
    }

    fn check_function_def(&mut self, def: &Spanned<FunctionDefStmt>) {
        let FunctionDefStmt {
            ident,
            params,
            body,
        } = &**def;

        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for param in params {
            if seen.insert(param.as_str()) {
                unique.push(param);
            } else {
                self.error(
                    ErrorKind::DuplicateArgument,
                    format!(
                        "Parameter '{}' is duplicated in function definition",
                        param.as_str()
                    ),
                    param.span(),
                );
            }
        }

        // The function's own name lives in the enclosing scope.
        self.declare(ident.as_str(), IdentKind::Function, ident.span());
        self.functions.insert(
            (self.table.current_scope(), SmolStr::new(ident.as_str())),
            params.len(),
        );

        self.table.enter_function_scope();
        for param in unique {
            self.declare(param.as_str(), IdentKind::Parameter, param.span());
        }
        self.visit_all(body);
        self.table.exit_scope();
    }

    fn check_class_def(&mut self, def: &Spanned<ClassDefStmt>) {
        let ClassDefStmt { ident, body, .. } = &**def;
        self.declare(ident.as_str(), IdentKind::Class, ident.span());
        self.table.enter_class_scope();
        self.visit_all(body);
        self.table.exit_scope();
    }

    fn check_call(&mut self, span: Span, call: &CallExpr) {
        // A simple-name callee is resolved as a function, not visited as a
        // plain name, so an unknown callee reports once.
        if let Expr::Name(name) = &**call.callee {
            let func = name.ident.as_str();
            match self.function_arity(func) {
                Some(arity) if call.args.len() != arity => self.error(
                    ErrorKind::ArgumentCountMismatch,
                    format!(
                        "Function '{func}' expects {arity} argument(s), got {}",
                        call.args.len()
                    ),
                    span,
                ),
                Some(_) => {}
                None => {
                    if self.table.search(func).is_none() {
                        self.error(
                            ErrorKind::UndeclaredIdentifier,
                            format!("Function '{func}' is not defined"),
                            span,
                        );
                    }
                }
            }
        } else {
            self.visit_expr(&call.callee);
        }
        for arg in &call.args {
            self.visit_expr(arg);
        }
    }
}

impl Visitor for SemanticAnalyzer {
    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        let span = stmt.span();
        match &**stmt {
            Stmt::FunctionDef(def) => self.check_function_def(def),
            Stmt::ClassDef(def) => self.check_class_def(def),
            Stmt::If(if_stmt) => {
                self.visit_expr(&if_stmt.cond);
                self.check_block(&if_stmt.then_body);
                for (cond, body) in &if_stmt.elif_blocks {
                    self.visit_expr(cond);
                    self.check_block(body);
                }
                self.check_block(&if_stmt.else_body);
            }
            Stmt::While(while_stmt) => {
                self.visit_expr(&while_stmt.cond);
                self.check_loop_block(&while_stmt.body);
            }
            Stmt::For(for_stmt) => {
                self.visit_expr(&for_stmt.iter);
                if let Expr::Name(name) = &*for_stmt.target {
                    self.declare_if_new(
                        name.ident.as_str(),
                        IdentKind::Variable,
                        for_stmt.target.span(),
                    );
                } else {
                    self.visit_expr(&for_stmt.target);
                }
                self.check_loop_block(&for_stmt.body);
            }
            Stmt::Return(ret) => {
                if !self.table.scope_flags().in_function {
                    self.error(
                        ErrorKind::ReturnOutsideFunction,
                        "'return' outside function".to_string(),
                        span,
                    );
                }
                if let Some(value) = &ret.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Yield(yield_stmt) => {
                if !self.table.scope_flags().in_function {
                    self.error(
                        ErrorKind::YieldOutsideFunction,
                        "'yield' outside function".to_string(),
                        span,
                    );
                }
                if let Some(value) = &yield_stmt.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Raise(raise) => {
                if let Some(exc) = &raise.exc {
                    self.visit_expr(exc);
                }
            }
            Stmt::Break => {
                if !self.table.scope_flags().in_loop {
                    self.error(
                        ErrorKind::BreakOutsideLoop,
                        "'break' outside loop".to_string(),
                        span,
                    );
                }
            }
            Stmt::Continue => {
                if !self.table.scope_flags().in_loop {
                    self.error(
                        ErrorKind::ContinueOutsideLoop,
                        "'continue' outside loop".to_string(),
                        span,
                    );
                }
            }
            Stmt::Pass => {}
            Stmt::Assign(assign) => {
                self.visit_expr(&assign.value);
                if let Expr::Name(name) = &*assign.target {
                    let ident = name.ident.as_str();
                    if builtins::is_builtin(ident) {
                        self.error(
                            ErrorKind::RedefinitionBuiltin,
                            format!("Redefining built-in '{ident}'"),
                            assign.target.span(),
                        );
                    }
                    self.declare_if_new(ident, IdentKind::Variable, assign.target.span());
                } else {
                    self.visit_expr(&assign.target);
                }
            }
            Stmt::Print(print) => {
                for arg in &print.args {
                    self.visit_expr(arg);
                }
            }
            Stmt::Import(import) => {
                self.declare_if_new(
                    import.module.as_str(),
                    IdentKind::Variable,
                    import.module.span(),
                );
            }
            Stmt::Expr(expr) => self.visit_expr(expr),
        }
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        match &**expr {
            Expr::Name(name) => {
                if self.table.search(name.ident.as_str()).is_none() {
                    self.error(
                        ErrorKind::UndeclaredIdentifier,
                        format!("Name '{}' is not defined", name.ident.as_str()),
                        expr.span(),
                    );
                }
            }
            Expr::Lit(_) => {}
            Expr::Binary(bin) => {
                self.visit_expr(&bin.lhs);
                self.visit_expr(&bin.rhs);
                if bin.op.is_division() {
                    if let Expr::Lit(lit) = &**bin.rhs {
                        if lit.is_zero() {
                            self.error(
                                ErrorKind::ConstDivisionByZero,
                                "Division by zero (constant)".to_string(),
                                expr.span(),
                            );
                        }
                    }
                }
            }
            Expr::Unary(unary) => self.visit_expr(&unary.expr),
            Expr::Call(call) => self.check_call(expr.span(), call),
        }
    }
}
