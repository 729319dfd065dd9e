//! Semantic analysis passes for the pytran front end.
//!
//! [`run_semantic_passes`] is the entry point: it populates a scope-nested
//! symbol table from the syntax tree, runs the semantic checks, then the
//! unreachable-code check. All passes run to completion regardless of what
//! the earlier ones found.

pub mod analyze;
pub mod builtins;
pub mod dead_code;

#[cfg(test)]
mod tests;

use pytran_ast::ast::Program;
use pytran_ast::visitor::Visitor;
use pytran_diagnostics::Diagnostics;
use pytran_symbols::SymbolTable;

use analyze::SemanticAnalyzer;
use dead_code::DeadCodeCheck;

/// Run all semantic passes over one translation unit.
///
/// Returns the populated symbol table so the caller can dump the scope tree
/// or its statistics. Check `diagnostics.has_errors()` before feeding the
/// table to downstream stages.
pub fn run_semantic_passes(program: &Program, diagnostics: Diagnostics) -> SymbolTable {
    let table = SemanticAnalyzer::new(diagnostics.clone()).analyze(program);
    DeadCodeCheck::new(diagnostics).visit_program(program);
    table
}
