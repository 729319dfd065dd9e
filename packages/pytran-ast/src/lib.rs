//! AST surface for the pytran front end.

pub mod ast;
pub mod visitor;
