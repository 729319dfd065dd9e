//! Scope-nested symbol table for the pytran front end.
//!
//! Identifiers are stored in bucket-chained hash stores, one per lexical
//! scope; scopes form a tree that mirrors the source's block nesting, with a
//! stack tracking the innermost active scope. Lookups ascend the parent
//! chain, so inner declarations shadow outer ones.

pub mod entry;
pub mod events;
pub mod scope;
pub mod store;
pub mod table;

pub use entry::{IdentKind, IdentifierEntry};
pub use events::TableEvent;
pub use scope::{ScopeFlags, ScopeId, ScopeTree};
pub use store::{DuplicateName, HashStore};
pub use table::{DuplicatePolicy, InsertError, InsertOutcome, SymbolTable, TableStatistics};
