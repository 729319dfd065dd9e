//! Public facade over the scope tree and its per-scope hash stores.

use std::fmt;

use thiserror::Error;

use crate::entry::{IdentKind, IdentifierEntry};
use crate::scope::{ScopeFlags, ScopeId, ScopeTree};
use crate::store::{DuplicateName, LOAD_FACTOR_THRESHOLD};

/// What to do when a name is re-declared in the scope that already holds it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Last declaration wins; the caller is told what was overwritten so it
    /// can warn.
    #[default]
    Overwrite,
    /// Re-declaration is an insert error.
    Reject,
}

/// Outcome of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    New,
    /// An existing local declaration was overwritten in place; (line, column)
    /// of the old one.
    Replaced { previous: (u32, u32) },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateName),
    #[error("empty identifier name")]
    EmptyName,
    #[error("identifier `{0}` cannot start with a digit")]
    LeadingDigit(String),
    #[error("identifier `{0}` contains invalid characters")]
    InvalidChars(String),
}

/// The symbol table: scope-aware identifier storage for one translation unit.
#[derive(Debug, Default)]
pub struct SymbolTable {
    tree: ScopeTree,
    policy: DuplicatePolicy,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            tree: ScopeTree::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Record a declaration in the current scope.
    pub fn insert(
        &mut self,
        name: &str,
        kind: IdentKind,
        type_annotation: Option<&str>,
        line: u32,
        column: u32,
    ) -> Result<InsertOutcome, InsertError> {
        validate_name(name)?;
        let scope = self.tree.current();
        let entry = IdentifierEntry::new(name, kind, type_annotation, (line, column), scope);
        let store = &mut self.tree[scope].store;
        let previous = store.lookup(name).map(|e| e.declared_at);
        match previous {
            None => {
                store.insert(entry)?;
                Ok(InsertOutcome::New)
            }
            Some(previous) => match self.policy {
                DuplicatePolicy::Overwrite => {
                    let _ = store.replace(entry);
                    Ok(InsertOutcome::Replaced { previous })
                }
                DuplicatePolicy::Reject => Err(DuplicateName {
                    name: entry.name,
                    previous,
                }
                .into()),
            },
        }
    }

    /// Ascending lookup: the current scope first, then each ancestor up to
    /// the global scope. The innermost declaration shadows outer ones.
    pub fn search(&self, name: &str) -> Option<&IdentifierEntry> {
        self.search_from(self.tree.current(), name)
    }

    /// Ascending lookup starting at an arbitrary scope.
    pub fn search_from(&self, scope: ScopeId, name: &str) -> Option<&IdentifierEntry> {
        self.tree
            .ancestors(scope)
            .find_map(|id| self.tree[id].store.lookup(name))
    }

    /// Lookup restricted to the current scope; never ascends.
    pub fn search_local(&self, name: &str) -> Option<&IdentifierEntry> {
        self.tree[self.tree.current()].store.lookup(name)
    }

    pub fn enter_scope(&mut self) -> ScopeId {
        self.tree.enter_scope()
    }

    pub fn enter_function_scope(&mut self) -> ScopeId {
        self.tree.enter_function_scope()
    }

    pub fn enter_loop_scope(&mut self) -> ScopeId {
        self.tree.enter_loop_scope()
    }

    pub fn enter_class_scope(&mut self) -> ScopeId {
        self.tree.enter_class_scope()
    }

    pub fn exit_scope(&mut self) -> ScopeId {
        self.tree.exit_scope()
    }

    pub fn current_scope(&self) -> ScopeId {
        self.tree.current()
    }

    pub fn global_scope(&self) -> ScopeId {
        self.tree.root()
    }

    pub fn scope_flags(&self) -> ScopeFlags {
        self.tree.current_flags()
    }

    pub fn parent_of(&self, scope: ScopeId) -> Option<ScopeId> {
        self.tree[scope].parent
    }

    pub fn scope_label(&self, scope: ScopeId) -> String {
        self.tree[scope].label()
    }

    /// Entries local to exactly `scope`, in insertion order.
    pub fn get_entries_by_scope(&self, scope: ScopeId) -> impl Iterator<Item = &IdentifierEntry> {
        self.tree[scope].store.iter()
    }

    /// Depth-first rendering of the scope tree. Each line is indented by
    /// depth and lists local entries as `name(kind)` in insertion order.
    pub fn get_scope_tree(&self) -> String {
        let mut out = String::new();
        self.render_scope(self.tree.root(), &mut out);
        out
    }

    fn render_scope(&self, id: ScopeId, out: &mut String) {
        let scope = &self.tree[id];
        for _ in 0..scope.depth {
            out.push_str("  ");
        }
        out.push_str(&scope.label());
        out.push(':');
        let mut first = true;
        for entry in scope.store.iter() {
            out.push_str(if first { " " } else { ", " });
            out.push_str(&entry.name);
            out.push('(');
            out.push_str(&entry.kind.to_string());
            out.push(')');
            first = false;
        }
        out.push('\n');
        for &child in &scope.children {
            self.render_scope(child, out);
        }
    }

    pub fn get_statistics(&self) -> TableStatistics {
        let mut stats = TableStatistics {
            rehash_threshold: LOAD_FACTOR_THRESHOLD,
            chain_min: usize::MAX,
            scope_count: self.tree.len(),
            max_depth: self.tree.max_depth(),
            ..TableStatistics::default()
        };
        let mut chain_count = 0usize;
        let mut chain_total = 0usize;
        for (_, scope) in self.tree.iter() {
            let store = &scope.store;
            stats.total_entries += store.len();
            stats.total_capacity += store.capacity();
            stats.insertions += store.insertions();
            stats.searches += store.searches();
            stats.collisions += store.collisions();
            stats.probes += store.probes();
            for len in store.chain_lengths() {
                stats.chain_min = stats.chain_min.min(len);
                stats.chain_max = stats.chain_max.max(len);
                chain_total += len;
                chain_count += 1;
            }
        }
        if chain_count == 0 {
            stats.chain_min = 0;
        } else {
            stats.chain_avg = chain_total as f64 / chain_count as f64;
        }
        if stats.total_capacity > 0 {
            stats.load_factor = stats.total_entries as f64 / stats.total_capacity as f64;
        }
        stats
    }

    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }
}

/// Table health snapshot, aggregated across all per-scope stores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStatistics {
    pub total_entries: usize,
    pub total_capacity: usize,
    pub load_factor: f64,
    pub rehash_threshold: f64,
    pub chain_min: usize,
    pub chain_max: usize,
    pub chain_avg: f64,
    pub scope_count: usize,
    pub max_depth: u32,
    pub insertions: u64,
    pub searches: u64,
    pub collisions: u64,
    pub probes: u64,
}

impl fmt::Display for TableStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Identifier table statistics ===")?;
        writeln!(f, "Capacity: {}", self.total_capacity)?;
        writeln!(f, "Entries: {}", self.total_entries)?;
        writeln!(f, "Load factor: {:.3}", self.load_factor)?;
        writeln!(f, "Rehash threshold: {:.2}", self.rehash_threshold)?;
        writeln!(
            f,
            "Bucket chains (min/max/avg): {}/{}/{:.2}",
            self.chain_min, self.chain_max, self.chain_avg
        )?;
        writeln!(f, "Scopes: {}", self.scope_count)?;
        writeln!(f, "Max depth: {}", self.max_depth)?;
        writeln!(f, "Insertions: {}", self.insertions)?;
        writeln!(f, "Searches: {}", self.searches)?;
        writeln!(f, "Collisions: {}", self.collisions)?;
        write!(f, "Probes: {}", self.probes)
    }
}

fn validate_name(name: &str) -> Result<(), InsertError> {
    if name.is_empty() {
        return Err(InsertError::EmptyName);
    }
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Err(InsertError::LeadingDigit(name.to_string()));
    }
    if name.chars().any(|c| !c.is_alphanumeric() && c != '_') {
        return Err(InsertError::InvalidChars(name.to_string()));
    }
    Ok(())
}
