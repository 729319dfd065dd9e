//! Identifier declaration records.

use std::fmt;

use smol_str::SmolStr;

use crate::scope::ScopeId;

/// Placeholder annotation used until a real type system exists.
pub const INFERRED: &str = "auto";

/// What sort of declaration an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentKind {
    Variable,
    Function,
    Class,
    Parameter,
}

impl fmt::Display for IdentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = match self {
            IdentKind::Variable => "var",
            IdentKind::Function => "func",
            IdentKind::Class => "class",
            IdentKind::Parameter => "param",
        };
        f.write_str(str)
    }
}

/// One declaration record.
///
/// `scope` is fixed at insertion; an entry never migrates between scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierEntry {
    pub name: SmolStr,
    pub kind: IdentKind,
    /// Type annotation as written in the source, or [`INFERRED`].
    pub type_annotation: SmolStr,
    /// (line, column) of the declaration site.
    pub declared_at: (u32, u32),
    /// The scope that declared this entry.
    pub scope: ScopeId,
}

impl IdentifierEntry {
    pub fn new(
        name: &str,
        kind: IdentKind,
        type_annotation: Option<&str>,
        declared_at: (u32, u32),
        scope: ScopeId,
    ) -> Self {
        Self {
            name: SmolStr::new(name),
            kind,
            type_annotation: SmolStr::new(type_annotation.unwrap_or(INFERRED)),
            declared_at,
            scope,
        }
    }
}
