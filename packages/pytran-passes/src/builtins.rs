//! Builtin names pre-registered in the global scope.

use pytran_symbols::{IdentKind, SymbolTable};

/// Builtin functions of the source language.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "print", "range", "xrange", "len", "str", "int", "float", "bool", "list", "dict", "set",
    "tuple", "type", "isinstance", "max", "min", "sum", "sorted", "reversed", "enumerate", "zip",
    "map", "filter", "input", "raw_input", "open", "file", "abs", "round", "pow", "all", "any",
    "ord", "chr", "unichr", "bin", "hex", "oct",
];

/// Builtin type names. Assigning to one of these draws a warning.
pub const BUILTIN_TYPES: &[&str] = &[
    "int", "float", "str", "bool", "list", "dict", "set", "tuple", "type", "object", "bytes",
    "bytearray", "unicode", "long",
];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name) || BUILTIN_TYPES.contains(&name)
}

/// Pre-register builtins as entries in the global scope, so the
/// undeclared-identifier check excludes them via normal ascending lookup.
///
/// Must run on a fresh table, before any scope is entered.
pub fn register_builtins(table: &mut SymbolTable) {
    debug_assert_eq!(table.current_scope(), table.global_scope());
    for name in BUILTIN_FUNCTIONS {
        if table.search_local(name).is_none() {
            table.insert(name, IdentKind::Function, Some("builtin"), 0, 0).ok();
        }
    }
    for name in BUILTIN_TYPES {
        if table.search_local(name).is_none() {
            table.insert(name, IdentKind::Class, Some("builtin"), 0, 0).ok();
        }
    }
}
