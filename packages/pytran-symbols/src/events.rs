//! Event-stream intake from the tokenizer collaborator.
//!
//! The lexical stage does not call the table directly; it emits declaration
//! occurrences and the indentation tracker's block-open/close events, which
//! map onto inserts and scope transitions here.

use smol_str::SmolStr;

use crate::entry::IdentKind;
use crate::table::{InsertError, SymbolTable};

/// One event from the lexical stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Declare {
        name: SmolStr,
        kind: IdentKind,
        line: u32,
        column: u32,
    },
    /// An indentation-driven block open (INDENT).
    BlockOpen,
    /// Matching block close (DEDENT).
    BlockClose,
}

impl SymbolTable {
    /// Apply a single tokenizer event to the table.
    ///
    /// A `BlockClose` at the global scope is tolerated (malformed nesting
    /// from the caller never aborts the run).
    pub fn apply(&mut self, event: &TableEvent) -> Result<(), InsertError> {
        match event {
            TableEvent::Declare {
                name,
                kind,
                line,
                column,
            } => self.insert(name, *kind, None, *line, *column).map(|_| ()),
            TableEvent::BlockOpen => {
                self.enter_scope();
                Ok(())
            }
            TableEvent::BlockClose => {
                self.exit_scope();
                Ok(())
            }
        }
    }

    /// Apply a whole event stream, stopping at the first insert error.
    pub fn apply_all<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a TableEvent>,
    ) -> Result<(), InsertError> {
        for event in events {
            self.apply(event)?;
        }
        Ok(())
    }
}
