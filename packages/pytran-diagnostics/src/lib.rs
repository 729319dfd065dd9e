//! Diagnostics for the pytran front end.
//!
//! Semantic errors and warnings are accumulated as structured
//! [`SemanticError`] records in emission order. The caller decides whether
//! errors block downstream stages; warnings never do. Rendering to pretty
//! reports goes through [`ariadne`].

pub mod span;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::{fmt, io};

pub use ariadne;

use ariadne::Source;

use span::{FileId, FileIdMap, Span};

pub type Report = ariadne::Report<'static, Span>;
pub type Label = ariadne::Label<Span>;

impl ariadne::Span for Span {
    type SourceId = FileId;

    fn source(&self) -> &Self::SourceId {
        &self.file_id
    }

    fn start(&self) -> usize {
        self.start as usize
    }

    fn end(&self) -> usize {
        self.end as usize
    }
}

pub struct FileCache<'a> {
    map: &'a FileIdMap,
    sources: HashMap<FileId, Source>,
}

impl<'a> FileCache<'a> {
    pub fn new(map: &'a FileIdMap) -> Self {
        Self {
            map,
            sources: HashMap::new(),
        }
    }
}

impl ariadne::Cache<FileId> for FileCache<'_> {
    fn fetch(&mut self, id: &FileId) -> Result<&Source, Box<dyn fmt::Debug + '_>> {
        if !self.sources.contains_key(id) {
            let str = if self.map.is_virtual(*id) {
                self.map.get_virtual_source(*id).to_string()
            } else {
                // Read file from FS.
                let path = self.map.get_file_path(*id);
                std::fs::read_to_string(path)
                    .unwrap_or_else(|_| panic!("could not read file at path `{}`", path.display()))
            };
            self.sources.insert(*id, Source::from(str));
        }
        Ok(&self.sources[id])
    }

    fn display<'b>(&self, id: &'b FileId) -> Option<Box<dyn fmt::Display + 'b>> {
        Some(Box::new(self.map.get_file_display(*id)))
    }
}

/// The fixed taxonomy of semantic diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Functions.
    ArgumentCountMismatch,
    DuplicateArgument,
    ReturnOutsideFunction,
    YieldOutsideFunction,
    // Loops.
    BreakOutsideLoop,
    ContinueOutsideLoop,
    // Names.
    UndeclaredIdentifier,
    RedefinitionBuiltin,
    DuplicateDeclaration,
    InvalidIdentifier,
    // Constants.
    ConstDivisionByZero,
    // Unreachable statements.
    DeadCode,
}

impl ErrorKind {
    /// The severity a diagnostic of this kind carries by default.
    pub fn severity(self) -> Severity {
        match self {
            ErrorKind::RedefinitionBuiltin
            | ErrorKind::DuplicateDeclaration
            | ErrorKind::DeadCode => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ArgumentCountMismatch => "ARGUMENT_COUNT_MISMATCH",
            ErrorKind::DuplicateArgument => "DUPLICATE_ARGUMENT",
            ErrorKind::ReturnOutsideFunction => "RETURN_OUTSIDE_FUNCTION",
            ErrorKind::YieldOutsideFunction => "YIELD_OUTSIDE_FUNCTION",
            ErrorKind::BreakOutsideLoop => "BREAK_OUTSIDE_LOOP",
            ErrorKind::ContinueOutsideLoop => "CONTINUE_OUTSIDE_LOOP",
            ErrorKind::UndeclaredIdentifier => "UNDECLARED_IDENTIFIER",
            ErrorKind::RedefinitionBuiltin => "REDEFINITION_BUILTIN",
            ErrorKind::DuplicateDeclaration => "DUPLICATE_DECLARATION",
            ErrorKind::InvalidIdentifier => "INVALID_IDENTIFIER",
            ErrorKind::ConstDivisionByZero => "CONST_DIVISION_BY_ZERO",
            ErrorKind::DeadCode => "DEAD_CODE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A single semantic diagnostic. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticError {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
}

impl SemanticError {
    /// Create a diagnostic with the default severity for `kind`.
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            span,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }

    pub fn column(&self) -> u32 {
        self.span.column
    }

    fn to_report(&self) -> Report {
        let kind = match self.severity {
            Severity::Error => ariadne::ReportKind::Error,
            Severity::Warning => ariadne::ReportKind::Warning,
        };
        Report::build(kind, self.span.file_id, self.span.start as usize)
            .with_message(&self.message)
            .with_label(Label::new(self.span).with_message(&self.message))
            .finish()
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(
                f,
                "{}:{}: [{}] {}",
                self.line(),
                self.column(),
                self.kind,
                self.message
            ),
            Severity::Warning => write!(
                f,
                "{}:{}: [WARNING: {}] {}",
                self.line(),
                self.column(),
                self.kind,
                self.message
            ),
        }
    }
}

/// Shared accumulator for diagnostics produced during one analysis run.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics(Arc<Mutex<DiagnosticsData>>);

#[derive(Debug, Default)]
struct DiagnosticsData {
    errors: Vec<SemanticError>,
}

impl Diagnostics {
    pub fn add(&self, error: SemanticError) {
        self.0.lock().unwrap().errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().errors.len()
    }

    /// Whether any accumulated diagnostic has error severity. Warnings alone
    /// never block downstream stages.
    pub fn has_errors(&self) -> bool {
        self.0
            .lock()
            .unwrap()
            .errors
            .iter()
            .any(|e| e.severity == Severity::Error)
    }

    /// All diagnostics in emission order.
    pub fn errors(&self) -> Vec<SemanticError> {
        self.0.lock().unwrap().errors.clone()
    }

    /// Plain-text rendering, one diagnostic per line in emission order.
    pub fn render(&self) -> String {
        let data = self.0.lock().unwrap();
        let mut out = String::new();
        for error in &data.errors {
            out.push_str(&error.to_string());
            out.push('\n');
        }
        out
    }

    /// Writes pretty reports to the output stream. Returns `false` if not
    /// empty.
    pub fn write(&self, map: &FileIdMap, mut w: impl io::Write) -> bool {
        let mut cache = FileCache::new(map);
        for error in &self.0.lock().unwrap().errors {
            error.to_report().write(&mut cache, &mut w).unwrap();
        }
        self.is_empty()
    }

    /// Prints pretty reports to `stderr`. Returns `false` if not empty.
    pub fn eprint(&self, map: &FileIdMap) -> bool {
        let mut cache = FileCache::new(map);
        for error in &self.0.lock().unwrap().errors {
            error.to_report().eprint(&mut cache).unwrap();
        }
        self.is_empty()
    }
}
