use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies a source file registered in a [`FileIdMap`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(u32);

/// Maps [`FileId`]s to on-disk or virtual (in-memory) source files.
///
/// Virtual files let tests analyze sources without touching the filesystem.
#[derive(Debug, Default)]
pub struct FileIdMap {
    files: Vec<FileData>,
}

#[derive(Debug)]
enum FileData {
    OnDisk(PathBuf),
    Virtual { name: String, source: String },
}

impl FileIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_new_file(&mut self, path: PathBuf) -> FileId {
        self.files.push(FileData::OnDisk(path));
        FileId(self.files.len() as u32 - 1)
    }

    pub fn create_virtual_file(&mut self, name: &str, source: String) -> FileId {
        self.files.push(FileData::Virtual {
            name: name.to_string(),
            source,
        });
        FileId(self.files.len() as u32 - 1)
    }

    pub fn is_virtual(&self, id: FileId) -> bool {
        matches!(self.files[id.0 as usize], FileData::Virtual { .. })
    }

    /// Source text of a virtual file. Panics if `id` refers to an on-disk file.
    pub fn get_virtual_source(&self, id: FileId) -> &str {
        match &self.files[id.0 as usize] {
            FileData::Virtual { source, .. } => source,
            FileData::OnDisk(path) => panic!("file `{}` is not virtual", path.display()),
        }
    }

    /// Path of an on-disk file. Panics if `id` refers to a virtual file.
    pub fn get_file_path(&self, id: FileId) -> &Path {
        match &self.files[id.0 as usize] {
            FileData::OnDisk(path) => path,
            FileData::Virtual { name, .. } => panic!("file `{name}` is virtual"),
        }
    }

    pub fn get_file_display(&self, id: FileId) -> String {
        match &self.files[id.0 as usize] {
            FileData::OnDisk(path) => path.display().to_string(),
            FileData::Virtual { name, .. } => name.clone(),
        }
    }
}

/// A span of text in a source file.
///
/// Carries both the byte range (for report rendering) and the line/column of
/// the start of the span, as produced by the tokenizer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub file_id: FileId,
    /// The byte index of the first character in the span.
    pub start: u32,
    /// The byte index of the first character after the span.
    pub end: u32,
    /// 1-based line of the start of the span.
    pub line: u32,
    /// 1-based column of the start of the span.
    pub column: u32,
}

impl Span {
    pub fn new(file_id: FileId, start: u32, end: u32, line: u32, column: u32) -> Self {
        Self {
            file_id,
            start,
            end,
            line,
            column,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spanned<T>(pub T, pub Span);

impl<T: fmt::Debug> fmt::Debug for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}..{}) ", self.1.start, self.1.end)?;
        self.0.fmt(f)
    }
}

impl<T> std::ops::Deref for Spanned<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<T> std::ops::DerefMut for Spanned<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

pub fn spanned<T>(span: Span, node: T) -> Spanned<T> {
    Spanned(node, span)
}

impl<T> Spanned<T> {
    /// Get the unspanned node.
    pub fn unspan(self) -> T {
        self.0
    }

    pub fn respan(self, span: Span) -> Self {
        spanned(span, self.0)
    }

    pub fn span(&self) -> Span {
        self.1
    }
}
