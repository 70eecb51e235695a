//! Source map for managing source files and computing source locations.
//!
//! This module provides the [`SourceMap`] type for registering source
//! files and computing line/column information from byte offsets, and the
//! [`SourceFile`] type owning one file's content.

use std::sync::Arc;

use super::{FileId, Span};

/// A source file with its content and metadata
#[derive(Clone)]
pub struct SourceFile {
    /// Unique file identifier
    id: FileId,
    /// File name (path or display name)
    name: String,
    /// File content
    content: Arc<str>,
    /// Precomputed line start offsets
    line_starts: Arc<[usize]>,
}

impl SourceFile {
    /// Create a new source file
    pub fn new(id: usize, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content = content.into();
        let line_starts = Self::compute_line_starts(&content);
        Self {
            id: FileId(id),
            name: name.into(),
            content,
            line_starts,
        }
    }

    /// Compute line start offsets from content
    fn compute_line_starts(content: &str) -> Arc<[usize]> {
        let mut line_starts = vec![0];
        for (i, ch) in content.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        line_starts.into()
    }

    /// Get the file identifier
    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    /// Get the file name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the file content
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the total number of lines
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Compute the 1-based line and column of a byte offset
    ///
    /// Offsets past the end of the file resolve to the last line.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let col = offset - self.line_starts[line];
        (line as u32 + 1, col as u32 + 1)
    }

    /// Get the text of a 1-based line, without its terminator
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let idx = line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&next| next)
            .unwrap_or(self.content.len());
        Some(self.content[start..end].trim_end_matches(['\n', '\r']))
    }
}

/// Registry of all source files in a compilation
///
/// # Examples
///
/// ```
/// use zinc_util::span::SourceMap;
///
/// let mut map = SourceMap::new();
/// let id = map.add_file("main.c", "int x;\n");
/// assert_eq!(map.file(id).unwrap().name(), "main.c");
/// ```
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    /// Create an empty source map
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Register a file and return its id
    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> FileId {
        let id = self.files.len();
        self.files.push(SourceFile::new(id, name, content));
        FileId(id)
    }

    /// Look up a file by id
    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    /// Number of registered files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if no files are registered
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Render a span as `name:line:column`
    ///
    /// Falls back to the span's own line/column when the file is unknown.
    pub fn describe(&self, span: Span) -> String {
        match self.file(span.file_id) {
            Some(file) => format!("{}:{}:{}", file.name(), span.line, span.column),
            None => format!("<unknown>:{}:{}", span.line, span.column),
        }
    }
}

impl Default for SourceMap {
    fn default() -> Self {
        Self::new()
    }
}
