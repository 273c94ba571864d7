//! Source location tracking for diagnostics.
//!
//! Provides [`Span`] to track where nodes and diagnostics occur, and
//! [`SourceFiles`] to map the compact [`FileId`] carried by every span back
//! to the path of the file it came from.

use std::fmt;

/// Index of a source file in a [`SourceFiles`] table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Debug)]
pub struct FileId(pub u32);

/// A span of source code, represented by its starting position.
///
/// The line and column are 1-indexed. `len` is informational and only used
/// when merging spans.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// File the span belongs to.
    pub file: FileId,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a span in the default file.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self {
            file: FileId::default(),
            line,
            col,
            len,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, 0)
    }

    /// Move this span into another file.
    #[inline]
    pub fn in_file(self, file: FileId) -> Self {
        Self { file, ..self }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this span starts strictly before `other` in the same file.
    #[inline]
    pub fn precedes(&self, other: &Span) -> bool {
        (self.line, self.col) < (other.line, other.col)
    }

    /// Merge two spans into one that starts at `self` and covers both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        if self.line == other.line {
            let start_col = self.col.min(other.col);
            let end_col = (other.col + other.len).max(self.col + self.len);
            Span {
                len: end_col - start_col,
                col: start_col,
                ..self
            }
        } else {
            Span {
                len: self.len + other.len,
                ..self
            }
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Table of source file paths addressed by [`FileId`].
#[derive(Debug, Clone, Default)]
pub struct SourceFiles {
    paths: Vec<String>,
}

impl SourceFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file path and return its id.
    pub fn add(&mut self, path: impl Into<String>) -> FileId {
        let path = path.into();
        if let Some(pos) = self.paths.iter().position(|p| *p == path) {
            return FileId(pos as u32);
        }
        self.paths.push(path);
        FileId((self.paths.len() - 1) as u32)
    }

    /// Path of a registered file, `"<unknown>"` for ids never handed out.
    pub fn path(&self, id: FileId) -> &str {
        self.paths
            .get(id.0 as usize)
            .map(String::as_str)
            .unwrap_or("<unknown>")
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_display() {
        let span = Span::new(3, 15, 5);
        assert_eq!(format!("{}", span), "3:15");
    }

    #[test]
    fn span_merge_same_line() {
        let merged = Span::new(1, 5, 3).merge(Span::new(1, 10, 3));
        assert_eq!(merged.col, 5);
        assert_eq!(merged.len, 8);
    }

    #[test]
    fn span_precedes_orders_by_line_then_col() {
        assert!(Span::point(1, 9).precedes(&Span::point(2, 1)));
        assert!(Span::point(2, 1).precedes(&Span::point(2, 4)));
        assert!(!Span::point(2, 4).precedes(&Span::point(2, 4)));
    }

    #[test]
    fn source_files_deduplicates_paths() {
        let mut files = SourceFiles::new();
        let a = files.add("main.tn");
        let b = files.add("util.tn");
        assert_ne!(a, b);
        assert_eq!(files.add("main.tn"), a);
        assert_eq!(files.path(b), "util.tn");
        assert_eq!(files.path(FileId(42)), "<unknown>");
    }
}
