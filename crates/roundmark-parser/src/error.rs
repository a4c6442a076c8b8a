//! Structural integrity errors raised while replaying a token stream.

/// What went wrong while replaying a token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureErrorKind {
    /// A close token with no open construct left to close.
    UnbalancedClose { name: &'static str },
    /// An open construct that was never closed.
    UnclosedOpen { name: &'static str },
    /// A close token that does not match the innermost open construct.
    MismatchedClose {
        expected: &'static str,
        found: &'static str,
    },
    /// A container ran out of recorded per-line prefixes.
    MissingIndent { name: &'static str },
}

/// Token stream that cannot be written back to source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureError {
    pub kind: StructureErrorKind,
    pub line: usize,
    pub column: usize,
}

impl StructureError {
    pub(crate) fn new(kind: StructureErrorKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

impl std::fmt::Display for StructureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            StructureErrorKind::UnbalancedClose { name } => write!(
                f,
                "Close token end-{} at {}:{} has no open token",
                name, self.line, self.column
            ),
            StructureErrorKind::UnclosedOpen { name } => write!(
                f,
                "Open token {} at {}:{} is never closed",
                name, self.line, self.column
            ),
            StructureErrorKind::MismatchedClose { expected, found } => write!(
                f,
                "Expected end-{} at {}:{}, found end-{}",
                expected, self.line, self.column, found
            ),
            StructureErrorKind::MissingIndent { name } => write!(
                f,
                "Container {} opened at {}:{} has no recorded indent for a later line",
                name, self.line, self.column
            ),
        }
    }
}

impl std::error::Error for StructureError {}
