//! Error kinds for cppmodel operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Catch-all for unhandled cases
    Unexpected,

    // =========================================================================
    // Front-end errors
    // =========================================================================
    /// Failed to parse source code
    ParseFailed,

    /// Tree-sitter grammar could not be loaded
    GrammarError,

    /// Encoding error (invalid UTF-8, etc.)
    EncodingError,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// Directory traversal failed
    TraversalFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}
