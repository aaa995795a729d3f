//! # cppmodel-error
//!
//! Error type shared by the fallible edges of cppmodel: reading files, running
//! the tree-sitter front end, and the command-line driver.
//!
//! The semantic model and the binder never produce errors. Malformed input is
//! met with degraded results there (undefined types, synthesized names), so
//! only I/O and front-end boundaries return [`Result`].
//!
//! ```rust
//! use cppmodel_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ParseFailed, "tree-sitter produced no tree")
//!         .with_operation("ast::parse_source")
//!         .with_context("file", "widget.cpp"))
//! }
//! ```

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using cppmodel Error
pub type Result<T> = std::result::Result<T, Error>;
