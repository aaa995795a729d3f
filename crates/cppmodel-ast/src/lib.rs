//! # cppmodel-ast
//!
//! The syntax tree the binder walks, and a front end that produces it from
//! C++ source through tree-sitter-cpp.
//!
//! Nodes live in an [`Arena`] for the lifetime `'tcx`; a [`TranslationUnit`]
//! keeps the source text and maps node offsets back to lines and columns.
//! Objective-C and Qt declarations have tree shapes here but no front end;
//! callers construct them directly.

pub mod arena;
pub mod ast;
mod lower;
pub mod parse;
pub mod stack;
pub mod unit;

pub use ast::*;
pub use parse::{ParseOptions, parse_file, parse_source};
pub use unit::TranslationUnit;
