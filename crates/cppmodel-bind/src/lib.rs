//! # cppmodel-bind
//!
//! Walks a [`cppmodel_ast`] tree and populates a [`cppmodel_core::Control`]
//! with the names, types and scoped symbols it declares.
//!
//! ```ignore
//! let literals = LiteralTable::new();
//! let arena = Arena::default();
//! let unit = TranslationUnit::new(&literals, "a.cpp", source);
//! let ast = parse_source(&arena, &unit, &ParseOptions::default())?;
//!
//! let mut control = Control::with_literals(literals.clone());
//! let global = control.new_namespace(SourceLocation::default(), None);
//! Bind::new(&mut control, &unit).bind_translation_unit(ast, global);
//! ```
//!
//! The binder never fails. Constructs it cannot make sense of, and trees
//! nested beyond [`BindOptions::max_depth`], produce undefined types or no
//! symbol at all and are reported through `tracing`.

mod bind;
mod declaration;
mod declarator;
mod expression;
mod name;
mod objc;
pub mod options;
mod specifier;
mod statement;

pub use bind::Bind;
pub use options::BindOptions;
