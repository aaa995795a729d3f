//! # cppmodel-core
//!
//! The semantic model of C++ and Objective-C code: literals, names, types,
//! fully specified types, symbols and scopes, plus structural matching,
//! pretty printing and template instantiation.
//!
//! Everything is owned by a [`Control`] and addressed by small copyable ids
//! ([`NameId`], [`TypeId`], [`SymbolId`]).

pub mod clone;
pub mod control;
pub mod fully_specified;
pub mod literals;
pub mod matcher;
pub mod name;
pub mod overview;
pub mod symbol;
pub mod types;
pub mod visit;

pub use clone::{Cloner, Subst};
pub use control::Control;
pub use fully_specified::{FullySpecifiedType, Specifiers};
pub use literals::{Identifier, LiteralTable, NumericLiteral, StringLiteral};
pub use matcher::{DefaultMatcher, Matcher, SafeMatcher, TypeMatcher};
pub use name::{Name, NameId, OperatorKind, TemplateArgument};
pub use overview::Overview;
pub use symbol::{
    ClassKey, FunctionFlags, MethodKey, ObjCPropertyAttributes, QtPropertyFlags, RefQualifier,
    SourceLocation, Storage, Symbol, SymbolFlags, SymbolId, SymbolKind, Visibility,
};
pub use types::{FloatKind, IntegerKind, Type, TypeId};
pub use visit::{NameVisitor, SymbolVisitor, TypeVisitor, accept_name, accept_type, walk_symbols};
