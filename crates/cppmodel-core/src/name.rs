//! The name model: how declared and referenced entities are spelled.
//!
//! Names live in the [`Control`](crate::Control) arena and are addressed by
//! [`NameId`]. Two names are the same entity iff a [`Matcher`](crate::Matcher)
//! says so; id equality is only the fast path.

use smallvec::SmallVec;
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::fully_specified::FullySpecifiedType;
use crate::literals::{Identifier, NumericLiteral};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId(pub(crate) u32);

impl NameId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Every overloadable operator of C++.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr, EnumIter)]
pub enum OperatorKind {
    #[strum(serialize = "new")]
    New,
    #[strum(serialize = "delete")]
    Delete,
    #[strum(serialize = "new[]")]
    NewArray,
    #[strum(serialize = "delete[]")]
    DeleteArray,
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Star,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "%")]
    Percent,
    #[strum(serialize = "^")]
    Caret,
    #[strum(serialize = "&")]
    Amper,
    #[strum(serialize = "|")]
    Pipe,
    #[strum(serialize = "~")]
    Tilde,
    #[strum(serialize = "!")]
    Exclaim,
    #[strum(serialize = "=")]
    Equal,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = "+=")]
    PlusEqual,
    #[strum(serialize = "-=")]
    MinusEqual,
    #[strum(serialize = "*=")]
    StarEqual,
    #[strum(serialize = "/=")]
    SlashEqual,
    #[strum(serialize = "%=")]
    PercentEqual,
    #[strum(serialize = "^=")]
    CaretEqual,
    #[strum(serialize = "&=")]
    AmperEqual,
    #[strum(serialize = "|=")]
    PipeEqual,
    #[strum(serialize = "<<")]
    LessLess,
    #[strum(serialize = ">>")]
    GreaterGreater,
    #[strum(serialize = ">>=")]
    GreaterGreaterEqual,
    #[strum(serialize = "<<=")]
    LessLessEqual,
    #[strum(serialize = "==")]
    EqualEqual,
    #[strum(serialize = "!=")]
    ExclaimEqual,
    #[strum(serialize = "<=")]
    LessEqual,
    #[strum(serialize = ">=")]
    GreaterEqual,
    #[strum(serialize = "<=>")]
    SpaceShip,
    #[strum(serialize = "&&")]
    AmperAmper,
    #[strum(serialize = "||")]
    PipePipe,
    #[strum(serialize = "++")]
    PlusPlus,
    #[strum(serialize = "--")]
    MinusMinus,
    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = "->*")]
    ArrowStar,
    #[strum(serialize = "->")]
    Arrow,
    #[strum(serialize = "()")]
    FunctionCall,
    #[strum(serialize = "[]")]
    ArrayAccess,
}

impl OperatorKind {
    /// Map the spelling that follows the `operator` keyword to its kind.
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        let compact: String = spelling.chars().filter(|c| !c.is_whitespace()).collect();
        use strum::IntoEnumIterator;
        Self::iter().find(|op| <&'static str>::from(*op) == compact)
    }
}

/// A template argument: a type, or the literal of a non-type argument.
///
/// Ordering is lexicographic with the type as primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TemplateArgument {
    pub ty: FullySpecifiedType,
    pub numeric_literal: Option<NumericLiteral>,
}

impl TemplateArgument {
    pub fn new(ty: FullySpecifiedType) -> Self {
        Self {
            ty,
            numeric_literal: None,
        }
    }

    pub fn with_literal(ty: FullySpecifiedType, literal: NumericLiteral) -> Self {
        Self {
            ty,
            numeric_literal: Some(literal),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Name {
    Identifier(Identifier),
    /// Unnamed class, struct, union or enum, keyed by the offset of its class token.
    Anonymous { class_token: u32 },
    TemplateId {
        identifier: Identifier,
        arguments: Vec<TemplateArgument>,
        is_specialization: bool,
    },
    Destructor(NameId),
    Operator(OperatorKind),
    Conversion(FullySpecifiedType),
    /// `base::name`. A `None` base spells the global scope (`::name`).
    Qualified { base: Option<NameId>, name: NameId },
    Selector {
        names: SmallVec<[NameId; 4]>,
        has_arguments: bool,
    },
}

impl Name {
    pub fn is_identifier(&self) -> bool {
        matches!(self, Name::Identifier(_))
    }

    pub fn is_template_id(&self) -> bool {
        matches!(self, Name::TemplateId { .. })
    }

    pub fn is_qualified(&self) -> bool {
        matches!(self, Name::Qualified { .. })
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Name::Anonymous { .. })
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Name::Operator(_))
    }

    pub fn template_arguments(&self) -> &[TemplateArgument] {
        match self {
            Name::TemplateId { arguments, .. } => arguments,
            _ => &[],
        }
    }
}
