//! The syntax tree consumed by the binder.
//!
//! Nodes are allocated in an [`Arena`] and refer to their children through
//! `&'tcx` references, so a deeply nested tree is freed in bulk when the arena
//! goes away. Every node records the byte offset where it starts; scopes also
//! record where they end.
//!
//! The shapes follow the C++ grammar rather than any particular parser: a
//! declarator is `ptr-operator* core-declarator postfix-declarator*`, and a
//! declaration is a specifier sequence plus declarators.

use std::str::FromStr;

use cppmodel_core::{ClassKey, Identifier, NumericLiteral, OperatorKind, RefQualifier, StringLiteral, Visibility};
use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::declare_arena;

/// Byte offset into the source of a translation unit.
pub type Offset = u32;

declare_arena!([
    units: TranslationUnitAst<'tcx>,
    names: NameAst<'tcx>,
    specifiers: SpecifierAst<'tcx>,
    declarators: DeclaratorAst<'tcx>,
    function_declarators: FunctionDeclaratorAst<'tcx>,
    parameters: ParameterAst<'tcx>,
    type_ids: TypeIdAst<'tcx>,
    new_type_ids: NewTypeIdAst<'tcx>,
    class_specifiers: ClassSpecifierAst<'tcx>,
    enum_specifiers: EnumSpecifierAst<'tcx>,
    template_parameters: TemplateParameterAst<'tcx>,
    declarations: DeclarationAst<'tcx>,
    statements: StatementAst<'tcx>,
    expressions: ExpressionAst<'tcx>,
    lambdas: LambdaAst<'tcx>,
    qt_properties: QtPropertyAst<'tcx>,
    objc_classes: ObjCClassAst<'tcx>,
    objc_protocols: ObjCProtocolAst<'tcx>,
    objc_methods: ObjCMethodAst<'tcx>,
]);

#[derive(Debug)]
pub struct TranslationUnitAst<'tcx> {
    pub declarations: Vec<&'tcx DeclarationAst<'tcx>>,
    pub end: Offset,
    /// Some subtree nested past [`crate::ParseOptions::max_depth`] and was
    /// cut from the tree.
    pub depth_exceeded: bool,
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct NameAst<'tcx> {
    pub offset: Offset,
    pub kind: NameKind<'tcx>,
}

#[derive(Debug)]
pub enum NameKind<'tcx> {
    Simple(Identifier),
    /// `~Name`
    Destructor(&'tcx NameAst<'tcx>),
    Operator(OperatorKind),
    /// `operator T`
    Conversion(&'tcx TypeIdAst<'tcx>),
    TemplateId {
        identifier: Identifier,
        arguments: Vec<TemplateArgumentAst<'tcx>>,
        /// Written with the `template` disambiguator.
        is_specialization: bool,
    },
    /// `::a::b<int>::name`; `global` is the leading `::`.
    Qualified {
        global: bool,
        nested: Vec<&'tcx NameAst<'tcx>>,
        unqualified: &'tcx NameAst<'tcx>,
    },
    /// Objective-C selector, one identifier per keyword part.
    Selector {
        parts: Vec<Identifier>,
        has_arguments: bool,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum TemplateArgumentAst<'tcx> {
    Type(&'tcx TypeIdAst<'tcx>),
    Expression(&'tcx ExpressionAst<'tcx>),
}

// ---------------------------------------------------------------------------
// Specifiers
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SpecifierAst<'tcx> {
    pub offset: Offset,
    pub kind: SpecifierKind<'tcx>,
}

#[derive(Debug)]
pub enum SpecifierKind<'tcx> {
    Simple(SimpleSpecifier),
    /// One attribute name from `[[...]]` or `__attribute__((...))`.
    Attribute(Identifier),
    Named(&'tcx NameAst<'tcx>),
    Elaborated {
        key: ElaboratedKey,
        name: &'tcx NameAst<'tcx>,
    },
    Class(&'tcx ClassSpecifierAst<'tcx>),
    Enum(&'tcx EnumSpecifierAst<'tcx>),
    /// `decltype(expr)` and `typeof(expr)`.
    Decltype(&'tcx ExpressionAst<'tcx>),
}

/// Keyword specifiers. Parses from the keyword spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum SimpleSpecifier {
    #[strum(serialize = "const")]
    Const,
    #[strum(serialize = "volatile")]
    Volatile,
    #[strum(to_string = "signed", serialize = "__signed__")]
    Signed,
    #[strum(serialize = "unsigned")]
    Unsigned,
    #[strum(serialize = "friend")]
    Friend,
    #[strum(serialize = "auto")]
    Auto,
    #[strum(serialize = "register")]
    Register,
    #[strum(serialize = "static")]
    Static,
    #[strum(serialize = "extern")]
    Extern,
    #[strum(serialize = "mutable")]
    Mutable,
    #[strum(serialize = "typedef")]
    Typedef,
    #[strum(to_string = "inline", serialize = "__inline", serialize = "__inline__")]
    Inline,
    #[strum(serialize = "virtual")]
    Virtual,
    #[strum(serialize = "explicit")]
    Explicit,
    #[strum(serialize = "constexpr")]
    Constexpr,
    #[strum(serialize = "char")]
    Char,
    #[strum(serialize = "char16_t")]
    Char16,
    #[strum(serialize = "char32_t")]
    Char32,
    #[strum(serialize = "wchar_t")]
    WideChar,
    #[strum(to_string = "bool", serialize = "_Bool")]
    Bool,
    #[strum(serialize = "short")]
    Short,
    #[strum(serialize = "int")]
    Int,
    #[strum(serialize = "long")]
    Long,
    #[strum(serialize = "float")]
    Float,
    #[strum(serialize = "double")]
    Double,
    #[strum(serialize = "void")]
    Void,
    #[strum(serialize = "Q_SIGNAL")]
    QtSignal,
    #[strum(serialize = "Q_SLOT")]
    QtSlot,
    #[strum(serialize = "Q_INVOKABLE")]
    QtInvokable,
}

impl SimpleSpecifier {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::from_str(keyword.trim()).ok()
    }

    pub fn is_cv(self) -> bool {
        matches!(self, Self::Const | Self::Volatile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ElaboratedKey {
    Class,
    Struct,
    Union,
    Enum,
    Typename,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum AccessSpecifier {
    Public,
    Protected,
    Private,
}

impl AccessSpecifier {
    pub fn visibility(self) -> Visibility {
        match self {
            AccessSpecifier::Public => Visibility::Public,
            AccessSpecifier::Protected => Visibility::Protected,
            AccessSpecifier::Private => Visibility::Private,
        }
    }
}

#[derive(Debug)]
pub struct ClassSpecifierAst<'tcx> {
    /// Offset of the class key. Unnamed classes are named after it.
    pub offset: Offset,
    pub key: ClassKey,
    pub name: Option<&'tcx NameAst<'tcx>>,
    pub attributes: Vec<&'tcx SpecifierAst<'tcx>>,
    pub is_final: bool,
    pub bases: Vec<BaseSpecifierAst<'tcx>>,
    pub members: Vec<&'tcx DeclarationAst<'tcx>>,
    pub lbrace: Offset,
    pub rbrace: Offset,
}

#[derive(Debug)]
pub struct BaseSpecifierAst<'tcx> {
    pub offset: Offset,
    pub name: &'tcx NameAst<'tcx>,
    pub access: Option<AccessSpecifier>,
    pub is_virtual: bool,
    /// `Bases...`
    pub is_variadic: bool,
}

#[derive(Debug)]
pub struct EnumSpecifierAst<'tcx> {
    pub offset: Offset,
    pub name: Option<&'tcx NameAst<'tcx>>,
    /// `enum class` / `enum struct`
    pub is_scoped: bool,
    pub underlying: Vec<&'tcx SpecifierAst<'tcx>>,
    pub enumerators: Vec<EnumeratorAst<'tcx>>,
    pub lbrace: Offset,
    pub rbrace: Offset,
}

#[derive(Debug)]
pub struct EnumeratorAst<'tcx> {
    pub offset: Offset,
    pub name: Identifier,
    pub value: Option<&'tcx ExpressionAst<'tcx>>,
}

// ---------------------------------------------------------------------------
// Declarators
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DeclaratorAst<'tcx> {
    pub offset: Offset,
    pub attributes: Vec<&'tcx SpecifierAst<'tcx>>,
    pub ptr_operators: Vec<PtrOperatorAst<'tcx>>,
    pub core: Option<CoreDeclaratorAst<'tcx>>,
    /// In source order. `a[2][3]` lists `[2]` first.
    pub postfix: Vec<PostfixDeclaratorAst<'tcx>>,
    pub post_attributes: Vec<&'tcx SpecifierAst<'tcx>>,
    pub initializer: Option<&'tcx ExpressionAst<'tcx>>,
    pub special: Option<SpecialMember>,
}

/// `= default` / `= delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialMember {
    Default,
    Delete,
}

#[derive(Debug)]
pub enum PtrOperatorAst<'tcx> {
    Pointer { cv: Vec<SimpleSpecifier> },
    Reference { rvalue: bool },
    /// `C::*`
    PointerToMember {
        class_name: &'tcx NameAst<'tcx>,
        cv: Vec<SimpleSpecifier>,
    },
}

#[derive(Debug)]
pub enum CoreDeclaratorAst<'tcx> {
    Id {
        name: &'tcx NameAst<'tcx>,
        /// `Args... args`
        is_pack: bool,
    },
    /// A parenthesized declarator.
    Nested(&'tcx DeclaratorAst<'tcx>),
    /// `auto [a, b]`
    Decomposition(Vec<&'tcx NameAst<'tcx>>),
}

#[derive(Debug)]
pub enum PostfixDeclaratorAst<'tcx> {
    Array { size: Option<&'tcx ExpressionAst<'tcx>> },
    Function(&'tcx FunctionDeclaratorAst<'tcx>),
}

#[derive(Debug, Default)]
pub struct FunctionDeclaratorAst<'tcx> {
    /// Offset of the opening parenthesis.
    pub offset: Offset,
    pub parameters: Vec<&'tcx ParameterAst<'tcx>>,
    /// Trailing `...`
    pub is_variadic: bool,
    pub cv: Vec<SimpleSpecifier>,
    pub ref_qualifier: RefQualifier,
    pub is_override: bool,
    pub is_final: bool,
    pub trailing_return: Option<&'tcx TypeIdAst<'tcx>>,
}

#[derive(Debug, Default)]
pub struct ParameterAst<'tcx> {
    pub offset: Offset,
    pub specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
    pub declarator: Option<&'tcx DeclaratorAst<'tcx>>,
    pub default_value: Option<&'tcx ExpressionAst<'tcx>>,
}

#[derive(Debug, Default)]
pub struct TypeIdAst<'tcx> {
    pub offset: Offset,
    pub specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
    pub declarator: Option<&'tcx DeclaratorAst<'tcx>>,
}

/// The type operand of a new-expression: no parentheses, array bounds may
/// be run-time values.
#[derive(Debug, Default)]
pub struct NewTypeIdAst<'tcx> {
    pub offset: Offset,
    pub specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
    pub ptr_operators: Vec<PtrOperatorAst<'tcx>>,
    pub array_sizes: Vec<&'tcx ExpressionAst<'tcx>>,
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct TemplateParameterAst<'tcx> {
    pub offset: Offset,
    pub kind: TemplateParameterKind<'tcx>,
}

#[derive(Debug)]
pub enum TemplateParameterKind<'tcx> {
    /// `typename T = int`, `class... Ts`
    Type {
        name: Option<Identifier>,
        is_class: bool,
        is_pack: bool,
        default: Option<&'tcx TypeIdAst<'tcx>>,
    },
    /// `int N = 3`
    NonType(&'tcx ParameterAst<'tcx>),
    /// `template <typename> class C`
    Template {
        parameters: Vec<&'tcx TemplateParameterAst<'tcx>>,
        name: Option<Identifier>,
        default: Option<&'tcx NameAst<'tcx>>,
    },
}

#[derive(Debug)]
pub struct DeclarationAst<'tcx> {
    pub offset: Offset,
    pub kind: DeclarationKind<'tcx>,
}

/// Qt section keyword attached to an access declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QtSection {
    #[default]
    None,
    Signals,
    Slots,
}

#[derive(Debug)]
pub enum DeclarationKind<'tcx> {
    Simple {
        specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
        declarators: Vec<&'tcx DeclaratorAst<'tcx>>,
    },
    FunctionDefinition {
        specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
        declarator: &'tcx DeclaratorAst<'tcx>,
        /// Member initializers, each lowered to a call of the member name.
        ctor_initializers: Vec<&'tcx ExpressionAst<'tcx>>,
        /// `None` for `= default` / `= delete`.
        body: Option<&'tcx StatementAst<'tcx>>,
        end: Offset,
    },
    Namespace {
        name: Option<&'tcx NameAst<'tcx>>,
        is_inline: bool,
        members: Vec<&'tcx DeclarationAst<'tcx>>,
        lbrace: Offset,
        rbrace: Offset,
    },
    NamespaceAlias {
        alias: Identifier,
        target: &'tcx NameAst<'tcx>,
    },
    Template {
        parameters: Vec<&'tcx TemplateParameterAst<'tcx>>,
        declaration: Option<&'tcx DeclarationAst<'tcx>>,
        end: Offset,
    },
    /// `public:`, `signals:`, `private slots:`
    Access {
        access: Option<AccessSpecifier>,
        section: QtSection,
    },
    Using {
        name: &'tcx NameAst<'tcx>,
    },
    UsingDirective {
        name: &'tcx NameAst<'tcx>,
    },
    /// `using name = type-id;`
    Alias {
        name: Identifier,
        type_id: &'tcx TypeIdAst<'tcx>,
    },
    /// `extern "C" { ... }`
    Linkage {
        members: Vec<&'tcx DeclarationAst<'tcx>>,
    },
    StaticAssert {
        condition: &'tcx ExpressionAst<'tcx>,
    },
    Empty,
    QtProperty(&'tcx QtPropertyAst<'tcx>),
    /// `Q_ENUMS(...)` or, with `is_flags`, `Q_FLAGS(...)`.
    QtEnums {
        names: Vec<&'tcx NameAst<'tcx>>,
        is_flags: bool,
    },
    ObjCClass(&'tcx ObjCClassAst<'tcx>),
    ObjCProtocol(&'tcx ObjCProtocolAst<'tcx>),
    /// `@class A, B;`
    ObjCClassForward {
        names: Vec<(Offset, Identifier)>,
    },
    /// `@protocol P, Q;`
    ObjCProtocolForward {
        names: Vec<(Offset, Identifier)>,
    },
    ObjCMethod(&'tcx ObjCMethodAst<'tcx>),
    ObjCProperty {
        attributes: Vec<ObjCPropertyAttributeAst<'tcx>>,
        specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
        declarators: Vec<&'tcx DeclaratorAst<'tcx>>,
    },
    /// `@public`, `@protected`, `@private`, `@package`
    ObjCVisibility(Visibility),
}

#[derive(Debug)]
pub struct QtPropertyAst<'tcx> {
    pub offset: Offset,
    pub type_id: &'tcx TypeIdAst<'tcx>,
    pub name: Identifier,
    pub items: Vec<QtPropertyItemAst<'tcx>>,
}

/// `READ getter`, `NOTIFY changed`, `CONSTANT`, `DESIGNABLE false`, ...
#[derive(Debug)]
pub struct QtPropertyItemAst<'tcx> {
    pub name: Identifier,
    pub value: Option<&'tcx ExpressionAst<'tcx>>,
}

#[derive(Debug)]
pub struct ObjCClassAst<'tcx> {
    pub offset: Offset,
    /// `@interface` rather than `@implementation`.
    pub is_interface: bool,
    pub name: &'tcx NameAst<'tcx>,
    pub category: Option<&'tcx NameAst<'tcx>>,
    pub superclass: Option<&'tcx NameAst<'tcx>>,
    pub protocols: Vec<&'tcx NameAst<'tcx>>,
    /// Declarations between the braces, interleaved with visibility markers.
    pub instance_variables: Vec<&'tcx DeclarationAst<'tcx>>,
    pub members: Vec<&'tcx DeclarationAst<'tcx>>,
    pub end: Offset,
}

#[derive(Debug)]
pub struct ObjCProtocolAst<'tcx> {
    pub offset: Offset,
    pub name: &'tcx NameAst<'tcx>,
    pub protocols: Vec<&'tcx NameAst<'tcx>>,
    pub members: Vec<&'tcx DeclarationAst<'tcx>>,
    pub end: Offset,
}

#[derive(Debug)]
pub struct ObjCMethodAst<'tcx> {
    pub offset: Offset,
    /// `+` rather than `-`.
    pub is_class_method: bool,
    pub return_type: Option<&'tcx TypeIdAst<'tcx>>,
    pub selector: Vec<ObjCSelectorPartAst<'tcx>>,
    /// `, ...` after the last argument.
    pub is_variadic: bool,
    pub attributes: Vec<&'tcx SpecifierAst<'tcx>>,
    pub body: Option<&'tcx StatementAst<'tcx>>,
    pub end: Offset,
}

#[derive(Debug)]
pub struct ObjCSelectorPartAst<'tcx> {
    pub name: Option<Identifier>,
    pub argument: Option<ObjCMessageArgumentAst<'tcx>>,
}

#[derive(Debug)]
pub struct ObjCMessageArgumentAst<'tcx> {
    pub offset: Offset,
    pub type_id: Option<&'tcx TypeIdAst<'tcx>>,
    pub name: Identifier,
}

/// `readonly`, `getter=isOn`, ...
#[derive(Debug)]
pub struct ObjCPropertyAttributeAst<'tcx> {
    pub name: Identifier,
    pub method: Option<&'tcx NameAst<'tcx>>,
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct StatementAst<'tcx> {
    pub offset: Offset,
    pub kind: StatementKind<'tcx>,
}

/// The condition of `if`, `while`, `switch`: an expression or a declaration
/// with an initializer.
#[derive(Debug, Clone, Copy)]
pub enum ConditionAst<'tcx> {
    Expression(&'tcx ExpressionAst<'tcx>),
    Declaration(&'tcx DeclarationAst<'tcx>),
}

#[derive(Debug)]
pub struct CatchClauseAst<'tcx> {
    pub offset: Offset,
    /// `None` for `catch (...)`.
    pub parameter: Option<&'tcx ParameterAst<'tcx>>,
    pub body: &'tcx StatementAst<'tcx>,
    pub end: Offset,
}

#[derive(Debug)]
pub enum StatementKind<'tcx> {
    Compound {
        statements: Vec<&'tcx StatementAst<'tcx>>,
        end: Offset,
    },
    Declaration(&'tcx DeclarationAst<'tcx>),
    Expression(Option<&'tcx ExpressionAst<'tcx>>),
    If {
        init: Option<&'tcx StatementAst<'tcx>>,
        condition: ConditionAst<'tcx>,
        then: &'tcx StatementAst<'tcx>,
        otherwise: Option<&'tcx StatementAst<'tcx>>,
        end: Offset,
    },
    While {
        condition: ConditionAst<'tcx>,
        body: &'tcx StatementAst<'tcx>,
        end: Offset,
    },
    DoWhile {
        body: &'tcx StatementAst<'tcx>,
        condition: &'tcx ExpressionAst<'tcx>,
    },
    For {
        init: Option<&'tcx StatementAst<'tcx>>,
        condition: Option<ConditionAst<'tcx>>,
        increment: Option<&'tcx ExpressionAst<'tcx>>,
        body: &'tcx StatementAst<'tcx>,
        end: Offset,
    },
    RangeFor {
        specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
        declarator: &'tcx DeclaratorAst<'tcx>,
        range: &'tcx ExpressionAst<'tcx>,
        body: &'tcx StatementAst<'tcx>,
        end: Offset,
    },
    Switch {
        condition: ConditionAst<'tcx>,
        body: &'tcx StatementAst<'tcx>,
        end: Offset,
    },
    /// `case value:` or, without a value, `default:`.
    Case {
        value: Option<&'tcx ExpressionAst<'tcx>>,
        statements: Vec<&'tcx StatementAst<'tcx>>,
    },
    Labeled {
        label: Identifier,
        statement: &'tcx StatementAst<'tcx>,
    },
    Return(Option<&'tcx ExpressionAst<'tcx>>),
    Break,
    Continue,
    Goto(Identifier),
    Try {
        body: &'tcx StatementAst<'tcx>,
        handlers: Vec<CatchClauseAst<'tcx>>,
    },
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ExpressionAst<'tcx> {
    pub offset: Offset,
    pub end: Offset,
    pub kind: ExpressionKind<'tcx>,
}

#[derive(Debug)]
pub enum ExpressionKind<'tcx> {
    NumericLiteral(NumericLiteral),
    StringLiteral(StringLiteral),
    CharLiteral(StringLiteral),
    BoolLiteral(bool),
    Nullptr,
    This,
    Id(&'tcx NameAst<'tcx>),
    Unary {
        op: OperatorKind,
        operand: &'tcx ExpressionAst<'tcx>,
        postfix: bool,
    },
    Binary {
        op: OperatorKind,
        lhs: &'tcx ExpressionAst<'tcx>,
        rhs: &'tcx ExpressionAst<'tcx>,
    },
    Conditional {
        condition: &'tcx ExpressionAst<'tcx>,
        then: &'tcx ExpressionAst<'tcx>,
        otherwise: &'tcx ExpressionAst<'tcx>,
    },
    Call {
        callee: &'tcx ExpressionAst<'tcx>,
        arguments: Vec<&'tcx ExpressionAst<'tcx>>,
    },
    Member {
        base: &'tcx ExpressionAst<'tcx>,
        name: &'tcx NameAst<'tcx>,
        arrow: bool,
    },
    Subscript {
        base: &'tcx ExpressionAst<'tcx>,
        index: &'tcx ExpressionAst<'tcx>,
    },
    Cast {
        type_id: &'tcx TypeIdAst<'tcx>,
        operand: &'tcx ExpressionAst<'tcx>,
    },
    SizeofType(&'tcx TypeIdAst<'tcx>),
    SizeofExpression(&'tcx ExpressionAst<'tcx>),
    New {
        placement: Vec<&'tcx ExpressionAst<'tcx>>,
        type_id: &'tcx NewTypeIdAst<'tcx>,
        initializer: Option<&'tcx ExpressionAst<'tcx>>,
    },
    Delete {
        operand: &'tcx ExpressionAst<'tcx>,
        is_array: bool,
    },
    Lambda(&'tcx LambdaAst<'tcx>),
    InitializerList(Vec<&'tcx ExpressionAst<'tcx>>),
    Paren(&'tcx ExpressionAst<'tcx>),
    Throw(Option<&'tcx ExpressionAst<'tcx>>),
    /// Syntax the front end does not model.
    Unknown,
}

#[derive(Debug)]
pub struct LambdaAst<'tcx> {
    pub offset: Offset,
    pub captures: Vec<&'tcx ExpressionAst<'tcx>>,
    pub declarator: Option<&'tcx FunctionDeclaratorAst<'tcx>>,
    pub body: &'tcx StatementAst<'tcx>,
    pub end: Offset,
}

impl<'tcx> DeclaratorAst<'tcx> {
    /// The name of the innermost declarator-id, looking through parentheses.
    pub fn declarator_id(&self) -> Option<&'tcx NameAst<'tcx>> {
        let mut current = self.core.as_ref();
        loop {
            match current? {
                CoreDeclaratorAst::Id { name, .. } => return Some(*name),
                CoreDeclaratorAst::Nested(inner) => current = inner.core.as_ref(),
                CoreDeclaratorAst::Decomposition(_) => return None,
            }
        }
    }

    /// The first function postfix at this level.
    pub fn function_declarator(&self) -> Option<&'tcx FunctionDeclaratorAst<'tcx>> {
        self.postfix.iter().find_map(|p| match p {
            PostfixDeclaratorAst::Function(f) => Some(*f),
            PostfixDeclaratorAst::Array { .. } => None,
        })
    }
}

impl<'tcx> SpecifierAst<'tcx> {
    pub fn simple(&self) -> Option<SimpleSpecifier> {
        match self.kind {
            SpecifierKind::Simple(spec) => Some(spec),
            _ => None,
        }
    }
}
