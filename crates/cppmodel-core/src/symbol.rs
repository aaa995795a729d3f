//! Symbols and scopes.
//!
//! A [`Symbol`] is the common header (name, location, enclosing scope,
//! visibility, storage) plus a [`SymbolKind`] payload. Kinds that open a
//! naming scope carry a [`ScopeData`] with the ordered member list.

use bitflags::bitflags;
use strum_macros::{Display, IntoStaticStr};

use crate::fully_specified::FullySpecifiedType;
use crate::literals::StringLiteral;
use crate::name::NameId;
use crate::types::TypeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Where a symbol was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub file: Option<StringLiteral>,
    /// Byte offset of the declarator token.
    pub offset: u32,
    /// One-based line.
    pub line: u32,
    /// One-based column.
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Storage {
    #[default]
    None,
    Friend,
    Auto,
    Register,
    Static,
    Extern,
    Mutable,
    Typedef,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SymbolFlags: u8 {
        /// Synthesized by the binder, not spelled in source.
        const GENERATED   = 1 << 0;
        const DEPRECATED  = 1 << 1;
        const UNAVAILABLE = 1 << 2;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionFlags: u16 {
        const VIRTUAL      = 1 << 0;
        const OVERRIDE     = 1 << 1;
        const FINAL        = 1 << 2;
        const VARIADIC     = 1 << 3;
        const CONST        = 1 << 4;
        const VOLATILE     = 1 << 5;
        const STATIC       = 1 << 6;
        const PURE_VIRTUAL = 1 << 7;
        const AMBIGUOUS    = 1 << 8;
        const DELETED      = 1 << 9;
        const DEFAULTED    = 1 << 10;
        const EXPLICIT     = 1 << 11;
        const CONSTEXPR    = 1 << 12;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct QtPropertyFlags: u16 {
        const READ       = 1 << 0;
        const WRITE      = 1 << 1;
        const RESET      = 1 << 2;
        const NOTIFY     = 1 << 3;
        const DESIGNABLE = 1 << 4;
        const SCRIPTABLE = 1 << 5;
        const STORED     = 1 << 6;
        const USER       = 1 << 7;
        const CONSTANT   = 1 << 8;
        const FINAL      = 1 << 9;
        const MEMBER     = 1 << 10;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjCPropertyAttributes: u16 {
        const ASSIGN    = 1 << 0;
        const RETAIN    = 1 << 1;
        const COPY      = 1 << 2;
        const READONLY  = 1 << 3;
        const READWRITE = 1 << 4;
        const NONATOMIC = 1 << 5;
        const ATOMIC    = 1 << 6;
        const GETTER    = 1 << 7;
        const SETTER    = 1 << 8;
        const STRONG    = 1 << 9;
        const WEAK      = 1 << 10;
    }
}

/// Qt method classification, set by `signals:`/`slots:` sections and the
/// `Q_SIGNAL`/`Q_SLOT`/`Q_INVOKABLE` markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum MethodKey {
    #[default]
    Normal,
    Signal,
    Slot,
    Invokable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefQualifier {
    #[default]
    None,
    LValue,
    RValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ClassKey {
    #[default]
    Class,
    Struct,
    Union,
}

/// Ordered members of a scope symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeData {
    pub(crate) members: Vec<SymbolId>,
    pub start_offset: u32,
    pub end_offset: u32,
}

impl ScopeData {
    pub fn members(&self) -> &[SymbolId] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn member_at(&self, index: usize) -> Option<SymbolId> {
        self.members.get(index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationSymbol {
    pub ty: FullySpecifiedType,
    /// Spelling of the initializer, when one was written.
    pub initializer: Option<StringLiteral>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumeratorSymbol {
    pub ty: FullySpecifiedType,
    pub constant_value: Option<StringLiteral>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentSymbol {
    pub ty: FullySpecifiedType,
    /// Spelling of the default argument.
    pub initializer: Option<StringLiteral>,
}

impl ArgumentSymbol {
    pub fn has_initializer(&self) -> bool {
        self.initializer.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypenameArgumentSymbol {
    pub ty: FullySpecifiedType,
    /// `class T` rather than `typename T`.
    pub is_class_declarator: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassSymbol {
    pub scope: ScopeData,
    pub key: ClassKey,
    pub is_final: bool,
    pub(crate) base_classes: Vec<SymbolId>,
}

impl ClassSymbol {
    pub fn base_classes(&self) -> &[SymbolId] {
        &self.base_classes
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseClassSymbol {
    pub ty: FullySpecifiedType,
    pub is_virtual: bool,
    /// Pack expansion (`Bases...`).
    pub is_variadic: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumSymbol {
    pub scope: ScopeData,
    /// `enum class` / `enum struct`.
    pub is_scoped: bool,
    pub underlying: FullySpecifiedType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionSymbol {
    pub scope: ScopeData,
    pub return_type: FullySpecifiedType,
    pub flags: FunctionFlags,
    pub method_key: MethodKey,
    pub ref_qualifier: RefQualifier,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceSymbol {
    pub scope: ScopeData,
    pub is_inline: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceAliasSymbol {
    pub namespace_name: Option<NameId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QtPropertySymbol {
    pub ty: FullySpecifiedType,
    pub flags: QtPropertyFlags,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjCClassSymbol {
    pub scope: ScopeData,
    /// `@interface` rather than `@implementation`.
    pub is_interface: bool,
    pub category_name: Option<NameId>,
    pub base_class: Option<SymbolId>,
    pub(crate) protocols: Vec<SymbolId>,
}

impl ObjCClassSymbol {
    pub fn protocols(&self) -> &[SymbolId] {
        &self.protocols
    }

    pub fn is_category(&self) -> bool {
        self.category_name.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjCProtocolSymbol {
    pub scope: ScopeData,
    pub(crate) protocols: Vec<SymbolId>,
}

impl ObjCProtocolSymbol {
    pub fn protocols(&self) -> &[SymbolId] {
        &self.protocols
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjCMethodSymbol {
    pub scope: ScopeData,
    pub return_type: FullySpecifiedType,
    pub is_variadic: bool,
    /// `+` method rather than `-`.
    pub is_class_method: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjCPropertySymbol {
    pub ty: FullySpecifiedType,
    pub attributes: ObjCPropertyAttributes,
    pub getter_name: Option<NameId>,
    pub setter_name: Option<NameId>,
}

#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum SymbolKind {
    Declaration(DeclarationSymbol),
    EnumeratorDeclaration(EnumeratorSymbol),
    Argument(ArgumentSymbol),
    TypenameArgument(TypenameArgumentSymbol),
    Block(ScopeData),
    Class(ClassSymbol),
    BaseClass(BaseClassSymbol),
    Enum(EnumSymbol),
    Function(FunctionSymbol),
    Namespace(NamespaceSymbol),
    NamespaceAlias(NamespaceAliasSymbol),
    UsingNamespaceDirective,
    UsingDeclaration,
    /// Template parameters followed by the templated declaration.
    Template(ScopeData),
    ForwardClassDeclaration,
    QtPropertyDeclaration(QtPropertySymbol),
    QtEnum,
    ObjCBaseClass,
    ObjCBaseProtocol,
    ObjCClass(ObjCClassSymbol),
    ObjCForwardClassDeclaration,
    ObjCProtocol(ObjCProtocolSymbol),
    ObjCForwardProtocolDeclaration,
    ObjCMethod(ObjCMethodSymbol),
    ObjCPropertyDeclaration(ObjCPropertySymbol),
}

impl SymbolKind {
    pub fn kind_name(&self) -> &'static str {
        self.into()
    }

    /// Kinds that are usable as a type through `Type::UserDefined`.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class(_)
                | SymbolKind::Enum(_)
                | SymbolKind::Function(_)
                | SymbolKind::Namespace(_)
                | SymbolKind::Template(_)
                | SymbolKind::ForwardClassDeclaration
                | SymbolKind::ObjCClass(_)
                | SymbolKind::ObjCProtocol(_)
                | SymbolKind::ObjCForwardClassDeclaration
                | SymbolKind::ObjCForwardProtocolDeclaration
                | SymbolKind::ObjCMethod(_)
        )
    }

    pub fn scope(&self) -> Option<&ScopeData> {
        match self {
            SymbolKind::Block(scope) | SymbolKind::Template(scope) => Some(scope),
            SymbolKind::Class(c) => Some(&c.scope),
            SymbolKind::Enum(e) => Some(&e.scope),
            SymbolKind::Function(f) => Some(&f.scope),
            SymbolKind::Namespace(n) => Some(&n.scope),
            SymbolKind::ObjCClass(c) => Some(&c.scope),
            SymbolKind::ObjCProtocol(p) => Some(&p.scope),
            SymbolKind::ObjCMethod(m) => Some(&m.scope),
            _ => None,
        }
    }

    pub fn scope_mut(&mut self) -> Option<&mut ScopeData> {
        match self {
            SymbolKind::Block(scope) | SymbolKind::Template(scope) => Some(scope),
            SymbolKind::Class(c) => Some(&mut c.scope),
            SymbolKind::Enum(e) => Some(&mut e.scope),
            SymbolKind::Function(f) => Some(&mut f.scope),
            SymbolKind::Namespace(n) => Some(&mut n.scope),
            SymbolKind::ObjCClass(c) => Some(&mut c.scope),
            SymbolKind::ObjCProtocol(p) => Some(&mut p.scope),
            SymbolKind::ObjCMethod(m) => Some(&mut m.scope),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub(crate) id: SymbolId,
    pub(crate) name: Option<NameId>,
    pub(crate) location: SourceLocation,
    pub(crate) enclosing_scope: Option<SymbolId>,
    pub(crate) index: Option<usize>,
    pub(crate) self_type: TypeId,
    pub visibility: Visibility,
    pub storage: Storage,
    pub flags: SymbolFlags,
    pub kind: SymbolKind,
}

macro_rules! symbol_narrowing {
    ($($as_fn:ident, $is_fn:ident => $variant:ident($payload:ty);)*) => {
        $(
            pub fn $as_fn(&self) -> Option<&$payload> {
                match &self.kind {
                    SymbolKind::$variant(data) => Some(data),
                    _ => None,
                }
            }

            pub fn $is_fn(&self) -> bool {
                matches!(self.kind, SymbolKind::$variant(..))
            }
        )*
    };
}

macro_rules! symbol_predicates {
    ($($is_fn:ident => $variant:ident;)*) => {
        $(
            pub fn $is_fn(&self) -> bool {
                matches!(self.kind, SymbolKind::$variant)
            }
        )*
    };
}

impl Symbol {
    pub(crate) fn new(id: SymbolId, location: SourceLocation, name: Option<NameId>, kind: SymbolKind) -> Self {
        Self {
            id,
            name,
            location,
            enclosing_scope: None,
            index: None,
            self_type: TypeId::UNDEFINED,
            visibility: Visibility::Public,
            storage: Storage::None,
            flags: SymbolFlags::empty(),
            kind,
        }
    }

    #[inline]
    pub fn id(&self) -> SymbolId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> Option<NameId> {
        self.name
    }

    #[inline]
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    pub fn line(&self) -> u32 {
        self.location.line
    }

    pub fn column(&self) -> u32 {
        self.location.column
    }

    pub fn file_name(&self) -> Option<StringLiteral> {
        self.location.file
    }

    /// Owning scope. Back-reference only; the scope owns the symbol.
    #[inline]
    pub fn enclosing_scope(&self) -> Option<SymbolId> {
        self.enclosing_scope
    }

    /// Position inside the enclosing scope's member list.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The `UserDefined` type of a symbol-as-type, undefined otherwise.
    pub fn self_type(&self) -> TypeId {
        self.self_type
    }

    pub fn is_scope(&self) -> bool {
        self.kind.scope().is_some()
    }

    pub fn scope(&self) -> Option<&ScopeData> {
        self.kind.scope()
    }

    pub fn member_count(&self) -> usize {
        self.scope().map_or(0, ScopeData::member_count)
    }

    pub fn member_at(&self, index: usize) -> Option<SymbolId> {
        self.scope().and_then(|s| s.member_at(index))
    }

    pub fn members(&self) -> &[SymbolId] {
        self.scope().map_or(&[], ScopeData::members)
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_protected(&self) -> bool {
        self.visibility == Visibility::Protected
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    pub fn is_typedef(&self) -> bool {
        self.storage == Storage::Typedef
    }

    pub fn is_static(&self) -> bool {
        self.storage == Storage::Static
    }

    pub fn is_friend(&self) -> bool {
        self.storage == Storage::Friend
    }

    pub fn is_extern(&self) -> bool {
        self.storage == Storage::Extern
    }

    pub fn is_generated(&self) -> bool {
        self.flags.contains(SymbolFlags::GENERATED)
    }

    pub fn is_deprecated(&self) -> bool {
        self.flags.contains(SymbolFlags::DEPRECATED)
    }

    pub fn is_unavailable(&self) -> bool {
        self.flags.contains(SymbolFlags::UNAVAILABLE)
    }

    /// Stored type of value-like symbols. Symbol-as-type kinds are handled by
    /// [`Control::symbol_type`](crate::Control::symbol_type).
    pub(crate) fn stored_type(&self) -> Option<FullySpecifiedType> {
        match &self.kind {
            SymbolKind::Declaration(d) => Some(d.ty),
            SymbolKind::EnumeratorDeclaration(e) => Some(e.ty),
            SymbolKind::Argument(a) => Some(a.ty),
            SymbolKind::TypenameArgument(t) => Some(t.ty),
            SymbolKind::BaseClass(b) => Some(b.ty),
            SymbolKind::QtPropertyDeclaration(p) => Some(p.ty),
            SymbolKind::ObjCPropertyDeclaration(p) => Some(p.ty),
            _ => None,
        }
    }

    symbol_narrowing! {
        as_declaration, is_declaration => Declaration(DeclarationSymbol);
        as_enumerator, is_enumerator => EnumeratorDeclaration(EnumeratorSymbol);
        as_argument, is_argument => Argument(ArgumentSymbol);
        as_typename_argument, is_typename_argument => TypenameArgument(TypenameArgumentSymbol);
        as_block, is_block => Block(ScopeData);
        as_class, is_class => Class(ClassSymbol);
        as_base_class, is_base_class => BaseClass(BaseClassSymbol);
        as_enum, is_enum => Enum(EnumSymbol);
        as_function, is_function => Function(FunctionSymbol);
        as_namespace, is_namespace => Namespace(NamespaceSymbol);
        as_namespace_alias, is_namespace_alias => NamespaceAlias(NamespaceAliasSymbol);
        as_template, is_template => Template(ScopeData);
        as_qt_property, is_qt_property => QtPropertyDeclaration(QtPropertySymbol);
        as_objc_class, is_objc_class => ObjCClass(ObjCClassSymbol);
        as_objc_protocol, is_objc_protocol => ObjCProtocol(ObjCProtocolSymbol);
        as_objc_method, is_objc_method => ObjCMethod(ObjCMethodSymbol);
        as_objc_property, is_objc_property => ObjCPropertyDeclaration(ObjCPropertySymbol);
    }

    symbol_predicates! {
        is_using_namespace_directive => UsingNamespaceDirective;
        is_using_declaration => UsingDeclaration;
        is_forward_class_declaration => ForwardClassDeclaration;
        is_qt_enum => QtEnum;
        is_objc_base_class => ObjCBaseClass;
        is_objc_base_protocol => ObjCBaseProtocol;
        is_objc_forward_class_declaration => ObjCForwardClassDeclaration;
        is_objc_forward_protocol_declaration => ObjCForwardProtocolDeclaration;
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionSymbol> {
        match &mut self.kind {
            SymbolKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassSymbol> {
        match &mut self.kind {
            SymbolKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_objc_class_mut(&mut self) -> Option<&mut ObjCClassSymbol> {
        match &mut self.kind {
            SymbolKind::ObjCClass(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_objc_method_mut(&mut self) -> Option<&mut ObjCMethodSymbol> {
        match &mut self.kind {
            SymbolKind::ObjCMethod(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_declaration_mut(&mut self) -> Option<&mut DeclarationSymbol> {
        match &mut self.kind {
            SymbolKind::Declaration(d) => Some(d),
            _ => None,
        }
    }
}

impl FunctionSymbol {
    pub fn is_virtual(&self) -> bool {
        self.flags.contains(FunctionFlags::VIRTUAL)
    }

    pub fn is_override(&self) -> bool {
        self.flags.contains(FunctionFlags::OVERRIDE)
    }

    pub fn is_final(&self) -> bool {
        self.flags.contains(FunctionFlags::FINAL)
    }

    pub fn is_variadic(&self) -> bool {
        self.flags.contains(FunctionFlags::VARIADIC)
    }

    pub fn is_const(&self) -> bool {
        self.flags.contains(FunctionFlags::CONST)
    }

    pub fn is_volatile(&self) -> bool {
        self.flags.contains(FunctionFlags::VOLATILE)
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(FunctionFlags::STATIC)
    }

    pub fn is_pure_virtual(&self) -> bool {
        self.flags.contains(FunctionFlags::PURE_VIRTUAL)
    }

    pub fn is_signal(&self) -> bool {
        self.method_key == MethodKey::Signal
    }

    pub fn is_slot(&self) -> bool {
        self.method_key == MethodKey::Slot
    }

    pub fn is_invokable(&self) -> bool {
        self.method_key == MethodKey::Invokable
    }

    /// A return type was written (constructors, destructors and conversion
    /// functions have none).
    pub fn has_return_type(&self) -> bool {
        self.return_type.is_valid()
    }
}
