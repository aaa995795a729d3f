//! Owner of every name, type and symbol of one translation unit.
//!
//! The binder borrows a `Control` mutably while it runs. Everything else
//! reads through `&Control`.

use std::collections::HashMap;

use smallvec::SmallVec;
use tracing::trace;

use crate::fully_specified::FullySpecifiedType;
use crate::literals::{Identifier, LiteralTable, NumericLiteral, StringLiteral};
use crate::matcher::Matcher;
use crate::name::{Name, NameId, OperatorKind, TemplateArgument};
use crate::symbol::*;
use crate::types::{FloatKind, IntegerKind, Type, TypeId};

const INTEGER_KINDS: [IntegerKind; 9] = [
    IntegerKind::Char,
    IntegerKind::Char16,
    IntegerKind::Char32,
    IntegerKind::WideChar,
    IntegerKind::Bool,
    IntegerKind::Short,
    IntegerKind::Int,
    IntegerKind::Long,
    IntegerKind::LongLong,
];

const FLOAT_KINDS: [FloatKind; 3] = [FloatKind::Float, FloatKind::Double, FloatKind::LongDouble];

const VOID_SLOT: u32 = 1;
const FIRST_INTEGER_SLOT: u32 = 2;
const FIRST_FLOAT_SLOT: u32 = FIRST_INTEGER_SLOT + INTEGER_KINDS.len() as u32;

#[derive(Debug)]
pub struct Control {
    literals: LiteralTable,
    names: Vec<Name>,
    types: Vec<Type>,
    symbols: Vec<Symbol>,
    identifier_names: HashMap<Identifier, NameId>,
    operator_names: HashMap<OperatorKind, NameId>,
}

impl Default for Control {
    fn default() -> Self {
        Self::new()
    }
}

impl Control {
    pub fn new() -> Self {
        Self::with_literals(LiteralTable::new())
    }

    /// A control sharing an existing literal table.
    pub fn with_literals(literals: LiteralTable) -> Self {
        let mut types = Vec::with_capacity(64);
        types.push(Type::Undefined);
        types.push(Type::Void);
        types.extend(INTEGER_KINDS.iter().map(|k| Type::Integer(*k)));
        types.extend(FLOAT_KINDS.iter().map(|k| Type::Float(*k)));
        Self {
            literals,
            names: Vec::new(),
            types,
            symbols: Vec::new(),
            identifier_names: HashMap::new(),
            operator_names: HashMap::new(),
        }
    }

    pub fn literals(&self) -> &LiteralTable {
        &self.literals
    }

    // ---------------------------------------------------------------------
    // Literals
    // ---------------------------------------------------------------------

    pub fn identifier(&self, spelling: impl AsRef<str>) -> Identifier {
        self.literals.identifier(spelling)
    }

    pub fn string_literal(&self, spelling: impl AsRef<str>) -> StringLiteral {
        self.literals.string_literal(spelling)
    }

    pub fn numeric_literal(&self, spelling: impl AsRef<str>) -> NumericLiteral {
        self.literals.numeric_literal(spelling)
    }

    pub fn spelling(&self, id: Identifier) -> String {
        self.literals.spelling(id)
    }

    // ---------------------------------------------------------------------
    // Names
    // ---------------------------------------------------------------------

    fn push_name(&mut self, name: Name) -> NameId {
        let id = NameId(self.names.len() as u32);
        self.names.push(name);
        id
    }

    #[inline]
    pub fn name(&self, id: NameId) -> &Name {
        &self.names[id.index()]
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// The simple name for `identifier`. Repeated requests share one id.
    pub fn identifier_name(&mut self, identifier: Identifier) -> NameId {
        if let Some(id) = self.identifier_names.get(&identifier) {
            return *id;
        }
        let id = self.push_name(Name::Identifier(identifier));
        self.identifier_names.insert(identifier, id);
        id
    }

    pub fn name_from_str(&mut self, spelling: &str) -> NameId {
        let identifier = self.identifier(spelling);
        self.identifier_name(identifier)
    }

    pub fn anonymous_name_id(&mut self, class_token: u32) -> NameId {
        self.push_name(Name::Anonymous { class_token })
    }

    pub fn template_name_id(
        &mut self,
        identifier: Identifier,
        is_specialization: bool,
        arguments: Vec<TemplateArgument>,
    ) -> NameId {
        self.push_name(Name::TemplateId {
            identifier,
            arguments,
            is_specialization,
        })
    }

    /// Complete the argument list of a template-id after allocation. This is
    /// the only mutation names allow, and the way a template-id can end up
    /// referring to itself.
    pub fn set_template_arguments(&mut self, name: NameId, new_arguments: Vec<TemplateArgument>) {
        if let Name::TemplateId { arguments, .. } = &mut self.names[name.index()] {
            *arguments = new_arguments;
        }
    }

    pub fn destructor_name_id(&mut self, name: NameId) -> NameId {
        self.push_name(Name::Destructor(name))
    }

    pub fn operator_name_id(&mut self, kind: OperatorKind) -> NameId {
        if let Some(id) = self.operator_names.get(&kind) {
            return *id;
        }
        let id = self.push_name(Name::Operator(kind));
        self.operator_names.insert(kind, id);
        id
    }

    pub fn conversion_name_id(&mut self, ty: FullySpecifiedType) -> NameId {
        self.push_name(Name::Conversion(ty))
    }

    pub fn qualified_name_id(&mut self, base: Option<NameId>, name: NameId) -> NameId {
        self.push_name(Name::Qualified { base, name })
    }

    pub fn selector_name_id(&mut self, names: &[NameId], has_arguments: bool) -> NameId {
        self.push_name(Name::Selector {
            names: SmallVec::from_slice(names),
            has_arguments,
        })
    }

    /// The identifier a name is ultimately spelled with.
    pub fn name_identifier(&self, name: NameId) -> Option<Identifier> {
        match self.name(name) {
            Name::Identifier(id) => Some(*id),
            Name::TemplateId { identifier, .. } => Some(*identifier),
            Name::Destructor(inner) => self.name_identifier(*inner),
            Name::Qualified { name, .. } => self.name_identifier(*name),
            Name::Selector { names, .. } => names.first().and_then(|n| self.name_identifier(*n)),
            Name::Anonymous { .. } | Name::Operator(_) | Name::Conversion(_) => None,
        }
    }

    /// Trailing component of a qualified name; the name itself otherwise.
    pub fn unqualified_name(&self, name: NameId) -> NameId {
        match self.name(name) {
            Name::Qualified { name, .. } => self.unqualified_name(*name),
            _ => name,
        }
    }

    /// Spelling of the identifier of `name`, empty for operators and
    /// anonymous names.
    pub fn name_spelling(&self, name: NameId) -> String {
        self.name_identifier(name)
            .map(|id| self.spelling(id))
            .unwrap_or_default()
    }

    pub fn match_name<M: Matcher + ?Sized>(&self, a: NameId, b: NameId, matcher: &mut M) -> bool {
        matcher.match_name(self, a, b)
    }

    pub fn match_opt_name<M: Matcher + ?Sized>(
        &self,
        a: Option<NameId>,
        b: Option<NameId>,
        matcher: &mut M,
    ) -> bool {
        matcher.match_opt_name(self, a, b)
    }

    // ---------------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------------

    fn push_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    #[inline]
    pub fn ty(&self, id: TypeId) -> &Type {
        self.types.get(id.index()).unwrap_or(Type::undefined())
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn undefined_type(&self) -> TypeId {
        TypeId::UNDEFINED
    }

    pub fn void_type(&self) -> TypeId {
        TypeId(VOID_SLOT)
    }

    pub fn integer_type(&self, kind: IntegerKind) -> TypeId {
        let slot = INTEGER_KINDS.iter().position(|k| *k == kind).unwrap_or(0) as u32;
        TypeId(FIRST_INTEGER_SLOT + slot)
    }

    pub fn float_type(&self, kind: FloatKind) -> TypeId {
        let slot = FLOAT_KINDS.iter().position(|k| *k == kind).unwrap_or(0) as u32;
        TypeId(FIRST_FLOAT_SLOT + slot)
    }

    pub fn pointer_type(&mut self, element: FullySpecifiedType) -> TypeId {
        self.push_type(Type::Pointer(element))
    }

    pub fn pointer_to_member_type(&mut self, member_name: NameId, element: FullySpecifiedType) -> TypeId {
        self.push_type(Type::PointerToMember { member_name, element })
    }

    pub fn reference_type(&mut self, element: FullySpecifiedType, rvalue: bool) -> TypeId {
        self.push_type(Type::Reference { element, rvalue })
    }

    pub fn array_type(&mut self, element: FullySpecifiedType, size: u32) -> TypeId {
        self.push_type(Type::Array { element, size })
    }

    pub fn named_type(&mut self, name: NameId) -> TypeId {
        self.push_type(Type::Named(name))
    }

    pub fn match_type<M: Matcher + ?Sized>(&self, a: TypeId, b: TypeId, matcher: &mut M) -> bool {
        matcher.match_type(self, a, b)
    }

    fn type_symbol(&self, ty: TypeId) -> Option<&Symbol> {
        self.ty(ty).as_user_defined().map(|s| self.symbol(s))
    }

    pub fn as_function_type(&self, ty: TypeId) -> Option<&FunctionSymbol> {
        self.type_symbol(ty).and_then(Symbol::as_function)
    }

    pub fn as_class_type(&self, ty: TypeId) -> Option<&ClassSymbol> {
        self.type_symbol(ty).and_then(Symbol::as_class)
    }

    pub fn as_enum_type(&self, ty: TypeId) -> Option<&EnumSymbol> {
        self.type_symbol(ty).and_then(Symbol::as_enum)
    }

    pub fn as_namespace_type(&self, ty: TypeId) -> Option<&NamespaceSymbol> {
        self.type_symbol(ty).and_then(Symbol::as_namespace)
    }

    pub fn as_template_type(&self, ty: TypeId) -> Option<&ScopeData> {
        self.type_symbol(ty).and_then(Symbol::as_template)
    }

    pub fn as_forward_class_declaration_type(&self, ty: TypeId) -> Option<SymbolId> {
        self.type_symbol(ty)
            .filter(|s| s.is_forward_class_declaration())
            .map(Symbol::id)
    }

    pub fn as_objc_class_type(&self, ty: TypeId) -> Option<&ObjCClassSymbol> {
        self.type_symbol(ty).and_then(Symbol::as_objc_class)
    }

    pub fn as_objc_protocol_type(&self, ty: TypeId) -> Option<&ObjCProtocolSymbol> {
        self.type_symbol(ty).and_then(Symbol::as_objc_protocol)
    }

    pub fn as_objc_method_type(&self, ty: TypeId) -> Option<&ObjCMethodSymbol> {
        self.type_symbol(ty).and_then(Symbol::as_objc_method)
    }

    /// Symbol behind a `UserDefined` type.
    pub fn type_symbol_id(&self, ty: TypeId) -> Option<SymbolId> {
        self.ty(ty).as_user_defined()
    }

    // ---------------------------------------------------------------------
    // Symbols
    // ---------------------------------------------------------------------

    fn push_symbol(&mut self, location: SourceLocation, name: Option<NameId>, kind: SymbolKind) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        let is_type = kind.is_type();
        trace!(symbol = %id, kind = kind.kind_name(), "new symbol");
        self.symbols.push(Symbol::new(id, location, name, kind));
        if is_type {
            let self_type = self.push_type(Type::UserDefined(id));
            self.symbols[id.index()].self_type = self_type;
        }
        id
    }

    /// Allocate a symbol with an arbitrary payload.
    pub fn new_symbol(&mut self, location: SourceLocation, name: Option<NameId>, kind: SymbolKind) -> SymbolId {
        self.push_symbol(location, name, kind)
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    #[inline]
    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn new_declaration(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::Declaration(DeclarationSymbol::default()))
    }

    pub fn new_enumerator_declaration(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::EnumeratorDeclaration(EnumeratorSymbol::default()))
    }

    pub fn new_argument(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::Argument(ArgumentSymbol::default()))
    }

    pub fn new_typename_argument(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::TypenameArgument(TypenameArgumentSymbol::default()))
    }

    pub fn new_block(&mut self, location: SourceLocation) -> SymbolId {
        self.push_symbol(location, None, SymbolKind::Block(ScopeData::default()))
    }

    pub fn new_class(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::Class(ClassSymbol::default()))
    }

    pub fn new_base_class(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::BaseClass(BaseClassSymbol::default()))
    }

    pub fn new_enum(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::Enum(EnumSymbol::default()))
    }

    pub fn new_function(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::Function(FunctionSymbol::default()))
    }

    pub fn new_namespace(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::Namespace(NamespaceSymbol::default()))
    }

    pub fn new_namespace_alias(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::NamespaceAlias(NamespaceAliasSymbol::default()))
    }

    pub fn new_using_namespace_directive(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::UsingNamespaceDirective)
    }

    pub fn new_using_declaration(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::UsingDeclaration)
    }

    pub fn new_template(&mut self, location: SourceLocation) -> SymbolId {
        self.push_symbol(location, None, SymbolKind::Template(ScopeData::default()))
    }

    pub fn new_forward_class_declaration(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::ForwardClassDeclaration)
    }

    pub fn new_qt_property_declaration(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::QtPropertyDeclaration(QtPropertySymbol::default()))
    }

    pub fn new_qt_enum(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::QtEnum)
    }

    pub fn new_objc_base_class(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::ObjCBaseClass)
    }

    pub fn new_objc_base_protocol(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::ObjCBaseProtocol)
    }

    pub fn new_objc_class(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::ObjCClass(ObjCClassSymbol::default()))
    }

    pub fn new_objc_forward_class_declaration(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::ObjCForwardClassDeclaration)
    }

    pub fn new_objc_protocol(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::ObjCProtocol(ObjCProtocolSymbol::default()))
    }

    pub fn new_objc_forward_protocol_declaration(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::ObjCForwardProtocolDeclaration)
    }

    pub fn new_objc_method(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::ObjCMethod(ObjCMethodSymbol::default()))
    }

    pub fn new_objc_property_declaration(&mut self, location: SourceLocation, name: Option<NameId>) -> SymbolId {
        self.push_symbol(location, name, SymbolKind::ObjCPropertyDeclaration(ObjCPropertySymbol::default()))
    }

    /// The `type()` projection of a symbol: the stored type of value-like
    /// symbols, the symbol itself for symbol-as-type kinds, the undefined
    /// sentinel otherwise.
    pub fn symbol_type(&self, id: SymbolId) -> FullySpecifiedType {
        let sym = self.symbol(id);
        if let Some(ty) = sym.stored_type() {
            return ty;
        }
        FullySpecifiedType::new(sym.self_type)
    }

    /// Overwrite the stored type of a value-like symbol. No effect on other kinds.
    pub fn set_symbol_type(&mut self, id: SymbolId, ty: FullySpecifiedType) {
        match &mut self.symbol_mut(id).kind {
            SymbolKind::Declaration(d) => d.ty = ty,
            SymbolKind::EnumeratorDeclaration(e) => e.ty = ty,
            SymbolKind::Argument(a) => a.ty = ty,
            SymbolKind::TypenameArgument(t) => t.ty = ty,
            SymbolKind::BaseClass(b) => b.ty = ty,
            SymbolKind::QtPropertyDeclaration(p) => p.ty = ty,
            SymbolKind::ObjCPropertyDeclaration(p) => p.ty = ty,
            _ => {}
        }
    }

    // ---------------------------------------------------------------------
    // Scopes
    // ---------------------------------------------------------------------

    /// Append `member` to `scope`. No effect if `scope` is not a scope.
    pub fn add_member(&mut self, scope: SymbolId, member: SymbolId) {
        let Some(data) = self.symbols[scope.index()].kind.scope_mut() else {
            return;
        };
        let index = data.members.len();
        data.members.push(member);
        let sym = &mut self.symbols[member.index()];
        sym.enclosing_scope = Some(scope);
        sym.index = Some(index);
    }

    /// Insert `member` at `at` (clamped to the member count), shifting later
    /// members.
    pub fn insert_member(&mut self, scope: SymbolId, at: usize, member: SymbolId) {
        let Some(data) = self.symbols[scope.index()].kind.scope_mut() else {
            return;
        };
        let at = at.min(data.members.len());
        data.members.insert(at, member);
        let members: Vec<SymbolId> = data.members[at..].to_vec();
        self.symbols[member.index()].enclosing_scope = Some(scope);
        for (offset, m) in members.into_iter().enumerate() {
            self.symbols[m.index()].index = Some(at + offset);
        }
    }

    /// Name a symbol after the fact. The binder creates function symbols
    /// while resolving the declarator and names them once the declarator-id
    /// is known.
    pub fn set_symbol_name(&mut self, symbol: SymbolId, name: Option<NameId>) {
        self.symbols[symbol.index()].name = name;
    }

    /// Attach `symbol` to `scope` without making it a member. Functions
    /// named through a declaration and ObjC base references live this way.
    pub fn set_enclosing_scope(&mut self, symbol: SymbolId, scope: SymbolId) {
        self.symbols[symbol.index()].enclosing_scope = Some(scope);
    }

    pub fn set_scope_range(&mut self, scope: SymbolId, start_offset: u32, end_offset: u32) {
        if let Some(data) = self.symbols[scope.index()].kind.scope_mut() {
            data.start_offset = start_offset;
            data.end_offset = end_offset;
        }
    }

    pub fn members(&self, scope: SymbolId) -> &[SymbolId] {
        self.symbol(scope).members()
    }

    /// First member whose identifier is `identifier`. Full lookup (using
    /// directives, base classes) belongs to the consumers of the model.
    pub fn find_member(&self, scope: SymbolId, identifier: Identifier) -> Option<SymbolId> {
        self.members(scope).iter().copied().find(|m| {
            self.symbol(*m)
                .name()
                .and_then(|n| self.name_identifier(n))
                .is_some_and(|id| id.equal_to(identifier))
        })
    }

    /// Walk the enclosing scopes outward from `scope` (inclusive) looking for
    /// `identifier`.
    pub fn lookup(&self, scope: SymbolId, identifier: Identifier) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(found) = self.find_member(s, identifier) {
                return Some(found);
            }
            if let Some(class) = self.symbol(s).as_class() {
                for base in class.base_classes() {
                    let base_ty = self.symbol_type(*base).ty();
                    if let Some(base_sym) = self.type_symbol_id(base_ty)
                        && let Some(found) = self.find_member(base_sym, identifier)
                    {
                        return Some(found);
                    }
                }
            }
            current = self.symbol(s).enclosing_scope();
        }
        None
    }

    /// Nearest enclosing class, namespace, function... matching `pred`,
    /// starting at `scope` itself.
    pub fn enclosing<P>(&self, scope: SymbolId, pred: P) -> Option<SymbolId>
    where
        P: Fn(&Symbol) -> bool,
    {
        let mut current = Some(scope);
        while let Some(s) = current {
            if pred(self.symbol(s)) {
                return Some(s);
            }
            current = self.symbol(s).enclosing_scope();
        }
        None
    }

    pub fn add_base_class(&mut self, class: SymbolId, base: SymbolId) {
        if let Some(c) = self.symbols[class.index()].as_class_mut() {
            c.base_classes.push(base);
            self.symbols[base.index()].enclosing_scope = Some(class);
        }
    }

    pub fn add_objc_protocol(&mut self, owner: SymbolId, protocol: SymbolId) {
        match &mut self.symbols[owner.index()].kind {
            SymbolKind::ObjCClass(c) => c.protocols.push(protocol),
            SymbolKind::ObjCProtocol(p) => p.protocols.push(protocol),
            _ => return,
        }
        self.symbols[protocol.index()].enclosing_scope = Some(owner);
    }

    // ---------------------------------------------------------------------
    // Functions
    // ---------------------------------------------------------------------

    /// Number of declared parameters. `f(void)` has none.
    pub fn argument_count(&self, function: SymbolId) -> usize {
        let members = self.members(function);
        if let Some(first) = members.first() {
            let sym = self.symbol(*first);
            if sym.is_argument() && sym.name().is_none() && self.ty(self.symbol_type(*first).ty()).is_void() {
                return 0;
            }
        }
        members.iter().filter(|m| self.symbol(**m).is_argument()).count()
    }

    pub fn argument_at(&self, function: SymbolId, index: usize) -> Option<SymbolId> {
        if index >= self.argument_count(function) {
            return None;
        }
        self.members(function)
            .iter()
            .copied()
            .filter(|m| self.symbol(*m).is_argument())
            .nth(index)
    }

    /// Index of the first parameter with a default argument, or the
    /// parameter count.
    pub fn minimum_argument_count(&self, function: SymbolId) -> usize {
        let argc = self.argument_count(function);
        (0..argc)
            .find(|i| {
                self.argument_at(function, *i)
                    .and_then(|a| self.symbol(a).as_argument())
                    .is_some_and(ArgumentSymbol::has_initializer)
            })
            .unwrap_or(argc)
    }

    pub fn is_variadic(&self, function: SymbolId) -> bool {
        match &self.symbol(function).kind {
            SymbolKind::Function(f) => f.is_variadic(),
            SymbolKind::ObjCMethod(m) => m.is_variadic,
            _ => false,
        }
    }

    /// Could a call with `actual` arguments bind to this function?
    pub fn maybe_valid_prototype(&self, function: SymbolId, actual: usize) -> bool {
        let argc = self.argument_count(function);
        actual >= self.minimum_argument_count(function) && (actual <= argc || self.is_variadic(function))
    }

    /// Signature comparison for overriding and redeclaration. The return
    /// type takes no part.
    pub fn is_signature_equal_to<M: Matcher + ?Sized>(
        &self,
        function: SymbolId,
        other: SymbolId,
        matcher: &mut M,
    ) -> bool {
        let (Some(l), Some(r)) = (self.symbol(function).as_function(), self.symbol(other).as_function())
        else {
            return false;
        };
        if function == other {
            return true;
        }
        if l.is_const() != r.is_const()
            || l.is_volatile() != r.is_volatile()
            || l.is_variadic() != r.is_variadic()
            || l.ref_qualifier != r.ref_qualifier
        {
            return false;
        }

        let lname = self.symbol(function).name().map(|n| self.unqualified_name(n));
        let rname = self.symbol(other).name().map(|n| self.unqualified_name(n));
        if lname != rname && !matcher.match_opt_name(self, lname, rname) {
            return false;
        }

        let argc = self.argument_count(function);
        if argc != self.argument_count(other) {
            return false;
        }
        (0..argc).all(|i| match (self.argument_at(function, i), self.argument_at(other, i)) {
            (Some(a), Some(b)) => self.symbol_type(a).match_with(&self.symbol_type(b), matcher, self),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::DefaultMatcher;

    fn function_with_args(ctl: &mut Control, name: &str, ret: TypeId, args: &[(TypeId, bool)]) -> SymbolId {
        let fname = ctl.name_from_str(name);
        let f = ctl.new_function(SourceLocation::default(), Some(fname));
        ctl.symbol_mut(f).as_function_mut().unwrap().return_type = FullySpecifiedType::new(ret);
        for (i, (ty, default)) in args.iter().enumerate() {
            let aname = ctl.name_from_str(&format!("a{i}"));
            let arg = ctl.new_argument(SourceLocation::default(), Some(aname));
            ctl.set_symbol_type(arg, FullySpecifiedType::new(*ty));
            if *default {
                let init = ctl.string_literal("0");
                if let SymbolKind::Argument(a) = &mut ctl.symbol_mut(arg).kind {
                    a.initializer = Some(init);
                }
            }
            ctl.add_member(f, arg);
        }
        f
    }

    #[test]
    fn primitive_types_are_cached() {
        let ctl = Control::new();
        assert_eq!(ctl.integer_type(IntegerKind::Int), ctl.integer_type(IntegerKind::Int));
        assert_ne!(ctl.integer_type(IntegerKind::Int), ctl.integer_type(IntegerKind::Long));
        assert_eq!(ctl.ty(ctl.float_type(FloatKind::Double)), &Type::Float(FloatKind::Double));
        assert!(ctl.ty(ctl.void_type()).is_void());
        assert!(ctl.ty(TypeId::UNDEFINED).is_undefined());
    }

    #[test]
    fn compound_types_are_fresh() {
        let mut ctl = Control::new();
        let int = FullySpecifiedType::new(ctl.integer_type(IntegerKind::Int));
        let p1 = ctl.pointer_type(int);
        let p2 = ctl.pointer_type(int);
        assert_ne!(p1, p2);
        assert!(ctl.match_type(p1, p2, &mut DefaultMatcher));
    }

    #[test]
    fn identifier_names_are_shared() {
        let mut ctl = Control::new();
        let a = ctl.name_from_str("x");
        let b = ctl.name_from_str("x");
        assert_eq!(a, b);
        let plus = ctl.operator_name_id(OperatorKind::Plus);
        assert_eq!(plus, ctl.operator_name_id(OperatorKind::Plus));
    }

    #[test]
    fn scope_members_keep_order() {
        let mut ctl = Control::new();
        let ns = ctl.new_namespace(SourceLocation::default(), None);
        let a = ctl.new_declaration(SourceLocation::default(), None);
        let b = ctl.new_declaration(SourceLocation::default(), None);
        let c = ctl.new_declaration(SourceLocation::default(), None);
        ctl.add_member(ns, a);
        ctl.add_member(ns, c);
        ctl.insert_member(ns, 1, b);
        assert_eq!(ctl.members(ns), &[a, b, c]);
        assert_eq!(ctl.symbol(c).index(), Some(2));
        assert_eq!(ctl.symbol(b).enclosing_scope(), Some(ns));
    }

    #[test]
    fn add_member_ignores_non_scopes() {
        let mut ctl = Control::new();
        let decl = ctl.new_declaration(SourceLocation::default(), None);
        let other = ctl.new_declaration(SourceLocation::default(), None);
        ctl.add_member(decl, other);
        assert_eq!(ctl.symbol(other).enclosing_scope(), None);
    }

    #[test]
    fn symbol_as_type_projection() {
        let mut ctl = Control::new();
        let class = ctl.new_class(SourceLocation::default(), None);
        let ty = ctl.symbol_type(class);
        assert!(ty.is_valid());
        assert_eq!(ctl.type_symbol_id(ty.ty()), Some(class));
        assert!(ctl.as_class_type(ty.ty()).is_some());
        assert!(ctl.as_function_type(ty.ty()).is_none());

        let block = ctl.new_block(SourceLocation::default());
        assert!(!ctl.symbol_type(block).is_valid());
    }

    #[test]
    fn prototype_compatibility() {
        let mut ctl = Control::new();
        let int = ctl.integer_type(IntegerKind::Int);
        let f = function_with_args(&mut ctl, "f", int, &[(int, false), (int, true), (int, true)]);
        assert_eq!(ctl.argument_count(f), 3);
        assert_eq!(ctl.minimum_argument_count(f), 1);
        assert!(!ctl.maybe_valid_prototype(f, 0));
        assert!(ctl.maybe_valid_prototype(f, 1));
        assert!(ctl.maybe_valid_prototype(f, 3));
        assert!(!ctl.maybe_valid_prototype(f, 4));

        ctl.symbol_mut(f).as_function_mut().unwrap().flags |= FunctionFlags::VARIADIC;
        assert!(ctl.maybe_valid_prototype(f, 10));
        assert!(!ctl.maybe_valid_prototype(f, 0));
    }

    #[test]
    fn void_parameter_list_is_empty() {
        let mut ctl = Control::new();
        let void = ctl.void_type();
        let f = ctl.new_function(SourceLocation::default(), None);
        let arg = ctl.new_argument(SourceLocation::default(), None);
        ctl.set_symbol_type(arg, FullySpecifiedType::new(void));
        ctl.add_member(f, arg);
        assert_eq!(ctl.argument_count(f), 0);
        assert_eq!(ctl.argument_at(f, 0), None);
    }

    #[test]
    fn signature_equality_ignores_return_type() {
        let mut ctl = Control::new();
        let int = ctl.integer_type(IntegerKind::Int);
        let double = ctl.float_type(FloatKind::Double);
        let void = ctl.void_type();
        let a = function_with_args(&mut ctl, "f", int, &[(int, false)]);
        let b = function_with_args(&mut ctl, "f", void, &[(int, false)]);
        let c = function_with_args(&mut ctl, "f", int, &[(double, false)]);
        let d = function_with_args(&mut ctl, "g", int, &[(int, false)]);
        assert_ne!(a, b);
        assert!(ctl.is_signature_equal_to(a, b, &mut DefaultMatcher));
        assert!(!ctl.is_signature_equal_to(a, c, &mut DefaultMatcher));
        assert!(!ctl.is_signature_equal_to(a, d, &mut DefaultMatcher));

        ctl.symbol_mut(b).as_function_mut().unwrap().flags |= FunctionFlags::CONST;
        assert!(!ctl.is_signature_equal_to(a, b, &mut DefaultMatcher));
    }

    #[test]
    fn lookup_walks_enclosing_scopes() {
        let mut ctl = Control::new();
        let global = ctl.new_namespace(SourceLocation::default(), None);
        let x = ctl.name_from_str("x");
        let decl = ctl.new_declaration(SourceLocation::default(), Some(x));
        ctl.add_member(global, decl);
        let block = ctl.new_block(SourceLocation::default());
        ctl.add_member(global, block);
        let id = ctl.identifier("x");
        assert_eq!(ctl.lookup(block, id), Some(decl));
        assert_eq!(ctl.find_member(block, id), None);
        assert_eq!(ctl.enclosing(block, Symbol::is_namespace), Some(global));
    }
}
