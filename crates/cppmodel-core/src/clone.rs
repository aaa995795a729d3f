//! Copying types, names and symbols under a template substitution.
//!
//! [`Cloner`] is how template instantiation produces a specialized symbol:
//! every type reachable from the original is rebuilt, and named types whose
//! name appears in the [`Subst`] are replaced by the bound argument.

use tracing::debug;

use crate::control::Control;
use crate::fully_specified::FullySpecifiedType;
use crate::literals::Identifier;
use crate::matcher::DefaultMatcher;
use crate::name::{NameId, OperatorKind, TemplateArgument};
use crate::symbol::{SymbolId, SymbolKind};
use crate::visit::{NameVisitor, TypeVisitor, accept_name, accept_type};

/// Bindings from template parameter names to argument types, optionally
/// chained to an outer substitution.
#[derive(Debug, Clone, Default)]
pub struct Subst<'p> {
    entries: Vec<(NameId, FullySpecifiedType)>,
    previous: Option<&'p Subst<'p>>,
}

impl<'p> Subst<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A substitution that falls back to `previous` for unbound names.
    pub fn chained(previous: &'p Subst<'p>) -> Self {
        Self {
            entries: Vec::new(),
            previous: Some(previous),
        }
    }

    pub fn bind(&mut self, name: NameId, ty: FullySpecifiedType) {
        self.entries.push((name, ty));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.previous.is_none_or(|p| p.is_empty())
    }

    /// The type bound to `name`, innermost binding first.
    pub fn apply(&self, ctl: &Control, name: NameId) -> Option<FullySpecifiedType> {
        self.entries
            .iter()
            .find(|(param, _)| ctl.match_name(*param, name, &mut DefaultMatcher))
            .map(|(_, ty)| *ty)
            .or_else(|| self.previous.and_then(|p| p.apply(ctl, name)))
    }
}

/// Rebuilds types, names and symbols inside one [`Control`].
pub struct Cloner<'c> {
    ctl: &'c mut Control,
    depth: usize,
}

impl<'c> Cloner<'c> {
    /// Nesting ceiling for self-referential names and types.
    pub const MAX_DEPTH: usize = 100;

    pub fn new(ctl: &'c mut Control) -> Self {
        Self { ctl, depth: 0 }
    }

    pub fn control(&mut self) -> &mut Control {
        self.ctl
    }

    fn enter(&mut self) -> bool {
        if self.depth >= Self::MAX_DEPTH {
            debug!(depth = self.depth, "clone depth ceiling reached");
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    pub fn ty(&mut self, ty: FullySpecifiedType, subst: Option<&Subst<'_>>) -> FullySpecifiedType {
        if !self.enter() {
            return ty;
        }
        let source = self.ctl.ty(ty.ty()).clone();
        let mut rebuild = TypeRebuild {
            cloner: self,
            subst,
            original: ty,
            result: ty,
        };
        accept_type(&source, &mut rebuild);
        let result = rebuild.result;
        self.leave();
        result
    }

    pub fn name(&mut self, name: Option<NameId>, subst: Option<&Subst<'_>>) -> Option<NameId> {
        let name = name?;
        if !self.enter() {
            return Some(name);
        }
        let source = self.ctl.name(name).clone();
        let mut rebuild = NameRebuild {
            cloner: self,
            subst,
            result: name,
        };
        accept_name(&source, &mut rebuild);
        let result = rebuild.result;
        self.leave();
        Some(result)
    }

    /// Deep copy of `original` and its members with `subst` applied. The
    /// copy has no enclosing scope; members are re-parented to it.
    pub fn symbol(&mut self, original: SymbolId, subst: Option<&Subst<'_>>) -> SymbolId {
        let source = self.ctl.symbol(original).clone();
        let name = self.name(source.name(), subst);

        let mut kind = source.kind.clone();
        if let Some(scope) = kind.scope_mut() {
            scope.members.clear();
        }
        let mut base_classes = Vec::new();
        let mut protocols = Vec::new();
        match &mut kind {
            SymbolKind::Declaration(d) => d.ty = self.ty(d.ty, subst),
            SymbolKind::EnumeratorDeclaration(e) => e.ty = self.ty(e.ty, subst),
            SymbolKind::Argument(a) => a.ty = self.ty(a.ty, subst),
            SymbolKind::TypenameArgument(t) => t.ty = self.ty(t.ty, subst),
            SymbolKind::BaseClass(b) => b.ty = self.ty(b.ty, subst),
            SymbolKind::QtPropertyDeclaration(p) => p.ty = self.ty(p.ty, subst),
            SymbolKind::ObjCPropertyDeclaration(p) => {
                p.ty = self.ty(p.ty, subst);
                p.getter_name = self.name(p.getter_name, subst);
                p.setter_name = self.name(p.setter_name, subst);
            }
            SymbolKind::Function(f) => f.return_type = self.ty(f.return_type, subst),
            SymbolKind::ObjCMethod(m) => m.return_type = self.ty(m.return_type, subst),
            SymbolKind::Enum(e) => e.underlying = self.ty(e.underlying, subst),
            SymbolKind::NamespaceAlias(a) => a.namespace_name = self.name(a.namespace_name, subst),
            SymbolKind::Class(c) => base_classes = std::mem::take(&mut c.base_classes),
            SymbolKind::ObjCClass(c) => protocols = std::mem::take(&mut c.protocols),
            SymbolKind::ObjCProtocol(p) => protocols = std::mem::take(&mut p.protocols),
            _ => {}
        }

        let clone = self.ctl.new_symbol(source.location(), name, kind);
        {
            let sym = self.ctl.symbol_mut(clone);
            sym.visibility = source.visibility;
            sym.storage = source.storage;
            sym.flags = source.flags;
        }

        for base in base_classes {
            let copy = self.symbol(base, subst);
            self.ctl.add_base_class(clone, copy);
        }
        for protocol in protocols {
            let copy = self.symbol(protocol, subst);
            self.ctl.add_objc_protocol(clone, copy);
        }
        for member in source.members() {
            let copy = self.symbol(*member, subst);
            self.ctl.add_member(clone, copy);
        }
        clone
    }

    /// Instantiate a template with `arguments` bound positionally to its
    /// parameters. Missing arguments fall back to parameter defaults.
    /// Returns the specialized copy of the templated declaration.
    pub fn instantiate(&mut self, template: SymbolId, arguments: &[FullySpecifiedType]) -> Option<SymbolId> {
        let members = self.ctl.symbol(template).as_template()?.members().to_vec();
        let (declaration, parameters) = members.split_last()?;

        let mut subst = Subst::new();
        for (i, param) in parameters.iter().enumerate() {
            let Some(param_name) = self.ctl.symbol(*param).name() else {
                continue;
            };
            let bound = match arguments.get(i) {
                Some(arg) => *arg,
                None => {
                    let default = self.ctl.symbol_type(*param);
                    if !default.is_valid() {
                        continue;
                    }
                    default
                }
            };
            subst.bind(param_name, bound);
        }
        Some(self.symbol(*declaration, Some(&subst)))
    }
}

struct TypeRebuild<'a, 'c, 's> {
    cloner: &'a mut Cloner<'c>,
    subst: Option<&'s Subst<'s>>,
    original: FullySpecifiedType,
    result: FullySpecifiedType,
}

impl TypeRebuild<'_, '_, '_> {
    fn finish(&mut self, ty: crate::types::TypeId) {
        self.result = FullySpecifiedType::with_specifiers(ty, self.original.specifiers());
    }
}

impl TypeVisitor for TypeRebuild<'_, '_, '_> {
    fn visit_pointer_type(&mut self, element: FullySpecifiedType) {
        let element = self.cloner.ty(element, self.subst);
        let ty = self.cloner.ctl.pointer_type(element);
        self.finish(ty);
    }

    fn visit_pointer_to_member_type(&mut self, member_name: NameId, element: FullySpecifiedType) {
        let member_name = self.cloner.name(Some(member_name), self.subst).unwrap_or(member_name);
        let element = self.cloner.ty(element, self.subst);
        let ty = self.cloner.ctl.pointer_to_member_type(member_name, element);
        self.finish(ty);
    }

    fn visit_reference_type(&mut self, element: FullySpecifiedType, rvalue: bool) {
        let element = self.cloner.ty(element, self.subst);
        let ty = self.cloner.ctl.reference_type(element, rvalue);
        self.finish(ty);
    }

    fn visit_array_type(&mut self, element: FullySpecifiedType, size: u32) {
        let element = self.cloner.ty(element, self.subst);
        let ty = self.cloner.ctl.array_type(element, size);
        self.finish(ty);
    }

    fn visit_named_type(&mut self, name: NameId) {
        if let Some(replacement) = self.subst.and_then(|s| s.apply(self.cloner.ctl, name)) {
            let mut ty = replacement;
            ty.add_specifiers(self.original.specifiers());
            self.result = ty;
            return;
        }
        let name = self.cloner.name(Some(name), self.subst).unwrap_or(name);
        let ty = self.cloner.ctl.named_type(name);
        self.finish(ty);
    }

    fn visit_user_defined_type(&mut self, symbol: SymbolId) {
        if self.cloner.ctl.symbol(symbol).is_function() {
            let copy = self.cloner.symbol(symbol, self.subst);
            let ty = self.cloner.ctl.symbol(copy).self_type();
            self.finish(ty);
        }
    }
}

struct NameRebuild<'a, 'c, 's> {
    cloner: &'a mut Cloner<'c>,
    subst: Option<&'s Subst<'s>>,
    result: NameId,
}

impl NameVisitor for NameRebuild<'_, '_, '_> {
    fn visit_identifier(&mut self, identifier: Identifier) {
        self.result = self.cloner.ctl.identifier_name(identifier);
    }

    fn visit_template_name_id(&mut self, identifier: Identifier, arguments: &[TemplateArgument], is_specialization: bool) {
        let arguments = arguments
            .iter()
            .map(|arg| TemplateArgument {
                ty: self.cloner.ty(arg.ty, self.subst),
                numeric_literal: arg.numeric_literal,
            })
            .collect();
        self.result = self.cloner.ctl.template_name_id(identifier, is_specialization, arguments);
    }

    fn visit_destructor_name_id(&mut self, name: NameId) {
        let inner = self.cloner.name(Some(name), self.subst).unwrap_or(name);
        self.result = self.cloner.ctl.destructor_name_id(inner);
    }

    fn visit_operator_name_id(&mut self, kind: OperatorKind) {
        self.result = self.cloner.ctl.operator_name_id(kind);
    }

    fn visit_conversion_name_id(&mut self, ty: FullySpecifiedType) {
        let ty = self.cloner.ty(ty, self.subst);
        self.result = self.cloner.ctl.conversion_name_id(ty);
    }

    fn visit_qualified_name_id(&mut self, base: Option<NameId>, name: NameId) {
        let base = self.cloner.name(base, self.subst);
        let name = self.cloner.name(Some(name), self.subst).unwrap_or(name);
        self.result = self.cloner.ctl.qualified_name_id(base, name);
    }

    fn visit_selector_name_id(&mut self, names: &[NameId], has_arguments: bool) {
        self.result = self.cloner.ctl.selector_name_id(names, has_arguments);
    }
}
