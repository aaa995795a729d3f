//! Pretty printing of names, types and symbols.
//!
//! Types are printed in declarator syntax around an optional declarator
//! name, so `int *p[3]` and `int (*p)[3]` come out the way they are written.

use crate::control::Control;
use crate::fully_specified::FullySpecifiedType;
use crate::literals::Identifier;
use crate::name::{NameId, OperatorKind, TemplateArgument};
use crate::symbol::{SymbolId, SymbolKind};
use crate::types::Type;
use crate::visit::{NameVisitor, accept_name};

#[derive(Debug, Clone)]
pub struct Overview {
    pub show_argument_names: bool,
    pub show_default_arguments: bool,
}

impl Default for Overview {
    fn default() -> Self {
        Self {
            show_argument_names: true,
            show_default_arguments: false,
        }
    }
}

fn join(head: String, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (false, true) => head,
        (false, false) => format!("{head} {tail}"),
    }
}

struct NamePrinter<'a> {
    ctl: &'a Control,
    overview: &'a Overview,
    out: String,
}

impl NameVisitor for NamePrinter<'_> {
    fn visit_identifier(&mut self, identifier: Identifier) {
        self.out.push_str(&self.ctl.spelling(identifier));
    }

    fn visit_anonymous_name_id(&mut self, _class_token: u32) {
        self.out.push_str("<anonymous>");
    }

    fn visit_template_name_id(&mut self, identifier: Identifier, arguments: &[TemplateArgument], _is_specialization: bool) {
        self.out.push_str(&self.ctl.spelling(identifier));
        self.out.push('<');
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            match arg.numeric_literal {
                Some(lit) => self.out.push_str(&self.ctl.literals().number(lit)),
                None => self.out.push_str(&self.overview.pretty_type(self.ctl, &arg.ty, "")),
            }
        }
        self.out.push('>');
    }

    fn visit_destructor_name_id(&mut self, name: NameId) {
        self.out.push('~');
        self.out.push_str(&self.overview.pretty_name(self.ctl, Some(name)));
    }

    fn visit_operator_name_id(&mut self, kind: OperatorKind) {
        self.out.push_str("operator");
        if matches!(
            kind,
            OperatorKind::New | OperatorKind::Delete | OperatorKind::NewArray | OperatorKind::DeleteArray
        ) {
            self.out.push(' ');
        }
        let spelling: &'static str = kind.into();
        self.out.push_str(spelling);
    }

    fn visit_conversion_name_id(&mut self, ty: FullySpecifiedType) {
        self.out.push_str("operator ");
        self.out.push_str(&self.overview.pretty_type(self.ctl, &ty, ""));
    }

    fn visit_qualified_name_id(&mut self, base: Option<NameId>, name: NameId) {
        if let Some(base) = base {
            self.out.push_str(&self.overview.pretty_name(self.ctl, Some(base)));
        }
        self.out.push_str("::");
        self.out.push_str(&self.overview.pretty_name(self.ctl, Some(name)));
    }

    fn visit_selector_name_id(&mut self, names: &[NameId], has_arguments: bool) {
        for name in names {
            self.out.push_str(&self.overview.pretty_name(self.ctl, Some(*name)));
            if has_arguments {
                self.out.push(':');
            }
        }
    }
}

impl Overview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty_name(&self, ctl: &Control, name: Option<NameId>) -> String {
        let Some(name) = name else {
            return String::new();
        };
        let mut printer = NamePrinter {
            ctl,
            overview: self,
            out: String::new(),
        };
        accept_name(ctl.name(name), &mut printer);
        printer.out
    }

    /// Print `ty` around `declarator` (which may be empty).
    pub fn pretty_type(&self, ctl: &Control, ty: &FullySpecifiedType, declarator: &str) -> String {
        self.print(ctl, *ty, declarator.to_string())
    }

    fn qualifiers(ty: &FullySpecifiedType) -> String {
        let mut out = String::new();
        if ty.is_const() {
            out.push_str("const");
        }
        if ty.is_volatile() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str("volatile");
        }
        out
    }

    fn simple(ty: &FullySpecifiedType, spelling: &str, inner: &str) -> String {
        let mut head = Self::qualifiers(ty);
        if ty.is_unsigned() {
            head = join(head, "unsigned");
        } else if ty.is_signed() {
            head = join(head, "signed");
        }
        join(join(head, spelling), inner)
    }

    fn needs_parens(ctl: &Control, element: &FullySpecifiedType) -> bool {
        match ctl.ty(element.ty()) {
            Type::Array { .. } => true,
            Type::UserDefined(sym) => ctl.symbol(*sym).is_function(),
            _ => false,
        }
    }

    fn wrap_ptr_operator(ctl: &Control, ty: &FullySpecifiedType, op: String, element: &FullySpecifiedType, inner: String) -> String {
        let cv = Self::qualifiers(ty);
        let mut s = op;
        s.push_str(&cv);
        if !inner.is_empty() {
            if !cv.is_empty() {
                s.push(' ');
            }
            s.push_str(&inner);
        }
        if Self::needs_parens(ctl, element) {
            s = format!("({s})");
        }
        s
    }

    fn print(&self, ctl: &Control, ty: FullySpecifiedType, inner: String) -> String {
        match ctl.ty(ty.ty()) {
            Type::Undefined => Self::simple(&ty, "", &inner),
            Type::Void => Self::simple(&ty, "void", &inner),
            Type::Integer(kind) => Self::simple(&ty, &kind.to_string(), &inner),
            Type::Float(kind) => Self::simple(&ty, &kind.to_string(), &inner),
            Type::Named(name) => Self::simple(&ty, &self.pretty_name(ctl, Some(*name)), &inner),
            Type::Pointer(element) => {
                let element = *element;
                let s = Self::wrap_ptr_operator(ctl, &ty, "*".to_string(), &element, inner);
                self.print(ctl, element, s)
            }
            Type::Reference { element, rvalue } => {
                let element = *element;
                let op = if *rvalue { "&&" } else { "&" };
                let s = Self::wrap_ptr_operator(ctl, &ty, op.to_string(), &element, inner);
                self.print(ctl, element, s)
            }
            Type::PointerToMember { member_name, element } => {
                let element = *element;
                let op = format!("{}::*", self.pretty_name(ctl, Some(*member_name)));
                let s = Self::wrap_ptr_operator(ctl, &ty, op, &element, inner);
                self.print(ctl, element, s)
            }
            Type::Array { element, size } => {
                let element = *element;
                let dims = if *size == 0 { "[]".to_string() } else { format!("[{size}]") };
                self.print(ctl, element, format!("{inner}{dims}"))
            }
            Type::UserDefined(sym) => self.print_symbol_type(ctl, &ty, *sym, inner),
        }
    }

    fn print_symbol_type(&self, ctl: &Control, ty: &FullySpecifiedType, sym: SymbolId, inner: String) -> String {
        let symbol = ctl.symbol(sym);
        let Some(function) = symbol.as_function() else {
            let name = match symbol.name() {
                Some(n) => self.pretty_name(ctl, Some(n)),
                None => "<anonymous>".to_string(),
            };
            return Self::simple(ty, &name, &inner);
        };

        let mut params = Vec::new();
        for i in 0..ctl.argument_count(sym) {
            let Some(arg) = ctl.argument_at(sym, i) else {
                continue;
            };
            let arg_sym = ctl.symbol(arg);
            let declarator = if self.show_argument_names {
                self.pretty_name(ctl, arg_sym.name())
            } else {
                String::new()
            };
            let mut text = self.print(ctl, ctl.symbol_type(arg), declarator);
            if self.show_default_arguments
                && let Some(init) = arg_sym.as_argument().and_then(|a| a.initializer)
            {
                text.push_str(" = ");
                text.push_str(&ctl.literals().string(init));
            }
            params.push(text);
        }
        if function.is_variadic() {
            params.push("...".to_string());
        }

        let mut suffix = format!("{inner}({})", params.join(", "));
        if function.is_const() {
            suffix.push_str(" const");
        }
        if function.is_volatile() {
            suffix.push_str(" volatile");
        }
        match function.ref_qualifier {
            crate::symbol::RefQualifier::LValue => suffix.push_str(" &"),
            crate::symbol::RefQualifier::RValue => suffix.push_str(" &&"),
            crate::symbol::RefQualifier::None => {}
        }
        if function.has_return_type() {
            self.print(ctl, function.return_type, suffix)
        } else {
            suffix
        }
    }

    /// One-line description of a symbol, as shown by symbol dumps.
    pub fn symbol_signature(&self, ctl: &Control, sym: SymbolId) -> String {
        let symbol = ctl.symbol(sym);
        let name = self.pretty_name(ctl, symbol.name());
        match &symbol.kind {
            SymbolKind::Class(class) => join(class.key.to_string(), &name),
            SymbolKind::Enum(e) if e.is_scoped => join("enum class".to_string(), &name),
            SymbolKind::Enum(_) => join("enum".to_string(), &name),
            SymbolKind::Namespace(_) => join("namespace".to_string(), &name),
            SymbolKind::NamespaceAlias(alias) => format!(
                "namespace {} = {}",
                name,
                self.pretty_name(ctl, alias.namespace_name)
            ),
            SymbolKind::UsingNamespaceDirective => format!("using namespace {name}"),
            SymbolKind::UsingDeclaration => format!("using {name}"),
            SymbolKind::ForwardClassDeclaration => format!("class {name};"),
            SymbolKind::Template(_) => "template".to_string(),
            SymbolKind::Block(_) => "{...}".to_string(),
            SymbolKind::TypenameArgument(t) if t.is_class_declarator => join("class".to_string(), &name),
            SymbolKind::TypenameArgument(_) => join("typename".to_string(), &name),
            SymbolKind::QtEnum => format!("Q_ENUM({name})"),
            SymbolKind::QtPropertyDeclaration(p) => {
                format!("Q_PROPERTY({})", self.pretty_type(ctl, &p.ty, &name))
            }
            SymbolKind::ObjCClass(c) if c.is_interface => format!("@interface {name}"),
            SymbolKind::ObjCClass(_) => format!("@implementation {name}"),
            SymbolKind::ObjCProtocol(_) => format!("@protocol {name}"),
            SymbolKind::ObjCForwardClassDeclaration => format!("@class {name};"),
            SymbolKind::ObjCForwardProtocolDeclaration => format!("@protocol {name};"),
            SymbolKind::ObjCMethod(m) => {
                let sign = if m.is_class_method { '+' } else { '-' };
                format!("{sign}({}){name}", self.pretty_type(ctl, &m.return_type, ""))
            }
            SymbolKind::ObjCBaseClass | SymbolKind::ObjCBaseProtocol => name,
            SymbolKind::Function(_)
            | SymbolKind::Declaration(_)
            | SymbolKind::EnumeratorDeclaration(_)
            | SymbolKind::Argument(_)
            | SymbolKind::BaseClass(_)
            | SymbolKind::ObjCPropertyDeclaration(_) => {
                self.pretty_type(ctl, &ctl.symbol_type(sym), &name)
            }
        }
    }
}
