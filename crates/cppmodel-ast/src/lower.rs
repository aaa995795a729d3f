//! Lowering from the tree-sitter concrete syntax tree into [`crate::ast`].
//!
//! Node kinds follow tree-sitter-cpp. Anything the lowering does not model
//! becomes [`ExpressionKind::Unknown`], an empty statement, or is skipped with
//! a debug event, so that a file with unsupported syntax still yields the
//! declarations around it.

use cppmodel_core::{ClassKey, Identifier, OperatorKind, RefQualifier};
use cppmodel_error::Result;
use tracing::{debug, trace};
use tree_sitter::Node;

use crate::ast::*;
use crate::stack::ensure_sufficient_stack;
use crate::unit::TranslationUnit;

fn offset(node: Node<'_>) -> Offset {
    node.start_byte() as Offset
}

fn end(node: Node<'_>) -> Offset {
    node.end_byte() as Offset
}

/// Named children, without comments.
fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// All children including anonymous tokens, without comments.
fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// Children paired with the grammar field they occupy.
fn children_with_fields<'t>(node: Node<'t>) -> Vec<(Option<&'static str>, Node<'t>)> {
    let mut cursor = node.walk();
    let mut out = Vec::new();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if !child.is_extra() {
                out.push((cursor.field_name(), child));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    out
}

fn is_attribute(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "attribute_specifier" | "attribute_declaration" | "ms_declspec_modifier" | "alignas_qualifier"
    )
}

fn is_name_kind(kind: &str) -> bool {
    matches!(
        kind,
        "identifier"
            | "type_identifier"
            | "field_identifier"
            | "namespace_identifier"
            | "qualified_identifier"
            | "template_type"
            | "template_function"
            | "template_method"
    )
}

/// Operators may be spelled with their alternative tokens.
fn operator_kind(spelling: &str) -> Option<OperatorKind> {
    let canonical = match spelling {
        "and" => "&&",
        "or" => "||",
        "not" => "!",
        "bitand" => "&",
        "bitor" => "|",
        "xor" => "^",
        "compl" => "~",
        "and_eq" => "&=",
        "or_eq" => "|=",
        "xor_eq" => "^=",
        "not_eq" => "!=",
        other => other,
    };
    OperatorKind::from_spelling(canonical)
}

/// Walk through qualified names to an `operator T` conversion-function id.
fn operator_cast_of(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node;
    loop {
        match current.kind() {
            "operator_cast" => return Some(current),
            "qualified_identifier" | "qualified_operator_cast_identifier" => {
                current = current.child_by_field_name("name")?;
            }
            _ => return None,
        }
    }
}

fn flatten_namespace_specifier<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    for child in named_children(node) {
        if child.kind() == "nested_namespace_specifier" {
            flatten_namespace_specifier(child, out);
        } else {
            out.push(child);
        }
    }
}

pub(crate) struct Lower<'a, 'tcx> {
    arena: &'tcx Arena<'tcx>,
    unit: &'a TranslationUnit,
    source: &'a [u8],
    max_depth: usize,
    depth: usize,
    depth_exceeded: bool,
}

impl<'a, 'tcx> Lower<'a, 'tcx> {
    pub(crate) fn new(arena: &'tcx Arena<'tcx>, unit: &'a TranslationUnit, max_depth: usize) -> Self {
        Self {
            arena,
            unit,
            source: unit.source().as_bytes(),
            max_depth,
            depth: 0,
            depth_exceeded: false,
        }
    }

    /// Run `f` one nesting level deeper. At the ceiling the subtree is cut:
    /// `degenerate` stands in for it and lowering carries on with its
    /// siblings.
    fn guarded<R>(
        &mut self,
        node: Node<'_>,
        degenerate: impl FnOnce(&Self) -> R,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        if self.depth >= self.max_depth {
            if !self.depth_exceeded {
                debug!(
                    file = self.unit.file_name(),
                    offset = node.start_byte(),
                    limit = self.max_depth,
                    "nesting ceiling reached, truncating"
                );
            }
            self.depth_exceeded = true;
            return Ok(degenerate(self));
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(&mut *self));
        self.depth -= 1;
        result
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source).unwrap_or_default()
    }

    fn identifier(&self, node: Node<'_>) -> Identifier {
        self.unit.literals().identifier(self.text(node))
    }

    fn simple_specifier(&self, node: Node<'_>, spec: SimpleSpecifier) -> &'tcx SpecifierAst<'tcx> {
        self.arena.alloc(SpecifierAst {
            offset: offset(node),
            kind: SpecifierKind::Simple(spec),
        })
    }

    fn unknown(&self, node: Node<'_>) -> &'tcx ExpressionAst<'tcx> {
        self.arena.alloc(ExpressionAst {
            offset: offset(node),
            end: end(node),
            kind: ExpressionKind::Unknown,
        })
    }

    fn empty_statement(&self, node: Node<'_>) -> &'tcx StatementAst<'tcx> {
        self.arena.alloc(StatementAst {
            offset: offset(node),
            kind: StatementKind::Expression(None),
        })
    }

    pub(crate) fn translation_unit(&mut self, root: Node<'_>) -> Result<&'tcx TranslationUnitAst<'tcx>> {
        let mut declarations = Vec::new();
        for child in named_children(root) {
            self.declarations_into(child, &mut declarations)?;
        }
        Ok(self.arena.alloc(TranslationUnitAst {
            declarations,
            end: end(root),
            depth_exceeded: self.depth_exceeded,
        }))
    }

    // -----------------------------------------------------------------------
    // Declarations
    // -----------------------------------------------------------------------

    /// Lower one item of a declaration sequence into zero or more declarations.
    fn declarations_into(&mut self, node: Node<'_>, out: &mut Vec<&'tcx DeclarationAst<'tcx>>) -> Result<()> {
        match node.kind() {
            "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif" | "preproc_elifdef" => {
                for (field, child) in children_with_fields(node) {
                    if !child.is_named() || matches!(field, Some("condition") | Some("name")) {
                        continue;
                    }
                    self.declarations_into(child, out)?;
                }
            }
            "preproc_include" | "preproc_def" | "preproc_function_def" | "preproc_call" => {}
            "ERROR" => {
                debug!(offset = node.start_byte(), "skipping unparsable region");
            }
            _ => {
                if let Some(declaration) = self.declaration(node)? {
                    out.push(declaration);
                }
            }
        }
        Ok(())
    }

    fn declaration(&mut self, node: Node<'_>) -> Result<Option<&'tcx DeclarationAst<'tcx>>> {
        self.guarded(node, |_| None, |this| {
            let kind = match node.kind() {
                "declaration" | "field_declaration" => this.simple_declaration(node, Vec::new())?,
                "type_definition" => {
                    let typedef = this.simple_specifier(node, SimpleSpecifier::Typedef);
                    this.simple_declaration(node, vec![typedef])?
                }
                "function_definition" => this.function_definition(node, Vec::new())?,
                "class_specifier" | "struct_specifier" | "union_specifier" | "enum_specifier" => {
                    DeclarationKind::Simple {
                        specifiers: this.type_specifier(node)?,
                        declarators: Vec::new(),
                    }
                }
                "friend_declaration" => this.friend(node)?,
                "namespace_definition" => this.namespace(node)?,
                "namespace_alias_definition" => {
                    let alias = node.child_by_field_name("name");
                    let target = named_children(node)
                        .into_iter()
                        .rev()
                        .find(|child| Some(child.id()) != alias.map(|a| a.id()));
                    match (alias, target) {
                        (Some(alias), Some(target)) => DeclarationKind::NamespaceAlias {
                            alias: this.identifier(alias),
                            target: this.name(target)?,
                        },
                        _ => DeclarationKind::Empty,
                    }
                }
                "using_declaration" => {
                    let is_directive = children(node).iter().any(|child| child.kind() == "namespace");
                    match named_children(node).into_iter().rev().find(|c| !is_attribute(*c)) {
                        Some(target) if is_directive => DeclarationKind::UsingDirective {
                            name: this.name(target)?,
                        },
                        Some(target) => DeclarationKind::Using {
                            name: this.name(target)?,
                        },
                        None => DeclarationKind::Empty,
                    }
                }
                "alias_declaration" => {
                    match (node.child_by_field_name("name"), node.child_by_field_name("type")) {
                        (Some(name), Some(ty)) => DeclarationKind::Alias {
                            name: this.identifier(name),
                            type_id: this.type_id(ty)?,
                        },
                        _ => DeclarationKind::Empty,
                    }
                }
                "linkage_specification" => {
                    let mut members = Vec::new();
                    if let Some(body) = node.child_by_field_name("body") {
                        if body.kind() == "declaration_list" {
                            for child in named_children(body) {
                                this.declarations_into(child, &mut members)?;
                            }
                        } else {
                            this.declarations_into(body, &mut members)?;
                        }
                    }
                    DeclarationKind::Linkage { members }
                }
                "static_assert_declaration" => {
                    let condition = match node.child_by_field_name("condition") {
                        Some(condition) => this.expression(condition)?,
                        None => this.unknown(node),
                    };
                    DeclarationKind::StaticAssert { condition }
                }
                "template_declaration" => this.template(node)?,
                "access_specifier" => DeclarationKind::Access {
                    access: this.text(node).trim_end_matches(':').trim().parse().ok(),
                    section: QtSection::None,
                },
                "empty_declaration" | ";" => DeclarationKind::Empty,
                "expression_statement" => match this.ambiguous_declaration(node)? {
                    Some(kind) => kind,
                    None => {
                        debug!(
                            offset = node.start_byte(),
                            "skipping expression statement at declaration scope"
                        );
                        return Ok(None);
                    }
                },
                other => {
                    debug!(kind = other, offset = node.start_byte(), "unsupported declaration");
                    return Ok(None);
                }
            };
            Ok(Some(&*this.arena.alloc(DeclarationAst {
                offset: offset(node),
                kind,
            })))
        })
    }

    /// `int (*q)[3];` where a declaration is expected parses as the
    /// functional cast `int(*q)` subscripted by `3`. Read such a statement
    /// back as the declaration it spells.
    fn ambiguous_declaration(&mut self, node: Node<'_>) -> Result<Option<DeclarationKind<'tcx>>> {
        let Some(mut current) = named_children(node).into_iter().next() else {
            return Ok(None);
        };
        let mut postfix = Vec::new();
        while current.kind() == "subscript_expression" {
            postfix.push(PostfixDeclaratorAst::Array {
                size: self.subscript_size(current)?,
            });
            let Some(argument) = current.child_by_field_name("argument") else {
                return Ok(None);
            };
            current = argument;
        }
        if current.kind() != "call_expression" {
            return Ok(None);
        }
        let (Some(ty), Some(arguments)) = (
            current.child_by_field_name("function"),
            current.child_by_field_name("arguments"),
        ) else {
            return Ok(None);
        };
        let children = named_children(arguments);
        let [inner] = children[..] else {
            return Ok(None);
        };
        // `T(x);` alone reads as a call or macro; only declarator punctuation
        // makes it a declaration.
        if !matches!(inner.kind(), "pointer_expression" | "parenthesized_expression") && postfix.is_empty() {
            return Ok(None);
        }
        let specifiers = match ty.kind() {
            "primitive_type" | "sized_type_specifier" | "type_identifier" | "qualified_identifier" | "template_type" => {
                self.type_specifier(ty)?
            }
            "identifier" => {
                let name = self.name(ty)?;
                vec![&*self.arena.alloc(SpecifierAst {
                    offset: offset(ty),
                    kind: SpecifierKind::Named(name),
                })]
            }
            _ => return Ok(None),
        };
        // The argument list's parentheses are the declarator's.
        let Some(nested) = self.declarator_from_expression(inner)? else {
            return Ok(None);
        };
        postfix.reverse();
        let declarator = self.arena.alloc(DeclaratorAst {
            offset: offset(arguments),
            core: Some(CoreDeclaratorAst::Nested(self.arena.alloc(nested))),
            postfix,
            ..Default::default()
        });
        Ok(Some(DeclarationKind::Simple {
            specifiers,
            declarators: vec![declarator],
        }))
    }

    /// `*p`, `&r`, `a[2]` and `(x)` read as declarators. `None` for anything
    /// else.
    fn declarator_from_expression(&mut self, node: Node<'_>) -> Result<Option<DeclaratorAst<'tcx>>> {
        self.guarded(node, |_| None, |this| {
            let mut declarator = DeclaratorAst {
                offset: offset(node),
                ..Default::default()
            };
            let mut current = node;
            while current.kind() == "pointer_expression" {
                let operator = current.child_by_field_name("operator").map(|op| op.kind());
                declarator.ptr_operators.push(match operator {
                    Some("&") => PtrOperatorAst::Reference { rvalue: false },
                    _ => PtrOperatorAst::Pointer { cv: Vec::new() },
                });
                let Some(argument) = current.child_by_field_name("argument") else {
                    return Ok(None);
                };
                current = argument;
            }
            while current.kind() == "subscript_expression" {
                declarator.postfix.push(PostfixDeclaratorAst::Array {
                    size: this.subscript_size(current)?,
                });
                let Some(argument) = current.child_by_field_name("argument") else {
                    return Ok(None);
                };
                current = argument;
            }
            declarator.postfix.reverse();
            declarator.core = match current.kind() {
                "identifier" => Some(CoreDeclaratorAst::Id {
                    name: this.name(current)?,
                    is_pack: false,
                }),
                "parenthesized_expression" => {
                    let inner = match named_children(current).into_iter().next() {
                        Some(inner) => this.declarator_from_expression(inner)?,
                        None => None,
                    };
                    match inner {
                        Some(inner) => Some(CoreDeclaratorAst::Nested(this.arena.alloc(inner))),
                        None => return Ok(None),
                    }
                }
                _ => return Ok(None),
            };
            Ok(Some(declarator))
        })
    }

    fn subscript_size(&mut self, node: Node<'_>) -> Result<Option<&'tcx ExpressionAst<'tcx>>> {
        node.child_by_field_name("indices")
            .and_then(|list| named_children(list).into_iter().next())
            .or_else(|| node.child_by_field_name("index"))
            .map(|index| self.expression(index))
            .transpose()
    }

    fn simple_declaration(
        &mut self,
        node: Node<'_>,
        mut specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
    ) -> Result<DeclarationKind<'tcx>> {
        specifiers.extend(self.decl_specifiers(node)?);
        let mut declarators: Vec<DeclaratorAst<'tcx>> = Vec::new();
        for (field, child) in children_with_fields(node) {
            match (field, child.kind()) {
                (Some("declarator"), _) => declarators.push(self.init_declarator(child)?),
                (Some("default_value"), _) | (Some("value"), _) => {
                    let value = self.initializer(child)?;
                    if let Some(last) = declarators.last_mut() {
                        last.initializer = Some(value);
                    }
                }
                (_, "pure_virtual_clause") => {
                    let zero = self.zero_literal(child);
                    if let Some(last) = declarators.last_mut() {
                        last.initializer = Some(zero);
                    }
                }
                (_, "default_method_clause") => {
                    if let Some(last) = declarators.last_mut() {
                        last.special = Some(SpecialMember::Default);
                    }
                }
                (_, "delete_method_clause") => {
                    if let Some(last) = declarators.last_mut() {
                        last.special = Some(SpecialMember::Delete);
                    }
                }
                _ => {}
            }
        }
        let declarators = declarators
            .into_iter()
            .map(|declarator| &*self.arena.alloc(declarator))
            .collect();
        Ok(DeclarationKind::Simple {
            specifiers,
            declarators,
        })
    }

    fn function_definition(
        &mut self,
        node: Node<'_>,
        mut specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
    ) -> Result<DeclarationKind<'tcx>> {
        specifiers.extend(self.decl_specifiers(node)?);
        let mut declarator = match node.child_by_field_name("declarator") {
            Some(declarator) => self.declarator_parts(declarator)?,
            None => DeclaratorAst {
                offset: offset(node),
                ..Default::default()
            },
        };
        let mut ctor_initializers = Vec::new();
        let mut body = None;
        for (field, child) in children_with_fields(node) {
            match (field, child.kind()) {
                (Some("body"), _) => body = Some(self.statement(child)?),
                (_, "field_initializer_list") => ctor_initializers = self.field_initializers(child)?,
                (_, "default_method_clause") => declarator.special = Some(SpecialMember::Default),
                (_, "delete_method_clause") => declarator.special = Some(SpecialMember::Delete),
                (_, "pure_virtual_clause") => declarator.initializer = Some(self.zero_literal(child)),
                _ => {}
            }
        }
        Ok(DeclarationKind::FunctionDefinition {
            specifiers,
            declarator: self.arena.alloc(declarator),
            ctor_initializers,
            body,
            end: end(node),
        })
    }

    fn zero_literal(&self, node: Node<'_>) -> &'tcx ExpressionAst<'tcx> {
        self.arena.alloc(ExpressionAst {
            offset: offset(node),
            end: end(node),
            kind: ExpressionKind::NumericLiteral(self.unit.literals().numeric_literal("0")),
        })
    }

    /// `: a(1), b{2}` as calls of the member names.
    fn field_initializers(&mut self, node: Node<'_>) -> Result<Vec<&'tcx ExpressionAst<'tcx>>> {
        let mut out = Vec::new();
        for initializer in named_children(node) {
            if initializer.kind() != "field_initializer" {
                continue;
            }
            let parts = named_children(initializer);
            let Some(member) = parts.first() else {
                continue;
            };
            let name = self.name(*member)?;
            let callee = self.arena.alloc(ExpressionAst {
                offset: offset(*member),
                end: end(*member),
                kind: ExpressionKind::Id(name),
            });
            let mut arguments = Vec::new();
            if let Some(args) = parts.iter().find(|p| matches!(p.kind(), "argument_list" | "initializer_list")) {
                for arg in named_children(*args) {
                    arguments.push(self.expression(arg)?);
                }
            }
            out.push(&*self.arena.alloc(ExpressionAst {
                offset: offset(initializer),
                end: end(initializer),
                kind: ExpressionKind::Call { callee, arguments },
            }));
        }
        Ok(out)
    }

    fn friend(&mut self, node: Node<'_>) -> Result<DeclarationKind<'tcx>> {
        let friend = self.simple_specifier(node, SimpleSpecifier::Friend);
        let inner = named_children(node)
            .into_iter()
            .find(|child| matches!(child.kind(), "declaration" | "function_definition"));
        if let Some(inner) = inner {
            return match inner.kind() {
                "function_definition" => self.function_definition(inner, vec![friend]),
                _ => self.simple_declaration(inner, vec![friend]),
            };
        }

        // friend class X;
        let key = children(node).iter().find_map(|child| match child.kind() {
            "class" => Some(ElaboratedKey::Class),
            "struct" => Some(ElaboratedKey::Struct),
            "union" => Some(ElaboratedKey::Union),
            _ => None,
        });
        let Some(target) = named_children(node).into_iter().find(|c| is_name_kind(c.kind())) else {
            return Ok(DeclarationKind::Empty);
        };
        let name = self.name(target)?;
        let kind = match key {
            Some(key) => SpecifierKind::Elaborated { key, name },
            None => SpecifierKind::Named(name),
        };
        let specifier = self.arena.alloc(SpecifierAst {
            offset: offset(target),
            kind,
        });
        Ok(DeclarationKind::Simple {
            specifiers: vec![friend, specifier],
            declarators: Vec::new(),
        })
    }

    fn namespace(&mut self, node: Node<'_>) -> Result<DeclarationKind<'tcx>> {
        let is_inline = children(node).iter().any(|child| child.kind() == "inline");
        let mut members = Vec::new();
        let (lbrace, rbrace) = match node.child_by_field_name("body") {
            Some(body) => {
                for child in named_children(body) {
                    self.declarations_into(child, &mut members)?;
                }
                (offset(body), end(body).saturating_sub(1))
            }
            None => (end(node), end(node)),
        };

        let name_node = node.child_by_field_name("name");
        let Some(name_node) = name_node.filter(|n| n.kind() == "nested_namespace_specifier") else {
            let name = name_node.map(|n| self.name(n)).transpose()?;
            return Ok(DeclarationKind::Namespace {
                name,
                is_inline,
                members,
                lbrace,
                rbrace,
            });
        };

        // namespace a::b::c { ... } nests one namespace per component.
        let mut parts = Vec::new();
        flatten_namespace_specifier(name_node, &mut parts);
        let parts: Vec<Node<'_>> = parts.into_iter().filter(|p| p.kind() != "inline").collect();
        let Some((outermost, rest)) = parts.split_first() else {
            return Ok(DeclarationKind::Namespace {
                name: None,
                is_inline,
                members,
                lbrace,
                rbrace,
            });
        };
        for part in rest.iter().rev() {
            let inner = DeclarationKind::Namespace {
                name: Some(self.name(*part)?),
                is_inline: false,
                members,
                lbrace,
                rbrace,
            };
            members = vec![&*self.arena.alloc(DeclarationAst {
                offset: offset(*part),
                kind: inner,
            })];
        }
        Ok(DeclarationKind::Namespace {
            name: Some(self.name(*outermost)?),
            is_inline,
            members,
            lbrace,
            rbrace,
        })
    }

    fn template(&mut self, node: Node<'_>) -> Result<DeclarationKind<'tcx>> {
        let list = node.child_by_field_name("parameters");
        let parameters = match list {
            Some(list) => self.template_parameters(list)?,
            None => Vec::new(),
        };
        let mut declaration = None;
        for child in named_children(node) {
            if Some(child.id()) == list.map(|l| l.id()) || child.kind() == "requires_clause" {
                continue;
            }
            if let Some(inner) = self.declaration(child)? {
                declaration = Some(inner);
                break;
            }
        }
        Ok(DeclarationKind::Template {
            parameters,
            declaration,
            end: end(node),
        })
    }

    fn template_parameters(&mut self, list: Node<'_>) -> Result<Vec<&'tcx TemplateParameterAst<'tcx>>> {
        let mut out = Vec::new();
        for child in named_children(list) {
            let is_class = children(child).iter().any(|c| c.kind() == "class");
            let kind = match child.kind() {
                "type_parameter_declaration" | "variadic_type_parameter_declaration" => {
                    TemplateParameterKind::Type {
                        name: named_children(child)
                            .into_iter()
                            .find(|c| c.kind() == "type_identifier")
                            .map(|c| self.identifier(c)),
                        is_class,
                        is_pack: child.kind() == "variadic_type_parameter_declaration",
                        default: None,
                    }
                }
                "optional_type_parameter_declaration" => TemplateParameterKind::Type {
                    name: child.child_by_field_name("name").map(|c| self.identifier(c)),
                    is_class,
                    is_pack: false,
                    default: match child.child_by_field_name("default_type") {
                        Some(default) => Some(self.type_id(default)?),
                        None => None,
                    },
                },
                "parameter_declaration" | "optional_parameter_declaration" | "variadic_parameter_declaration" => {
                    TemplateParameterKind::NonType(self.parameter(child)?)
                }
                "template_template_parameter_declaration" => {
                    let parameters = match child.child_by_field_name("parameters") {
                        Some(inner) => self.template_parameters(inner)?,
                        None => Vec::new(),
                    };
                    let declared = named_children(child).into_iter().find(|c| {
                        matches!(
                            c.kind(),
                            "type_parameter_declaration"
                                | "optional_type_parameter_declaration"
                                | "variadic_type_parameter_declaration"
                        )
                    });
                    let name = declared.and_then(|d| {
                        d.child_by_field_name("name")
                            .or_else(|| named_children(d).into_iter().find(|c| c.kind() == "type_identifier"))
                    });
                    let default = declared.and_then(|d| d.child_by_field_name("default_type"));
                    TemplateParameterKind::Template {
                        parameters,
                        name: name.map(|n| self.identifier(n)),
                        default: default.map(|d| self.name(d)).transpose()?,
                    }
                }
                other => {
                    debug!(kind = other, "unsupported template parameter");
                    continue;
                }
            };
            out.push(&*self.arena.alloc(TemplateParameterAst {
                offset: offset(child),
                kind,
            }));
        }
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Specifiers
    // -----------------------------------------------------------------------

    /// The `type` field plus every modifier keyword and attribute of `node`.
    fn decl_specifiers(&mut self, node: Node<'_>) -> Result<Vec<&'tcx SpecifierAst<'tcx>>> {
        let mut out = Vec::new();
        for (field, child) in children_with_fields(node) {
            if field == Some("type") {
                out.extend(self.type_specifier(child)?);
                continue;
            }
            if field.is_some() {
                continue;
            }
            match child.kind() {
                "storage_class_specifier"
                | "type_qualifier"
                | "virtual"
                | "virtual_function_specifier"
                | "explicit_function_specifier" => {
                    let keyword = match child.kind() {
                        "explicit_function_specifier" => "explicit",
                        _ => self.text(child),
                    };
                    match SimpleSpecifier::from_keyword(keyword) {
                        Some(spec) => out.push(self.simple_specifier(child, spec)),
                        None => trace!(keyword, "ignoring specifier"),
                    }
                }
                _ if is_attribute(child) => self.attributes(child, &mut out),
                _ => {}
            }
        }
        Ok(out)
    }

    fn attributes(&self, node: Node<'_>, out: &mut Vec<&'tcx SpecifierAst<'tcx>>) {
        for child in named_children(node) {
            let name = match child.kind() {
                "attribute" => child.child_by_field_name("name"),
                "identifier" => Some(child),
                "call_expression" => child.child_by_field_name("function"),
                "argument_list" => {
                    self.attributes(child, out);
                    None
                }
                _ => None,
            };
            if let Some(name) = name {
                out.push(self.arena.alloc(SpecifierAst {
                    offset: offset(name),
                    kind: SpecifierKind::Attribute(self.identifier(name)),
                }));
            }
        }
    }

    fn type_specifier(&mut self, node: Node<'_>) -> Result<Vec<&'tcx SpecifierAst<'tcx>>> {
        let kind = match node.kind() {
            "primitive_type" => match SimpleSpecifier::from_keyword(self.text(node)) {
                Some(spec) => SpecifierKind::Simple(spec),
                None => SpecifierKind::Named(self.name(node)?),
            },
            "sized_type_specifier" => {
                let mut out = Vec::new();
                for (field, child) in children_with_fields(node) {
                    if field == Some("type") {
                        out.extend(self.type_specifier(child)?);
                    } else if let Some(spec) = SimpleSpecifier::from_keyword(child.kind()) {
                        out.push(self.simple_specifier(child, spec));
                    }
                }
                return Ok(out);
            }
            "type_identifier" | "qualified_identifier" | "template_type" => SpecifierKind::Named(self.name(node)?),
            "dependent_type" => match named_children(node).into_iter().next() {
                Some(inner) => SpecifierKind::Elaborated {
                    key: ElaboratedKey::Typename,
                    name: self.name(inner)?,
                },
                None => return Ok(Vec::new()),
            },
            "class_specifier" | "struct_specifier" | "union_specifier" => {
                if node.child_by_field_name("body").is_some() {
                    SpecifierKind::Class(self.class_specifier(node)?)
                } else {
                    let key = match node.kind() {
                        "struct_specifier" => ElaboratedKey::Struct,
                        "union_specifier" => ElaboratedKey::Union,
                        _ => ElaboratedKey::Class,
                    };
                    match node.child_by_field_name("name") {
                        Some(name) => SpecifierKind::Elaborated {
                            key,
                            name: self.name(name)?,
                        },
                        None => return Ok(Vec::new()),
                    }
                }
            }
            "enum_specifier" => {
                if node.child_by_field_name("body").is_some() {
                    SpecifierKind::Enum(self.enum_specifier(node)?)
                } else {
                    match node.child_by_field_name("name") {
                        Some(name) => SpecifierKind::Elaborated {
                            key: ElaboratedKey::Enum,
                            name: self.name(name)?,
                        },
                        None => return Ok(Vec::new()),
                    }
                }
            }
            // Also covers `decltype(auto)` and constrained `Concept auto`.
            "placeholder_type_specifier" | "auto" => SpecifierKind::Simple(SimpleSpecifier::Auto),
            "decltype" => match named_children(node).into_iter().next() {
                Some(inner) if inner.kind() == "auto" => SpecifierKind::Simple(SimpleSpecifier::Auto),
                Some(inner) => SpecifierKind::Decltype(self.expression(inner)?),
                None => return Ok(Vec::new()),
            },
            other => {
                debug!(kind = other, offset = node.start_byte(), "unsupported type specifier");
                return Ok(Vec::new());
            }
        };
        Ok(vec![self.arena.alloc(SpecifierAst {
            offset: offset(node),
            kind,
        })])
    }

    /// Class bodies recurse through [`Self::declaration`], which carries the
    /// depth guard.
    fn class_specifier(&mut self, node: Node<'_>) -> Result<&'tcx ClassSpecifierAst<'tcx>> {
        let key = match node.kind() {
            "struct_specifier" => ClassKey::Struct,
            "union_specifier" => ClassKey::Union,
            _ => ClassKey::Class,
        };
        let name = node.child_by_field_name("name").map(|n| self.name(n)).transpose()?;
        let mut attributes = Vec::new();
        let mut is_final = false;
        let mut bases = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "virtual_specifier" => is_final |= self.text(child) == "final",
                "base_class_clause" => bases = self.base_clause(child)?,
                _ if is_attribute(child) => self.attributes(child, &mut attributes),
                _ => {}
            }
        }
        let mut members = Vec::new();
        let (lbrace, rbrace) = match node.child_by_field_name("body") {
            Some(body) => {
                for child in named_children(body) {
                    self.declarations_into(child, &mut members)?;
                }
                (offset(body), end(body).saturating_sub(1))
            }
            None => (end(node), end(node)),
        };
        Ok(self.arena.alloc(ClassSpecifierAst {
            offset: offset(node),
            key,
            name,
            attributes,
            is_final,
            bases,
            members,
            lbrace,
            rbrace,
        }))
    }

    fn base_clause(&mut self, node: Node<'_>) -> Result<Vec<BaseSpecifierAst<'tcx>>> {
        let mut tokens = Vec::new();
        for child in children(node) {
            if child.kind() == "base_class_specifier" {
                tokens.extend(children(child));
            } else {
                tokens.push(child);
            }
        }

        let mut bases: Vec<BaseSpecifierAst<'tcx>> = Vec::new();
        let mut access = None;
        let mut is_virtual = false;
        for token in tokens {
            match token.kind() {
                "access_specifier" | "public" | "protected" | "private" => {
                    access = self.text(token).trim().parse().ok();
                }
                "virtual" => is_virtual = true,
                "..." => {
                    if let Some(last) = bases.last_mut() {
                        last.is_variadic = true;
                    }
                }
                _ if token.is_named() && !is_attribute(token) => {
                    bases.push(BaseSpecifierAst {
                        offset: offset(token),
                        name: self.name(token)?,
                        access: access.take(),
                        is_virtual: std::mem::take(&mut is_virtual),
                        is_variadic: false,
                    });
                }
                _ => {}
            }
        }
        Ok(bases)
    }

    fn enum_specifier(&mut self, node: Node<'_>) -> Result<&'tcx EnumSpecifierAst<'tcx>> {
        let is_scoped = children(node).iter().any(|c| matches!(c.kind(), "class" | "struct"));
        let name = node.child_by_field_name("name").map(|n| self.name(n)).transpose()?;
        let underlying = match node.child_by_field_name("base") {
            Some(base) => self.type_specifier(base)?,
            None => Vec::new(),
        };
        let mut enumerators = Vec::new();
        let (lbrace, rbrace) = match node.child_by_field_name("body") {
            Some(body) => {
                for enumerator in named_children(body) {
                    if enumerator.kind() != "enumerator" {
                        continue;
                    }
                    let Some(name) = enumerator.child_by_field_name("name") else {
                        continue;
                    };
                    let value = enumerator
                        .child_by_field_name("value")
                        .map(|v| self.expression(v))
                        .transpose()?;
                    enumerators.push(EnumeratorAst {
                        offset: offset(enumerator),
                        name: self.identifier(name),
                        value,
                    });
                }
                (offset(body), end(body).saturating_sub(1))
            }
            None => (end(node), end(node)),
        };
        Ok(self.arena.alloc(EnumSpecifierAst {
            offset: offset(node),
            name,
            is_scoped,
            underlying,
            enumerators,
            lbrace,
            rbrace,
        }))
    }

    // -----------------------------------------------------------------------
    // Declarators
    // -----------------------------------------------------------------------

    fn init_declarator(&mut self, node: Node<'_>) -> Result<DeclaratorAst<'tcx>> {
        if node.kind() != "init_declarator" {
            return self.declarator_parts(node);
        }
        let mut declarator = match node.child_by_field_name("declarator") {
            Some(inner) => self.declarator_parts(inner)?,
            None => DeclaratorAst {
                offset: offset(node),
                ..Default::default()
            },
        };
        if let Some(value) = node.child_by_field_name("value") {
            declarator.initializer = Some(self.initializer(value)?);
        }
        Ok(declarator)
    }

    fn initializer(&mut self, node: Node<'_>) -> Result<&'tcx ExpressionAst<'tcx>> {
        self.expression(node)
    }

    /// Split a tree-sitter declarator chain into pointer operators, core and
    /// postfix parts.
    fn declarator_parts(&mut self, node: Node<'_>) -> Result<DeclaratorAst<'tcx>> {
        let truncated = DeclaratorAst {
            offset: offset(node),
            ..Default::default()
        };
        self.guarded(node, move |_| truncated, |this| {
            let mut declarator = DeclaratorAst {
                offset: offset(node),
                ..Default::default()
            };

            if let Some(cast) = operator_cast_of(node) {
                if let Some(function) = cast
                    .child_by_field_name("declarator")
                    .filter(|d| d.kind() == "abstract_function_declarator")
                {
                    let function = this.function_declarator(function)?;
                    declarator.postfix.push(PostfixDeclaratorAst::Function(function));
                }
                declarator.core = Some(CoreDeclaratorAst::Id {
                    name: this.name(node)?,
                    is_pack: false,
                });
                return Ok(declarator);
            }

            let mut current = Some(node);
            while let Some(n) = current {
                match n.kind() {
                    "pointer_declarator" | "abstract_pointer_declarator" => {
                        let mut cv = Vec::new();
                        let mut class_name = None;
                        for (field, child) in children_with_fields(n) {
                            if field.is_some() {
                                continue;
                            }
                            if child.kind() == "type_qualifier" {
                                cv.extend(SimpleSpecifier::from_keyword(this.text(child)).filter(|s| s.is_cv()));
                            } else if is_name_kind(child.kind()) {
                                class_name = Some(this.name(child)?);
                            }
                        }
                        declarator.ptr_operators.push(match class_name {
                            Some(class_name) => PtrOperatorAst::PointerToMember { class_name, cv },
                            None => PtrOperatorAst::Pointer { cv },
                        });
                        current = n.child_by_field_name("declarator");
                    }
                    "reference_declarator" | "abstract_reference_declarator" => {
                        let rvalue = children(n).iter().any(|c| c.kind() == "&&");
                        declarator.ptr_operators.push(PtrOperatorAst::Reference { rvalue });
                        current = n
                            .child_by_field_name("declarator")
                            .or_else(|| named_children(n).into_iter().find(|c| !is_attribute(*c)));
                    }
                    _ => break,
                }
            }

            // Collected outermost first; stored in source order.
            while let Some(n) = current {
                match n.kind() {
                    "array_declarator" | "abstract_array_declarator" => {
                        let size = n.child_by_field_name("size").map(|s| this.expression(s)).transpose()?;
                        declarator.postfix.push(PostfixDeclaratorAst::Array { size });
                        current = n.child_by_field_name("declarator");
                    }
                    "function_declarator" | "abstract_function_declarator" => {
                        let function = this.function_declarator(n)?;
                        declarator.postfix.push(PostfixDeclaratorAst::Function(function));
                        current = n.child_by_field_name("declarator");
                    }
                    _ => break,
                }
            }
            declarator.postfix.reverse();

            declarator.core = match current {
                Some(core) => this.core_declarator(core)?,
                None => None,
            };
            Ok(declarator)
        })
    }

    fn core_declarator(&mut self, node: Node<'_>) -> Result<Option<CoreDeclaratorAst<'tcx>>> {
        let core = match node.kind() {
            "parenthesized_declarator" | "abstract_parenthesized_declarator" => {
                match named_children(node).into_iter().find(|c| !is_attribute(*c)) {
                    Some(inner) => {
                        let inner = self.declarator_parts(inner)?;
                        CoreDeclaratorAst::Nested(self.arena.alloc(inner))
                    }
                    None => return Ok(None),
                }
            }
            "pointer_declarator"
            | "abstract_pointer_declarator"
            | "reference_declarator"
            | "abstract_reference_declarator"
            | "array_declarator"
            | "function_declarator" => {
                let inner = self.declarator_parts(node)?;
                CoreDeclaratorAst::Nested(self.arena.alloc(inner))
            }
            "structured_binding_declarator" => {
                let mut names = Vec::new();
                for child in named_children(node) {
                    names.push(self.name(child)?);
                }
                CoreDeclaratorAst::Decomposition(names)
            }
            "variadic_declarator" => match named_children(node).into_iter().next() {
                Some(id) => CoreDeclaratorAst::Id {
                    name: self.name(id)?,
                    is_pack: true,
                },
                None => return Ok(None),
            },
            _ => CoreDeclaratorAst::Id {
                name: self.name(node)?,
                is_pack: false,
            },
        };
        Ok(Some(core))
    }

    fn function_declarator(&mut self, node: Node<'_>) -> Result<&'tcx FunctionDeclaratorAst<'tcx>> {
        let mut function = FunctionDeclaratorAst {
            offset: offset(node),
            ..Default::default()
        };
        if let Some(params) = node.child_by_field_name("parameters") {
            function.offset = offset(params);
            for child in children(params) {
                match child.kind() {
                    "..." | "variadic_parameter" => function.is_variadic = true,
                    "parameter_declaration" | "optional_parameter_declaration" | "variadic_parameter_declaration" => {
                        function.parameters.push(self.parameter(child)?);
                    }
                    _ => {}
                }
            }
        }
        for child in children(node) {
            match child.kind() {
                "type_qualifier" => {
                    function
                        .cv
                        .extend(SimpleSpecifier::from_keyword(self.text(child)).filter(|s| s.is_cv()));
                }
                "ref_qualifier" => {
                    function.ref_qualifier = if self.text(child).contains("&&") {
                        RefQualifier::RValue
                    } else {
                        RefQualifier::LValue
                    };
                }
                "virtual_specifier" => match self.text(child) {
                    "override" => function.is_override = true,
                    "final" => function.is_final = true,
                    _ => {}
                },
                "trailing_return_type" => {
                    if let Some(ty) = named_children(child).into_iter().find(|c| c.kind() == "type_descriptor") {
                        function.trailing_return = Some(self.type_id(ty)?);
                    }
                }
                _ => {}
            }
        }
        Ok(self.arena.alloc(function))
    }

    fn parameter(&mut self, node: Node<'_>) -> Result<&'tcx ParameterAst<'tcx>> {
        let specifiers = self.decl_specifiers(node)?;
        let declarator = match node.child_by_field_name("declarator") {
            Some(declarator) => {
                let declarator = self.declarator_parts(declarator)?;
                Some(&*self.arena.alloc(declarator))
            }
            None => None,
        };
        let default_value = node
            .child_by_field_name("default_value")
            .map(|v| self.initializer(v))
            .transpose()?;
        Ok(self.arena.alloc(ParameterAst {
            offset: offset(node),
            specifiers,
            declarator,
            default_value,
        }))
    }

    fn type_id(&mut self, node: Node<'_>) -> Result<&'tcx TypeIdAst<'tcx>> {
        let specifiers = self.decl_specifiers(node)?;
        let declarator = match node.child_by_field_name("declarator") {
            Some(declarator) => {
                let declarator = self.declarator_parts(declarator)?;
                Some(&*self.arena.alloc(declarator))
            }
            None => None,
        };
        Ok(self.arena.alloc(TypeIdAst {
            offset: offset(node),
            specifiers,
            declarator,
        }))
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    fn name(&mut self, node: Node<'_>) -> Result<&'tcx NameAst<'tcx>> {
        let kind = match node.kind() {
            "destructor_name" => match named_children(node).into_iter().next() {
                Some(id) => NameKind::Destructor(self.name(id)?),
                None => NameKind::Simple(self.identifier(node)),
            },
            "operator_name" => {
                let spelling = self.text(node).trim_start_matches("operator");
                match operator_kind(spelling.trim()) {
                    Some(op) => NameKind::Operator(op),
                    None => NameKind::Simple(self.identifier(node)),
                }
            }
            "operator_cast" => {
                let specifiers = self.decl_specifiers(node)?;
                let declarator = match node
                    .child_by_field_name("declarator")
                    .and_then(|d| d.child_by_field_name("declarator"))
                {
                    Some(inner) => {
                        let inner = self.declarator_parts(inner)?;
                        Some(&*self.arena.alloc(inner))
                    }
                    None => None,
                };
                NameKind::Conversion(self.arena.alloc(TypeIdAst {
                    offset: offset(node),
                    specifiers,
                    declarator,
                }))
            }
            "template_type" | "template_function" | "template_method" => self.template_id(node, false)?,
            "dependent_name" | "dependent_type" | "dependent_field_identifier" => {
                match named_children(node).into_iter().next() {
                    Some(inner) if inner.kind().starts_with("template_") => self.template_id(inner, true)?,
                    Some(inner) => return self.name(inner),
                    None => NameKind::Simple(self.identifier(node)),
                }
            }
            "qualified_identifier"
            | "qualified_field_identifier"
            | "qualified_type_identifier"
            | "qualified_operator_cast_identifier"
            | "nested_namespace_specifier" => self.qualified_name(node)?,
            _ => NameKind::Simple(self.identifier(node)),
        };
        Ok(self.arena.alloc(NameAst {
            offset: offset(node),
            kind,
        }))
    }

    fn template_id(&mut self, node: Node<'_>, is_specialization: bool) -> Result<NameKind<'tcx>> {
        let identifier = match node.child_by_field_name("name") {
            Some(name) => self.identifier(name),
            None => self.identifier(node),
        };
        let mut arguments = Vec::new();
        if let Some(list) = node.child_by_field_name("arguments") {
            for argument in named_children(list) {
                arguments.push(match argument.kind() {
                    "type_descriptor" => TemplateArgumentAst::Type(self.type_id(argument)?),
                    _ => TemplateArgumentAst::Expression(self.expression(argument)?),
                });
            }
        }
        Ok(NameKind::TemplateId {
            identifier,
            arguments,
            is_specialization,
        })
    }

    fn qualified_name(&mut self, node: Node<'_>) -> Result<NameKind<'tcx>> {
        let mut global = false;
        let mut nested = Vec::new();

        if node.kind() == "nested_namespace_specifier" {
            let mut parts = Vec::new();
            flatten_namespace_specifier(node, &mut parts);
            let Some((last, scopes)) = parts.split_last() else {
                return Ok(NameKind::Simple(self.identifier(node)));
            };
            for scope in scopes {
                nested.push(self.name(*scope)?);
            }
            return Ok(NameKind::Qualified {
                global,
                nested,
                unqualified: self.name(*last)?,
            });
        }

        let mut current = node;
        loop {
            if !matches!(
                current.kind(),
                "qualified_identifier"
                    | "qualified_field_identifier"
                    | "qualified_type_identifier"
                    | "qualified_operator_cast_identifier"
            ) {
                break;
            }
            match current.child_by_field_name("scope") {
                Some(scope) if scope.kind() == "nested_namespace_specifier" => {
                    let mut parts = Vec::new();
                    flatten_namespace_specifier(scope, &mut parts);
                    for part in parts {
                        nested.push(self.name(part)?);
                    }
                }
                Some(scope) => nested.push(self.name(scope)?),
                None if nested.is_empty() => global = true,
                None => {}
            }
            match current.child_by_field_name("name") {
                Some(name) => current = name,
                None => break,
            }
        }
        let unqualified = if current.id() == node.id() {
            let identifier = self.identifier(node);
            self.arena.alloc(NameAst {
                offset: offset(node),
                kind: NameKind::Simple(identifier),
            })
        } else {
            self.name(current)?
        };
        Ok(NameKind::Qualified {
            global,
            nested,
            unqualified,
        })
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    pub(crate) fn statement(&mut self, node: Node<'_>) -> Result<&'tcx StatementAst<'tcx>> {
        self.guarded(node, |this| this.empty_statement(node), |this| {
            let kind = match node.kind() {
                "compound_statement" => StatementKind::Compound {
                    statements: this.statements(named_children(node))?,
                    end: end(node),
                },
                "expression_statement" => StatementKind::Expression(
                    named_children(node)
                        .into_iter()
                        .next()
                        .map(|e| this.expression(e))
                        .transpose()?,
                ),
                "if_statement" => {
                    let (init, condition) = this.condition_clause(node)?;
                    let then = this.required_statement(node, "consequence")?;
                    let otherwise = match node.child_by_field_name("alternative") {
                        Some(alt) if alt.kind() == "else_clause" => named_children(alt)
                            .into_iter()
                            .next()
                            .map(|s| this.statement(s))
                            .transpose()?,
                        Some(alt) => Some(this.statement(alt)?),
                        None => None,
                    };
                    StatementKind::If {
                        init,
                        condition,
                        then,
                        otherwise,
                        end: end(node),
                    }
                }
                "while_statement" => {
                    let (_, condition) = this.condition_clause(node)?;
                    StatementKind::While {
                        condition,
                        body: this.required_statement(node, "body")?,
                        end: end(node),
                    }
                }
                "do_statement" => StatementKind::DoWhile {
                    body: this.required_statement(node, "body")?,
                    condition: this.required_expression(node, "condition")?,
                },
                "for_statement" => {
                    let init = match node.child_by_field_name("initializer") {
                        Some(init) if init.kind() == "declaration" => Some(this.statement(init)?),
                        Some(init) => {
                            let expression = this.expression(init)?;
                            Some(&*this.arena.alloc(StatementAst {
                                offset: offset(init),
                                kind: StatementKind::Expression(Some(expression)),
                            }))
                        }
                        None => None,
                    };
                    let condition = node
                        .child_by_field_name("condition")
                        .map(|c| this.condition(c))
                        .transpose()?;
                    let increment = node
                        .child_by_field_name("update")
                        .map(|u| this.expression(u))
                        .transpose()?;
                    StatementKind::For {
                        init,
                        condition,
                        increment,
                        body: this.required_statement(node, "body")?,
                        end: end(node),
                    }
                }
                "for_range_loop" => {
                    let specifiers = this.decl_specifiers(node)?;
                    let declarator = match node.child_by_field_name("declarator") {
                        Some(d) => this.declarator_parts(d)?,
                        None => DeclaratorAst {
                            offset: offset(node),
                            ..Default::default()
                        },
                    };
                    StatementKind::RangeFor {
                        specifiers,
                        declarator: this.arena.alloc(declarator),
                        range: this.required_expression(node, "right")?,
                        body: this.required_statement(node, "body")?,
                        end: end(node),
                    }
                }
                "switch_statement" => {
                    let (_, condition) = this.condition_clause(node)?;
                    StatementKind::Switch {
                        condition,
                        body: this.required_statement(node, "body")?,
                        end: end(node),
                    }
                }
                "case_statement" => {
                    let value_node = node.child_by_field_name("value");
                    let value = value_node.map(|v| this.expression(v)).transpose()?;
                    let rest = named_children(node)
                        .into_iter()
                        .filter(|c| Some(c.id()) != value_node.map(|v| v.id()))
                        .collect();
                    StatementKind::Case {
                        value,
                        statements: this.statements(rest)?,
                    }
                }
                "labeled_statement" => {
                    let label = node.child_by_field_name("label");
                    let statement = match named_children(node)
                        .into_iter()
                        .rev()
                        .find(|c| Some(c.id()) != label.map(|l| l.id()))
                    {
                        Some(statement) => this.statement(statement)?,
                        None => this.empty_statement(node),
                    };
                    StatementKind::Labeled {
                        label: match label {
                            Some(label) => this.identifier(label),
                            None => this.unit.literals().identifier(""),
                        },
                        statement,
                    }
                }
                "return_statement" => StatementKind::Return(
                    named_children(node)
                        .into_iter()
                        .next()
                        .map(|e| this.expression(e))
                        .transpose()?,
                ),
                "break_statement" => StatementKind::Break,
                "continue_statement" => StatementKind::Continue,
                "goto_statement" => match node.child_by_field_name("label") {
                    Some(label) => StatementKind::Goto(this.identifier(label)),
                    None => StatementKind::Expression(None),
                },
                "try_statement" => {
                    let body = this.required_statement(node, "body")?;
                    let mut handlers = Vec::new();
                    for clause in named_children(node) {
                        if clause.kind() != "catch_clause" {
                            continue;
                        }
                        let parameter = match clause
                            .child_by_field_name("parameters")
                            .and_then(|list| named_children(list).into_iter().find(|p| p.kind() == "parameter_declaration"))
                        {
                            Some(parameter) => Some(this.parameter(parameter)?),
                            None => None,
                        };
                        handlers.push(CatchClauseAst {
                            offset: offset(clause),
                            parameter,
                            body: this.required_statement(clause, "body")?,
                            end: end(clause),
                        });
                    }
                    StatementKind::Try { body, handlers }
                }
                "throw_statement" => {
                    let operand = named_children(node)
                        .into_iter()
                        .next()
                        .map(|e| this.expression(e))
                        .transpose()?;
                    StatementKind::Expression(Some(this.arena.alloc(ExpressionAst {
                        offset: offset(node),
                        end: end(node),
                        kind: ExpressionKind::Throw(operand),
                    })))
                }
                "declaration"
                | "type_definition"
                | "alias_declaration"
                | "using_declaration"
                | "static_assert_declaration"
                | "namespace_alias_definition"
                | "class_specifier"
                | "struct_specifier"
                | "union_specifier"
                | "enum_specifier" => match this.declaration(node)? {
                    Some(declaration) => StatementKind::Declaration(declaration),
                    None => StatementKind::Expression(None),
                },
                other => {
                    debug!(kind = other, offset = node.start_byte(), "unsupported statement");
                    StatementKind::Expression(None)
                }
            };
            Ok(&*this.arena.alloc(StatementAst {
                offset: offset(node),
                kind,
            }))
        })
    }

    fn statements(&mut self, nodes: Vec<Node<'_>>) -> Result<Vec<&'tcx StatementAst<'tcx>>> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            out.push(self.statement(node)?);
        }
        Ok(out)
    }

    fn required_statement(&mut self, node: Node<'_>, field: &str) -> Result<&'tcx StatementAst<'tcx>> {
        match node.child_by_field_name(field) {
            Some(child) => self.statement(child),
            None => Ok(self.empty_statement(node)),
        }
    }

    fn required_expression(&mut self, node: Node<'_>, field: &str) -> Result<&'tcx ExpressionAst<'tcx>> {
        match node.child_by_field_name(field) {
            Some(child) => self.expression(child),
            None => Ok(self.unknown(node)),
        }
    }

    /// The `condition` field of `if`, `while` and `switch`, with its optional
    /// init-statement.
    fn condition_clause(
        &mut self,
        node: Node<'_>,
    ) -> Result<(Option<&'tcx StatementAst<'tcx>>, ConditionAst<'tcx>)> {
        let Some(clause) = node.child_by_field_name("condition") else {
            return Ok((None, ConditionAst::Expression(self.unknown(node))));
        };
        if clause.kind() != "condition_clause" {
            return Ok((None, self.condition(clause)?));
        }
        let init = clause
            .child_by_field_name("initializer")
            .map(|i| self.statement(i))
            .transpose()?;
        let condition = match clause.child_by_field_name("value") {
            Some(value) => self.condition(value)?,
            None => ConditionAst::Expression(self.unknown(clause)),
        };
        Ok((init, condition))
    }

    fn condition(&mut self, node: Node<'_>) -> Result<ConditionAst<'tcx>> {
        match node.kind() {
            "declaration" | "condition_declaration" => match self.declaration(node)? {
                Some(declaration) => Ok(ConditionAst::Declaration(declaration)),
                None => Ok(ConditionAst::Expression(self.unknown(node))),
            },
            _ => Ok(ConditionAst::Expression(self.expression(node)?)),
        }
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    pub(crate) fn expression(&mut self, node: Node<'_>) -> Result<&'tcx ExpressionAst<'tcx>> {
        self.guarded(node, |this| this.unknown(node), |this| {
            let literals = this.unit.literals();
            let kind = match node.kind() {
                "number_literal" => ExpressionKind::NumericLiteral(literals.numeric_literal(this.text(node))),
                "string_literal" | "raw_string_literal" | "concatenated_string" => {
                    ExpressionKind::StringLiteral(literals.string_literal(this.text(node)))
                }
                "char_literal" => ExpressionKind::CharLiteral(literals.string_literal(this.text(node))),
                "true" => ExpressionKind::BoolLiteral(true),
                "false" => ExpressionKind::BoolLiteral(false),
                "nullptr" | "null" => ExpressionKind::Nullptr,
                "this" => ExpressionKind::This,
                "identifier"
                | "field_identifier"
                | "qualified_identifier"
                | "template_function"
                | "destructor_name"
                | "operator_name" => ExpressionKind::Id(this.name(node)?),
                "parenthesized_expression" => match named_children(node).into_iter().next() {
                    Some(inner) => ExpressionKind::Paren(this.expression(inner)?),
                    None => ExpressionKind::Unknown,
                },
                "unary_expression" | "pointer_expression" | "update_expression" => {
                    let operator = node.child_by_field_name("operator");
                    let argument = node.child_by_field_name("argument");
                    match (operator.and_then(|op| operator_kind(this.text(op))), argument) {
                        (Some(op), Some(argument)) => ExpressionKind::Unary {
                            op,
                            postfix: operator.is_some_and(|o| argument.start_byte() < o.start_byte()),
                            operand: this.expression(argument)?,
                        },
                        _ => ExpressionKind::Unknown,
                    }
                }
                "binary_expression" | "assignment_expression" => {
                    let operator = node.child_by_field_name("operator");
                    match operator.and_then(|op| operator_kind(this.text(op))) {
                        Some(op) => ExpressionKind::Binary {
                            op,
                            lhs: this.required_expression(node, "left")?,
                            rhs: this.required_expression(node, "right")?,
                        },
                        None => ExpressionKind::Unknown,
                    }
                }
                "comma_expression" => ExpressionKind::Binary {
                    op: OperatorKind::Comma,
                    lhs: this.required_expression(node, "left")?,
                    rhs: this.required_expression(node, "right")?,
                },
                "conditional_expression" => {
                    let condition = this.required_expression(node, "condition")?;
                    // GNU `a ?: b` omits the middle operand.
                    let then = match node.child_by_field_name("consequence") {
                        Some(then) => this.expression(then)?,
                        None => condition,
                    };
                    ExpressionKind::Conditional {
                        condition,
                        then,
                        otherwise: this.required_expression(node, "alternative")?,
                    }
                }
                "call_expression" => this.call(node)?,
                "field_expression" => match node.child_by_field_name("field") {
                    Some(field) => ExpressionKind::Member {
                        base: this.required_expression(node, "argument")?,
                        name: this.name(field)?,
                        arrow: node
                            .child_by_field_name("operator")
                            .is_some_and(|op| this.text(op) == "->"),
                    },
                    None => ExpressionKind::Unknown,
                },
                "subscript_expression" => {
                    let index = node
                        .child_by_field_name("indices")
                        .and_then(|list| named_children(list).into_iter().next())
                        .or_else(|| node.child_by_field_name("index"));
                    match index {
                        Some(index) => ExpressionKind::Subscript {
                            base: this.required_expression(node, "argument")?,
                            index: this.expression(index)?,
                        },
                        None => ExpressionKind::Unknown,
                    }
                }
                "cast_expression" => match node.child_by_field_name("type") {
                    Some(ty) => ExpressionKind::Cast {
                        type_id: this.type_id(ty)?,
                        operand: this.required_expression(node, "value")?,
                    },
                    None => ExpressionKind::Unknown,
                },
                "sizeof_expression" | "alignof_expression" => {
                    match (node.child_by_field_name("type"), node.child_by_field_name("value")) {
                        (Some(ty), _) => ExpressionKind::SizeofType(this.type_id(ty)?),
                        (None, Some(value)) => ExpressionKind::SizeofExpression(this.expression(value)?),
                        (None, None) => ExpressionKind::Unknown,
                    }
                }
                "compound_literal_expression" => match node.child_by_field_name("type") {
                    Some(ty) if is_name_kind(ty.kind()) => {
                        let name = this.name(ty)?;
                        let callee = this.arena.alloc(ExpressionAst {
                            offset: offset(ty),
                            end: end(ty),
                            kind: ExpressionKind::Id(name),
                        });
                        let mut arguments = Vec::new();
                        if let Some(value) = node.child_by_field_name("value") {
                            for arg in named_children(value) {
                                arguments.push(this.expression(arg)?);
                            }
                        }
                        ExpressionKind::Call { callee, arguments }
                    }
                    _ => ExpressionKind::Unknown,
                },
                "new_expression" => this.new_expression(node)?,
                "delete_expression" => match named_children(node).into_iter().last() {
                    Some(operand) => ExpressionKind::Delete {
                        operand: this.expression(operand)?,
                        is_array: children(node).iter().any(|c| c.kind() == "["),
                    },
                    None => ExpressionKind::Unknown,
                },
                "lambda_expression" => ExpressionKind::Lambda(this.lambda(node)?),
                "initializer_list" | "argument_list" => {
                    let mut elements = Vec::new();
                    for element in named_children(node) {
                        elements.push(this.expression(element)?);
                    }
                    ExpressionKind::InitializerList(elements)
                }
                "throw_expression" => ExpressionKind::Throw(
                    named_children(node)
                        .into_iter()
                        .next()
                        .map(|e| this.expression(e))
                        .transpose()?,
                ),
                other => {
                    trace!(kind = other, offset = node.start_byte(), "unmodelled expression");
                    ExpressionKind::Unknown
                }
            };
            Ok(&*this.arena.alloc(ExpressionAst {
                offset: offset(node),
                end: end(node),
                kind,
            }))
        })
    }

    /// Calls, including `static_cast<T>(e)` and its siblings, which the
    /// grammar parses as calls of a template function.
    fn call(&mut self, node: Node<'_>) -> Result<ExpressionKind<'tcx>> {
        let function = node.child_by_field_name("function");
        let arguments_node = node.child_by_field_name("arguments");
        let mut arguments = Vec::new();
        if let Some(list) = arguments_node {
            for arg in named_children(list) {
                arguments.push(self.expression(arg)?);
            }
        }

        if let Some(function) = function.filter(|f| f.kind() == "template_function") {
            let keyword = function.child_by_field_name("name").map(|n| self.text(n));
            let target = function
                .child_by_field_name("arguments")
                .and_then(|list| named_children(list).into_iter().find(|c| c.kind() == "type_descriptor"));
            if let (Some("static_cast" | "dynamic_cast" | "reinterpret_cast" | "const_cast"), Some(target)) =
                (keyword, target)
            {
                let operand = match arguments.first() {
                    Some(operand) => *operand,
                    None => self.unknown(node),
                };
                return Ok(ExpressionKind::Cast {
                    type_id: self.type_id(target)?,
                    operand,
                });
            }
        }

        let callee = match function {
            Some(function) => self.expression(function)?,
            None => self.unknown(node),
        };
        Ok(ExpressionKind::Call { callee, arguments })
    }

    fn new_expression(&mut self, node: Node<'_>) -> Result<ExpressionKind<'tcx>> {
        let mut placement = Vec::new();
        if let Some(list) = node.child_by_field_name("placement") {
            for arg in named_children(list) {
                placement.push(self.expression(arg)?);
            }
        }
        let ty = node.child_by_field_name("type");
        let specifiers = match ty {
            Some(ty) => self.type_specifier(ty)?,
            None => Vec::new(),
        };
        let mut array_sizes = Vec::new();
        let mut current = node.child_by_field_name("declarator");
        while let Some(declarator) = current.filter(|d| d.kind() == "new_declarator") {
            let nested = named_children(declarator)
                .into_iter()
                .find(|c| c.kind() == "new_declarator");
            let length = declarator.child_by_field_name("length").or_else(|| {
                named_children(declarator)
                    .into_iter()
                    .find(|c| c.kind() != "new_declarator")
            });
            if let Some(length) = length {
                array_sizes.push(self.expression(length)?);
            }
            current = nested;
        }
        let initializer = node
            .child_by_field_name("arguments")
            .map(|a| self.expression(a))
            .transpose()?;
        let type_id = self.arena.alloc(NewTypeIdAst {
            offset: ty.map(offset).unwrap_or_else(|| offset(node)),
            specifiers,
            ptr_operators: Vec::new(),
            array_sizes,
        });
        Ok(ExpressionKind::New {
            placement,
            type_id,
            initializer,
        })
    }

    fn lambda(&mut self, node: Node<'_>) -> Result<&'tcx LambdaAst<'tcx>> {
        let mut captures = Vec::new();
        if let Some(list) = node.child_by_field_name("captures") {
            for capture in named_children(list) {
                if capture.kind() != "lambda_default_capture" {
                    captures.push(self.expression(capture)?);
                }
            }
        }
        let declarator = node
            .child_by_field_name("declarator")
            .map(|d| self.function_declarator(d))
            .transpose()?;
        let body = self.required_statement(node, "body")?;
        Ok(self.arena.alloc(LambdaAst {
            offset: offset(node),
            captures,
            declarator,
            body,
            end: end(node),
        }))
    }
}
