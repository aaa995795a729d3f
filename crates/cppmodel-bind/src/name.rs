use cppmodel_ast::{ExpressionKind, NameAst, NameKind, TemplateArgumentAst};
use cppmodel_core::{NameId, TemplateArgument};
use smallvec::SmallVec;

use crate::bind::Bind;

impl Bind<'_> {
    /// Allocate the name spelled by `ast`.
    pub(crate) fn name(&mut self, ast: &NameAst<'_>) -> NameId {
        match &ast.kind {
            NameKind::Simple(identifier) => self.control.identifier_name(*identifier),
            NameKind::Destructor(inner) => {
                let inner = self.name(inner);
                self.control.destructor_name_id(inner)
            }
            NameKind::Operator(kind) => self.control.operator_name_id(*kind),
            NameKind::Conversion(type_id) => {
                let ty = self.type_id(type_id);
                self.control.conversion_name_id(ty)
            }
            NameKind::TemplateId {
                identifier,
                arguments,
                is_specialization,
            } => {
                let arguments = arguments.iter().map(|arg| self.template_argument(arg)).collect();
                self.control.template_name_id(*identifier, *is_specialization, arguments)
            }
            NameKind::Qualified {
                global,
                nested,
                unqualified,
            } => {
                // `::a::b` has no base at the root; `a::b` starts from `a`.
                let mut base: Option<NameId> = None;
                let mut qualified = *global;
                for part in nested {
                    let part = self.name(part);
                    base = Some(if qualified {
                        self.control.qualified_name_id(base, part)
                    } else {
                        part
                    });
                    qualified = true;
                }
                let last = self.name(unqualified);
                if qualified {
                    self.control.qualified_name_id(base, last)
                } else {
                    last
                }
            }
            NameKind::Selector { parts, has_arguments } => {
                let names: SmallVec<[NameId; 4]> =
                    parts.iter().map(|part| self.control.identifier_name(*part)).collect();
                self.control.selector_name_id(&names, *has_arguments)
            }
        }
    }

    fn template_argument(&mut self, ast: &TemplateArgumentAst<'_>) -> TemplateArgument {
        match ast {
            TemplateArgumentAst::Type(type_id) => TemplateArgument::new(self.type_id(type_id)),
            TemplateArgumentAst::Expression(expression) => {
                let ty = self.expression(expression);
                match expression.kind {
                    ExpressionKind::NumericLiteral(literal) => TemplateArgument::with_literal(ty, literal),
                    _ => TemplateArgument::new(ty),
                }
            }
        }
    }
}
