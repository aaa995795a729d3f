//! Declarator resolution.
//!
//! A declarator wraps the type folded from the specifiers: pointer and
//! reference operators apply first, then the postfix array and function
//! parts from the innermost outwards, then a parenthesized inner declarator
//! continues with the result. `int *p[3]` is an array of three pointers;
//! `int (*p)[3]` is a pointer to an array of three.

use cppmodel_ast::{
    CoreDeclaratorAst, DeclaratorAst, ExpressionAst, ExpressionKind, FunctionDeclaratorAst, NewTypeIdAst, Offset,
    ParameterAst, PostfixDeclaratorAst, PtrOperatorAst, SimpleSpecifier, TypeIdAst,
};
use cppmodel_core::{FullySpecifiedType, FunctionFlags, NameId, SymbolId, SymbolKind};

use crate::bind::Bind;

/// A resolved declarator.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Declared {
    pub ty: FullySpecifiedType,
    pub name: Option<NameId>,
    /// Offset of the declarator-id, or of the declarator when it has none.
    pub offset: Offset,
}

fn apply_cv(ty: &mut FullySpecifiedType, cv: &[SimpleSpecifier]) {
    for qualifier in cv {
        match qualifier {
            SimpleSpecifier::Const => ty.set_const(true),
            SimpleSpecifier::Volatile => ty.set_volatile(true),
            _ => {}
        }
    }
}

impl Bind<'_> {
    pub(crate) fn declarator(&mut self, ast: &DeclaratorAst<'_>, ty: FullySpecifiedType) -> Declared {
        self.guarded(ast.offset, |this| this.resolve_declarator(ast, ty))
    }

    fn resolve_declarator(&mut self, ast: &DeclaratorAst<'_>, mut ty: FullySpecifiedType) -> Declared {
        let id_offset = ast.declarator_id().map_or(ast.offset, |name| name.offset);
        self.attributes(&ast.attributes, &mut ty);
        for operator in &ast.ptr_operators {
            ty = self.ptr_operator(operator, ty);
        }
        for postfix in ast.postfix.iter().rev() {
            ty = self.postfix_declarator(postfix, ty, id_offset);
        }
        let mut declared = match &ast.core {
            Some(CoreDeclaratorAst::Id { name, .. }) => Declared {
                ty,
                name: Some(self.name(name)),
                offset: name.offset,
            },
            Some(CoreDeclaratorAst::Nested(inner)) => self.declarator(inner, ty),
            Some(CoreDeclaratorAst::Decomposition(_)) | None => Declared {
                ty,
                name: None,
                offset: ast.offset,
            },
        };
        self.attributes(&ast.post_attributes, &mut declared.ty);
        declared
    }

    pub(crate) fn ptr_operator(&mut self, ast: &PtrOperatorAst<'_>, element: FullySpecifiedType) -> FullySpecifiedType {
        let element = element.qualified_type();
        match ast {
            PtrOperatorAst::Pointer { cv } => {
                let mut ty = FullySpecifiedType::new(self.control.pointer_type(element));
                apply_cv(&mut ty, cv);
                ty
            }
            PtrOperatorAst::Reference { rvalue } => {
                FullySpecifiedType::new(self.control.reference_type(element, *rvalue))
            }
            PtrOperatorAst::PointerToMember { class_name, cv } => {
                let class_name = self.name(class_name);
                let mut ty = FullySpecifiedType::new(self.control.pointer_to_member_type(class_name, element));
                apply_cv(&mut ty, cv);
                ty
            }
        }
    }

    fn postfix_declarator(
        &mut self,
        ast: &PostfixDeclaratorAst<'_>,
        ty: FullySpecifiedType,
        id_offset: Offset,
    ) -> FullySpecifiedType {
        match ast {
            PostfixDeclaratorAst::Array { size } => {
                let size = size.map_or(0, |size| self.array_size(size));
                FullySpecifiedType::new(self.control.array_type(ty.qualified_type(), size))
            }
            PostfixDeclaratorAst::Function(function) => {
                let function = self.function_declarator(function, ty, id_offset);
                self.self_type(function)
            }
        }
    }

    /// Literal bounds only; anything else is an array of unknown size.
    pub(crate) fn array_size(&mut self, ast: &ExpressionAst<'_>) -> u32 {
        self.expression(ast);
        match ast.kind {
            ExpressionKind::NumericLiteral(literal) => self
                .control
                .literals()
                .number_value(literal)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Create the function a `(...)` postfix introduces, with its parameters
    /// bound as arguments inside it. The function stays unnamed and outside
    /// any scope; the declaration that owns it decides both.
    pub(crate) fn function_declarator(
        &mut self,
        ast: &FunctionDeclaratorAst<'_>,
        return_type: FullySpecifiedType,
        offset: Offset,
    ) -> SymbolId {
        let location = self.location(offset);
        let function = self.control.new_function(location, None);
        let return_type = match ast.trailing_return {
            Some(trailing) => self.type_id(trailing),
            None => return_type.qualified_type(),
        };

        let mut flags = FunctionFlags::empty();
        flags.set(FunctionFlags::CONST, ast.cv.contains(&SimpleSpecifier::Const));
        flags.set(FunctionFlags::VOLATILE, ast.cv.contains(&SimpleSpecifier::Volatile));
        flags.set(FunctionFlags::OVERRIDE, ast.is_override);
        flags.set(FunctionFlags::FINAL, ast.is_final);
        flags.set(FunctionFlags::VARIADIC, ast.is_variadic);
        if let Some(data) = self.control.symbol_mut(function).as_function_mut() {
            data.return_type = return_type;
            data.flags = flags;
            data.ref_qualifier = ast.ref_qualifier;
        }

        self.with_scope(function, |this| {
            for parameter in &ast.parameters {
                this.parameter(parameter);
            }
        });
        function
    }

    pub(crate) fn parameter(&mut self, ast: &ParameterAst<'_>) -> SymbolId {
        let specifiers = self.specifiers(&ast.specifiers);
        let declared = match ast.declarator {
            Some(declarator) => self.declarator(declarator, specifiers.ty),
            None => Declared {
                ty: specifiers.ty,
                name: None,
                offset: ast.offset,
            },
        };
        let location = self.location(if declared.name.is_some() { declared.offset } else { ast.offset });
        let argument = self.control.new_argument(location, declared.name);
        let initializer = ast.default_value.map(|value| {
            self.expression(value);
            self.spelled(value)
        });
        let symbol = self.control.symbol_mut(argument);
        symbol.storage = specifiers.storage();
        symbol.flags |= specifiers.symbol_flags();
        if let SymbolKind::Argument(data) = &mut symbol.kind {
            data.ty = declared.ty;
            data.initializer = initializer;
        }
        self.add_member(argument);
        argument
    }

    pub(crate) fn type_id(&mut self, ast: &TypeIdAst<'_>) -> FullySpecifiedType {
        self.guarded(ast.offset, |this| {
            let specifiers = this.specifiers(&ast.specifiers);
            match ast.declarator {
                Some(declarator) => this.declarator(declarator, specifiers.ty).ty,
                None => specifiers.ty,
            }
        })
    }

    pub(crate) fn new_type_id(&mut self, ast: &NewTypeIdAst<'_>) -> FullySpecifiedType {
        self.guarded(ast.offset, |this| {
            let mut ty = this.specifiers(&ast.specifiers).ty;
            for operator in &ast.ptr_operators {
                ty = this.ptr_operator(operator, ty);
            }
            for size in ast.array_sizes.iter().rev() {
                let size = this.array_size(size);
                ty = FullySpecifiedType::new(this.control.array_type(ty.qualified_type(), size));
            }
            ty
        })
    }
}
