//! Expression binding.
//!
//! Expressions declare nothing except lambdas. The computed type is the
//! best local guess: literals, declared names found through the scope
//! chain, members of known classes, and the usual operator results. What
//! cannot be worked out locally is undefined.

use cppmodel_ast::{ExpressionAst, ExpressionKind, LambdaAst};
use cppmodel_core::{
    FloatKind, FullySpecifiedType, IntegerKind, Name, NameId, NumericLiteral, OperatorKind, Type,
};

use crate::bind::Bind;

impl Bind<'_> {
    pub(crate) fn expression(&mut self, ast: &ExpressionAst<'_>) -> FullySpecifiedType {
        self.guarded(ast.offset, |this| this.visit_expression(ast))
    }

    fn visit_expression(&mut self, ast: &ExpressionAst<'_>) -> FullySpecifiedType {
        match &ast.kind {
            ExpressionKind::NumericLiteral(literal) => self.numeric_type(*literal),
            ExpressionKind::StringLiteral(_) => {
                let mut element = self.integer(IntegerKind::Char);
                element.set_const(true);
                FullySpecifiedType::new(self.control.pointer_type(element))
            }
            ExpressionKind::CharLiteral(_) => self.integer(IntegerKind::Char),
            ExpressionKind::BoolLiteral(_) => self.integer(IntegerKind::Bool),
            ExpressionKind::Nullptr => {
                let void = FullySpecifiedType::new(self.control.void_type());
                FullySpecifiedType::new(self.control.pointer_type(void))
            }
            ExpressionKind::This => {
                let class = self
                    .scope
                    .and_then(|scope| self.control.enclosing(scope, |sym| sym.is_class()));
                match class {
                    Some(class) => {
                        let class = self.self_type(class);
                        FullySpecifiedType::new(self.control.pointer_type(class))
                    }
                    None => FullySpecifiedType::default(),
                }
            }
            ExpressionKind::Id(name) => {
                let name = self.name(name);
                self.lookup_type(name)
            }
            ExpressionKind::Unary { op, operand, .. } => {
                let operand = self.expression(operand);
                match op {
                    OperatorKind::Amper => FullySpecifiedType::new(self.control.pointer_type(operand.qualified_type())),
                    OperatorKind::Star => self.element_of(&operand),
                    OperatorKind::Exclaim => self.integer(IntegerKind::Bool),
                    _ => operand.qualified_type(),
                }
            }
            ExpressionKind::Binary { op, lhs, rhs } => {
                let lhs = self.expression(lhs);
                let rhs = self.expression(rhs);
                match op {
                    OperatorKind::EqualEqual
                    | OperatorKind::ExclaimEqual
                    | OperatorKind::Less
                    | OperatorKind::Greater
                    | OperatorKind::LessEqual
                    | OperatorKind::GreaterEqual
                    | OperatorKind::AmperAmper
                    | OperatorKind::PipePipe => self.integer(IntegerKind::Bool),
                    OperatorKind::Comma => rhs,
                    _ => lhs.qualified_type(),
                }
            }
            ExpressionKind::Conditional {
                condition,
                then,
                otherwise,
            } => {
                self.expression(condition);
                let then = self.expression(then);
                let otherwise = self.expression(otherwise);
                if then.is_valid() { then } else { otherwise }
            }
            ExpressionKind::Call { callee, arguments } => {
                let callee = self.expression(callee);
                for argument in arguments {
                    self.expression(argument);
                }
                self.call_result(&callee)
            }
            ExpressionKind::Member { base, name, arrow } => {
                let base = self.expression(base);
                let name = self.name(name);
                self.member_type(&base, name, *arrow)
            }
            ExpressionKind::Subscript { base, index } => {
                let base = self.expression(base);
                self.expression(index);
                self.element_of(&base)
            }
            ExpressionKind::Cast { type_id, operand } => {
                self.expression(operand);
                self.type_id(type_id)
            }
            ExpressionKind::SizeofType(type_id) => {
                self.type_id(type_id);
                self.size_type()
            }
            ExpressionKind::SizeofExpression(operand) => {
                self.expression(operand);
                self.size_type()
            }
            ExpressionKind::New {
                placement,
                type_id,
                initializer,
            } => {
                for argument in placement {
                    self.expression(argument);
                }
                let ty = self.new_type_id(type_id);
                if let Some(initializer) = initializer {
                    self.expression(initializer);
                }
                // `new T[n]` yields a pointer to the element.
                let pointee = match self.control.ty(ty.ty()) {
                    Type::Array { element, .. } => *element,
                    _ => ty.qualified_type(),
                };
                FullySpecifiedType::new(self.control.pointer_type(pointee))
            }
            ExpressionKind::Delete { operand, .. } => {
                self.expression(operand);
                FullySpecifiedType::new(self.control.void_type())
            }
            ExpressionKind::Lambda(lambda) => self.lambda(lambda),
            ExpressionKind::InitializerList(elements) => {
                for element in elements {
                    self.expression(element);
                }
                FullySpecifiedType::default()
            }
            ExpressionKind::Paren(inner) => self.expression(inner),
            ExpressionKind::Throw(operand) => {
                if let Some(operand) = operand {
                    self.expression(operand);
                }
                FullySpecifiedType::new(self.control.void_type())
            }
            ExpressionKind::Unknown => FullySpecifiedType::default(),
        }
    }

    fn integer(&self, kind: IntegerKind) -> FullySpecifiedType {
        FullySpecifiedType::new(self.control.integer_type(kind))
    }

    fn size_type(&self) -> FullySpecifiedType {
        let mut ty = self.integer(IntegerKind::Long);
        ty.set_unsigned(true);
        ty
    }

    /// Integer literals are `int` unless suffixed; anything with a fraction
    /// or exponent is `double` unless suffixed.
    fn numeric_type(&self, literal: NumericLiteral) -> FullySpecifiedType {
        let spelling = self.control.literals().number(literal).to_ascii_lowercase();
        let is_hex = spelling.starts_with("0x");
        let is_float = if is_hex {
            spelling.contains('p')
        } else {
            spelling.contains('.') || spelling.contains('e')
        };
        if is_float {
            let kind = if spelling.ends_with('f') {
                FloatKind::Float
            } else if spelling.ends_with('l') {
                FloatKind::LongDouble
            } else {
                FloatKind::Double
            };
            return FullySpecifiedType::new(self.control.float_type(kind));
        }
        let suffix: String = spelling
            .chars()
            .rev()
            .take_while(|c| matches!(c, 'u' | 'l'))
            .collect();
        let kind = match suffix.matches('l').count() {
            0 => IntegerKind::Int,
            1 => IntegerKind::Long,
            _ => IntegerKind::LongLong,
        };
        let mut ty = self.integer(kind);
        ty.set_unsigned(suffix.contains('u'));
        ty
    }

    /// Type of a name used as an expression: the declared type of whatever
    /// the scope chain finds, or the name itself as a type.
    fn lookup_type(&mut self, name: NameId) -> FullySpecifiedType {
        let identifier = match self.control.name(name) {
            Name::Identifier(identifier) => Some(*identifier),
            Name::TemplateId { identifier, .. } => Some(*identifier),
            _ => None,
        };
        let found = self
            .scope
            .zip(identifier)
            .and_then(|(scope, identifier)| self.control.lookup(scope, identifier));
        match found {
            Some(symbol) => self.control.symbol_type(symbol).qualified_type(),
            None => FullySpecifiedType::new(self.control.named_type(name)),
        }
    }

    /// Return type of calling something of type `callee`, through one level
    /// of pointer.
    fn call_result(&self, callee: &FullySpecifiedType) -> FullySpecifiedType {
        let mut ty = callee.ty();
        if self.control.ty(ty).is_pointer() {
            ty = self.element_of(callee).ty();
        }
        self.control
            .as_function_type(ty)
            .map(|function| function.return_type)
            .unwrap_or_default()
    }

    fn member_type(&self, base: &FullySpecifiedType, name: NameId, arrow: bool) -> FullySpecifiedType {
        let mut owner = *base;
        if arrow || self.control.ty(owner.ty()).is_reference() {
            owner = self.element_of(&owner);
        }
        let member = self
            .control
            .type_symbol_id(owner.ty())
            .zip(self.control.name_identifier(name))
            .and_then(|(scope, identifier)| self.control.find_member(scope, identifier));
        member
            .map(|member| self.control.symbol_type(member).qualified_type())
            .unwrap_or_default()
    }

    /// A lambda is an unnamed function in the current scope with its body
    /// as a block inside it.
    fn lambda(&mut self, ast: &LambdaAst<'_>) -> FullySpecifiedType {
        for capture in &ast.captures {
            self.expression(capture);
        }
        let function = match ast.declarator {
            Some(declarator) => self.function_declarator(declarator, FullySpecifiedType::default(), ast.offset),
            None => {
                let location = self.location(ast.offset);
                self.control.new_function(location, None)
            }
        };
        self.control.set_scope_range(function, ast.offset, ast.end);
        self.declare_member(function);
        self.with_scope(function, |this| this.statement(ast.body));
        self.self_type(function)
    }
}
