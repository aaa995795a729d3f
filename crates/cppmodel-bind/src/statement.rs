use cppmodel_ast::{CatchClauseAst, ConditionAst, Offset, StatementAst, StatementKind};

use crate::bind::Bind;

impl Bind<'_> {
    pub(crate) fn statement(&mut self, ast: &StatementAst<'_>) {
        self.guarded(ast.offset, |this| this.visit_statement(ast));
    }

    /// Open a block scope spanning `start..end` in the current scope and run
    /// `f` inside it.
    fn block<R>(&mut self, start: Offset, end: Offset, f: impl FnOnce(&mut Self) -> R) -> R {
        let location = self.location(start);
        let block = self.control.new_block(location);
        self.control.set_scope_range(block, start, end);
        self.add_member(block);
        self.with_scope(block, f)
    }

    fn visit_statement(&mut self, ast: &StatementAst<'_>) {
        match &ast.kind {
            StatementKind::Compound { statements, end } => self.block(ast.offset, *end, |this| {
                for statement in statements {
                    this.statement(statement);
                }
            }),
            StatementKind::Declaration(declaration) => self.declaration(declaration),
            StatementKind::Expression(expression) => {
                if let Some(expression) = expression {
                    self.expression(expression);
                }
            }
            StatementKind::If {
                init,
                condition,
                then,
                otherwise,
                end,
            } => self.block(ast.offset, *end, |this| {
                if let Some(init) = init {
                    this.statement(init);
                }
                this.condition(*condition);
                this.statement(then);
                if let Some(otherwise) = otherwise {
                    this.statement(otherwise);
                }
            }),
            StatementKind::While { condition, body, end } => self.block(ast.offset, *end, |this| {
                this.condition(*condition);
                this.statement(body);
            }),
            StatementKind::DoWhile { body, condition } => {
                self.statement(body);
                self.expression(condition);
            }
            StatementKind::For {
                init,
                condition,
                increment,
                body,
                end,
            } => self.block(ast.offset, *end, |this| {
                if let Some(init) = init {
                    this.statement(init);
                }
                if let Some(condition) = condition {
                    this.condition(*condition);
                }
                if let Some(increment) = increment {
                    this.expression(increment);
                }
                this.statement(body);
            }),
            StatementKind::RangeFor {
                specifiers,
                declarator,
                range,
                body,
                end,
            } => self.block(ast.offset, *end, |this| {
                let specifiers = this.specifiers(specifiers);
                this.declare(&specifiers, declarator);
                this.expression(range);
                this.statement(body);
            }),
            StatementKind::Switch { condition, body, end } => self.block(ast.offset, *end, |this| {
                this.condition(*condition);
                this.statement(body);
            }),
            StatementKind::Case { value, statements } => {
                if let Some(value) = value {
                    self.expression(value);
                }
                for statement in statements {
                    self.statement(statement);
                }
            }
            StatementKind::Labeled { statement, .. } => self.statement(statement),
            StatementKind::Return(value) => {
                if let Some(value) = value {
                    self.expression(value);
                }
            }
            StatementKind::Break | StatementKind::Continue | StatementKind::Goto(_) => {}
            StatementKind::Try { body, handlers } => {
                self.statement(body);
                for handler in handlers {
                    self.catch_clause(handler);
                }
            }
        }
    }

    fn condition(&mut self, ast: ConditionAst<'_>) {
        match ast {
            ConditionAst::Expression(expression) => {
                self.expression(expression);
            }
            ConditionAst::Declaration(declaration) => self.declaration(declaration),
        }
    }

    /// The exception declaration lives in a block of its own around the
    /// handler body.
    fn catch_clause(&mut self, ast: &CatchClauseAst<'_>) {
        self.block(ast.offset, ast.end, |this| {
            if let Some(parameter) = ast.parameter {
                let specifiers = this.specifiers(&parameter.specifiers);
                if let Some(declarator) = parameter.declarator {
                    this.declare(&specifiers, declarator);
                }
            }
            this.statement(ast.body);
        });
    }
}
