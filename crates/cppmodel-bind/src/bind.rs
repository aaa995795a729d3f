use cppmodel_ast::stack::ensure_sufficient_stack;
use cppmodel_ast::{
    DeclarationAst, ExpressionAst, NewTypeIdAst, Offset, StatementAst, TranslationUnit, TranslationUnitAst,
};
use cppmodel_core::{
    Control, FullySpecifiedType, MethodKey, SourceLocation, StringLiteral, SymbolId, Visibility,
};
use tracing::debug;

use crate::options::BindOptions;

/// The binder.
///
/// One `Bind` walks one translation unit, allocating into the borrowed
/// [`Control`]. The control must share the literal table of the
/// [`TranslationUnit`], since identifiers in the tree are interned there.
///
/// State that follows the nesting of the source (current scope, access
/// section, Qt method key, ObjC ivar visibility) is switched for the
/// duration of a closure and restored afterwards.
#[derive(Debug)]
pub struct Bind<'a> {
    pub(crate) control: &'a mut Control,
    pub(crate) unit: &'a TranslationUnit,
    pub(crate) options: BindOptions,
    pub(crate) scope: Option<SymbolId>,
    pub(crate) visibility: Visibility,
    pub(crate) objc_visibility: Visibility,
    pub(crate) method_key: MethodKey,
    depth: usize,
    depth_exceeded: bool,
}

impl<'a> Bind<'a> {
    /// Default nesting ceiling.
    pub const MAX_DEPTH: usize = 100;

    pub fn new(control: &'a mut Control, unit: &'a TranslationUnit) -> Self {
        Self::with_options(control, unit, BindOptions::default())
    }

    pub fn with_options(control: &'a mut Control, unit: &'a TranslationUnit, options: BindOptions) -> Self {
        Self {
            control,
            unit,
            options,
            scope: None,
            visibility: Visibility::Public,
            objc_visibility: Visibility::Protected,
            method_key: MethodKey::Normal,
            depth: 0,
            depth_exceeded: false,
        }
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    pub fn skip_function_bodies(&self) -> bool {
        self.options.skip_function_bodies
    }

    pub fn set_skip_function_bodies(&mut self, skip: bool) {
        self.options.skip_function_bodies = skip;
    }

    /// Whether some part of the input was left unbound because it nested
    /// deeper than the ceiling.
    pub fn depth_exceeded(&self) -> bool {
        self.depth_exceeded
    }

    /// Bind every top-level declaration into `global`.
    #[tracing::instrument(skip_all, fields(file = self.unit.file_name()))]
    pub fn bind_translation_unit(&mut self, ast: &TranslationUnitAst<'_>, global: SymbolId) {
        self.control.set_scope_range(global, 0, ast.end);
        self.with_scope(global, |this| {
            for declaration in &ast.declarations {
                this.declaration(declaration);
            }
        });
        debug!(
            symbols = self.control.symbol_count(),
            members = self.control.members(global).len(),
            "bound translation unit"
        );
    }

    #[tracing::instrument(skip_all, fields(offset = ast.offset))]
    pub fn bind_declaration(&mut self, ast: &DeclarationAst<'_>, scope: SymbolId) {
        self.with_scope(scope, |this| this.declaration(ast));
    }

    #[tracing::instrument(skip_all, fields(offset = ast.offset))]
    pub fn bind_statement(&mut self, ast: &StatementAst<'_>, scope: SymbolId) {
        self.with_scope(scope, |this| this.statement(ast));
    }

    /// The type of `ast`. Only lambdas introduce symbols.
    #[tracing::instrument(skip_all, fields(offset = ast.offset))]
    pub fn bind_expression(&mut self, ast: &ExpressionAst<'_>, scope: SymbolId) -> FullySpecifiedType {
        self.with_scope(scope, |this| this.expression(ast))
    }

    #[tracing::instrument(skip_all, fields(offset = ast.offset))]
    pub fn bind_new_type_id(&mut self, ast: &NewTypeIdAst<'_>, scope: SymbolId) -> FullySpecifiedType {
        self.with_scope(scope, |this| this.new_type_id(ast))
    }

    // ---------------------------------------------------------------------
    // Scoped state
    // ---------------------------------------------------------------------

    pub(crate) fn with_scope<R>(&mut self, scope: SymbolId, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.scope.replace(scope);
        let result = f(self);
        self.scope = previous;
        result
    }

    pub(crate) fn with_visibility<R>(&mut self, visibility: Visibility, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.visibility, visibility);
        let result = f(self);
        self.visibility = previous;
        result
    }

    pub(crate) fn with_method_key<R>(&mut self, method_key: MethodKey, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.method_key, method_key);
        let result = f(self);
        self.method_key = previous;
        result
    }

    pub(crate) fn with_objc_visibility<R>(
        &mut self,
        visibility: Visibility,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let previous = std::mem::replace(&mut self.objc_visibility, visibility);
        let result = f(self);
        self.objc_visibility = previous;
        result
    }

    /// Run `f` one level deeper. At the ceiling `f` is skipped and the
    /// default value stands in for its result.
    pub(crate) fn guarded<R: Default>(&mut self, offset: Offset, f: impl FnOnce(&mut Self) -> R) -> R {
        if self.depth >= self.options.max_depth {
            if !self.depth_exceeded {
                debug!(
                    file = self.unit.file_name(),
                    offset,
                    max_depth = self.options.max_depth,
                    "nesting too deep, not descending"
                );
            }
            self.depth_exceeded = true;
            return R::default();
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(&mut *self));
        self.depth -= 1;
        result
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    pub(crate) fn location(&self, offset: Offset) -> SourceLocation {
        self.unit.location(offset)
    }

    /// Append to the current scope.
    pub(crate) fn add_member(&mut self, member: SymbolId) {
        if let Some(scope) = self.scope {
            self.control.add_member(scope, member);
        }
    }

    /// Visibility for a new member of the current scope. ObjC classes use
    /// their own `@public`/`@protected`/... state.
    pub(crate) fn member_visibility(&self) -> Visibility {
        match self.scope {
            Some(scope) if self.control.symbol(scope).is_objc_class() => self.objc_visibility,
            _ => self.visibility,
        }
    }

    /// Source spelling of an expression, as stored for initializers.
    pub(crate) fn spelled(&self, ast: &ExpressionAst<'_>) -> StringLiteral {
        self.control.string_literal(self.unit.text(ast.offset, ast.end))
    }

    /// The function a declarator type denotes, if it denotes one.
    pub(crate) fn function_of(&self, ty: &FullySpecifiedType) -> Option<SymbolId> {
        self.control
            .type_symbol_id(ty.ty())
            .filter(|sym| self.control.symbol(*sym).is_function())
    }

    pub(crate) fn element_of(&self, ty: &FullySpecifiedType) -> FullySpecifiedType {
        self.control.ty(ty.ty()).element_type().unwrap_or_default()
    }

    pub(crate) fn self_type(&self, symbol: SymbolId) -> FullySpecifiedType {
        FullySpecifiedType::new(self.control.symbol(symbol).self_type())
    }
}
