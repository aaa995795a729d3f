#![allow(dead_code)]

use cppmodel_ast::{
    Arena, CoreDeclaratorAst, DeclarationAst, DeclarationKind, DeclaratorAst, FunctionDeclaratorAst, NameAst,
    NameKind, ParameterAst, ParseOptions, PostfixDeclaratorAst, PtrOperatorAst, SimpleSpecifier, SpecifierAst,
    SpecifierKind, TranslationUnit, TranslationUnitAst, TypeIdAst, parse_source,
};
use cppmodel_bind::{Bind, BindOptions};
use cppmodel_core::{Control, LiteralTable, Overview, SourceLocation, SymbolId};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_test_writer()
        .try_init();
}

/// A bound translation unit.
pub struct Bound {
    pub control: Control,
    pub global: SymbolId,
    pub depth_exceeded: bool,
}

/// Parse `source`, dedented, as `test.cpp` and bind it with default options.
pub fn bind(source: &str) -> Bound {
    bind_with(source, BindOptions::default())
}

pub fn bind_with(source: &str, options: BindOptions) -> Bound {
    init_tracing();
    let literals = LiteralTable::new();
    let arena = Arena::default();
    let unit = TranslationUnit::new(&literals, "test.cpp", textwrap::dedent(source));
    let ast = parse_source(&arena, &unit, &ParseOptions::default()).expect("lowering failed");
    bind_tree(&unit, ast, options)
}

/// Bind a tree built by hand.
pub fn bind_tree(unit: &TranslationUnit, ast: &TranslationUnitAst<'_>, options: BindOptions) -> Bound {
    init_tracing();
    let mut control = Control::with_literals(unit.literals().clone());
    let global = control.new_namespace(SourceLocation::default(), None);
    let mut bind = Bind::with_options(&mut control, unit, options);
    bind.bind_translation_unit(ast, global);
    let depth_exceeded = bind.depth_exceeded();
    Bound {
        control,
        global,
        depth_exceeded,
    }
}

impl Bound {
    /// First member of `scope` spelled `name`.
    pub fn member(&self, scope: SymbolId, name: &str) -> SymbolId {
        let identifier = self.control.identifier(name);
        self.control
            .find_member(scope, identifier)
            .unwrap_or_else(|| panic!("no member `{name}`"))
    }

    pub fn members(&self, scope: SymbolId) -> Vec<SymbolId> {
        self.control.members(scope).to_vec()
    }

    /// The function a member denotes: the member itself for definitions,
    /// the function its type refers to for declarations.
    pub fn function(&self, scope: SymbolId, name: &str) -> SymbolId {
        let member = self.member(scope, name);
        if self.control.symbol(member).is_function() {
            return member;
        }
        self.control
            .type_symbol_id(self.control.symbol_type(member).ty())
            .filter(|f| self.control.symbol(*f).is_function())
            .unwrap_or_else(|| panic!("`{name}` is not a function"))
    }

    pub fn signature(&self, symbol: SymbolId) -> String {
        Overview::new().symbol_signature(&self.control, symbol)
    }

    pub fn signatures(&self, scope: SymbolId) -> Vec<String> {
        self.control.members(scope).iter().map(|m| self.signature(*m)).collect()
    }

    pub fn name_of(&self, symbol: SymbolId) -> String {
        Overview::new().pretty_name(&self.control, self.control.symbol(symbol).name())
    }
}

/// Builds syntax trees by hand for constructs the front end does not parse.
pub struct Tree<'tcx> {
    pub arena: &'tcx Arena<'tcx>,
    pub literals: LiteralTable,
}

impl<'tcx> Tree<'tcx> {
    pub fn new(arena: &'tcx Arena<'tcx>, literals: &LiteralTable) -> Self {
        Self {
            arena,
            literals: literals.clone(),
        }
    }

    pub fn name(&self, spelling: &str) -> &'tcx NameAst<'tcx> {
        self.arena.alloc(NameAst {
            offset: 0,
            kind: NameKind::Simple(self.literals.identifier(spelling)),
        })
    }

    pub fn keyword(&self, specifier: SimpleSpecifier) -> &'tcx SpecifierAst<'tcx> {
        self.arena.alloc(SpecifierAst {
            offset: 0,
            kind: SpecifierKind::Simple(specifier),
        })
    }

    pub fn named(&self, spelling: &str) -> &'tcx SpecifierAst<'tcx> {
        self.arena.alloc(SpecifierAst {
            offset: 0,
            kind: SpecifierKind::Named(self.name(spelling)),
        })
    }

    pub fn id(&self, spelling: &str) -> &'tcx DeclaratorAst<'tcx> {
        self.arena.alloc(DeclaratorAst {
            core: Some(CoreDeclaratorAst::Id {
                name: self.name(spelling),
                is_pack: false,
            }),
            ..Default::default()
        })
    }

    /// `*` with no declarator-id, as in a type-id.
    pub fn abstract_pointer(&self) -> &'tcx DeclaratorAst<'tcx> {
        self.arena.alloc(DeclaratorAst {
            ptr_operators: vec![PtrOperatorAst::Pointer { cv: Vec::new() }],
            ..Default::default()
        })
    }

    /// `name(parameters)`
    pub fn function(&self, spelling: &str, parameters: Vec<&'tcx ParameterAst<'tcx>>) -> &'tcx DeclaratorAst<'tcx> {
        let function = self.arena.alloc(FunctionDeclaratorAst {
            parameters,
            ..Default::default()
        });
        self.arena.alloc(DeclaratorAst {
            core: Some(CoreDeclaratorAst::Id {
                name: self.name(spelling),
                is_pack: false,
            }),
            postfix: vec![PostfixDeclaratorAst::Function(function)],
            ..Default::default()
        })
    }

    pub fn parameter(&self, specifier: SimpleSpecifier, spelling: &str) -> &'tcx ParameterAst<'tcx> {
        self.arena.alloc(ParameterAst {
            specifiers: vec![self.keyword(specifier)],
            declarator: Some(self.id(spelling)),
            ..Default::default()
        })
    }

    pub fn type_id(
        &self,
        specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
        declarator: Option<&'tcx DeclaratorAst<'tcx>>,
    ) -> &'tcx TypeIdAst<'tcx> {
        self.arena.alloc(TypeIdAst {
            offset: 0,
            specifiers,
            declarator,
        })
    }

    pub fn declaration(&self, kind: DeclarationKind<'tcx>) -> &'tcx DeclarationAst<'tcx> {
        self.arena.alloc(DeclarationAst { offset: 0, kind })
    }

    pub fn simple(
        &self,
        specifiers: Vec<&'tcx SpecifierAst<'tcx>>,
        declarators: Vec<&'tcx DeclaratorAst<'tcx>>,
    ) -> &'tcx DeclarationAst<'tcx> {
        self.declaration(DeclarationKind::Simple {
            specifiers,
            declarators,
        })
    }

    pub fn unit(&self, declarations: Vec<&'tcx DeclarationAst<'tcx>>) -> &'tcx TranslationUnitAst<'tcx> {
        self.arena.alloc(TranslationUnitAst {
            declarations,
            end: 0,
            depth_exceeded: false,
        })
    }
}
