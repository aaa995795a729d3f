mod common;

use pretty_assertions::assert_eq;

use common::{lower, spelling};
use cppmodel_ast::{
    AccessSpecifier, Arena, CoreDeclaratorAst, DeclarationAst, DeclarationKind, ExpressionKind, NameKind,
    ParseOptions, PostfixDeclaratorAst, PtrOperatorAst, SimpleSpecifier, SpecifierAst, SpecifierKind, StatementKind,
    TemplateArgumentAst, TemplateParameterKind, TranslationUnit, parse_file, parse_source,
};
use cppmodel_core::{ClassKey, LiteralTable, OperatorKind};
use cppmodel_error::ErrorKind;

fn simple<'a, 'tcx>(
    declaration: &'a DeclarationAst<'tcx>,
) -> (&'a [&'tcx SpecifierAst<'tcx>], &'a [&'tcx cppmodel_ast::DeclaratorAst<'tcx>]) {
    match &declaration.kind {
        DeclarationKind::Simple {
            specifiers,
            declarators,
        } => (specifiers.as_slice(), declarators.as_slice()),
        other => panic!("expected a simple declaration, got {other:?}"),
    }
}

fn keywords(specifiers: &[&SpecifierAst<'_>]) -> Vec<SimpleSpecifier> {
    specifiers.iter().filter_map(|s| s.simple()).collect()
}

#[test]
fn test_pointer_array_declarator() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(&arena, &literals, "int *p[3];");

    assert_eq!(ast.declarations.len(), 1);
    let (specifiers, declarators) = simple(ast.declarations[0]);
    assert_eq!(keywords(specifiers), vec![SimpleSpecifier::Int]);
    assert_eq!(declarators.len(), 1);
    let declarator = declarators[0];
    assert!(matches!(declarator.ptr_operators.as_slice(), [PtrOperatorAst::Pointer { .. }]));
    assert!(matches!(
        declarator.postfix.as_slice(),
        [PostfixDeclaratorAst::Array { size: Some(_) }]
    ));
    assert_eq!(
        declarator.declarator_id().map(|n| spelling(&literals, n)),
        Some("p".to_string())
    );
}

#[test]
fn test_function_pointer_declarator_nests() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(&arena, &literals, "void (*handler)(int, char);");

    let (specifiers, declarators) = simple(ast.declarations[0]);
    assert_eq!(keywords(specifiers), vec![SimpleSpecifier::Void]);
    let declarator = declarators[0];
    assert!(declarator.ptr_operators.is_empty());
    let function = declarator.function_declarator().expect("function postfix");
    assert_eq!(function.parameters.len(), 2);
    match &declarator.core {
        Some(CoreDeclaratorAst::Nested(inner)) => {
            assert!(matches!(inner.ptr_operators.as_slice(), [PtrOperatorAst::Pointer { .. }]));
        }
        other => panic!("expected a parenthesized declarator, got {other:?}"),
    }
    assert_eq!(
        declarator.declarator_id().map(|n| spelling(&literals, n)),
        Some("handler".to_string())
    );
}

#[test]
fn test_function_definition() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(
        &arena,
        &literals,
        r#"
        int add(int a, int b) {
            return a + b;
        }
        "#,
    );

    let DeclarationKind::FunctionDefinition { declarator, body, .. } = &ast.declarations[0].kind else {
        panic!("expected a function definition");
    };
    let function = declarator.function_declarator().expect("function postfix");
    assert_eq!(function.parameters.len(), 2);
    assert!(!function.is_variadic);

    let Some(body) = body else { panic!("missing body") };
    let StatementKind::Compound { statements, .. } = &body.kind else {
        panic!("expected a compound body");
    };
    match &statements[0].kind {
        StatementKind::Return(Some(value)) => {
            assert!(matches!(value.kind, ExpressionKind::Binary { op: OperatorKind::Plus, .. }));
        }
        other => panic!("expected a return, got {other:?}"),
    }
}

#[test]
fn test_class_members_and_bases() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(
        &arena,
        &literals,
        r#"
        class Widget : public Base {
            int count;
        public:
            void resize(int w) const;
            virtual ~Widget();
        };
        "#,
    );

    let (specifiers, declarators) = simple(ast.declarations[0]);
    assert!(declarators.is_empty());
    let class = specifiers
        .iter()
        .find_map(|s| match s.kind {
            SpecifierKind::Class(class) => Some(class),
            _ => None,
        })
        .expect("class specifier");
    assert_eq!(class.key, ClassKey::Class);
    assert_eq!(class.name.map(|n| spelling(&literals, n)), Some("Widget".to_string()));
    assert_eq!(class.bases.len(), 1);
    assert_eq!(class.bases[0].access, Some(AccessSpecifier::Public));
    assert_eq!(spelling(&literals, class.bases[0].name), "Base");

    assert_eq!(class.members.len(), 4);
    assert!(matches!(
        class.members[1].kind,
        DeclarationKind::Access {
            access: Some(AccessSpecifier::Public),
            ..
        }
    ));

    let (_, resize) = simple(class.members[2]);
    let function = resize[0].function_declarator().expect("function postfix");
    assert_eq!(function.cv, vec![SimpleSpecifier::Const]);

    let (dtor_specifiers, dtor) = simple(class.members[3]);
    assert!(keywords(dtor_specifiers).contains(&SimpleSpecifier::Virtual));
    assert!(matches!(
        dtor[0].declarator_id().map(|n| &n.kind),
        Some(NameKind::Destructor(_))
    ));
    assert!(class.lbrace < class.rbrace);
}

#[test]
fn test_scoped_enum() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(&arena, &literals, "enum class Color : int { Red, Green = 2 };");

    let (specifiers, _) = simple(ast.declarations[0]);
    let SpecifierKind::Enum(enumeration) = specifiers[0].kind else {
        panic!("expected an enum specifier");
    };
    assert!(enumeration.is_scoped);
    assert_eq!(keywords(&enumeration.underlying), vec![SimpleSpecifier::Int]);
    let names: Vec<String> = enumeration
        .enumerators
        .iter()
        .map(|e| literals.spelling(e.name))
        .collect();
    assert_eq!(names, vec!["Red".to_string(), "Green".to_string()]);
    assert!(enumeration.enumerators[0].value.is_none());
    assert!(enumeration.enumerators[1].value.is_some());
}

#[test]
fn test_namespaces_and_using() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(
        &arena,
        &literals,
        r#"
        namespace outer::inner { int x; }
        inline namespace v1 {}
        using namespace std;
        namespace fs = std::filesystem;
        "#,
    );
    assert_eq!(ast.declarations.len(), 4);

    let DeclarationKind::Namespace { name, members, .. } = &ast.declarations[0].kind else {
        panic!("expected a namespace");
    };
    assert_eq!(name.map(|n| spelling(&literals, n)), Some("outer".to_string()));
    let DeclarationKind::Namespace { name, members: inner, .. } = &members[0].kind else {
        panic!("expected a nested namespace");
    };
    assert_eq!(name.map(|n| spelling(&literals, n)), Some("inner".to_string()));
    assert_eq!(inner.len(), 1);

    assert!(matches!(
        ast.declarations[1].kind,
        DeclarationKind::Namespace { is_inline: true, .. }
    ));
    assert!(matches!(ast.declarations[2].kind, DeclarationKind::UsingDirective { .. }));
    match &ast.declarations[3].kind {
        DeclarationKind::NamespaceAlias { alias, target } => {
            assert_eq!(literals.spelling(*alias), "fs");
            assert_eq!(spelling(&literals, target), "filesystem");
        }
        other => panic!("expected a namespace alias, got {other:?}"),
    }
}

#[test]
fn test_template_parameters() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(
        &arena,
        &literals,
        "template <typename T, int N = 3> struct Array { T data[N]; };",
    );

    let DeclarationKind::Template {
        parameters,
        declaration,
        ..
    } = &ast.declarations[0].kind
    else {
        panic!("expected a template declaration");
    };
    assert_eq!(parameters.len(), 2);
    match &parameters[0].kind {
        TemplateParameterKind::Type {
            name,
            is_class,
            is_pack,
            default,
        } => {
            assert_eq!(name.map(|n| literals.spelling(n)), Some("T".to_string()));
            assert!(!is_class && !is_pack && default.is_none());
        }
        other => panic!("expected a type parameter, got {other:?}"),
    }
    match &parameters[1].kind {
        TemplateParameterKind::NonType(parameter) => assert!(parameter.default_value.is_some()),
        other => panic!("expected a non-type parameter, got {other:?}"),
    }

    let (specifiers, _) = simple(declaration.expect("templated declaration"));
    assert!(specifiers.iter().any(|s| matches!(s.kind, SpecifierKind::Class(_))));
}

#[test]
fn test_qualified_template_names() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(&arena, &literals, "std::vector<int>::iterator it;");

    let (specifiers, _) = simple(ast.declarations[0]);
    let SpecifierKind::Named(name) = specifiers[0].kind else {
        panic!("expected a named type");
    };
    let NameKind::Qualified {
        global,
        nested,
        unqualified,
    } = &name.kind
    else {
        panic!("expected a qualified name");
    };
    assert!(!global);
    assert_eq!(nested.len(), 2);
    assert_eq!(spelling(&literals, nested[0]), "std");
    match &nested[1].kind {
        NameKind::TemplateId { arguments, .. } => {
            assert!(matches!(arguments.as_slice(), [TemplateArgumentAst::Type(_)]));
        }
        other => panic!("expected a template-id, got {other:?}"),
    }
    assert_eq!(spelling(&literals, unqualified), "iterator");
}

#[test]
fn test_operator_function_name() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(&arena, &literals, "bool operator==(const A& a, const A& b);");

    let (_, declarators) = simple(ast.declarations[0]);
    assert!(matches!(
        declarators[0].declarator_id().map(|n| &n.kind),
        Some(NameKind::Operator(OperatorKind::EqualEqual))
    ));
    let function = declarators[0].function_declarator().expect("function postfix");
    let parameter = function.parameters[0];
    assert_eq!(keywords(&parameter.specifiers), vec![SimpleSpecifier::Const]);
    assert!(matches!(
        parameter.declarator.map(|d| d.ptr_operators.as_slice()),
        Some([PtrOperatorAst::Reference { rvalue: false }])
    ));
}

#[test]
fn test_statements() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(
        &arena,
        &literals,
        r#"
        void f(int n) {
            for (int i = 0; i < n; ++i) {
                if (i % 2) continue;
            }
            while (n > 0) n--;
            switch (n) { case 1: break; default: break; }
            try { g(); } catch (const E& e) { }
        }
        "#,
    );

    let DeclarationKind::FunctionDefinition { body: Some(body), .. } = &ast.declarations[0].kind else {
        panic!("expected a function definition");
    };
    let StatementKind::Compound { statements, .. } = &body.kind else {
        panic!("expected a compound body");
    };
    assert_eq!(statements.len(), 4);

    match &statements[0].kind {
        StatementKind::For { increment, .. } => assert!(matches!(
            increment.map(|e| &e.kind),
            Some(ExpressionKind::Unary {
                op: OperatorKind::PlusPlus,
                postfix: false,
                ..
            })
        )),
        other => panic!("expected a for loop, got {other:?}"),
    }
    match &statements[1].kind {
        StatementKind::While { body, .. } => assert!(matches!(
            body.kind,
            StatementKind::Expression(Some(expression)) if matches!(
                expression.kind,
                ExpressionKind::Unary { op: OperatorKind::MinusMinus, postfix: true, .. }
            )
        )),
        other => panic!("expected a while loop, got {other:?}"),
    }
    assert!(matches!(statements[2].kind, StatementKind::Switch { .. }));
    match &statements[3].kind {
        StatementKind::Try { handlers, .. } => {
            assert_eq!(handlers.len(), 1);
            assert!(handlers[0].parameter.is_some());
        }
        other => panic!("expected a try block, got {other:?}"),
    }
}

#[test]
fn test_cast_sizeof_and_new() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(
        &arena,
        &literals,
        r#"
        int x = static_cast<int>(3.5) + sizeof(long);
        auto p = new int[4];
        "#,
    );

    let (_, declarators) = simple(ast.declarations[0]);
    match declarators[0].initializer.map(|e| &e.kind) {
        Some(ExpressionKind::Binary { op, lhs, rhs }) => {
            assert_eq!(*op, OperatorKind::Plus);
            assert!(matches!(lhs.kind, ExpressionKind::Cast { .. }));
            assert!(matches!(rhs.kind, ExpressionKind::SizeofType(_)));
        }
        other => panic!("expected a binary initializer, got {other:?}"),
    }

    let (specifiers, declarators) = simple(ast.declarations[1]);
    assert_eq!(keywords(specifiers), vec![SimpleSpecifier::Auto]);
    match declarators[0].initializer.map(|e| &e.kind) {
        Some(ExpressionKind::New { type_id, .. }) => {
            assert_eq!(keywords(&type_id.specifiers), vec![SimpleSpecifier::Int]);
            assert_eq!(type_id.array_sizes.len(), 1);
        }
        other => panic!("expected a new-expression, got {other:?}"),
    }
}

#[test]
fn test_offsets_map_to_lines() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (unit, ast) = lower(&arena, &literals, "int a;\nint b;\n");

    assert_eq!(ast.declarations.len(), 2);
    let location = unit.location(ast.declarations[1].offset);
    assert_eq!((location.line, location.column), (2, 1));
}

fn declared_names(literals: &LiteralTable, ast: &cppmodel_ast::TranslationUnitAst<'_>) -> Vec<String> {
    ast.declarations
        .iter()
        .flat_map(|declaration| simple(declaration).1)
        .filter_map(|declarator| match &declarator.core {
            Some(CoreDeclaratorAst::Id { name, .. }) => Some(spelling(literals, name)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_nesting_beyond_the_ceiling_is_cut() {
    common::init_tracing();
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let source = format!("void f() {}{}\nint after;\n", "{".repeat(600), "}".repeat(600));
    let unit = TranslationUnit::new(&literals, "deep.cpp", source);

    let ast = parse_source(&arena, &unit, &ParseOptions::default()).expect("truncated, not failed");
    assert!(ast.depth_exceeded);
    assert_eq!(ast.declarations.len(), 2);
    assert!(matches!(ast.declarations[0].kind, DeclarationKind::FunctionDefinition { .. }));

    let relaxed = ParseOptions::new().with_max_depth(1_000);
    let ast = parse_source(&arena, &unit, &relaxed).expect("lowering failed");
    assert!(!ast.depth_exceeded);
    assert_eq!(ast.declarations.len(), 2);
}

#[test]
fn test_long_initializer_keeps_sibling_declarations() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let terms: Vec<String> = (0..600).map(|i| format!("a{i}")).collect();
    let source = format!("int y;\nint total = {};\nint z;\n", terms.join(" + "));
    let (_, ast) = lower(&arena, &literals, &source);

    assert!(ast.depth_exceeded);
    assert_eq!(declared_names(&literals, ast), vec!["y", "total", "z"]);
    let (_, declarators) = simple(ast.declarations[1]);
    assert!(matches!(
        declarators[0].initializer.map(|e| &e.kind),
        Some(ExpressionKind::Binary { .. })
    ));
}

#[test]
fn test_cast_shaped_declarator_is_a_declaration() {
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let (_, ast) = lower(&arena, &literals, "int (*q)[3];\nf(1);\n");

    assert!(!ast.depth_exceeded);
    assert_eq!(ast.declarations.len(), 1);
    let (specifiers, declarators) = simple(ast.declarations[0]);
    assert_eq!(keywords(specifiers), vec![SimpleSpecifier::Int]);
    let declarator = declarators[0];
    assert!(declarator.ptr_operators.is_empty());
    assert!(matches!(declarator.postfix[..], [PostfixDeclaratorAst::Array { size: Some(_) }]));
    let Some(CoreDeclaratorAst::Nested(inner)) = &declarator.core else {
        panic!("expected a parenthesized declarator");
    };
    assert!(matches!(inner.ptr_operators[..], [PtrOperatorAst::Pointer { .. }]));
    assert!(inner.postfix.is_empty());
    match &inner.core {
        Some(CoreDeclaratorAst::Id { name, .. }) => assert_eq!(spelling(&literals, name), "q"),
        other => panic!("expected `q`, got {other:?}"),
    }
}

#[test]
fn test_parse_file() {
    common::init_tracing();
    let arena = Arena::default();
    let literals = LiteralTable::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shape.h");
    std::fs::write(&path, "struct Shape { double area; };\n").unwrap();

    let (unit, ast) = parse_file(&arena, &literals, &path, &ParseOptions::default()).unwrap();
    assert_eq!(unit.file_name(), path.display().to_string());
    assert_eq!(ast.declarations.len(), 1);

    let err = parse_file(&arena, &literals, dir.path().join("missing.h"), &ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}
