mod common;

use pretty_assertions::assert_eq;

use common::{Tree, bind_tree};
use cppmodel_ast::{
    AccessSpecifier, Arena, ClassSpecifierAst, DeclarationAst, DeclarationKind, ExpressionAst, ExpressionKind,
    ObjCClassAst, ObjCMessageArgumentAst, ObjCMethodAst, ObjCPropertyAttributeAst, ObjCProtocolAst,
    ObjCSelectorPartAst, QtPropertyAst, QtPropertyItemAst, QtSection, SimpleSpecifier, SpecifierAst, SpecifierKind,
    TranslationUnit, TypeIdAst,
};
use cppmodel_bind::BindOptions;
use cppmodel_core::{
    ClassKey, LiteralTable, MethodKey, ObjCPropertyAttributes, Overview, QtPropertyFlags, Visibility,
};

fn method<'tcx>(
    tree: &Tree<'tcx>,
    is_class_method: bool,
    return_type: Option<&'tcx TypeIdAst<'tcx>>,
    selector: Vec<ObjCSelectorPartAst<'tcx>>,
) -> &'tcx DeclarationAst<'tcx> {
    let method = tree.arena.alloc(ObjCMethodAst {
        offset: 0,
        is_class_method,
        return_type,
        selector,
        is_variadic: false,
        attributes: Vec::new(),
        body: None,
        end: 0,
    });
    tree.declaration(DeclarationKind::ObjCMethod(method))
}

fn expression<'tcx>(tree: &Tree<'tcx>, kind: ExpressionKind<'tcx>) -> &'tcx ExpressionAst<'tcx> {
    tree.arena.alloc(ExpressionAst { offset: 0, end: 0, kind })
}

fn keyword_part<'tcx>(tree: &Tree<'tcx>, name: &str, argument: &str) -> ObjCSelectorPartAst<'tcx> {
    ObjCSelectorPartAst {
        name: Some(tree.literals.identifier(name)),
        argument: Some(ObjCMessageArgumentAst {
            offset: 0,
            type_id: Some(tree.type_id(vec![tree.keyword(SimpleSpecifier::Int)], None)),
            name: tree.literals.identifier(argument),
        }),
    }
}

#[test]
fn test_objc_interface() {
    let literals = LiteralTable::new();
    let arena = Arena::default();
    let tree = Tree::new(&arena, &literals);

    // @interface Counter : NSObject <NSCopying> {
    //     int count;
    // @public
    //     int visible;
    // }
    // - (void)increment;
    // + (Counter *)counterWithValue:(int)value step:(int)step;
    // @property (nonatomic, readonly, getter=isEmpty) BOOL empty;
    // @end
    let int = tree.keyword(SimpleSpecifier::Int);
    let instance_variables = vec![
        tree.simple(vec![int], vec![tree.id("count")]),
        tree.declaration(DeclarationKind::ObjCVisibility(Visibility::Public)),
        tree.simple(vec![int], vec![tree.id("visible")]),
    ];
    let increment = method(
        &tree,
        false,
        Some(tree.type_id(vec![tree.keyword(SimpleSpecifier::Void)], None)),
        vec![ObjCSelectorPartAst {
            name: Some(literals.identifier("increment")),
            argument: None,
        }],
    );
    let factory = method(
        &tree,
        true,
        Some(tree.type_id(vec![tree.named("Counter")], Some(tree.abstract_pointer()))),
        vec![keyword_part(&tree, "counterWithValue", "value"), keyword_part(&tree, "step", "step")],
    );
    let property = tree.declaration(DeclarationKind::ObjCProperty {
        attributes: vec![
            ObjCPropertyAttributeAst {
                name: literals.identifier("nonatomic"),
                method: None,
            },
            ObjCPropertyAttributeAst {
                name: literals.identifier("readonly"),
                method: None,
            },
            ObjCPropertyAttributeAst {
                name: literals.identifier("getter"),
                method: Some(tree.name("isEmpty")),
            },
        ],
        specifiers: vec![tree.named("BOOL")],
        declarators: vec![tree.id("empty")],
    });
    let class = arena.alloc(ObjCClassAst {
        offset: 0,
        is_interface: true,
        name: tree.name("Counter"),
        category: None,
        superclass: Some(tree.name("NSObject")),
        protocols: vec![tree.name("NSCopying")],
        instance_variables,
        members: vec![increment, factory, property],
        end: 0,
    });
    let forward = tree.declaration(DeclarationKind::ObjCClassForward {
        names: vec![(0, literals.identifier("Model")), (0, literals.identifier("View"))],
    });
    let ast = tree.unit(vec![forward, tree.declaration(DeclarationKind::ObjCClass(class))]);
    let unit = TranslationUnit::new(&literals, "counter.m", "");

    let bound = bind_tree(&unit, ast, BindOptions::default());
    let ctl = &bound.control;
    assert_eq!(
        bound.signatures(bound.global),
        vec!["@class Model;", "@class View;", "@interface Counter"]
    );

    let counter = bound.member(bound.global, "Counter");
    let data = ctl.symbol(counter).as_objc_class().expect("objc class");
    assert!(!data.is_category());
    let base = data.base_class.expect("superclass");
    assert_eq!(bound.name_of(base), "NSObject");
    assert_eq!(ctl.symbol(base).enclosing_scope(), Some(counter));
    let protocols: Vec<_> = data.protocols().iter().map(|p| bound.name_of(*p)).collect();
    assert_eq!(protocols, vec!["NSCopying"]);

    assert_eq!(
        bound.signatures(counter),
        vec![
            "int count",
            "int visible",
            "-(void)increment",
            "+(Counter *)counterWithValue:step:",
            "BOOL empty",
        ]
    );
    let visibility: Vec<_> = bound
        .members(counter)
        .iter()
        .map(|m| ctl.symbol(*m).visibility)
        .collect();
    assert_eq!(
        visibility,
        vec![
            Visibility::Protected,
            Visibility::Public,
            Visibility::Public,
            Visibility::Public,
            Visibility::Public,
        ]
    );

    let factory = bound.member(counter, "counterWithValue");
    assert!(ctl.symbol(factory).as_objc_method().is_some_and(|m| m.is_class_method));
    assert_eq!(bound.signatures(factory), vec!["int value", "int step"]);

    let empty = bound.member(counter, "empty");
    let property = ctl.symbol(empty).as_objc_property().expect("property");
    assert_eq!(
        property.attributes,
        ObjCPropertyAttributes::NONATOMIC | ObjCPropertyAttributes::READONLY | ObjCPropertyAttributes::GETTER
    );
    assert_eq!(Overview::new().pretty_name(ctl, property.getter_name), "isEmpty");
    assert_eq!(property.setter_name, None);
}

#[test]
fn test_objc_protocol_and_category() {
    let literals = LiteralTable::new();
    let arena = Arena::default();
    let tree = Tree::new(&arena, &literals);

    let area = method(
        &tree,
        false,
        Some(tree.type_id(vec![tree.keyword(SimpleSpecifier::Double)], None)),
        vec![ObjCSelectorPartAst {
            name: Some(literals.identifier("area")),
            argument: None,
        }],
    );
    let protocol = arena.alloc(ObjCProtocolAst {
        offset: 0,
        name: tree.name("Shape"),
        protocols: vec![tree.name("NSObject")],
        members: vec![area],
        end: 0,
    });
    let untyped = method(
        &tree,
        false,
        None,
        vec![ObjCSelectorPartAst {
            name: Some(literals.identifier("copy")),
            argument: None,
        }],
    );
    let category = arena.alloc(ObjCClassAst {
        offset: 0,
        is_interface: false,
        name: tree.name("Circle"),
        category: Some(tree.name("Drawing")),
        superclass: None,
        protocols: Vec::new(),
        instance_variables: Vec::new(),
        members: vec![untyped],
        end: 0,
    });
    let ast = tree.unit(vec![
        tree.declaration(DeclarationKind::ObjCProtocol(protocol)),
        tree.declaration(DeclarationKind::ObjCProtocolForward {
            names: vec![(0, literals.identifier("Printable"))],
        }),
        tree.declaration(DeclarationKind::ObjCClass(category)),
    ]);
    let unit = TranslationUnit::new(&literals, "shape.m", "");

    let bound = bind_tree(&unit, ast, BindOptions::default());
    let ctl = &bound.control;
    assert_eq!(
        bound.signatures(bound.global),
        vec!["@protocol Shape", "@protocol Printable;", "@implementation Circle"]
    );

    let shape = bound.member(bound.global, "Shape");
    assert_eq!(bound.signatures(shape), vec!["-(double)area"]);
    let adopted = ctl.symbol(shape).as_objc_protocol().expect("protocol").protocols();
    assert_eq!(adopted.len(), 1);

    let circle = bound.member(bound.global, "Circle");
    let data = ctl.symbol(circle).as_objc_class().expect("objc class");
    assert!(data.is_category());
    assert_eq!(Overview::new().pretty_name(ctl, data.category_name), "Drawing");
    assert_eq!(bound.signatures(circle), vec!["-(id)copy"]);
}

#[test]
fn test_qt_sections_and_properties() {
    let literals = LiteralTable::new();
    let arena = Arena::default();
    let tree = Tree::new(&arena, &literals);

    // class Player : public QObject {
    //     Q_PROPERTY(int volume READ volume WRITE setVolume DESIGNABLE false)
    //     Q_ENUMS(State)
    //     Q_FLAGS(Options)
    // public:
    //     Q_INVOKABLE void play();
    // signals:
    //     void volumeChanged(int volume);
    // public slots:
    //     void stop();
    // private:
    //     void reset();
    // };
    let item = |name: &str, value| QtPropertyItemAst {
        name: literals.identifier(name),
        value,
    };
    let property = arena.alloc(QtPropertyAst {
        offset: 0,
        type_id: tree.type_id(vec![tree.keyword(SimpleSpecifier::Int)], None),
        name: literals.identifier("volume"),
        items: vec![
            item("READ", Some(expression(&tree, ExpressionKind::Id(tree.name("volume"))))),
            item("WRITE", Some(expression(&tree, ExpressionKind::Id(tree.name("setVolume"))))),
            item("DESIGNABLE", Some(expression(&tree, ExpressionKind::BoolLiteral(false)))),
        ],
    });
    let access = |access, section| tree.declaration(DeclarationKind::Access { access, section });
    let void = tree.keyword(SimpleSpecifier::Void);
    let members = vec![
        tree.declaration(DeclarationKind::QtProperty(property)),
        tree.declaration(DeclarationKind::QtEnums {
            names: vec![tree.name("State")],
            is_flags: false,
        }),
        tree.declaration(DeclarationKind::QtEnums {
            names: vec![tree.name("Options")],
            is_flags: true,
        }),
        access(Some(AccessSpecifier::Public), QtSection::None),
        tree.simple(
            vec![tree.keyword(SimpleSpecifier::QtInvokable), void],
            vec![tree.function("play", Vec::new())],
        ),
        access(None, QtSection::Signals),
        tree.simple(
            vec![void],
            vec![tree.function("volumeChanged", vec![tree.parameter(SimpleSpecifier::Int, "volume")])],
        ),
        access(Some(AccessSpecifier::Public), QtSection::Slots),
        tree.simple(vec![void], vec![tree.function("stop", Vec::new())]),
        access(Some(AccessSpecifier::Private), QtSection::None),
        tree.simple(vec![void], vec![tree.function("reset", Vec::new())]),
    ];
    let class = arena.alloc(ClassSpecifierAst {
        offset: 0,
        key: ClassKey::Class,
        name: Some(tree.name("Player")),
        attributes: Vec::new(),
        is_final: false,
        bases: Vec::new(),
        members,
        lbrace: 0,
        rbrace: 0,
    });
    let specifier: &SpecifierAst<'_> = arena.alloc(SpecifierAst {
        offset: 0,
        kind: SpecifierKind::Class(class),
    });
    let ast = tree.unit(vec![tree.simple(vec![specifier], Vec::new())]);
    let unit = TranslationUnit::new(&literals, "player.h", "");

    let bound = bind_tree(&unit, ast, BindOptions::default());
    let ctl = &bound.control;
    let player = bound.member(bound.global, "Player");
    assert_eq!(
        bound.signatures(player),
        vec![
            "Q_PROPERTY(int volume)",
            "Q_ENUM(State)",
            "void play()",
            "void volumeChanged(int volume)",
            "void stop()",
            "void reset()",
        ]
    );

    let volume = bound.member(player, "volume");
    let flags = ctl.symbol(volume).as_qt_property().expect("property").flags;
    assert_eq!(
        flags,
        QtPropertyFlags::READ | QtPropertyFlags::WRITE | QtPropertyFlags::SCRIPTABLE | QtPropertyFlags::STORED
    );
    assert!(ctl.symbol(bound.member(player, "State")).is_qt_enum());

    let methods: Vec<_> = ["play", "volumeChanged", "stop", "reset"]
        .into_iter()
        .map(|name| {
            let function = bound.function(player, name);
            let key = ctl.symbol(function).as_function().expect("function").method_key;
            (name, key, ctl.symbol(function).visibility)
        })
        .collect();
    assert_eq!(
        methods,
        vec![
            ("play", MethodKey::Invokable, Visibility::Public),
            ("volumeChanged", MethodKey::Signal, Visibility::Protected),
            ("stop", MethodKey::Slot, Visibility::Public),
            ("reset", MethodKey::Normal, Visibility::Private),
        ]
    );
}
