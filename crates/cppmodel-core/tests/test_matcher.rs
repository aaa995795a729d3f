use pretty_assertions::assert_eq;

use cppmodel_core::{
    Control, DefaultMatcher, FloatKind, FullySpecifiedType, IntegerKind, Matcher, OperatorKind,
    SafeMatcher, SourceLocation, TemplateArgument, TypeId, TypeMatcher,
};

fn int(ctl: &Control) -> FullySpecifiedType {
    FullySpecifiedType::new(ctl.integer_type(IntegerKind::Int))
}

fn function(ctl: &mut Control, ret: FullySpecifiedType, args: &[FullySpecifiedType]) -> TypeId {
    let f = ctl.new_function(SourceLocation::default(), None);
    if let Some(data) = ctl.symbol_mut(f).as_function_mut() {
        data.return_type = ret;
    }
    for ty in args {
        let arg = ctl.new_argument(SourceLocation::default(), None);
        ctl.set_symbol_type(arg, *ty);
        ctl.add_member(f, arg);
    }
    ctl.symbol_type(f).ty()
}

#[test]
fn test_reflexivity() {
    let mut ctl = Control::new();
    let i = int(&ctl);
    let p = ctl.pointer_type(i);
    let r = ctl.reference_type(i, false);
    let a = ctl.array_type(i, 4);
    let x = ctl.name_from_str("X");
    let m = ctl.pointer_to_member_type(x, i);
    let n = ctl.named_type(x);
    let class = ctl.new_class(SourceLocation::default(), Some(x));
    let class_ty = ctl.symbol_type(class).ty();

    for ty in [TypeId::UNDEFINED, ctl.void_type(), i.ty(), p, r, a, m, n, class_ty] {
        assert!(DefaultMatcher.match_type(&ctl, ty, ty));
        assert!(TypeMatcher.match_type(&ctl, ty, ty));
        assert!(SafeMatcher::new().match_type(&ctl, ty, ty));
    }

    let plus = ctl.operator_name_id(OperatorKind::Plus);
    let dtor = ctl.destructor_name_id(x);
    let q = ctl.qualified_name_id(None, x);
    for name in [x, plus, dtor, q] {
        assert!(DefaultMatcher.match_name(&ctl, name, name));
        assert!(SafeMatcher::new().match_name(&ctl, name, name));
    }
}

#[test]
fn test_pointer_reference_array_structure() {
    let mut ctl = Control::new();
    let i = int(&ctl);
    let p1 = ctl.pointer_type(i);
    let p2 = ctl.pointer_type(i);
    assert!(DefaultMatcher.match_type(&ctl, p1, p2));

    let a3 = ctl.array_type(i, 3);
    let a3b = ctl.array_type(i, 3);
    let a4 = ctl.array_type(i, 4);
    assert!(DefaultMatcher.match_type(&ctl, a3, a3b));
    assert!(!DefaultMatcher.match_type(&ctl, a3, a4));

    let lref = ctl.reference_type(i, false);
    let lref2 = ctl.reference_type(i, false);
    let rref = ctl.reference_type(i, true);
    assert!(DefaultMatcher.match_type(&ctl, lref, lref2));
    assert!(!DefaultMatcher.match_type(&ctl, lref, rref));

    let d = FullySpecifiedType::new(ctl.float_type(FloatKind::Double));
    let pd = ctl.pointer_type(d);
    assert!(!DefaultMatcher.match_type(&ctl, p1, pd));
    assert!(!DefaultMatcher.match_type(&ctl, p1, lref));
}

#[test]
fn test_element_qualifiers_are_compared() {
    let mut ctl = Control::new();
    let i = int(&ctl);
    let mut ci = i;
    ci.set_const(true);
    let mut si = i;
    si.set_static(true);
    let p = ctl.pointer_type(i);
    let pc = ctl.pointer_type(ci);
    let ps = ctl.pointer_type(si);
    assert!(!DefaultMatcher.match_type(&ctl, p, pc));
    assert!(DefaultMatcher.match_type(&ctl, p, ps));
}

#[test]
fn test_named_types_match_by_name() {
    let mut ctl = Control::new();
    let std = ctl.name_from_str("std");
    let string = ctl.name_from_str("string");
    let q1 = ctl.qualified_name_id(Some(std), string);
    let q2 = ctl.qualified_name_id(Some(std), string);
    let global = ctl.qualified_name_id(None, string);
    let n1 = ctl.named_type(q1);
    let n2 = ctl.named_type(q2);
    let n3 = ctl.named_type(global);
    assert!(DefaultMatcher.match_type(&ctl, n1, n2));
    assert!(!DefaultMatcher.match_type(&ctl, n1, n3));

    let vector = ctl.identifier("vector");
    let i = int(&ctl);
    let d = FullySpecifiedType::new(ctl.float_type(FloatKind::Double));
    let vi1 = ctl.template_name_id(vector, false, vec![TemplateArgument::new(i)]);
    let vi2 = ctl.template_name_id(vector, false, vec![TemplateArgument::new(i)]);
    let vd = ctl.template_name_id(vector, false, vec![TemplateArgument::new(d)]);
    let v_empty = ctl.template_name_id(vector, false, Vec::new());
    assert!(DefaultMatcher.match_name(&ctl, vi1, vi2));
    assert!(!DefaultMatcher.match_name(&ctl, vi1, vd));
    assert!(!DefaultMatcher.match_name(&ctl, vi1, v_empty));
}

#[test]
fn test_optional_names() {
    let mut ctl = Control::new();
    let x = ctl.name_from_str("x");
    assert!(DefaultMatcher.match_opt_name(&ctl, None, None));
    assert!(!DefaultMatcher.match_opt_name(&ctl, Some(x), None));
    assert!(!DefaultMatcher.match_opt_name(&ctl, None, Some(x)));
}

#[test]
fn test_selectors() {
    let mut ctl = Control::new();
    let set_x = ctl.name_from_str("setX");
    let y = ctl.name_from_str("y");
    let s1 = ctl.selector_name_id(&[set_x, y], true);
    let s2 = ctl.selector_name_id(&[set_x, y], true);
    let s3 = ctl.selector_name_id(&[set_x, y], false);
    let s4 = ctl.selector_name_id(&[set_x], true);
    assert!(DefaultMatcher.match_name(&ctl, s1, s2));
    assert!(!DefaultMatcher.match_name(&ctl, s1, s3));
    assert!(!DefaultMatcher.match_name(&ctl, s1, s4));
}

#[test]
fn test_classes_match_only_on_identity() {
    let mut ctl = Control::new();
    let name = ctl.name_from_str("Point");
    let field = ctl.name_from_str("x");
    let mut classes = Vec::new();
    for _ in 0..2 {
        let class = ctl.new_class(SourceLocation::default(), Some(name));
        let decl = ctl.new_declaration(SourceLocation::default(), Some(field));
        let i = int(&ctl);
        ctl.set_symbol_type(decl, i);
        ctl.add_member(class, decl);
        classes.push(ctl.symbol_type(class).ty());
    }
    let (a, b) = (classes[0], classes[1]);
    assert!(!DefaultMatcher.match_type(&ctl, a, b));
    assert!(!TypeMatcher.match_type(&ctl, a, b));
    assert!(!SafeMatcher::new().match_type(&ctl, a, b));
    assert!(DefaultMatcher.match_type(&ctl, a, a));

    let pa = ctl.pointer_type(FullySpecifiedType::new(a));
    let pa2 = ctl.pointer_type(FullySpecifiedType::new(a));
    let pb = ctl.pointer_type(FullySpecifiedType::new(b));
    assert!(DefaultMatcher.match_type(&ctl, pa, pa2));
    assert!(!DefaultMatcher.match_type(&ctl, pa, pb));
}

#[test]
fn test_symbol_kinds_never_cross_match() {
    let mut ctl = Control::new();
    let class = ctl.new_class(SourceLocation::default(), None);
    let enumeration = ctl.new_enum(SourceLocation::default(), None);
    let function = ctl.new_function(SourceLocation::default(), None);
    let (c, e, f) = (
        ctl.symbol_type(class).ty(),
        ctl.symbol_type(enumeration).ty(),
        ctl.symbol_type(function).ty(),
    );
    assert!(!TypeMatcher.match_type(&ctl, c, e));
    assert!(!TypeMatcher.match_type(&ctl, c, f));
    assert!(!TypeMatcher.match_type(&ctl, f, e));
}

#[test]
fn test_function_types() {
    let mut ctl = Control::new();
    let i = int(&ctl);
    let void = FullySpecifiedType::new(ctl.void_type());
    let d = FullySpecifiedType::new(ctl.float_type(FloatKind::Double));
    let f1 = function(&mut ctl, void, &[i]);
    let f2 = function(&mut ctl, void, &[i]);
    let f3 = function(&mut ctl, i, &[i]);
    let f4 = function(&mut ctl, void, &[d]);

    assert!(!DefaultMatcher.match_type(&ctl, f1, f2));
    assert!(TypeMatcher.match_type(&ctl, f1, f2));
    assert!(!TypeMatcher.match_type(&ctl, f1, f3));
    assert!(!TypeMatcher.match_type(&ctl, f1, f4));

    let p1 = ctl.pointer_type(FullySpecifiedType::new(f1));
    let p2 = ctl.pointer_type(FullySpecifiedType::new(f2));
    assert!(TypeMatcher.match_type(&ctl, p1, p2));
    assert!(SafeMatcher::new().match_type(&ctl, p1, p2));
}

#[test]
fn test_safe_matcher_terminates_on_cycles() {
    let mut ctl = Control::new();
    let node = ctl.identifier("Node");

    // Node<Node<...>>: each template-id's single argument names itself.
    let mut cyclic = Vec::new();
    for _ in 0..2 {
        let name = ctl.template_name_id(node, false, Vec::new());
        let named = FullySpecifiedType::new(ctl.named_type(name));
        ctl.set_template_arguments(name, vec![TemplateArgument::new(named)]);
        cyclic.push((name, named.ty()));
    }
    let ((n1, t1), (n2, t2)) = (cyclic[0], cyclic[1]);

    let mut safe = SafeMatcher::new();
    let by_name = safe.match_name(&ctl, n1, n2);
    assert!(safe.is_idle());
    let by_type = safe.match_type(&ctl, t1, t2);
    assert!(safe.is_idle());
    assert_eq!(by_name, by_type);
    assert!(!by_name);

    assert!(safe.match_name(&ctl, n1, n1));
    assert!(safe.match_type(&ctl, t1, t1));
}

#[test]
fn test_safe_matcher_agrees_on_acyclic_input() {
    let mut ctl = Control::new();
    let i = int(&ctl);
    let name = ctl.name_from_str("T");
    let n = FullySpecifiedType::new(ctl.named_type(name));
    let p1 = ctl.pointer_type(n);
    let p2 = ctl.pointer_type(n);
    let r1 = ctl.reference_type(FullySpecifiedType::new(p1), true);
    let r2 = ctl.reference_type(FullySpecifiedType::new(p2), true);
    let pi = ctl.pointer_type(i);

    let mut safe = SafeMatcher::new();
    for (a, b) in [(r1, r2), (p1, p2), (p1, pi), (r1, p1)] {
        assert_eq!(safe.match_type(&ctl, a, b), DefaultMatcher.match_type(&ctl, a, b));
    }
}
