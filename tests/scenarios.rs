//! End-to-end construction scenarios.
//!
//! Each test registers the types it needs on top of the built-in set and
//! builds complete trees through the public factory.

use exprtree::prelude::*;
use exprtree::{MemberBinding, Visibility};

mod common;

use common::CountingCatalog;

fn registry() -> TypeRegistry {
    TypeRegistry::with_builtins()
}

fn method(registry: &TypeRegistry, owner: TypeHash, name: &str) -> MemberRef {
    registry
        .members(owner, MemberKinds::METHOD)
        .into_iter()
        .find(|m| m.name == name)
        .unwrap_or_else(|| panic!("no method {name}"))
}

/// `Money`, a value type with `+`, `<` and `==` operators.
fn register_money(registry: &mut TypeRegistry) -> TypeHash {
    let money = TypeHash::from_name("Money");
    let pair = || vec![Param::new("a", money), Param::new("b", money)];
    registry
        .register_type(
            TypeEntry::value_type("Money")
                .with_member(MemberEntry::field("Cents", primitives::INT64))
                .with_member(MemberEntry::operator("op_Addition", pair(), money))
                .with_member(MemberEntry::operator("op_LessThan", pair(), primitives::BOOL))
                .with_member(MemberEntry::operator("op_Equality", pair(), primitives::BOOL)),
        )
        .unwrap()
}

// =============================================================================
// Built-in arithmetic
// =============================================================================

#[test]
fn add_two_ints() {
    let r = registry();
    let f = ExprFactory::new(&r);
    let sum = f.add(f.constant(2), f.constant(3)).unwrap();
    assert_eq!(sum.kind(), ExprKind::Add);
    assert_eq!(sum.static_type(), primitives::INT32);
    assert!(sum.method().is_none());
    assert!(!sum.is_lifted());
}

#[test]
fn builtin_arithmetic_queries_no_members() {
    let catalog = CountingCatalog::new(registry());
    let f = ExprFactory::new(&catalog);
    f.add(f.constant(2), f.constant(3)).unwrap();
    let int_opt = catalog.wrap_optional(primitives::INT32).unwrap();
    let n = f.parameter(int_opt, "n").unwrap();
    f.multiply(n.clone(), n).unwrap();
    assert_eq!(catalog.member_queries(), 0);
}

#[test]
fn user_operators_are_looked_up() {
    let mut r = registry();
    let money = register_money(&mut r);
    let catalog = CountingCatalog::new(r);
    let f = ExprFactory::new(&catalog);
    let a = f.parameter(money, "a").unwrap();
    f.add(a.clone(), a).unwrap();
    assert!(catalog.member_queries() > 0);
}

#[test]
fn add_int_and_double_is_not_defined() {
    let r = registry();
    let f = ExprFactory::new(&r);
    let err = f.add(f.constant(2), f.constant(3.0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperatorNotDefined);
}

#[test]
fn and_also_over_optional_bools() {
    let r = registry();
    let f = ExprFactory::new(&r);
    let bool_opt = r.wrap_optional(primitives::BOOL).unwrap();
    let a = f.parameter(bool_opt, "a").unwrap();
    let b = f.parameter(bool_opt, "b").unwrap();
    let both = f.and_also(a, b).unwrap();
    assert_eq!(both.static_type(), bool_opt);
    assert!(both.is_lifted());
    assert!(both.method().is_none());
}

// =============================================================================
// Overload tie-breaks
// =============================================================================

#[test]
fn exact_parameter_match_wins() {
    let mut r = registry();
    let widget = r
        .register_type(
            TypeEntry::class("Widget")
                .with_member(MemberEntry::method(
                    "Foo",
                    vec![Param::new("value", primitives::STRING)],
                    primitives::VOID,
                ))
                .with_member(MemberEntry::method(
                    "Foo",
                    vec![Param::new("value", primitives::OBJECT)],
                    primitives::VOID,
                )),
        )
        .unwrap();
    let f = ExprFactory::new(&r);
    let w = f.parameter(widget, "w").unwrap();
    let call = f.call_named(w, "Foo", &[], vec![f.constant("x")]).unwrap();
    assert_eq!(call.method().unwrap().params()[0].data_type, primitives::STRING);
}

#[test]
fn equally_loose_overloads_are_ambiguous() {
    let mut r = registry();
    let named = r.register_type(TypeEntry::interface("INamed")).unwrap();
    let label = r
        .register_type(TypeEntry::class("Label").with_interface(named))
        .unwrap();
    let widget = r
        .register_type(
            TypeEntry::class("Widget")
                .with_member(MemberEntry::method(
                    "Foo",
                    vec![Param::new("value", primitives::OBJECT)],
                    primitives::VOID,
                ))
                .with_member(MemberEntry::method("Foo", vec![Param::new("value", named)], primitives::VOID)),
        )
        .unwrap();
    let f = ExprFactory::new(&r);
    let w = f.parameter(widget, "w").unwrap();
    let l = f.parameter(label, "l").unwrap();
    let err = f.call_named(w, "Foo", &[], vec![l]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousMatch);
}

#[test]
fn public_overload_beats_exact_private_one() {
    let mut r = registry();
    let widget = r
        .register_type(
            TypeEntry::class("Widget")
                .with_member(
                    MemberEntry::method(
                        "Foo",
                        vec![Param::new("value", primitives::STRING)],
                        primitives::VOID,
                    )
                    .with_visibility(Visibility::Private),
                )
                .with_member(MemberEntry::method(
                    "Foo",
                    vec![Param::new("value", primitives::OBJECT)],
                    primitives::VOID,
                )),
        )
        .unwrap();
    let f = ExprFactory::new(&r);
    let w = f.parameter(widget, "w").unwrap();
    let call = f.call_named(w, "foo", &[], vec![f.constant("x")]).unwrap();
    assert_eq!(call.method().unwrap().params()[0].data_type, primitives::OBJECT);
}

// =============================================================================
// Lifting
// =============================================================================

#[test]
fn lifted_builtin_comparison_honours_lift_to_null() {
    let r = registry();
    let f = ExprFactory::new(&r);
    let int_opt = r.wrap_optional(primitives::INT32).unwrap();
    let a = f.parameter(int_opt, "a").unwrap();
    let b = f.parameter(int_opt, "b").unwrap();

    let plain = f.less_than_lifted(a.clone(), b.clone(), false, None).unwrap();
    assert_eq!(plain.static_type(), primitives::BOOL);
    assert!(plain.is_lifted());
    assert!(!plain.is_lifted_to_null());

    let nullable = f.less_than_lifted(a, b, true, None).unwrap();
    assert_eq!(nullable.static_type(), r.wrap_optional(primitives::BOOL).unwrap());
    assert!(nullable.is_lifted_to_null());
}

#[test]
fn lifted_user_operators() {
    let mut r = registry();
    let money = register_money(&mut r);
    let f = ExprFactory::new(&r);
    let money_opt = r.wrap_optional(money).unwrap();
    let a = f.parameter(money_opt, "a").unwrap();
    let b = f.parameter(money_opt, "b").unwrap();

    let sum = f.add(a.clone(), b.clone()).unwrap();
    assert_eq!(sum.static_type(), money_opt);
    assert_eq!(sum.method().unwrap().name, "op_Addition");
    assert!(sum.is_lifted());

    let less = f.less_than_lifted(a.clone(), b.clone(), false, None).unwrap();
    assert_eq!(less.static_type(), primitives::BOOL);
    let less = f.less_than_lifted(a, b, true, None).unwrap();
    assert_eq!(less.static_type(), r.wrap_optional(primitives::BOOL).unwrap());
}

#[test]
fn user_operator_via_explicit_method() {
    let mut r = registry();
    let money = register_money(&mut r);
    let f = ExprFactory::new(&r);
    let eq = method(&r, money, "op_Equality");
    let a = f.parameter(money, "a").unwrap();
    let b = f.parameter(money, "b").unwrap();
    let same = f.equal_lifted(a, b, false, Some(&eq)).unwrap();
    assert_eq!(same.static_type(), primitives::BOOL);
    assert!(!same.is_lifted());
}

// =============================================================================
// Lambdas
// =============================================================================

#[test]
fn lambda_construction_is_idempotent() {
    let r = registry();
    let f = ExprFactory::new(&r);
    let x = f.parameter(primitives::DOUBLE, "x").unwrap();
    let body = f.multiply(x.clone(), x.clone()).unwrap();
    let shape = func_type(&r, &[primitives::DOUBLE, primitives::DOUBLE]).unwrap();

    let first = f.lambda(shape, body.clone(), vec![x.clone()]).unwrap();
    let second = f.lambda(shape, body, vec![x]).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.kind(), second.kind());
    assert_eq!(first.static_type(), second.static_type());
    assert!(!Expr::ptr_eq(&first, &second));
}

#[test]
fn lambda_over_member_access_and_invoke() {
    let mut r = registry();
    let person = r
        .register_type(
            TypeEntry::class("Person")
                .with_member(MemberEntry::constructor(vec![]))
                .with_member(MemberEntry::property("Age", primitives::INT32))
                .with_member(MemberEntry::field("Name", primitives::STRING)),
        )
        .unwrap();
    let f = ExprFactory::new(&r);

    let p = f.parameter(person, "p").unwrap();
    let adult = f
        .greater_than_or_equal(f.property_named(p.clone(), "age").unwrap(), f.constant(18))
        .unwrap();
    let named = f
        .not_equal(
            f.field_named(p.clone(), "Name").unwrap(),
            f.constant_typed(ConstantValue::Null, primitives::STRING).unwrap(),
        )
        .unwrap();
    assert_eq!(named.method().unwrap().name, "op_Inequality");
    let predicate = f
        .lambda_inferred(f.and_also(adult, named).unwrap(), vec![p])
        .unwrap();
    assert_eq!(
        predicate.static_type(),
        func_type(&r, &[person, primitives::BOOL]).unwrap()
    );

    let someone = f.new_resolved(person, vec![]).unwrap();
    let check = f.invoke(predicate, vec![someone]).unwrap();
    assert_eq!(check.static_type(), primitives::BOOL);
}

// =============================================================================
// Construction and initializers
// =============================================================================

#[test]
fn member_and_list_initializers() {
    let mut r = registry();
    let tags = r
        .register_type(
            TypeEntry::class("Tags")
                .with_interface(well_known::ENUMERABLE)
                .with_member(MemberEntry::constructor(vec![]))
                .with_member(MemberEntry::method(
                    "Add",
                    vec![Param::new("tag", primitives::STRING)],
                    primitives::VOID,
                )),
        )
        .unwrap();
    let post = r
        .register_type(
            TypeEntry::class("Post")
                .with_member(MemberEntry::constructor(vec![]))
                .with_member(MemberEntry::property("Title", primitives::STRING))
                .with_member(MemberEntry::property("Tags", tags).read_only()),
        )
        .unwrap();
    let f = ExprFactory::new(&r);

    let title_prop = r
        .members(post, MemberKinds::PROPERTY)
        .into_iter()
        .find(|m| m.name == "Title")
        .unwrap();
    let tags_prop = r
        .members(post, MemberKinds::PROPERTY)
        .into_iter()
        .find(|m| m.name == "Tags")
        .unwrap();
    let add = method(&r, tags, "Add");

    let title = f.bind(&title_prop, f.constant("hello")).unwrap();
    let rust = f.element_init(&add, vec![f.constant("rust")]).unwrap();
    let tags_binding = f.list_bind(&tags_prop, vec![rust]).unwrap();

    let init = f
        .member_init(f.new_default(post).unwrap(), vec![title, tags_binding])
        .unwrap();
    assert_eq!(init.static_type(), post);
    assert!(matches!(init.bindings()[1], MemberBinding::ListBinding { .. }));

    let list = f
        .list_init(f.new_default(tags).unwrap(), vec![f.constant("a"), f.constant("b")])
        .unwrap();
    assert_eq!(list.initializers().len(), 2);
}

#[test]
fn arrays_and_conditionals() {
    let r = registry();
    let f = ExprFactory::new(&r);
    let values = f
        .new_array_init(primitives::INT32, vec![f.constant(1), f.constant(2), f.constant(3)])
        .unwrap();
    let first = f.array_index(values.clone(), f.constant(0)).unwrap();
    let length = f.array_length(values).unwrap();
    let empty = f.equal(length, f.constant(0)).unwrap();
    let pick = f.condition(empty, f.constant(-1), first).unwrap();
    assert_eq!(pick.static_type(), primitives::INT32);
    assert_eq!(pick.kind(), ExprKind::Conditional);
}

#[test]
fn failed_construction_yields_no_node() {
    let r = registry();
    let f = ExprFactory::new(&r);
    let err = f
        .condition(f.constant(1), f.constant(1), f.constant(2))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidShape);
    let err = f
        .condition(f.constant(true), f.constant(1), f.constant("x"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}
