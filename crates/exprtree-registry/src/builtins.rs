//! The built-in type set.
//!
//! - Primitives: `void bool char sbyte byte short ushort int uint long ulong
//!   float double string object`
//! - Roots: `ValueType`, `Enum`, `Array`, `Delegate`, `IEnumerable`
//! - Expression-node classes, rooted at `Expression`, plus the generic
//!   `Expression<TDelegate>` definition
//! - Generic delegate shapes `Func`1..Func`5` and `Action..Action`4`

use exprtree_core::{
    MemberEntry, Param, PrimitiveKind, TypeEntry, delegate_shapes, primitives, well_known,
};

use crate::TypeRegistry;

/// Register every primitive, with the members `object` and `string` expose.
pub fn register_primitives(registry: &mut TypeRegistry) {
    for kind in PrimitiveKind::ALL {
        let entry = TypeEntry::primitive(kind);
        let entry = match kind {
            PrimitiveKind::Object => entry
                .with_member(MemberEntry::method("ToString", vec![], primitives::STRING))
                .with_member(MemberEntry::method(
                    "Equals",
                    vec![Param::new("obj", primitives::OBJECT)],
                    primitives::BOOL,
                ))
                .with_member(MemberEntry::method("GetHashCode", vec![], primitives::INT32)),
            PrimitiveKind::String => entry
                .with_member(MemberEntry::property("Length", primitives::INT32).read_only())
                .with_member(MemberEntry::method(
                    "Concat",
                    vec![Param::new("a", primitives::STRING), Param::new("b", primitives::STRING)],
                    primitives::STRING,
                ).as_static())
                .with_member(MemberEntry::operator(
                    "op_Equality",
                    vec![Param::new("a", primitives::STRING), Param::new("b", primitives::STRING)],
                    primitives::BOOL,
                ))
                .with_member(MemberEntry::operator(
                    "op_Inequality",
                    vec![Param::new("a", primitives::STRING), Param::new("b", primitives::STRING)],
                    primitives::BOOL,
                ))
                .with_interface(well_known::ENUMERABLE),
            _ => entry,
        };
        registry.insert(entry);
    }
}

/// Register the whole built-in set.
pub fn register_builtins(registry: &mut TypeRegistry) {
    register_primitives(registry);

    registry.insert(TypeEntry::class("ValueType"));
    registry.insert(TypeEntry::class("Enum").with_base(well_known::VALUE_TYPE));
    registry.insert(
        TypeEntry::class("Array")
            .with_interface(well_known::ENUMERABLE)
            .with_member(MemberEntry::property("Length", primitives::INT32).read_only())
            .with_member(MemberEntry::property("Rank", primitives::INT32).read_only()),
    );
    registry.insert(TypeEntry::class("Delegate"));
    registry.insert(TypeEntry::interface("IEnumerable"));

    register_expression_classes(registry);

    for def in delegate_shapes::FUNC_DEFINITIONS.iter() {
        registry.insert(def.clone());
    }
    for def in delegate_shapes::ACTION_DEFINITIONS.iter() {
        registry.insert(def.clone());
    }
}

fn register_expression_classes(registry: &mut TypeRegistry) {
    registry.insert(TypeEntry::class("Expression"));
    for name in [
        "BinaryExpression",
        "UnaryExpression",
        "ConstantExpression",
        "ParameterExpression",
        "MemberExpression",
        "MethodCallExpression",
        "NewExpression",
        "NewArrayExpression",
        "ConditionalExpression",
        "TypeBinaryExpression",
        "InvocationExpression",
        "ListInitExpression",
        "MemberInitExpression",
        "LambdaExpression",
    ] {
        registry.insert(TypeEntry::class(name).with_base(well_known::EXPRESSION));
    }
    registry.insert(
        TypeEntry::class("Expression`1")
            .with_base(well_known::LAMBDA_EXPRESSION)
            .with_generic_arity(1),
    );
}
