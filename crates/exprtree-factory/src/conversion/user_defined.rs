//! User-defined conversions.
//!
//! A conversion operator is a static `op_Implicit` or `op_Explicit` method
//! taking exactly the source type and returning exactly the target type. It
//! is looked up on the source type first, then on the target type; when
//! either side is optional-wrapped a lifted operator over the unwrapped types
//! is tried last.

use exprtree_core::{MemberKinds, MemberRef, TypeCatalog, TypeHash};

/// Name of implicit conversion operators.
pub const OP_IMPLICIT: &str = "op_Implicit";

/// Name of explicit conversion operators.
pub const OP_EXPLICIT: &str = "op_Explicit";

/// A resolved conversion operator.
#[derive(Debug, Clone, PartialEq)]
pub struct UserConversion {
    /// The static operator method.
    pub method: MemberRef,
    /// Whether the operator was found over the unwrapped types.
    pub is_lifted: bool,
}

/// Check if `member` is a conversion operator admissible in this context.
pub fn is_conversion_operator(member: &MemberRef, implicit_only: bool) -> bool {
    member.is_static
        && member.is_method()
        && (member.name == OP_IMPLICIT || (!implicit_only && member.name == OP_EXPLICIT))
}

/// Find a user-defined conversion from `from` to `to`.
pub fn find_user_conversion<C: TypeCatalog + ?Sized>(
    catalog: &C,
    from: TypeHash,
    to: TypeHash,
    implicit_only: bool,
) -> Option<UserConversion> {
    let nn_from = catalog.unwrap(from);
    let nn_to = catalog.unwrap(to);
    let from_ops = catalog.declared_members(nn_from, MemberKinds::METHOD);
    let to_ops = catalog.declared_members(nn_to, MemberKinds::METHOD);

    let found = find_operator(&from_ops, from, to, implicit_only)
        .or_else(|| find_operator(&to_ops, from, to, implicit_only));
    if let Some(method) = found {
        return Some(UserConversion {
            method,
            is_lifted: false,
        });
    }

    if nn_from != from || nn_to != to {
        let lifted = find_operator(&from_ops, nn_from, nn_to, implicit_only)
            .or_else(|| find_operator(&to_ops, nn_from, nn_to, implicit_only));
        if let Some(method) = lifted {
            tracing::trace!(
                from = %catalog.type_name(from),
                to = %catalog.type_name(to),
                method = %method.name,
                "lifted conversion operator"
            );
            return Some(UserConversion { method, is_lifted: true });
        }
    }

    None
}

fn find_operator(candidates: &[MemberRef], from: TypeHash, to: TypeHash, implicit_only: bool) -> Option<MemberRef> {
    candidates
        .iter()
        .filter(|m| is_conversion_operator(m, implicit_only))
        .find(|m| {
            m.return_type() == Some(to) && m.params().len() == 1 && m.params()[0].data_type == from
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use exprtree_core::{MemberEntry, Param, TypeEntry, primitives};
    use exprtree_registry::TypeRegistry;

    use super::*;

    fn registry() -> (TypeRegistry, TypeHash) {
        let mut r = TypeRegistry::with_builtins();
        let money = TypeHash::from_name("Money");
        r.register_type(
            TypeEntry::value_type("Money")
                .with_member(MemberEntry::operator(
                    OP_IMPLICIT,
                    vec![Param::new("value", primitives::INT32)],
                    money,
                ))
                .with_member(MemberEntry::operator(
                    OP_EXPLICIT,
                    vec![Param::new("value", money)],
                    primitives::DOUBLE,
                )),
        )
        .unwrap();
        (r, money)
    }

    #[test]
    fn finds_operator_on_target() {
        let (r, money) = registry();
        let conv = find_user_conversion(&r, primitives::INT32, money, true).unwrap();
        assert_eq!(conv.method.name, OP_IMPLICIT);
        assert!(!conv.is_lifted);
    }

    #[test]
    fn explicit_needs_permission() {
        let (r, money) = registry();
        assert!(find_user_conversion(&r, money, primitives::DOUBLE, true).is_none());
        let conv = find_user_conversion(&r, money, primitives::DOUBLE, false).unwrap();
        assert_eq!(conv.method.name, OP_EXPLICIT);
    }

    #[test]
    fn lifts_over_optional() {
        let (r, money) = registry();
        let int_opt = r.wrap_optional(primitives::INT32).unwrap();
        let money_opt = r.wrap_optional(money).unwrap();
        let conv = find_user_conversion(&r, int_opt, money_opt, true).unwrap();
        assert!(conv.is_lifted);
    }

    #[test]
    fn signature_must_match_exactly() {
        let (r, money) = registry();
        assert!(find_user_conversion(&r, primitives::INT64, money, false).is_none());
    }
}
