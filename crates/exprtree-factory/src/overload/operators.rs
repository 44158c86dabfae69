//! User-defined operator lookup.
//!
//! Operators are static methods with reserved names (`op_Addition`,
//! `op_UnaryNegation`, `op_True`, ...). Unlike named method lookup, operator
//! names match exactly and only members declared on the searched type count.
//! Open generic and `void` methods are never operators.

use exprtree_core::{ExprError, MemberKinds, MemberRef, TypeCatalog, TypeHash};

use crate::conversion::{is_reference_assignable, non_ref_type};

use super::{OverloadMatch, find_best_match};

/// Find a binary operator `name` for operands of `left` and `right`.
///
/// Searches the unwrapped left type first and, when it yields nothing and the
/// operand types differ, the unwrapped right type.
pub fn find_binary_operator<C: TypeCatalog + ?Sized>(
    catalog: &C,
    name: &str,
    left: TypeHash,
    right: TypeHash,
) -> Result<Option<MemberRef>, ExprError> {
    let left_owner = catalog.unwrap(left);
    if let Some(method) = best_operator(catalog, left_owner, name, &[left, right])? {
        return Ok(Some(method));
    }
    let right_owner = catalog.unwrap(right);
    if left != right && right_owner != left_owner {
        return best_operator(catalog, right_owner, name, &[left, right]);
    }
    Ok(None)
}

/// Find a unary operator `name` for an operand of `operand`.
pub fn find_unary_operator<C: TypeCatalog + ?Sized>(
    catalog: &C,
    name: &str,
    operand: TypeHash,
) -> Result<Option<MemberRef>, ExprError> {
    best_operator(catalog, catalog.unwrap(operand), name, &[operand])
}

/// Find `op_True`/`op_False` for `ty`, walking up the base chain.
pub fn find_boolean_operator<C: TypeCatalog + ?Sized>(catalog: &C, ty: TypeHash, name: &str) -> Option<MemberRef> {
    let mut current = Some(ty);
    while let Some(owner) = current {
        let found = catalog
            .declared_members(owner, MemberKinds::METHOD)
            .into_iter()
            .find(|m| {
                m.is_static
                    && m.name == name
                    && !m.is_generic_definition()
                    && m.params().len() == 1
                    && is_reference_assignable(catalog, m.params()[0].data_type, ty)
            });
        if found.is_some() {
            return found;
        }
        current = catalog.base_type(owner);
    }
    None
}

fn best_operator<C: TypeCatalog + ?Sized>(
    catalog: &C,
    owner: TypeHash,
    name: &str,
    operands: &[TypeHash],
) -> Result<Option<MemberRef>, ExprError> {
    let viable: Vec<_> = catalog
        .declared_members(owner, MemberKinds::METHOD)
        .into_iter()
        .filter(|m| {
            m.is_static
                && m.name == name
                && m.params().len() == operands.len()
                && !m.is_generic_definition()
                && !m.returns_void()
        })
        .filter_map(|m| {
            let mut exact = 0;
            for (param, operand) in m.params().iter().zip(operands) {
                let param = non_ref_type(catalog, param.data_type);
                if param == *operand {
                    exact += 1;
                } else if !is_reference_assignable(catalog, param, *operand) {
                    return None;
                }
            }
            Some(OverloadMatch::new(m, exact))
        })
        .collect();

    if viable.is_empty() {
        return Ok(None);
    }
    tracing::trace!(
        owner = %catalog.type_name(owner),
        operator = name,
        candidates = viable.len(),
        "resolving operator"
    );
    Ok(find_best_match(viable, name, &catalog.type_name(owner))?.map(|m| m.method))
}
