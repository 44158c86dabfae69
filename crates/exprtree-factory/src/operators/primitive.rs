//! Built-in operator fast paths.
//!
//! These never consult members: operand types alone decide.

use exprtree_core::{ExprError, TypeCatalog, TypeHash, primitives};

use super::{BinaryPolicy, OperandRule, OperatorResolution, ResultRule, UnaryPolicy};

/// Try the built-in form of a binary operator.
pub fn try_primitive_binary<C: TypeCatalog + ?Sized>(
    catalog: &C,
    policy: &BinaryPolicy,
    left: TypeHash,
    right: TypeHash,
    lift_to_null: bool,
) -> Result<Option<OperatorResolution>, ExprError> {
    let applies = match policy.operands {
        OperandRule::Identical => left == right && policy.class.admits(catalog, left),
        OperandRule::ShiftCount => policy.class.admits(catalog, left) && catalog.unwrap(right) == primitives::INT32,
    };
    if !applies {
        return Ok(None);
    }

    let is_lifted = catalog.is_optional_wrapped(left);
    let result_type = match policy.result {
        ResultRule::Operand => left,
        ResultRule::Boolean if is_lifted && lift_to_null => catalog.wrap_optional(primitives::BOOL)?,
        ResultRule::Boolean => primitives::BOOL,
    };
    Ok(Some(OperatorResolution::Primitive { result_type, is_lifted }))
}

/// Try the built-in form of a unary operator.
pub fn try_primitive_unary<C: TypeCatalog + ?Sized>(
    catalog: &C,
    policy: &UnaryPolicy,
    operand: TypeHash,
) -> Option<OperatorResolution> {
    policy.class.admits(catalog, operand).then(|| OperatorResolution::Primitive {
        result_type: operand,
        is_lifted: catalog.is_optional_wrapped(operand),
    })
}
