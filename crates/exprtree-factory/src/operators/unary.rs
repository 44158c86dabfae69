//! Unary operator resolution.

use exprtree_core::{ExprError, MemberRef, TypeCatalog, TypeHash, primitives};

use super::binary::{apply_operator_method, is_liftable_return};
use super::primitive::try_primitive_unary;
use super::{OperatorResolution, UnaryPolicy, validate_operator_method};
use crate::overload::find_unary_operator;

/// Resolve the operator `policy` describes for an operand of `operand`.
///
/// Each of the policy's operator names is tried in order, first on the
/// operand type as given and then lifted over its unwrapped form.
///
/// # Errors
///
/// [`ExprError::OperatorNotDefined`] when nothing applies.
pub fn resolve_unary<C: TypeCatalog + ?Sized>(
    catalog: &C,
    policy: &UnaryPolicy,
    operand: TypeHash,
) -> Result<OperatorResolution, ExprError> {
    if let Some(resolution) = try_primitive_unary(catalog, policy, operand) {
        return Ok(resolution);
    }

    for name in policy.operator_names {
        if let Some(method) = find_unary_operator(catalog, name, operand)?
            && let Some(ret) = method.return_type().filter(|ret| *ret != primitives::VOID)
        {
            return Ok(OperatorResolution::Method {
                method,
                result_type: ret,
                is_lifted: false,
            });
        }

        if !catalog.is_optional_wrapped(operand) {
            continue;
        }
        if let Some(method) = find_unary_operator(catalog, name, catalog.unwrap(operand))?
            && let Some(ret) = method.return_type().filter(|ret| is_liftable_return(catalog, *ret))
        {
            tracing::trace!(kind = %policy.kind, method = %method, "lifted user-defined operator");
            return Ok(OperatorResolution::Method {
                method,
                result_type: catalog.wrap_optional(ret)?,
                is_lifted: true,
            });
        }
    }

    Err(ExprError::unary_operator(policy.kind, &catalog.type_name(operand)))
}

/// Resolve `policy`'s operator through a caller-supplied `method`.
///
/// # Errors
///
/// - [`ExprError::InvalidShape`] when `method` is not a static, closed,
///   non-void method of one parameter
/// - [`ExprError::TypeMismatch`] when the operand fits the parameter neither
///   directly nor lifted
pub fn resolve_unary_with_method<C: TypeCatalog + ?Sized>(
    catalog: &C,
    policy: &UnaryPolicy,
    operand: TypeHash,
    method: &MemberRef,
) -> Result<OperatorResolution, ExprError> {
    validate_operator_method(method, 1)?;
    apply_operator_method(catalog, method, &[operand], true)?.ok_or_else(|| {
        ExprError::type_mismatch(format!(
            "the operand for operator '{}' does not match the parameter of method '{}'",
            policy.kind, method.name
        ))
    })
}
