//! Binary operator resolution.

use exprtree_core::{Expr, ExprError, ExprKind, MemberRef, TypeCatalog, TypeHash, primitives};

use super::primitive::try_primitive_binary;
use super::{BinaryPolicy, OperatorResolution, validate_operator_method};
use crate::conversion::{is_reference_assignable, non_ref_type};
use crate::overload::{find_binary_operator, find_boolean_operator};

/// Resolve the operator `policy` describes for `left` and `right`.
///
/// # Errors
///
/// - [`ExprError::OperatorNotDefined`] when neither a built-in nor a
///   user-defined operator applies
/// - [`ExprError::InvalidShape`] when a user-defined `&&`/`||` operator lacks
///   consistent types or `op_True`/`op_False`
/// - [`ExprError::AmbiguousMatch`] when several user operators tie
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve_binary<C: TypeCatalog + ?Sized>(
    catalog: &C,
    policy: &BinaryPolicy,
    left: &Expr,
    right: &Expr,
    lift_to_null: bool,
) -> Result<OperatorResolution, ExprError> {
    let left_ty = left.static_type();
    let right_ty = right.static_type();

    if let Some(resolution) = try_primitive_binary(catalog, policy, left_ty, right_ty, lift_to_null)? {
        return Ok(resolution);
    }

    if let Some(resolution) = user_operator(catalog, policy, left_ty, right_ty, lift_to_null)? {
        if policy.short_circuit
            && let Some(method) = resolution.method()
        {
            validate_conditional_logic(catalog, policy.kind, method)?;
        }
        return Ok(resolution);
    }

    if policy.reference_equality
        && (has_builtin_equality(catalog, left_ty, right_ty) || is_null_comparison(catalog, left, right))
    {
        let is_lifted = catalog.is_optional_wrapped(left_ty) || catalog.is_optional_wrapped(right_ty);
        let result_type = if is_lifted && lift_to_null {
            catalog.wrap_optional(primitives::BOOL)?
        } else {
            primitives::BOOL
        };
        tracing::trace!(kind = %policy.kind, "reference equality");
        return Ok(OperatorResolution::Primitive { result_type, is_lifted });
    }

    Err(ExprError::binary_operator(
        policy.kind,
        &catalog.type_name(left_ty),
        &catalog.type_name(right_ty),
    ))
}

/// Resolve `policy`'s operator through a caller-supplied `method`.
///
/// # Errors
///
/// - [`ExprError::InvalidShape`] when `method` is not a static, closed,
///   non-void method of two parameters
/// - [`ExprError::TypeMismatch`] when the operands fit the parameters neither
///   directly nor lifted
pub fn resolve_binary_with_method<C: TypeCatalog + ?Sized>(
    catalog: &C,
    policy: &BinaryPolicy,
    left: TypeHash,
    right: TypeHash,
    method: &MemberRef,
    lift_to_null: bool,
) -> Result<OperatorResolution, ExprError> {
    validate_operator_method(method, 2)?;
    let resolution = apply_operator_method(catalog, method, &[left, right], lift_to_null)?.ok_or_else(|| {
        ExprError::type_mismatch(format!(
            "the operands for operator '{}' do not match the parameters of method '{}'",
            policy.kind, method.name
        ))
    })?;
    if policy.short_circuit {
        validate_conditional_logic(catalog, policy.kind, method)?;
    }
    Ok(resolution)
}

/// Check a user-defined `&&`/`||` operator.
///
/// Both parameters and the return type must be the same type, and that type
/// must declare `op_True` and `op_False` returning `bool`.
pub fn validate_conditional_logic<C: TypeCatalog + ?Sized>(
    catalog: &C,
    kind: ExprKind,
    method: &MemberRef,
) -> Result<(), ExprError> {
    let params = method.params();
    let consistent = params.len() == 2
        && params[0].data_type == params[1].data_type
        && method.return_type() == Some(params[0].data_type);
    if !consistent {
        return Err(ExprError::invalid_shape(format!(
            "the user-defined operator method '{}' for operator '{kind}' must have identical parameter and return types",
            method.name
        )));
    }

    let owner = method.declaring_type;
    let is_boolean = |name| {
        find_boolean_operator(catalog, owner, name).is_some_and(|m| m.return_type() == Some(primitives::BOOL))
    };
    if !is_boolean("op_True") || !is_boolean("op_False") {
        return Err(ExprError::invalid_shape(format!(
            "the user-defined operator method '{}' for operator '{kind}' must have associated boolean operators 'op_True' and 'op_False'",
            method.name
        )));
    }
    Ok(())
}

/// Match `operands` against the parameters of an explicit operator method.
///
/// Tries the operand types as given, then (when every operand is optional)
/// their unwrapped forms. A lifted `bool` result stays `bool` unless
/// `lift_to_null` is set.
pub(super) fn apply_operator_method<C: TypeCatalog + ?Sized>(
    catalog: &C,
    method: &MemberRef,
    operands: &[TypeHash],
    lift_to_null: bool,
) -> Result<Option<OperatorResolution>, ExprError> {
    let Some(ret) = method.return_type() else {
        return Ok(None);
    };
    if params_accept(catalog, method, operands) {
        return Ok(Some(OperatorResolution::Method {
            method: method.clone(),
            result_type: ret,
            is_lifted: false,
        }));
    }

    let all_optional = operands.iter().all(|ty| catalog.is_optional_wrapped(*ty));
    if !all_optional || !is_liftable_return(catalog, ret) {
        return Ok(None);
    }
    let unwrapped: Vec<_> = operands.iter().map(|ty| catalog.unwrap(*ty)).collect();
    if !params_accept(catalog, method, &unwrapped) {
        return Ok(None);
    }
    Ok(Some(OperatorResolution::Method {
        method: method.clone(),
        result_type: lifted_result(catalog, ret, lift_to_null)?,
        is_lifted: true,
    }))
}

/// A lifted operator's result: `ret?`, or `bool` without lift-to-null.
pub(super) fn lifted_result<C: TypeCatalog + ?Sized>(
    catalog: &C,
    ret: TypeHash,
    lift_to_null: bool,
) -> Result<TypeHash, ExprError> {
    if ret == primitives::BOOL && !lift_to_null {
        Ok(ret)
    } else {
        catalog.wrap_optional(ret)
    }
}

/// Only non-optional value kinds can be lifted.
pub(super) fn is_liftable_return<C: TypeCatalog + ?Sized>(catalog: &C, ret: TypeHash) -> bool {
    catalog.is_value_kind(ret) && !catalog.is_optional_wrapped(ret)
}

fn params_accept<C: TypeCatalog + ?Sized>(catalog: &C, method: &MemberRef, operands: &[TypeHash]) -> bool {
    let params = method.params();
    params.len() == operands.len()
        && params
            .iter()
            .zip(operands)
            .all(|(p, ty)| is_reference_assignable(catalog, non_ref_type(catalog, p.data_type), *ty))
}

fn user_operator<C: TypeCatalog + ?Sized>(
    catalog: &C,
    policy: &BinaryPolicy,
    left: TypeHash,
    right: TypeHash,
    lift_to_null: bool,
) -> Result<Option<OperatorResolution>, ExprError> {
    if let Some(method) = find_binary_operator(catalog, policy.operator_name, left, right)?
        && let Some(ret) = method.return_type().filter(|ret| *ret != primitives::VOID)
    {
        return Ok(Some(OperatorResolution::Method {
            method,
            result_type: ret,
            is_lifted: false,
        }));
    }

    if !catalog.is_optional_wrapped(left) || !catalog.is_optional_wrapped(right) {
        return Ok(None);
    }
    let (inner_left, inner_right) = (catalog.unwrap(left), catalog.unwrap(right));
    let Some(method) = find_binary_operator(catalog, policy.operator_name, inner_left, inner_right)? else {
        return Ok(None);
    };
    let Some(ret) = method.return_type().filter(|ret| is_liftable_return(catalog, *ret)) else {
        return Ok(None);
    };
    tracing::trace!(kind = %policy.kind, method = %method, "lifted user-defined operator");
    Ok(Some(OperatorResolution::Method {
        method,
        result_type: lifted_result(catalog, ret, lift_to_null)?,
        is_lifted: true,
    }))
}

/// Equality that needs no operator method: reference identity, or
/// identical `bool`, numeric and enumeration types.
fn has_builtin_equality<C: TypeCatalog + ?Sized>(catalog: &C, left: TypeHash, right: TypeHash) -> bool {
    if catalog.is_interface(left) && !catalog.is_value_kind(right) {
        return true;
    }
    if catalog.is_interface(right) && !catalog.is_value_kind(left) {
        return true;
    }
    if catalog.is_reference_kind(left)
        && catalog.is_reference_kind(right)
        && (is_reference_assignable(catalog, left, right) || is_reference_assignable(catalog, right, left))
    {
        return true;
    }
    if left != right {
        return false;
    }
    let inner = catalog.unwrap(left);
    inner == primitives::BOOL
        || catalog.primitive_kind(inner).is_some_and(|k| k.is_numeric())
        || catalog.is_enum(inner)
}

/// A `null` literal compared against an optional.
fn is_null_comparison<C: TypeCatalog + ?Sized>(catalog: &C, left: &Expr, right: &Expr) -> bool {
    let is_null = |e: &Expr| e.value().is_some_and(|v| v.is_null());
    (is_null(left) && catalog.is_optional_wrapped(right.static_type()))
        || (is_null(right) && catalog.is_optional_wrapped(left.static_type()))
}
