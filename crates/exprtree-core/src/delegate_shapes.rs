//! Generic delegate shapes indexed by arity.
//!
//! `Func<TResult>` through `Func<T1, T2, T3, T4, TResult>` and `Action`
//! through `Action<T1, T2, T3, T4>` are built once per process and never
//! mutated. Synthesizing a delegate type for a parameter/return list picks the
//! definition by arity and closes it through [`TypeCatalog::generic_instance`].

use std::sync::LazyLock;

use crate::catalog::TypeCatalog;
use crate::entries::TypeEntry;
use crate::{ExprError, TypeHash, primitives};

/// Largest number of parameters a synthesized delegate can take.
pub const MAX_DELEGATE_PARAMS: usize = 4;

/// Handles of `Func`1` .. `Func`5`, indexed by type-argument count minus one.
pub const FUNC_HASHES: [TypeHash; MAX_DELEGATE_PARAMS + 1] = [
    TypeHash::from_name("Func`1"),
    TypeHash::from_name("Func`2"),
    TypeHash::from_name("Func`3"),
    TypeHash::from_name("Func`4"),
    TypeHash::from_name("Func`5"),
];

/// Handles of `Action` .. `Action`4`, indexed by type-argument count.
pub const ACTION_HASHES: [TypeHash; MAX_DELEGATE_PARAMS + 1] = [
    TypeHash::from_name("Action"),
    TypeHash::from_name("Action`1"),
    TypeHash::from_name("Action`2"),
    TypeHash::from_name("Action`3"),
    TypeHash::from_name("Action`4"),
];

fn shape(name: String, arity: usize, returns_last: bool) -> TypeEntry {
    let hash = TypeHash::from_name(&name);
    let mut params: Vec<TypeHash> = (0..arity).map(|i| TypeHash::from_generic_param(hash, i)).collect();
    let ret = if returns_last {
        params.pop().unwrap_or(primitives::VOID)
    } else {
        primitives::VOID
    };
    TypeEntry::delegate(name, params, ret).with_generic_arity(arity)
}

/// `Func` definitions, indexed by type-argument count minus one.
pub static FUNC_DEFINITIONS: LazyLock<Vec<TypeEntry>> = LazyLock::new(|| {
    (1..=MAX_DELEGATE_PARAMS + 1)
        .map(|n| shape(format!("Func`{n}"), n, true))
        .collect()
});

/// `Action` definitions, indexed by type-argument count.
pub static ACTION_DEFINITIONS: LazyLock<Vec<TypeEntry>> = LazyLock::new(|| {
    (0..=MAX_DELEGATE_PARAMS)
        .map(|n| {
            let name = if n == 0 { "Action".to_string() } else { format!("Action`{n}") };
            shape(name, n, false)
        })
        .collect()
});

/// Close `Func` over `type_args` (parameter types followed by the result type).
pub fn func_type<C: TypeCatalog + ?Sized>(catalog: &C, type_args: &[TypeHash]) -> Result<TypeHash, ExprError> {
    match type_args.len() {
        0 => Err(ExprError::invalid_shape("Func requires at least a result type")),
        n if n > MAX_DELEGATE_PARAMS + 1 => Err(ExprError::invalid_shape(format!(
            "Func supports at most {} parameters, got {}",
            MAX_DELEGATE_PARAMS,
            n - 1
        ))),
        n => catalog.generic_instance(FUNC_HASHES[n - 1], type_args),
    }
}

/// Close `Action` over `type_args`; zero arguments gives the non-generic `Action`.
pub fn action_type<C: TypeCatalog + ?Sized>(catalog: &C, type_args: &[TypeHash]) -> Result<TypeHash, ExprError> {
    match type_args.len() {
        0 => Ok(ACTION_HASHES[0]),
        n if n > MAX_DELEGATE_PARAMS => Err(ExprError::invalid_shape(format!(
            "Action supports at most {MAX_DELEGATE_PARAMS} parameters, got {n}"
        ))),
        n => catalog.generic_instance(ACTION_HASHES[n], type_args),
    }
}

/// Synthesize a delegate type for `params` returning `return_type`.
pub fn delegate_type<C: TypeCatalog + ?Sized>(
    catalog: &C,
    params: &[TypeHash],
    return_type: TypeHash,
) -> Result<TypeHash, ExprError> {
    if return_type == primitives::VOID {
        action_type(catalog, params)
    } else {
        let mut args = params.to_vec();
        args.push(return_type);
        func_type(catalog, &args)
    }
}
