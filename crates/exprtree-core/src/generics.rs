//! Generic substitution.
//!
//! Closing a generic type or method replaces each generic parameter
//! placeholder with the corresponding type argument, recursively through
//! optional, array, by-ref and generic-instance types.

use crate::catalog::{ConstructedType, TypeCatalog};
use crate::entries::{GenericInstance, MemberEntry, MemberKind, Param, TypeEntry, TypeKind};
use crate::{ExprError, TypeHash, primitives};

/// Replace every occurrence of `params[i]` in `ty` with `args[i]`.
pub fn substitute<C: TypeCatalog + ?Sized>(
    catalog: &C,
    ty: TypeHash,
    params: &[TypeHash],
    args: &[TypeHash],
) -> Result<TypeHash, ExprError> {
    if let Some(pos) = params.iter().position(|p| *p == ty) {
        return Ok(args[pos]);
    }
    let Some(entry) = catalog.lookup(ty) else {
        return Ok(ty);
    };

    match entry.kind {
        TypeKind::Nullable { inner } => {
            let inner = substitute(catalog, inner, params, args)?;
            catalog.intern(ConstructedType::Nullable(inner))
        }
        TypeKind::Array { element, rank } => {
            let element = substitute(catalog, element, params, args)?;
            catalog.intern(ConstructedType::Array { element, rank })
        }
        TypeKind::ByRef { element } => {
            let element = substitute(catalog, element, params, args)?;
            catalog.intern(ConstructedType::ByRef(element))
        }
        _ => match &entry.generic_instance {
            Some(instance) => {
                let new_args = instance
                    .args
                    .iter()
                    .map(|a| substitute(catalog, *a, params, args))
                    .collect::<Result<Vec<_>, _>>()?;
                if new_args == instance.args {
                    return Ok(ty);
                }
                catalog.intern(ConstructedType::GenericInstance {
                    definition: instance.definition,
                    args: new_args,
                })
            }
            None => Ok(ty),
        },
    }
}

fn substitute_params<C: TypeCatalog + ?Sized>(
    catalog: &C,
    list: &[Param],
    params: &[TypeHash],
    args: &[TypeHash],
) -> Result<Vec<Param>, ExprError> {
    list.iter()
        .map(|p| Ok(Param::new(p.name.clone(), substitute(catalog, p.data_type, params, args)?)))
        .collect()
}

fn substitute_member<C: TypeCatalog + ?Sized>(
    catalog: &C,
    member: &MemberEntry,
    params: &[TypeHash],
    args: &[TypeHash],
) -> Result<MemberEntry, ExprError> {
    let kind = match &member.kind {
        MemberKind::Field {
            field_type,
            is_read_only,
        } => MemberKind::Field {
            field_type: substitute(catalog, *field_type, params, args)?,
            is_read_only: *is_read_only,
        },
        MemberKind::Property {
            property_type,
            can_read,
            can_write,
        } => MemberKind::Property {
            property_type: substitute(catalog, *property_type, params, args)?,
            can_read: *can_read,
            can_write: *can_write,
        },
        MemberKind::Method {
            params: method_params,
            return_type,
            generic_params,
            generic_args,
        } => MemberKind::Method {
            params: substitute_params(catalog, method_params, params, args)?,
            return_type: substitute(catalog, *return_type, params, args)?,
            generic_params: generic_params.clone(),
            generic_args: generic_args.clone(),
        },
        MemberKind::Constructor { params: ctor_params } => MemberKind::Constructor {
            params: substitute_params(catalog, ctor_params, params, args)?,
        },
    };
    Ok(MemberEntry {
        kind,
        ..member.clone()
    })
}

/// Display name of a generic instance: `Func`2` over `int, bool` is `Func<int, bool>`.
pub fn instance_name<C: TypeCatalog + ?Sized>(catalog: &C, definition: &str, args: &[TypeHash]) -> String {
    let stem = definition.split('`').next().unwrap_or(definition);
    let names: Vec<String> = args.iter().map(|a| catalog.type_name(*a)).collect();
    format!("{stem}<{}>", names.join(", "))
}

/// Build the descriptor of `definition` closed over `args`.
pub fn instantiate_type<C: TypeCatalog + ?Sized>(
    catalog: &C,
    definition: &TypeEntry,
    args: &[TypeHash],
) -> Result<TypeEntry, ExprError> {
    check_type_args(catalog, &definition.name, definition.generic_params.len(), args)?;
    let params = &definition.generic_params;
    let hash = TypeHash::from_generic_instance(definition.type_hash, args);

    let base = definition
        .base_type
        .map(|b| substitute(catalog, b, params, args))
        .transpose()?;
    let mut entry = TypeEntry::constructed(
        instance_name(catalog, &definition.name, args),
        hash,
        definition.kind,
        base,
    )
    .with_visibility(definition.visibility);

    for iface in &definition.interfaces {
        entry.interfaces.push(substitute(catalog, *iface, params, args)?);
    }
    for member in &definition.members {
        let closed = substitute_member(catalog, member, params, args)?;
        entry = entry.with_member(closed);
    }
    entry.generic_instance = Some(GenericInstance {
        definition: definition.type_hash,
        args: args.to_vec(),
    });
    Ok(entry)
}

/// Build the descriptor of a generic method definition closed over `args`.
pub fn instantiate_method<C: TypeCatalog + ?Sized>(
    catalog: &C,
    method: &MemberEntry,
    args: &[TypeHash],
) -> Result<MemberEntry, ExprError> {
    if !method.is_generic_definition() {
        return Err(ExprError::invalid_shape(format!(
            "method '{}' is not a generic method definition",
            method.name
        )));
    }
    let params = method.generic_params().to_vec();
    check_type_args(catalog, &method.name, params.len(), args)?;

    let mut closed = substitute_member(catalog, method, &params, args)?;
    if let MemberKind::Method { generic_args, .. } = &mut closed.kind {
        *generic_args = args.to_vec();
    }
    closed.rehash();
    Ok(closed)
}

fn check_type_args<C: TypeCatalog + ?Sized>(
    catalog: &C,
    name: &str,
    expected: usize,
    args: &[TypeHash],
) -> Result<(), ExprError> {
    if expected != args.len() {
        return Err(crate::RegistrationError::GenericArity {
            name: name.to_string(),
            expected,
            got: args.len(),
        }
        .into());
    }
    for arg in args {
        if *arg == primitives::VOID || catalog.is_by_ref(*arg) {
            return Err(ExprError::invalid_shape(format!(
                "type '{}' cannot be used as a type argument",
                catalog.type_name(*arg)
            )));
        }
    }
    Ok(())
}
