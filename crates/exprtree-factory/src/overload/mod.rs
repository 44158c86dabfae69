//! Member and operator resolution.
//!
//! Given a name and argument nodes, find the one callable that accepts them:
//!
//! 1. Collect members of the type whose name matches (case-insensitive by
//!    default) and whose staticness fits the call
//! 2. Apply explicit type arguments: generic definitions need exactly as
//!    many; without type arguments, open generic candidates drop out
//! 3. Keep candidates whose every parameter accepts its argument (see
//!    [`crate::args::argument_fit`])
//! 4. Rank the survivors (see [`ranking`])

mod operators;
mod ranking;

pub use operators::{find_binary_operator, find_boolean_operator, find_unary_operator};
pub use ranking::find_best_match;

use exprtree_core::{Expr, ExprError, MemberKinds, MemberRef, TypeCatalog, TypeHash};

use crate::FactoryOptions;
use crate::args::{ArgumentFit, argument_fit};

/// A compatible candidate with the facts ranking needs.
#[derive(Debug, Clone, PartialEq)]
pub struct OverloadMatch {
    /// The candidate, closed over explicit type arguments if generic.
    pub method: MemberRef,
    /// Number of arguments whose type equals the parameter type.
    pub exact_matches: usize,
    /// Whether the candidate is public.
    pub is_public: bool,
}

impl OverloadMatch {
    pub fn new(method: MemberRef, exact_matches: usize) -> Self {
        let is_public = method.is_public();
        Self {
            method,
            exact_matches,
            is_public,
        }
    }
}

/// Close `member` over `type_args`, or reject it.
///
/// Without type arguments only non-generic members survive; with them only
/// generic definitions of the same arity do.
pub fn apply_type_args<C: TypeCatalog + ?Sized>(
    catalog: &C,
    member: &MemberRef,
    type_args: &[TypeHash],
) -> Result<Option<MemberRef>, ExprError> {
    if type_args.is_empty() {
        return Ok((!member.is_generic_definition()).then(|| member.clone()));
    }
    if member.is_generic_definition() && member.generic_params().len() == type_args.len() {
        return catalog.make_generic_method(member, type_args).map(Some);
    }
    Ok(None)
}

/// Check every argument against `member`'s parameters.
///
/// Returns the number of exact matches, or `None` if some argument does not
/// fit.
pub fn match_arguments<C: TypeCatalog + ?Sized>(
    catalog: &C,
    options: &FactoryOptions,
    member: &MemberRef,
    args: &[Expr],
) -> Result<Option<usize>, ExprError> {
    let params = member.params();
    if params.len() != args.len() {
        return Ok(None);
    }
    let mut exact = 0;
    for (param, arg) in params.iter().zip(args) {
        match argument_fit(catalog, options, param.data_type, arg)? {
            Some(ArgumentFit::Exact) => exact += 1,
            Some(_) => {}
            None => return Ok(None),
        }
    }
    Ok(Some(exact))
}

/// Pick the best of `candidates` for `type_args` and `args`.
pub fn select_overload<C: TypeCatalog + ?Sized>(
    catalog: &C,
    options: &FactoryOptions,
    candidates: &[MemberRef],
    type_args: &[TypeHash],
    args: &[Expr],
    owner: TypeHash,
    name: &str,
) -> Result<Option<MemberRef>, ExprError> {
    let mut viable = Vec::new();
    for candidate in candidates {
        let Some(closed) = apply_type_args(catalog, candidate, type_args)? else {
            tracing::trace!(candidate = %candidate, "rejected: type arguments do not apply");
            continue;
        };
        match match_arguments(catalog, options, &closed, args)? {
            Some(exact) => viable.push(OverloadMatch::new(closed, exact)),
            None => tracing::trace!(candidate = %candidate, "rejected: arguments do not fit"),
        }
    }

    let best = find_best_match(viable, name, &catalog.type_name(owner))?;
    if let Some(best) = &best {
        tracing::debug!(
            owner = %catalog.type_name(owner),
            method = %best.method,
            exact = best.exact_matches,
            "selected overload"
        );
    }
    Ok(best.map(|m| m.method))
}

/// Find the method `name` on `ty` that accepts `args`.
///
/// # Errors
///
/// - [`ExprError::MemberNotFound`] when no candidate is compatible
/// - [`ExprError::AmbiguousMatch`] when several are equally preferred
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn find_method<C: TypeCatalog + ?Sized>(
    catalog: &C,
    options: &FactoryOptions,
    ty: TypeHash,
    name: &str,
    type_args: &[TypeHash],
    args: &[Expr],
    is_static: bool,
) -> Result<MemberRef, ExprError> {
    let candidates: Vec<_> = catalog
        .members_named(
            ty,
            name,
            MemberKinds::METHOD,
            options.include_non_public,
            options.name_matching,
        )
        .into_iter()
        .filter(|m| m.is_static == is_static)
        .collect();
    tracing::trace!(
        owner = %catalog.type_name(ty),
        name,
        candidates = candidates.len(),
        "resolving method"
    );

    select_overload(catalog, options, &candidates, type_args, args, ty, name)?.ok_or_else(|| {
        let detail = if type_args.is_empty() {
            "is compatible with the supplied arguments"
        } else {
            "is compatible with the supplied type arguments and arguments"
        };
        ExprError::MemberNotFound {
            member: name.to_string(),
            type_name: catalog.type_name(ty),
            detail: detail.to_string(),
        }
    })
}

/// Find the constructor of `ty` that accepts `args`.
pub fn find_constructor<C: TypeCatalog + ?Sized>(
    catalog: &C,
    options: &FactoryOptions,
    ty: TypeHash,
    args: &[Expr],
) -> Result<MemberRef, ExprError> {
    let candidates: Vec<_> = catalog
        .declared_members(ty, MemberKinds::CONSTRUCTOR)
        .into_iter()
        .filter(|m| options.include_non_public || m.is_public())
        .collect();

    select_overload(catalog, options, &candidates, &[], args, ty, ".ctor")?.ok_or_else(|| {
        ExprError::MemberNotFound {
            member: ".ctor".to_string(),
            type_name: catalog.type_name(ty),
            detail: "is compatible with the supplied arguments".to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use exprtree_core::{
        ConstantValue, ErrorKind, ExprData, ExprKind, MemberEntry, Param, TypeEntry, Visibility, primitives,
    };
    use exprtree_registry::TypeRegistry;

    use super::*;

    fn constant(value: impl Into<ConstantValue>) -> Expr {
        let value = value.into();
        Expr::assemble(ExprKind::Constant, value.natural_type(), ExprData::Constant(value))
    }

    fn printer(registry: &mut TypeRegistry, members: Vec<MemberEntry>) -> TypeHash {
        let mut entry = TypeEntry::class("Printer");
        for m in members {
            entry = entry.with_member(m);
        }
        registry.register_type(entry).unwrap()
    }

    fn print(param: TypeHash) -> MemberEntry {
        MemberEntry::method("Print", vec![Param::new("value", param)], primitives::VOID)
    }

    #[test]
    fn exact_overload_wins() {
        let mut r = TypeRegistry::with_builtins();
        let ty = printer(&mut r, vec![print(primitives::STRING), print(primitives::OBJECT)]);
        let m = find_method(&r, &FactoryOptions::default(), ty, "Print", &[], &[constant("x")], false).unwrap();
        assert_eq!(m.params()[0].data_type, primitives::STRING);
    }

    #[test]
    fn names_match_case_insensitively_by_default() {
        let mut r = TypeRegistry::with_builtins();
        let ty = printer(&mut r, vec![print(primitives::STRING)]);
        assert!(find_method(&r, &FactoryOptions::default(), ty, "print", &[], &[constant("x")], false).is_ok());

        let exact = FactoryOptions::default().with_name_matching(exprtree_core::NameMatching::Exact);
        let err = find_method(&r, &exact, ty, "print", &[], &[constant("x")], false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MemberNotFound);
    }

    #[test]
    fn no_compatible_overload_is_not_found() {
        let mut r = TypeRegistry::with_builtins();
        let ty = printer(&mut r, vec![print(primitives::STRING)]);
        let err = find_method(&r, &FactoryOptions::default(), ty, "Print", &[], &[constant(1)], false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MemberNotFound);
    }

    #[test]
    fn staticness_filters_candidates() {
        let mut r = TypeRegistry::with_builtins();
        let ty = printer(&mut r, vec![print(primitives::STRING).as_static()]);
        let options = FactoryOptions::default();
        assert!(find_method(&r, &options, ty, "Print", &[], &[constant("x")], false).is_err());
        assert!(find_method(&r, &options, ty, "Print", &[], &[constant("x")], true).is_ok());
    }

    #[test]
    fn public_preferred_over_private() {
        let mut r = TypeRegistry::with_builtins();
        let ty = printer(
            &mut r,
            vec![
                print(primitives::STRING).with_visibility(Visibility::Private),
                print(primitives::OBJECT),
            ],
        );
        let m = find_method(&r, &FactoryOptions::default(), ty, "Print", &[], &[constant("x")], false).unwrap();
        assert_eq!(m.params()[0].data_type, primitives::OBJECT);
    }

    #[test]
    fn non_public_can_be_excluded() {
        let mut r = TypeRegistry::with_builtins();
        let ty = printer(
            &mut r,
            vec![print(primitives::STRING).with_visibility(Visibility::Private)],
        );
        let options = FactoryOptions::default().with_non_public(false);
        let err = find_method(&r, &options, ty, "Print", &[], &[constant("x")], false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MemberNotFound);
    }

    #[test]
    fn generic_method_needs_type_args() {
        let mut r = TypeRegistry::with_builtins();
        let t = MemberEntry::generic_param("Echo", 0);
        let echo = MemberEntry::method("Echo", vec![Param::new("x", t)], t).with_generic_params(vec![t]);
        let ty = printer(&mut r, vec![echo]);
        let options = FactoryOptions::default();

        let err = find_method(&r, &options, ty, "Echo", &[], &[constant(1)], false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MemberNotFound);

        let closed = find_method(&r, &options, ty, "Echo", &[primitives::INT32], &[constant(1)], false).unwrap();
        assert_eq!(closed.return_type(), Some(primitives::INT32));
        assert_eq!(closed.generic_args(), &[primitives::INT32]);

        let err = find_method(
            &r,
            &options,
            ty,
            "Echo",
            &[primitives::INT32, primitives::INT32],
            &[constant(1)],
            false,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MemberNotFound);
    }

    #[test]
    fn constructor_resolution() {
        let mut r = TypeRegistry::with_builtins();
        let ty = r
            .register_type(
                TypeEntry::class("Point")
                    .with_member(MemberEntry::constructor(vec![]))
                    .with_member(MemberEntry::constructor(vec![
                        Param::new("x", primitives::INT32),
                        Param::new("y", primitives::INT32),
                    ])),
            )
            .unwrap();
        let ctor = find_constructor(&r, &FactoryOptions::default(), ty, &[constant(1), constant(2)]).unwrap();
        assert_eq!(ctor.params().len(), 2);
        let err = find_constructor(&r, &FactoryOptions::default(), ty, &[constant("x")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MemberNotFound);
    }
}
