//! Reference conversions and receiver checks.

use exprtree_core::{TypeCatalog, TypeHash, primitives, well_known};

/// `src` can be stored in `dest` with no conversion code: identity, or both
/// reference kinds and `dest` accepts `src`.
///
/// Value kinds only match themselves; `int` is not reference-assignable to
/// `object` because storing it boxes.
pub fn is_reference_assignable<C: TypeCatalog + ?Sized>(catalog: &C, dest: TypeHash, src: TypeHash) -> bool {
    if dest == src {
        return true;
    }
    catalog.is_reference_kind(dest) && catalog.is_reference_kind(src) && are_assignable(catalog, dest, src)
}

/// `dest` accepts `src`, boxing and optional wrapping included.
pub fn are_assignable<C: TypeCatalog + ?Sized>(catalog: &C, dest: TypeHash, src: TypeHash) -> bool {
    dest == src || catalog.is_assignable_from(dest, src)
}

/// Whether `convert` may reinterpret between `source` and `dest` as a
/// reference cast: up or down a hierarchy, through an interface, or through
/// `object`.
pub fn has_reference_conversion<C: TypeCatalog + ?Sized>(catalog: &C, source: TypeHash, dest: TypeHash) -> bool {
    if source == primitives::VOID || dest == primitives::VOID {
        return false;
    }
    let nn_source = catalog.unwrap(source);
    let nn_dest = catalog.unwrap(dest);
    if catalog.is_assignable_from(nn_source, nn_dest) || catalog.is_assignable_from(nn_dest, nn_source) {
        return true;
    }
    if catalog.is_interface(source) || catalog.is_interface(dest) {
        return true;
    }
    source == primitives::OBJECT || dest == primitives::OBJECT
}

/// Whether a receiver of `instance` may be used for a member declared on
/// `declaring`.
///
/// Besides plain reference assignability, a value-kind receiver may reach
/// members of `object`, `ValueType`, `Enum` (for enumerations) and of any
/// interface it implements.
pub fn is_valid_instance_type<C: TypeCatalog + ?Sized>(catalog: &C, declaring: TypeHash, instance: TypeHash) -> bool {
    if is_reference_assignable(catalog, declaring, instance) {
        return true;
    }
    if !catalog.is_value_kind(instance) {
        return false;
    }
    if declaring == primitives::OBJECT || declaring == well_known::VALUE_TYPE {
        return true;
    }
    if catalog.is_enum(instance) && declaring == well_known::ENUM {
        return true;
    }
    catalog.is_interface(declaring)
        && catalog
            .all_interfaces(instance)
            .iter()
            .any(|iface| is_reference_assignable(catalog, declaring, *iface))
}
