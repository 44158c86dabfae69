//! Primitive conversions.
//!
//! The implicit widening lattice and the explicit conversions `convert`
//! accepts between primitives, enumerations and their optional forms.

use exprtree_core::{PrimitiveKind, TypeCatalog, TypeHash};

/// Implicit numeric widening between primitive kinds.
///
/// ```text
/// sbyte  -> short int long float double
/// byte   -> short ushort int uint long ulong float double
/// short  -> int long float double
/// ushort -> int uint long ulong float double
/// int    -> long float double
/// uint   -> long ulong float double
/// long   -> float double
/// ulong  -> float double
/// char   -> ushort int uint long ulong float double
/// float  -> double
/// ```
pub fn is_implicit_numeric_kind(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    use PrimitiveKind::*;
    matches!(
        (from, to),
        (Int8, Int16 | Int32 | Int64 | Float | Double)
            | (Uint8, Int16 | Uint16 | Int32 | Uint32 | Int64 | Uint64 | Float | Double)
            | (Int16, Int32 | Int64 | Float | Double)
            | (Uint16, Int32 | Uint32 | Int64 | Uint64 | Float | Double)
            | (Int32, Int64 | Float | Double)
            | (Uint32, Int64 | Uint64 | Float | Double)
            | (Int64 | Uint64, Float | Double)
            | (Char, Uint16 | Int32 | Uint32 | Int64 | Uint64 | Float | Double)
            | (Float, Double)
    )
}

/// Whether `convert` can go from `source` to `dest` without a user operator
/// and without a reference conversion.
///
/// Holds for identity, wrapping and unwrapping an optional, and between any
/// two convertible kinds (`bool`, `char`, numerics, enumerations), optional
/// or not.
pub fn has_primitive_conversion<C: TypeCatalog + ?Sized>(catalog: &C, source: TypeHash, dest: TypeHash) -> bool {
    if source == dest {
        return true;
    }
    if catalog.is_optional_wrapped(source) && dest == catalog.unwrap(source) {
        return true;
    }
    if catalog.is_optional_wrapped(dest) && source == catalog.unwrap(dest) {
        return true;
    }
    is_convertible(catalog, catalog.unwrap(source)) && is_convertible(catalog, catalog.unwrap(dest))
}

fn is_convertible<C: TypeCatalog + ?Sized>(catalog: &C, ty: TypeHash) -> bool {
    catalog.is_enum(ty) || catalog.primitive_kind(ty).is_some_and(PrimitiveKind::is_convertible)
}

#[cfg(test)]
mod tests {
    use exprtree_core::{TypeEntry, primitives};
    use exprtree_registry::TypeRegistry;

    use super::*;

    #[test]
    fn widening_table() {
        use PrimitiveKind::*;
        assert!(is_implicit_numeric_kind(Int32, Int64));
        assert!(is_implicit_numeric_kind(Char, Int32));
        assert!(is_implicit_numeric_kind(Uint32, Int64));
        assert!(!is_implicit_numeric_kind(Uint32, Int32));
        assert!(!is_implicit_numeric_kind(Int32, Uint64));
        assert!(!is_implicit_numeric_kind(Int32, Char));
        assert!(!is_implicit_numeric_kind(Double, Float));
        assert!(!is_implicit_numeric_kind(Bool, Int32));
    }

    #[test]
    fn widening_is_irreflexive() {
        for kind in PrimitiveKind::ALL {
            assert!(!is_implicit_numeric_kind(kind, kind), "{kind}");
        }
    }

    #[test]
    fn explicit_between_convertibles() {
        let mut r = TypeRegistry::with_builtins();
        let color = r
            .register_type(TypeEntry::enumeration("Color", primitives::INT32))
            .unwrap();
        let int_opt = r.wrap_optional(primitives::INT32).unwrap();

        assert!(has_primitive_conversion(&r, primitives::DOUBLE, primitives::INT8));
        assert!(has_primitive_conversion(&r, color, primitives::INT64));
        assert!(has_primitive_conversion(&r, int_opt, primitives::INT32));
        assert!(has_primitive_conversion(&r, primitives::BOOL, primitives::CHAR));
        assert!(!has_primitive_conversion(&r, primitives::STRING, primitives::INT32));
        assert!(!has_primitive_conversion(&r, primitives::OBJECT, primitives::INT32));
    }
}
