//! Type compatibility engine.
//!
//! Pure queries over type handles answering "can a value of type A be used
//! where type B is expected". Nothing here allocates nodes or consults
//! anything but the catalog.
//!
//! ## Implicit Conversion Priority
//!
//! Conversions are checked in this order:
//! 1. Identity (same handle)
//! 2. Implicit numeric widening (`int -> long`, `char -> double`, ...)
//! 3. Reference (derived class to base, class to interface, array covariance)
//! 4. Boxing (value kind to `object`, `ValueType`, `Enum` or an interface)
//! 5. Optional wrapping (`int -> int?`, `int -> long?`)
//!
//! The explicit side (what `convert` accepts without a user operator) lives in
//! [`primitive::has_primitive_conversion`] and
//! [`reference::has_reference_conversion`]; user-defined `op_Implicit` and
//! `op_Explicit` lookup lives in [`user_defined`].

use exprtree_core::{TypeCatalog, TypeHash, primitives};

mod primitive;
mod reference;
mod user_defined;

pub use primitive::{has_primitive_conversion, is_implicit_numeric_kind};
pub use reference::{are_assignable, has_reference_conversion, is_reference_assignable, is_valid_instance_type};
pub use user_defined::{UserConversion, find_user_conversion, is_conversion_operator};

/// An implicit conversion with its cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// The kind of conversion being performed.
    pub kind: ConversionKind,
    /// The cost of this conversion (lower is better).
    pub cost: u32,
}

/// The kind of implicit conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionKind {
    /// No conversion needed.
    Identity,

    /// Primitive numeric widening.
    ImplicitNumeric {
        /// Source type hash.
        from: TypeHash,
        /// Target type hash.
        to: TypeHash,
    },

    /// Reference conversion up the hierarchy.
    Reference {
        /// The base class or interface.
        target: TypeHash,
    },

    /// Value kind stored in a reference-kind location.
    Boxing {
        /// The reference-kind target.
        target: TypeHash,
    },

    /// Value kind (possibly widened) wrapped into an optional.
    NullableWrap {
        /// Source type hash.
        from: TypeHash,
        /// The optional target.
        to: TypeHash,
    },
}

impl Conversion {
    /// Identity conversion.
    pub const COST_EXACT: u32 = 0;

    /// Primitive widening.
    pub const COST_NUMERIC_WIDENING: u32 = 1;

    /// Derived to base, class to interface.
    pub const COST_REFERENCE: u32 = 2;

    /// Value kind to reference kind.
    pub const COST_BOXING: u32 = 3;

    /// Wrapping into an optional.
    pub const COST_NULLABLE_WRAP: u32 = 4;

    pub fn identity() -> Self {
        Self {
            kind: ConversionKind::Identity,
            cost: Self::COST_EXACT,
        }
    }

    /// Check if this is an exact match.
    pub fn is_exact(&self) -> bool {
        matches!(self.kind, ConversionKind::Identity)
    }
}

/// Find the cheapest implicit conversion from `from` to `to`.
pub fn find_implicit_conversion<C: TypeCatalog + ?Sized>(
    catalog: &C,
    from: TypeHash,
    to: TypeHash,
) -> Option<Conversion> {
    if is_identity(from, to) {
        return Some(Conversion::identity());
    }

    if is_implicit_numeric(catalog, from, to) {
        return Some(Conversion {
            kind: ConversionKind::ImplicitNumeric { from, to },
            cost: Conversion::COST_NUMERIC_WIDENING,
        });
    }

    if is_reference_compatible(catalog, from, to) {
        return Some(Conversion {
            kind: ConversionKind::Reference { target: to },
            cost: Conversion::COST_REFERENCE,
        });
    }

    if is_boxing(catalog, from, to) {
        return Some(Conversion {
            kind: ConversionKind::Boxing { target: to },
            cost: Conversion::COST_BOXING,
        });
    }

    if is_nullable_wrap(catalog, from, to) {
        return Some(Conversion {
            kind: ConversionKind::NullableWrap { from, to },
            cost: Conversion::COST_NULLABLE_WRAP,
        });
    }

    None
}

// ============================================================================
// Predicates
// ============================================================================

pub fn is_identity(a: TypeHash, b: TypeHash) -> bool {
    a == b
}

/// Primitive numeric widening from `a` to `b`.
///
/// Enumerations and `bool` never widen.
pub fn is_implicit_numeric<C: TypeCatalog + ?Sized>(catalog: &C, a: TypeHash, b: TypeHash) -> bool {
    match (catalog.primitive_kind(a), catalog.primitive_kind(b)) {
        (Some(from), Some(to)) => is_implicit_numeric_kind(from, to),
        _ => false,
    }
}

/// Both reference kinds, and `b` is a base class, interface or covariant
/// array of `a`.
pub fn is_reference_compatible<C: TypeCatalog + ?Sized>(catalog: &C, a: TypeHash, b: TypeHash) -> bool {
    catalog.is_reference_kind(a) && catalog.is_reference_kind(b) && catalog.is_assignable_from(b, a)
}

/// A value kind stored into a reference-kind location that accepts it.
pub fn is_boxing<C: TypeCatalog + ?Sized>(catalog: &C, a: TypeHash, b: TypeHash) -> bool {
    a != primitives::VOID
        && catalog.is_value_kind(a)
        && catalog.is_reference_kind(b)
        && catalog.is_assignable_from(b, a)
}

/// `b` is optional-wrapped and the unwrapped `a` is or widens to its inner type.
pub fn is_nullable_wrap<C: TypeCatalog + ?Sized>(catalog: &C, a: TypeHash, b: TypeHash) -> bool {
    if a == b || !catalog.is_optional_wrapped(b) {
        return false;
    }
    let inner = catalog.unwrap(b);
    let source = catalog.unwrap(a);
    if catalog.is_optional_wrapped(a) && !is_implicit_numeric(catalog, source, inner) {
        return false;
    }
    source == inner || is_implicit_numeric(catalog, source, inner)
}

/// Any implicit conversion from `a` to `b`.
///
/// Reflexive, and not symmetric (`int -> long` holds, `long -> int` does not).
pub fn is_implicitly_convertible<C: TypeCatalog + ?Sized>(catalog: &C, a: TypeHash, b: TypeHash) -> bool {
    is_identity(a, b)
        || is_implicit_numeric(catalog, a, b)
        || is_reference_compatible(catalog, a, b)
        || is_boxing(catalog, a, b)
        || is_nullable_wrap(catalog, a, b)
}

/// The element type of a by-ref parameter type; other types unchanged.
pub fn non_ref_type<C: TypeCatalog + ?Sized>(catalog: &C, ty: TypeHash) -> TypeHash {
    if catalog.is_by_ref(ty) {
        catalog.element_type(ty).unwrap_or(ty)
    } else {
        ty
    }
}
