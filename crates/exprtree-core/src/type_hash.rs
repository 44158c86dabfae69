//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit handle that identifies a type, a member, or a
//! constructed type (optional-wrapped, array, by-ref, generic instance). Hashes
//! are computed from names and constituent handles, so the same structure always
//! yields the same handle:
//!
//! - Types can be referenced before they are registered
//! - Constructed types need no allocation to be named
//! - Descriptors compare by handle equality, never by pointer
//!
//! # Examples
//!
//! ```
//! use exprtree_core::{TypeHash, primitives};
//!
//! assert_eq!(TypeHash::from_name("int"), primitives::INT32);
//!
//! let opt_a = TypeHash::from_nullable(primitives::INT32);
//! let opt_b = TypeHash::from_nullable(primitives::INT32);
//! assert_eq!(opt_a, opt_b);
//! assert_ne!(opt_a, primitives::INT32);
//! ```

use std::fmt;
use xxhash_rust::const_xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
///
/// Distinct domains keep a method called `Foo` from colliding with a type called
/// `Foo`, and an array of `T` from colliding with an optional `T`.
pub mod hash_constants {
    /// Separator constant for combining components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for named types.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for methods.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for constructors.
    pub const CONSTRUCTOR: u64 = 0x9a7f3d5e2b8c4601;

    /// Domain marker for fields.
    pub const FIELD: u64 = 0x1a095090689d4647;

    /// Domain marker for properties.
    pub const PROPERTY: u64 = 0x3e9f5d2a8c7b1403;

    /// Domain marker for optional-wrapped types.
    pub const NULLABLE: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for array types.
    pub const ARRAY: u64 = 0xc6a4a7935bd1e995;

    /// Domain marker for by-reference types.
    pub const BY_REF: u64 = 0x8648dbbc94d49b8d;

    /// Domain marker for generic parameter placeholders.
    pub const GENERIC_PARAM: u64 = 0xa2b48b2c69e0d657;

    /// Domain marker for closed generic methods.
    pub const GENERIC_METHOD: u64 = 0xe7037ed1a0b428db;

    /// Position mixing constants; each position gets its own constant so that
    /// `(int, float)` and `(float, int)` hash differently.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
        0x0f1e2d3c4b5a6978,
        0x89abcdef01234567,
        0xabcdef0123456789,
        0xcdef0123456789ab,
    ];
}

/// A deterministic 64-bit handle identifying a type or member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name.
    #[inline]
    pub const fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a method hash from owner type, name and parameter types.
    ///
    /// Parameter order matters.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str, param_hashes: &[TypeHash]) -> Self {
        let seed = hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        TypeHash(mix_sequence(seed, param_hashes))
    }

    /// Create a constructor hash from owner type and parameter types.
    #[inline]
    pub fn from_constructor(owner: TypeHash, param_hashes: &[TypeHash]) -> Self {
        TypeHash(mix_sequence(hash_constants::CONSTRUCTOR ^ owner.0, param_hashes))
    }

    /// Create a field hash from owner type and field name.
    #[inline]
    pub const fn from_field(owner: TypeHash, name: &str) -> Self {
        TypeHash(hash_constants::FIELD ^ owner.0 ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a property hash from owner type and property name.
    #[inline]
    pub const fn from_property(owner: TypeHash, name: &str) -> Self {
        TypeHash(hash_constants::PROPERTY ^ owner.0 ^ xxh64(name.as_bytes(), 0))
    }

    /// Create the hash of the optional-wrapped form of `inner`.
    #[inline]
    pub const fn from_nullable(inner: TypeHash) -> Self {
        TypeHash(
            (hash_constants::NULLABLE ^ inner.0)
                .wrapping_mul(hash_constants::SEP)
                .rotate_left(17),
        )
    }

    /// Create the hash of an array of `element` with the given rank.
    ///
    /// Rank 1 denotes a single-dimensional vector.
    #[inline]
    pub const fn from_array(element: TypeHash, rank: u32) -> Self {
        TypeHash(
            (hash_constants::ARRAY ^ element.0)
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(hash_constants::PARAM_MARKERS[(rank as usize) % 16] ^ rank as u64),
        )
    }

    /// Create the hash of a by-reference form of `element`.
    #[inline]
    pub const fn from_by_ref(element: TypeHash) -> Self {
        TypeHash(
            (hash_constants::BY_REF ^ element.0)
                .wrapping_mul(hash_constants::SEP)
                .rotate_left(31),
        )
    }

    /// Create the hash of a generic parameter placeholder.
    ///
    /// `owner` is the generic type or method definition that declares it.
    #[inline]
    pub const fn from_generic_param(owner: TypeHash, position: usize) -> Self {
        TypeHash(
            (hash_constants::GENERIC_PARAM ^ owner.0)
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(hash_constants::PARAM_MARKERS[position % 16] ^ position as u64),
        )
    }

    /// Create a generic instance hash from a definition and its type arguments.
    ///
    /// Argument order matters: `Func<int, bool>` differs from `Func<bool, int>`.
    #[inline]
    pub fn from_generic_instance(definition: TypeHash, args: &[TypeHash]) -> Self {
        TypeHash(mix_sequence(definition.0, args))
    }

    /// Create the hash of a generic method closed over `args`.
    #[inline]
    pub fn from_generic_method(method: TypeHash, args: &[TypeHash]) -> Self {
        TypeHash(mix_sequence(hash_constants::GENERIC_METHOD ^ method.0, args))
    }

    /// Check if this is the empty hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

fn mix_sequence(seed: u64, items: &[TypeHash]) -> u64 {
    let mut hash = seed;
    for (i, item) in items.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        // wrapping_mul keeps position significant (XOR alone would commute)
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(marker ^ item.0);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<u64> for TypeHash {
    fn from(value: u64) -> Self {
        TypeHash(value)
    }
}

/// Handles of the built-in primitive types.
pub mod primitives {
    use super::TypeHash;

    /// `void`
    pub const VOID: TypeHash = TypeHash::from_name("void");
    /// `bool`
    pub const BOOL: TypeHash = TypeHash::from_name("bool");
    /// `char` (16-bit code unit)
    pub const CHAR: TypeHash = TypeHash::from_name("char");
    /// `sbyte`
    pub const INT8: TypeHash = TypeHash::from_name("sbyte");
    /// `byte`
    pub const UINT8: TypeHash = TypeHash::from_name("byte");
    /// `short`
    pub const INT16: TypeHash = TypeHash::from_name("short");
    /// `ushort`
    pub const UINT16: TypeHash = TypeHash::from_name("ushort");
    /// `int`
    pub const INT32: TypeHash = TypeHash::from_name("int");
    /// `uint`
    pub const UINT32: TypeHash = TypeHash::from_name("uint");
    /// `long`
    pub const INT64: TypeHash = TypeHash::from_name("long");
    /// `ulong`
    pub const UINT64: TypeHash = TypeHash::from_name("ulong");
    /// `float`
    pub const FLOAT: TypeHash = TypeHash::from_name("float");
    /// `double`
    pub const DOUBLE: TypeHash = TypeHash::from_name("double");
    /// `string` (reference kind)
    pub const STRING: TypeHash = TypeHash::from_name("string");
    /// `object`, the root of every type
    pub const OBJECT: TypeHash = TypeHash::from_name("object");
}

/// Handles of well-known non-primitive types the factory reasons about.
pub mod well_known {
    use super::TypeHash;

    /// Base of every value-kind type.
    pub const VALUE_TYPE: TypeHash = TypeHash::from_name("ValueType");
    /// Base of every enumeration.
    pub const ENUM: TypeHash = TypeHash::from_name("Enum");
    /// Base of every array type.
    pub const ARRAY: TypeHash = TypeHash::from_name("Array");
    /// Base of every delegate type.
    pub const DELEGATE: TypeHash = TypeHash::from_name("Delegate");
    /// Enumerable marker interface required by list initializers.
    pub const ENUMERABLE: TypeHash = TypeHash::from_name("IEnumerable");

    /// Root of the expression-node class hierarchy.
    pub const EXPRESSION: TypeHash = TypeHash::from_name("Expression");
    /// Node class of binary nodes.
    pub const BINARY_EXPRESSION: TypeHash = TypeHash::from_name("BinaryExpression");
    /// Node class of unary nodes (including quote and conversions).
    pub const UNARY_EXPRESSION: TypeHash = TypeHash::from_name("UnaryExpression");
    /// Node class of constants.
    pub const CONSTANT_EXPRESSION: TypeHash = TypeHash::from_name("ConstantExpression");
    /// Node class of parameters.
    pub const PARAMETER_EXPRESSION: TypeHash = TypeHash::from_name("ParameterExpression");
    /// Node class of field/property access.
    pub const MEMBER_EXPRESSION: TypeHash = TypeHash::from_name("MemberExpression");
    /// Node class of method calls.
    pub const METHOD_CALL_EXPRESSION: TypeHash = TypeHash::from_name("MethodCallExpression");
    /// Node class of object construction.
    pub const NEW_EXPRESSION: TypeHash = TypeHash::from_name("NewExpression");
    /// Node class of array construction.
    pub const NEW_ARRAY_EXPRESSION: TypeHash = TypeHash::from_name("NewArrayExpression");
    /// Node class of conditionals.
    pub const CONDITIONAL_EXPRESSION: TypeHash = TypeHash::from_name("ConditionalExpression");
    /// Node class of type tests.
    pub const TYPE_BINARY_EXPRESSION: TypeHash = TypeHash::from_name("TypeBinaryExpression");
    /// Node class of delegate invocation.
    pub const INVOCATION_EXPRESSION: TypeHash = TypeHash::from_name("InvocationExpression");
    /// Node class of list initialization.
    pub const LIST_INIT_EXPRESSION: TypeHash = TypeHash::from_name("ListInitExpression");
    /// Node class of member initialization.
    pub const MEMBER_INIT_EXPRESSION: TypeHash = TypeHash::from_name("MemberInitExpression");
    /// Non-generic node class of lambdas.
    pub const LAMBDA_EXPRESSION: TypeHash = TypeHash::from_name("LambdaExpression");
    /// Generic definition `Expression<TDelegate>`; every lambda node is an instance of it.
    pub const EXPRESSION_OF: TypeHash = TypeHash::from_name("Expression`1");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_deterministic() {
        assert_eq!(TypeHash::from_name("Widget"), TypeHash::from_name("Widget"));
        assert_ne!(TypeHash::from_name("Widget"), TypeHash::from_name("widget"));
    }

    #[test]
    fn primitives_match_names() {
        assert_eq!(primitives::INT32, TypeHash::from_name("int"));
        assert_eq!(primitives::BOOL, TypeHash::from_name("bool"));
        assert_ne!(primitives::INT32, primitives::UINT32);
    }

    #[test]
    fn parameter_order_matters() {
        let owner = TypeHash::from_name("Calc");
        let a = TypeHash::from_method(owner, "Mix", &[primitives::INT32, primitives::FLOAT]);
        let b = TypeHash::from_method(owner, "Mix", &[primitives::FLOAT, primitives::INT32]);
        assert_ne!(a, b);
    }

    #[test]
    fn constructed_domains_do_not_collide() {
        let int = primitives::INT32;
        let nullable = TypeHash::from_nullable(int);
        let array = TypeHash::from_array(int, 1);
        let by_ref = TypeHash::from_by_ref(int);
        assert_ne!(nullable, array);
        assert_ne!(nullable, by_ref);
        assert_ne!(array, by_ref);
        assert_ne!(TypeHash::from_array(int, 1), TypeHash::from_array(int, 2));
    }

    #[test]
    fn generic_instance_argument_order_matters() {
        let def = TypeHash::from_name("Pair`2");
        let a = TypeHash::from_generic_instance(def, &[primitives::INT32, primitives::BOOL]);
        let b = TypeHash::from_generic_instance(def, &[primitives::BOOL, primitives::INT32]);
        assert_ne!(a, b);
    }

    #[test]
    fn member_domains_differ() {
        let owner = TypeHash::from_name("Point");
        assert_ne!(TypeHash::from_field(owner, "X"), TypeHash::from_property(owner, "X"));
    }
}
