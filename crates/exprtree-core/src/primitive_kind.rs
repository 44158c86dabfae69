//! Primitive type kinds and the type classes the factory checks against.

use std::fmt;

use crate::TypeHash;

/// Primitive type kinds.
///
/// Everything except `String` and `Object` is a value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Char,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Double,
    String,
    Object,
}

impl PrimitiveKind {
    /// All primitive kinds, in registration order.
    pub const ALL: [PrimitiveKind; 15] = [
        PrimitiveKind::Void,
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::Int8,
        PrimitiveKind::Uint8,
        PrimitiveKind::Int16,
        PrimitiveKind::Uint16,
        PrimitiveKind::Int32,
        PrimitiveKind::Uint32,
        PrimitiveKind::Int64,
        PrimitiveKind::Uint64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::String,
        PrimitiveKind::Object,
    ];

    /// Get the TypeHash for this primitive type.
    pub const fn type_hash(self) -> TypeHash {
        use crate::primitives;
        match self {
            PrimitiveKind::Void => primitives::VOID,
            PrimitiveKind::Bool => primitives::BOOL,
            PrimitiveKind::Char => primitives::CHAR,
            PrimitiveKind::Int8 => primitives::INT8,
            PrimitiveKind::Uint8 => primitives::UINT8,
            PrimitiveKind::Int16 => primitives::INT16,
            PrimitiveKind::Uint16 => primitives::UINT16,
            PrimitiveKind::Int32 => primitives::INT32,
            PrimitiveKind::Uint32 => primitives::UINT32,
            PrimitiveKind::Int64 => primitives::INT64,
            PrimitiveKind::Uint64 => primitives::UINT64,
            PrimitiveKind::Float => primitives::FLOAT,
            PrimitiveKind::Double => primitives::DOUBLE,
            PrimitiveKind::String => primitives::STRING,
            PrimitiveKind::Object => primitives::OBJECT,
        }
    }

    /// Get the name of this primitive type.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int8 => "sbyte",
            PrimitiveKind::Uint8 => "byte",
            PrimitiveKind::Int16 => "short",
            PrimitiveKind::Uint16 => "ushort",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Uint32 => "uint",
            PrimitiveKind::Int64 => "long",
            PrimitiveKind::Uint64 => "ulong",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::String => "string",
            PrimitiveKind::Object => "object",
        }
    }

    /// Look up a primitive kind by its handle.
    pub fn from_hash(hash: TypeHash) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_hash() == hash)
    }

    /// Value kinds are copied, not referenced.
    pub const fn is_value_kind(self) -> bool {
        !matches!(self, PrimitiveKind::String | PrimitiveKind::Object)
    }

    /// Integer kinds, excluding `char` and `bool`.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8
                | PrimitiveKind::Uint8
                | PrimitiveKind::Int16
                | PrimitiveKind::Uint16
                | PrimitiveKind::Int32
                | PrimitiveKind::Uint32
                | PrimitiveKind::Int64
                | PrimitiveKind::Uint64
        )
    }

    /// Unsigned integer kinds.
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Uint8 | PrimitiveKind::Uint16 | PrimitiveKind::Uint32 | PrimitiveKind::Uint64
        )
    }

    /// Floating-point kinds.
    pub const fn is_floating(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    /// Kinds with built-in arithmetic (`+ - * / %`, negation).
    ///
    /// The 8-bit integers and `char` are absent; arithmetic on them
    /// is only reachable through a user-defined operator.
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int16
                | PrimitiveKind::Uint16
                | PrimitiveKind::Int32
                | PrimitiveKind::Uint32
                | PrimitiveKind::Int64
                | PrimitiveKind::Uint64
                | PrimitiveKind::Float
                | PrimitiveKind::Double
        )
    }

    /// Kinds with built-in ordering comparisons.
    pub const fn is_numeric(self) -> bool {
        matches!(self, PrimitiveKind::Char | PrimitiveKind::Int8 | PrimitiveKind::Uint8)
            || self.is_arithmetic()
    }

    /// Kinds with built-in bitwise operators.
    pub const fn is_integer_or_bool(self) -> bool {
        self.is_integer() || matches!(self, PrimitiveKind::Bool)
    }

    /// Kinds with a built-in primitive conversion to every other convertible kind.
    pub const fn is_convertible(self) -> bool {
        matches!(self, PrimitiveKind::Bool | PrimitiveKind::Char) || self.is_numeric()
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
