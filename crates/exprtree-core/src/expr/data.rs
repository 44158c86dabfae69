//! Kind-specific node payloads.

use std::fmt;

use ordered_float::OrderedFloat;

use crate::entries::MemberRef;
use crate::{TypeHash, primitives};

use super::Expr;

/// Literal payload of a constant node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Char(char),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    String(String),
}

impl ConstantValue {
    /// The type a constant gets when none is requested.
    ///
    /// `null` is typed `object`.
    pub fn natural_type(&self) -> TypeHash {
        match self {
            ConstantValue::Null => primitives::OBJECT,
            ConstantValue::Bool(_) => primitives::BOOL,
            ConstantValue::Char(_) => primitives::CHAR,
            ConstantValue::Int8(_) => primitives::INT8,
            ConstantValue::UInt8(_) => primitives::UINT8,
            ConstantValue::Int16(_) => primitives::INT16,
            ConstantValue::UInt16(_) => primitives::UINT16,
            ConstantValue::Int32(_) => primitives::INT32,
            ConstantValue::UInt32(_) => primitives::UINT32,
            ConstantValue::Int64(_) => primitives::INT64,
            ConstantValue::UInt64(_) => primitives::UINT64,
            ConstantValue::Float(_) => primitives::FLOAT,
            ConstantValue::Double(_) => primitives::DOUBLE,
            ConstantValue::String(_) => primitives::STRING,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConstantValue::Null)
    }
}

impl From<bool> for ConstantValue {
    fn from(v: bool) -> Self {
        ConstantValue::Bool(v)
    }
}

impl From<char> for ConstantValue {
    fn from(v: char) -> Self {
        ConstantValue::Char(v)
    }
}

impl From<i32> for ConstantValue {
    fn from(v: i32) -> Self {
        ConstantValue::Int32(v)
    }
}

impl From<u32> for ConstantValue {
    fn from(v: u32) -> Self {
        ConstantValue::UInt32(v)
    }
}

impl From<i64> for ConstantValue {
    fn from(v: i64) -> Self {
        ConstantValue::Int64(v)
    }
}

impl From<u64> for ConstantValue {
    fn from(v: u64) -> Self {
        ConstantValue::UInt64(v)
    }
}

impl From<f32> for ConstantValue {
    fn from(v: f32) -> Self {
        ConstantValue::Float(OrderedFloat(v))
    }
}

impl From<f64> for ConstantValue {
    fn from(v: f64) -> Self {
        ConstantValue::Double(OrderedFloat(v))
    }
}

impl From<&str> for ConstantValue {
    fn from(v: &str) -> Self {
        ConstantValue::String(v.to_string())
    }
}

impl From<String> for ConstantValue {
    fn from(v: String) -> Self {
        ConstantValue::String(v)
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Null => write!(f, "null"),
            ConstantValue::Bool(v) => write!(f, "{v}"),
            ConstantValue::Char(v) => write!(f, "'{v}'"),
            ConstantValue::Int8(v) => write!(f, "{v}"),
            ConstantValue::UInt8(v) => write!(f, "{v}"),
            ConstantValue::Int16(v) => write!(f, "{v}"),
            ConstantValue::UInt16(v) => write!(f, "{v}"),
            ConstantValue::Int32(v) => write!(f, "{v}"),
            ConstantValue::UInt32(v) => write!(f, "{v}"),
            ConstantValue::Int64(v) => write!(f, "{v}"),
            ConstantValue::UInt64(v) => write!(f, "{v}"),
            ConstantValue::Float(v) => write!(f, "{v}"),
            ConstantValue::Double(v) => write!(f, "{v}"),
            ConstantValue::String(v) => write!(f, "\"{v}\""),
        }
    }
}

/// Identity of a parameter node.
///
/// Two parameter nodes are the same parameter only if their ids match; the
/// name is informational.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterData {
    /// Process-unique id.
    pub id: u64,
    /// Optional display name.
    pub name: Option<String>,
}

/// A call to an `Add`-style method used by list initializers.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementInit {
    /// The resolved instance method.
    pub add_method: MemberRef,
    /// Arguments, already normalized against the method's parameters.
    pub arguments: Vec<Expr>,
}

/// One member initialization inside a member-init node.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberBinding {
    /// `Member = expression`
    Assignment { member: MemberRef, expression: Expr },
    /// `Member = { nested bindings }`
    MemberBinding {
        member: MemberRef,
        bindings: Vec<MemberBinding>,
    },
    /// `Member = { element initializers }`
    ListBinding {
        member: MemberRef,
        initializers: Vec<ElementInit>,
    },
}

impl MemberBinding {
    /// The member being initialized.
    pub fn member(&self) -> &MemberRef {
        match self {
            MemberBinding::Assignment { member, .. }
            | MemberBinding::MemberBinding { member, .. }
            | MemberBinding::ListBinding { member, .. } => member,
        }
    }
}

/// Children and resolved members of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprData {
    Constant(ConstantValue),
    Parameter(ParameterData),
    /// Unary operators, conversions, quote, type-as and array length.
    Unary {
        operand: Expr,
        method: Option<MemberRef>,
        is_lifted: bool,
        lift_to_null: bool,
    },
    /// Binary operators, coalesce and single-index array access.
    Binary {
        left: Expr,
        right: Expr,
        method: Option<MemberRef>,
        /// Coalesce conversion lambda.
        conversion: Option<Expr>,
        is_lifted: bool,
        lift_to_null: bool,
    },
    TypeIs {
        operand: Expr,
        type_operand: TypeHash,
    },
    MemberAccess {
        instance: Option<Expr>,
        member: MemberRef,
    },
    Call {
        instance: Option<Expr>,
        method: MemberRef,
        arguments: Vec<Expr>,
    },
    /// Object construction; `constructor` is absent for the default value of a value kind.
    New {
        constructor: Option<MemberRef>,
        arguments: Vec<Expr>,
        members: Vec<MemberRef>,
    },
    /// Array initializers or bounds.
    NewArray { expressions: Vec<Expr> },
    Conditional {
        test: Expr,
        if_true: Expr,
        if_false: Expr,
    },
    Invoke {
        target: Expr,
        arguments: Vec<Expr>,
    },
    Lambda {
        body: Expr,
        parameters: Vec<Expr>,
    },
    ListInit {
        new_expr: Expr,
        initializers: Vec<ElementInit>,
    },
    MemberInit {
        new_expr: Expr,
        bindings: Vec<MemberBinding>,
    },
}
