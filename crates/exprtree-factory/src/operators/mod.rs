//! Operator resolution for node construction.
//!
//! Each operator node kind is described by a policy: the operand type class
//! its built-in form requires, the name of the user-defined operator method
//! that stands in for it, and how the result type is derived. Resolution
//! then runs the same steps for every kind:
//!
//! 1. Built-in fast path on identical operand types of the required class
//! 2. User-defined operator on the left operand's type, then the right's
//! 3. Lifted retry over unwrapped types when both operands are optional
//!
//! Short-circuit operators add the consistency checks of
//! [`binary::validate_conditional_logic`].

mod binary;
mod primitive;
mod unary;

pub use binary::{resolve_binary, resolve_binary_with_method, validate_conditional_logic};
pub use unary::{resolve_unary, resolve_unary_with_method};

use exprtree_core::{ExprError, ExprKind, MemberRef, PrimitiveKind, TypeCatalog, TypeHash, primitives};

/// Result of operator resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorResolution {
    /// Built-in operator on the operand type; no member involved.
    Primitive {
        /// Result type of the operation.
        result_type: TypeHash,
        /// Whether the operands are optional-wrapped.
        is_lifted: bool,
    },
    /// User-defined or caller-supplied operator method.
    Method {
        /// The static operator method.
        method: MemberRef,
        /// Result type of the operation.
        result_type: TypeHash,
        /// Whether the method was applied over unwrapped operand types.
        is_lifted: bool,
    },
}

impl OperatorResolution {
    pub fn result_type(&self) -> TypeHash {
        match self {
            OperatorResolution::Primitive { result_type, .. } | OperatorResolution::Method { result_type, .. } => {
                *result_type
            }
        }
    }

    pub fn is_lifted(&self) -> bool {
        match self {
            OperatorResolution::Primitive { is_lifted, .. } | OperatorResolution::Method { is_lifted, .. } => {
                *is_lifted
            }
        }
    }

    pub fn method(&self) -> Option<&MemberRef> {
        match self {
            OperatorResolution::Method { method, .. } => Some(method),
            OperatorResolution::Primitive { .. } => None,
        }
    }

    pub fn into_method(self) -> Option<MemberRef> {
        match self {
            OperatorResolution::Method { method, .. } => Some(method),
            OperatorResolution::Primitive { .. } => None,
        }
    }
}

/// Check that `method` can stand in for an operator of `arity` operands.
///
/// # Errors
///
/// [`ExprError::InvalidShape`] unless `method` is a static, closed,
/// non-void method with exactly `arity` parameters.
pub fn validate_operator_method(method: &MemberRef, arity: usize) -> Result<(), ExprError> {
    if !method.is_method() {
        return Err(ExprError::invalid_shape(format!("'{}' is not a method", method.name)));
    }
    if !method.is_static {
        return Err(ExprError::invalid_shape(format!(
            "user-defined operator method '{}' must be static",
            method.name
        )));
    }
    if method.returns_void() {
        return Err(ExprError::invalid_shape(format!(
            "user-defined operator method '{}' must not be void",
            method.name
        )));
    }
    if method.is_generic_definition() {
        return Err(ExprError::invalid_shape(format!(
            "method '{}' is a generic method definition",
            method.name
        )));
    }
    if method.params().len() != arity {
        return Err(ExprError::invalid_shape(format!(
            "incorrect number of arguments for method '{}': expected {arity}, got {}",
            method.name,
            method.params().len()
        )));
    }
    Ok(())
}

// ============================================================================
// Policies
// ============================================================================

/// Operand type class a built-in operator requires.
///
/// Classes are checked against the unwrapped operand type, so `int?` is
/// arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// `short ushort int uint long ulong float double`
    Arithmetic,
    /// Arithmetic without the unsigned kinds.
    SignedArithmetic,
    /// Integer kinds and `bool`.
    IntegerOrBool,
    /// Integer kinds only.
    Integer,
    /// Exactly `bool`.
    Bool,
    /// Arithmetic plus `char`, `sbyte` and `byte`.
    Numeric,
    /// Numeric, `bool`, enumerations and `object`.
    Equality,
    /// Exactly `double`.
    Double,
}

impl TypeClass {
    /// Check whether `ty` belongs to this class.
    pub fn admits<C: TypeCatalog + ?Sized>(self, catalog: &C, ty: TypeHash) -> bool {
        let inner = catalog.unwrap(ty);
        let kind = catalog.primitive_kind(inner);
        match self {
            TypeClass::Arithmetic => kind.is_some_and(PrimitiveKind::is_arithmetic),
            TypeClass::SignedArithmetic => kind.is_some_and(|k| k.is_arithmetic() && !k.is_unsigned()),
            TypeClass::IntegerOrBool => kind.is_some_and(PrimitiveKind::is_integer_or_bool),
            TypeClass::Integer => kind.is_some_and(PrimitiveKind::is_integer),
            TypeClass::Bool => inner == primitives::BOOL,
            TypeClass::Numeric => kind.is_some_and(PrimitiveKind::is_numeric),
            TypeClass::Equality => {
                kind.is_some_and(|k| k.is_numeric() || k == PrimitiveKind::Bool)
                    || catalog.is_enum(inner)
                    || ty == primitives::OBJECT
            }
            TypeClass::Double => inner == primitives::DOUBLE,
        }
    }
}

/// How the built-in form derives its result type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultRule {
    /// The (left) operand type.
    Operand,
    /// `bool`, or `bool?` when lifted with lift-to-null.
    Boolean,
}

/// What the built-in form requires of the two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandRule {
    /// Both operands have the same type, of the policy's class.
    Identical,
    /// Left operand of the policy's class, right operand `int` or `int?`.
    ShiftCount,
}

/// Per-kind description of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryPolicy {
    pub kind: ExprKind,
    pub class: TypeClass,
    pub operands: OperandRule,
    pub result: ResultRule,
    /// User-defined operator method name.
    pub operator_name: &'static str,
    /// Lift-to-null used by the plain entry point.
    pub lift_to_null: bool,
    /// `&&`/`||`: user operators need `op_True`/`op_False`.
    pub short_circuit: bool,
    /// Reference and null equality are accepted when nothing else applies.
    pub reference_equality: bool,
}

impl BinaryPolicy {
    const fn new(kind: ExprKind, class: TypeClass, result: ResultRule, operator_name: &'static str) -> Self {
        Self {
            kind,
            class,
            operands: OperandRule::Identical,
            result,
            operator_name,
            lift_to_null: matches!(result, ResultRule::Operand),
            short_circuit: false,
            reference_equality: false,
        }
    }

    const fn arithmetic(kind: ExprKind, operator_name: &'static str) -> Self {
        Self::new(kind, TypeClass::Arithmetic, ResultRule::Operand, operator_name)
    }

    const fn relational(kind: ExprKind, operator_name: &'static str) -> Self {
        Self::new(kind, TypeClass::Numeric, ResultRule::Boolean, operator_name)
    }

    const fn equality(kind: ExprKind, operator_name: &'static str) -> Self {
        let mut policy = Self::new(kind, TypeClass::Equality, ResultRule::Boolean, operator_name);
        policy.reference_equality = true;
        policy
    }

    const fn shift(kind: ExprKind, operator_name: &'static str) -> Self {
        let mut policy = Self::new(kind, TypeClass::Integer, ResultRule::Operand, operator_name);
        policy.operands = OperandRule::ShiftCount;
        policy
    }

    const fn short_circuit(kind: ExprKind, operator_name: &'static str) -> Self {
        let mut policy = Self::new(kind, TypeClass::Bool, ResultRule::Operand, operator_name);
        policy.short_circuit = true;
        policy
    }

    /// Get the policy of a binary operator kind.
    ///
    /// `Coalesce` and `ArrayIndex` are structural and have no policy.
    pub const fn for_kind(kind: ExprKind) -> Option<Self> {
        use ExprKind::*;
        Some(match kind {
            Add | AddChecked => Self::arithmetic(kind, "op_Addition"),
            Subtract | SubtractChecked => Self::arithmetic(kind, "op_Subtraction"),
            Multiply | MultiplyChecked => Self::arithmetic(kind, "op_Multiply"),
            Divide => Self::arithmetic(kind, "op_Division"),
            Modulo => Self::arithmetic(kind, "op_Modulus"),
            Power => Self::new(kind, TypeClass::Double, ResultRule::Operand, "op_Exponent"),
            And => Self::new(kind, TypeClass::IntegerOrBool, ResultRule::Operand, "op_BitwiseAnd"),
            Or => Self::new(kind, TypeClass::IntegerOrBool, ResultRule::Operand, "op_BitwiseOr"),
            ExclusiveOr => Self::new(kind, TypeClass::IntegerOrBool, ResultRule::Operand, "op_ExclusiveOr"),
            AndAlso => Self::short_circuit(kind, "op_BitwiseAnd"),
            OrElse => Self::short_circuit(kind, "op_BitwiseOr"),
            LeftShift => Self::shift(kind, "op_LeftShift"),
            RightShift => Self::shift(kind, "op_RightShift"),
            Equal => Self::equality(kind, "op_Equality"),
            NotEqual => Self::equality(kind, "op_Inequality"),
            LessThan => Self::relational(kind, "op_LessThan"),
            LessThanOrEqual => Self::relational(kind, "op_LessThanOrEqual"),
            GreaterThan => Self::relational(kind, "op_GreaterThan"),
            GreaterThanOrEqual => Self::relational(kind, "op_GreaterThanOrEqual"),
            _ => return None,
        })
    }
}

/// Per-kind description of a unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnaryPolicy {
    pub kind: ExprKind,
    pub class: TypeClass,
    /// User-defined operator method names, tried in order.
    pub operator_names: &'static [&'static str],
}

impl UnaryPolicy {
    /// Get the policy of a unary operator kind.
    ///
    /// Conversions, quoting, type-as and array length are structural and have
    /// no policy.
    pub const fn for_kind(kind: ExprKind) -> Option<Self> {
        let (class, operator_names): (TypeClass, &'static [&'static str]) = match kind {
            ExprKind::Negate | ExprKind::NegateChecked => (TypeClass::SignedArithmetic, &["op_UnaryNegation"]),
            ExprKind::UnaryPlus => (TypeClass::Arithmetic, &["op_UnaryPlus"]),
            ExprKind::Not => (TypeClass::IntegerOrBool, &["op_LogicalNot", "op_OnesComplement"]),
            _ => return None,
        };
        Some(Self {
            kind,
            class,
            operator_names,
        })
    }
}

#[cfg(test)]
mod tests {
    use exprtree_core::TypeEntry;
    use exprtree_registry::TypeRegistry;

    use super::*;

    #[test]
    fn every_operator_kind_has_a_policy() {
        for kind in ExprKind::ALL {
            let binary = BinaryPolicy::for_kind(kind).is_some();
            let unary = UnaryPolicy::for_kind(kind).is_some();
            assert!(!(binary && unary), "{kind}");
            if kind.is_comparison() {
                assert!(binary, "{kind}");
            }
        }
        assert!(BinaryPolicy::for_kind(ExprKind::Coalesce).is_none());
        assert!(BinaryPolicy::for_kind(ExprKind::ArrayIndex).is_none());
        assert!(UnaryPolicy::for_kind(ExprKind::Convert).is_none());
    }

    #[test]
    fn arithmetic_lifts_to_null_and_comparisons_do_not() {
        assert!(BinaryPolicy::for_kind(ExprKind::Add).unwrap().lift_to_null);
        assert!(!BinaryPolicy::for_kind(ExprKind::LessThan).unwrap().lift_to_null);
        assert!(BinaryPolicy::for_kind(ExprKind::Equal).unwrap().reference_equality);
        assert!(BinaryPolicy::for_kind(ExprKind::OrElse).unwrap().short_circuit);
    }

    #[test]
    fn classes_check_unwrapped_type() {
        let mut r = TypeRegistry::with_builtins();
        let color = r
            .register_type(TypeEntry::enumeration("Color", primitives::INT32))
            .unwrap();
        let int_opt = r.wrap_optional(primitives::INT32).unwrap();

        assert!(TypeClass::Arithmetic.admits(&r, int_opt));
        assert!(!TypeClass::Arithmetic.admits(&r, primitives::UINT8));
        assert!(TypeClass::Numeric.admits(&r, primitives::UINT8));
        assert!(!TypeClass::SignedArithmetic.admits(&r, primitives::UINT32));
        assert!(TypeClass::IntegerOrBool.admits(&r, primitives::BOOL));
        assert!(!TypeClass::Arithmetic.admits(&r, color));
        assert!(TypeClass::Equality.admits(&r, color));
        assert!(TypeClass::Equality.admits(&r, primitives::OBJECT));
        assert!(!TypeClass::Equality.admits(&r, primitives::STRING));
    }
}
