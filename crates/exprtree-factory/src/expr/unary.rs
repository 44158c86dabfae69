//! Unary node construction.

use exprtree_core::{Expr, ExprData, ExprError, ExprKind, MemberRef, primitives};

use super::{ExprFactory, Result};
use crate::args::quote_node;
use crate::operators::{OperatorResolution, UnaryPolicy, resolve_unary, resolve_unary_with_method};

impl ExprFactory<'_> {
    /// Arithmetic negation; built in for signed arithmetic types.
    pub fn negate(&self, operand: Expr) -> Result<Expr> {
        self.unary(ExprKind::Negate, operand, None)
    }

    pub fn negate_with_method(&self, operand: Expr, method: &MemberRef) -> Result<Expr> {
        self.unary(ExprKind::Negate, operand, Some(method))
    }

    /// Negation with overflow checking.
    pub fn negate_checked(&self, operand: Expr) -> Result<Expr> {
        self.unary(ExprKind::NegateChecked, operand, None)
    }

    pub fn negate_checked_with_method(&self, operand: Expr, method: &MemberRef) -> Result<Expr> {
        self.unary(ExprKind::NegateChecked, operand, Some(method))
    }

    /// Unary plus; built in for arithmetic types.
    pub fn unary_plus(&self, operand: Expr) -> Result<Expr> {
        self.unary(ExprKind::UnaryPlus, operand, None)
    }

    pub fn unary_plus_with_method(&self, operand: Expr, method: &MemberRef) -> Result<Expr> {
        self.unary(ExprKind::UnaryPlus, operand, Some(method))
    }

    /// Logical or bitwise complement.
    ///
    /// Built in for integer and `bool` types; otherwise `op_LogicalNot`, then
    /// `op_OnesComplement`.
    pub fn not(&self, operand: Expr) -> Result<Expr> {
        self.unary(ExprKind::Not, operand, None)
    }

    pub fn not_with_method(&self, operand: Expr, method: &MemberRef) -> Result<Expr> {
        self.unary(ExprKind::Not, operand, Some(method))
    }

    /// Length of a one-dimensional array, typed `int`.
    ///
    /// # Errors
    ///
    /// [`ExprError::InvalidShape`] unless `array` is a rank-1 array.
    pub fn array_length(&self, array: Expr) -> Result<Expr> {
        let ty = array.static_type();
        if !self.catalog.is_array(ty) {
            return Err(ExprError::invalid_shape(format!(
                "argument of type '{}' must be an array",
                self.type_name(ty)
            )));
        }
        if self.catalog.rank(ty) != Some(1) {
            return Err(ExprError::invalid_shape(format!(
                "argument of type '{}' must be a single-dimensional array",
                self.type_name(ty)
            )));
        }
        Ok(Expr::assemble(
            ExprKind::ArrayLength,
            primitives::INT32,
            ExprData::Unary {
                operand: array,
                method: None,
                is_lifted: false,
                lift_to_null: false,
            },
        ))
    }

    /// Wrap `expression` as data; the node is typed with its node class.
    pub fn quote(&self, expression: Expr) -> Result<Expr> {
        quote_node(self.catalog, expression)
    }

    /// Build an operator node of `kind`.
    pub(super) fn unary(&self, kind: ExprKind, operand: Expr, method: Option<&MemberRef>) -> Result<Expr> {
        let policy = UnaryPolicy::for_kind(kind)
            .ok_or_else(|| ExprError::not_supported(format!("'{kind}' is not a unary operator")))?;
        let operand_ty = operand.static_type();
        let resolution = match method {
            Some(method) => resolve_unary_with_method(self.catalog, &policy, operand_ty, method)?,
            None => resolve_unary(self.catalog, &policy, operand_ty)?,
        };
        Ok(self.assemble_unary(kind, operand, resolution))
    }

    pub(super) fn assemble_unary(&self, kind: ExprKind, operand: Expr, resolution: OperatorResolution) -> Expr {
        let ty = resolution.result_type();
        let is_lifted = resolution.is_lifted();
        let lift_to_null = is_lifted && self.catalog.is_optional_wrapped(ty);
        Expr::assemble(
            kind,
            ty,
            ExprData::Unary {
                operand,
                method: resolution.into_method(),
                is_lifted,
                lift_to_null,
            },
        )
    }
}
