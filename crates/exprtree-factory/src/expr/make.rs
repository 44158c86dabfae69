//! Kind-driven entry points.
//!
//! Callers that carry the node kind as data (deserializers, rewriters)
//! build through [`ExprFactory::make_binary`] and
//! [`ExprFactory::make_unary`] instead of matching on the kind themselves.

use exprtree_core::{Expr, ExprError, ExprKind, MemberRef, TypeHash};

use super::{ExprFactory, Result};

impl ExprFactory<'_> {
    /// Build a binary node of `kind`.
    ///
    /// `lift_to_null` only affects comparisons; `conversion` only coalesce.
    ///
    /// # Errors
    ///
    /// [`ExprError::NotSupported`] for a kind that is not binary, otherwise
    /// whatever the kind's own operation reports.
    pub fn make_binary(
        &self,
        kind: ExprKind,
        left: Expr,
        right: Expr,
        lift_to_null: bool,
        method: Option<&MemberRef>,
        conversion: Option<Expr>,
    ) -> Result<Expr> {
        match kind {
            ExprKind::Coalesce => self.coalesce_with_conversion(left, right, conversion),
            ExprKind::ArrayIndex => self.array_index(left, right),
            kind if kind.is_comparison() => self.binary(kind, left, right, Some(lift_to_null), method),
            kind if kind.is_binary() => self.binary(kind, left, right, None, method),
            kind => Err(ExprError::not_supported(format!("'{kind}' is not a binary expression kind"))),
        }
    }

    /// Build a unary node of `kind`.
    ///
    /// `ty` is the target of conversions and type-as; other kinds ignore it.
    ///
    /// # Errors
    ///
    /// [`ExprError::NotSupported`] for a kind that is not unary.
    pub fn make_unary(&self, kind: ExprKind, operand: Expr, ty: TypeHash, method: Option<&MemberRef>) -> Result<Expr> {
        match kind {
            ExprKind::Convert | ExprKind::ConvertChecked => self.coerce(kind, operand, ty, method),
            ExprKind::TypeAs => self.type_as(operand, ty),
            ExprKind::Quote => self.quote(operand),
            ExprKind::ArrayLength => self.array_length(operand),
            ExprKind::Negate | ExprKind::NegateChecked | ExprKind::UnaryPlus | ExprKind::Not => {
                self.unary(kind, operand, method)
            }
            kind => Err(ExprError::not_supported(format!("'{kind}' is not a unary expression kind"))),
        }
    }
}
