//! Constants and parameters.

use std::sync::atomic::{AtomicU64, Ordering};

use exprtree_core::{ConstantValue, Expr, ExprData, ExprError, ExprKind, ParameterData, TypeHash, TypeKind, primitives};

use super::{ExprFactory, Result};

/// Source of parameter identities.
static NEXT_PARAMETER_ID: AtomicU64 = AtomicU64::new(1);

impl ExprFactory<'_> {
    /// A constant typed with its value's natural type.
    ///
    /// `null` is typed `object`.
    pub fn constant(&self, value: impl Into<ConstantValue>) -> Expr {
        let value = value.into();
        Expr::assemble(ExprKind::Constant, value.natural_type(), ExprData::Constant(value))
    }

    /// A constant with an explicit static type.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] for `null` in a non-optional value kind
    ///   or an unknown type
    /// - [`ExprError::TypeMismatch`] when the value's type is not assignable
    ///   to `ty`; an enumeration accepts values of its underlying type
    pub fn constant_typed(&self, value: impl Into<ConstantValue>, ty: TypeHash) -> Result<Expr> {
        let value = value.into();
        if !self.catalog.exists(ty) || ty == primitives::VOID {
            return Err(ExprError::invalid_shape(format!(
                "'{}' is not a valid constant type",
                self.type_name(ty)
            )));
        }

        if value.is_null() {
            if self.catalog.is_value_kind(ty) && !self.catalog.is_optional_wrapped(ty) {
                return Err(ExprError::invalid_shape(format!(
                    "null cannot be used as a constant of non-optional value type '{}'",
                    self.type_name(ty)
                )));
            }
        } else {
            let natural = value.natural_type();
            let target = self.catalog.unwrap(ty);
            let from_underlying =
                matches!(self.catalog.kind(target), Some(TypeKind::Enum { underlying }) if underlying == natural);
            if !self.catalog.is_assignable_from(ty, natural) && !from_underlying {
                return Err(ExprError::type_mismatch(format!(
                    "a constant of type '{}' cannot be typed '{}'",
                    self.type_name(natural),
                    self.type_name(ty)
                )));
            }
        }

        Ok(Expr::assemble(ExprKind::Constant, ty, ExprData::Constant(value)))
    }

    /// A new parameter of `ty`.
    ///
    /// Every call yields a distinct parameter even when `name` repeats; an
    /// empty `name` leaves the parameter unnamed.
    ///
    /// # Errors
    ///
    /// [`ExprError::InvalidShape`] for `void`, by-ref and unknown types.
    pub fn parameter(&self, ty: TypeHash, name: &str) -> Result<Expr> {
        if ty == primitives::VOID || self.catalog.is_by_ref(ty) || !self.catalog.exists(ty) {
            return Err(ExprError::invalid_shape(format!(
                "'{}' is not a valid parameter type",
                self.type_name(ty)
            )));
        }
        let id = NEXT_PARAMETER_ID.fetch_add(1, Ordering::Relaxed);
        let name = (!name.is_empty()).then(|| name.to_string());
        Ok(Expr::assemble(
            ExprKind::Parameter,
            ty,
            ExprData::Parameter(ParameterData { id, name }),
        ))
    }
}
