//! Conditional expressions.

use exprtree_core::{Expr, ExprData, ExprError, ExprKind, primitives};

use super::{ExprFactory, Result};

impl ExprFactory<'_> {
    /// `test ? if_true : if_false`, typed like its branches.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] when `test` is not exactly `bool`
    /// - [`ExprError::TypeMismatch`] when the branch types differ
    pub fn condition(&self, test: Expr, if_true: Expr, if_false: Expr) -> Result<Expr> {
        if test.static_type() != primitives::BOOL {
            return Err(ExprError::invalid_shape(format!(
                "conditional test must be 'bool', got '{}'",
                self.type_name(test.static_type())
            )));
        }
        let ty = if_true.static_type();
        if ty != if_false.static_type() {
            return Err(ExprError::type_mismatch(format!(
                "argument types do not match: '{}' and '{}'",
                self.type_name(ty),
                self.type_name(if_false.static_type())
            )));
        }
        Ok(Expr::assemble(
            ExprKind::Conditional,
            ty,
            ExprData::Conditional {
                test,
                if_true,
                if_false,
            },
        ))
    }
}
