//! Conversions and type tests.
//!
//! `convert` needs no member when the conversion is primitive (identity,
//! numeric, enumeration, optional wrap or unwrap) or a reference conversion
//! (up or down the hierarchy, boxing, unboxing). Anything else goes through a
//! user-defined `op_Implicit`/`op_Explicit`.

use exprtree_core::{Expr, ExprData, ExprError, ExprKind, MemberRef, TypeHash, primitives};

use super::{ExprFactory, Result};
use crate::conversion::{
    find_user_conversion, has_primitive_conversion, has_reference_conversion, is_reference_assignable, non_ref_type,
};
use crate::operators::validate_operator_method;

impl ExprFactory<'_> {
    /// Convert `operand` to `ty`.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] for an unknown target type
    /// - [`ExprError::OperatorNotDefined`] when no conversion exists
    pub fn convert(&self, operand: Expr, ty: TypeHash) -> Result<Expr> {
        self.coerce(ExprKind::Convert, operand, ty, None)
    }

    /// Convert through an explicit static `method`.
    pub fn convert_with_method(&self, operand: Expr, ty: TypeHash, method: &MemberRef) -> Result<Expr> {
        self.coerce(ExprKind::Convert, operand, ty, Some(method))
    }

    /// Convert with overflow checking.
    pub fn convert_checked(&self, operand: Expr, ty: TypeHash) -> Result<Expr> {
        self.coerce(ExprKind::ConvertChecked, operand, ty, None)
    }

    pub fn convert_checked_with_method(&self, operand: Expr, ty: TypeHash, method: &MemberRef) -> Result<Expr> {
        self.coerce(ExprKind::ConvertChecked, operand, ty, Some(method))
    }

    /// `operand as ty`: `ty`, or null when the value is not one.
    ///
    /// # Errors
    ///
    /// [`ExprError::InvalidShape`] when `ty` is a non-optional value kind.
    pub fn type_as(&self, operand: Expr, ty: TypeHash) -> Result<Expr> {
        self.require_known(ty)?;
        if self.catalog.is_value_kind(ty) && !self.catalog.is_optional_wrapped(ty) {
            return Err(ExprError::invalid_shape(format!(
                "the type used in a type-as expression must be a reference or optional type, got '{}'",
                self.type_name(ty)
            )));
        }
        Ok(Expr::assemble(
            ExprKind::TypeAs,
            ty,
            ExprData::Unary {
                operand,
                method: None,
                is_lifted: false,
                lift_to_null: false,
            },
        ))
    }

    /// `operand is ty`, typed `bool`.
    pub fn type_is(&self, operand: Expr, ty: TypeHash) -> Result<Expr> {
        self.require_known(ty)?;
        Ok(Expr::assemble(
            ExprKind::TypeIs,
            primitives::BOOL,
            ExprData::TypeIs {
                operand,
                type_operand: ty,
            },
        ))
    }

    pub(super) fn coerce(&self, kind: ExprKind, operand: Expr, ty: TypeHash, method: Option<&MemberRef>) -> Result<Expr> {
        self.require_known(ty)?;
        let from = operand.static_type();

        let (method, is_lifted) = match method {
            Some(method) => (Some(method.clone()), self.coercion_method_lifts(kind, from, ty, method)?),
            None if has_primitive_conversion(self.catalog, from, ty)
                || has_reference_conversion(self.catalog, from, ty) =>
            {
                (None, false)
            }
            None => {
                let conversion = find_user_conversion(self.catalog, from, ty, false)
                    .ok_or_else(|| ExprError::binary_operator(kind, &self.type_name(from), &self.type_name(ty)))?;
                tracing::trace!(method = %conversion.method, lifted = conversion.is_lifted, "user-defined conversion");
                (Some(conversion.method), conversion.is_lifted)
            }
        };

        let lift_to_null = is_lifted && self.catalog.is_optional_wrapped(ty);
        Ok(Expr::assemble(
            kind,
            ty,
            ExprData::Unary {
                operand,
                method,
                is_lifted,
                lift_to_null,
            },
        ))
    }

    /// Check an explicit conversion method; returns whether it applies lifted.
    fn coercion_method_lifts(&self, kind: ExprKind, from: TypeHash, to: TypeHash, method: &MemberRef) -> Result<bool> {
        validate_operator_method(method, 1)?;
        let param = non_ref_type(self.catalog, method.params()[0].data_type);
        let ret = method.return_type();

        if is_reference_assignable(self.catalog, param, from) && ret == Some(to) {
            return Ok(false);
        }
        let any_optional = self.catalog.is_optional_wrapped(from) || self.catalog.is_optional_wrapped(to);
        if any_optional
            && is_reference_assignable(self.catalog, param, self.catalog.unwrap(from))
            && ret == Some(self.catalog.unwrap(to))
        {
            return Ok(true);
        }
        Err(ExprError::type_mismatch(format!(
            "the operand for '{kind}' does not match the parameters of method '{}'",
            method.name
        )))
    }

    fn require_known(&self, ty: TypeHash) -> Result<()> {
        if !self.catalog.exists(ty) {
            return Err(ExprError::invalid_shape(format!("unknown type '{}'", self.type_name(ty))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use exprtree_core::{ErrorKind, MemberEntry, Param, TypeCatalog, TypeEntry};
    use exprtree_registry::TypeRegistry;

    use super::super::test_support::{registry, ty};
    use super::*;

    fn celsius(r: &mut TypeRegistry) -> TypeHash {
        let celsius = TypeHash::from_name("Celsius");
        r.register_type(
            TypeEntry::value_type("Celsius")
                .with_member(MemberEntry::operator(
                    "op_Implicit",
                    vec![Param::new("value", primitives::DOUBLE)],
                    celsius,
                ))
                .with_member(MemberEntry::operator(
                    "op_Explicit",
                    vec![Param::new("value", celsius)],
                    primitives::DOUBLE,
                )),
        )
        .unwrap();
        celsius
    }

    #[test]
    fn numeric_conversions_need_no_method() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let c = f.convert(f.constant(1), primitives::INT64).unwrap();
        assert_eq!(c.static_type(), primitives::INT64);
        assert!(c.method().is_none());

        let narrowing = f.convert_checked(f.constant(1.5), primitives::INT32).unwrap();
        assert_eq!(narrowing.kind(), ExprKind::ConvertChecked);
    }

    #[test]
    fn reference_and_boxing_conversions() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let shape = f.parameter(ty("Shape"), "s").unwrap();
        assert!(f.convert(shape, ty("Circle")).is_ok());
        assert!(f.convert(f.constant(1), primitives::OBJECT).is_ok());
        let err = f.convert(f.constant("x"), primitives::INT32).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperatorNotDefined);
    }

    #[test]
    fn user_defined_conversions() {
        let mut r = registry();
        let celsius = celsius(&mut r);
        let f = ExprFactory::new(&r);

        let c = f.convert(f.constant(21.5), celsius).unwrap();
        assert_eq!(c.method().unwrap().name, "op_Implicit");

        let t = f.parameter(celsius, "t").unwrap();
        let back = f.convert(t, primitives::DOUBLE).unwrap();
        assert_eq!(back.method().unwrap().name, "op_Explicit");
    }

    #[test]
    fn explicit_method_may_lift() {
        let mut r = registry();
        let celsius = celsius(&mut r);
        let f = ExprFactory::new(&r);
        let op = r
            .declared_members(celsius, exprtree_core::MemberKinds::METHOD)
            .into_iter()
            .find(|m| m.name == "op_Explicit")
            .unwrap();

        let celsius_opt = r.wrap_optional(celsius).unwrap();
        let double_opt = r.wrap_optional(primitives::DOUBLE).unwrap();
        let t = f.parameter(celsius_opt, "t").unwrap();
        let c = f.convert_with_method(t, double_opt, &op).unwrap();
        assert!(c.is_lifted());
        assert_eq!(c.static_type(), double_opt);

        let err = f.convert_with_method(f.constant("x"), primitives::DOUBLE, &op).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn type_as_rejects_plain_value_kinds() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let o = f.parameter(primitives::OBJECT, "o").unwrap();
        assert!(f.type_as(o.clone(), primitives::STRING).is_ok());
        let int_opt = r.wrap_optional(primitives::INT32).unwrap();
        assert!(f.type_as(o.clone(), int_opt).is_ok());
        assert_eq!(
            f.type_as(o, primitives::INT32).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );
    }

    #[test]
    fn type_is_yields_bool() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let o = f.parameter(primitives::OBJECT, "o").unwrap();
        let test = f.type_is(o, ty("Shape")).unwrap();
        assert_eq!(test.static_type(), primitives::BOOL);
        assert_eq!(test.type_operand(), Some(ty("Shape")));
    }
}
