//! Binary node construction.
//!
//! Operator kinds share one path: look up the kind's [`BinaryPolicy`],
//! resolve (fast path, user operator, lifted retry), then assemble. The
//! per-kind methods below are thin entry points over it.

use exprtree_core::{Expr, ExprData, ExprError, ExprKind, MemberKinds, MemberRef, TypeHash, primitives};

use super::{ExprFactory, Result};
use crate::conversion::{is_implicitly_convertible, is_reference_assignable, non_ref_type};
use crate::operators::{BinaryPolicy, OperatorResolution, resolve_binary, resolve_binary_with_method};

macro_rules! binary_operator {
    ($(#[$doc:meta])* $kind:ident => $name:ident, $with_method:ident) => {
        $(#[$doc])*
        pub fn $name(&self, left: Expr, right: Expr) -> Result<Expr> {
            self.binary(ExprKind::$kind, left, right, None, None)
        }

        $(#[$doc])*
        ///
        /// Resolved through the static operator `method` instead of a lookup.
        pub fn $with_method(&self, left: Expr, right: Expr, method: &MemberRef) -> Result<Expr> {
            self.binary(ExprKind::$kind, left, right, None, Some(method))
        }
    };
}

macro_rules! comparison_operator {
    ($(#[$doc:meta])* $kind:ident => $name:ident, $lifted:ident) => {
        $(#[$doc])*
        pub fn $name(&self, left: Expr, right: Expr) -> Result<Expr> {
            self.binary(ExprKind::$kind, left, right, None, None)
        }

        $(#[$doc])*
        ///
        /// With optional operands the result is `bool?` when `lift_to_null`
        /// is set. An explicit `method` replaces operator lookup.
        pub fn $lifted(
            &self,
            left: Expr,
            right: Expr,
            lift_to_null: bool,
            method: Option<&MemberRef>,
        ) -> Result<Expr> {
            self.binary(ExprKind::$kind, left, right, Some(lift_to_null), method)
        }
    };
}

impl ExprFactory<'_> {
    binary_operator!(
        /// `left + right`
        Add => add, add_with_method
    );
    binary_operator!(
        /// `left + right` with overflow checking.
        AddChecked => add_checked, add_checked_with_method
    );
    binary_operator!(
        /// `left - right`
        Subtract => subtract, subtract_with_method
    );
    binary_operator!(
        /// `left - right` with overflow checking.
        SubtractChecked => subtract_checked, subtract_checked_with_method
    );
    binary_operator!(
        /// `left * right`
        Multiply => multiply, multiply_with_method
    );
    binary_operator!(
        /// `left * right` with overflow checking.
        MultiplyChecked => multiply_checked, multiply_checked_with_method
    );
    binary_operator!(
        /// `left / right`
        Divide => divide, divide_with_method
    );
    binary_operator!(
        /// `left % right`
        Modulo => modulo, modulo_with_method
    );
    binary_operator!(
        /// `left` raised to `right`; built in for `double` only.
        Power => power, power_with_method
    );
    binary_operator!(
        /// Bitwise or logical `&`.
        And => and, and_with_method
    );
    binary_operator!(
        /// Bitwise or logical `|`.
        Or => or, or_with_method
    );
    binary_operator!(
        /// `left ^ right`
        ExclusiveOr => exclusive_or, exclusive_or_with_method
    );
    binary_operator!(
        /// Short-circuit `&&`.
        AndAlso => and_also, and_also_with_method
    );
    binary_operator!(
        /// Short-circuit `||`.
        OrElse => or_else, or_else_with_method
    );
    binary_operator!(
        /// `left << right`; the count is `int`.
        LeftShift => left_shift, left_shift_with_method
    );
    binary_operator!(
        /// `left >> right`; the count is `int`.
        RightShift => right_shift, right_shift_with_method
    );

    comparison_operator!(
        /// `left == right`
        Equal => equal, equal_lifted
    );
    comparison_operator!(
        /// `left != right`
        NotEqual => not_equal, not_equal_lifted
    );
    comparison_operator!(
        /// `left < right`
        LessThan => less_than, less_than_lifted
    );
    comparison_operator!(
        /// `left <= right`
        LessThanOrEqual => less_than_or_equal, less_than_or_equal_lifted
    );
    comparison_operator!(
        /// `left > right`
        GreaterThan => greater_than, greater_than_lifted
    );
    comparison_operator!(
        /// `left >= right`
        GreaterThanOrEqual => greater_than_or_equal, greater_than_or_equal_lifted
    );

    /// Build an operator node of `kind`.
    ///
    /// `lift_to_null` defaults to the kind's policy when `None`.
    pub(super) fn binary(
        &self,
        kind: ExprKind,
        left: Expr,
        right: Expr,
        lift_to_null: Option<bool>,
        method: Option<&MemberRef>,
    ) -> Result<Expr> {
        let policy = BinaryPolicy::for_kind(kind)
            .ok_or_else(|| ExprError::not_supported(format!("'{kind}' is not a binary operator")))?;
        let lift_to_null = lift_to_null.unwrap_or(policy.lift_to_null);
        let resolution = match method {
            Some(method) => resolve_binary_with_method(
                self.catalog,
                &policy,
                left.static_type(),
                right.static_type(),
                method,
                lift_to_null,
            )?,
            None => resolve_binary(self.catalog, &policy, &left, &right, lift_to_null)?,
        };
        Ok(self.assemble_binary(kind, left, right, resolution))
    }

    fn assemble_binary(&self, kind: ExprKind, left: Expr, right: Expr, resolution: OperatorResolution) -> Expr {
        let ty = resolution.result_type();
        let is_lifted = resolution.is_lifted();
        let lift_to_null = is_lifted && self.catalog.is_optional_wrapped(ty);
        Expr::assemble(
            kind,
            ty,
            ExprData::Binary {
                left,
                right,
                method: resolution.into_method(),
                conversion: None,
                is_lifted,
                lift_to_null,
            },
        )
    }

    // ==========================================================================
    // Coalesce
    // ==========================================================================

    /// `left ?? right`
    ///
    /// The result is the unwrapped left type when `right` converts to it, else
    /// the left type, else the right type.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] when `left` is a non-optional value kind
    /// - [`ExprError::TypeMismatch`] when no side converts to the other
    pub fn coalesce(&self, left: Expr, right: Expr) -> Result<Expr> {
        let ty = self.coalesce_type(&left, &right)?;
        Ok(Expr::assemble(
            ExprKind::Coalesce,
            ty,
            ExprData::Binary {
                left,
                right,
                method: None,
                conversion: None,
                is_lifted: false,
                lift_to_null: false,
            },
        ))
    }

    /// `left ?? right` with a conversion lambda applied to a non-null `left`.
    ///
    /// The lambda takes one parameter accepting the left value (or its
    /// unwrapped form) and returns exactly the right type, which is the
    /// node's type.
    pub fn coalesce_with_conversion(&self, left: Expr, right: Expr, conversion: Option<Expr>) -> Result<Expr> {
        let Some(conversion) = conversion else {
            return self.coalesce(left, right);
        };
        let left_ty = left.static_type();
        self.require_nullable_left(left_ty)?;
        if conversion.kind() != ExprKind::Lambda {
            return Err(ExprError::invalid_shape("coalesce conversion must be a lambda"));
        }
        let invoke = self
            .catalog
            .delegate_invoke(conversion.static_type())
            .ok_or_else(|| ExprError::invalid_shape("coalesce conversion must be a lambda"))?;
        let ret = invoke.return_type().unwrap_or(primitives::VOID);
        if ret == primitives::VOID {
            return Err(ExprError::invalid_shape("coalesce conversion must not return void"));
        }
        let params = invoke.params();
        if params.len() != 1 {
            return Err(ExprError::invalid_shape(format!(
                "coalesce conversion must take one parameter, got {}",
                params.len()
            )));
        }
        if ret != right.static_type() {
            return Err(ExprError::type_mismatch(format!(
                "coalesce conversion returns '{}' but the right operand is '{}'",
                self.type_name(ret),
                self.type_name(right.static_type())
            )));
        }
        let param = non_ref_type(self.catalog, params[0].data_type);
        if !is_reference_assignable(self.catalog, param, self.catalog.unwrap(left_ty))
            && !is_reference_assignable(self.catalog, param, left_ty)
        {
            return Err(ExprError::type_mismatch(format!(
                "coalesce conversion parameter '{}' does not accept '{}'",
                self.type_name(param),
                self.type_name(left_ty)
            )));
        }

        let ty = right.static_type();
        Ok(Expr::assemble(
            ExprKind::Coalesce,
            ty,
            ExprData::Binary {
                left,
                right,
                method: None,
                conversion: Some(conversion),
                is_lifted: false,
                lift_to_null: false,
            },
        ))
    }

    fn require_nullable_left(&self, left: TypeHash) -> Result<()> {
        if self.catalog.is_value_kind(left) && !self.catalog.is_optional_wrapped(left) {
            return Err(ExprError::invalid_shape(format!(
                "coalesce used with non-nullable type '{}'",
                self.type_name(left)
            )));
        }
        Ok(())
    }

    fn coalesce_type(&self, left: &Expr, right: &Expr) -> Result<TypeHash> {
        let left = left.static_type();
        let right = right.static_type();
        self.require_nullable_left(left)?;
        let stripped = self.catalog.unwrap(left);
        if self.catalog.is_optional_wrapped(left) && is_implicitly_convertible(self.catalog, right, stripped) {
            Ok(stripped)
        } else if is_implicitly_convertible(self.catalog, right, left) {
            Ok(left)
        } else if is_implicitly_convertible(self.catalog, stripped, right) {
            Ok(right)
        } else {
            Err(ExprError::type_mismatch(format!(
                "coalesce operands '{}' and '{}' have no common type",
                self.type_name(left),
                self.type_name(right)
            )))
        }
    }

    // ==========================================================================
    // Array index
    // ==========================================================================

    /// `array[index]` on a one-dimensional array.
    ///
    /// # Errors
    ///
    /// [`ExprError::InvalidShape`] unless `array` is a rank-1 array and
    /// `index` is `int`.
    pub fn array_index(&self, array: Expr, index: Expr) -> Result<Expr> {
        let array_ty = array.static_type();
        let element = self.require_array(array_ty)?;
        if self.catalog.rank(array_ty) != Some(1) {
            return Err(ExprError::invalid_shape(format!(
                "incorrect number of indexes for array of type '{}'",
                self.type_name(array_ty)
            )));
        }
        self.require_index(&index)?;
        Ok(Expr::assemble(
            ExprKind::ArrayIndex,
            element,
            ExprData::Binary {
                left: array,
                right: index,
                method: None,
                conversion: None,
                is_lifted: false,
                lift_to_null: false,
            },
        ))
    }

    /// `array[i, j, ...]`, built as a call to the array's `Get` accessor.
    pub fn array_index_multi(&self, array: Expr, indexes: Vec<Expr>) -> Result<Expr> {
        let array_ty = array.static_type();
        self.require_array(array_ty)?;
        if self.catalog.rank(array_ty) != Some(indexes.len() as u32) {
            return Err(ExprError::invalid_shape(format!(
                "incorrect number of indexes for array of type '{}': got {}",
                self.type_name(array_ty),
                indexes.len()
            )));
        }
        for index in &indexes {
            self.require_index(index)?;
        }
        let get = self
            .catalog
            .declared_members(array_ty, MemberKinds::METHOD)
            .into_iter()
            .find(|m| m.name == "Get" && !m.is_static)
            .ok_or_else(|| self.member_not_found(array_ty, "Get", "is an array accessor"))?;
        self.call(Some(array), &get, indexes)
    }

    fn require_array(&self, ty: TypeHash) -> Result<TypeHash> {
        match self.catalog.element_type(ty) {
            Some(element) if self.catalog.is_array(ty) => Ok(element),
            _ => Err(ExprError::invalid_shape(format!(
                "argument of type '{}' must be an array",
                self.type_name(ty)
            ))),
        }
    }

    fn require_index(&self, index: &Expr) -> Result<()> {
        if index.static_type() != primitives::INT32 {
            return Err(ExprError::invalid_shape(format!(
                "array index must be 'int', got '{}'",
                self.type_name(index.static_type())
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use exprtree_core::{ConstantValue, ErrorKind, MemberEntry, Param, TypeCatalog, TypeEntry};
    use exprtree_registry::TypeRegistry;

    use super::super::test_support::{registry, ty};
    use super::*;

    fn money(r: &mut TypeRegistry) -> TypeHash {
        let money = TypeHash::from_name("Money");
        r.register_type(
            TypeEntry::value_type("Money").with_member(MemberEntry::operator(
                "op_Addition",
                vec![Param::new("a", money), Param::new("b", money)],
                money,
            )),
        )
        .unwrap();
        money
    }

    #[test]
    fn int_addition_takes_fast_path() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let sum = f.add(f.constant(2), f.constant(3)).unwrap();
        assert_eq!(sum.kind(), ExprKind::Add);
        assert_eq!(sum.static_type(), primitives::INT32);
        assert!(sum.method().is_none());
    }

    #[test]
    fn checked_kinds_are_tagged() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let sum = f.add_checked(f.constant(2), f.constant(3)).unwrap();
        assert_eq!(sum.kind(), ExprKind::AddChecked);
    }

    #[test]
    fn mixed_operands_are_not_defined() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let err = f.add(f.constant(2), f.constant(3.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperatorNotDefined);
    }

    #[test]
    fn user_operator_is_recorded() {
        let mut r = registry();
        let money = money(&mut r);
        let f = ExprFactory::new(&r);
        let a = f.parameter(money, "a").unwrap();
        let b = f.parameter(money, "b").unwrap();
        let sum = f.add(a, b).unwrap();
        assert_eq!(sum.static_type(), money);
        assert_eq!(sum.method().unwrap().name, "op_Addition");
    }

    #[test]
    fn lifted_comparison_follows_lift_to_null() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let int_opt = r.wrap_optional(primitives::INT32).unwrap();
        let a = f.parameter(int_opt, "a").unwrap();
        let b = f.parameter(int_opt, "b").unwrap();

        let plain = f.less_than(a.clone(), b.clone()).unwrap();
        assert_eq!(plain.static_type(), primitives::BOOL);
        assert!(plain.is_lifted());
        assert!(!plain.is_lifted_to_null());

        let to_null = f.less_than_lifted(a, b, true, None).unwrap();
        assert_eq!(to_null.static_type(), r.wrap_optional(primitives::BOOL).unwrap());
        assert!(to_null.is_lifted_to_null());
    }

    #[test]
    fn and_also_over_optional_bool() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let bool_opt = r.wrap_optional(primitives::BOOL).unwrap();
        let a = f.parameter(bool_opt, "a").unwrap();
        let b = f.parameter(bool_opt, "b").unwrap();
        let both = f.and_also(a, b).unwrap();
        assert_eq!(both.static_type(), bool_opt);
        assert!(both.method().is_none());
    }

    #[test]
    fn shift_count_is_int() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let shifted = f.left_shift(f.constant(1i64), f.constant(3)).unwrap();
        assert_eq!(shifted.static_type(), primitives::INT64);
    }

    #[test]
    fn reference_equality_and_string_operator() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let shape = f.parameter(ty("Shape"), "s").unwrap();
        let circle = f.parameter(ty("Circle"), "c").unwrap();
        let eq = f.equal(shape, circle).unwrap();
        assert_eq!(eq.static_type(), primitives::BOOL);
        assert!(eq.method().is_none());

        let eq = f.equal(f.constant("a"), f.constant("b")).unwrap();
        assert_eq!(eq.method().unwrap().name, "op_Equality");
    }

    #[test]
    fn coalesce_result_types() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let int_opt = r.wrap_optional(primitives::INT32).unwrap();
        let n = f.parameter(int_opt, "n").unwrap();

        let c = f.coalesce(n.clone(), f.constant(0)).unwrap();
        assert_eq!(c.static_type(), primitives::INT32);

        let s = f.parameter(primitives::STRING, "s").unwrap();
        let c = f.coalesce(s, f.constant("fallback")).unwrap();
        assert_eq!(c.static_type(), primitives::STRING);

        let err = f.coalesce(f.constant(1), f.constant(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidShape);

        let err = f.coalesce(n, f.constant("x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn coalesce_conversion_must_match_right() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let s = f.parameter(primitives::STRING, "s").unwrap();
        let p = f.parameter(primitives::STRING, "p").unwrap();
        let length = f.property_named(p.clone(), "Length").unwrap();
        let conversion = f.lambda_inferred(length, vec![p]).unwrap();

        let c = f
            .coalesce_with_conversion(s.clone(), f.constant(0), Some(conversion.clone()))
            .unwrap();
        assert_eq!(c.static_type(), primitives::INT32);
        assert!(c.conversion().is_some());

        let err = f
            .coalesce_with_conversion(s, f.constant(0.0), Some(conversion))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn array_index_checks_rank_and_index() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let ints = r.array_of(primitives::INT32, 1).unwrap();
        let grid = r.array_of(primitives::INT32, 2).unwrap();
        let a = f.parameter(ints, "a").unwrap();
        let g = f.parameter(grid, "g").unwrap();

        let item = f.array_index(a.clone(), f.constant(0)).unwrap();
        assert_eq!(item.static_type(), primitives::INT32);

        assert_eq!(
            f.array_index(a, f.constant(0i64)).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );
        assert_eq!(
            f.array_index(g.clone(), f.constant(0)).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );
        assert_eq!(
            f.array_index(f.constant(1), f.constant(0)).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );

        let cell = f.array_index_multi(g, vec![f.constant(0), f.constant(1)]).unwrap();
        assert_eq!(cell.kind(), ExprKind::Call);
        assert_eq!(cell.method().unwrap().name, "Get");
        assert_eq!(cell.static_type(), primitives::INT32);
    }

    #[test]
    fn null_equality_against_optional() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let int_opt = r.wrap_optional(primitives::INT32).unwrap();
        let n = f.parameter(int_opt, "n").unwrap();
        let eq = f.equal(n, f.constant(ConstantValue::Null)).unwrap();
        assert_eq!(eq.static_type(), primitives::BOOL);
    }

    #[test]
    fn void_operator_builds_no_node() {
        let mut r = registry();
        let sink = TypeHash::from_name("Sink");
        r.register_type(TypeEntry::class("Sink").with_member(MemberEntry::operator(
            "op_Addition",
            vec![Param::new("a", sink), Param::new("b", sink)],
            primitives::VOID,
        )))
        .unwrap();
        let f = ExprFactory::new(&r);
        let a = f.parameter(sink, "a").unwrap();
        let b = f.parameter(sink, "b").unwrap();
        assert_eq!(f.add(a, b).unwrap_err().kind(), ErrorKind::OperatorNotDefined);
    }
}
