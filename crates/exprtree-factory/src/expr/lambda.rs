//! Lambda construction.
//!
//! Parameters are checked contravariantly: each lambda parameter must be
//! reference-assignable from the delegate's parameter in the same position.
//! The body must be reference-assignable to a non-void delegate return type;
//! a body the return type can hold as a node is quoted instead.

use rustc_hash::FxHashSet;

use exprtree_core::{Expr, ExprData, ExprError, ExprKind, TypeHash, delegate_type, primitives};

use super::{ExprFactory, Result};
use crate::args::{accepts_node, quote_node};
use crate::conversion::{is_reference_assignable, non_ref_type};

impl ExprFactory<'_> {
    /// A lambda of `delegate` over `parameters`.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] when `delegate` is not a concrete
    ///   delegate type, the parameter count differs, or a parameter is not a
    ///   parameter node or appears twice
    /// - [`ExprError::TypeMismatch`] when a parameter or the body does not fit
    ///   the delegate's signature
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn lambda(&self, delegate: TypeHash, body: Expr, parameters: Vec<Expr>) -> Result<Expr> {
        let invoke = self.catalog.delegate_invoke(delegate).ok_or_else(|| {
            ExprError::invalid_shape(format!(
                "lambda type '{}' must be derived from Delegate",
                self.type_name(delegate)
            ))
        })?;

        let delegate_params = invoke.params();
        if delegate_params.len() != parameters.len() {
            return Err(ExprError::invalid_shape(format!(
                "incorrect number of parameters supplied for lambda of type '{}': expected {}, got {}",
                self.type_name(delegate),
                delegate_params.len(),
                parameters.len()
            )));
        }

        let mut seen = FxHashSet::default();
        for (position, (param, expected)) in parameters.iter().zip(delegate_params).enumerate() {
            let id = param.parameter().map(|p| p.id).ok_or_else(|| {
                ExprError::invalid_shape(format!("lambda parameter {position} is not a parameter expression"))
            })?;
            if !seen.insert(id) {
                return Err(ExprError::invalid_shape(format!(
                    "parameter '{param}' appears more than once in the parameter list"
                )));
            }
            let expected = non_ref_type(self.catalog, expected.data_type);
            if !is_reference_assignable(self.catalog, param.static_type(), expected) {
                return Err(ExprError::type_mismatch(format!(
                    "parameter {position} of type '{}' cannot be used for delegate parameter of type '{}'",
                    self.type_name(param.static_type()),
                    self.type_name(expected)
                )));
            }
        }

        let ret = invoke.return_type().unwrap_or(primitives::VOID);
        let body = if ret == primitives::VOID || is_reference_assignable(self.catalog, ret, body.static_type()) {
            body
        } else if accepts_node(self.catalog, ret, &body)? {
            quote_node(self.catalog, body)?
        } else {
            return Err(ExprError::type_mismatch(format!(
                "expression of type '{}' cannot be used for return type '{}'",
                self.type_name(body.static_type()),
                self.type_name(ret)
            )));
        };

        tracing::trace!(delegate = %self.type_name(delegate), params = parameters.len(), "lambda");
        Ok(Expr::assemble(
            ExprKind::Lambda,
            delegate,
            ExprData::Lambda { body, parameters },
        ))
    }

    /// A lambda whose delegate type is synthesized from the parameter types
    /// and the body type: `Action` shapes for a `void` body, `Func` otherwise.
    ///
    /// # Errors
    ///
    /// As [`lambda`](Self::lambda), plus [`ExprError::InvalidShape`] for more
    /// parameters than the synthesized shapes support.
    pub fn lambda_inferred(&self, body: Expr, parameters: Vec<Expr>) -> Result<Expr> {
        let types: Vec<TypeHash> = parameters.iter().map(Expr::static_type).collect();
        let delegate = delegate_type(self.catalog, &types, body.static_type())?;
        self.lambda(delegate, body, parameters)
    }
}

#[cfg(test)]
mod tests {
    use exprtree_core::{ErrorKind, TypeCatalog, TypeEntry, func_type, well_known};

    use super::super::test_support::{registry, ty};
    use super::*;

    #[test]
    fn func_lambda() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let x = f.parameter(primitives::INT32, "x").unwrap();
        let body = f.add(x.clone(), f.constant(1)).unwrap();
        let lambda = f.lambda_inferred(body, vec![x]).unwrap();
        assert_eq!(lambda.kind(), ExprKind::Lambda);
        assert_eq!(
            lambda.static_type(),
            func_type(&r, &[primitives::INT32, primitives::INT32]).unwrap()
        );
        assert_eq!(lambda.parameters().len(), 1);
        assert_eq!(lambda.to_string(), "x => (x + 1)");
    }

    #[test]
    fn void_body_infers_action() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let s = f.parameter(ty("Shape"), "s").unwrap();
        let body = f.call_named(s.clone(), "Scale", &[], vec![f.constant(2.0)]).unwrap();
        let lambda = f.lambda_inferred(body, vec![s]).unwrap();
        let invoke = r.delegate_invoke(lambda.static_type()).unwrap();
        assert!(invoke.returns_void());
    }

    #[test]
    fn void_return_accepts_any_body() {
        let mut r = registry();
        let sink = r
            .register_type(TypeEntry::delegate("Sink", vec![primitives::INT32], primitives::VOID))
            .unwrap();
        let f = ExprFactory::new(&r);
        let x = f.parameter(primitives::INT32, "x").unwrap();
        assert!(f.lambda(sink, f.constant("ignored"), vec![x]).is_ok());
    }

    #[test]
    fn parameters_are_contravariant() {
        let mut r = registry();
        let handler = r
            .register_type(TypeEntry::delegate("Handler", vec![ty("Circle")], primitives::VOID))
            .unwrap();
        let f = ExprFactory::new(&r);

        let wide = f.parameter(ty("Shape"), "s").unwrap();
        assert!(f.lambda(handler, f.constant(0), vec![wide]).is_ok());

        let narrow = f.parameter(ty("Circle"), "c").unwrap();
        let unrelated = f.parameter(primitives::STRING, "t").unwrap();
        assert!(f.lambda(handler, f.constant(0), vec![narrow]).is_ok());
        assert_eq!(
            f.lambda(handler, f.constant(0), vec![unrelated]).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn shape_errors() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let func = func_type(&r, &[primitives::INT32, primitives::INT32]).unwrap();
        let x = f.parameter(primitives::INT32, "x").unwrap();

        assert_eq!(
            f.lambda(primitives::INT32, x.clone(), vec![x.clone()]).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );
        assert_eq!(
            f.lambda(well_known::DELEGATE, x.clone(), vec![x.clone()]).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );
        assert_eq!(f.lambda(func, x.clone(), vec![]).unwrap_err().kind(), ErrorKind::InvalidShape);
        assert_eq!(
            f.lambda(func, x.clone(), vec![f.constant(1)]).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );

        let pair = func_type(&r, &[primitives::INT32, primitives::INT32, primitives::INT32]).unwrap();
        assert_eq!(
            f.lambda(pair, x.clone(), vec![x.clone(), x.clone()]).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );
    }

    #[test]
    fn body_must_fit_return() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let func = func_type(&r, &[primitives::INT32, primitives::STRING]).unwrap();
        let x = f.parameter(primitives::INT32, "x").unwrap();
        assert_eq!(
            f.lambda(func, x.clone(), vec![x]).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn node_returning_delegate_quotes_body() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let func = func_type(&r, &[well_known::EXPRESSION]).unwrap();
        let lambda = f.lambda(func, f.constant(1), vec![]).unwrap();
        assert_eq!(lambda.body().unwrap().kind(), ExprKind::Quote);
    }

    #[test]
    fn rebuilding_is_structurally_equal() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let x = f.parameter(primitives::INT32, "x").unwrap();
        let body = f.multiply(x.clone(), f.constant(2)).unwrap();
        let a = f.lambda_inferred(body.clone(), vec![x.clone()]).unwrap();
        let b = f.lambda_inferred(body, vec![x]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.static_type(), b.static_type());
        assert!(!Expr::ptr_eq(&a, &b));
    }
}
