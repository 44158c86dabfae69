//! Method calls and delegate invocation.

use exprtree_core::{Expr, ExprData, ExprError, ExprKind, MemberRef, TypeHash, primitives, well_known};

use super::{ExprFactory, Result};
use crate::args::ArgumentContext;
use crate::overload::find_method;

impl ExprFactory<'_> {
    /// Call `method` on `instance`, or statically when `instance` is `None`.
    ///
    /// Arguments are normalized against the method's parameters; node
    /// arguments for expression-typed parameters are quoted.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] for a non-method, an open generic method,
    ///   an instance on a static method or a wrong argument count
    /// - [`ExprError::NullArgument`] when an instance method has no instance
    /// - [`ExprError::TypeMismatch`] for a receiver or argument that does not fit
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn call(&self, instance: Option<Expr>, method: &MemberRef, args: Vec<Expr>) -> Result<Expr> {
        if !method.is_method() {
            return Err(ExprError::invalid_shape(format!("'{}' is not a method", method.name)));
        }
        if method.is_generic_definition() {
            return Err(ExprError::invalid_shape(format!(
                "method '{}' is a generic method definition",
                method.name
            )));
        }
        self.check_receiver(instance.as_ref(), method)?;
        let arguments = self.normalize_for(method, args, ArgumentContext::Call(&method.name))?;
        let ty = method.return_type().unwrap_or(primitives::VOID);
        Ok(Expr::assemble(
            ExprKind::Call,
            ty,
            ExprData::Call {
                instance,
                method: method.clone(),
                arguments,
            },
        ))
    }

    /// Call the instance method `name` on `instance`, choosing the overload
    /// that best fits `args`.
    pub fn call_named(&self, instance: Expr, name: &str, type_args: &[TypeHash], args: Vec<Expr>) -> Result<Expr> {
        let ty = instance.static_type();
        let method = find_method(self.catalog, &self.options, ty, name, type_args, &args, false)?;
        self.call(Some(instance), &method, args)
    }

    /// Call the static method `name` of `ty`.
    pub fn call_static_named(&self, ty: TypeHash, name: &str, type_args: &[TypeHash], args: Vec<Expr>) -> Result<Expr> {
        let method = find_method(self.catalog, &self.options, ty, name, type_args, &args, true)?;
        self.call(None, &method, args)
    }

    /// Invoke a delegate-typed expression, or a lambda expression node.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] when the target is not a delegate, is the
    ///   bare `Delegate` type, or the argument count differs
    /// - [`ExprError::TypeMismatch`] for an argument that does not fit
    pub fn invoke(&self, expression: Expr, args: Vec<Expr>) -> Result<Expr> {
        let invoke = self.invoke_method(expression.static_type())?;
        let arguments = self.normalize_for(&invoke, args, ArgumentContext::Invoke)?;
        let ty = invoke.return_type().unwrap_or(primitives::VOID);
        Ok(Expr::assemble(
            ExprKind::Invoke,
            ty,
            ExprData::Invoke {
                target: expression,
                arguments,
            },
        ))
    }

    /// The `Invoke` method of a delegate type, or of the delegate a quoted
    /// lambda type wraps.
    fn invoke_method(&self, ty: TypeHash) -> Result<MemberRef> {
        if ty != well_known::DELEGATE {
            if let Some(invoke) = self.catalog.delegate_invoke(ty) {
                return Ok(invoke);
            }
            let wrapped = self
                .catalog
                .find_generic_instance(well_known::EXPRESSION_OF, ty)
                .and_then(|entry| entry.generic_instance.as_ref().and_then(|g| g.args.first().copied()));
            if let Some(invoke) = wrapped.and_then(|delegate| self.catalog.delegate_invoke(delegate)) {
                return Ok(invoke);
            }
        }
        Err(ExprError::invalid_shape(format!(
            "expression of type '{}' cannot be invoked",
            self.type_name(ty)
        )))
    }
}

#[cfg(test)]
mod tests {
    use exprtree_core::{ErrorKind, MemberEntry, MemberKinds, Param, TypeCatalog, TypeEntry, func_type};

    use super::super::test_support::{registry, ty};
    use super::*;

    #[test]
    fn instance_call_by_name() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let s = f.parameter(ty("Shape"), "s").unwrap();
        let call = f.call_named(s, "scale", &[], vec![f.constant(2.0)]).unwrap();
        assert_eq!(call.kind(), ExprKind::Call);
        assert_eq!(call.static_type(), primitives::VOID);
        assert_eq!(call.method().unwrap().name, "Scale");
        assert_eq!(call.arguments().len(), 1);
    }

    #[test]
    fn inherited_and_static_calls() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let c = f.parameter(ty("Circle"), "c").unwrap();
        assert!(f.call_named(c, "Scale", &[], vec![f.constant(0.5)]).is_ok());

        let unit = f.call_static_named(ty("Shape"), "Unit", &[], vec![]).unwrap();
        assert!(unit.instance().is_none());
        assert_eq!(unit.static_type(), ty("Shape"));
    }

    #[test]
    fn call_checks_receiver_and_arguments() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let scale = r
            .declared_members(ty("Shape"), MemberKinds::METHOD)
            .into_iter()
            .find(|m| m.name == "Scale")
            .unwrap();

        assert_eq!(
            f.call(None, &scale, vec![f.constant(1.0)]).unwrap_err().kind(),
            ErrorKind::NullArgument
        );
        let s = f.parameter(ty("Shape"), "s").unwrap();
        assert_eq!(
            f.call(Some(s.clone()), &scale, vec![]).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );
        assert_eq!(
            f.call(Some(s), &scale, vec![f.constant("x")]).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn open_generic_methods_are_rejected() {
        let mut r = registry();
        let t = MemberEntry::generic_param("Echo", 0);
        r.register_type(
            TypeEntry::class("Echoer")
                .with_member(MemberEntry::method("Echo", vec![Param::new("x", t)], t).with_generic_params(vec![t])),
        )
        .unwrap();
        let f = ExprFactory::new(&r);
        let echo = r
            .declared_members(ty("Echoer"), MemberKinds::METHOD)
            .into_iter()
            .next()
            .unwrap();
        let e = f.parameter(ty("Echoer"), "e").unwrap();
        assert_eq!(
            f.call(Some(e.clone()), &echo, vec![f.constant(1)]).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );
        let closed = f.call_named(e, "Echo", &[primitives::STRING], vec![f.constant("hi")]).unwrap();
        assert_eq!(closed.static_type(), primitives::STRING);
    }

    #[test]
    fn invoke_delegate_and_lambda() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let func = func_type(&r, &[primitives::INT32, primitives::BOOL]).unwrap();

        let d = f.parameter(func, "d").unwrap();
        let call = f.invoke(d, vec![f.constant(1)]).unwrap();
        assert_eq!(call.kind(), ExprKind::Invoke);
        assert_eq!(call.static_type(), primitives::BOOL);

        let x = f.parameter(primitives::INT32, "x").unwrap();
        let body = f.greater_than(x.clone(), f.constant(0)).unwrap();
        let lambda = f.lambda(func, body, vec![x]).unwrap();
        let quoted = f.quote(lambda).unwrap();
        assert_eq!(f.invoke(quoted, vec![f.constant(2)]).unwrap().static_type(), primitives::BOOL);
    }

    #[test]
    fn invoke_rejects_non_delegates() {
        let r = registry();
        let f = ExprFactory::new(&r);
        assert_eq!(f.invoke(f.constant(1), vec![]).unwrap_err().kind(), ErrorKind::InvalidShape);
        let bare = f.parameter(well_known::DELEGATE, "d").unwrap();
        assert_eq!(f.invoke(bare, vec![]).unwrap_err().kind(), ErrorKind::InvalidShape);

        let func = func_type(&r, &[primitives::INT32]).unwrap();
        let d = f.parameter(func, "d").unwrap();
        assert_eq!(
            f.invoke(d, vec![f.constant(1)]).unwrap_err().kind(),
            ErrorKind::InvalidShape
        );
    }
}
