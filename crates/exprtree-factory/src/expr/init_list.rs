//! List initializers, member initializers and their bindings.

use exprtree_core::{
    ElementInit, Expr, ExprData, ExprError, ExprKind, MemberBinding, MemberRef, TypeHash, well_known,
};

use super::{ExprFactory, Result};
use crate::args::ArgumentContext;
use crate::conversion::is_valid_instance_type;
use crate::overload::find_method;

impl ExprFactory<'_> {
    /// A call to `add_method` inside a list initializer.
    ///
    /// # Errors
    ///
    /// [`ExprError::InvalidShape`] unless `add_method` is an instance method
    /// named `Add` with at least one parameter and no by-ref parameters, or
    /// when the argument count differs.
    pub fn element_init(&self, add_method: &MemberRef, args: Vec<Expr>) -> Result<ElementInit> {
        if !add_method.is_method() || !add_method.name.eq_ignore_ascii_case("Add") {
            return Err(ExprError::invalid_shape(format!(
                "element initializer method must be named 'Add', got '{}'",
                add_method.name
            )));
        }
        if add_method.is_static {
            return Err(ExprError::invalid_shape("element initializer method must be an instance method"));
        }
        let params = add_method.params();
        if params.is_empty() {
            return Err(ExprError::invalid_shape("element initializer method must have at least one parameter"));
        }
        if params.iter().any(|p| self.catalog.is_by_ref(p.data_type)) {
            return Err(ExprError::invalid_shape(
                "element initializer method must not have by-ref parameters",
            ));
        }
        let arguments = self.normalize_for(add_method, args, ArgumentContext::ElementInit(&add_method.name))?;
        Ok(ElementInit {
            add_method: add_method.clone(),
            arguments,
        })
    }

    /// Initialize the collection built by `new_expr` with one `Add` call per
    /// initializer.
    ///
    /// The `Add` overload is chosen from the first initializer and reused
    /// for the rest.
    pub fn list_init(&self, new_expr: Expr, initializers: Vec<Expr>) -> Result<Expr> {
        self.require_new(&new_expr)?;
        let first = initializers
            .first()
            .ok_or_else(|| ExprError::invalid_shape("list initializers must contain at least one initializer"))?;
        let add = find_method(
            self.catalog,
            &self.options,
            new_expr.static_type(),
            "Add",
            &[],
            std::slice::from_ref(first),
            false,
        )?;
        let element_inits = initializers
            .into_iter()
            .map(|init| self.element_init(&add, vec![init]))
            .collect::<Result<Vec<_>>>()?;
        self.list_init_with(new_expr, element_inits)
    }

    /// Initialize the collection built by `new_expr` with prepared element
    /// initializers.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] when `new_expr` is not a `New` node, the
    ///   list is empty or the type does not implement `IEnumerable`
    /// - [`ExprError::TypeMismatch`] when an `Add` method is not callable on
    ///   the constructed type
    pub fn list_init_with(&self, new_expr: Expr, initializers: Vec<ElementInit>) -> Result<Expr> {
        self.require_new(&new_expr)?;
        if initializers.is_empty() {
            return Err(ExprError::invalid_shape("list initializers must contain at least one initializer"));
        }
        let ty = new_expr.static_type();
        self.require_enumerable(ty)?;
        for init in &initializers {
            if !is_valid_instance_type(self.catalog, init.add_method.declaring_type, ty) {
                return Err(ExprError::type_mismatch(format!(
                    "method '{}' is not defined for type '{}'",
                    init.add_method.name,
                    self.type_name(ty)
                )));
            }
        }
        Ok(Expr::assemble(
            ExprKind::ListInit,
            ty,
            ExprData::ListInit {
                new_expr,
                initializers,
            },
        ))
    }

    /// Initialize members of the object built by `new_expr`.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] when `new_expr` is not a `New` node
    /// - [`ExprError::TypeMismatch`] when a bound member is not declared on the
    ///   constructed type or one of its bases
    pub fn member_init(&self, new_expr: Expr, bindings: Vec<MemberBinding>) -> Result<Expr> {
        self.require_new(&new_expr)?;
        let ty = new_expr.static_type();
        for binding in &bindings {
            self.require_declared_on(binding.member(), ty)?;
        }
        Ok(Expr::assemble(
            ExprKind::MemberInit,
            ty,
            ExprData::MemberInit { new_expr, bindings },
        ))
    }

    /// `member = expression`.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] unless `member` is a writable field or
    ///   property
    /// - [`ExprError::TypeMismatch`] when `expression` is not assignable to it
    pub fn bind(&self, member: &MemberRef, expression: Expr) -> Result<MemberBinding> {
        if !(member.is_field() || member.is_property()) || !member.can_write() {
            return Err(ExprError::invalid_shape(format!(
                "'{}' is not a writable field or property",
                member.name
            )));
        }
        let member_ty = self.member_type(member)?;
        if !self.catalog.is_assignable_from(member_ty, expression.static_type()) {
            return Err(ExprError::type_mismatch(format!(
                "expression of type '{}' cannot be assigned to member '{}' of type '{}'",
                self.type_name(expression.static_type()),
                member.name,
                self.type_name(member_ty)
            )));
        }
        Ok(MemberBinding::Assignment {
            member: member.clone(),
            expression,
        })
    }

    /// `member = { bindings }`: initialize members of the object `member` holds.
    pub fn member_bind(&self, member: &MemberRef, bindings: Vec<MemberBinding>) -> Result<MemberBinding> {
        let member_ty = self.readable_member_type(member)?;
        for binding in &bindings {
            self.require_declared_on(binding.member(), member_ty)?;
        }
        Ok(MemberBinding::MemberBinding {
            member: member.clone(),
            bindings,
        })
    }

    /// `member = { initializers }`: add elements to the collection `member` holds.
    pub fn list_bind(&self, member: &MemberRef, initializers: Vec<ElementInit>) -> Result<MemberBinding> {
        let member_ty = self.readable_member_type(member)?;
        self.require_enumerable(member_ty)?;
        for init in &initializers {
            if !is_valid_instance_type(self.catalog, init.add_method.declaring_type, member_ty) {
                return Err(ExprError::type_mismatch(format!(
                    "method '{}' is not defined for type '{}'",
                    init.add_method.name,
                    self.type_name(member_ty)
                )));
            }
        }
        Ok(MemberBinding::ListBinding {
            member: member.clone(),
            initializers,
        })
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    fn require_new(&self, new_expr: &Expr) -> Result<()> {
        if new_expr.kind() != ExprKind::New {
            return Err(ExprError::invalid_shape(format!(
                "expected a 'New' expression, got '{}'",
                new_expr.kind()
            )));
        }
        Ok(())
    }

    fn require_enumerable(&self, ty: TypeHash) -> Result<()> {
        if !self.catalog.is_assignable_from(well_known::ENUMERABLE, ty) {
            return Err(ExprError::invalid_shape(format!(
                "type '{}' used in a list initializer must implement IEnumerable",
                self.type_name(ty)
            )));
        }
        Ok(())
    }

    fn require_declared_on(&self, member: &MemberRef, ty: TypeHash) -> Result<()> {
        if !self.catalog.is_assignable_from(member.declaring_type, ty) {
            return Err(ExprError::type_mismatch(format!(
                "member '{}' is not declared on type '{}'",
                member.name,
                self.type_name(ty)
            )));
        }
        Ok(())
    }

    fn member_type(&self, member: &MemberRef) -> Result<TypeHash> {
        member
            .value_type()
            .ok_or_else(|| ExprError::invalid_shape(format!("'{}' is not a field or property", member.name)))
    }

    fn readable_member_type(&self, member: &MemberRef) -> Result<TypeHash> {
        let ty = self.member_type(member)?;
        if !member.can_read() {
            return Err(ExprError::invalid_shape(format!(
                "property '{}' does not have a getter",
                member.name
            )));
        }
        Ok(ty)
    }
}
