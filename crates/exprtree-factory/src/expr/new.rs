//! Object and array construction.

use exprtree_core::{Expr, ExprData, ExprError, ExprKind, MemberKinds, MemberRef, TypeHash, primitives};

use super::{ExprFactory, Result};
use crate::args::{ArgumentContext, ArgumentFit, accepts_node, argument_fit, quote_node};
use crate::conversion::is_reference_assignable;
use crate::overload::find_constructor;

impl ExprFactory<'_> {
    /// Construct an object through `constructor`.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] when `constructor` is not a constructor
    ///   or the argument count differs
    /// - [`ExprError::TypeMismatch`] for an argument that does not fit
    pub fn new_object(&self, constructor: &MemberRef, args: Vec<Expr>) -> Result<Expr> {
        self.require_constructor(constructor)?;
        let owner = self.type_name(constructor.declaring_type);
        let arguments = self.normalize_for(constructor, args, ArgumentContext::New(&owner))?;
        Ok(self.assemble_new(Some(constructor.clone()), arguments, Vec::new()))
    }

    /// Construct an object whose arguments also initialize `members`, one
    /// member per argument.
    ///
    /// A member is a field, a readable property or a parameterless method
    /// standing for a property getter; each must be declared on the
    /// constructed type or one of its bases.
    pub fn new_with_members(&self, constructor: &MemberRef, args: Vec<Expr>, members: Vec<MemberRef>) -> Result<Expr> {
        self.require_constructor(constructor)?;
        let params = constructor.params();
        if params.len() != args.len() {
            return Err(ExprError::invalid_shape(format!(
                "incorrect number of arguments for constructor of '{}'",
                self.type_name(constructor.declaring_type)
            )));
        }
        if members.len() != args.len() {
            return Err(ExprError::invalid_shape(
                "incorrect number of members for the supplied arguments",
            ));
        }

        let mut arguments = Vec::with_capacity(args.len());
        for ((param, member), arg) in params.iter().zip(&members).zip(args) {
            let member_ty = self.initialized_member_type(member)?;
            if !self
                .catalog
                .is_assignable_from(member.declaring_type, constructor.declaring_type)
            {
                return Err(ExprError::type_mismatch(format!(
                    "member '{}' is not declared on type '{}' being created",
                    member.name,
                    self.type_name(constructor.declaring_type)
                )));
            }
            let arg = self.fit_or_quote(param.data_type, arg, "constructor parameter")?;
            let arg = self.fit_or_quote(member_ty, arg, "member")?;
            arguments.push(arg);
        }
        Ok(self.assemble_new(Some(constructor.clone()), arguments, members))
    }

    /// The default value of `ty`: a value kind needs no constructor, a
    /// reference kind needs a public parameterless one.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] for `void` or an unknown type
    /// - [`ExprError::MemberNotFound`] when a reference kind has no public
    ///   parameterless constructor
    pub fn new_default(&self, ty: TypeHash) -> Result<Expr> {
        if ty == primitives::VOID || !self.catalog.exists(ty) {
            return Err(ExprError::invalid_shape(format!(
                "'{}' cannot be constructed",
                self.type_name(ty)
            )));
        }
        let parameterless = self
            .catalog
            .declared_members(ty, MemberKinds::CONSTRUCTOR)
            .into_iter()
            .find(|c| c.params().is_empty() && c.is_public());

        match parameterless {
            Some(ctor) => Ok(self.assemble_new(Some(ctor), Vec::new(), Vec::new())),
            None if self.catalog.is_value_kind(ty) => Ok(Expr::assemble(
                ExprKind::New,
                ty,
                ExprData::New {
                    constructor: None,
                    arguments: Vec::new(),
                    members: Vec::new(),
                },
            )),
            None => Err(self.member_not_found(ty, ".ctor", "is a public parameterless constructor")),
        }
    }

    /// Construct `ty` through the constructor that best fits `args`.
    pub fn new_resolved(&self, ty: TypeHash, args: Vec<Expr>) -> Result<Expr> {
        let ctor = find_constructor(self.catalog, &self.options, ty, &args)?;
        self.new_object(&ctor, args)
    }

    /// A one-dimensional array of `element` filled with `initializers`.
    ///
    /// An initializer that is not reference-assignable to `element` is
    /// quoted when `element` is an expression-node class that accepts it.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] for a `void` or by-ref element type
    /// - [`ExprError::TypeMismatch`] for an initializer that does not fit
    pub fn new_array_init(&self, element: TypeHash, initializers: Vec<Expr>) -> Result<Expr> {
        let array = self.array_type(element, 1)?;
        let mut expressions = Vec::with_capacity(initializers.len());
        for init in initializers {
            if is_reference_assignable(self.catalog, element, init.static_type()) {
                expressions.push(init);
            } else if self.options.quote_expression_arguments && accepts_node(self.catalog, element, &init)? {
                expressions.push(quote_node(self.catalog, init)?);
            } else {
                return Err(ExprError::type_mismatch(format!(
                    "an expression of type '{}' cannot be used to initialize an array of type '{}'",
                    self.type_name(init.static_type()),
                    self.type_name(element)
                )));
            }
        }
        Ok(Expr::assemble(
            ExprKind::NewArrayInit,
            array,
            ExprData::NewArray { expressions },
        ))
    }

    /// An array of `element` with one dimension per bound.
    ///
    /// # Errors
    ///
    /// [`ExprError::InvalidShape`] for no bounds, a non-integer bound or a
    /// `void` element type.
    pub fn new_array_bounds(&self, element: TypeHash, bounds: Vec<Expr>) -> Result<Expr> {
        if bounds.is_empty() {
            return Err(ExprError::invalid_shape("bounds must contain at least one expression"));
        }
        for bound in &bounds {
            let is_integer = self
                .catalog
                .primitive_kind(self.catalog.unwrap(bound.static_type()))
                .is_some_and(|k| k.is_integer());
            if !is_integer {
                return Err(ExprError::invalid_shape(format!(
                    "array bound of type '{}' must be an integer",
                    self.type_name(bound.static_type())
                )));
            }
        }
        let rank = u32::try_from(bounds.len())
            .map_err(|_| ExprError::invalid_shape("too many array bounds"))?;
        let array = self.array_type(element, rank)?;
        Ok(Expr::assemble(
            ExprKind::NewArrayBounds,
            array,
            ExprData::NewArray { expressions: bounds },
        ))
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    fn require_constructor(&self, constructor: &MemberRef) -> Result<()> {
        if !constructor.is_constructor() {
            return Err(ExprError::invalid_shape(format!(
                "'{}' is not a constructor",
                constructor.name
            )));
        }
        Ok(())
    }

    fn assemble_new(&self, constructor: Option<MemberRef>, arguments: Vec<Expr>, members: Vec<MemberRef>) -> Expr {
        let ty = constructor
            .as_ref()
            .map_or(primitives::OBJECT, |c| c.declaring_type);
        Expr::assemble(
            ExprKind::New,
            ty,
            ExprData::New {
                constructor,
                arguments,
                members,
            },
        )
    }

    /// Type a paired member receives from its constructor argument.
    fn initialized_member_type(&self, member: &MemberRef) -> Result<TypeHash> {
        if member.is_field() {
            return member
                .value_type()
                .ok_or_else(|| ExprError::invalid_shape(format!("field '{}' has no type", member.name)));
        }
        if member.is_property() {
            if !member.can_read() {
                return Err(ExprError::invalid_shape(format!(
                    "property '{}' does not have a getter",
                    member.name
                )));
            }
            return member
                .value_type()
                .ok_or_else(|| ExprError::invalid_shape(format!("property '{}' has no type", member.name)));
        }
        if member.is_method() && !member.is_static && member.params().is_empty() && !member.returns_void() {
            return member
                .return_type()
                .ok_or_else(|| ExprError::invalid_shape(format!("method '{}' has no return type", member.name)));
        }
        Err(ExprError::invalid_shape(format!(
            "member '{}' must be a field, property or property getter",
            member.name
        )))
    }

    fn fit_or_quote(&self, target: TypeHash, arg: Expr, what: &str) -> Result<Expr> {
        match argument_fit(self.catalog, &self.options, target, &arg)? {
            Some(ArgumentFit::Exact | ArgumentFit::Reference) => Ok(arg),
            Some(ArgumentFit::Quote) => quote_node(self.catalog, arg),
            None => Err(ExprError::type_mismatch(format!(
                "expression of type '{}' does not match {what} of type '{}'",
                self.type_name(arg.static_type()),
                self.type_name(target)
            ))),
        }
    }

    fn array_type(&self, element: TypeHash, rank: u32) -> Result<TypeHash> {
        if element == primitives::VOID || !self.catalog.exists(element) {
            return Err(ExprError::invalid_shape(format!(
                "'{}' is not a valid array element type",
                self.type_name(element)
            )));
        }
        self.catalog.array_of(element, rank)
    }
}

#[cfg(test)]
mod tests {
    use exprtree_core::{ErrorKind, MemberEntry, TypeCatalog, TypeEntry, Visibility, well_known};

    use super::super::test_support::{registry, ty};
    use super::*;

    fn ctor(r: &dyn TypeCatalog, owner: &str, arity: usize) -> MemberRef {
        r.declared_members(ty(owner), MemberKinds::CONSTRUCTOR)
            .into_iter()
            .find(|c| c.params().len() == arity)
            .unwrap()
    }

    #[test]
    fn new_object_types_with_owner() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let point = f
            .new_object(&ctor(&r, "Point", 2), vec![f.constant(1), f.constant(2)])
            .unwrap();
        assert_eq!(point.kind(), ExprKind::New);
        assert_eq!(point.static_type(), ty("Point"));
        assert_eq!(point.arguments().len(), 2);

        let err = f
            .new_object(&ctor(&r, "Point", 2), vec![f.constant(1)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidShape);
    }

    #[test]
    fn new_resolved_picks_constructor() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let circle = f.new_resolved(ty("Circle"), vec![f.constant(1.0)]).unwrap();
        assert_eq!(circle.member().unwrap().params().len(), 1);
        let err = f.new_resolved(ty("Circle"), vec![f.constant("r")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MemberNotFound);
    }

    #[test]
    fn default_values() {
        let mut r = registry();
        r.register_type(
            TypeEntry::class("Sealed")
                .with_member(MemberEntry::constructor(vec![]).with_visibility(Visibility::Private)),
        )
        .unwrap();
        let f = ExprFactory::new(&r);

        let point = f.new_default(ty("Point")).unwrap();
        assert!(point.member().is_none());
        assert_eq!(point.static_type(), ty("Point"));
        assert!(f.new_default(primitives::INT32).is_ok());

        assert!(f.new_default(ty("Shape")).unwrap().member().is_some());
        assert_eq!(f.new_default(ty("Sealed")).unwrap_err().kind(), ErrorKind::MemberNotFound);
        assert_eq!(f.new_default(primitives::VOID).unwrap_err().kind(), ErrorKind::InvalidShape);
    }

    #[test]
    fn members_pair_with_arguments() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let fields = r.declared_members(ty("Point"), MemberKinds::FIELD);
        let node = f
            .new_with_members(&ctor(&r, "Point", 2), vec![f.constant(1), f.constant(2)], fields.clone())
            .unwrap();
        assert_eq!(node.members().len(), 2);

        let err = f
            .new_with_members(&ctor(&r, "Point", 2), vec![f.constant(1), f.constant(2)], fields[..1].to_vec())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidShape);

        let radius = r.declared_members(ty("Circle"), MemberKinds::FIELD);
        let err = f
            .new_with_members(&ctor(&r, "Point", 2), vec![f.constant(1), f.constant(2)], vec![
                radius[0].clone(),
                fields[1].clone(),
            ])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn array_init_checks_elements() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let ints = f.new_array_init(primitives::INT32, vec![f.constant(1), f.constant(2)]).unwrap();
        assert_eq!(ints.static_type(), r.array_of(primitives::INT32, 1).unwrap());
        assert_eq!(ints.expressions().len(), 2);

        let c = f.parameter(ty("Circle"), "c").unwrap();
        assert!(f.new_array_init(ty("Shape"), vec![c]).is_ok());

        let err = f.new_array_init(primitives::INT32, vec![f.constant("x")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = f.new_array_init(primitives::OBJECT, vec![f.constant(1)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn array_init_quotes_nodes() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let nodes = f.new_array_init(well_known::EXPRESSION, vec![f.constant(1)]).unwrap();
        assert_eq!(nodes.expressions()[0].kind(), ExprKind::Quote);
    }

    #[test]
    fn array_bounds() {
        let r = registry();
        let f = ExprFactory::new(&r);
        let grid = f
            .new_array_bounds(primitives::DOUBLE, vec![f.constant(2), f.constant(3u64)])
            .unwrap();
        assert_eq!(grid.kind(), ExprKind::NewArrayBounds);
        assert_eq!(r.rank(grid.static_type()), Some(2));

        for bad in [vec![], vec![f.constant(1.0)]] {
            assert_eq!(
                f.new_array_bounds(primitives::INT32, bad).unwrap_err().kind(),
                ErrorKind::InvalidShape
            );
        }
    }
}
