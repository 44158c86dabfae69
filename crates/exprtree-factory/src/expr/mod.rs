//! Validating node factory.
//!
//! [`ExprFactory`] exposes one operation per node kind. Every operation
//! checks its inputs against the type catalog, resolves the operator, member
//! or constructor that applies, and returns an immutable [`Expr`] carrying its
//! static type, or an [`ExprError`] and no node.
//!
//! Operations are grouped by node family:
//!
//! - [`literals`]: constants and parameters
//! - [`binary`]: arithmetic, bitwise, logical, shift, comparison, coalesce
//!   and array index
//! - [`unary`]: negation, not, array length and quote
//! - [`cast`]: conversions, type-as and type-is
//! - [`member`]: field and property access
//! - [`calls`]: method calls and delegate invocation
//! - [`new`]: object and array construction
//! - [`init_list`]: list and member initializers
//! - [`ternary`]: conditionals
//! - [`lambda`]: lambdas
//! - [`make`]: kind-driven entry points
//!
//! # Example
//!
//! ```ignore
//! let registry = TypeRegistry::with_builtins();
//! let factory = ExprFactory::new(&registry);
//!
//! let x = factory.parameter(primitives::INT32, "x")?;
//! let body = factory.multiply(x.clone(), factory.constant(2))?;
//! let doubled = factory.lambda_inferred(body, vec![x])?;
//! ```

mod binary;
mod calls;
mod cast;
mod init_list;
mod lambda;
mod literals;
mod make;
mod member;
mod new;
mod ternary;
mod unary;

use exprtree_core::{Expr, ExprError, MemberRef, TypeCatalog, TypeHash};

use crate::FactoryOptions;
use crate::args::{self, ArgumentContext};

type Result<T> = std::result::Result<T, ExprError>;

/// Builds validated expression nodes against a type catalog.
///
/// Holds only the catalog reference and options, so copies are cheap.
#[derive(Clone, Copy)]
pub struct ExprFactory<'c> {
    catalog: &'c dyn TypeCatalog,
    options: FactoryOptions,
}

impl<'c> ExprFactory<'c> {
    /// Create a factory with default options.
    pub fn new(catalog: &'c dyn TypeCatalog) -> Self {
        Self::with_options(catalog, FactoryOptions::default())
    }

    /// Create a factory with explicit options.
    pub fn with_options(catalog: &'c dyn TypeCatalog, options: FactoryOptions) -> Self {
        Self { catalog, options }
    }

    /// The catalog this factory consults.
    pub fn catalog(&self) -> &'c dyn TypeCatalog {
        self.catalog
    }

    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    /// Align `args` with `params`, quoting where a parameter takes a node.
    pub fn normalize_arguments(
        &self,
        params: &[TypeHash],
        args: Vec<Expr>,
        context: ArgumentContext<'_>,
    ) -> Result<Vec<Expr>> {
        args::normalize_arguments(self.catalog, &self.options, params, args, context)
    }

    // ==========================================================================
    // Shared helpers
    // ==========================================================================

    fn type_name(&self, ty: TypeHash) -> String {
        self.catalog.type_name(ty)
    }

    fn normalize_for(&self, member: &MemberRef, args: Vec<Expr>, context: ArgumentContext<'_>) -> Result<Vec<Expr>> {
        let params: Vec<_> = member.params().iter().map(|p| p.data_type).collect();
        self.normalize_arguments(&params, args, context)
    }
}

impl std::fmt::Debug for ExprFactory<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExprFactory").field("options", &self.options).finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use exprtree_core::{MemberEntry, Param, TypeEntry, TypeHash, primitives};
    use exprtree_registry::TypeRegistry;

    /// Registry with a small object model used across the factory tests.
    ///
    /// ```text
    /// IShape            interface
    /// Shape : IShape    class, ctor(), field Name, property Area (read-only),
    ///                   method Scale(double), static Unit()
    /// Circle : Shape    class, ctor(double), field Radius
    /// Point             struct, ctor(int, int), fields X Y
    /// Bag : IEnumerable class, ctor(), Add(int), Add(string, int)
    /// Color             enum over int
    /// ```
    pub fn registry() -> TypeRegistry {
        let mut r = TypeRegistry::with_builtins();
        let ishape = r.register_type(TypeEntry::interface("IShape")).unwrap();
        let shape = r
            .register_type(
                TypeEntry::class("Shape")
                    .with_interface(ishape)
                    .with_member(MemberEntry::constructor(vec![]))
                    .with_member(MemberEntry::field("Name", primitives::STRING))
                    .with_member(MemberEntry::property("Area", primitives::DOUBLE).read_only())
                    .with_member(MemberEntry::method(
                        "Scale",
                        vec![Param::new("factor", primitives::DOUBLE)],
                        primitives::VOID,
                    ))
                    .with_member(MemberEntry::method("Unit", vec![], TypeHash::from_name("Shape")).as_static()),
            )
            .unwrap();
        r.register_type(
            TypeEntry::class("Circle")
                .with_base(shape)
                .with_member(MemberEntry::constructor(vec![Param::new("radius", primitives::DOUBLE)]))
                .with_member(MemberEntry::field("Radius", primitives::DOUBLE)),
        )
        .unwrap();
        r.register_type(
            TypeEntry::value_type("Point")
                .with_member(MemberEntry::constructor(vec![
                    Param::new("x", primitives::INT32),
                    Param::new("y", primitives::INT32),
                ]))
                .with_member(MemberEntry::field("X", primitives::INT32))
                .with_member(MemberEntry::field("Y", primitives::INT32)),
        )
        .unwrap();
        r.register_type(
            TypeEntry::class("Bag")
                .with_interface(exprtree_core::well_known::ENUMERABLE)
                .with_member(MemberEntry::constructor(vec![]))
                .with_member(MemberEntry::method(
                    "Add",
                    vec![Param::new("item", primitives::INT32)],
                    primitives::VOID,
                ))
                .with_member(MemberEntry::method(
                    "Add",
                    vec![Param::new("key", primitives::STRING), Param::new("value", primitives::INT32)],
                    primitives::VOID,
                )),
        )
        .unwrap();
        r.register_type(TypeEntry::enumeration("Color", primitives::INT32))
            .unwrap();
        r
    }

    pub fn ty(name: &str) -> TypeHash {
        TypeHash::from_name(name)
    }
}
