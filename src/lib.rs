//! Typed expression trees.
//!
//! Build immutable, statically typed expression nodes against a type
//! catalog. Every construction is validated the way a compiler's semantic
//! pass would: operator overloads are resolved, optional operands are
//! lifted, call arguments are checked and quoted, and a failed construction
//! yields an [`ExprError`] instead of a node.
//!
//! ## Crates
//!
//! - [`exprtree_core`]: type handles, the [`TypeCatalog`] oracle and the node model
//! - [`exprtree_registry`]: [`TypeRegistry`], an in-memory catalog with the built-in types
//! - [`exprtree_factory`]: [`ExprFactory`] and the rules behind it
//!
//! ## Example
//!
//! ```ignore
//! use exprtree::prelude::*;
//!
//! let registry = TypeRegistry::with_builtins();
//! let factory = ExprFactory::new(&registry);
//!
//! let x = factory.parameter(primitives::INT32, "x")?;
//! let body = factory.greater_than(x.clone(), factory.constant(0))?;
//! let is_positive = factory.lambda_inferred(body, vec![x])?;
//! assert_eq!(is_positive.to_string(), "x => (x > 0)");
//! ```

pub use exprtree_core::{
    ConstantValue, ElementInit, ErrorKind, Expr, ExprError, ExprKind, MemberBinding, MemberEntry, MemberKinds,
    MemberRef, NameMatching, Param, TypeCatalog, TypeEntry, TypeHash, TypeKind, Visibility, primitives, well_known,
};
pub use exprtree_factory::{ArgumentContext, ExprFactory, FactoryOptions};
pub use exprtree_registry::TypeRegistry;

/// Everything needed to register types and build expressions.
pub mod prelude {
    pub use exprtree_core::{
        ConstantValue, ErrorKind, Expr, ExprError, ExprKind, MemberEntry, MemberKinds, MemberRef, Param,
        TypeCatalog, TypeEntry, TypeHash, action_type, delegate_type, func_type, primitives, well_known,
    };
    pub use exprtree_factory::{ExprFactory, FactoryOptions};
    pub use exprtree_registry::TypeRegistry;
}
