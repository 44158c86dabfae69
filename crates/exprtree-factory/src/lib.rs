//! Validating node factory for typed expression trees.
//!
//! ## Modules
//!
//! - [`conversion`]: Type compatibility engine (identity, numeric widening,
//!   reference, boxing and optional wrapping)
//! - [`overload`]: Named member and user-defined operator resolution
//! - [`operators`]: Per-kind operator policies, fast paths and lifting
//! - [`args`]: Argument list normalization and implicit quoting
//! - [`expr`]: [`ExprFactory`], one operation per node kind
//!
//! ## Example
//!
//! ```ignore
//! let registry = TypeRegistry::with_builtins();
//! let factory = ExprFactory::new(&registry);
//! let sum = factory.add(factory.constant(2), factory.constant(3))?;
//! assert_eq!(sum.static_type(), primitives::INT32);
//! ```

pub mod args;
pub mod conversion;
pub mod expr;
pub mod operators;
mod options;
pub mod overload;

pub use args::{ArgumentContext, normalize_arguments};
pub use conversion::{Conversion, ConversionKind, find_implicit_conversion};
pub use expr::ExprFactory;
pub use operators::{BinaryPolicy, OperatorResolution, ResultRule, TypeClass, UnaryPolicy};
pub use options::FactoryOptions;
pub use overload::OverloadMatch;
