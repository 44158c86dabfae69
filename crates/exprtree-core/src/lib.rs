//! Core types for typed expression trees.
//!
//! ## Modules
//!
//! - [`type_hash`]: Deterministic 64-bit type and member handles
//! - [`entries`]: Type and member descriptors
//! - [`catalog`]: The `TypeCatalog` introspection oracle
//! - [`generics`]: Generic type and method substitution
//! - [`delegate_shapes`]: `Func`/`Action` definitions indexed by arity
//! - [`expr`]: The immutable expression node model
//! - [`error`]: Registration and construction errors

pub mod catalog;
pub mod delegate_shapes;
pub mod entries;
pub mod error;
pub mod expr;
pub mod generics;
mod primitive_kind;
pub mod type_hash;
mod visibility;

pub use catalog::{ConstructedType, NameMatching, TypeCatalog};
pub use delegate_shapes::{action_type, delegate_type, func_type};
pub use entries::{
    GenericInstance, InvokeShape, MemberEntry, MemberKind, MemberKinds, MemberRef, Param, TypeEntry, TypeKind,
};
pub use error::{ErrorKind, ExprError, RegistrationError};
pub use expr::{ConstantValue, ElementInit, Expr, ExprData, ExprKind, ExprNode, MemberBinding, ParameterData};
pub use primitive_kind::PrimitiveKind;
pub use type_hash::{TypeHash, primitives, well_known};
pub use visibility::Visibility;
