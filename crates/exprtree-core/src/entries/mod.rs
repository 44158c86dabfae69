//! Descriptor entries supplied by a type catalog.
//!
//! - [`TypeEntry`]: a type and its declared members
//! - [`MemberEntry`]: a field, property, method or constructor

mod member;
mod type_entry;

pub use member::{InvokeShape, MemberEntry, MemberKind, MemberKinds, MemberRef, Param};
pub use type_entry::{GenericInstance, TypeEntry, TypeKind};
