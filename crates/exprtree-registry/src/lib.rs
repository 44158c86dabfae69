//! In-memory type catalog.
//!
//! [`TypeRegistry`] implements [`exprtree_core::TypeCatalog`] over registered
//! descriptors and interns constructed types on demand. [`builtins`] holds the
//! type set every factory expects to find.

pub mod builtins;
mod registry;

pub use registry::TypeRegistry;
