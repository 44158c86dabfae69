//! Shared fixtures for the integration tests.

use std::cell::Cell;
use std::sync::Arc;

use exprtree_core::{
    ConstructedType, ExprError, MemberKinds, MemberRef, NameMatching, TypeCatalog, TypeEntry, TypeHash,
};
use exprtree_registry::TypeRegistry;

/// A catalog that forwards to a [`TypeRegistry`] and counts member queries.
pub struct CountingCatalog {
    inner: TypeRegistry,
    member_queries: Cell<usize>,
}

impl CountingCatalog {
    pub fn new(inner: TypeRegistry) -> Self {
        Self {
            inner,
            member_queries: Cell::new(0),
        }
    }

    /// Number of `declared_members`, `members` and `members_named` calls so far.
    pub fn member_queries(&self) -> usize {
        self.member_queries.get()
    }

    fn record(&self) {
        self.member_queries.set(self.member_queries.get() + 1);
    }
}

impl TypeCatalog for CountingCatalog {
    fn lookup(&self, ty: TypeHash) -> Option<Arc<TypeEntry>> {
        self.inner.lookup(ty)
    }

    fn intern(&self, constructed: ConstructedType) -> Result<TypeHash, ExprError> {
        self.inner.intern(constructed)
    }

    fn intern_method(&self, method: &MemberRef, type_args: &[TypeHash]) -> Result<MemberRef, ExprError> {
        self.inner.intern_method(method, type_args)
    }

    fn declared_members(&self, ty: TypeHash, filter: MemberKinds) -> Vec<MemberRef> {
        self.record();
        self.inner.declared_members(ty, filter)
    }

    fn members(&self, ty: TypeHash, filter: MemberKinds) -> Vec<MemberRef> {
        self.record();
        self.inner.members(ty, filter)
    }

    fn members_named(
        &self,
        ty: TypeHash,
        name: &str,
        filter: MemberKinds,
        include_non_public: bool,
        matching: NameMatching,
    ) -> Vec<MemberRef> {
        self.record();
        self.inner.members_named(ty, name, filter, include_non_public, matching)
    }
}
