//! Type descriptors.

use std::fmt;
use std::sync::Arc;

use crate::{PrimitiveKind, TypeHash, Visibility, primitives, well_known};

use super::{MemberEntry, MemberRef, Param};

/// Category of a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Built-in primitive (including `string` and `object`).
    Primitive(PrimitiveKind),
    /// Reference-kind class.
    Class,
    /// User-defined value kind.
    Struct,
    /// Interface.
    Interface,
    /// Enumeration over an integer type.
    Enum { underlying: TypeHash },
    /// Delegate type; its signature is the `Invoke` method.
    Delegate,
    /// Optional-wrapped value kind.
    Nullable { inner: TypeHash },
    /// Array of `element` with `rank` dimensions.
    Array { element: TypeHash, rank: u32 },
    /// By-reference form of `element`; only legal as a parameter type.
    ByRef { element: TypeHash },
    /// Placeholder for a generic parameter.
    GenericParam { position: usize },
}

/// Link from a generic instance to its definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericInstance {
    /// The generic definition.
    pub definition: TypeHash,
    /// Type arguments, one per definition parameter.
    pub args: Vec<TypeHash>,
}

/// A type descriptor supplied by the type catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    /// Display name (`int`, `int?`, `Widget[]`, `Func<int, bool>`).
    pub name: String,
    /// Type handle.
    pub type_hash: TypeHash,
    /// Category.
    pub kind: TypeKind,
    /// Base type (`None` only for `object` and interfaces).
    pub base_type: Option<TypeHash>,
    /// Directly implemented (or, for interfaces, inherited) interfaces.
    pub interfaces: Vec<TypeHash>,
    /// Declared members.
    pub members: Vec<MemberRef>,
    /// Generic parameter placeholders of a generic definition.
    pub generic_params: Vec<TypeHash>,
    /// Set on a closed generic instance.
    pub generic_instance: Option<GenericInstance>,
    /// Type accessibility.
    pub visibility: Visibility,
}

impl TypeEntry {
    fn new(name: impl Into<String>, type_hash: TypeHash, kind: TypeKind, base_type: Option<TypeHash>) -> Self {
        Self {
            name: name.into(),
            type_hash,
            kind,
            base_type,
            interfaces: Vec::new(),
            members: Vec::new(),
            generic_params: Vec::new(),
            generic_instance: None,
            visibility: Visibility::Public,
        }
    }

    /// Create a primitive entry.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        let base = match kind {
            PrimitiveKind::Object => None,
            PrimitiveKind::String => Some(primitives::OBJECT),
            _ => Some(well_known::VALUE_TYPE),
        };
        Self::new(kind.name(), kind.type_hash(), TypeKind::Primitive(kind), base)
    }

    /// Create a reference-kind class deriving from `object`.
    pub fn class(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        Self::new(name, hash, TypeKind::Class, Some(primitives::OBJECT))
    }

    /// Create a value-kind struct.
    pub fn value_type(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        Self::new(name, hash, TypeKind::Struct, Some(well_known::VALUE_TYPE))
    }

    /// Create an interface.
    pub fn interface(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        Self::new(name, hash, TypeKind::Interface, None)
    }

    /// Create an enumeration over `underlying`.
    pub fn enumeration(name: impl Into<String>, underlying: TypeHash) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        Self::new(name, hash, TypeKind::Enum { underlying }, Some(well_known::ENUM))
    }

    /// Create a delegate type whose `Invoke` takes `params` and returns `return_type`.
    pub fn delegate(name: impl Into<String>, params: Vec<TypeHash>, return_type: TypeHash) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        let params = params
            .into_iter()
            .enumerate()
            .map(|(i, ty)| Param::new(format!("arg{}", i + 1), ty))
            .collect();
        Self::new(name, hash, TypeKind::Delegate, Some(well_known::DELEGATE))
            .with_member(MemberEntry::method("Invoke", params, return_type))
    }

    /// Create a generic parameter placeholder owned by `owner`.
    pub fn generic_param(owner: TypeHash, position: usize, name: impl Into<String>) -> Self {
        Self::new(
            name,
            TypeHash::from_generic_param(owner, position),
            TypeKind::GenericParam { position },
            Some(primitives::OBJECT),
        )
    }

    /// Create a constructed entry with an explicit handle.
    ///
    /// Used by catalogs when interning optional, array, by-ref and generic
    /// instance types.
    pub fn constructed(
        name: impl Into<String>,
        type_hash: TypeHash,
        kind: TypeKind,
        base_type: Option<TypeHash>,
    ) -> Self {
        Self::new(name, type_hash, kind, base_type)
    }

    // === Builder Methods ===

    /// Set the base type.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base_type = Some(base);
        self
    }

    /// Add an implemented interface.
    pub fn with_interface(mut self, interface: TypeHash) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add a member, attaching it to this type.
    pub fn with_member(mut self, member: MemberEntry) -> Self {
        self.members.push(Arc::new(member.declared_by(self.type_hash)));
        self
    }

    /// Declare `count` generic parameters named `T1..Tn` (or `T` for one).
    pub fn with_generic_arity(mut self, count: usize) -> Self {
        self.generic_params = (0..count)
            .map(|i| TypeHash::from_generic_param(self.type_hash, i))
            .collect();
        self
    }

    /// Set the type's accessibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    // === Queries ===

    /// Generic parameter placeholder at `position`.
    pub fn generic_param_hash(&self, position: usize) -> Option<TypeHash> {
        self.generic_params.get(position).copied()
    }

    /// Whether this is an open generic definition.
    pub fn is_generic_definition(&self) -> bool {
        !self.generic_params.is_empty()
    }

    /// Value kinds are copied, not referenced.
    pub fn is_value_kind(&self) -> bool {
        match self.kind {
            TypeKind::Primitive(p) => p.is_value_kind(),
            TypeKind::Struct | TypeKind::Enum { .. } | TypeKind::Nullable { .. } => true,
            _ => false,
        }
    }

    /// Get the primitive kind, if any.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_member_attaches_owner() {
        let widget = TypeEntry::class("Widget").with_member(MemberEntry::field("Size", primitives::INT32));
        assert_eq!(widget.members[0].declaring_type, widget.type_hash);
    }

    #[test]
    fn delegate_exposes_invoke() {
        let pred = TypeEntry::delegate("Predicate", vec![primitives::INT32], primitives::BOOL);
        let invoke = &pred.members[0];
        assert_eq!(invoke.name, "Invoke");
        assert_eq!(invoke.return_type(), Some(primitives::BOOL));
        assert_eq!(pred.base_type, Some(well_known::DELEGATE));
    }

    #[test]
    fn value_kinds() {
        assert!(TypeEntry::value_type("Money").is_value_kind());
        assert!(TypeEntry::enumeration("Color", primitives::INT32).is_value_kind());
        assert!(!TypeEntry::class("Widget").is_value_kind());
        assert!(!TypeEntry::interface("IShape").is_value_kind());
        assert!(!TypeEntry::primitive(PrimitiveKind::String).is_value_kind());
    }

    #[test]
    fn generic_arity_creates_placeholders() {
        let pair = TypeEntry::class("Pair`2").with_generic_arity(2);
        assert_eq!(pair.generic_params.len(), 2);
        assert_eq!(
            pair.generic_param_hash(1),
            Some(TypeHash::from_generic_param(pair.type_hash, 1))
        );
    }
}
