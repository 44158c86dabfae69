//! The type-introspection oracle.
//!
//! [`TypeCatalog`] is the only way the factory learns about types. An
//! implementation supplies two capabilities:
//!
//! - [`TypeCatalog::lookup`]: descriptor of a known handle
//! - [`TypeCatalog::intern`]: handle of a constructed type (optional-wrapped,
//!   array, by-ref, generic instance), creating its descriptor on first use
//!
//! Every other query (assignability, member enumeration, optional wrapping,
//! array shape, delegate signatures) is a provided method built on those two,
//! so an in-memory test double only has to store descriptors.
//!
//! Interning is a pure function of its input. Implementations that memoize it
//! must do so with insert-if-absent semantics; two callers racing to intern the
//! same constructed type may both compute it, and either result is correct.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::entries::{InvokeShape, MemberKinds, MemberRef, TypeEntry, TypeKind};
use crate::{ExprError, PrimitiveKind, TypeHash, generics, primitives, well_known};

/// A type built from other types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstructedType {
    /// Optional-wrapped value kind.
    Nullable(TypeHash),
    /// Array of `element` with `rank` dimensions.
    Array { element: TypeHash, rank: u32 },
    /// By-reference parameter type.
    ByRef(TypeHash),
    /// Generic definition closed over `args`.
    GenericInstance {
        definition: TypeHash,
        args: Vec<TypeHash>,
    },
}

impl ConstructedType {
    /// The handle the constructed type will have once interned.
    pub fn type_hash(&self) -> TypeHash {
        match self {
            ConstructedType::Nullable(inner) => TypeHash::from_nullable(*inner),
            ConstructedType::Array { element, rank } => TypeHash::from_array(*element, *rank),
            ConstructedType::ByRef(element) => TypeHash::from_by_ref(*element),
            ConstructedType::GenericInstance { definition, args } => {
                TypeHash::from_generic_instance(*definition, args)
            }
        }
    }
}

/// How member names are compared during lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameMatching {
    /// ASCII case-insensitive comparison.
    #[default]
    IgnoreCase,
    /// Exact comparison.
    Exact,
}

impl NameMatching {
    /// Compare two member names.
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            NameMatching::IgnoreCase => a.eq_ignore_ascii_case(b),
            NameMatching::Exact => a == b,
        }
    }
}

/// Read-only type-introspection oracle.
pub trait TypeCatalog {
    /// Get the descriptor of a type handle.
    fn lookup(&self, ty: TypeHash) -> Option<Arc<TypeEntry>>;

    /// Get the handle of a constructed type, creating its descriptor if needed.
    fn intern(&self, constructed: ConstructedType) -> Result<TypeHash, ExprError>;

    /// Close a generic method definition over `type_args`.
    fn intern_method(&self, method: &MemberRef, type_args: &[TypeHash]) -> Result<MemberRef, ExprError> {
        generics::instantiate_method(self, method, type_args).map(Arc::new)
    }

    // ==========================================================================
    // Descriptor queries
    // ==========================================================================

    /// Display name of a type, or its hex handle when unknown.
    fn type_name(&self, ty: TypeHash) -> String {
        self.lookup(ty)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("<{ty}>"))
    }

    /// Category of a type.
    fn kind(&self, ty: TypeHash) -> Option<TypeKind> {
        self.lookup(ty).map(|e| e.kind)
    }

    /// Check if the handle is known.
    fn exists(&self, ty: TypeHash) -> bool {
        self.lookup(ty).is_some()
    }

    /// Value kinds are copied, not referenced. Unknown handles are neither.
    fn is_value_kind(&self, ty: TypeHash) -> bool {
        self.lookup(ty).is_some_and(|e| e.is_value_kind())
    }

    /// Reference kinds: classes, interfaces, arrays, delegates, `string`, `object`.
    fn is_reference_kind(&self, ty: TypeHash) -> bool {
        self.kind(ty).is_some_and(|k| match k {
            TypeKind::Primitive(p) => !p.is_value_kind(),
            TypeKind::Class | TypeKind::Interface | TypeKind::Delegate | TypeKind::Array { .. } => true,
            TypeKind::GenericParam { .. } => true,
            _ => false,
        })
    }

    /// Check if the type is optional-wrapped.
    fn is_optional_wrapped(&self, ty: TypeHash) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Nullable { .. }))
    }

    /// Strip one level of optional wrapping; other types are returned unchanged.
    fn unwrap(&self, ty: TypeHash) -> TypeHash {
        match self.kind(ty) {
            Some(TypeKind::Nullable { inner }) => inner,
            _ => ty,
        }
    }

    /// Wrap a non-optional value kind in optional; other types are returned unchanged.
    fn wrap_optional(&self, ty: TypeHash) -> Result<TypeHash, ExprError> {
        if self.is_value_kind(ty) && !self.is_optional_wrapped(ty) && ty != primitives::VOID {
            self.intern(ConstructedType::Nullable(ty))
        } else {
            Ok(ty)
        }
    }

    /// Primitive kind of a type (never set for enums).
    fn primitive_kind(&self, ty: TypeHash) -> Option<PrimitiveKind> {
        self.lookup(ty).and_then(|e| e.primitive_kind())
    }

    fn is_interface(&self, ty: TypeHash) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Interface))
    }

    fn is_enum(&self, ty: TypeHash) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Enum { .. }))
    }

    fn is_delegate(&self, ty: TypeHash) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Delegate))
    }

    fn is_array(&self, ty: TypeHash) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Array { .. }))
    }

    fn is_by_ref(&self, ty: TypeHash) -> bool {
        matches!(self.kind(ty), Some(TypeKind::ByRef { .. }))
    }

    /// Element type of an array or by-ref type.
    fn element_type(&self, ty: TypeHash) -> Option<TypeHash> {
        match self.kind(ty)? {
            TypeKind::Array { element, .. } | TypeKind::ByRef { element } => Some(element),
            _ => None,
        }
    }

    /// Rank of an array type.
    fn rank(&self, ty: TypeHash) -> Option<u32> {
        match self.kind(ty)? {
            TypeKind::Array { rank, .. } => Some(rank),
            _ => None,
        }
    }

    /// Direct base type.
    fn base_type(&self, ty: TypeHash) -> Option<TypeHash> {
        self.lookup(ty).and_then(|e| e.base_type)
    }

    /// All interfaces implemented by `ty`, including inherited ones.
    ///
    /// For an interface this is the set of interfaces it extends.
    fn all_interfaces(&self, ty: TypeHash) -> Vec<TypeHash> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut pending: Vec<TypeHash> = Vec::new();

        let mut current = Some(ty);
        while let Some(t) = current {
            let Some(entry) = self.lookup(t) else { break };
            pending.extend(entry.interfaces.iter().copied());
            current = entry.base_type;
        }

        while let Some(iface) = pending.pop() {
            if !seen.insert(iface) {
                continue;
            }
            out.push(iface);
            if let Some(entry) = self.lookup(iface) {
                pending.extend(entry.interfaces.iter().copied());
            }
        }
        out
    }

    /// Check if `ty` is `base` or derives from it through the base-type chain.
    fn is_subclass_or_same(&self, base: TypeHash, ty: TypeHash) -> bool {
        let mut current = Some(ty);
        while let Some(t) = current {
            if t == base {
                return true;
            }
            current = self.base_type(t);
        }
        false
    }

    /// Can a value of `src` be stored in a location of `dest` without conversion code?
    fn is_assignable_from(&self, dest: TypeHash, src: TypeHash) -> bool {
        if dest == src {
            return true;
        }
        let (Some(d), Some(s)) = (self.lookup(dest), self.lookup(src)) else {
            return false;
        };
        if matches!(s.kind, TypeKind::ByRef { .. }) || matches!(d.kind, TypeKind::ByRef { .. }) {
            return false;
        }
        if src == primitives::VOID {
            return false;
        }
        if dest == primitives::OBJECT {
            return true;
        }
        if dest == well_known::VALUE_TYPE && s.is_value_kind() {
            return true;
        }

        match (d.kind, s.kind) {
            (TypeKind::Nullable { inner }, _) => return inner == src,
            (
                TypeKind::Array {
                    element: de,
                    rank: dr,
                },
                TypeKind::Array {
                    element: se,
                    rank: sr,
                },
            ) => {
                // array covariance over reference elements
                return dr == sr
                    && (de == se
                        || (self.is_reference_kind(de)
                            && self.is_reference_kind(se)
                            && self.is_assignable_from(de, se)));
            }
            (TypeKind::Interface, _) => return self.all_interfaces(src).contains(&dest),
            _ => {}
        }

        self.is_subclass_or_same(dest, src)
    }

    // ==========================================================================
    // Member queries
    // ==========================================================================

    /// Members declared directly on `ty` that match `filter`.
    fn declared_members(&self, ty: TypeHash, filter: MemberKinds) -> Vec<MemberRef> {
        self.lookup(ty)
            .map(|e| {
                e.members
                    .iter()
                    .filter(|m| filter.contains(m.member_kind()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Members of `ty` including those inherited from base types and, for
    /// interfaces, from extended interfaces.
    ///
    /// Private base members and base constructors are not inherited. A member
    /// redeclared with the same name and parameter types hides the base one.
    fn members(&self, ty: TypeHash, filter: MemberKinds) -> Vec<MemberRef> {
        let mut out: Vec<MemberRef> = self.declared_members(ty, filter);
        let inherited_filter = filter - MemberKinds::CONSTRUCTOR;

        let mut sources = Vec::new();
        let mut current = self.base_type(ty);
        while let Some(t) = current {
            sources.push(t);
            current = self.base_type(t);
        }
        if self.is_interface(ty) {
            sources.extend(self.all_interfaces(ty));
        }

        for source in sources {
            for member in self.declared_members(source, inherited_filter) {
                if !member.visibility.is_inherited() {
                    continue;
                }
                let hidden = out.iter().any(|m| {
                    m.name == member.name
                        && m.member_kind() == member.member_kind()
                        && m.params() == member.params()
                });
                if !hidden {
                    out.push(member);
                }
            }
        }
        out
    }

    /// Members of `ty` (inherited included) whose name matches `name`.
    fn members_named(
        &self,
        ty: TypeHash,
        name: &str,
        filter: MemberKinds,
        include_non_public: bool,
        matching: NameMatching,
    ) -> Vec<MemberRef> {
        self.members(ty, filter)
            .into_iter()
            .filter(|m| matching.matches(&m.name, name))
            .filter(|m| include_non_public || m.is_public())
            .collect()
    }

    /// Callable signature of a member.
    fn invoke_shape(&self, member: &MemberRef) -> InvokeShape {
        member.invoke_shape()
    }

    /// The `Invoke` method of a delegate type.
    fn delegate_invoke(&self, ty: TypeHash) -> Option<MemberRef> {
        if !self.is_delegate(ty) {
            return None;
        }
        self.declared_members(ty, MemberKinds::METHOD)
            .into_iter()
            .find(|m| m.name == "Invoke" && !m.is_static)
    }

    // ==========================================================================
    // Constructed types
    // ==========================================================================

    /// Handle of an array of `element` with `rank` dimensions.
    fn array_of(&self, element: TypeHash, rank: u32) -> Result<TypeHash, ExprError> {
        self.intern(ConstructedType::Array { element, rank })
    }

    /// Handle of the by-reference form of `element`.
    fn by_ref_of(&self, element: TypeHash) -> Result<TypeHash, ExprError> {
        self.intern(ConstructedType::ByRef(element))
    }

    /// Handle of `definition` closed over `args`.
    fn generic_instance(&self, definition: TypeHash, args: &[TypeHash]) -> Result<TypeHash, ExprError> {
        self.intern(ConstructedType::GenericInstance {
            definition,
            args: args.to_vec(),
        })
    }

    /// Find the instance of `definition` that `ty` is or derives from.
    fn find_generic_instance(&self, definition: TypeHash, ty: TypeHash) -> Option<Arc<TypeEntry>> {
        let mut current = Some(ty);
        while let Some(t) = current {
            let entry = self.lookup(t)?;
            if entry
                .generic_instance
                .as_ref()
                .is_some_and(|g| g.definition == definition)
            {
                return Some(entry);
            }
            current = entry.base_type;
        }
        None
    }

    /// Close a generic method definition over `type_args`.
    fn make_generic_method(&self, method: &MemberRef, type_args: &[TypeHash]) -> Result<MemberRef, ExprError> {
        self.intern_method(method, type_args)
    }
}
