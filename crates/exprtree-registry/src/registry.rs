//! TypeRegistry - in-memory type catalog.
//!
//! # Storage Model
//!
//! - **Named types**: registered up front into an `FxHashMap` keyed by
//!   `TypeHash`, immutable once the registry is shared.
//! - **Constructed types**: optional-wrapped, array, by-ref and generic
//!   instance descriptors are created on first use and memoized in a
//!   `DashMap`. Each key is written at most once; a racing second writer
//!   keeps the first descriptor.
//! - **Closed generic methods**: memoized the same way, keyed by the closed
//!   method hash.
//!
//! Descriptors are built outside the map's shard lock. Building an instance
//! can intern further types (a `Func<int?, bool>` interns `int?` first), so no
//! lock is held across that recursion.
//!
//! # Example
//!
//! ```
//! use exprtree_core::{TypeCatalog, TypeEntry, primitives};
//! use exprtree_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::with_builtins();
//! let widget = registry.register_type(TypeEntry::class("Widget")).unwrap();
//!
//! assert!(registry.is_assignable_from(primitives::OBJECT, widget));
//! let optional_int = registry.wrap_optional(primitives::INT32).unwrap();
//! assert_eq!(registry.type_name(optional_int), "int?");
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHashMap;

use exprtree_core::{
    ConstructedType, ExprError, MemberEntry, MemberRef, Param, RegistrationError, TypeCatalog, TypeEntry, TypeHash,
    TypeKind, generics, primitives, well_known,
};

/// In-memory [`TypeCatalog`].
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Registered named types.
    types: FxHashMap<TypeHash, Arc<TypeEntry>>,
    /// Name index over registered types.
    names: FxHashMap<String, TypeHash>,
    /// Write-once cache of constructed types.
    constructed: DashMap<TypeHash, Arc<TypeEntry>>,
    /// Write-once cache of closed generic methods.
    closed_methods: DashMap<TypeHash, MemberRef>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the primitive types registered.
    pub fn with_primitives() -> Self {
        let mut registry = Self::new();
        crate::builtins::register_primitives(&mut registry);
        registry
    }

    /// Create a registry with every built-in type registered.
    ///
    /// See [`crate::builtins`] for the set.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtins::register_builtins(&mut registry);
        registry
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a named type.
    ///
    /// Generic parameter placeholders of the type and of its generic methods
    /// are registered alongside it.
    pub fn register_type(&mut self, entry: TypeEntry) -> Result<TypeHash, RegistrationError> {
        let hash = entry.type_hash;
        if self.types.contains_key(&hash) || self.names.contains_key(&entry.name) {
            return Err(RegistrationError::DuplicateType(entry.name));
        }
        if matches!(
            entry.kind,
            TypeKind::Nullable { .. } | TypeKind::Array { .. } | TypeKind::ByRef { .. }
        ) {
            return Err(RegistrationError::InvalidType(format!(
                "'{}' is a constructed type and cannot be registered by name",
                entry.name
            )));
        }
        self.insert(entry);
        Ok(hash)
    }

    pub(crate) fn insert(&mut self, entry: TypeEntry) {
        let hash = entry.type_hash;

        for (i, param) in entry.generic_params.iter().enumerate() {
            let name = if entry.generic_params.len() == 1 {
                "T".to_string()
            } else {
                format!("T{}", i + 1)
            };
            self.types
                .entry(*param)
                .or_insert_with(|| Arc::new(TypeEntry::generic_param(hash, i, name)));
        }
        for member in &entry.members {
            for (i, param) in member.generic_params().iter().enumerate() {
                let owner = TypeHash::from_name(&member.name);
                self.types
                    .entry(*param)
                    .or_insert_with(|| Arc::new(TypeEntry::generic_param(owner, i, format!("T{}", i + 1))));
            }
        }

        self.names.insert(entry.name.clone(), hash);
        self.types.insert(hash, Arc::new(entry));
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get a registered or already-constructed type.
    pub fn get(&self, hash: TypeHash) -> Option<Arc<TypeEntry>> {
        self.lookup(hash)
    }

    /// Get a registered type's handle by name.
    pub fn resolve(&self, name: &str) -> Option<TypeHash> {
        self.names.get(name).copied()
    }

    /// Check if a named type is registered.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.types.contains_key(&hash)
    }

    /// Number of registered named types, including generic placeholders.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Number of constructed types interned so far.
    pub fn constructed_count(&self) -> usize {
        self.constructed.len()
    }

    /// Iterate over registered named types.
    pub fn types(&self) -> impl Iterator<Item = &Arc<TypeEntry>> {
        self.types.values()
    }

    // ==========================================================================
    // Constructed types
    // ==========================================================================

    fn require(&self, ty: TypeHash) -> Result<Arc<TypeEntry>, ExprError> {
        self.lookup(ty)
            .ok_or_else(|| RegistrationError::TypeNotFound(format!("<{ty}>")).into())
    }

    fn build(&self, constructed: &ConstructedType) -> Result<TypeEntry, ExprError> {
        let hash = constructed.type_hash();
        match constructed {
            ConstructedType::Nullable(inner) => {
                let entry = self.require(*inner)?;
                if !entry.is_value_kind()
                    || matches!(entry.kind, TypeKind::Nullable { .. })
                    || *inner == primitives::VOID
                {
                    return Err(ExprError::invalid_shape(format!(
                        "type '{}' cannot be wrapped in optional",
                        entry.name
                    )));
                }
                Ok(TypeEntry::constructed(
                    format!("{}?", entry.name),
                    hash,
                    TypeKind::Nullable { inner: *inner },
                    Some(well_known::VALUE_TYPE),
                )
                .with_member(MemberEntry::property("HasValue", primitives::BOOL).read_only())
                .with_member(MemberEntry::property("Value", *inner).read_only())
                .with_member(MemberEntry::method("GetValueOrDefault", vec![], *inner)))
            }
            ConstructedType::Array { element, rank } => {
                let entry = self.require(*element)?;
                if *rank == 0 {
                    return Err(ExprError::invalid_shape("array rank must be at least 1"));
                }
                if *element == primitives::VOID || matches!(entry.kind, TypeKind::ByRef { .. }) {
                    return Err(ExprError::invalid_shape(format!(
                        "type '{}' cannot be an array element",
                        entry.name
                    )));
                }
                let commas = ",".repeat(*rank as usize - 1);
                let indexes: Vec<Param> = (0..*rank)
                    .map(|i| Param::new(format!("index{i}"), primitives::INT32))
                    .collect();
                let mut set_params = indexes.clone();
                set_params.push(Param::new("value", *element));

                Ok(TypeEntry::constructed(
                    format!("{}[{commas}]", entry.name),
                    hash,
                    TypeKind::Array {
                        element: *element,
                        rank: *rank,
                    },
                    Some(well_known::ARRAY),
                )
                .with_member(MemberEntry::property("Length", primitives::INT32).read_only())
                .with_member(MemberEntry::method("Get", indexes, *element))
                .with_member(MemberEntry::method("Set", set_params, primitives::VOID)))
            }
            ConstructedType::ByRef(element) => {
                let entry = self.require(*element)?;
                if *element == primitives::VOID || matches!(entry.kind, TypeKind::ByRef { .. }) {
                    return Err(ExprError::invalid_shape(format!(
                        "type '{}' cannot be passed by reference",
                        entry.name
                    )));
                }
                Ok(TypeEntry::constructed(
                    format!("{}&", entry.name),
                    hash,
                    TypeKind::ByRef { element: *element },
                    None,
                ))
            }
            ConstructedType::GenericInstance { definition, args } => {
                let def = self.require(*definition)?;
                if !def.is_generic_definition() {
                    return Err(RegistrationError::InvalidType(format!(
                        "'{}' is not a generic type definition",
                        def.name
                    ))
                    .into());
                }
                for arg in args {
                    self.require(*arg)?;
                }
                generics::instantiate_type(self, &def, args)
            }
        }
    }
}

impl TypeCatalog for TypeRegistry {
    fn lookup(&self, ty: TypeHash) -> Option<Arc<TypeEntry>> {
        if let Some(entry) = self.types.get(&ty) {
            return Some(Arc::clone(entry));
        }
        self.constructed.get(&ty).map(|e| Arc::clone(e.value()))
    }

    fn intern(&self, constructed: ConstructedType) -> Result<TypeHash, ExprError> {
        let hash = constructed.type_hash();
        if self.types.contains_key(&hash) || self.constructed.contains_key(&hash) {
            return Ok(hash);
        }
        let entry = Arc::new(self.build(&constructed)?);
        self.constructed.entry(hash).or_insert(entry);
        Ok(hash)
    }

    fn intern_method(&self, method: &MemberRef, type_args: &[TypeHash]) -> Result<MemberRef, ExprError> {
        let key = TypeHash::from_generic_method(method.member_hash, type_args);
        if let Some(closed) = self.closed_methods.get(&key) {
            return Ok(Arc::clone(closed.value()));
        }
        let closed = Arc::new(generics::instantiate_method(self, method, type_args)?);
        Ok(Arc::clone(self.closed_methods.entry(key).or_insert(closed).value()))
    }
}
