//! Member descriptors: fields, properties, methods and constructors.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::{TypeHash, Visibility, primitives};

/// Shared, immutable handle to a member descriptor.
///
/// Nodes embed the resolved member by handle; equality is structural.
pub type MemberRef = Arc<MemberEntry>;

bitflags! {
    /// Filter for [`TypeCatalog::declared_members`](crate::TypeCatalog::declared_members).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemberKinds: u8 {
        const FIELD = 1 << 0;
        const PROPERTY = 1 << 1;
        const METHOD = 1 << 2;
        const CONSTRUCTOR = 1 << 3;
        const FIELD_OR_PROPERTY = Self::FIELD.bits() | Self::PROPERTY.bits();
    }
}

/// A formal parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Declared type; may be a by-ref constructed type.
    pub data_type: TypeHash,
}

impl Param {
    /// Create a new parameter.
    pub fn new(name: impl Into<String>, data_type: TypeHash) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// The shape-specific part of a member.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    /// A data field.
    Field {
        field_type: TypeHash,
        is_read_only: bool,
    },
    /// An accessor-backed property.
    Property {
        property_type: TypeHash,
        can_read: bool,
        can_write: bool,
    },
    /// A method, possibly generic.
    ///
    /// A generic method definition has `generic_params` and no `generic_args`;
    /// a closed generic method has both.
    Method {
        params: Vec<Param>,
        return_type: TypeHash,
        generic_params: Vec<TypeHash>,
        generic_args: Vec<TypeHash>,
    },
    /// An instance constructor.
    Constructor { params: Vec<Param> },
}

/// Callable signature of a member, as consumed by resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeShape {
    /// Declared parameter types, in order.
    pub params: Vec<TypeHash>,
    /// Return type (`void` for procedures, the declaring type for constructors).
    pub return_type: TypeHash,
    /// Whether the member is static.
    pub is_static: bool,
}

/// A member descriptor supplied by the type catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberEntry {
    /// Member name (constructors use `.ctor`).
    pub name: String,
    /// The type that declares this member.
    pub declaring_type: TypeHash,
    /// Identity of this member.
    pub member_hash: TypeHash,
    /// Shape-specific data.
    pub kind: MemberKind,
    /// Whether the member is static.
    pub is_static: bool,
    /// Member accessibility.
    pub visibility: Visibility,
}

impl MemberEntry {
    /// Name used for constructors.
    pub const CONSTRUCTOR_NAME: &'static str = ".ctor";

    fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        let mut entry = Self {
            name: name.into(),
            declaring_type: TypeHash::EMPTY,
            member_hash: TypeHash::EMPTY,
            kind,
            is_static: false,
            visibility: Visibility::Public,
        };
        entry.rehash();
        entry
    }

    /// Create a mutable public instance field.
    pub fn field(name: impl Into<String>, field_type: TypeHash) -> Self {
        Self::new(
            name,
            MemberKind::Field {
                field_type,
                is_read_only: false,
            },
        )
    }

    /// Create a public read-write instance property.
    pub fn property(name: impl Into<String>, property_type: TypeHash) -> Self {
        Self::new(
            name,
            MemberKind::Property {
                property_type,
                can_read: true,
                can_write: true,
            },
        )
    }

    /// Create a public instance method.
    pub fn method(name: impl Into<String>, params: Vec<Param>, return_type: TypeHash) -> Self {
        Self::new(
            name,
            MemberKind::Method {
                params,
                return_type,
                generic_params: Vec::new(),
                generic_args: Vec::new(),
            },
        )
    }

    /// Create a public static operator method taking `params`.
    ///
    /// Operator methods are ordinary static methods with a reserved name such as
    /// `op_Addition`.
    pub fn operator(name: impl Into<String>, params: Vec<Param>, return_type: TypeHash) -> Self {
        Self::method(name, params, return_type).as_static()
    }

    /// Create a public constructor.
    pub fn constructor(params: Vec<Param>) -> Self {
        Self::new(Self::CONSTRUCTOR_NAME, MemberKind::Constructor { params })
    }

    /// Placeholder handle for the `position`th generic parameter of a method.
    pub fn generic_param(method_name: &str, position: usize) -> TypeHash {
        TypeHash::from_generic_param(TypeHash::from_name(method_name), position)
    }

    // === Builder Methods ===

    /// Mark the member static.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Set the member's accessibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark a field read-only.
    pub fn read_only(mut self) -> Self {
        match &mut self.kind {
            MemberKind::Field { is_read_only, .. } => *is_read_only = true,
            MemberKind::Property { can_write, .. } => *can_write = false,
            _ => {}
        }
        self
    }

    /// Mark a property write-only.
    pub fn write_only(mut self) -> Self {
        if let MemberKind::Property { can_read, .. } = &mut self.kind {
            *can_read = false;
        }
        self
    }

    /// Declare generic parameters on a method definition.
    pub fn with_generic_params(mut self, params: Vec<TypeHash>) -> Self {
        if let MemberKind::Method { generic_params, .. } = &mut self.kind {
            *generic_params = params;
        }
        self.rehash();
        self
    }

    /// Attach the member to its declaring type.
    pub fn declared_by(mut self, owner: TypeHash) -> Self {
        self.declaring_type = owner;
        self.rehash();
        self
    }

    /// Recompute `member_hash` from name, owner and signature.
    pub fn rehash(&mut self) {
        let owner = self.declaring_type;
        self.member_hash = match &self.kind {
            MemberKind::Field { .. } => TypeHash::from_field(owner, &self.name),
            MemberKind::Property { .. } => TypeHash::from_property(owner, &self.name),
            MemberKind::Method {
                params,
                generic_args,
                ..
            } => {
                let param_hashes: Vec<_> = params.iter().map(|p| p.data_type).collect();
                let base = TypeHash::from_method(owner, &self.name, &param_hashes);
                if generic_args.is_empty() {
                    base
                } else {
                    TypeHash::from_generic_method(base, generic_args)
                }
            }
            MemberKind::Constructor { params } => {
                let param_hashes: Vec<_> = params.iter().map(|p| p.data_type).collect();
                TypeHash::from_constructor(owner, &param_hashes)
            }
        };
    }

    // === Queries ===

    /// The kind flag of this member.
    pub fn member_kind(&self) -> MemberKinds {
        match self.kind {
            MemberKind::Field { .. } => MemberKinds::FIELD,
            MemberKind::Property { .. } => MemberKinds::PROPERTY,
            MemberKind::Method { .. } => MemberKinds::METHOD,
            MemberKind::Constructor { .. } => MemberKinds::CONSTRUCTOR,
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, MemberKind::Field { .. })
    }

    pub fn is_property(&self) -> bool {
        matches!(self.kind, MemberKind::Property { .. })
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method { .. })
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.kind, MemberKind::Constructor { .. })
    }

    pub fn is_public(&self) -> bool {
        self.visibility.is_public()
    }

    /// Declared parameters (empty for fields and properties).
    pub fn params(&self) -> &[Param] {
        match &self.kind {
            MemberKind::Method { params, .. } | MemberKind::Constructor { params } => params,
            _ => &[],
        }
    }

    /// Return type of a method.
    pub fn return_type(&self) -> Option<TypeHash> {
        match &self.kind {
            MemberKind::Method { return_type, .. } => Some(*return_type),
            _ => None,
        }
    }

    /// Type of a field or property.
    pub fn value_type(&self) -> Option<TypeHash> {
        match &self.kind {
            MemberKind::Field { field_type, .. } => Some(*field_type),
            MemberKind::Property { property_type, .. } => Some(*property_type),
            _ => None,
        }
    }

    /// Generic parameters declared by a method.
    pub fn generic_params(&self) -> &[TypeHash] {
        match &self.kind {
            MemberKind::Method { generic_params, .. } => generic_params,
            _ => &[],
        }
    }

    /// Type arguments of a closed generic method.
    pub fn generic_args(&self) -> &[TypeHash] {
        match &self.kind {
            MemberKind::Method { generic_args, .. } => generic_args,
            _ => &[],
        }
    }

    /// An open generic method that still needs type arguments.
    pub fn is_generic_definition(&self) -> bool {
        !self.generic_params().is_empty() && self.generic_args().is_empty()
    }

    /// Whether a field or property can be read.
    pub fn can_read(&self) -> bool {
        match self.kind {
            MemberKind::Field { .. } => true,
            MemberKind::Property { can_read, .. } => can_read,
            _ => false,
        }
    }

    /// Whether a field or property can be assigned.
    pub fn can_write(&self) -> bool {
        match self.kind {
            MemberKind::Field { is_read_only, .. } => !is_read_only,
            MemberKind::Property { can_write, .. } => can_write,
            _ => false,
        }
    }

    /// The callable signature of this member.
    pub fn invoke_shape(&self) -> InvokeShape {
        let params = self.params().iter().map(|p| p.data_type).collect();
        let return_type = match &self.kind {
            MemberKind::Method { return_type, .. } => *return_type,
            MemberKind::Constructor { .. } => self.declaring_type,
            MemberKind::Field { field_type, .. } => *field_type,
            MemberKind::Property { property_type, .. } => *property_type,
        };
        InvokeShape {
            params,
            return_type,
            is_static: self.is_static,
        }
    }

    /// Whether a method returns nothing.
    pub fn returns_void(&self) -> bool {
        self.return_type() == Some(primitives::VOID)
    }
}

impl fmt::Display for MemberEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MemberKind::Method { params, .. } | MemberKind::Constructor { params } => {
                write!(f, "{}(", self.name)?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p.name)?;
                }
                write!(f, ")")
            }
            _ => write!(f, "{}", self.name),
        }
    }
}
