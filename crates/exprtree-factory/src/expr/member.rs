//! Field and property access.
//!
//! Named lookup prefers public members; non-public ones are consulted only
//! when no public member of the requested kind matches (and the factory
//! options include them).

use exprtree_core::{Expr, ExprData, ExprError, ExprKind, MemberKinds, MemberRef, TypeHash, primitives};

use super::{ExprFactory, Result};
use crate::conversion::is_valid_instance_type;

impl ExprFactory<'_> {
    /// Access `field` on `instance`, or statically when `instance` is `None`.
    ///
    /// # Errors
    ///
    /// - [`ExprError::InvalidShape`] when `field` is not a field, or an
    ///   instance is given for a static field
    /// - [`ExprError::NullArgument`] when an instance field has no instance
    /// - [`ExprError::TypeMismatch`] when the instance type does not declare
    ///   the field
    pub fn field(&self, instance: Option<Expr>, field: &MemberRef) -> Result<Expr> {
        if !field.is_field() {
            return Err(ExprError::invalid_shape(format!("'{}' is not a field", field.name)));
        }
        self.check_receiver(instance.as_ref(), field)?;
        Ok(self.member_access(instance, field))
    }

    /// Access the instance field `name` on `instance`.
    pub fn field_named(&self, instance: Expr, name: &str) -> Result<Expr> {
        let ty = instance.static_type();
        let field = self.named_member(ty, name, MemberKinds::FIELD, false)?;
        self.field(Some(instance), &field)
    }

    /// Access the static field `name` of `ty`.
    pub fn static_field_named(&self, ty: TypeHash, name: &str) -> Result<Expr> {
        let field = self.named_member(ty, name, MemberKinds::FIELD, true)?;
        self.field(None, &field)
    }

    /// Read `property` on `instance`, or statically when `instance` is `None`.
    ///
    /// # Errors
    ///
    /// As [`field`](Self::field), plus [`ExprError::InvalidShape`] for a
    /// property without a getter.
    pub fn property(&self, instance: Option<Expr>, property: &MemberRef) -> Result<Expr> {
        if !property.is_property() {
            return Err(ExprError::invalid_shape(format!("'{}' is not a property", property.name)));
        }
        if !property.can_read() {
            return Err(ExprError::invalid_shape(format!(
                "property '{}' does not have a getter",
                property.name
            )));
        }
        self.check_receiver(instance.as_ref(), property)?;
        Ok(self.member_access(instance, property))
    }

    /// Read the instance property `name` on `instance`.
    pub fn property_named(&self, instance: Expr, name: &str) -> Result<Expr> {
        let ty = instance.static_type();
        let property = self.named_member(ty, name, MemberKinds::PROPERTY, false)?;
        self.property(Some(instance), &property)
    }

    /// Read the static property `name` of `ty`.
    pub fn static_property_named(&self, ty: TypeHash, name: &str) -> Result<Expr> {
        let property = self.named_member(ty, name, MemberKinds::PROPERTY, true)?;
        self.property(None, &property)
    }

    /// Access the instance property or field `name` on `instance`.
    ///
    /// Tried in order: public property, public field, non-public property,
    /// non-public field.
    pub fn property_or_field(&self, instance: Expr, name: &str) -> Result<Expr> {
        let ty = instance.static_type();
        let mut tiers = vec![(MemberKinds::PROPERTY, true), (MemberKinds::FIELD, true)];
        if self.options.include_non_public {
            tiers.extend([(MemberKinds::PROPERTY, false), (MemberKinds::FIELD, false)]);
        }
        for (kind, public) in tiers {
            if let Some(member) = self.member_tier(ty, name, kind, false, public)? {
                return if member.is_property() {
                    self.property(Some(instance), &member)
                } else {
                    self.field(Some(instance), &member)
                };
            }
        }
        Err(self.member_not_found(ty, name, "is a property or field"))
    }

    /// Access a field or property chosen by its descriptor.
    ///
    /// # Errors
    ///
    /// [`ExprError::NotSupported`] for methods and constructors.
    pub fn make_member_access(&self, instance: Option<Expr>, member: &MemberRef) -> Result<Expr> {
        if member.is_field() {
            self.field(instance, member)
        } else if member.is_property() {
            self.property(instance, member)
        } else {
            Err(ExprError::not_supported(format!(
                "member '{}' is not a field or property",
                member.name
            )))
        }
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    fn member_access(&self, instance: Option<Expr>, member: &MemberRef) -> Expr {
        let ty = member.value_type().unwrap_or(primitives::VOID);
        Expr::assemble(
            ExprKind::MemberAccess,
            ty,
            ExprData::MemberAccess {
                instance,
                member: member.clone(),
            },
        )
    }

    /// Staticness and receiver-type checks shared by member access and calls.
    pub(super) fn check_receiver(&self, instance: Option<&Expr>, member: &MemberRef) -> Result<()> {
        match instance {
            Some(_) if member.is_static => Err(ExprError::invalid_shape(format!(
                "static member '{}' must not have an instance",
                member.name
            ))),
            None if !member.is_static => Err(ExprError::null_argument("instance")),
            Some(instance) if !is_valid_instance_type(self.catalog, member.declaring_type, instance.static_type()) => {
                Err(ExprError::type_mismatch(format!(
                    "member '{}' is not defined for type '{}'",
                    member.name,
                    self.type_name(instance.static_type())
                )))
            }
            _ => Ok(()),
        }
    }

    /// Find `name` among public members of `kind`, then non-public ones.
    pub(super) fn named_member(&self, ty: TypeHash, name: &str, kind: MemberKinds, is_static: bool) -> Result<MemberRef> {
        if let Some(member) = self.member_tier(ty, name, kind, is_static, true)? {
            return Ok(member);
        }
        if self.options.include_non_public
            && let Some(member) = self.member_tier(ty, name, kind, is_static, false)?
        {
            return Ok(member);
        }
        let what = match (kind == MemberKinds::FIELD, is_static) {
            (true, false) => "is an instance field",
            (true, true) => "is a static field",
            (false, false) => "is an instance property",
            (false, true) => "is a static property",
        };
        Err(self.member_not_found(ty, name, what))
    }

    fn member_tier(
        &self,
        ty: TypeHash,
        name: &str,
        kind: MemberKinds,
        is_static: bool,
        public: bool,
    ) -> Result<Option<MemberRef>> {
        let mut found = self
            .catalog
            .members_named(ty, name, kind, true, self.options.name_matching)
            .into_iter()
            .filter(|m| m.is_static == is_static && m.is_public() == public);
        let first = found.next();
        if first.is_some() && found.next().is_some() {
            return Err(ExprError::AmbiguousMatch {
                member: name.to_string(),
                type_name: self.type_name(ty),
            });
        }
        Ok(first)
    }

    pub(super) fn member_not_found(&self, ty: TypeHash, name: &str, detail: &str) -> ExprError {
        ExprError::MemberNotFound {
            member: name.to_string(),
            type_name: self.type_name(ty),
            detail: detail.to_string(),
        }
    }
}
