//! Accessibility of types and members.

use std::fmt;

/// Accessibility of a type or member.
///
/// Overload resolution only asks whether a member is public. The two
/// non-public grades differ in inheritance: an `Internal` base member is
/// inherited by derived types, a `Private` one is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Private,
}

impl Visibility {
    pub const fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }

    /// Whether a base-type member with this accessibility reaches derived types.
    pub const fn is_inherited(self) -> bool {
        !matches!(self, Visibility::Private)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
            Visibility::Private => "private",
        })
    }
}
