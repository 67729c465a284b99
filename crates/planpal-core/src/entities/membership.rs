//! Membership role - a user's relation to the group owning an event
//!
//! Read-only to this core; membership state is owned by the group service.

use serde::{Deserialize, Serialize};

/// Role of a user within the group that owns an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Owner,
    Admin,
    Member,
}

impl MembershipRole {
    /// Any role grants channel read/write access
    #[inline]
    pub fn can_chat(self) -> bool {
        true
    }

    /// Owners and admins may manage group-level settings (not used by the
    /// chat pipeline itself, which is sender-scoped for edit/delete)
    #[inline]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl std::str::FromStr for MembershipRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Admin => write!(f, "admin"),
            Self::Member => write!(f, "member"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_classification() {
        assert!(MembershipRole::Owner.is_admin());
        assert!(MembershipRole::Admin.is_admin());
        assert!(!MembershipRole::Member.is_admin());
        assert!(MembershipRole::Member.can_chat());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("owner".parse::<MembershipRole>(), Ok(MembershipRole::Owner));
        assert!("guest".parse::<MembershipRole>().is_err());
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&MembershipRole::Owner).unwrap();
        assert_eq!(json, "\"owner\"");
        let role: MembershipRole = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(role, MembershipRole::Member);
    }
}
