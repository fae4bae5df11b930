use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Privilege levels a user can hold within one organization.
///
/// The derived `Ord` is the privilege order used for sufficiency checks:
/// `admin > editor > viewer > member`. `Member` is not an elevated privilege,
/// it only marks organization affiliation, which is why it sits at the bottom
/// and why every role satisfies a `Member` requirement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoleName {
    Member,
    Viewer,
    Editor,
    Admin,
}

impl RoleName {
    /// Whether a holder of this role may perform an operation gated on
    /// `required`.
    pub fn satisfies(self, required: RoleName) -> bool {
        self >= required
    }
}

/// A role as stored and as it appears on the wire: a privilege level scoped
/// to a single organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: RoleName,
    pub organization: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_outranks_editor_outranks_viewer() {
        assert!(RoleName::Admin.satisfies(RoleName::Editor));
        assert!(RoleName::Editor.satisfies(RoleName::Viewer));
        assert!(!RoleName::Editor.satisfies(RoleName::Admin));
        assert!(!RoleName::Viewer.satisfies(RoleName::Editor));
    }

    #[test]
    fn member_only_confirms_affiliation() {
        // Every role satisfies a member requirement, but member satisfies
        // nothing above itself.
        for role in [
            RoleName::Member,
            RoleName::Viewer,
            RoleName::Editor,
            RoleName::Admin,
        ] {
            assert!(role.satisfies(RoleName::Member));
        }
        assert!(!RoleName::Member.satisfies(RoleName::Viewer));
        assert!(!RoleName::Member.satisfies(RoleName::Editor));
        assert!(!RoleName::Member.satisfies(RoleName::Admin));
    }

    #[test]
    fn role_names_round_trip_as_lowercase_strings() {
        use std::str::FromStr;
        assert_eq!(RoleName::Admin.as_ref(), "admin");
        assert_eq!(RoleName::from_str("viewer").unwrap(), RoleName::Viewer);
        assert!(RoleName::from_str("owner").is_err());
    }
}
