use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Role, RoleName};

/// A stored user identity, keyed by the `(name, provider)` pair the auth
/// provider vouched for.
///
/// Roles are kept as a map from organization id to role name, so a user can
/// structurally hold at most one role per organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub provider: String,
    pub scheme: String,
    pub super_admin: bool,
    pub roles: BTreeMap<String, RoleName>,
    pub created_at: i64,
}

impl User {
    /// The role this user holds in `organization`, if any. Deterministic by
    /// construction since `roles` is keyed by organization.
    pub fn role_in(&self, organization: &str) -> Option<RoleName> {
        self.roles.get(organization).copied()
    }

    /// Roles in wire order: `[{name, organization}, ...]`.
    pub fn roles_list(&self) -> Vec<Role> {
        self.roles
            .iter()
            .map(|(organization, name)| Role {
                name: *name,
                organization: organization.clone(),
            })
            .collect()
    }
}

/// Input for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub provider: String,
    pub scheme: String,
    #[serde(default)]
    pub super_admin: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl NewUser {
    /// Fold the role list into the per-organization map, rejecting inputs
    /// that assign two roles within the same organization.
    pub fn roles_by_organization(&self) -> Result<BTreeMap<String, RoleName>, DuplicateRole> {
        let mut map = BTreeMap::new();
        for role in &self.roles {
            if map.insert(role.organization.clone(), role.name).is_some() {
                return Err(DuplicateRole {
                    organization: role.organization.clone(),
                });
            }
        }
        Ok(map)
    }
}

/// A user was given more than one role in a single organization.
#[derive(Debug, Clone, thiserror::Error)]
#[error("user holds more than one role in organization {organization}")]
pub struct DuplicateRole {
    pub organization: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(roles: Vec<Role>) -> NewUser {
        NewUser {
            name: "billibob".into(),
            provider: "github".into(),
            scheme: "oauth2".into(),
            super_admin: false,
            roles,
        }
    }

    #[test]
    fn duplicate_organization_roles_are_rejected() {
        let input = new_user(vec![
            Role {
                name: RoleName::Admin,
                organization: "0".into(),
            },
            Role {
                name: RoleName::Viewer,
                organization: "0".into(),
            },
        ]);
        let err = input.roles_by_organization().unwrap_err();
        assert_eq!(err.organization, "0");
    }

    #[test]
    fn role_lookup_is_per_organization() {
        let input = new_user(vec![
            Role {
                name: RoleName::Admin,
                organization: "0".into(),
            },
            Role {
                name: RoleName::Viewer,
                organization: "1".into(),
            },
        ]);
        let user = User {
            id: 1,
            name: input.name.clone(),
            provider: input.provider.clone(),
            scheme: input.scheme.clone(),
            super_admin: false,
            roles: input.roles_by_organization().unwrap(),
            created_at: 0,
        };
        assert_eq!(user.role_in("0"), Some(RoleName::Admin));
        assert_eq!(user.role_in("1"), Some(RoleName::Viewer));
        assert_eq!(user.role_in("2"), None);
    }
}
