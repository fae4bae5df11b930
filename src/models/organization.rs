use serde::{Deserialize, Serialize};

/// The id of the organization every deployment starts with.
pub const DEFAULT_ORGANIZATION_ID: &str = "0";

/// A tenancy boundary. Roles reference organizations by id; organizations
/// exist independently of any user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// Input for creating an organization.
#[derive(Debug, Deserialize)]
pub struct NewOrganization {
    pub name: String,
}
