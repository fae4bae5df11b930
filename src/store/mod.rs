//! Store contracts the pipeline depends on, plus the SQLite-backed
//! implementation. The authorization core only ever sees the traits; the
//! durable engine behind them is an external concern.

mod sqlite;

pub use sqlite::SqliteStore;

use thiserror::Error;

use crate::models::{DuplicateRole, NewOrganization, NewUser, Organization, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error(transparent)]
    DuplicateRole(#[from] DuplicateRole),
    #[error("unknown role name in store: {0}")]
    InvalidRole(String),
}

/// The single read the authorization pipeline requires, plus the management
/// operations the admin surface is built from.
///
/// A read of one user, roles included, must be consistent: a concurrent role
/// mutation can never expose a partially updated role set.
pub trait UsersStore: Send + Sync {
    /// Look up the user the auth provider vouched for. `subject` matches the
    /// stored name, `issuer` the stored provider.
    fn user_by_subject_issuer(
        &self,
        subject: &str,
        issuer: &str,
    ) -> Result<Option<User>, StoreError>;

    fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    fn all_users(&self) -> Result<Vec<User>, StoreError>;

    fn add_user(&self, input: &NewUser) -> Result<User, StoreError>;
}

pub trait OrganizationsStore: Send + Sync {
    fn organization_by_id(&self, id: &str) -> Result<Option<Organization>, StoreError>;

    fn all_organizations(&self) -> Result<Vec<Organization>, StoreError>;

    fn add_organization(&self, input: &NewOrganization) -> Result<Organization, StoreError>;
}
