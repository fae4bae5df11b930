//! Authorization Gate: the one place an allow/deny decision is made.
//!
//! The gate is pure over its inputs and a single store read. It never
//! mutates anything, and every deny path yields a [`DenyReason`] that the
//! error layer collapses into one uniform external response.

use std::sync::Arc;

use crate::error::DenyReason;
use crate::models::{Principal, RoleName, User};
use crate::store::{StoreError, UsersStore};

/// Outcome of one authorization check. `Allow` carries the resolved user so
/// handlers don't have to repeat the lookup.
#[derive(Debug)]
pub enum Decision {
    Allow(User),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

/// Decides whether a principal may perform an operation gated on a minimum
/// role. Holds the store handle it was constructed with and nothing else.
#[derive(Clone)]
pub struct Authorizer {
    users: Arc<dyn UsersStore>,
}

impl Authorizer {
    pub fn new(users: Arc<dyn UsersStore>) -> Self {
        Self { users }
    }

    /// The full decision chain:
    ///
    /// 1. no principal resolved upstream -> deny `Unauthenticated`
    /// 2. no user for `(subject, issuer)` -> deny `UserNotFound`
    /// 3. super-admin -> allow, regardless of role or organization
    /// 4. no role in the principal's organization -> deny `RoleNotFound`
    /// 5. role below `required` -> deny `InsufficientRole`
    /// 6. otherwise -> allow
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        required: RoleName,
    ) -> Result<Decision, StoreError> {
        let Some(principal) = principal else {
            return Ok(Decision::Deny(DenyReason::Unauthenticated));
        };

        let Some(user) = self
            .users
            .user_by_subject_issuer(&principal.subject, &principal.issuer)?
        else {
            return Ok(Decision::Deny(DenyReason::UserNotFound));
        };

        if user.super_admin {
            return Ok(Decision::Allow(user));
        }

        match user.role_in(&principal.organization) {
            None => Ok(Decision::Deny(DenyReason::RoleNotFound)),
            Some(role) if role.satisfies(required) => Ok(Decision::Allow(user)),
            Some(_) => Ok(Decision::Deny(DenyReason::InsufficientRole)),
        }
    }
}
