use std::sync::Arc;

use crate::authz::Authorizer;
use crate::session::SessionCodec;
use crate::store::{OrganizationsStore, UsersStore};

/// Shared, immutable handles every request sees: the store contracts, the
/// session codec, and the authorizer built on top of them. Constructed once
/// at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UsersStore>,
    pub organizations: Arc<dyn OrganizationsStore>,
    pub sessions: Arc<SessionCodec>,
    pub authorizer: Authorizer,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, sessions: SessionCodec) -> Self
    where
        S: UsersStore + OrganizationsStore + 'static,
    {
        let users: Arc<dyn UsersStore> = store.clone();
        let organizations: Arc<dyn OrganizationsStore> = store;
        Self {
            authorizer: Authorizer::new(users.clone()),
            users,
            organizations,
            sessions: Arc::new(sessions),
        }
    }
}
