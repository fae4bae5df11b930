use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::authz::Decision;
use crate::error::AppError;
use crate::models::{Principal, RoleName, User};
use crate::session::SESSION_COOKIE;
use crate::state::AppState;

/// What an authorized request carries into its handler.
#[derive(Clone)]
pub struct AuthContext {
    pub principal: Principal,
    pub user: User,
}

/// Principal Resolver: pull the session cookie and verify it. Any failure
/// (no cookie, bad signature, malformed, expired) yields `None`; the cause
/// goes to the debug log and nowhere else.
fn resolve_principal(state: &AppState, headers: &HeaderMap) -> Option<Principal> {
    let jar = CookieJar::from_headers(headers);
    let token = jar.get(SESSION_COOKIE)?.value().to_owned();
    match state.sessions.verify(&token) {
        Ok(principal) => Some(principal),
        Err(err) => {
            tracing::debug!(error = %err, "session verification failed");
            None
        }
    }
}

/// Resolve the principal, run the gate, and either forward the request with
/// an [`AuthContext`] attached or deny it uniformly.
async fn authorize_request(
    state: AppState,
    mut request: Request,
    required: RoleName,
    next: Next,
) -> Result<Response, AppError> {
    let principal = resolve_principal(&state, request.headers());
    let decision = state.authorizer.authorize(principal.as_ref(), required)?;
    match (decision, principal) {
        (Decision::Allow(user), Some(principal)) => {
            request.extensions_mut().insert(AuthContext { principal, user });
            Ok(next.run(request).await)
        }
        // The gate denies unresolved principals, so an allow without one
        // cannot happen.
        (Decision::Allow(_), None) => {
            Err(AppError::Internal("allow decision without a principal".into()))
        }
        (Decision::Deny(reason), _) => Err(AppError::unauthorized(reason)),
    }
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize_request(state, request, RoleName::Admin, next).await
}

pub async fn require_member(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize_request(state, request, RoleName::Member, next).await
}
