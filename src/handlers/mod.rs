mod organizations;
pub mod users;

pub use organizations::*;
pub use users::{get_user, list_users, me};

use axum::{Router, middleware, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{require_admin, require_member};
use crate::state::AppState;

/// Build the API router. The minimum role for each protected operation is
/// wired here, statically: administrative listing/management requires
/// `admin`, `/me` only requires organization membership.
pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/chronograf/v1/users", get(list_users))
        .route("/chronograf/v1/users/{id}", get(get_user))
        .route("/chronograf/v1/organizations", get(list_organizations))
        .route("/chronograf/v1/organizations/{id}", get(get_organization))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let member_routes = Router::new()
        .route("/chronograf/v1/me", get(me))
        .layer(middleware::from_fn_with_state(state.clone(), require_member));

    admin_routes
        .merge(member_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
