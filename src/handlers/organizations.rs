use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::Organization;
use crate::state::AppState;

use super::users::Links;

pub const ORGANIZATIONS_PATH: &str = "/chronograf/v1/organizations";

#[derive(Serialize)]
pub struct OrganizationResponse {
    links: Links,
    id: String,
    name: String,
}

impl OrganizationResponse {
    fn from_organization(org: &Organization) -> Self {
        Self {
            links: Links {
                self_link: format!("{ORGANIZATIONS_PATH}/{}", org.id),
            },
            id: org.id.clone(),
            name: org.name.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct OrganizationsResponse {
    links: Links,
    organizations: Vec<OrganizationResponse>,
}

pub async fn list_organizations(
    State(state): State<AppState>,
) -> Result<Json<OrganizationsResponse>> {
    let organizations = state.organizations.all_organizations()?;
    Ok(Json(OrganizationsResponse {
        links: Links {
            self_link: ORGANIZATIONS_PATH.into(),
        },
        organizations: organizations
            .iter()
            .map(OrganizationResponse::from_organization)
            .collect(),
    }))
}

pub async fn get_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrganizationResponse>> {
    let org = state
        .organizations
        .organization_by_id(&id)?
        .ok_or_else(|| AppError::NotFound("Organization not found".into()))?;
    Ok(Json(OrganizationResponse::from_organization(&org)))
}
