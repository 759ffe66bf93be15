use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, instrument};

use crate::error::{ApiError, ApiJson};
use crate::services::dto::{CreateServiceRequest, UpdateServiceRequest};
use crate::services::repo::{self, Service};
use crate::state::AppState;
use crate::validation::parse_id;

#[instrument(skip(state))]
pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<Service>>, ApiError> {
    let services = repo::list(&state.db).await?;
    Ok(Json(services))
}

#[instrument(skip(state))]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Service>, ApiError> {
    let id = parse_id(&id, "service")?;
    let service = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;
    Ok(Json(service))
}

#[instrument(skip(state, payload))]
pub async fn create_service(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    let new_service = payload.validate()?;
    let service = repo::insert(&state.db, &new_service).await?;
    info!(service_id = %service.id, name = %service.name, "service created");
    Ok((StatusCode::CREATED, Json(service)))
}

#[instrument(skip(state, payload))]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateServiceRequest>,
) -> Result<Json<Service>, ApiError> {
    let id = parse_id(&id, "service")?;
    let changes = payload.validate()?;

    if repo::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Service not found".into()));
    }

    let service = repo::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;

    info!(service_id = %service.id, "service updated");
    Ok(Json(service))
}

#[instrument(skip(state))]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "service")?;

    if repo::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Service not found".into()));
    }

    repo::delete(&state.db, id).await?;
    info!(service_id = %id, "service deleted");
    Ok(StatusCode::NO_CONTENT)
}
