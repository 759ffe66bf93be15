use axum::extract::{FromRef, Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, instrument, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::JwtKeys;
use crate::error::{is_unique_violation, ApiError, ApiJson};
use crate::state::AppState;
use crate::users::dto::{CreateUserRequest, LoginRequest, LoginResponse, UpdateUserRequest};
use crate::users::repo::{self, SafeUser};
use crate::validation::parse_id;

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<SafeUser>>, ApiError> {
    let users = repo::list(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SafeUser>, ApiError> {
    let id = parse_id(&id, "user")?;
    let user = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<SafeUser>), ApiError> {
    let new_user = payload.validate()?;

    if repo::find_by_email(&state.db, &new_user.email)
        .await?
        .is_some()
    {
        warn!(email = %new_user.email, "email already registered");
        return Err(ApiError::Conflict(
            "User already exists with this email".into(),
        ));
    }

    let hash = hash_password(&new_user.password)?;
    let user = repo::insert(&state.db, &new_user.email, &hash, new_user.name.as_deref())
        .await
        .map_err(|e| {
            // The pre-check races with concurrent creates; the unique index
            // is the authority.
            if is_unique_violation(&e) {
                ApiError::Conflict("User already exists with this email".into())
            } else {
                e.into()
            }
        })?;

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Result<Json<SafeUser>, ApiError> {
    let id = parse_id(&id, "user")?;
    let changes = payload.validate()?;

    if repo::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }

    let user = repo::update(
        &state.db,
        id,
        changes.email.as_deref(),
        changes.name.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id = %user.id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "user")?;

    if repo::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }

    repo::delete(&state.db, id).await?;
    info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (email, password) = payload.validate()?;

    // Unknown email and wrong password share one message so login failures
    // reveal nothing about which accounts exist.
    let user = repo::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "login unknown email");
            ApiError::Unauthorized("Invalid credentials".into())
        })?;

    if !verify_password(&password, &user.password)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: SafeUser {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        },
    }))
}
