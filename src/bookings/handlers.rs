use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, instrument};

use crate::bookings::dto::{BookingResponse, CreateBookingRequest, UpdateBookingRequest};
use crate::bookings::repo::{self, Booking};
use crate::error::{ApiError, ApiJson};
use crate::state::AppState;
use crate::validation::parse_id;

#[instrument(skip(state))]
pub async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = repo::list(&state.db).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    let id = parse_id(&id, "booking")?;
    let booking = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".into()))?;
    Ok(Json(booking.into()))
}

/// All bookings belonging to one user, soonest first. An unknown user
/// yields an empty list, not a 404.
#[instrument(skip(state))]
pub async fn get_user_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let user_id = parse_id(&user_id, "user")?;
    let bookings = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(bookings))
}

#[instrument(skip(state, payload))]
pub async fn create_booking(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let new_booking = payload.validate()?;
    let booking = repo::insert(&state.db, &new_booking).await?;
    info!(booking_id = %booking.id, user_id = %booking.user_id, "booking created");
    Ok((StatusCode::CREATED, Json(booking.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let id = parse_id(&id, "booking")?;
    let changes = payload.validate()?;

    let existing = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".into()))?;

    // A partial update may move only one end of the interval; check the
    // interval that would result.
    let start = changes.start_time.unwrap_or(existing.start_time);
    let end = changes.end_time.unwrap_or(existing.end_time);
    if end <= start {
        return Err(ApiError::BadRequest(
            "endTime must be after startTime".into(),
        ));
    }

    let booking = repo::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".into()))?;

    info!(booking_id = %id, "booking updated");
    Ok(Json(booking.into()))
}

#[instrument(skip(state))]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "booking")?;

    if repo::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Booking not found".into()));
    }

    repo::delete(&state.db, id).await?;
    info!(booking_id = %id, "booking deleted");
    Ok(StatusCode::NO_CONTENT)
}
