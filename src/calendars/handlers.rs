use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, instrument, warn};

use crate::calendars::dto::{
    parse_calendar_id, CalendarResponse, CreateCalendarRequest, ListCalendarsQuery,
    UpdateCalendarRequest,
};
use crate::calendars::repo;
use crate::error::{is_foreign_key_violation, ApiError, ApiJson};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn list_calendars(
    State(state): State<AppState>,
    Query(query): Query<ListCalendarsQuery>,
) -> Result<Json<Vec<CalendarResponse>>, ApiError> {
    let user_id = match query.user_id.as_deref() {
        Some(raw) => Some(
            raw.parse::<i32>()
                .map_err(|_| ApiError::BadRequest("Invalid user ID format".into()))?,
        ),
        None => None,
    };
    let calendars = repo::list(&state.db, user_id).await?;
    Ok(Json(calendars.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let id = parse_calendar_id(&id)?;
    let calendar = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Calendar not found".into()))?;
    Ok(Json(calendar.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_calendar(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCalendarRequest>,
) -> Result<(StatusCode, Json<CalendarResponse>), ApiError> {
    let new_calendar = payload.validate()?;
    let calendar = repo::insert(&state.db, &new_calendar).await.map_err(|e| {
        if is_foreign_key_violation(&e) {
            warn!(user_id = %new_calendar.user_id, "calendar create for missing user");
            ApiError::BadRequest("User not found".into())
        } else {
            e.into()
        }
    })?;
    info!(calendar_id = %calendar.id, user_id = %calendar.user_id, "calendar connected");
    Ok((StatusCode::CREATED, Json(calendar.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateCalendarRequest>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let id = parse_calendar_id(&id)?;
    let changes = payload.validate()?;

    if repo::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Calendar not found".into()));
    }

    let calendar = repo::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Calendar not found".into()))?;

    info!(calendar_id = %id, "calendar updated");
    Ok(Json(calendar.into()))
}

#[instrument(skip(state))]
pub async fn delete_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_calendar_id(&id)?;

    if repo::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Calendar not found".into()));
    }

    repo::delete(&state.db, id).await?;
    info!(calendar_id = %id, "calendar disconnected");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_calendar_rejects_non_uuid_id() {
        let state = AppState::fake();
        let err = get_calendar(State(state), Path("123".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Invalid calendar ID format"));
    }

    #[tokio::test]
    async fn list_calendars_rejects_non_integer_filter() {
        let state = AppState::fake();
        let query = ListCalendarsQuery {
            user_id: Some("abc".into()),
        };
        let err = list_calendars(State(state), Query(query)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Invalid user ID format"));
    }

    #[tokio::test]
    async fn create_calendar_rejects_invalid_payload_before_touching_storage() {
        let state = AppState::fake();
        let payload = CreateCalendarRequest {
            user_id: Some(1),
            provider: Some("ICLOUD".into()),
            email: Some("cal@example.com".into()),
            access_token: None,
            refresh_token: None,
            token_expiry: None,
            timezone: None,
        };
        let err = create_calendar(State(state), ApiJson(payload)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn update_calendar_rejects_empty_body_before_touching_storage() {
        let state = AppState::fake();
        let payload = UpdateCalendarRequest {
            provider: None,
            email: None,
            access_token: None,
            refresh_token: None,
            token_expiry: None,
            timezone: None,
        };
        let err = update_calendar(
            State(state),
            Path("00000000-0000-0000-0000-000000000000".into()),
            ApiJson(payload),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    // The tests below run against the database named in DATABASE_URL and
    // skip themselves when it is unset.

    fn create_req_for(user_id: i32) -> CreateCalendarRequest {
        CreateCalendarRequest {
            user_id: Some(user_id),
            provider: Some("GOOGLE".into()),
            email: Some("cal@example.com".into()),
            access_token: None,
            refresh_token: None,
            token_expiry: None,
            timezone: Some("Europe/Berlin".into()),
        }
    }

    #[tokio::test]
    async fn delete_calendar_twice_returns_no_content_then_not_found() {
        let Some(state) = AppState::connect_for_tests().await else {
            return;
        };
        let email = format!("cal-{}@example.com", uuid::Uuid::new_v4());
        let user = crate::users::repo::insert(&state.db, &email, "not-a-real-hash", None)
            .await
            .expect("seed user");

        let (status, Json(created)) =
            create_calendar(State(state.clone()), ApiJson(create_req_for(user.id)))
                .await
                .expect("create");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.user_id, user.id);

        let first = delete_calendar(State(state.clone()), Path(created.id.to_string()))
            .await
            .expect("first delete");
        assert_eq!(first, StatusCode::NO_CONTENT);

        let err = delete_calendar(State(state), Path(created.id.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Calendar not found"));
    }

    #[tokio::test]
    async fn update_missing_calendar_returns_not_found() {
        let Some(state) = AppState::connect_for_tests().await else {
            return;
        };
        let payload = UpdateCalendarRequest {
            provider: None,
            email: None,
            access_token: None,
            refresh_token: None,
            token_expiry: None,
            timezone: Some("UTC".into()),
        };
        let err = update_calendar(
            State(state),
            Path("00000000-0000-0000-0000-000000000000".into()),
            ApiJson(payload),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_calendar_for_missing_user_is_rejected() {
        let Some(state) = AppState::connect_for_tests().await else {
            return;
        };
        let err = create_calendar(State(state), ApiJson(create_req_for(2_000_000_000)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "User not found"));
    }
}
