pub mod dto;
pub mod handlers;
pub mod repo;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_calendars).post(handlers::create_calendar),
        )
        .route(
            "/:id",
            get(handlers::get_calendar)
                .put(handlers::update_calendar)
                .delete(handlers::delete_calendar),
        )
}
