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
            get(handlers::list_bookings).post(handlers::create_booking),
        )
        .route("/user/:user_id", get(handlers::get_user_bookings))
        .route(
            "/:id",
            get(handlers::get_booking)
                .put(handlers::update_booking)
                .delete(handlers::delete_booking),
        )
}
