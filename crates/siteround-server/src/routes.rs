//! Route table.

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{groups, inspections, users};
use crate::state::AppState;

async fn health() -> &'static str {
    "ok"
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Accounts and directory
        .route("/users/signup", post(users::signup))
        .route("/users/login", post(users::login))
        .route("/users/logout", post(users::logout))
        .route(
            "/users/me",
            get(users::me).put(users::update_me).delete(users::delete_me),
        )
        .route("/users", get(users::list))
        .route("/users/search", get(users::search))
        .route("/users/:id", get(users::get))
        // Groups and membership
        .route("/groups", post(groups::create).get(groups::list))
        .route(
            "/groups/:identifier",
            get(groups::get).put(groups::rename).delete(groups::delete),
        )
        .route("/groups/:identifier/join", post(groups::join))
        .route("/groups/:identifier/leave", post(groups::leave))
        // The :identifier segment is a plain group id here; Path extracts
        // the pair positionally.
        .route(
            "/groups/:identifier/requests/:user_id/approve",
            post(groups::approve),
        )
        .route(
            "/groups/:identifier/requests/:user_id/reject",
            post(groups::reject),
        )
        // Inspections
        .route("/inspections", post(inspections::create))
        .route(
            "/inspections/group/:group_identifier",
            get(inspections::list_for_group),
        )
        .route(
            "/inspections/:id",
            get(inspections::get)
                .put(inspections::update)
                .delete(inspections::delete),
        )
        .route("/inspections/:id/assign", post(inspections::assign))
        .route("/inspections/:id/attend", post(inspections::attend))
        .route(
            "/inspections/:id/ratings",
            post(inspections::rate).get(inspections::list_ratings),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
