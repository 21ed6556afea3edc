pub mod assets;
pub mod auth;
pub mod home;
pub mod posts;
pub mod topics;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full forum router with state applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/assets/{*path}", get(assets::serve))
        .merge(auth::router())
        .merge(topics::router())
        .merge(posts::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
