use axum::Router;
use axum::middleware;
use axum::routing::post;

use crate::presentation::AppState;
use crate::presentation::handlers::votes::vote;
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/vote", post(vote))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
