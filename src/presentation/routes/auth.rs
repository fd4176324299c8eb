use axum::{Router, routing::post};

use crate::presentation::AppState;
use crate::presentation::handlers::auth::login;
use crate::presentation::handlers::users::register;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/users", post(register))
}
