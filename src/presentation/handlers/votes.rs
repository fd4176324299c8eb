use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::vote_service::VoteOutcome;
use crate::domain::vote::VoteDirection;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct VoteDto {
    #[validate(range(min = 1))]
    pub(crate) post_id: i64,
    pub(crate) dir: i16,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct VoteResponseDto {
    pub(crate) message: String,
}

#[utoipa::path(
    post,
    path = "/vote",
    tag = "votes",
    security(
        ("bearer_auth" = [])
    ),
    request_body = VoteDto,
    responses(
        (status = 201, description = "Vote added", body = VoteResponseDto),
        (status = 200, description = "Vote removed", body = VoteResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post or vote not found"),
        (status = 409, description = "Already voted"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn vote(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<VoteDto>,
) -> AppResult<(StatusCode, Json<VoteResponseDto>)> {
    dto.validate()?;
    let direction = VoteDirection::from_dir(dto.dir)?;

    let outcome = state
        .vote_service
        .vote(auth.user_id, dto.post_id, direction)
        .await?;

    let (status, message) = match outcome {
        VoteOutcome::Added => (StatusCode::CREATED, "Vote added successfully"),
        VoteOutcome::Removed => (StatusCode::OK, "Vote removed successfully"),
    };

    Ok((
        status,
        Json(VoteResponseDto {
            message: message.to_string(),
        }),
    ))
}
