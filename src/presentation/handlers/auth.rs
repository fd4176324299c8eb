use axum::{Form, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::LoginRequest;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;

/// Form-encoded login body. Following the OAuth2 password-grant convention,
/// the `username` field carries the email address.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginFormDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) username: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct TokenResponseDto {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = LoginFormDto, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = TokenResponseDto),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Form(dto): Form<LoginFormDto>,
) -> AppResult<(StatusCode, Json<TokenResponseDto>)> {
    dto.validate()?;

    let req = LoginRequest {
        email: dto.username,
        password: dto.password,
    };

    let result = state.auth_service.login(req).await?;

    Ok((
        StatusCode::OK,
        Json(TokenResponseDto {
            access_token: result.access_token,
            token_type: result.token_type.to_string(),
        }),
    ))
}
