use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::post_service::PostWithVotes;
use crate::data::post_repository::{Pagination, PostFilter};
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

fn default_is_published() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    #[serde(default = "default_is_published")]
    pub(crate) is_published: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    #[serde(default = "default_is_published")]
    pub(crate) is_published: bool,
}

/// Query parameters for the list endpoint. Out-of-range values are rejected
/// instead of inheriting whatever the database would do with them.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct ListPostsQuery {
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    #[validate(range(min = 1))]
    pub(crate) page: Option<u32>,
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) owner_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostWithVotesDto {
    #[serde(flatten)]
    pub(crate) post: PostDto,
    pub(crate) votes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostResponseDto {
    pub(crate) message: String,
    pub(crate) data: PostDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostVoteResponseDto {
    pub(crate) message: String,
    pub(crate) data: PostWithVotesDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostListResponseDto {
    pub(crate) message: String,
    pub(crate) data: Vec<PostWithVotesDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DeletePostResponseDto {
    pub(crate) message: String,
    pub(crate) data: Option<PostDto>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            is_published: post.is_published,
            created_at: post.created_at,
            updated_at: post.updated_at,
            owner_id: post.owner_id,
        }
    }
}

impl From<PostWithVotes> for PostWithVotesDto {
    fn from(item: PostWithVotes) -> Self {
        Self {
            post: item.post.into(),
            votes: item.votes,
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100, default 10)"),
        ("page" = Option<u32>, Query, description = "Page number (>= 1, default 1)"),
        ("title" = Option<String>, Query, description = "Title substring filter"),
        ("content" = Option<String>, Query, description = "Content substring filter")
    ),
    responses(
        (status = 200, description = "Posts fetched", body = PostListResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<(StatusCode, Json<PostListResponseDto>)> {
    query.validate()?;

    let filter = PostFilter {
        title: query.title.unwrap_or_default(),
        content: query.content.unwrap_or_default(),
    };
    let pagination = Pagination {
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(10),
    };

    let posts = state.post_service.list_posts(filter, pagination).await?;

    Ok((
        StatusCode::OK,
        Json(PostListResponseDto {
            message: "Posts fetched successfully".to_string(),
            data: posts.into_iter().map(PostWithVotesDto::from).collect(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post fetched", body = PostVoteResponseDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<PostVoteResponseDto>)> {
    let result = state.post_service.get_post(id).await?;

    Ok((
        StatusCode::OK,
        Json(PostVoteResponseDto {
            message: "Post fetched successfully".to_string(),
            data: result.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostResponseDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        content: dto.content,
        is_published: dto.is_published,
    };

    let result = state.post_service.create_post(auth.user_id, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(PostResponseDto {
            message: "Post created successfully".to_string(),
            data: result.into(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<(StatusCode, Json<PostResponseDto>)> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        content: dto.content,
        is_published: dto.is_published,
    };

    let result = state
        .post_service
        .update_post(auth.user_id, id, req)
        .await?;

    Ok((
        StatusCode::OK,
        Json(PostResponseDto {
            message: "Post updated successfully".to_string(),
            data: result.into(),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted", body = DeletePostResponseDto),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<DeletePostResponseDto>)> {
    state.post_service.delete_post(auth.user_id, id).await?;
    info!(post_id = id, deleted_by = %auth.user_email, "post soft-deleted");

    Ok((
        StatusCode::OK,
        Json(DeletePostResponseDto {
            message: "Post deleted successfully".to_string(),
            data: None,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::ListPostsQuery;

    fn query(limit: Option<u32>, page: Option<u32>) -> ListPostsQuery {
        ListPostsQuery {
            limit,
            page,
            title: None,
            content: None,
        }
    }

    #[test]
    fn list_query_rejects_out_of_range_limit() {
        assert!(query(Some(0), None).validate().is_err());
        assert!(query(Some(101), None).validate().is_err());
        assert!(query(Some(1), None).validate().is_ok());
        assert!(query(Some(100), None).validate().is_ok());
    }

    #[test]
    fn list_query_rejects_non_positive_page() {
        assert!(query(None, Some(0)).validate().is_err());
        assert!(query(None, Some(1)).validate().is_ok());
    }

    #[test]
    fn list_query_defaults_pass_validation() {
        assert!(query(None, None).validate().is_ok());
    }
}
