use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::auth::{LoginFormDto, TokenResponseDto};
use crate::presentation::handlers::posts::{
    CreatePostDto, DeletePostResponseDto, ListPostsQuery, PostDto, PostListResponseDto,
    PostResponseDto, PostVoteResponseDto, PostWithVotesDto, UpdatePostDto,
};
use crate::presentation::handlers::users::{RegisterDto, UserDto, UserResponseDto};
use crate::presentation::handlers::votes::{VoteDto, VoteResponseDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::users::register,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::votes::vote
    ),
    components(
        schemas(
            LoginFormDto,
            TokenResponseDto,
            RegisterDto,
            UserDto,
            UserResponseDto,
            CreatePostDto,
            UpdatePostDto,
            ListPostsQuery,
            PostDto,
            PostWithVotesDto,
            PostResponseDto,
            PostVoteResponseDto,
            PostListResponseDto,
            DeletePostResponseDto,
            VoteDto,
            VoteResponseDto
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User registration"),
        (name = "posts", description = "Post endpoints"),
        (name = "votes", description = "Vote endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
