use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::post_service::PostService;
use crate::application::vote_service::VoteService;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::data::repositories::postgres::vote_repository::PostgresVoteRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<PostgresUserRepository>>,
    pub(crate) post_service: Arc<PostService<PostgresPostRepository, PostgresVoteRepository>>,
    pub(crate) vote_service: Arc<VoteService<PostgresPostRepository, PostgresVoteRepository>>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<AuthService<PostgresUserRepository>>,
        post_service: Arc<PostService<PostgresPostRepository, PostgresVoteRepository>>,
        vote_service: Arc<VoteService<PostgresPostRepository, PostgresVoteRepository>>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            auth_service,
            post_service,
            vote_service,
            jwt,
        }
    }
}
