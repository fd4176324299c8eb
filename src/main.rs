use std::sync::Arc;

use anyhow::Result;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::post_service::PostService;
use application::vote_service::VoteService;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use data::repositories::postgres::vote_repository::PostgresVoteRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url).await?;
    run_migrations(&pool).await?;

    let jwt = Arc::new(JwtService::new(
        &settings.jwt_secret,
        settings.jwt_ttl_seconds,
    ));

    let user_repo = PostgresUserRepository::new(pool.clone());
    let post_repo = PostgresPostRepository::new(pool.clone());
    let vote_repo = PostgresVoteRepository::new(pool.clone());

    let auth_service = Arc::new(AuthService::new(
        user_repo,
        JwtService::new(&settings.jwt_secret, settings.jwt_ttl_seconds),
    ));
    let post_service = Arc::new(PostService::new(post_repo.clone(), vote_repo.clone()));
    let vote_service = Arc::new(VoteService::new(post_repo, vote_repo));

    let state = AppState::new(auth_service, post_service, vote_service, jwt);

    server::run_http(&settings, state).await
}
