use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::data::vote_repository::VoteRepository;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresVoteRepository {
    pool: PgPool,
}

impl PostgresVoteRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct VoteCountRow {
    post_id: i64,
    votes: i64,
}

#[async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn count_votes_by_post(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, DomainError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, VoteCountRow>(
            "SELECT post_id, COUNT(*) AS votes \
             FROM votes \
             WHERE post_id = ANY($1) \
             GROUP BY post_id",
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_vote_db_error)?;

        Ok(rows.into_iter().map(|r| (r.post_id, r.votes)).collect())
    }

    async fn has_vote(&self, post_id: i64, user_id: i64) -> Result<bool, DomainError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM votes WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_vote_db_error)?;

        Ok(exists)
    }

    async fn add_vote(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO votes (post_id, user_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_vote_db_error)?;

        Ok(())
    }

    async fn remove_vote(&self, post_id: i64, user_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM votes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_vote_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_vote_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => {
                return DomainError::AlreadyExists("Already voted on this post".to_string());
            }
            Some("23503") => {
                return DomainError::NotFound("Requested post not found".to_string());
            }
            _ => {}
        }
    }
    DomainError::Unexpected(err.to_string())
}
