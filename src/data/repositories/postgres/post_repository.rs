use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::post_repository::{NewPost, Pagination, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostStatus};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    is_published: bool,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_id: i64,
}

const POST_COLUMNS: &str =
    "id, title, content, is_published, status, created_at, updated_at, owner_id";

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let sql = format!(
            "INSERT INTO posts (title, content, is_published, owner_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.is_published)
            .bind(input.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} \
             FROM posts \
             WHERE id = $1 AND is_published AND status = 'active'"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError> {
        let limit = pagination.limit as i64;
        let offset = pagination.offset();

        // LIKE concatenation keeps the match case-sensitive; an empty filter
        // degenerates to '%%' and matches every row.
        let sql = format!(
            "SELECT {POST_COLUMNS} \
             FROM posts \
             WHERE is_published AND status = 'active' \
               AND title LIKE '%' || $1 || '%' \
               AND content LIKE '%' || $2 || '%' \
             ORDER BY id ASC \
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(&filter.title)
            .bind(&filter.content)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let sql = update_post_sql();
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.content)
            .bind(patch.is_published)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn soft_delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE posts SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(PostStatus::Deleted.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

// The status guard covers rows soft-deleted between the caller's fetch and
// this write; such an update matches nothing and maps to NotFound.
fn update_post_sql() -> String {
    format!(
        "UPDATE posts \
         SET title = $2, content = $3, is_published = $4, updated_at = now() \
         WHERE id = $1 AND status = 'active' \
         RETURNING {POST_COLUMNS}"
    )
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    let status = PostStatus::parse(&row.status)?;
    Post::new(
        row.id,
        row.title,
        row.content,
        row.is_published,
        status,
        row.created_at,
        row.updated_at,
        row.owner_id,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("Post owner not found".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
