use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) is_published: bool,
    pub(crate) owner_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) is_published: bool,
}

/// Case-sensitive substring filters; empty string matches everything.
#[derive(Debug, Clone, Default)]
pub(crate) struct PostFilter {
    pub(crate) title: String,
    pub(crate) content: String,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pagination {
    pub(crate) page: u32,
    pub(crate) limit: u32,
}

impl Pagination {
    /// Row offset of the first item on this page: `limit * (page - 1)`.
    pub(crate) fn offset(self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

/// Relational access to the `posts` table. Every read goes through the
/// active predicate: `is_published AND status = 'active'`.
#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;

    /// Active post by id, or None.
    async fn find_post(&self, id: i64) -> Result<Option<Post>, DomainError>;

    /// Active posts matching the filter, ordered by id ascending, sliced by
    /// `limit` and `offset = limit * (page - 1)`.
    async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError>;

    /// Overwrites title/content/is_published and bumps updated_at. Leaves the
    /// soft-deletion status untouched. None when no non-deleted row has that
    /// id, including a row soft-deleted after the caller's existence check.
    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError>;

    /// Flips the status to deleted. The row stays queryable by id internally
    /// but falls out of the active predicate.
    async fn soft_delete_post(&self, id: i64) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn offset_skips_full_pages() {
        assert_eq!(Pagination { page: 1, limit: 10 }.offset(), 0);
        // limit 2, page 2 starts at the third item
        assert_eq!(Pagination { page: 2, limit: 2 }.offset(), 2);
        assert_eq!(Pagination { page: 5, limit: 20 }.offset(), 80);
    }

    #[test]
    fn offset_saturates_at_page_zero() {
        assert_eq!(Pagination { page: 0, limit: 10 }.offset(), 0);
    }
}
