use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::error::DomainError;

#[async_trait]
pub(crate) trait VoteRepository: Send + Sync {
    /// Vote counts for the given posts. Ids absent from the returned map have
    /// zero votes; callers default missing entries to 0.
    async fn count_votes_by_post(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, DomainError>;

    async fn has_vote(&self, post_id: i64, user_id: i64) -> Result<bool, DomainError>;
    async fn add_vote(&self, post_id: i64, user_id: i64) -> Result<(), DomainError>;
    async fn remove_vote(&self, post_id: i64, user_id: i64) -> Result<bool, DomainError>;
}
