use crate::data::post_repository::PostRepository;
use crate::data::vote_repository::VoteRepository;
use crate::domain::error::DomainError;
use crate::domain::vote::VoteDirection;

/// Outcome of a vote request, used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VoteOutcome {
    Added,
    Removed,
}

pub(crate) struct VoteService<R: PostRepository, V: VoteRepository> {
    posts: R,
    votes: V,
}

impl<R: PostRepository, V: VoteRepository> VoteService<R, V> {
    pub(crate) fn new(posts: R, votes: V) -> Self {
        Self { posts, votes }
    }

    pub(crate) async fn vote(
        &self,
        actor_user_id: i64,
        post_id: i64,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, DomainError> {
        match direction {
            VoteDirection::Add => {
                self.posts
                    .find_post(post_id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound("Requested post not found".to_string()))?;

                if self.votes.has_vote(post_id, actor_user_id).await? {
                    return Err(DomainError::AlreadyExists(
                        "Already voted on this post".to_string(),
                    ));
                }

                self.votes.add_vote(post_id, actor_user_id).await?;
                Ok(VoteOutcome::Added)
            }
            VoteDirection::Remove => {
                let removed = self.votes.remove_vote(post_id, actor_user_id).await?;
                if !removed {
                    return Err(DomainError::NotFound("Vote does not exist".to_string()));
                }
                Ok(VoteOutcome::Removed)
            }
        }
    }
}
