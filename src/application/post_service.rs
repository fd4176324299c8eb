use crate::data::post_repository::{NewPost, Pagination, PostFilter, PostPatch, PostRepository};
use crate::data::vote_repository::VoteRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

/// A post together with its aggregated vote count.
#[derive(Debug, Clone)]
pub(crate) struct PostWithVotes {
    pub(crate) post: Post,
    pub(crate) votes: i64,
}

pub(crate) struct PostService<R: PostRepository, V: VoteRepository> {
    posts: R,
    votes: V,
}

impl<R: PostRepository, V: VoteRepository> PostService<R, V> {
    pub(crate) fn new(posts: R, votes: V) -> Self {
        Self { posts, votes }
    }

    pub(crate) async fn create_post(
        &self,
        owner_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            content: req.content,
            is_published: req.is_published,
            owner_id,
        };
        self.posts.create_post(new_post).await
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<PostWithVotes, DomainError> {
        let post = self
            .posts
            .find_post(id)
            .await?
            .ok_or_else(post_not_found)?;

        let counts = self.votes.count_votes_by_post(&[id]).await?;
        let votes = counts.get(&id).copied().unwrap_or(0);

        Ok(PostWithVotes { post, votes })
    }

    pub(crate) async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<PostWithVotes>, DomainError> {
        let posts = self.posts.list_posts(filter, pagination).await?;

        let ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
        let counts = self.votes.count_votes_by_post(&ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let votes = counts.get(&post.id).copied().unwrap_or(0);
                PostWithVotes { post, votes }
            })
            .collect())
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let original = self
            .posts
            .find_post(post_id)
            .await?
            .ok_or_else(post_not_found)?;
        authorize_owner(&original, actor_user_id)?;

        let patch = PostPatch {
            title: req.title,
            content: req.content,
            is_published: req.is_published,
        };
        self.posts
            .update_post(post_id, patch)
            .await?
            .ok_or_else(post_not_found)
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        // One fetch serves both the existence and the ownership check.
        let original = self
            .posts
            .find_post(post_id)
            .await?
            .ok_or_else(post_not_found)?;
        authorize_owner(&original, actor_user_id)?;

        let deleted = self.posts.soft_delete_post(post_id).await?;
        if !deleted {
            return Err(post_not_found());
        }
        Ok(())
    }
}

/// Existence is always checked before ownership, so a non-owner asking about
/// a missing post sees NotFound rather than Forbidden.
fn authorize_owner(post: &Post, actor_user_id: i64) -> Result<(), DomainError> {
    if post.owner_id != actor_user_id {
        return Err(DomainError::Forbidden);
    }
    Ok(())
}

fn post_not_found() -> DomainError {
    DomainError::NotFound("Requested post not found".to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::{PostService, PostWithVotes};
    use crate::data::post_repository::{
        NewPost, Pagination, PostFilter, PostPatch, PostRepository,
    };
    use crate::data::vote_repository::VoteRepository;
    use crate::domain::error::DomainError;
    use crate::domain::post::{CreatePostRequest, Post, PostStatus, UpdatePostRequest};

    #[derive(Clone)]
    struct FakePostRepo {
        created_input: Arc<Mutex<Option<NewPost>>>,
        post_for_find: Arc<Mutex<Option<Post>>>,
        update_result: Arc<Mutex<Option<Post>>>,
        update_call: Arc<Mutex<Option<(i64, PostPatch)>>>,
        delete_result: Arc<Mutex<bool>>,
        delete_call: Arc<Mutex<Option<i64>>>,
        list_result: Arc<Mutex<Vec<Post>>>,
        list_call: Arc<Mutex<Option<(PostFilter, Pagination)>>>,
    }

    impl FakePostRepo {
        fn new() -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                post_for_find: Arc::new(Mutex::new(None)),
                update_result: Arc::new(Mutex::new(None)),
                update_call: Arc::new(Mutex::new(None)),
                delete_result: Arc::new(Mutex::new(true)),
                delete_call: Arc::new(Mutex::new(None)),
                list_result: Arc::new(Mutex::new(Vec::new())),
                list_call: Arc::new(Mutex::new(None)),
            }
        }

        fn set_found_post(&self, post: Option<Post>) {
            *self
                .post_for_find
                .lock()
                .expect("post_for_find mutex poisoned") = post;
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created_input mutex poisoned") = Some(input.clone());
            Ok(sample_post(
                1,
                &input.title,
                &input.content,
                input.is_published,
                input.owner_id,
            ))
        }

        async fn find_post(&self, _id: i64) -> Result<Option<Post>, DomainError> {
            Ok(self
                .post_for_find
                .lock()
                .expect("post_for_find mutex poisoned")
                .clone())
        }

        async fn list_posts(
            &self,
            filter: PostFilter,
            pagination: Pagination,
        ) -> Result<Vec<Post>, DomainError> {
            *self.list_call.lock().expect("list_call mutex poisoned") =
                Some((filter, pagination));
            Ok(self
                .list_result
                .lock()
                .expect("list_result mutex poisoned")
                .clone())
        }

        async fn update_post(
            &self,
            id: i64,
            patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            *self.update_call.lock().expect("update_call mutex poisoned") = Some((id, patch));
            Ok(self
                .update_result
                .lock()
                .expect("update_result mutex poisoned")
                .clone())
        }

        async fn soft_delete_post(&self, id: i64) -> Result<bool, DomainError> {
            *self.delete_call.lock().expect("delete_call mutex poisoned") = Some(id);
            Ok(*self
                .delete_result
                .lock()
                .expect("delete_result mutex poisoned"))
        }
    }

    #[derive(Clone)]
    struct FakeVoteRepo {
        counts: Arc<Mutex<HashMap<i64, i64>>>,
        count_call: Arc<Mutex<Option<Vec<i64>>>>,
    }

    impl FakeVoteRepo {
        fn new() -> Self {
            Self {
                counts: Arc::new(Mutex::new(HashMap::new())),
                count_call: Arc::new(Mutex::new(None)),
            }
        }

        fn set_count(&self, post_id: i64, votes: i64) {
            self.counts
                .lock()
                .expect("counts mutex poisoned")
                .insert(post_id, votes);
        }
    }

    #[async_trait]
    impl VoteRepository for FakeVoteRepo {
        async fn count_votes_by_post(
            &self,
            post_ids: &[i64],
        ) -> Result<HashMap<i64, i64>, DomainError> {
            *self.count_call.lock().expect("count_call mutex poisoned") = Some(post_ids.to_vec());
            let counts = self.counts.lock().expect("counts mutex poisoned");
            Ok(post_ids
                .iter()
                .filter_map(|id| counts.get(id).map(|votes| (*id, *votes)))
                .collect())
        }

        async fn has_vote(&self, _post_id: i64, _user_id: i64) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn add_vote(&self, _post_id: i64, _user_id: i64) -> Result<(), DomainError> {
            Ok(())
        }

        async fn remove_vote(&self, _post_id: i64, _user_id: i64) -> Result<bool, DomainError> {
            Ok(true)
        }
    }

    fn service(repo: FakePostRepo, votes: FakeVoteRepo) -> PostService<FakePostRepo, FakeVoteRepo> {
        PostService::new(repo, votes)
    }

    #[tokio::test]
    async fn create_post_passes_defaults_through_to_repo() {
        let repo = FakePostRepo::new();
        let svc = service(repo.clone(), FakeVoteRepo::new());

        let req = CreatePostRequest {
            title: "  title  ".to_string(),
            content: "  content  ".to_string(),
            is_published: true,
        };

        let created = svc
            .create_post(10, req)
            .await
            .expect("create_post must succeed");

        assert_eq!(created.title, "title");
        assert_eq!(created.owner_id, 10);
        assert!(created.is_published);
        assert_eq!(created.status, PostStatus::Active);

        let input = repo
            .created_input
            .lock()
            .expect("created_input mutex poisoned")
            .clone()
            .expect("repo input must be captured");
        assert_eq!(input.title, "title");
        assert_eq!(input.content, "content");
        assert_eq!(input.owner_id, 10);
    }

    #[tokio::test]
    async fn get_post_returns_not_found_when_missing() {
        let svc = service(FakePostRepo::new(), FakeVoteRepo::new());

        let err = svc.get_post(42).await.expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_post_defaults_vote_count_to_zero() {
        let repo = FakePostRepo::new();
        repo.set_found_post(Some(sample_post(7, "title", "body", true, 10)));

        let svc = service(repo, FakeVoteRepo::new());
        let found = svc.get_post(7).await.expect("post must be found");

        assert_eq!(found.post.id, 7);
        assert_eq!(found.votes, 0);
    }

    #[tokio::test]
    async fn list_posts_attaches_vote_counts() {
        let repo = FakePostRepo::new();
        *repo.list_result.lock().expect("list_result mutex poisoned") = vec![
            sample_post(1, "a", "b", true, 10),
            sample_post(2, "c", "d", true, 11),
        ];
        let votes = FakeVoteRepo::new();
        votes.set_count(2, 5);

        let svc = service(repo.clone(), votes);
        let result = svc
            .list_posts(
                PostFilter::default(),
                Pagination { page: 1, limit: 10 },
            )
            .await
            .expect("list_posts must succeed");

        let by_id: Vec<(i64, i64)> = result
            .iter()
            .map(|PostWithVotes { post, votes }| (post.id, *votes))
            .collect();
        assert_eq!(by_id, vec![(1, 0), (2, 5)]);

        let (_, pagination) = repo
            .list_call
            .lock()
            .expect("list_call mutex poisoned")
            .clone()
            .expect("list call must be captured");
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, 10);
    }

    #[tokio::test]
    async fn list_posts_returns_empty_for_zero_results() {
        let svc = service(FakePostRepo::new(), FakeVoteRepo::new());

        let result = svc
            .list_posts(
                PostFilter::default(),
                Pagination { page: 1, limit: 10 },
            )
            .await
            .expect("empty result must not be an error");
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn update_post_returns_not_found_before_forbidden() {
        // No post at all: even a non-owner sees NotFound.
        let svc = service(FakePostRepo::new(), FakeVoteRepo::new());

        let err = svc
            .update_post(99, 7, sample_update_request())
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_post_returns_forbidden_for_non_owner() {
        let repo = FakePostRepo::new();
        repo.set_found_post(Some(sample_post(7, "title", "body", true, 99)));

        let svc = service(repo.clone(), FakeVoteRepo::new());
        let err = svc
            .update_post(10, 7, sample_update_request())
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));

        // The repository must not have been asked to mutate anything.
        assert!(
            repo.update_call
                .lock()
                .expect("update_call mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn update_post_applies_patch_for_owner() {
        let repo = FakePostRepo::new();
        repo.set_found_post(Some(sample_post(7, "old", "body", true, 10)));
        *repo
            .update_result
            .lock()
            .expect("update_result mutex poisoned") =
            Some(sample_post(7, "new", "body2", false, 10));

        let svc = service(repo.clone(), FakeVoteRepo::new());
        let req = UpdatePostRequest {
            title: "  new  ".to_string(),
            content: "  body2  ".to_string(),
            is_published: false,
        };

        let updated = svc.update_post(10, 7, req).await.expect("update must succeed");
        assert_eq!(updated.id, 7);
        assert!(!updated.is_published);

        let (id, patch) = repo
            .update_call
            .lock()
            .expect("update_call mutex poisoned")
            .clone()
            .expect("update call must be captured");
        assert_eq!(id, 7);
        assert_eq!(patch.title, "new");
        assert_eq!(patch.content, "body2");
        assert!(!patch.is_published);
    }

    #[tokio::test]
    async fn delete_post_returns_forbidden_for_non_owner() {
        let repo = FakePostRepo::new();
        repo.set_found_post(Some(sample_post(7, "title", "body", true, 99)));

        let svc = service(repo.clone(), FakeVoteRepo::new());
        let err = svc
            .delete_post(10, 7)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
        assert!(
            repo.delete_call
                .lock()
                .expect("delete_call mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn delete_post_soft_deletes_for_owner() {
        let repo = FakePostRepo::new();
        repo.set_found_post(Some(sample_post(7, "title", "body", true, 10)));

        let svc = service(repo.clone(), FakeVoteRepo::new());
        svc.delete_post(10, 7).await.expect("delete must succeed");

        let deleted_id = repo
            .delete_call
            .lock()
            .expect("delete_call mutex poisoned")
            .expect("delete call must be captured");
        assert_eq!(deleted_id, 7);
    }

    #[tokio::test]
    async fn delete_post_returns_not_found_for_missing_post() {
        let svc = service(FakePostRepo::new(), FakeVoteRepo::new());

        let err = svc
            .delete_post(10, 7)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    fn sample_post(id: i64, title: &str, content: &str, is_published: bool, owner_id: i64) -> Post {
        Post::new(
            id,
            title.to_string(),
            content.to_string(),
            is_published,
            PostStatus::Active,
            Utc::now(),
            Utc::now(),
            owner_id,
        )
        .expect("sample post must be valid")
    }

    fn sample_update_request() -> UpdatePostRequest {
        UpdatePostRequest {
            title: "new".to_string(),
            content: "body".to_string(),
            is_published: true,
        }
    }
}
