//! Post submission and read service.
//!
//! # Responsibility
//! - Validate submissions and run the display-name availability check.
//! - Provide point-in-time reads and the restartable snapshot sequence.
//!
//! # Invariants
//! - Submissions never bypass `Post::validate()`.
//! - The availability check is read-then-decide with no locking; two
//!   concurrent submissions under the same name can both pass it.

use crate::model::post::{AccountId, Post, PostId, PostValidationError};
use crate::repo::post_repo::{PostListQuery, PostRepository, RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request model for submitting a confession post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPostRequest {
    /// Authoring account; submission requires a signed-in caller.
    pub account_id: AccountId,
    /// Public name to publish under.
    pub display_name: String,
    pub title: String,
    /// Full story body including the fixed prefix.
    pub story: String,
}

/// Errors from post submission.
#[derive(Debug)]
pub enum SubmitError {
    /// Submission limits violated (title/story/display name).
    Validation(PostValidationError),
    /// Another account already published under this display name.
    DisplayNameTaken(String),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DisplayNameTaken(name) => {
                write!(f, "display name `{name}` is already taken by another account")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DisplayNameTaken(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<PostValidationError> for SubmitError {
    fn from(value: PostValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for SubmitError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service for post submission and reads.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Submits one confession post.
    ///
    /// # Contract
    /// - The post is validated before any write.
    /// - Fails with `DisplayNameTaken` when another account already
    ///   published under the trimmed name at check time.
    /// - Returns the created stable post ID.
    pub fn submit_post(&mut self, request: &SubmitPostRequest) -> Result<PostId, SubmitError> {
        let display_name = request.display_name.trim();
        let post = Post::new(
            request.title.clone(),
            request.story.clone(),
            request.account_id.clone(),
            display_name,
        );
        post.validate()?;

        if self
            .repo
            .display_name_in_use(display_name, request.account_id.as_str())?
        {
            return Err(SubmitError::DisplayNameTaken(display_name.to_string()));
        }

        Ok(self.repo.create_post(&post)?)
    }

    /// Gets one post by stable ID.
    pub fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        self.repo.get_post(id)
    }

    /// Lists posts newest-first using pagination options.
    pub fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        self.repo.list_posts(query)
    }

    /// Returns an infinite sequence of point-in-time collection snapshots.
    ///
    /// Each `next()` re-reads the store; dropping the iterator and calling
    /// `snapshots` again restarts the sequence. This is the pull-based
    /// stand-in for a live collection subscription.
    pub fn snapshots(&self, query: PostListQuery) -> Snapshots<'_, R> {
        Snapshots {
            service: self,
            query,
        }
    }
}

/// Infinite, restartable sequence of post-collection snapshots.
pub struct Snapshots<'service, R: PostRepository> {
    service: &'service PostService<R>,
    query: PostListQuery,
}

impl<R: PostRepository> Iterator for Snapshots<'_, R> {
    type Item = RepoResult<Vec<Post>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.service.list_posts(&self.query))
    }
}
