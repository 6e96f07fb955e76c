//! Reaction use-case service.
//!
//! # Responsibility
//! - Validate reaction requests (caller identity, emoji vocabulary) above
//!   the repository layer.
//! - Surface the repository's semantic failures under the caller-facing
//!   reaction taxonomy, unmodified.
//!
//! # Invariants
//! - Validation failures are terminal for the operation; nothing is written.
//! - There is no operation to remove or undo a reaction.

use crate::model::emoji::EmojiKind;
use crate::model::post::{AccountId, PostId, MAX_REACTIONS_PER_ACCOUNT};
use crate::repo::post_repo::{PostRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from reaction apply operations.
#[derive(Debug)]
pub enum ReactionError {
    /// No recognized account was supplied; anonymous reacting is rejected.
    Unauthenticated,
    /// The supplied glyph is outside the fixed emoji set.
    InvalidEmoji(String),
    /// Target post does not exist.
    PostNotFound(PostId),
    /// The account's reaction budget on the post is exhausted.
    LimitExceeded {
        post_id: PostId,
        account_id: AccountId,
    },
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for ReactionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "reacting requires a signed-in account"),
            Self::InvalidEmoji(glyph) => write!(f, "unsupported reaction emoji `{glyph}`"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::LimitExceeded {
                post_id,
                account_id,
            } => write!(
                f,
                "account {account_id} reached the {MAX_REACTIONS_PER_ACCOUNT}-reaction limit on post {post_id}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReactionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

/// Use-case service applying emoji reactions to posts.
pub struct ReactionService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> ReactionService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Applies one reaction from `account` to the post.
    ///
    /// # Contract
    /// - `account = None` fails with `Unauthenticated`.
    /// - A glyph outside the fixed set fails with `InvalidEmoji`.
    /// - A missing post fails with `PostNotFound`.
    /// - The 6th action by one account on one post fails with
    ///   `LimitExceeded`, regardless of which emoji were used; repeats of
    ///   the same emoji are counted individually, not deduplicated.
    /// - On success the account list append and the counter bump commit
    ///   together; concurrent reactions on the same post by different
    ///   accounts are both reflected.
    pub fn apply_reaction(
        &mut self,
        post_id: PostId,
        account: Option<&str>,
        emoji: &str,
    ) -> Result<(), ReactionError> {
        let account_id = account.ok_or(ReactionError::Unauthenticated)?;
        let kind =
            EmojiKind::parse(emoji).ok_or_else(|| ReactionError::InvalidEmoji(emoji.to_string()))?;

        match self.repo.apply_reaction(post_id, account_id, kind) {
            Ok(()) => Ok(()),
            Err(RepoError::PostNotFound(id)) => Err(ReactionError::PostNotFound(id)),
            Err(RepoError::ReactionLimitExceeded {
                post_id,
                account_id,
            }) => Err(ReactionError::LimitExceeded {
                post_id,
                account_id,
            }),
            Err(other) => Err(ReactionError::Repo(other)),
        }
    }
}
