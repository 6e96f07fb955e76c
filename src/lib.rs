//! Core domain logic for TIMU, the anonymous confession feed.
//! This crate is the single source of truth for business invariants:
//! one durable anonymous persona per account, a five-action reaction
//! budget per account per post, and counters that never drift from the
//! per-account reaction lists.

pub mod db;
pub mod logging;
pub mod model;
pub mod ranking;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::emoji::EmojiKind;
pub use model::identity::Identity;
pub use model::post::{
    AccountId, Post, PostId, PostValidationError, MAX_REACTIONS_PER_ACCOUNT, MAX_STORY_CHARS,
    STORY_PREFIX,
};
pub use ranking::{rank_posts, RankedPost};
pub use repo::identity_repo::{IdentityRepository, SqliteIdentityRepository};
pub use repo::post_repo::{
    PostListQuery, PostRepository, RepoError, RepoResult, SqlitePostRepository,
};
pub use service::identity_service::IdentityService;
pub use service::post_service::{PostService, SubmitError, SubmitPostRequest};
pub use service::reaction_service::{ReactionError, ReactionService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
