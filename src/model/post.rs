//! Post domain model.
//!
//! # Responsibility
//! - Define the canonical confession post record with embedded reaction state.
//! - Enforce submission limits and the reaction bookkeeping invariants.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another post.
//! - For every emoji `e`, `reactions[e]` equals the number of occurrences of
//!   `e` across all `reactions_by_account` lists.
//! - No account list exceeds `MAX_REACTIONS_PER_ACCOUNT` entries.
//! - `story` starts with `STORY_PREFIX` and carries at most
//!   `MAX_STORY_CHARS` content characters beyond it.

use crate::model::emoji::EmojiKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a confession post.
pub type PostId = Uuid;

/// Opaque account identifier issued by the external identity provider.
///
/// Kept as a type alias to make semantic intent explicit in signatures; the
/// core never inspects or derives anything from its content.
pub type AccountId = String;

/// Maximum reaction actions one account may apply to one post.
///
/// Counted per action, not per distinct emoji: the same glyph clicked five
/// times exhausts the budget.
pub const MAX_REACTIONS_PER_ACCOUNT: usize = 5;

/// Required fixed prefix of every story body.
pub const STORY_PREFIX: &str = "TIMU by ";

/// Maximum story content characters beyond `STORY_PREFIX`.
pub const MAX_STORY_CHARS: usize = 300;

/// Validation failures for post records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// `uuid` is the nil UUID.
    NilUuid,
    /// Title is blank after trim.
    EmptyTitle,
    /// Story does not start with the required prefix.
    MissingStoryPrefix,
    /// Story has no content beyond the prefix.
    EmptyStory,
    /// Story content exceeds the character budget.
    StoryTooLong { chars: usize, max: usize },
    /// Author display name is blank after trim.
    EmptyDisplayName,
    /// An account's reaction list exceeds the per-post cap.
    ReactionCapExceeded { account_id: AccountId, len: usize },
    /// A counter disagrees with the per-account reaction lists.
    ReactionSumMismatch {
        emoji: EmojiKind,
        counted: u32,
        recorded: u32,
    },
}

impl Display for PostValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "post uuid must not be nil"),
            Self::EmptyTitle => write!(f, "post title must not be blank"),
            Self::MissingStoryPrefix => {
                write!(f, "story must start with `{STORY_PREFIX}`")
            }
            Self::EmptyStory => write!(f, "story must have content beyond the prefix"),
            Self::StoryTooLong { chars, max } => {
                write!(f, "story content is {chars} chars, max is {max}")
            }
            Self::EmptyDisplayName => write!(f, "author display name must not be blank"),
            Self::ReactionCapExceeded { account_id, len } => write!(
                f,
                "account {account_id} has {len} reactions, cap is {MAX_REACTIONS_PER_ACCOUNT}"
            ),
            Self::ReactionSumMismatch {
                emoji,
                counted,
                recorded,
            } => write!(
                f,
                "counter for {emoji} records {recorded} but account lists contain {counted}"
            ),
        }
    }
}

impl Error for PostValidationError {}

/// Canonical confession post with embedded reaction state.
///
/// The per-emoji counters are denormalized from the per-account lists so
/// browse/leaderboard reads never have to re-aggregate; `validate` keeps the
/// two views honest at every persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Stable global ID used for reaction targeting and lookups.
    pub uuid: PostId,
    pub title: String,
    /// Full story body including the fixed `STORY_PREFIX`.
    pub story: String,
    /// Opaque id of the authoring account.
    pub author_account_id: AccountId,
    /// Public name the post was published under. Unique across other
    /// accounts at submission time (checked, not continuously enforced).
    pub author_display_name: String,
    /// Unix epoch milliseconds at creation.
    pub created_at: i64,
    /// Per-emoji aggregate counters. Always carries all five kinds.
    pub reactions: BTreeMap<EmojiKind, u32>,
    /// Per-account reaction lists, in application order.
    pub reactions_by_account: BTreeMap<AccountId, Vec<EmojiKind>>,
}

impl Post {
    /// Creates a new post with a generated ID, current timestamp and zeroed
    /// reaction counters.
    pub fn new(
        title: impl Into<String>,
        story: impl Into<String>,
        author_account_id: impl Into<AccountId>,
        author_display_name: impl Into<String>,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4(),
            title,
            story,
            author_account_id,
            author_display_name,
            now_epoch_ms(),
        )
    }

    /// Creates a post with caller-provided ID and timestamp.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        uuid: PostId,
        title: impl Into<String>,
        story: impl Into<String>,
        author_account_id: impl Into<AccountId>,
        author_display_name: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            uuid,
            title: title.into(),
            story: story.into(),
            author_account_id: author_account_id.into(),
            author_display_name: author_display_name.into(),
            created_at,
            reactions: zeroed_reactions(),
            reactions_by_account: BTreeMap::new(),
        }
    }

    /// Checks submission limits and reaction bookkeeping consistency.
    pub fn validate(&self) -> Result<(), PostValidationError> {
        if self.uuid.is_nil() {
            return Err(PostValidationError::NilUuid);
        }
        if self.title.trim().is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        let content = self
            .story
            .strip_prefix(STORY_PREFIX)
            .ok_or(PostValidationError::MissingStoryPrefix)?;
        if content.trim().is_empty() {
            return Err(PostValidationError::EmptyStory);
        }
        let chars = content.chars().count();
        if chars > MAX_STORY_CHARS {
            return Err(PostValidationError::StoryTooLong {
                chars,
                max: MAX_STORY_CHARS,
            });
        }
        if self.author_display_name.trim().is_empty() {
            return Err(PostValidationError::EmptyDisplayName);
        }

        let mut counted: BTreeMap<EmojiKind, u32> = BTreeMap::new();
        for (account_id, list) in &self.reactions_by_account {
            if list.len() > MAX_REACTIONS_PER_ACCOUNT {
                return Err(PostValidationError::ReactionCapExceeded {
                    account_id: account_id.clone(),
                    len: list.len(),
                });
            }
            for emoji in list {
                *counted.entry(*emoji).or_insert(0) += 1;
            }
        }
        for emoji in EmojiKind::ALL {
            let counted_value = counted.get(&emoji).copied().unwrap_or(0);
            let recorded = self.reactions.get(&emoji).copied().unwrap_or(0);
            if counted_value != recorded {
                return Err(PostValidationError::ReactionSumMismatch {
                    emoji,
                    counted: counted_value,
                    recorded,
                });
            }
        }

        Ok(())
    }

    /// Sum of all per-emoji counters; the leaderboard sort key.
    pub fn total_reactions(&self) -> u64 {
        self.reactions.values().map(|count| u64::from(*count)).sum()
    }

    /// Number of reaction actions `account_id` has applied to this post.
    pub fn account_reaction_count(&self, account_id: &str) -> usize {
        self.reactions_by_account
            .get(account_id)
            .map_or(0, Vec::len)
    }
}

/// Counter map with every emoji kind present at zero.
pub fn zeroed_reactions() -> BTreeMap<EmojiKind, u32> {
    EmojiKind::ALL.into_iter().map(|kind| (kind, 0)).collect()
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
