//! Leaderboard ranking over post snapshots.
//!
//! # Responsibility
//! - Derive a total order over posts from aggregate reaction counts.
//!
//! # Invariants
//! - Pure function of its single input snapshot; no side effects.
//! - Sort is stable: posts with equal totals keep their input order.

use crate::model::post::Post;

/// One leaderboard row: a post with its precomputed reaction total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPost {
    pub post: Post,
    /// Sum over all emoji counters at snapshot time.
    pub total_reactions: u64,
}

/// Ranks a post snapshot by total reactions, descending.
///
/// Ties keep the relative order of the input sequence; the caller decides
/// what that order is (store iteration order for the leaderboard page).
pub fn rank_posts(posts: Vec<Post>) -> Vec<RankedPost> {
    let mut ranked: Vec<RankedPost> = posts
        .into_iter()
        .map(|post| {
            let total_reactions = post.total_reactions();
            RankedPost {
                post,
                total_reactions,
            }
        })
        .collect();

    // sort_by_key is stable, which is what keeps ties in input order.
    ranked.sort_by_key(|row| std::cmp::Reverse(row.total_reactions));
    ranked
}
