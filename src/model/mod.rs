//! Unified domain model for the confession feed.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one post-centric shape shared by browse/leaderboard projections.
//!
//! # Invariants
//! - Every post is identified by a stable `PostId`.
//! - Reaction counters always agree with the per-account reaction lists.

pub mod emoji;
pub mod identity;
pub mod post;
