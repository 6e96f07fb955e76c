//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Post::validate()` before persistence.
//! - The reaction cap check, list append and counter bump are one atomic
//!   unit scoped to a single post.
//! - Repository APIs return semantic errors (`PostNotFound`,
//!   `ReactionLimitExceeded`) in addition to DB transport errors.

pub mod identity_repo;
pub mod post_repo;
