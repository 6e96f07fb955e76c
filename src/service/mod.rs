//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep caller-facing layers decoupled from storage details.
//!
//! Each service takes its repository by constructor parameter, so tests can
//! substitute fakes for the SQLite implementations.

pub mod identity_service;
pub mod post_service;
pub mod reaction_service;
