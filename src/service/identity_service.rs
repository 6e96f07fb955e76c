//! Anonymous identity provisioning service.
//!
//! # Responsibility
//! - Lazily provision one durable anonymous persona per account.
//! - Provide the render-only placeholder when the store is unreachable.
//!
//! # Invariants
//! - `ensure_identity` is idempotent: once a persona exists it is returned
//!   unchanged forever.
//! - The placeholder fallback is never written back to the store.

use crate::model::identity::Identity;
use crate::repo::identity_repo::IdentityRepository;
use crate::repo::post_repo::RepoResult;
use log::warn;
use rand::thread_rng;

/// Use-case service for the anonymous identity directory.
pub struct IdentityService<R: IdentityRepository> {
    repo: R,
}

impl<R: IdentityRepository> IdentityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the durable persona for `account_id`, provisioning one on
    /// first contact.
    ///
    /// # Contract
    /// - An existing persona is returned unchanged.
    /// - Otherwise a fresh persona is synthesized and stored through the
    ///   conditional create; when a concurrent caller commits first, their
    ///   row is returned instead of the local draft.
    pub fn ensure_identity(&mut self, account_id: &str) -> RepoResult<Identity> {
        if let Some(existing) = self.repo.get_identity(account_id)? {
            return Ok(existing);
        }

        let draft = Identity::synthesize(account_id, &mut thread_rng());
        self.repo.create_identity_if_absent(&draft)
    }

    /// Like `ensure_identity`, but degrades to the ephemeral placeholder
    /// when the store is unreachable.
    ///
    /// This is the one sanctioned local recovery: the placeholder is only
    /// valid for the current render and must never be persisted.
    pub fn ensure_identity_or_fallback(&mut self, account_id: &str) -> Identity {
        match self.ensure_identity(account_id) {
            Ok(identity) => identity,
            Err(err) => {
                warn!(
                    "event=identity_fallback module=identity status=degraded account={account_id} error={err}"
                );
                Identity::placeholder(account_id)
            }
        }
    }
}
