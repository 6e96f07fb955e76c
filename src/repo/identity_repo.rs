//! Identity directory contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the one durable anonymous persona per account.
//! - Provide the atomic create-if-absent primitive the lazy provisioning
//!   path relies on.
//!
//! # Invariants
//! - `identities.account_id` uniqueness is the only creation guard; the
//!   first committed writer wins and later writers observe its row.
//! - Stored identities are never updated or deleted by this repository.

use crate::model::identity::Identity;
use crate::repo::post_repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for the anonymous identity directory.
pub trait IdentityRepository {
    /// Gets the stored identity for `account_id`, if any.
    fn get_identity(&self, account_id: &str) -> RepoResult<Option<Identity>>;
    /// Stores `identity` unless the account already has one; returns the
    /// persisted row either way (first writer wins).
    fn create_identity_if_absent(&mut self, identity: &Identity) -> RepoResult<Identity>;
}

/// SQLite-backed identity directory.
pub struct SqliteIdentityRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteIdentityRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl IdentityRepository for SqliteIdentityRepository<'_> {
    fn get_identity(&self, account_id: &str) -> RepoResult<Option<Identity>> {
        load_identity(&*self.conn, account_id)
    }

    fn create_identity_if_absent(&mut self, identity: &Identity) -> RepoResult<Identity> {
        // INSERT OR IGNORE is the conditional-create primitive: under a
        // concurrent first contact only one row commits, and both callers
        // read back the winner.
        self.conn.execute(
            "INSERT OR IGNORE INTO identities (account_id, display_name, emoji, color)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                identity.account_id.as_str(),
                identity.display_name.as_str(),
                identity.emoji.as_str(),
                identity.color.as_str(),
            ],
        )?;

        load_identity(&*self.conn, identity.account_id.as_str())?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "identity for account `{}` missing after conditional create",
                identity.account_id
            ))
        })
    }
}

fn load_identity(conn: &Connection, account_id: &str) -> RepoResult<Option<Identity>> {
    let mut stmt = conn.prepare(
        "SELECT account_id, display_name, emoji, color
         FROM identities
         WHERE account_id = ?1;",
    )?;

    let mut rows = stmt.query([account_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(Identity {
            account_id: row.get("account_id")?,
            display_name: row.get("display_name")?,
            emoji: row.get("emoji")?,
            color: row.get("color")?,
        }));
    }

    Ok(None)
}
