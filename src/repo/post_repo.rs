//! Post repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable persistence APIs over the `posts` tables.
//! - Own the atomic reaction update (cap check + list append + counter bump).
//!
//! # Invariants
//! - Write paths must call `Post::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - `apply_reaction` runs in an IMMEDIATE transaction; concurrent reaction
//!   writes are serialized by the store (database-level write lock, bounded
//!   by the connection busy timeout), never interleaved.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::emoji::EmojiKind;
use crate::model::post::{
    zeroed_reactions, AccountId, Post, PostId, PostValidationError, MAX_REACTIONS_PER_ACCOUNT,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const POST_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    story,
    author_account_id,
    author_display_name,
    created_at
FROM posts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for post persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PostValidationError),
    Db(DbError),
    PostNotFound(PostId),
    /// Account already holds the maximum number of reactions on the post.
    ReactionLimitExceeded {
        post_id: PostId,
        account_id: AccountId,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::ReactionLimitExceeded {
                post_id,
                account_id,
            } => write!(
                f,
                "account {account_id} already has {MAX_REACTIONS_PER_ACCOUNT} reactions on post {post_id}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted post data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PostValidationError> for RepoError {
    fn from(value: PostValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListQuery {
    /// Maximum rows to return. `None` returns the full collection.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for post persistence and reaction updates.
pub trait PostRepository {
    /// Persists one post with its reaction state; returns its stable id.
    fn create_post(&mut self, post: &Post) -> RepoResult<PostId>;
    /// Gets one post by id with fully assembled reaction state.
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    /// Lists posts newest-first using pagination options.
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    /// Returns whether another account already published under `name`.
    fn display_name_in_use(&self, name: &str, excluding_account_id: &str) -> RepoResult<bool>;
    /// Atomically records one reaction: checks the per-account cap, appends
    /// to the account list and bumps the per-emoji counter.
    fn apply_reaction(
        &mut self,
        post_id: PostId,
        account_id: &str,
        emoji: EmojiKind,
    ) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&mut self, post: &Post) -> RepoResult<PostId> {
        post.validate()?;

        let uuid = post.uuid.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO posts (
                uuid,
                title,
                story,
                author_account_id,
                author_display_name,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                uuid.as_str(),
                post.title.as_str(),
                post.story.as_str(),
                post.author_account_id.as_str(),
                post.author_display_name.as_str(),
                post.created_at,
            ],
        )?;

        // Every emoji gets a counter row up front so reads and increments
        // never have to special-case a missing row.
        for emoji in EmojiKind::ALL {
            let count = post.reactions.get(&emoji).copied().unwrap_or(0);
            tx.execute(
                "INSERT INTO post_reactions (post_id, emoji, count) VALUES (?1, ?2, ?3);",
                params![uuid.as_str(), emoji.as_str(), count],
            )?;
        }

        for (account_id, list) in &post.reactions_by_account {
            for emoji in list {
                tx.execute(
                    "INSERT INTO post_reaction_entries (post_id, account_id, emoji)
                     VALUES (?1, ?2, ?3);",
                    params![uuid.as_str(), account_id.as_str(), emoji.as_str()],
                )?;
            }
        }

        tx.commit()?;
        Ok(post.uuid)
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(assemble_post(&*self.conn, row)?));
        }

        Ok(None)
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let mut sql = format!("{POST_SELECT_SQL} ORDER BY created_at DESC, uuid ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();

        while let Some(row) = rows.next()? {
            posts.push(assemble_post(&*self.conn, row)?);
        }

        Ok(posts)
    }

    fn display_name_in_use(&self, name: &str, excluding_account_id: &str) -> RepoResult<bool> {
        let in_use: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM posts
                WHERE author_display_name = ?1
                  AND author_account_id <> ?2
            );",
            params![name, excluding_account_id],
            |row| row.get(0),
        )?;
        Ok(in_use == 1)
    }

    fn apply_reaction(
        &mut self,
        post_id: PostId,
        account_id: &str,
        emoji: EmojiKind,
    ) -> RepoResult<()> {
        let uuid = post_id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !post_exists_in_tx(&tx, uuid.as_str())? {
            return Err(RepoError::PostNotFound(post_id));
        }

        let applied: i64 = tx.query_row(
            "SELECT COUNT(*)
             FROM post_reaction_entries
             WHERE post_id = ?1
               AND account_id = ?2;",
            params![uuid.as_str(), account_id],
            |row| row.get(0),
        )?;
        if applied >= MAX_REACTIONS_PER_ACCOUNT as i64 {
            return Err(RepoError::ReactionLimitExceeded {
                post_id,
                account_id: account_id.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO post_reaction_entries (post_id, account_id, emoji)
             VALUES (?1, ?2, ?3);",
            params![uuid.as_str(), account_id, emoji.as_str()],
        )?;
        tx.execute(
            "INSERT INTO post_reactions (post_id, emoji, count)
             VALUES (?1, ?2, 1)
             ON CONFLICT (post_id, emoji) DO UPDATE SET count = count + 1;",
            params![uuid.as_str(), emoji.as_str()],
        )?;

        tx.commit()?;
        Ok(())
    }
}

fn assemble_post(conn: &Connection, row: &Row<'_>) -> RepoResult<Post> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "posts.uuid")?;

    let post = Post {
        uuid,
        title: row.get("title")?,
        story: row.get("story")?,
        author_account_id: row.get("author_account_id")?,
        author_display_name: row.get("author_display_name")?,
        created_at: row.get("created_at")?,
        reactions: load_reaction_counts(conn, &uuid_text)?,
        reactions_by_account: load_account_reactions(conn, &uuid_text)?,
    };
    post.validate()?;
    Ok(post)
}

fn load_reaction_counts(
    conn: &Connection,
    post_uuid: &str,
) -> RepoResult<BTreeMap<EmojiKind, u32>> {
    let mut counts = zeroed_reactions();
    let mut stmt = conn.prepare(
        "SELECT emoji, count
         FROM post_reactions
         WHERE post_id = ?1;",
    )?;
    let mut rows = stmt.query([post_uuid])?;
    while let Some(row) = rows.next()? {
        let glyph: String = row.get("emoji")?;
        let emoji = parse_emoji(&glyph, "post_reactions.emoji")?;
        counts.insert(emoji, row.get("count")?);
    }
    Ok(counts)
}

fn load_account_reactions(
    conn: &Connection,
    post_uuid: &str,
) -> RepoResult<BTreeMap<AccountId, Vec<EmojiKind>>> {
    let mut stmt = conn.prepare(
        "SELECT account_id, emoji
         FROM post_reaction_entries
         WHERE post_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([post_uuid])?;
    let mut by_account: BTreeMap<AccountId, Vec<EmojiKind>> = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let account_id: String = row.get("account_id")?;
        let glyph: String = row.get("emoji")?;
        let emoji = parse_emoji(&glyph, "post_reaction_entries.emoji")?;
        by_account.entry(account_id).or_default().push(emoji);
    }
    Ok(by_account)
}

fn post_exists_in_tx(tx: &Transaction<'_>, post_uuid: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM posts WHERE uuid = ?1);",
        [post_uuid],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<PostId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_emoji(value: &str, column: &'static str) -> RepoResult<EmojiKind> {
    EmojiKind::parse(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid emoji value `{value}` in {column}")))
}

pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in [
        "posts",
        "post_reactions",
        "post_reaction_entries",
        "identities",
    ] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
