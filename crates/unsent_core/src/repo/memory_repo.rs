//! Memory store contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert submitted memories as `pending`.
//! - Select approved memories with optional recipient filter and limit.
//!
//! # Invariants
//! - Ordering is always `created_at DESC, id ASC`.
//! - Read paths reject malformed persisted rows instead of masking them.
//! - Recipient matching folds case with `search::recipient::fold_case`, so the
//!   connection must come from `db::open_db*` where that function is registered.

use crate::db::DbError;
use crate::model::memory::{Memory, MemoryId, ModerationStatus, ValidatedMemoryInput};
use crate::search::recipient::{RecipientFilter, FOLD_CASE_SQL_FN};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MEMORY_COLUMNS: &str = "id,
    recipient,
    message,
    sender,
    created_at,
    status,
    color,
    full_bg,
    letter_style,
    animation";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for memory persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memory data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
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

/// Selection options for approved memories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovedQuery {
    pub recipient: Option<RecipientFilter>,
    /// `None` means unbounded.
    pub limit: Option<u32>,
}

/// Store collaborator consumed by `MemoryService`.
pub trait MemoryStore {
    /// Inserts one memory as `pending` and returns the stored record.
    fn insert(&self, input: &ValidatedMemoryInput) -> RepoResult<Memory>;
    /// Lists approved memories, newest first.
    fn select_approved(&self, query: &ApprovedQuery) -> RepoResult<Vec<Memory>>;
    /// Gets one approved memory by id.
    fn select_by_id(&self, id: MemoryId) -> RepoResult<Option<Memory>>;
}

/// SQLite-backed memory store.
pub struct SqliteMemoryStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoryStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MemoryStore for SqliteMemoryStore<'_> {
    fn insert(&self, input: &ValidatedMemoryInput) -> RepoResult<Memory> {
        let id = Uuid::new_v4();
        let mut stmt = self.conn.prepare(&format!(
            "INSERT INTO memories (
                id,
                recipient,
                message,
                sender,
                status,
                color,
                full_bg,
                letter_style,
                animation
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING {MEMORY_COLUMNS};"
        ))?;

        let mut rows = stmt.query(params![
            id.to_string(),
            input.recipient.as_str(),
            input.message.as_str(),
            input.sender.as_deref(),
            ModerationStatus::Pending.as_str(),
            input.color.as_str(),
            bool_to_int(input.full_background),
            input.letter_style.as_str(),
            input.animation.as_deref(),
        ])?;

        match rows.next()? {
            Some(row) => parse_memory_row(row),
            None => Err(RepoError::InvalidData(format!(
                "insert of memory {id} returned no row"
            ))),
        }
    }

    fn select_approved(&self, query: &ApprovedQuery) -> RepoResult<Vec<Memory>> {
        if query.limit == Some(0) {
            return Ok(Vec::new());
        }

        let mut sql = format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE status = ?");
        let mut bind_values: Vec<Value> =
            vec![Value::Text(ModerationStatus::Approved.as_str().to_string())];

        if let Some(filter) = &query.recipient {
            sql.push_str(&format!(" AND instr({FOLD_CASE_SQL_FN}(recipient), ?) > 0"));
            bind_values.push(Value::Text(filter.folded_term().to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut memories = Vec::new();

        while let Some(row) = rows.next()? {
            memories.push(parse_memory_row(row)?);
        }

        Ok(memories)
    }

    fn select_by_id(&self, id: MemoryId) -> RepoResult<Option<Memory>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEMORY_COLUMNS}
             FROM memories
             WHERE id = ?1
               AND status = ?2;"
        ))?;

        let mut rows = stmt.query(params![
            id.to_string(),
            ModerationStatus::Approved.as_str()
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memory_row(row)?));
        }

        Ok(None)
    }
}

fn parse_memory_row(row: &Row<'_>) -> RepoResult<Memory> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in memories.id"))
    })?;

    let status_text: String = row.get("status")?;
    let status = ModerationStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in memories.status"))
    })?;

    let full_background = match row.get::<_, i64>("full_bg")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid full_bg value `{other}` in memories.full_bg"
            )));
        }
    };

    let recipient: String = row.get("recipient")?;
    let message: String = row.get("message")?;
    if recipient.trim().is_empty() || message.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "memory {id} has an empty recipient or message"
        )));
    }

    Ok(Memory {
        id,
        recipient,
        message,
        sender: row
            .get::<_, Option<String>>("sender")?
            .filter(|sender| !sender.trim().is_empty()),
        created_at: row.get("created_at")?,
        status,
        color: row.get("color")?,
        full_background,
        letter_style: row.get("letter_style")?,
        animation: row
            .get::<_, Option<String>>("animation")?
            .filter(|animation| !animation.trim().is_empty()),
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
