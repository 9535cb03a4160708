//! Memory use-case service: submission handler and query/filter entry points.
//!
//! # Responsibility
//! - Submit validated memories as `pending`.
//! - List approved memories (recent N, or all with optional recipient search).
//! - Resolve single approved memories for the detail view.
//!
//! # Invariants
//! - Validation happens before any store interaction.
//! - Store failures are logged and returned as `PersistenceError`; nothing is
//!   retried, since a repeated insert would duplicate a memory.
//! - Reads are pure: same arguments on an unchanged store give the same
//!   memories in the same order.

use crate::model::memory::{
    validate_submission, Memory, MemoryId, SubmissionInput, ValidatedMemoryInput, ValidationError,
};
use crate::repo::memory_repo::{ApprovedQuery, MemoryStore, RepoError};
use crate::search::recipient::RecipientFilter;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of memories shown in the "recent" feed when not configured.
pub const DEFAULT_RECENT_LIMIT: u32 = 3;

const SUBMIT_CONFIRMATION: &str =
    "Thank you for your submission! Your memory is pending approval.";

/// Store operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Insert,
    ListRecent,
    ListApproved,
    Lookup,
}

impl StoreOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::ListRecent => "list_recent",
            Self::ListApproved => "list_approved",
            Self::Lookup => "lookup",
        }
    }
}

/// Store write or read failure surfaced at the service boundary.
#[derive(Debug)]
pub struct PersistenceError {
    operation: StoreOperation,
    cause: RepoError,
}

impl PersistenceError {
    pub fn new(operation: StoreOperation, cause: RepoError) -> Self {
        Self { operation, cause }
    }

    pub fn operation(&self) -> StoreOperation {
        self.operation
    }

    pub fn cause(&self) -> &RepoError {
        &self.cause
    }

    /// Generic text suitable for end users; details stay in logs.
    pub fn user_message(&self) -> &'static str {
        match self.operation {
            StoreOperation::Insert => "Error submitting your memory.",
            _ => "Could not load memories.",
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "memory store {} failed: {}", self.operation.as_str(), self.cause)
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}

/// Detail lookup failure.
#[derive(Debug)]
pub enum LookupError {
    /// No approved memory with this id.
    NotFound(MemoryId),
    Persistence(PersistenceError),
}

impl LookupError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Memory not found.",
            Self::Persistence(err) => err.user_message(),
        }
    }
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "memory not found: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LookupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

/// Failure of the one-call validate-then-submit entry point.
#[derive(Debug)]
pub enum SubmissionError {
    Validation(ValidationError),
    Persistence(PersistenceError),
}

impl SubmissionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.user_message(),
            Self::Persistence(err) => err.user_message(),
        }
    }
}

impl Display for SubmissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmissionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SubmissionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for SubmissionError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// Successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Stored record, always `pending`.
    pub memory: Memory,
    pub message: &'static str,
}

/// Memory service facade over a store implementation.
pub struct MemoryService<S: MemoryStore> {
    store: S,
    recent_limit: u32,
}

impl<S: MemoryStore> MemoryService<S> {
    /// Creates a service with the default recent-feed size.
    pub fn new(store: S) -> Self {
        Self {
            store,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn with_recent_limit(mut self, recent_limit: u32) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    pub fn recent_limit(&self) -> u32 {
        self.recent_limit
    }

    /// Persists one validated memory with `pending` status.
    ///
    /// # Contract
    /// - The store assigns `id` and `created_at`.
    /// - A store failure is returned once; the caller decides what to show.
    pub fn submit(&self, input: &ValidatedMemoryInput) -> Result<Memory, PersistenceError> {
        match self.store.insert(input) {
            Ok(memory) => {
                info!(
                    "event=memory_submit module=service status=ok memory_id={} recipient_len={} message_len={} anonymous={} effect={}",
                    memory.id,
                    memory.recipient.chars().count(),
                    memory.message.chars().count(),
                    memory.is_anonymous(),
                    memory.animation.is_some()
                );
                Ok(memory)
            }
            Err(err) => Err(self.persistence_failure(StoreOperation::Insert, err)),
        }
    }

    /// Validates raw form input locally, then submits it.
    ///
    /// No store write happens when validation fails.
    pub fn submit_input(
        &self,
        input: &SubmissionInput,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let validated = validate_submission(input).inspect_err(|err| {
            info!(
                "event=memory_submit module=service status=rejected error_code=validation error={err}"
            );
        })?;

        let memory = self.submit(&validated)?;
        Ok(SubmissionReceipt {
            memory,
            message: SUBMIT_CONFIRMATION,
        })
    }

    /// Newest approved memories, at most `limit`.
    pub fn list_recent(&self, limit: u32) -> Result<Vec<Memory>, PersistenceError> {
        let query = ApprovedQuery {
            recipient: None,
            limit: Some(limit),
        };
        self.store
            .select_approved(&query)
            .map_err(|err| self.persistence_failure(StoreOperation::ListRecent, err))
    }

    /// Newest approved memories using the configured feed size.
    pub fn list_recent_default(&self) -> Result<Vec<Memory>, PersistenceError> {
        self.list_recent(self.recent_limit)
    }

    /// All approved memories, optionally filtered by recipient substring.
    ///
    /// A blank term is the same as no term.
    pub fn list_approved(&self, search_term: Option<&str>) -> Result<Vec<Memory>, PersistenceError> {
        let query = ApprovedQuery {
            recipient: RecipientFilter::parse(search_term),
            limit: None,
        };
        let filtered = query.recipient.is_some();
        let memories = self
            .store
            .select_approved(&query)
            .map_err(|err| self.persistence_failure(StoreOperation::ListApproved, err))?;

        info!(
            "event=memory_list module=service status=ok filtered={filtered} count={}",
            memories.len()
        );
        Ok(memories)
    }

    /// Resolves one approved memory for the detail view.
    pub fn get_memory(&self, id: MemoryId) -> Result<Memory, LookupError> {
        match self.store.select_by_id(id) {
            Ok(Some(memory)) => Ok(memory),
            Ok(None) => Err(LookupError::NotFound(id)),
            Err(err) => Err(LookupError::Persistence(
                self.persistence_failure(StoreOperation::Lookup, err),
            )),
        }
    }

    fn persistence_failure(&self, operation: StoreOperation, cause: RepoError) -> PersistenceError {
        error!(
            "event=memory_store module=service status=error operation={} error={}",
            operation.as_str(),
            cause
        );
        PersistenceError::new(operation, cause)
    }
}
