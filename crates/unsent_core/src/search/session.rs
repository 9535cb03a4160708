//! Last-query-wins search session.
//!
//! # Responsibility
//! - Track which search query is current while earlier ones are in flight.
//! - Hold the list state the browse view renders.
//!
//! # Invariants
//! - Only the most recently issued ticket may change the displayed state, and
//!   only once; repeated deliveries for it are dropped.
//! - A failed read replaces the list with an explicit failure state; stale
//!   results are never kept on screen.

use crate::model::memory::Memory;
use crate::service::memory_service::PersistenceError;
use log::debug;

/// Message shown for an empty result list.
pub const EMPTY_RESULTS_MESSAGE: &str = "No memories found.";

/// Handle for one issued query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    generation: u64,
    term: String,
}

impl QueryTicket {
    pub fn term(&self) -> &str {
        &self.term
    }
}

/// What the browse view should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchDisplay {
    /// Nothing issued yet.
    Idle,
    Loading { term: String },
    Results { term: String, items: Vec<Memory> },
    Failed { term: String, message: String },
}

impl SearchDisplay {
    /// Items to render; empty for every non-result state.
    pub fn items(&self) -> &[Memory] {
        match self {
            Self::Results { items, .. } => items,
            _ => &[],
        }
    }

    /// Placeholder line for empty or failed states.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Results { items, .. } if items.is_empty() => Some(EMPTY_RESULTS_MESSAGE),
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Search state for one browse view.
#[derive(Debug, Clone)]
pub struct SearchSession {
    latest: u64,
    /// Generation still waiting for its response.
    awaiting: Option<u64>,
    display: SearchDisplay,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            latest: 0,
            awaiting: None,
            display: SearchDisplay::Idle,
        }
    }

    /// Registers a new query; every earlier ticket becomes superseded.
    pub fn issue(&mut self, term: impl Into<String>) -> QueryTicket {
        self.latest += 1;
        self.awaiting = Some(self.latest);
        let term = term.into();
        self.display = SearchDisplay::Loading { term: term.clone() };
        QueryTicket {
            generation: self.latest,
            term,
        }
    }

    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        ticket.generation == self.latest
    }

    /// Applies a query response.
    ///
    /// Returns `false` and leaves the display untouched when `ticket` was
    /// superseded by a later `issue` or has already been completed.
    pub fn complete(
        &mut self,
        ticket: &QueryTicket,
        response: Result<Vec<Memory>, PersistenceError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "event=search_complete module=search status=superseded generation={} latest={}",
                ticket.generation, self.latest
            );
            return false;
        }
        if self.awaiting.take() != Some(ticket.generation) {
            debug!(
                "event=search_complete module=search status=duplicate generation={}",
                ticket.generation
            );
            return false;
        }

        let term = ticket.term.clone();
        self.display = match response {
            Ok(items) => SearchDisplay::Results { term, items },
            Err(err) => SearchDisplay::Failed {
                term,
                message: err.user_message().to_string(),
            },
        };
        true
    }

    pub fn display(&self) -> &SearchDisplay {
        &self.display
    }
}
