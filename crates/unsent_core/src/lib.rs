//! Core domain logic for "If Only I Sent This".
//! This crate is the single source of truth for memory invariants: the
//! submission and moderation lifecycle, visibility and ordering of approved
//! memories, style resolution and per-card presentation state.

pub mod card;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod style;

pub use card::engine::{CardEngine, CardKey, CardMode, CardState, FlipState};
pub use card::effect::EffectPhase;
pub use card::render::{BackFace, CardView, DetailPanel, Footer, FrontFace, RenderedMessage};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::memory::{
    validate_submission, Memory, MemoryId, ModerationStatus, RequiredField, SubmissionInput,
    ValidatedMemoryInput, ValidationError,
};
pub use repo::memory_repo::{
    ApprovedQuery, MemoryStore, RepoError, RepoResult, SqliteMemoryStore,
};
pub use search::recipient::RecipientFilter;
pub use search::session::{QueryTicket, SearchDisplay, SearchSession};
pub use service::memory_service::{
    LookupError, MemoryService, PersistenceError, StoreOperation, SubmissionError,
    SubmissionReceipt,
};
pub use style::effect::{resolve_effect, LetterStyle, TextEffect};
pub use style::{
    accent_color_for, background_style_for, border_style_for, resolve_card_style,
    scroll_region_colors_for, CardStyle, ColorValue, ScrollColors, StyleToken,
};

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
