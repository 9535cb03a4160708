//! Domain model for submitted memories.
//!
//! # Responsibility
//! - Define the canonical `Memory` record and its moderation lifecycle flag.
//! - Validate submission input before anything reaches the store.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store, never by callers.
//! - New memories always start as `ModerationStatus::Pending`.

pub mod memory;
