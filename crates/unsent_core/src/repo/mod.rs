//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the store collaborator contract used by the memory service.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - The store assigns `id` and `created_at`; inserts always write `pending`.
//! - There is no update or delete path in this crate.

pub mod memory_repo;
