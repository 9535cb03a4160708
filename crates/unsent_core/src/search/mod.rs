//! Recipient search entry points.
//!
//! # Responsibility
//! - Turn user search terms into store filters.
//! - Keep the displayed result list consistent with the latest issued query.

pub mod recipient;
pub mod session;
