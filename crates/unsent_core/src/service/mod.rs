//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the submit/list/detail entry points.
//! - Convert store failures into typed boundary errors.

pub mod memory_service;
