//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store bootstrap and CRUD calls into use-case level APIs.
//! - Keep CLI/transport layers decoupled from persistence details.

pub mod task_service;
