//! Shared types, errors, and configuration for Choubo.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types with user-safe messages
//! - The tagged `ActionResult` returned by every action
//! - Configuration management

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use config::{AppConfig, ImportConfig, LedgerConfig, ServerConfig};
pub use error::{AppError, AppResult, ErrorCategory, FieldErrors};
pub use result::{ActionError, ActionResult};
