//! Pidgin to Gajim - Chat Log Migration
//!
//! A Rust library for moving chat histories written by Pidgin into the
//! SQLite history database used by Gajim.
//!
//! # Features
//!
//! - Parse Pidgin HTML and plain-text transcripts
//! - Rewrite `***Name does X` action lines to `/me does X`
//! - Classify one-to-one messages as incoming or outgoing
//! - Merge into an existing history database without duplicating rows

/// Ownership classification and nickname helpers
pub mod classify;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Destination database merge
pub mod export;
/// Transcript tree traversal
pub mod import;
/// Logging setup and utilities
pub mod logging;
/// Data models and structures
pub mod models;
/// Action and status line normalization
pub mod normalize;
/// Transcript parsers
pub mod parser;
/// Destination schema definitions
pub mod schema;
/// In-memory log store
pub mod store;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use error::{ImportError, Result};
pub use export::{Destination, ExportSummary};
pub use import::Importer;
pub use models::{Contact, Message, MessageKind, RawRecord};
pub use store::LogStore;
