//! Core types and shared functionality for wayback-archive.
//!
//! This crate provides:
//! - Layered configuration
//! - The archive outcome model
//! - The per-run deduplication cache

pub mod cache;
pub mod config;
pub mod outcome;

pub use cache::DedupCache;
pub use config::{AppConfig, ConfigError, Credentials};
pub use outcome::{ArchiveOutcome, ArchiveStatus, ScreenshotRef, UNKNOWN_TITLE, parse_wayback_timestamp};
