//! Shared types, error model, and configuration for Rulebook.
//!
//! This crate is the foundation depended on by the other Rulebook crates.
//! It provides:
//! - [`RulebookError`] — the unified error type
//! - Domain types ([`Fragment`], [`Impact`], [`Section`], [`Manifest`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, PathsConfig, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, RulebookError};
pub use types::{Fragment, Impact, Manifest, Reference, SECTIONS, Section};
