//! # dotkeep
//!
//! Core library for the dotkeep configuration exporter.
//!
//! This library discovers configuration files belonging to common
//! developer tools (shell profiles, editor settings, version-control
//! configs), serializes them into a single exportable payload or a
//! compressed archive, and restores them later.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Core error types for the dotkeep library
pub mod error {
    /// Result type alias using `anyhow::Error`
    pub type Result<T> = anyhow::Result<T>;
}

/// Well-known program adapters and the adapter registry
pub mod adapters;

/// Compressed archive packaging with a path-mapping manifest
pub mod archive;

/// User configuration file loading
pub mod config;

/// Export pipeline and destinations
pub mod export;

/// Payload serialization formats
pub mod formats;

/// Import pipeline and sources
pub mod import;

/// Home directory path expansion
pub mod paths;
