//! whatsnew Core - Shared types, errors and configuration
//!
//! This crate provides the data model that every stage of the release
//! notes pipeline produces and consumes, the error taxonomy, and the
//! configuration system.

pub mod config;
pub mod error;
pub mod types;

pub use error::{ConfigError, ExtractError, GitError, Result, WhatsnewError};
pub use types::{Category, CategoryId, ExtractedItem, SourceHint, SourceMetadata, SourceResult};
