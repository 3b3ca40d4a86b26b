//! whatsnew Git - Local repository access
//!
//! Provides the tag listing, commit ranges and file lookups the local
//! source provider needs to assemble release information without a
//! hosting service.

mod commits;
mod files;
mod repository;
mod tags;
pub mod types;

pub use repository::{GitRepo, Result};
pub use types::{CommitInfo, TagInfo};
