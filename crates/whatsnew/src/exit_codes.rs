//! Exit codes for the CLI

use whatsnew_core::{ConfigError, GitError, WhatsnewError};
use whatsnew_pipeline::PipelineError;

/// Success
#[allow(dead_code)]
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// No release information found
pub const NOT_FOUND: i32 = 4;

/// Pick the exit code for an error from anywhere in its cause chain
pub fn for_error(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return CONFIG_ERROR;
        }
        if cause.downcast_ref::<GitError>().is_some() {
            return GIT_ERROR;
        }
        if let Some(e) = cause.downcast_ref::<WhatsnewError>() {
            match e {
                WhatsnewError::Config(_) => return CONFIG_ERROR,
                WhatsnewError::Git(_) => return GIT_ERROR,
                _ => {}
            }
        }
        if let Some(e) = cause.downcast_ref::<PipelineError>() {
            match e {
                PipelineError::NotFound { .. } => return NOT_FOUND,
                PipelineError::Git(_) => return GIT_ERROR,
                _ => {}
            }
        }
    }
    ERROR
}
