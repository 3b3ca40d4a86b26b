//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Provider kinds the CLI knows how to build
pub const PROVIDER_KINDS: [&str; 2] = ["local", "github"];

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_sources(config)?;
    validate_quality(config)?;
    validate_ai(config)?;
    validate_provider(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_unit_interval(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("must be between 0 and 1, got {}", value),
        }
        .into());
    }
    Ok(())
}

fn validate_sources(config: &Config) -> Result<()> {
    let sources = &config.sources;
    validate_unit_interval("sources.release.min_confidence", sources.release.min_confidence)?;
    validate_unit_interval(
        "sources.changelog.min_confidence",
        sources.changelog.min_confidence,
    )?;
    validate_unit_interval("sources.commits.min_confidence", sources.commits.min_confidence)?;

    if sources.changelog.enabled && sources.changelog.paths.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "sources.changelog.paths".to_string(),
            message: "at least one path is required when the changelog source is enabled"
                .to_string(),
        }
        .into());
    }

    if sources.commits.max_commits == 0 {
        return Err(ConfigError::InvalidValue {
            field: "sources.commits.max_commits".to_string(),
            message: "must be greater than 0".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_quality(config: &Config) -> Result<()> {
    validate_unit_interval(
        "quality.confidence_threshold",
        config.quality.confidence_threshold,
    )?;
    validate_unit_interval("quality.min_item_score", config.quality.min_item_score)
}

fn validate_ai(config: &Config) -> Result<()> {
    validate_unit_interval("ai.confidence_floor", config.ai.confidence_floor)?;

    if config.ai.timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "ai.timeout_secs".to_string(),
            message: "must be greater than 0".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_provider(config: &Config) -> Result<()> {
    if !PROVIDER_KINDS.contains(&config.provider.kind.as_str()) {
        return Err(ConfigError::InvalidValue {
            field: "provider.kind".to_string(),
            message: format!("must be one of: {}", PROVIDER_KINDS.join(", ")),
        }
        .into());
    }

    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "provider.timeout_secs".to_string(),
            message: "must be greater than 0".to_string(),
        }
        .into());
    }

    Ok(())
}
