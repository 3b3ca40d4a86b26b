//! Default configuration values

use super::types::Config;

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "whatsnew.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "whatsnew.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".whatsnew.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".whatsnew.toml",
    ]
}

/// Generate default configuration YAML
pub fn default_config_yaml() -> String {
    let config = Config::default();
    serde_yaml::to_string(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# whatsnew configuration

sources:
  release:
    enabled: true
    priority: 1
    min_confidence: 0.7
  changelog:
    enabled: true
    priority: 2
    min_confidence: 0.6
    paths:
      - CHANGELOG.md
      - changelog.md
      - CHANGES.md
      - HISTORY.md
      - NEWS.md
      - RELEASES.md
      - docs/CHANGELOG.md
  commits:
    enabled: true
    priority: 3
    min_confidence: 0.0
    max_commits: 250

quality:
  confidence_threshold: 0.6
  min_item_score: 0.25
  min_text_length: 3

ai:
  enabled: false
  timeout_secs: 60
  confidence_floor: 0.8

provider:
  kind: local
  api_url: https://api.github.com
  token_env: GITHUB_TOKEN
  timeout_secs: 30
  tag_limit: 30
"#;
