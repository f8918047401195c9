use std::env;
use std::time::Duration;

use crate::error::SynthError;
use crate::repo::Author;

/// Config holds everything read from the environment at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub sot_url: String,
    pub sot_token: String,
    pub repo_url: String,
    pub repo_project_id: String,
    pub repo_token: String,
    pub category_tags: Vec<String>,
    pub author_name: String,
    pub author_email: String,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Result<Self, SynthError> {
        Ok(Self {
            sot_url: require_env("SOT_URL")?,
            sot_token: require_env("SOT_TOKEN")?,
            repo_url: get_env("REPO_URL", "https://gitlab.com/api/v4"),
            repo_project_id: require_env("REPO_PROJECT_ID")?,
            repo_token: require_env("REPO_TOKEN")?,
            category_tags: parse_tag_list(&get_env("INTERFACE_CATEGORY_TAGS", "")),
            author_name: get_env("REPO_AUTHOR_NAME", "netbox-oc-synth"),
            author_email: get_env("REPO_AUTHOR_EMAIL", "netbox-oc-synth@localhost"),
            http_timeout: Duration::from_secs(
                get_env("SOT_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            ),
        })
    }

    pub fn author(&self) -> Author {
        Author {
            name: self.author_name.clone(),
            email: self.author_email.clone(),
        }
    }
}

/// Split a comma-separated tag list, dropping blank entries
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn require_env(key: &'static str) -> Result<String, SynthError> {
    match env::var(key) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(SynthError::MissingEnv(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(parse_tag_list("SERVERS,PEERING"), vec!["SERVERS", "PEERING"]);
        assert_eq!(parse_tag_list(" SERVERS , ,IQC,"), vec!["SERVERS", "IQC"]);
        assert!(parse_tag_list("").is_empty());
    }
}
