//! Runtime configuration, resolved once at startup and handed to the handler.

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Matches the 6 MB request payload cap of the serverless host.
pub const DEFAULT_MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// How blank prompts are treated before anything is sent upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PromptPolicy {
    /// Forward whatever the client sent, including missing or empty prompts.
    #[default]
    Permissive,
    /// Reject missing or whitespace-only prompts with 400.
    Strict,
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
    pub prompt_policy: PromptPolicy,
    pub max_body_bytes: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            prompt_policy: PromptPolicy::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ProxyConfig {
    /// The credential, if one is set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// `<base>/v1beta/models/<model>:generateContent`, without the key.
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url_targets_gemini_flash() {
        let config = ProxyConfig::default();
        assert_eq!(
            config.generate_content_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_is_ignored() {
        let config = ProxyConfig {
            api_base: "http://127.0.0.1:9000/".to_string(),
            model: "gemini-test".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.generate_content_url(),
            "http://127.0.0.1:9000/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let mut config = ProxyConfig::default();
        assert_eq!(config.api_key(), None);

        config.api_key = Some(String::new());
        assert_eq!(config.api_key(), None);

        config.api_key = Some("secret".to_string());
        assert_eq!(config.api_key(), Some("secret"));
    }
}
