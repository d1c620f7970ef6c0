//! Build-time Configuration
//!
//! The bundle is static, so settings are baked in at compile time.
//!
//! - `DEAL_PIPELINE_API_URL` - REST backend base URL (default: http://localhost:8081/api)
//! - `DEAL_PIPELINE_TOAST_MS` - how long notifications stay visible (default: 5000)

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8081/api";

/// Default notification lifetime in milliseconds
pub const DEFAULT_TOAST_MS: u32 = 5_000;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL every API path is appended to (no trailing slash)
    pub api_base_url: String,
    /// Notification lifetime in milliseconds
    pub toast_ms: u32,
}

impl AppConfig {
    /// Load from the values captured at compile time
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| match key {
            "DEAL_PIPELINE_API_URL" => option_env!("DEAL_PIPELINE_API_URL").map(str::to_string),
            "DEAL_PIPELINE_TOAST_MS" => option_env!("DEAL_PIPELINE_TOAST_MS").map(str::to_string),
            _ => None,
        })
    }

    /// Build from an arbitrary key lookup. Blank or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("DEAL_PIPELINE_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let toast_ms = lookup("DEAL_PIPELINE_TOAST_MS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TOAST_MS);

        Self { api_base_url, toast_ms }
    }

    /// Join an API path (e.g. `/deals/42`) onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            toast_ms: DEFAULT_TOAST_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = AppConfig::from_lookup(|key| {
            (key == "DEAL_PIPELINE_API_URL").then(|| " https://crm.example.com/api/ ".to_string())
        });
        assert_eq!(config.api_base_url, "https://crm.example.com/api");
        assert_eq!(config.endpoint("/deals"), "https://crm.example.com/api/deals");
        assert_eq!(config.endpoint("deals/7"), "https://crm.example.com/api/deals/7");
    }

    #[test]
    fn test_bad_toast_value_falls_back() {
        let config = AppConfig::from_lookup(|key| {
            (key == "DEAL_PIPELINE_TOAST_MS").then(|| "soon".to_string())
        });
        assert_eq!(config.toast_ms, DEFAULT_TOAST_MS);

        let config = AppConfig::from_lookup(|key| {
            (key == "DEAL_PIPELINE_TOAST_MS").then(|| "0".to_string())
        });
        assert_eq!(config.toast_ms, DEFAULT_TOAST_MS);
    }
}
