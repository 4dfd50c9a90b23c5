use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Runtime configuration, read from the process environment at startup.
///
/// | variable                  | meaning                                   |
/// |---------------------------|-------------------------------------------|
/// | `GEMINI_API_KEY`          | provider API key (falls back to `API_KEY`) |
/// | `OFFERTHUMB_MODEL`        | image model name                          |
/// | `OFFERTHUMB_ENDPOINT`     | API base URL                              |
/// | `OFFERTHUMB_EXPORT_DIR`   | where exported PNGs are written           |
/// | `OFFERTHUMB_TIMEOUT_SECS` | HTTP timeout; unset means wait forever    |
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub export_dir: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            export_dir: PathBuf::from("."),
            request_timeout: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let request_timeout = get("OFFERTHUMB_TIMEOUT_SECS").and_then(|raw| match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
            _ => {
                log::warn!("Ignoring invalid OFFERTHUMB_TIMEOUT_SECS value: {}", raw);
                None
            }
        });

        Self {
            api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            model: get("OFFERTHUMB_MODEL").unwrap_or(defaults.model),
            endpoint: get("OFFERTHUMB_ENDPOINT")
                .map(|e| e.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.endpoint),
            export_dir: get("OFFERTHUMB_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            request_timeout,
        }
    }
}
