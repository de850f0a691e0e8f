use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub profile_base_url: String,
    pub cdn_base_url: String,
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            profile_base_url: "http://www.deezer.com".to_string(),
            cdn_base_url: "http://cdn-images.deezer.com".to_string(),
            request_timeout_ms: 15_000,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base name for `.json`, `.txt` and `.jpg`; empty disables file output.
    pub save_name: String,
    /// Placeholders like `%SONG_TITLE%`; a literal `\n` becomes a newline.
    pub txt_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_name: "deezer_now".to_string(),
            txt_format: "%SONG_TITLE%\\n\\n%ARTIST_NAME%".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub profile_id: u64,
    /// Seconds between polls; zero or less polls once and exits.
    pub poll_interval_secs: i64,
    pub log_level: String,
    pub output: OutputConfig,
    pub endpoints: EndpointsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile_id: 875_499_801,
            poll_interval_secs: 10,
            log_level: "info".to_string(),
            output: OutputConfig::default(),
            endpoints: EndpointsConfig::default(),
        }
    }
}
