use serde::Deserialize;

use crate::http::HttpVersion;

/// Limits applied by [`RequestParser`](crate::http::parser::RequestParser).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub max_http_version: HttpVersion,
    pub max_target_size: usize,
    pub max_header_size: usize,
    pub max_header_count: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_http_version: HttpVersion::V1_1,
            max_target_size: 1024,
            max_header_size: 8192,
            max_header_count: 100,
        }
    }
}

impl ParserConfig {
    /// Reads the config from a TOML file, falling back to the defaults when
    /// the file cannot be read or deserialized.
    pub fn from_file(path: &str) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path, error = %err, "failed to read config, falling back to defaults");
                return ParserConfig::default();
            }
        };

        Self::from_toml(&content).unwrap_or_else(|err| {
            tracing::warn!(path, error = %err, "failed to deserialize config, falling back to defaults");
            ParserConfig::default()
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ParserConfig>(content)
    }
}
