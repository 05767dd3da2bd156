use serde::Deserialize;
use std::path::PathBuf;

use crate::utils::retry::Backoff;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values given here
/// override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// decoder:
///   min_chunk_size: 16
///   max_line_bytes: 16777216
///   label: "doubao"
///
/// retry:
///   max_attempts: 3
///   base_delay_ms: 500
///   backoff: "exponential"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub decoder: Option<DecoderYaml>,
    pub retry: Option<RetryYaml>,
}

/// Decoder configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DecoderYaml {
    pub min_chunk_size: Option<usize>,
    pub max_line_bytes: Option<usize>,
    pub label: Option<String>,
}

/// Retry configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RetryYaml {
    pub max_attempts: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub backoff: Option<Backoff>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
