//! Configuration module for doubao-stream
//!
//! This module loads decoder and retry settings from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//!
//! # Example
//! ```rust,no_run
//! use doubao_stream::config::StreamConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = StreamConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = StreamConfig::from_file(&config_path)?;
//!
//! println!("Minimum chunk size: {}", config.decoder.min_chunk_size);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod yaml;

pub use crate::core::tts::doubao::DecoderSettings;
pub use crate::utils::retry::{Backoff, RetryPolicy};

/// Runtime configuration
///
/// Groups everything a caller needs to decode Doubao responses:
/// - Decoder settings (minimum chunk size, line limit, log label)
/// - Retry policy for whole request attempts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamConfig {
    pub decoder: DecoderSettings,
    pub retry: RetryPolicy,
}

impl StreamConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults. The `.env` file is loaded by the
    /// binary before this is called.
    ///
    /// # Example
    /// ```rust,no_run
    /// use doubao_stream::config::StreamConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = StreamConfig::from_env()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable overrides
    ///
    /// Values present in the YAML file take priority over environment variables.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, if an environment
    /// variable holds an invalid value, or if the merged configuration is invalid.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // The configuration priority is: YAML > Environment Variables (.env + actual ENV) > Defaults
        // Note: .env file is loaded in main.rs at application startup
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        let config = merge::merge_config(Some(yaml_config))?;
        config.validate()?;

        Ok(config)
    }

    /// Validate decoder and retry settings
    pub fn validate(&self) -> Result<(), String> {
        self.decoder.validate()?;
        self.retry.validate()?;
        Ok(())
    }
}
