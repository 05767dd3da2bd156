use super::StreamConfig;
use super::env::EnvConfig;
use super::yaml::YamlConfig;

/// Build a configuration from defaults, then environment, then YAML.
pub(crate) fn merge_config(yaml: Option<YamlConfig>) -> Result<StreamConfig, String> {
    let env = EnvConfig::load()?;
    let mut config = StreamConfig::default();

    // Environment over defaults
    let decoder = &mut config.decoder;
    if let Some(size) = env.min_chunk_size {
        decoder.min_chunk_size = size;
    }
    if let Some(size) = env.max_line_bytes {
        decoder.max_line_bytes = size;
    }
    if let Some(label) = env.label {
        decoder.label = label;
    }

    let retry = &mut config.retry;
    if let Some(attempts) = env.max_attempts {
        retry.max_attempts = attempts;
    }
    if let Some(delay) = env.base_delay_ms {
        retry.base_delay_ms = delay;
    }
    if let Some(backoff) = env.backoff {
        retry.backoff = backoff;
    }

    // YAML over environment
    let Some(yaml) = yaml else {
        return Ok(config);
    };

    if let Some(decoder_yaml) = yaml.decoder {
        let decoder = &mut config.decoder;
        if let Some(size) = decoder_yaml.min_chunk_size {
            decoder.min_chunk_size = size;
        }
        if let Some(size) = decoder_yaml.max_line_bytes {
            decoder.max_line_bytes = size;
        }
        if let Some(label) = decoder_yaml.label {
            decoder.label = label;
        }
    }

    if let Some(retry_yaml) = yaml.retry {
        let retry = &mut config.retry;
        if let Some(attempts) = retry_yaml.max_attempts {
            retry.max_attempts = attempts;
        }
        if let Some(delay) = retry_yaml.base_delay_ms {
            retry.base_delay_ms = delay;
        }
        if let Some(backoff) = retry_yaml.backoff {
            retry.backoff = backoff;
        }
    }

    Ok(config)
}
