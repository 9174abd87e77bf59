use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;

/// Upper bound on the worker pool size
pub const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_workers(config.workers)?;

    for (name, value) in [
        ("idle-timeout-secs", config.idle_timeout_secs),
        ("connect-timeout-secs", config.connect_timeout_secs),
        ("read-timeout-secs", config.read_timeout_secs),
        ("shutdown-grace-secs", config.shutdown_grace_secs),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    // In-flight fetches must be able to hit their own timeouts before the
    // grace period aborts them
    let fetch_budget = config
        .connect_timeout_secs
        .saturating_add(config.read_timeout_secs);
    if config.shutdown_grace_secs <= fetch_budget {
        return Err(ConfigError::Validation(format!(
            "shutdown-grace-secs must exceed connect-timeout-secs + read-timeout-secs ({}), got {}",
            fetch_budget, config.shutdown_grace_secs
        )));
    }

    Ok(())
}

/// Validates a worker count
pub fn validate_workers(workers: usize) -> Result<(), ConfigError> {
    if workers < 1 || workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, workers
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() || config.crawler_version.contains(char::is_whitespace)
    {
        return Err(ConfigError::Validation(format!(
            "crawler-version must be non-empty without whitespace, got '{}'",
            config.crawler_version
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.state_dir.is_empty() {
        return Err(ConfigError::Validation(
            "state-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
