use crate::config::types::{BoilerplatePattern, Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent fetch workers
pub const MAX_WORKERS: usize = 32;

/// Upper bound on the politeness delay (ten minutes)
pub const MAX_DELAY_MS: u64 = 10 * 60 * 1000;

/// Validates the entire configuration
///
/// The seed URL is only checked when present; commands that need it (the
/// crawl) resolve it separately so `normalize` works without one.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_patterns(&config.normalizer.patterns)?;
    Ok(())
}

/// Validates crawler configuration
pub(crate) fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.seed_url.is_some() {
        config.seed()?;
    }

    if let Some(root) = &config.root_domain {
        validate_domain_string(root)?;
    }

    if config.page_budget < 1 {
        return Err(ConfigError::Validation(format!(
            "page_budget must be >= 1, got {}",
            config.page_budget
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.delay_ms > MAX_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "delay_ms must be <= {}, got {}",
            MAX_DELAY_MS, config.delay_ms
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.max_duration_secs == Some(0) {
        return Err(ConfigError::Validation(
            "max_duration_secs must be > 0 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("raw_path", &config.raw_path),
        ("cleaned_jsonl_path", &config.cleaned_jsonl_path),
        ("cleaned_text_path", &config.cleaned_text_path),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    if config.cleaned_jsonl_path == config.cleaned_text_path {
        return Err(ConfigError::Validation(
            "cleaned_jsonl_path and cleaned_text_path must differ".to_string(),
        ));
    }

    Ok(())
}

/// Validates boilerplate patterns by compiling them
fn validate_patterns(patterns: &[BoilerplatePattern]) -> Result<(), ConfigError> {
    for pattern in patterns {
        pattern.compile()?;
    }
    Ok(())
}

/// Validates a root domain string
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::Validation(
            "root_domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}
