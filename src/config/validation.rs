use crate::config::types::{AnalysisConfig, Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;

/// Upper bound on redirects a basic fetch may be configured to follow
const MAX_REDIRECT_LIMIT: usize = 20;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_analysis_config(&config.analysis, &config.crawler)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "crawler.max-pages must be >= 1".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "crawler.request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.max_redirects > MAX_REDIRECT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "crawler.max-redirects must be <= {}, got {}",
            MAX_REDIRECT_LIMIT, config.max_redirects
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

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates analysis configuration
fn validate_analysis_config(
    config: &AnalysisConfig,
    crawler: &CrawlerConfig,
) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "analysis.max-pages must be >= 1".to_string(),
        ));
    }

    // Browser pass must outlast a basic fetch of the same page
    if config.browser_timeout_secs <= crawler.request_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "analysis.browser-timeout-secs ({}s) must be longer than crawler.request-timeout-secs ({}s)",
            config.browser_timeout_secs, crawler.request_timeout_secs
        )));
    }

    if config.max_images < 1 {
        return Err(ConfigError::Validation(
            "analysis.max-images must be >= 1".to_string(),
        ));
    }

    Ok(())
}
