//! Configuration validation logic.

use url::Url;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Minimum length for a plausible browser user agent.
const MIN_USER_AGENT_LENGTH: usize = 40;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_base_url(&config.portal.base_url)?;
    validate_user_agent(&config.portal.user_agent)?;
    validate_concurrency(config.options.max_concurrent_downloads)?;

    if config.options.download_directory.is_none() {
        return Err(Error::MissingConfig("download_directory".to_string()));
    }

    Ok(())
}

/// Validate the portal base URL.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    if base_url.is_empty() {
        return Err(Error::MissingConfig("base_url".to_string()));
    }

    let url = Url::parse(base_url).map_err(|e| Error::ConfigValidation {
        field: "base_url".to_string(),
        message: format!("'{}' is not a valid URL: {}", base_url, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: "base_url".to_string(),
            message: format!("Unsupported scheme '{}'; only http(s) portals", url.scheme()),
        });
    }

    // Check for placeholder values
    let lower = base_url.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_portal") {
        return Err(Error::ConfigValidation {
            field: "base_url".to_string(),
            message: "Base URL appears to be a placeholder. Please provide your portal URL."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    if user_agent.len() < MIN_USER_AGENT_LENGTH {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: format!(
                "User agent must be at least {} characters (got {})",
                MIN_USER_AGENT_LENGTH,
                user_agent.len()
            ),
        });
    }

    Ok(())
}

/// Validate the per-course download concurrency cap.
pub fn validate_concurrency(max_concurrent: usize) -> Result<()> {
    if max_concurrent == 0 {
        return Err(Error::ConfigValidation {
            field: "max_concurrent_downloads".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate an interactively entered student ID.
pub fn validate_student_id(student_id: &str) -> Result<()> {
    let trimmed = student_id.trim();

    if trimmed.is_empty() {
        return Err(Error::ConfigValidation {
            field: "student_id".to_string(),
            message: "Student ID cannot be empty".to_string(),
        });
    }

    if trimmed.chars().any(char::is_whitespace) {
        return Err(Error::ConfigValidation {
            field: "student_id".to_string(),
            message: format!("Student ID '{}' must not contain whitespace", trimmed),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_base_url() {
        assert!(validate_base_url("https://portal.aiub.edu/").is_ok());
        assert!(validate_base_url("http://portal.example.edu").is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(validate_base_url("").is_err());
        assert!(validate_base_url("not a url").is_err());
        assert!(validate_base_url("ftp://portal.example.edu").is_err());
        assert!(validate_base_url("https://replaceme.example").is_err());
    }

    #[test]
    fn test_user_agent_too_short() {
        assert!(validate_user_agent("curl/8.0").is_err());
        assert!(validate_user_agent("").is_err());
    }

    #[test]
    fn test_concurrency_bounds() {
        assert!(validate_concurrency(0).is_err());
        assert!(validate_concurrency(1).is_ok());
        assert!(validate_concurrency(8).is_ok());
    }

    #[test]
    fn test_student_id() {
        assert!(validate_student_id("20-43210-1").is_ok());
        assert!(validate_student_id("  20-43210-1  ").is_ok());
        assert!(validate_student_id("").is_err());
        assert!(validate_student_id("20 43210").is_err());
    }

    #[test]
    fn test_validate_config_requires_directory() {
        let mut config = Config::default();
        assert!(matches!(
            validate_config(&config),
            Err(Error::MissingConfig(_))
        ));

        config.options.download_directory = Some(PathBuf::from("/tmp/materials"));
        assert!(validate_config(&config).is_ok());
    }
}
