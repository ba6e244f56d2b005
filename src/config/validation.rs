use crate::config::types::{AldiwanConfig, SasbConfig, Settings, SustainabilityReportsConfig};
use crate::ConfigError;
use url::Url;

/// Validates every scraper's settings
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    validate_aldiwan_config(&settings.aldiwan)?;
    validate_sustainability_reports_config(&settings.sustain)?;
    validate_sasb_config(&settings.sustain_accounting)?;
    Ok(())
}

/// Validates the poetry archive settings
fn validate_aldiwan_config(config: &AldiwanConfig) -> Result<(), ConfigError> {
    validate_link("aldiwan", &config.link)?;

    // Poet and poem hrefs are appended verbatim
    if !config.link.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "aldiwan link must end with '/', got '{}'",
            config.link
        )));
    }

    if config.letter_count < 1 || config.letter_count > 27 {
        return Err(ConfigError::Validation(format!(
            "letter_count must be between 1 and 27, got {}",
            config.letter_count
        )));
    }

    Ok(())
}

/// Validates the annual reports settings
fn validate_sustainability_reports_config(
    config: &SustainabilityReportsConfig,
) -> Result<(), ConfigError> {
    validate_link("sustain", &config.link)?;
    validate_timeout("sustain", config.download_timeout_secs)?;
    Ok(())
}

/// Validates the ESG accounting reports settings
fn validate_sasb_config(config: &SasbConfig) -> Result<(), ConfigError> {
    validate_link("sustain_accounting", &config.link)?;
    validate_timeout("sustain_accounting", config.download_timeout_secs)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sustain_accounting user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// A base link must be an absolute HTTP(S) URL
fn validate_link(scraper: &str, link: &str) -> Result<(), ConfigError> {
    let url = Url::parse(link)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} link '{}': {}", scraper, link, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} link '{}' must use HTTP or HTTPS scheme",
            scraper, link
        )));
    }

    Ok(())
}

fn validate_timeout(scraper: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation(format!(
            "{} download_timeout_secs must be >= 1",
            scraper
        )));
    }
    Ok(())
}
