//! Domain-specific shared validations and formatting utilities

use crate::errors::AppError;

/// Characters permitted in a site configuration name. Anything else never
/// reaches a command line.
pub fn normalize_site_name(value: &str) -> Result<String, AppError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(AppError::bad_request(
            "invalid_site_name",
            "site_name must not be empty",
        ));
    }

    if !normalized.chars().all(|character| {
        character.is_ascii_alphanumeric()
            || character == '-'
            || character == '_'
            || character == '.'
            || character == '@'
    }) {
        return Err(AppError::bad_request(
            "invalid_site_name",
            "site_name must contain only alphanumeric characters, dashes, underscores, dots, and @",
        ));
    }

    Ok(normalized.to_string())
}

/// `a2ensite` accepts names with or without the `.conf` suffix; membership
/// checks against the available listing follow the same rule.
pub fn site_exists(available: &[String], site_name: &str) -> bool {
    let base = site_name.strip_suffix(".conf").unwrap_or(site_name);
    available
        .iter()
        .any(|site| site == site_name || site.strip_suffix(".conf").unwrap_or(site) == base)
}

pub fn status_label(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

pub fn status_banner(enabled: bool) -> &'static str {
    if enabled {
        "ENABLED"
    } else {
        "DISABLED"
    }
}
