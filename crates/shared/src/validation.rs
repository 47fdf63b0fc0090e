//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum length of a URL path accepted by the redirect registry.
pub const MAX_PATH_LENGTH: usize = 2048;

lazy_static! {
    /// Lowercase words separated by single hyphens, e.g. `about-us`.
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
    /// ISO 639-1 code with optional region, e.g. `en`, `pt-BR`.
    static ref LANGUAGE_CODE_RE: Regex = Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").unwrap();
}

/// Validates a URL slug.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug_format");
        err.message =
            Some("Slug must contain only lowercase letters, digits and single hyphens".into());
        Err(err)
    }
}

/// Validates a language code such as `en` or `pt-BR`.
pub fn validate_language_code(code: &str) -> Result<(), ValidationError> {
    if LANGUAGE_CODE_RE.is_match(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("language_code_format");
        err.message = Some("Language code must look like 'en' or 'pt-BR'".into());
        Err(err)
    }
}

/// Validates a site-relative path used by redirects.
/// - Must start with `/`
/// - Must not contain whitespace
pub fn validate_site_path(path: &str) -> Result<(), ValidationError> {
    if !path.starts_with('/') {
        let mut err = ValidationError::new("path_relative");
        err.message = Some("Path must start with '/'".into());
        return Err(err);
    }

    if path.len() > MAX_PATH_LENGTH {
        let mut err = ValidationError::new("path_length");
        err.message = Some("Path is too long".into());
        return Err(err);
    }

    if path.chars().any(char::is_whitespace) {
        let mut err = ValidationError::new("path_whitespace");
        err.message = Some("Path must not contain whitespace".into());
        return Err(err);
    }

    Ok(())
}
