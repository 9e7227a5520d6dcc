//! Input validation helpers shared by the service and the client.

use crate::constants::{MAX_FILENAME_LENGTH, MAX_TITLE_LENGTH};
use crate::error::AppError;

/// Validate a task title and return it trimmed.
pub fn validate_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate the original filename of an upload.
pub fn validate_filename(filename: &str) -> Result<(), AppError> {
    if filename.trim().is_empty() {
        return Err(AppError::Validation("filename must not be empty".to_string()));
    }
    if filename.chars().count() > MAX_FILENAME_LENGTH {
        return Err(AppError::Validation(format!(
            "filename must be at most {} characters",
            MAX_FILENAME_LENGTH
        )));
    }
    Ok(())
}

/// Normalize a content type and check it against an allow-list.
///
/// Parameters such as `; charset=...` are ignored for the comparison.
pub fn validate_content_type(content_type: &str, allowed: &[String]) -> Result<String, AppError> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if allowed.iter().any(|ct| *ct == normalized) {
        Ok(normalized)
    } else {
        Err(AppError::Validation(format!(
            "content type '{}' is not allowed. Allowed: {}",
            content_type,
            allowed.join(", ")
        )))
    }
}

/// Validate a hex-encoded SHA-256 digest and return it lowercased.
pub fn validate_sha256_hex(digest: &str) -> Result<String, AppError> {
    let digest = digest.trim();
    if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::Validation(
            "sha256 must be 64 hexadecimal characters".to_string(),
        ));
    }
    Ok(digest.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images() -> Vec<String> {
        vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/webp".to_string(),
        ]
    }

    #[test]
    fn title_is_trimmed() {
        assert_eq!(validate_title("  Buy milk ").unwrap(), "Buy milk");
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(matches!(validate_title("   "), Err(AppError::Validation(_))));
        assert!(matches!(validate_title(""), Err(AppError::Validation(_))));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let title = "x".repeat(256);
        assert!(validate_title(&title).is_err());
        assert!(validate_title(&"x".repeat(255)).is_ok());
    }

    #[test]
    fn content_type_ignores_case_and_parameters() {
        assert_eq!(
            validate_content_type("Image/PNG; charset=binary", &images()).unwrap(),
            "image/png"
        );
    }

    #[test]
    fn content_type_outside_allow_list_is_rejected() {
        let err = validate_content_type("image/gif", &images()).unwrap_err();
        assert!(err.to_string().contains("image/gif"));
    }

    #[test]
    fn sha256_must_be_hex() {
        let ok = "A".repeat(64);
        assert_eq!(validate_sha256_hex(&ok).unwrap(), "a".repeat(64));
        assert!(validate_sha256_hex("abc").is_err());
        assert!(validate_sha256_hex(&"g".repeat(64)).is_err());
    }
}
