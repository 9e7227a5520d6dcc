//! Object key generation and validation.
//!
//! Key format: `uploads/{uuid}-{sanitized filename}`. The random disambiguator keeps
//! unrelated uploads from overwriting each other even when filenames collide.

use crate::traits::{StorageError, StorageResult};
use taskdeck_core::constants::UPLOAD_KEY_PREFIX;
use uuid::Uuid;

const MAX_SANITIZED_NAME_LENGTH: usize = 128;
const MAX_EXTENSION_LENGTH: usize = 16;
const FALLBACK_NAME: &str = "file";

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'
}

/// Reduce an arbitrary client filename to `[A-Za-z0-9._-]`.
///
/// Whitespace, path separators and every other character are dropped, runs of dots
/// collapse to one, leading dots are removed. Long names are shortened while keeping
/// a short extension intact.
pub fn sanitize_filename(filename: &str) -> String {
    let mut name = String::with_capacity(filename.len());
    for c in filename.chars().filter(|c| is_key_char(*c)) {
        if c == '.' && name.ends_with('.') {
            continue;
        }
        name.push(c);
    }

    let name = name.trim_start_matches('.');
    if name.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    if name.len() <= MAX_SANITIZED_NAME_LENGTH {
        return name.to_string();
    }

    // ASCII only from here on, so byte offsets are char boundaries.
    match name.rfind('.') {
        Some(dot) if name.len() - dot <= MAX_EXTENSION_LENGTH + 1 && dot > 0 => {
            let ext = &name[dot..];
            let stem = &name[..dot];
            let stem_len = MAX_SANITIZED_NAME_LENGTH - ext.len();
            format!("{}{}", &stem[..stem_len.min(stem.len())], ext)
        }
        _ => name[..MAX_SANITIZED_NAME_LENGTH].to_string(),
    }
}

/// Generate a fresh, collision-resistant object key for an upload.
pub fn generate_object_key(filename: &str) -> String {
    format!(
        "{}{}-{}",
        UPLOAD_KEY_PREFIX,
        Uuid::new_v4(),
        sanitize_filename(filename)
    )
}

/// Check that a client-supplied key is one this service could have issued.
pub fn validate_object_key(key: &str) -> StorageResult<()> {
    let rest = key.strip_prefix(UPLOAD_KEY_PREFIX).ok_or_else(|| {
        StorageError::InvalidKey(format!(
            "object key must start with '{}'",
            UPLOAD_KEY_PREFIX
        ))
    })?;

    if rest.is_empty() {
        return Err(StorageError::InvalidKey(
            "object key has no name after the prefix".to_string(),
        ));
    }

    if rest.contains("..") {
        return Err(StorageError::InvalidKey(
            "object key must not contain '..'".to_string(),
        ));
    }

    if !rest.chars().all(is_key_char) {
        return Err(StorageError::InvalidKey(
            "object key contains characters outside [A-Za-z0-9._-]".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("my_photo-2.JPG"), "my_photo-2.JPG");
    }

    #[test]
    fn whitespace_and_separators_are_stripped() {
        assert_eq!(sanitize_filename("my photo.png"), "myphoto.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cat.webp"), "CUsersmecat.webp");
        assert_eq!(sanitize_filename("a\tb\nc.png"), "abc.png");
    }

    #[test]
    fn dot_runs_collapse() {
        assert_eq!(sanitize_filename("a....b.png"), "a.b.png");
        assert_eq!(sanitize_filename("...hidden"), "hidden");
    }

    #[test]
    fn empty_result_falls_back() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("   "), "file");
        assert_eq!(sanitize_filename("фото"), "file");
        assert_eq!(sanitize_filename("/.."), "file");
    }

    #[test]
    fn long_names_keep_their_extension() {
        let long = format!("{}.png", "a".repeat(300));
        let sanitized = sanitize_filename(&long);
        assert_eq!(sanitized.len(), 128);
        assert!(sanitized.ends_with(".png"));
    }

    #[test]
    fn generated_keys_are_unique_and_valid() {
        let keys: HashSet<String> = (0..100).map(|_| generate_object_key("photo.png")).collect();
        assert_eq!(keys.len(), 100);
        for key in &keys {
            assert!(key.starts_with("uploads/"));
            assert!(key.ends_with("-photo.png"));
            validate_object_key(key).unwrap();
        }
    }

    #[test]
    fn hostile_filenames_still_produce_valid_keys() {
        for name in ["../../x", "/etc/passwd", "a b/c d", "..", "x?y=z#w"] {
            validate_object_key(&generate_object_key(name)).unwrap();
        }
    }

    #[test]
    fn foreign_keys_are_rejected() {
        assert!(validate_object_key("media/photo.png").is_err());
        assert!(validate_object_key("/uploads/photo.png").is_err());
        assert!(validate_object_key("uploads/").is_err());
        assert!(validate_object_key("uploads/../secrets").is_err());
        assert!(validate_object_key("uploads/nested/photo.png").is_err());
        assert!(validate_object_key("uploads/photo.png?x=1").is_err());
    }
}
