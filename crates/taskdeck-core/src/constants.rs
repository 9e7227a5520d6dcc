//! Application-wide constants.

/// Maximum length of a task title, matching the `VARCHAR(255)` column.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum length of an original filename accepted for an upload.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Prefix under which every issued object key lives.
pub const UPLOAD_KEY_PREFIX: &str = "uploads/";

/// Longest validity window a SigV4 pre-signed URL may carry (7 days).
pub const MAX_PRESIGNED_URL_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Content types accepted for task images unless configured otherwise.
pub const DEFAULT_IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];
