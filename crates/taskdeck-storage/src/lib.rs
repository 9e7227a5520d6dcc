//! Taskdeck Storage Library
//!
//! Object-storage collaborator for the image upload flow. The service never moves
//! image bytes itself: it signs short-lived URLs for one object key, checks that the
//! object arrived, and derives the URL under which the object can be read back.
//!
//! # Object key format
//!
//! Every issued key has the form `uploads/{uuid}-{sanitized filename}`. Keys must not
//! contain `..`, a leading `/`, or characters outside `[A-Za-z0-9._-]` after the prefix.
//! Key generation and validation live in the `keys` module.

pub mod factory;
pub mod keys;
pub mod s3;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_object_key, sanitize_filename, validate_object_key};
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
