//! Direct-to-storage image uploads
//!
//! The service never proxies image bytes. [`UploadIssuer`] hands out a short-lived
//! pre-signed PUT URL for a fresh object key; the client transfers the bytes
//! straight to the bucket; [`UploadConfirmer`] then checks what arrived and turns
//! the key into the image reference stored on a task.

mod confirmer;
mod issuer;

pub use confirmer::UploadConfirmer;
pub use issuer::UploadIssuer;
