use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request for a pre-signed upload URL
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UploadCredentialRequest {
    /// Original filename (used to derive the object key)
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub filename: String,
    /// Content type (MIME type) the client will upload
    #[validate(length(
        min = 1,
        max = 255,
        message = "Content type must be between 1 and 255 characters"
    ))]
    pub content_type: String,
}

/// A time-limited credential authorizing exactly one upload to `object_key`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadCredential {
    /// Pre-signed URL; the signature in its query string is the credential
    pub upload_url: String,
    /// HTTP method to use against `upload_url`
    pub method: String,
    /// Object key the bytes will be stored under
    pub object_key: String,
    /// `Content-Type` header the client must send with the bytes
    pub content_type: String,
    pub expires_at: DateTime<Utc>,
}

/// Request to confirm a finished direct upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfirmUploadRequest {
    pub object_key: String,
    /// Task to attach the image to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
    /// Hex SHA-256 of the uploaded bytes; verified against the stored object when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Canonical reference to a confirmed upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfirmUploadResponse {
    pub image_url: String,
    pub object_key: String,
    /// Task the image was attached to, if any
    pub task_id: Option<Uuid>,
    /// Set when `image_url` is a signed URL; the reference stops working after this instant
    pub expires_at: Option<DateTime<Utc>>,
}

/// Progress of one client-driven image upload.
///
/// `NoImage -> CredentialRequested -> BytesTransferred -> Confirmed`. A fresh
/// credential may be requested from any non-confirmed state, which restarts the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    NoImage,
    CredentialRequested,
    BytesTransferred,
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid upload transition from {from} to {to}")]
pub struct InvalidUploadTransition {
    pub from: UploadState,
    pub to: UploadState,
}

impl UploadState {
    pub fn advance(self, next: UploadState) -> Result<UploadState, InvalidUploadTransition> {
        use UploadState::*;
        match (self, next) {
            (NoImage | CredentialRequested | BytesTransferred, CredentialRequested)
            | (CredentialRequested, BytesTransferred)
            | (BytesTransferred, Confirmed) => Ok(next),
            _ => Err(InvalidUploadTransition {
                from: self,
                to: next,
            }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Confirmed)
    }
}

impl Display for UploadState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadState::NoImage => write!(f, "no-image"),
            UploadState::CredentialRequested => write!(f, "credential-requested"),
            UploadState::BytesTransferred => write!(f, "bytes-transferred"),
            UploadState::Confirmed => write!(f, "confirmed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UploadState::*;
    use super::*;

    #[test]
    fn happy_path_advances_in_order() {
        let state = NoImage
            .advance(CredentialRequested)
            .and_then(|s| s.advance(BytesTransferred))
            .and_then(|s| s.advance(Confirmed))
            .unwrap();
        assert_eq!(state, Confirmed);
        assert!(state.is_terminal());
    }

    #[test]
    fn steps_cannot_be_skipped() {
        assert!(NoImage.advance(BytesTransferred).is_err());
        assert!(NoImage.advance(Confirmed).is_err());
        assert!(CredentialRequested.advance(Confirmed).is_err());
    }

    #[test]
    fn fresh_credential_restarts_the_flow() {
        assert_eq!(
            BytesTransferred.advance(CredentialRequested).unwrap(),
            CredentialRequested
        );
        assert_eq!(
            CredentialRequested.advance(CredentialRequested).unwrap(),
            CredentialRequested
        );
    }

    #[test]
    fn confirmed_is_terminal() {
        let err = Confirmed.advance(CredentialRequested).unwrap_err();
        assert_eq!(err.from, Confirmed);
        assert_eq!(
            err.to_string(),
            "invalid upload transition from confirmed to credential-requested"
        );
    }

    #[test]
    fn confirm_request_accepts_missing_optionals() {
        let req: ConfirmUploadRequest =
            serde_json::from_str(r#"{"object_key":"uploads/abc-photo.png"}"#).unwrap();
        assert!(req.task_id.is_none());
        assert!(req.sha256.is_none());
    }
}
