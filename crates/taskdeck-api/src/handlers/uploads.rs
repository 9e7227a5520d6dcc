use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use taskdeck_core::models::{
    ConfirmUploadRequest, ConfirmUploadResponse, UploadCredential, UploadCredentialRequest,
};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Issue a pre-signed PUT URL for a new image object.
///
/// The client sends the bytes straight to `upload_url` with the returned
/// `Content-Type`, then calls the confirm endpoint with `object_key`.
#[utoipa::path(
    post,
    path = "/api/v0/uploads/presigned",
    tag = "uploads",
    request_body = UploadCredentialRequest,
    responses(
        (status = 200, description = "Upload credential issued", body = UploadCredential),
        (status = 400, description = "Invalid filename or content type", body = ErrorResponse),
        (status = 502, description = "Storage rejected the service credentials", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(filename = %request.filename, operation = "request_upload_credential"))]
pub async fn request_upload_credential(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadCredentialRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let credential = state.upload_issuer.request_credential(request).await?;
    Ok(Json(credential))
}

/// Confirm a finished upload and, when `task_id` is given, attach it to the task.
#[utoipa::path(
    post,
    path = "/api/v0/uploads/complete",
    tag = "uploads",
    request_body = ConfirmUploadRequest,
    responses(
        (status = 200, description = "Upload confirmed", body = ConfirmUploadResponse),
        (status = 400, description = "Invalid object key or sha256 mismatch", body = ErrorResponse),
        (status = 404, description = "Object or task not found", body = ErrorResponse),
        (status = 413, description = "Object exceeds the image size limit", body = ErrorResponse),
        (status = 502, description = "Storage request failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(object_key = %request.object_key, operation = "confirm_upload"))]
pub async fn confirm_upload(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ConfirmUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let confirmed = state.upload_confirmer.confirm(request).await?;
    Ok(Json(confirmed))
}
