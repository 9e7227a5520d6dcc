//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use taskdeck_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskdeck API",
        version = "0.1.0",
        description = "Task tracking with direct-to-storage image uploads"
    ),
    paths(
        handlers::tasks::create_task,
        handlers::tasks::list_tasks,
        handlers::tasks::get_task,
        handlers::tasks::update_task_status,
        handlers::tasks::attach_image,
        handlers::tasks::delete_task,
        handlers::uploads::request_upload_credential,
        handlers::uploads::confirm_upload,
    ),
    components(
        schemas(
            models::Task,
            models::TaskStatus,
            models::CreateTaskRequest,
            models::UpdateTaskStatusRequest,
            models::AttachImageRequest,
            models::TaskListResponse,
            models::UploadCredentialRequest,
            models::UploadCredential,
            models::ConfirmUploadRequest,
            models::ConfirmUploadResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "tasks", description = "Create, list, update and delete tasks"),
        (name = "uploads", description = "Pre-signed image uploads and upload confirmation")
    )
)]
pub struct ApiDoc;
