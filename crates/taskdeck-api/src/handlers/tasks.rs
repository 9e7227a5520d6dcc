use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use taskdeck_core::models::{
    AttachImageRequest, CreateTaskRequest, Task, TaskListQuery, TaskListResponse,
    UpdateTaskStatusRequest,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v0/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid title, status or image URL", body = ErrorResponse),
        (status = 500, description = "Task store unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_task"))]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let task = state.tasks.create_task(request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    get,
    path = "/api/v0/tasks",
    tag = "tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "One page of tasks in creation order", body = TaskListResponse),
        (status = 400, description = "Invalid status, page or limit", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_tasks"))]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<TaskListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = state.tasks.list_tasks(query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v0/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "The task", body = Task),
        (status = 404, description = "No task with this id", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_task"))]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let task = state.tasks.get_task(id).await?;
    Ok(Json(task))
}

#[utoipa::path(
    patch,
    path = "/api/v0/tasks/{id}/status",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskStatusRequest,
    responses(
        (status = 204, description = "Status updated"),
        (status = 400, description = "Unknown status value", body = ErrorResponse),
        (status = 404, description = "No task with this id", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(status = %request.status, operation = "update_task_status"))]
pub async fn update_task_status(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTaskStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.tasks.update_task_status(id, request.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/v0/tasks/{id}/image",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = AttachImageRequest,
    responses(
        (status = 204, description = "Image reference stored"),
        (status = 400, description = "image_url is not a URL", body = ErrorResponse),
        (status = 404, description = "No task with this id", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "attach_image"))]
pub async fn attach_image(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(request): ValidatedJson<AttachImageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(taskdeck_core::AppError::from)?;
    state.tasks.attach_image(id, &request.image_url).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/v0/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted, or there was no such task")
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_task"))]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.tasks.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
