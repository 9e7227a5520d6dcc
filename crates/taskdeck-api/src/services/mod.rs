pub mod task_service;
pub mod upload;

pub use task_service::TaskService;
pub use upload::{UploadConfirmer, UploadIssuer};
