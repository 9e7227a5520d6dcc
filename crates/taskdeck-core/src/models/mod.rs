//! Data models for the application
//!
//! `task` holds the persistent entity and its request/response shapes; `upload`
//! holds the ephemeral upload-session types exchanged during the image flow.

mod task;
mod upload;

pub use task::*;
pub use upload::*;
