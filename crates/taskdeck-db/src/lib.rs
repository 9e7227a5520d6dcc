//! Taskdeck Database Library
//!
//! The Task Store: a single `tasks` table with filter-by-status, pagination and
//! creation-time ordering. [`TaskStore`] is the seam the service layer depends on;
//! [`TaskRepository`] is the PostgreSQL implementation.

pub mod store;
pub mod task;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use store::{NewTask, TaskFilter, TaskStore};
pub use task::TaskRepository;
