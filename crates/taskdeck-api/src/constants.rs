/// Route prefix for the versioned API, e.g. `/api/v0/tasks`
pub const API_PREFIX: &str = "/api/v0";

/// Largest JSON body accepted by any route; image bytes never pass through the service
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

pub const HTTP_CONCURRENCY_LIMIT: usize = 1_024;

/// Upper bound on the readiness check of each dependency
pub const READINESS_TIMEOUT_SECS: u64 = 5;
