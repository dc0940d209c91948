//! Shared types for Lodge
//!
//! Domain models, request/response DTOs, the unified error system and the
//! pure stay arithmetic used by the server and its clients.

pub mod error;
pub mod models;
pub mod request;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use request::{ListQuery, Page, PaginationQuery};
