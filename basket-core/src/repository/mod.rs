//! Data access layer (Repository pattern)
//!
//! Each aggregate root is one row; owned sub-collections live in JSON
//! columns and are written back together with the row. Writes are guarded
//! by the row's `version` so a stale read-modify-write is rejected.

pub mod location;
pub mod order;
pub mod product;
pub mod user;

pub use location::LocationRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

use crate::error::AppError;

/// Map a unique-key violation to `Conflict`, anything else to `Database`.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

/// Outcome of a versioned write that matched no row.
pub(crate) fn stale_write(exists: bool, entity: &str) -> AppError {
    if exists {
        AppError::Conflict(format!(
            "{} was modified concurrently, please retry",
            entity
        ))
    } else {
        AppError::NotFound(format!("{} not found", entity))
    }
}
