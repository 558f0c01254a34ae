//! Shared result alias.

use crate::error::AppError;

/// Outcome of any fallible TestHub call. Failures carry an [`AppError`]
/// whose [`ErrorKind`](crate::error::ErrorKind) callers can branch on.
pub type AppResult<T> = Result<T, AppError>;
