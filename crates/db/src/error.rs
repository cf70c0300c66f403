//! Translation of `sqlx` failures into the core error taxonomy.

use skiadmin_core::error::{CoreError, ValidationContext};

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a storage fault with no domain meaning to [`CoreError::Internal`].
pub fn internal(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(err.to_string())
}

/// Map a failed write on `entity` named `name`.
///
/// - Unique violations on a `uq_*_name_lower` index become duplicates.
/// - Foreign key violations become BUSINESS_RULE validation errors.
/// - Everything else is internal.
pub fn write_error(entity: &'static str, name: &str, err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                return CoreError::duplicate_name(entity, name);
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return CoreError::field(
                    entity,
                    ValidationContext::BusinessRule,
                    "id",
                    format!("still referenced ({constraint})"),
                );
            }
            _ => {}
        }
    }
    internal(err)
}
