use std::fmt;

use serde::Serialize;

use crate::types::DbId;

/// Where a validation rule was evaluated.
///
/// Only used to select a message prefix at the boundary; the rule set itself
/// does not change with the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationContext {
    /// Field-shape rules on a built entity.
    Model,
    /// Shape rules on an inbound request payload.
    Request,
    /// Cross-record rules that are neither shape nor storage constraints.
    BusinessRule,
    /// Rules enforced right before (or by) the persistence gateway.
    Persistence,
}

impl ValidationContext {
    /// Wire form, e.g. `"BUSINESS_RULE"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Model => "MODEL",
            Self::Request => "REQUEST",
            Self::BusinessRule => "BUSINESS_RULE",
            Self::Persistence => "PERSISTENCE",
        }
    }

    /// Human-readable prefix used in error messages.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Model => "Invalid model",
            Self::Request => "Invalid request",
            Self::BusinessRule => "Business rule violated",
            Self::Persistence => "Persistence rule violated",
        }
    }
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-keyed validation failure.
///
/// Renders as `"<field>: <message>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{}: {model}: {}", .context.prefix(), join_field_errors(.errors))]
    Validation {
        model: &'static str,
        context: ValidationContext,
        errors: Vec<FieldError>,
    },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Duplicate {entity}: {field} '{value}' already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Validation failure carrying a single field error.
    pub fn field(
        model: &'static str,
        context: ValidationContext,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            model,
            context,
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Duplicate failure on the `name` field, the only unique field we have.
    pub fn duplicate_name(entity: &'static str, value: &str) -> Self {
        Self::Duplicate {
            entity,
            field: "name",
            value: value.to_string(),
        }
    }

    /// Field errors as `"<field>: <message>"` strings; empty for other variants.
    pub fn field_messages(&self) -> Vec<String> {
        match self {
            Self::Validation { errors, .. } => errors.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
