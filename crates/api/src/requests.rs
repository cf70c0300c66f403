//! Inbound request bodies for the sport and ski lift endpoints.
//!
//! Bodies are checked with `validator` before they are turned into domain
//! entities. Failures surface as REQUEST-context validation errors. The
//! name and text rules are the core ones, so a request and a built entity
//! report the same messages.

use std::collections::BTreeSet;

use serde::Deserialize;
use skiadmin_core::error::{CoreError, FieldError, ValidationContext};
use skiadmin_core::ski_lift::{LiftStatus, LiftType, SkiLift, SkiLiftBuilder};
use skiadmin_core::sport::{Season, Sport, SportBuilder};
use skiadmin_core::types::{Date, DbId};
use skiadmin_core::validation::rules::{name_violation, text_violation, MAX_TEXT_LENGTH};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

/// Body of `POST /sports` and `PUT /sports/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SportRequest {
    pub id: Option<DbId>,
    #[validate(required(message = "must not be null"), custom(function = "check_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "check_text"))]
    pub description: Option<String>,
    pub active: Option<bool>,
    #[validate(required(message = "must not be null"))]
    pub season: Option<Season>,
}

impl SportRequest {
    const FIELDS: &'static [&'static str] = &["id", "name", "description", "active", "season"];

    /// Validate the body and build the sport it describes.
    ///
    /// `path_id` is the identifier from the URL on update; a body `id` that
    /// disagrees with it is rejected.
    pub fn into_sport(self, path_id: Option<DbId>) -> Result<Sport, AppError> {
        let id = resolve_id(path_id, self.id)?;
        self.validate()
            .map_err(|e| request_error(Sport::ENTITY, Self::FIELDS, &e))?;

        let builder = SportBuilder {
            id,
            name: self.name,
            description: self.description,
            active: self.active,
            season: self.season,
        };
        Ok(builder.build()?)
    }
}

// ---------------------------------------------------------------------------
// Ski lift
// ---------------------------------------------------------------------------

/// Body of `POST /ski-lifts` and `PUT /ski-lifts/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SkiLiftRequest {
    pub id: Option<DbId>,
    #[validate(required(message = "must not be null"), custom(function = "check_name"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(required(message = "must not be null"))]
    pub lift_type: Option<LiftType>,
    #[validate(required(message = "must not be null"))]
    pub status: Option<LiftStatus>,
    #[validate(custom(function = "check_text"))]
    pub comment: Option<String>,
    #[validate(
        required(message = "must not be null"),
        length(min = 1, message = "must not be empty")
    )]
    pub available_sports: Option<Vec<DbId>>,
    #[validate(required(message = "must not be null"))]
    pub commissioning_date: Option<Date>,
}

impl SkiLiftRequest {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "type",
        "status",
        "comment",
        "available_sports",
        "commissioning_date",
    ];

    /// Validate the body and build the ski lift it describes.
    pub fn into_ski_lift(self, path_id: Option<DbId>) -> Result<SkiLift, AppError> {
        let id = resolve_id(path_id, self.id)?;
        self.validate()
            .map_err(|e| request_error(SkiLift::ENTITY, Self::FIELDS, &e))?;

        let builder = SkiLiftBuilder {
            id,
            name: self.name,
            lift_type: self.lift_type,
            status: self.status,
            comment: self.comment,
            available_sports: self
                .available_sports
                .unwrap_or_default()
                .into_iter()
                .collect::<BTreeSet<_>>(),
            commissioning_date: self.commissioning_date,
        };
        Ok(builder.build()?)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_name(name: &str) -> Result<(), ValidationError> {
    violation("name", name_violation(name))
}

fn check_text(text: &str) -> Result<(), ValidationError> {
    violation("length", text_violation(text, MAX_TEXT_LENGTH))
}

fn violation(code: &'static str, message: Option<String>) -> Result<(), ValidationError> {
    match message {
        Some(message) => {
            let mut err = ValidationError::new(code);
            err.message = Some(message.into());
            Err(err)
        }
        None => Ok(()),
    }
}

/// The path identifier wins; a conflicting body identifier is a bad request.
fn resolve_id(path_id: Option<DbId>, body_id: Option<DbId>) -> Result<Option<DbId>, AppError> {
    match (path_id, body_id) {
        (Some(path), Some(body)) if path != body => Err(AppError::BadRequest(format!(
            "Body id {body} does not match path id {path}"
        ))),
        (Some(path), _) => Ok(Some(path)),
        (None, body) => Ok(body),
    }
}

/// Convert `validator` output into a REQUEST validation error.
///
/// Fields follow declaration order and report their first failure only, so
/// the result is deterministic.
fn request_error(model: &'static str, order: &[&str], errors: &ValidationErrors) -> CoreError {
    let mut fields: Vec<(usize, FieldError)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, failures)| {
            let mut field = field.to_string();
            if field == "lift_type" {
                field = "type".to_string();
            }
            let first = failures.first()?;
            let message = first
                .message
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| first.code.to_string());
            let rank = order.iter().position(|f| *f == field).unwrap_or(order.len());
            Some((rank, FieldError::new(field, message)))
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.field.cmp(&b.1.field)));

    CoreError::Validation {
        model,
        context: ValidationContext::Request,
        errors: fields.into_iter().map(|(_, e)| e).collect(),
    }
}
