//! Whole-entity validation service.

use crate::error::{CoreError, FieldError, ValidationContext};
use crate::ski_lift::{SkiLift, FIRST_LIFT_DATE};
use crate::sport::Sport;
use crate::types::Date;

use super::rules::{
    commissioning_date_violation, id_violation, name_violation, sports_violation,
    text_violation, ValidationGroup, MAX_TEXT_LENGTH,
};

/// Applies the field rules to sports and ski lifts.
///
/// Built once at startup and handed to the services that need it.
#[derive(Debug, Clone)]
pub struct Validator {
    earliest_commissioning: Date,
    max_text_length: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Validator with the standard limits ([`FIRST_LIFT_DATE`], 500-char text).
    pub fn new() -> Self {
        Self {
            earliest_commissioning: FIRST_LIFT_DATE,
            max_text_length: MAX_TEXT_LENGTH,
        }
    }

    pub fn earliest_commissioning(&self) -> Date {
        self.earliest_commissioning
    }

    /// All field errors for a sport, in field order. Empty means valid.
    pub fn validate_sport(&self, sport: &Sport, group: ValidationGroup) -> Vec<FieldError> {
        let mut errors = Vec::new();
        push(&mut errors, "id", id_violation(sport.id(), group));
        push(&mut errors, "name", name_violation(sport.name()));
        push(
            &mut errors,
            "description",
            text_violation(sport.description(), self.max_text_length),
        );
        errors
    }

    /// All field errors for a ski lift, in field order. Empty means valid.
    pub fn validate_ski_lift(&self, lift: &SkiLift, group: ValidationGroup) -> Vec<FieldError> {
        let mut errors = Vec::new();
        push(&mut errors, "id", id_violation(lift.id(), group));
        push(&mut errors, "name", name_violation(lift.name()));
        push(
            &mut errors,
            "comment",
            text_violation(lift.comment(), self.max_text_length),
        );
        push(
            &mut errors,
            "available_sports",
            sports_violation(lift.available_sports().len(), group),
        );
        push(
            &mut errors,
            "commissioning_date",
            commissioning_date_violation(
                lift.commissioning_date(),
                self.earliest_commissioning,
                group,
            ),
        );
        errors
    }

    /// Fail with a MODEL validation error if the sport breaks any rule.
    pub fn ensure_sport_valid(&self, sport: &Sport, group: ValidationGroup) -> Result<(), CoreError> {
        into_result(Sport::ENTITY, self.validate_sport(sport, group))
    }

    /// Fail with a MODEL validation error if the lift breaks any rule.
    pub fn ensure_ski_lift_valid(
        &self,
        lift: &SkiLift,
        group: ValidationGroup,
    ) -> Result<(), CoreError> {
        into_result(SkiLift::ENTITY, self.validate_ski_lift(lift, group))
    }
}

fn push(errors: &mut Vec<FieldError>, field: &str, violation: Option<String>) {
    if let Some(message) = violation {
        errors.push(FieldError::new(field, message));
    }
}

fn into_result(model: &'static str, errors: Vec<FieldError>) -> Result<(), CoreError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation {
            model,
            context: ValidationContext::Model,
            errors,
        })
    }
}
