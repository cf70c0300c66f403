//! Ski lift entity and its lookup enums.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{CoreError, FieldError, ValidationContext};
use crate::types::{define_label_enum, Date, DbId};

/// Earliest accepted commissioning date: the first surface lift went into
/// service in 1908.
pub const FIRST_LIFT_DATE: Date = match Date::from_ymd_opt(1908, 1, 1) {
    Some(date) => date,
    None => panic!("1908-01-01 is a valid calendar date"),
};

define_label_enum! {
    /// Mechanical kind of lift.
    LiftType {
        Chairlift = "CHAIRLIFT",
        Draglift = "DRAGLIFT",
        Gondola = "GONDOLA",
        Funicular = "FUNICULAR",
    }
}

define_label_enum! {
    /// Operating status of a lift.
    LiftStatus {
        Open = "OPEN",
        Closed = "CLOSED",
        Maintenance = "MAINTENANCE",
    }
}

/// Immutable ski lift value.
///
/// `available_sports` holds sport identifiers; the referenced sports live in
/// the sport store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkiLift {
    id: Option<DbId>,
    name: String,
    #[serde(rename = "type")]
    lift_type: LiftType,
    status: LiftStatus,
    comment: String,
    available_sports: BTreeSet<DbId>,
    commissioning_date: Option<Date>,
}

impl SkiLift {
    /// Entity kind used in error payloads.
    pub const ENTITY: &'static str = "SkiLift";

    pub fn builder() -> SkiLiftBuilder {
        SkiLiftBuilder::default()
    }

    pub fn id(&self) -> Option<DbId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lift_type(&self) -> LiftType {
        self.lift_type
    }

    pub fn status(&self) -> LiftStatus {
        self.status
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn available_sports(&self) -> &BTreeSet<DbId> {
        &self.available_sports
    }

    pub fn commissioning_date(&self) -> Option<Date> {
        self.commissioning_date
    }

    pub fn to_builder(&self) -> SkiLiftBuilder {
        SkiLiftBuilder {
            id: self.id,
            name: Some(self.name.clone()),
            lift_type: Some(self.lift_type),
            status: Some(self.status),
            comment: Some(self.comment.clone()),
            available_sports: self.available_sports.clone(),
            commissioning_date: self.commissioning_date,
        }
    }

    /// Persisted copy with a store-assigned identifier.
    pub fn with_id(&self, id: DbId) -> SkiLift {
        SkiLift {
            id: Some(id),
            ..self.clone()
        }
    }

    /// Copy with every sport association removed.
    pub fn without_sports(&self) -> SkiLift {
        SkiLift {
            available_sports: BTreeSet::new(),
            ..self.clone()
        }
    }
}

/// Mutable staging struct for [`SkiLift`].
///
/// `name`, `lift_type` and `status` are required. An unset comment becomes
/// the empty string. The commissioning date may stay unset here; the
/// create/update rule groups require it.
#[derive(Debug, Clone, Default)]
pub struct SkiLiftBuilder {
    pub id: Option<DbId>,
    pub name: Option<String>,
    pub lift_type: Option<LiftType>,
    pub status: Option<LiftStatus>,
    pub comment: Option<String>,
    pub available_sports: BTreeSet<DbId>,
    pub commissioning_date: Option<Date>,
}

impl SkiLiftBuilder {
    pub fn id(mut self, id: DbId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn lift_type(mut self, lift_type: LiftType) -> Self {
        self.lift_type = Some(lift_type);
        self
    }

    pub fn status(mut self, status: LiftStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn sport(mut self, sport_id: DbId) -> Self {
        self.available_sports.insert(sport_id);
        self
    }

    pub fn sports(mut self, sport_ids: impl IntoIterator<Item = DbId>) -> Self {
        self.available_sports.extend(sport_ids);
        self
    }

    pub fn commissioning_date(mut self, date: Date) -> Self {
        self.commissioning_date = Some(date);
        self
    }

    /// Freeze into an immutable [`SkiLift`].
    pub fn build(self) -> Result<SkiLift, CoreError> {
        let mut errors = Vec::new();
        if self.name.is_none() {
            errors.push(FieldError::new("name", "must not be null"));
        }
        if self.lift_type.is_none() {
            errors.push(FieldError::new("type", "must not be null"));
        }
        if self.status.is_none() {
            errors.push(FieldError::new("status", "must not be null"));
        }

        match (self.name, self.lift_type, self.status) {
            (Some(name), Some(lift_type), Some(status)) => Ok(SkiLift {
                id: self.id,
                name,
                lift_type,
                status,
                comment: self.comment.unwrap_or_default(),
                available_sports: self.available_sports,
                commissioning_date: self.commissioning_date,
            }),
            _ => Err(CoreError::Validation {
                model: SkiLift::ENTITY,
                context: ValidationContext::Model,
                errors,
            }),
        }
    }
}
