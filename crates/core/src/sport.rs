//! Sport entity: a winter (or summer) activity offered at the resort.

use serde::Serialize;

use crate::error::{CoreError, FieldError, ValidationContext};
use crate::types::{define_label_enum, DbId};

define_label_enum! {
    /// Season in which a sport is practised.
    Season {
        Winter = "WINTER",
        Summer = "SUMMER",
        Both = "BOTH",
    }
}

/// Immutable sport value. Build with [`Sport::builder`]; change with
/// [`Sport::to_builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sport {
    id: Option<DbId>,
    name: String,
    description: String,
    active: bool,
    season: Season,
}

impl Sport {
    /// Entity kind used in error payloads.
    pub const ENTITY: &'static str = "Sport";

    pub fn builder() -> SportBuilder {
        SportBuilder::default()
    }

    pub fn id(&self) -> Option<DbId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// Staging copy carrying every current field value.
    pub fn to_builder(&self) -> SportBuilder {
        SportBuilder {
            id: self.id,
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            active: Some(self.active),
            season: Some(self.season),
        }
    }

    /// Persisted copy with a store-assigned identifier.
    pub fn with_id(&self, id: DbId) -> Sport {
        Sport {
            id: Some(id),
            ..self.clone()
        }
    }
}

/// Mutable staging struct for [`Sport`].
///
/// Unset `description` becomes the empty string and unset `active` becomes
/// `true`; `name` and `season` are required.
#[derive(Debug, Clone, Default)]
pub struct SportBuilder {
    pub id: Option<DbId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
    pub season: Option<Season>,
}

impl SportBuilder {
    pub fn id(mut self, id: DbId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    /// Freeze into an immutable [`Sport`].
    ///
    /// Fails with a MODEL validation error listing every missing required
    /// field.
    pub fn build(self) -> Result<Sport, CoreError> {
        let mut errors = Vec::new();
        if self.name.is_none() {
            errors.push(FieldError::new("name", "must not be null"));
        }
        if self.season.is_none() {
            errors.push(FieldError::new("season", "must not be null"));
        }

        match (self.name, self.season) {
            (Some(name), Some(season)) => Ok(Sport {
                id: self.id,
                name,
                description: self.description.unwrap_or_default(),
                active: self.active.unwrap_or(true),
                season,
            }),
            _ => Err(CoreError::Validation {
                model: Sport::ENTITY,
                context: ValidationContext::Model,
                errors,
            }),
        }
    }
}
