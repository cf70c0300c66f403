//! Persistence gateway contract.
//!
//! Every backend (the in-memory one here, PostgreSQL in `skiadmin-db`)
//! implements these traits and raises the same typed errors for the same
//! invariant violations:
//!
//! - `create` with an identifier or a blank name: validation (PERSISTENCE)
//! - lift `create`/`update` without a commissioning date: validation (PERSISTENCE)
//! - `create`/`update` with a name already used by another record: duplicate
//! - lift `create`/`update` naming an unknown sport: not found (lowest id)
//! - `update`/`delete` of an unknown identifier: not found
//! - `delete` of a sport some lift still offers: validation (BUSINESS_RULE)
//!
//! Identifiers are assigned by the store, start at 1 and are never reused.

pub mod memory;

use async_trait::async_trait;

use crate::error::{CoreError, ValidationContext};
use crate::ski_lift::SkiLift;
use crate::sport::Sport;
use crate::types::DbId;

pub use memory::{InMemorySkiLiftStore, InMemorySportStore};

/// Storage for sports.
#[async_trait]
pub trait SportStore: Send + Sync {
    /// Persist a new sport and return it with its assigned identifier.
    async fn create(&self, sport: &Sport) -> Result<Sport, CoreError>;

    /// All sports, in backend-defined order.
    async fn find_all(&self) -> Result<Vec<Sport>, CoreError>;

    /// The sport with `id`, or `None`. Never fails for a missing id.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Sport>, CoreError>;

    /// Replace the stored fields of an existing sport.
    async fn update(&self, sport: &Sport) -> Result<Sport, CoreError>;

    /// Remove the sport with `id`. Refused while a lift still offers it.
    async fn delete(&self, id: DbId) -> Result<(), CoreError>;

    async fn exists_by_id(&self, id: DbId) -> Result<bool, CoreError>;

    /// Whether another sport (other than `excluding`) already uses `name`,
    /// compared case-insensitively.
    async fn exists_by_name(&self, name: &str, excluding: Option<DbId>)
        -> Result<bool, CoreError>;

    /// Backend liveness probe.
    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Storage for ski lifts and their sport associations.
#[async_trait]
pub trait SkiLiftStore: Send + Sync {
    async fn create(&self, lift: &SkiLift) -> Result<SkiLift, CoreError>;

    async fn find_all(&self) -> Result<Vec<SkiLift>, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<SkiLift>, CoreError>;

    async fn update(&self, lift: &SkiLift) -> Result<SkiLift, CoreError>;

    /// Remove the lift with `id`, detaching its sports first.
    async fn delete(&self, id: DbId) -> Result<(), CoreError>;

    async fn exists_by_id(&self, id: DbId) -> Result<bool, CoreError>;

    async fn exists_by_name(&self, name: &str, excluding: Option<DbId>)
        -> Result<bool, CoreError>;

    /// Number of lifts offering the sport `sport_id`.
    async fn count_by_sport(&self, sport_id: DbId) -> Result<i64, CoreError>;

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Case-insensitive name equality used for uniqueness and rename detection.
pub fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// PERSISTENCE validation error for `id` present on create.
pub fn predefined_id_error(entity: &'static str) -> CoreError {
    CoreError::field(
        entity,
        ValidationContext::Persistence,
        "id",
        "must be null on create; identifiers are assigned by the server",
    )
}

/// PERSISTENCE validation error for `id` missing on update.
pub fn missing_id_error(entity: &'static str) -> CoreError {
    CoreError::field(
        entity,
        ValidationContext::Persistence,
        "id",
        "must not be null on update",
    )
}

/// PERSISTENCE validation error for a blank name.
pub fn blank_name_error(entity: &'static str) -> CoreError {
    CoreError::field(entity, ValidationContext::Persistence, "name", "must not be blank")
}

/// PERSISTENCE validation error for a lift without a commissioning date.
pub fn missing_commissioning_date_error() -> CoreError {
    CoreError::field(
        SkiLift::ENTITY,
        ValidationContext::Persistence,
        "commissioning_date",
        "must not be null",
    )
}

/// BUSINESS_RULE validation error for deleting a sport that is still offered.
pub fn sport_in_use_error(lifts: i64) -> CoreError {
    CoreError::field(
        Sport::ENTITY,
        ValidationContext::BusinessRule,
        "id",
        format!("sport is still offered by {lifts} ski lift(s)"),
    )
}
