//! Services composing validation, consistency checks and storage.
//!
//! Handlers call these instead of the stores directly so that every write
//! goes through the same sequence: predefined-identifier check, field rules,
//! cross-record checks, then the store.

use std::sync::Arc;

use crate::consistency;
use crate::error::CoreError;
use crate::ski_lift::SkiLift;
use crate::sport::Sport;
use crate::store::{InMemorySkiLiftStore, InMemorySportStore, SkiLiftStore, SportStore};
use crate::types::DbId;
use crate::validation::{ValidationGroup, Validator};

/// Both services wired to the same stores and validator.
#[derive(Clone)]
pub struct Services {
    pub sports: SportService,
    pub ski_lifts: SkiLiftService,
}

impl Services {
    pub fn new(
        validator: Arc<Validator>,
        sports: Arc<dyn SportStore>,
        lifts: Arc<dyn SkiLiftStore>,
    ) -> Self {
        Self {
            sports: SportService::new(Arc::clone(&validator), Arc::clone(&sports), Arc::clone(&lifts)),
            ski_lifts: SkiLiftService::new(validator, sports, lifts),
        }
    }

    /// Services backed by one fresh in-memory backend.
    pub fn in_memory(validator: Arc<Validator>) -> Self {
        let sports = InMemorySportStore::new();
        let lifts = InMemorySkiLiftStore::for_sports(&sports);
        Self::new(validator, Arc::new(sports), Arc::new(lifts))
    }
}

// ---------------------------------------------------------------------------
// Sports
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SportService {
    validator: Arc<Validator>,
    sports: Arc<dyn SportStore>,
    lifts: Arc<dyn SkiLiftStore>,
}

impl SportService {
    pub fn new(
        validator: Arc<Validator>,
        sports: Arc<dyn SportStore>,
        lifts: Arc<dyn SkiLiftStore>,
    ) -> Self {
        Self {
            validator,
            sports,
            lifts,
        }
    }

    pub async fn create(&self, sport: &Sport) -> Result<Sport, CoreError> {
        consistency::ensure_no_identifier(Sport::ENTITY, sport.id())?;
        self.validator
            .ensure_sport_valid(sport, ValidationGroup::Create)?;
        consistency::check_sport_create(self.sports.as_ref(), sport).await?;

        let created = self.sports.create(sport).await?;
        tracing::info!(sport_id = ?created.id(), name = %created.name(), "Sport created");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<Sport>, CoreError> {
        self.sports.find_all().await
    }

    /// The sport with `id`, or a not-found error.
    pub async fn get(&self, id: DbId) -> Result<Sport, CoreError> {
        self.sports
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: Sport::ENTITY,
                id,
            })
    }

    pub async fn update(&self, sport: &Sport) -> Result<Sport, CoreError> {
        self.validator
            .ensure_sport_valid(sport, ValidationGroup::Update)?;
        let previous = consistency::check_sport_update(self.sports.as_ref(), sport).await?;

        let updated = self.sports.update(sport).await?;
        tracing::info!(
            sport_id = ?updated.id(),
            previous_name = %previous.name(),
            name = %updated.name(),
            "Sport updated"
        );
        Ok(updated)
    }

    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        consistency::check_sport_delete(self.sports.as_ref(), self.lifts.as_ref(), id).await?;
        self.sports.delete(id).await?;
        tracing::info!(sport_id = id, "Sport deleted");
        Ok(())
    }

    /// Liveness of the backing store.
    pub async fn ping(&self) -> Result<(), CoreError> {
        self.sports.ping().await
    }
}

// ---------------------------------------------------------------------------
// Ski lifts
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SkiLiftService {
    validator: Arc<Validator>,
    sports: Arc<dyn SportStore>,
    lifts: Arc<dyn SkiLiftStore>,
}

impl SkiLiftService {
    pub fn new(
        validator: Arc<Validator>,
        sports: Arc<dyn SportStore>,
        lifts: Arc<dyn SkiLiftStore>,
    ) -> Self {
        Self {
            validator,
            sports,
            lifts,
        }
    }

    pub async fn create(&self, lift: &SkiLift) -> Result<SkiLift, CoreError> {
        consistency::ensure_no_identifier(SkiLift::ENTITY, lift.id())?;
        self.validator
            .ensure_ski_lift_valid(lift, ValidationGroup::Create)?;
        consistency::check_ski_lift_create(self.lifts.as_ref(), self.sports.as_ref(), lift)
            .await?;

        let created = self.lifts.create(lift).await?;
        tracing::info!(
            lift_id = ?created.id(),
            name = %created.name(),
            sports = created.available_sports().len(),
            "Ski lift created"
        );
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<SkiLift>, CoreError> {
        self.lifts.find_all().await
    }

    /// The lift with `id`, or a not-found error.
    pub async fn get(&self, id: DbId) -> Result<SkiLift, CoreError> {
        self.lifts
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: SkiLift::ENTITY,
                id,
            })
    }

    pub async fn update(&self, lift: &SkiLift) -> Result<SkiLift, CoreError> {
        self.validator
            .ensure_ski_lift_valid(lift, ValidationGroup::Update)?;
        consistency::check_ski_lift_update(self.lifts.as_ref(), self.sports.as_ref(), lift)
            .await?;

        let updated = self.lifts.update(lift).await?;
        tracing::info!(lift_id = ?updated.id(), name = %updated.name(), "Ski lift updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        consistency::check_ski_lift_delete(self.lifts.as_ref(), id).await?;
        self.lifts.delete(id).await?;
        tracing::info!(lift_id = id, "Ski lift deleted");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), CoreError> {
        self.lifts.ping().await
    }
}
