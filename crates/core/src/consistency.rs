//! Cross-record invariants checked against the persistence gateway.
//!
//! These checks only read from the stores. Each one short-circuits on the
//! first failure, in this order: predefined identifier, blank name,
//! duplicate name, referenced sports.

use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::ski_lift::SkiLift;
use crate::sport::Sport;
use crate::store::{
    blank_name_error, missing_id_error, predefined_id_error, same_name, sport_in_use_error,
    SkiLiftStore, SportStore,
};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Shared steps
// ---------------------------------------------------------------------------

/// Reject identifiers supplied by the caller on create.
pub fn ensure_no_identifier(entity: &'static str, id: Option<DbId>) -> Result<(), CoreError> {
    match id {
        Some(_) => Err(predefined_id_error(entity)),
        None => Ok(()),
    }
}

fn require_identifier(entity: &'static str, id: Option<DbId>) -> Result<DbId, CoreError> {
    id.ok_or_else(|| missing_id_error(entity))
}

fn ensure_name_present(entity: &'static str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        Err(blank_name_error(entity))
    } else {
        Ok(())
    }
}

/// Every referenced sport must exist. Reports the lowest missing id.
pub async fn ensure_sports_exist(
    sports: &dyn SportStore,
    sport_ids: &BTreeSet<DbId>,
) -> Result<(), CoreError> {
    for &id in sport_ids {
        if !sports.exists_by_id(id).await? {
            return Err(CoreError::NotFound {
                entity: Sport::ENTITY,
                id,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Sports
// ---------------------------------------------------------------------------

pub async fn check_sport_create(sports: &dyn SportStore, sport: &Sport) -> Result<(), CoreError> {
    ensure_no_identifier(Sport::ENTITY, sport.id())?;
    ensure_name_present(Sport::ENTITY, sport.name())?;
    if sports.exists_by_name(sport.name(), None).await? {
        return Err(CoreError::duplicate_name(Sport::ENTITY, sport.name()));
    }
    Ok(())
}

/// Check an update candidate and return the currently stored record.
///
/// Uniqueness is only re-checked when the name changed beyond letter case.
pub async fn check_sport_update(
    sports: &dyn SportStore,
    sport: &Sport,
) -> Result<Sport, CoreError> {
    let id = require_identifier(Sport::ENTITY, sport.id())?;
    let existing = sports
        .find_by_id(id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: Sport::ENTITY,
            id,
        })?;
    ensure_name_present(Sport::ENTITY, sport.name())?;
    if !same_name(existing.name(), sport.name())
        && sports.exists_by_name(sport.name(), Some(id)).await?
    {
        return Err(CoreError::duplicate_name(Sport::ENTITY, sport.name()));
    }
    Ok(existing)
}

/// A sport can only be deleted once no lift offers it anymore.
pub async fn check_sport_delete(
    sports: &dyn SportStore,
    lifts: &dyn SkiLiftStore,
    id: DbId,
) -> Result<(), CoreError> {
    if !sports.exists_by_id(id).await? {
        return Err(CoreError::NotFound {
            entity: Sport::ENTITY,
            id,
        });
    }
    let in_use = lifts.count_by_sport(id).await?;
    if in_use > 0 {
        return Err(sport_in_use_error(in_use));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Ski lifts
// ---------------------------------------------------------------------------

pub async fn check_ski_lift_create(
    lifts: &dyn SkiLiftStore,
    sports: &dyn SportStore,
    lift: &SkiLift,
) -> Result<(), CoreError> {
    ensure_no_identifier(SkiLift::ENTITY, lift.id())?;
    ensure_name_present(SkiLift::ENTITY, lift.name())?;
    if lifts.exists_by_name(lift.name(), None).await? {
        return Err(CoreError::duplicate_name(SkiLift::ENTITY, lift.name()));
    }
    ensure_sports_exist(sports, lift.available_sports()).await
}

/// Check an update candidate and return the currently stored record.
pub async fn check_ski_lift_update(
    lifts: &dyn SkiLiftStore,
    sports: &dyn SportStore,
    lift: &SkiLift,
) -> Result<SkiLift, CoreError> {
    let id = require_identifier(SkiLift::ENTITY, lift.id())?;
    let existing = lifts
        .find_by_id(id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: SkiLift::ENTITY,
            id,
        })?;
    ensure_name_present(SkiLift::ENTITY, lift.name())?;
    if !same_name(existing.name(), lift.name())
        && lifts.exists_by_name(lift.name(), Some(id)).await?
    {
        return Err(CoreError::duplicate_name(SkiLift::ENTITY, lift.name()));
    }
    ensure_sports_exist(sports, lift.available_sports()).await?;
    Ok(existing)
}

pub async fn check_ski_lift_delete(lifts: &dyn SkiLiftStore, id: DbId) -> Result<(), CoreError> {
    if lifts.exists_by_id(id).await? {
        Ok(())
    } else {
        Err(CoreError::NotFound {
            entity: SkiLift::ENTITY,
            id,
        })
    }
}
