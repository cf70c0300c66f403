//! Ski lift row model.

use skiadmin_core::error::CoreError;
use skiadmin_core::ski_lift::{LiftStatus, LiftType, SkiLift};
use skiadmin_core::types::{Date, DbId, UnknownLabel};
use sqlx::FromRow;

/// A `ski_lifts` row joined with its aggregated `ski_lift_sports` ids.
#[derive(Debug, Clone, FromRow)]
pub struct SkiLiftRow {
    pub id: DbId,
    pub name: String,
    pub lift_type: String,
    pub status: String,
    pub comment: String,
    pub commissioning_date: Date,
    pub sport_ids: Vec<DbId>,
}

fn corrupt(err: UnknownLabel) -> CoreError {
    CoreError::Internal(err.to_string())
}

impl TryFrom<SkiLiftRow> for SkiLift {
    type Error = CoreError;

    fn try_from(row: SkiLiftRow) -> Result<Self, Self::Error> {
        let lift_type: LiftType = row.lift_type.parse().map_err(corrupt)?;
        let status: LiftStatus = row.status.parse().map_err(corrupt)?;
        SkiLift::builder()
            .id(row.id)
            .name(row.name)
            .lift_type(lift_type)
            .status(status)
            .comment(row.comment)
            .sports(row.sport_ids)
            .commissioning_date(row.commissioning_date)
            .build()
    }
}
