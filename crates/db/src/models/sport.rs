//! Sport row model.

use skiadmin_core::error::CoreError;
use skiadmin_core::sport::{Season, Sport};
use skiadmin_core::types::{DbId, UnknownLabel};
use sqlx::FromRow;

/// A row from the `sports` table.
#[derive(Debug, Clone, FromRow)]
pub struct SportRow {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub season: String,
}

impl TryFrom<SportRow> for Sport {
    type Error = CoreError;

    fn try_from(row: SportRow) -> Result<Self, Self::Error> {
        let season: Season = row
            .season
            .parse()
            .map_err(|e: UnknownLabel| CoreError::Internal(e.to_string()))?;
        Sport::builder()
            .id(row.id)
            .name(row.name)
            .description(row.description)
            .active(row.active)
            .season(season)
            .build()
    }
}
