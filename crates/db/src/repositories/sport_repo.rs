//! Repository for the `sports` table.

use async_trait::async_trait;
use skiadmin_core::error::CoreError;
use skiadmin_core::sport::Sport;
use skiadmin_core::store::{
    blank_name_error, missing_id_error, predefined_id_error, same_name, sport_in_use_error,
    SportStore,
};
use skiadmin_core::types::DbId;
use sqlx::PgPool;

use crate::error::{internal, write_error};
use crate::models::sport::SportRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, active, season";

/// PostgreSQL-backed [`SportStore`].
#[derive(Clone)]
pub struct PgSportStore {
    pool: PgPool,
}

impl PgSportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SportStore for PgSportStore {
    async fn create(&self, sport: &Sport) -> Result<Sport, CoreError> {
        if sport.id().is_some() {
            return Err(predefined_id_error(Sport::ENTITY));
        }
        if sport.name().trim().is_empty() {
            return Err(blank_name_error(Sport::ENTITY));
        }

        let mut tx = self.pool.begin().await.map_err(internal)?;

        let taken: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sports WHERE lower(name) = lower($1)")
                .bind(sport.name())
                .fetch_one(&mut *tx)
                .await
                .map_err(internal)?;
        if taken > 0 {
            return Err(CoreError::duplicate_name(Sport::ENTITY, sport.name()));
        }

        let query = format!(
            "INSERT INTO sports (name, description, active, season) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SportRow>(&query)
            .bind(sport.name())
            .bind(sport.description())
            .bind(sport.is_active())
            .bind(sport.season().as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| write_error(Sport::ENTITY, sport.name(), e))?;

        tx.commit().await.map_err(internal)?;
        Sport::try_from(row)
    }

    /// All sports ordered by id.
    async fn find_all(&self) -> Result<Vec<Sport>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM sports ORDER BY id");
        let rows = sqlx::query_as::<_, SportRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        rows.into_iter().map(Sport::try_from).collect()
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Sport>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM sports WHERE id = $1");
        let row = sqlx::query_as::<_, SportRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        row.map(Sport::try_from).transpose()
    }

    /// Update in one transaction: lock the row, re-check the name if it
    /// changed, write.
    async fn update(&self, sport: &Sport) -> Result<Sport, CoreError> {
        let id = sport.id().ok_or_else(|| missing_id_error(Sport::ENTITY))?;
        if sport.name().trim().is_empty() {
            return Err(blank_name_error(Sport::ENTITY));
        }

        let mut tx = self.pool.begin().await.map_err(internal)?;

        let current_name: String =
            sqlx::query_scalar("SELECT name FROM sports WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(internal)?
                .ok_or(CoreError::NotFound {
                    entity: Sport::ENTITY,
                    id,
                })?;

        if !same_name(&current_name, sport.name()) {
            let taken: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sports WHERE lower(name) = lower($1) AND id <> $2",
            )
            .bind(sport.name())
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(internal)?;
            if taken > 0 {
                return Err(CoreError::duplicate_name(Sport::ENTITY, sport.name()));
            }
        }

        let query = format!(
            "UPDATE sports SET \
                name = $2, \
                description = $3, \
                active = $4, \
                season = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SportRow>(&query)
            .bind(id)
            .bind(sport.name())
            .bind(sport.description())
            .bind(sport.is_active())
            .bind(sport.season().as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| write_error(Sport::ENTITY, sport.name(), e))?;

        tx.commit().await.map_err(internal)?;
        Sport::try_from(row)
    }

    /// Delete in one transaction: lock the row, refuse while lifts still
    /// offer the sport, delete. The `ski_lift_sports` foreign key backs the
    /// count check.
    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(internal)?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM sports WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(internal)?;
        if locked.is_none() {
            return Err(CoreError::NotFound {
                entity: Sport::ENTITY,
                id,
            });
        }

        let in_use: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ski_lift_sports WHERE sport_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(internal)?;
        if in_use > 0 {
            return Err(sport_in_use_error(in_use));
        }

        sqlx::query("DELETE FROM sports WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(Sport::ENTITY, "", e))?;

        tx.commit().await.map_err(internal)?;
        Ok(())
    }

    async fn exists_by_id(&self, id: DbId) -> Result<bool, CoreError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM sports WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(internal)
    }

    async fn exists_by_name(
        &self,
        name: &str,
        excluding: Option<DbId>,
    ) -> Result<bool, CoreError> {
        sqlx::query_scalar(
            "SELECT EXISTS (\
                SELECT 1 FROM sports \
                WHERE lower(name) = lower($1) AND ($2::BIGINT IS NULL OR id <> $2)\
             )",
        )
        .bind(name)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await
        .map_err(internal)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(internal)
    }
}
