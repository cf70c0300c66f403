//! Repository for the `ski_lifts` and `ski_lift_sports` tables.

use std::collections::BTreeSet;

use async_trait::async_trait;
use skiadmin_core::error::CoreError;
use skiadmin_core::ski_lift::SkiLift;
use skiadmin_core::sport::Sport;
use skiadmin_core::store::{
    blank_name_error, missing_commissioning_date_error, missing_id_error, predefined_id_error,
    same_name, SkiLiftStore,
};
use skiadmin_core::types::{Date, DbId};
use sqlx::{PgConnection, PgPool};

use crate::error::{internal, write_error};
use crate::models::ski_lift::SkiLiftRow;

/// Lift columns plus the sorted sport ids aggregated from the junction table.
/// Callers append a `WHERE` (optional) and `GROUP BY l.id`.
const SELECT_WITH_SPORTS: &str = "\
    SELECT l.id, l.name, l.lift_type, l.status, l.comment, l.commissioning_date, \
        COALESCE(\
            array_agg(ls.sport_id ORDER BY ls.sport_id) FILTER (WHERE ls.sport_id IS NOT NULL), \
            '{}'\
        ) AS sport_ids \
    FROM ski_lifts l \
    LEFT JOIN ski_lift_sports ls ON ls.ski_lift_id = l.id";

/// PostgreSQL-backed [`SkiLiftStore`].
#[derive(Clone)]
pub struct PgSkiLiftStore {
    pool: PgPool,
}

impl PgSkiLiftStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// `commissioning_date` is a NOT NULL column.
    fn required_date(lift: &SkiLift) -> Result<Date, CoreError> {
        lift.commissioning_date().ok_or_else(missing_commissioning_date_error)
    }

    /// Fail with a duplicate error if another lift already uses `name`.
    async fn ensure_name_free(
        conn: &mut PgConnection,
        name: &str,
        excluding: Option<DbId>,
    ) -> Result<(), CoreError> {
        let taken: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ski_lifts \
             WHERE lower(name) = lower($1) AND ($2::BIGINT IS NULL OR id <> $2)",
        )
        .bind(name)
        .bind(excluding)
        .fetch_one(conn)
        .await
        .map_err(internal)?;
        if taken > 0 {
            return Err(CoreError::duplicate_name(SkiLift::ENTITY, name));
        }
        Ok(())
    }

    /// Fail with `NotFound("Sport", id)` for the lowest referenced sport
    /// that does not exist. Found sports stay share-locked until the
    /// transaction ends, so they cannot be deleted before the associations
    /// are written.
    async fn ensure_sports_exist(
        conn: &mut PgConnection,
        sport_ids: &BTreeSet<DbId>,
    ) -> Result<(), CoreError> {
        let wanted: Vec<DbId> = sport_ids.iter().copied().collect();
        let found: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM sports WHERE id = ANY($1) FOR SHARE")
                .bind(&wanted)
                .fetch_all(conn)
                .await
                .map_err(internal)?;
        let found: BTreeSet<DbId> = found.into_iter().collect();

        match sport_ids.difference(&found).next() {
            Some(&missing) => Err(CoreError::NotFound {
                entity: Sport::ENTITY,
                id: missing,
            }),
            None => Ok(()),
        }
    }

    /// Replace sport associations within an existing transaction.
    ///
    /// Deletes existing associations, then inserts the new set.
    async fn set_sports_inner(
        conn: &mut PgConnection,
        ski_lift_id: DbId,
        sport_ids: &BTreeSet<DbId>,
    ) -> Result<(), CoreError> {
        sqlx::query("DELETE FROM ski_lift_sports WHERE ski_lift_id = $1")
            .bind(ski_lift_id)
            .execute(&mut *conn)
            .await
            .map_err(internal)?;

        if !sport_ids.is_empty() {
            let ids: Vec<DbId> = sport_ids.iter().copied().collect();
            sqlx::query(
                "INSERT INTO ski_lift_sports (ski_lift_id, sport_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(ski_lift_id)
            .bind(&ids)
            .execute(&mut *conn)
            .await
            .map_err(internal)?;
        }
        Ok(())
    }

    async fn fetch(conn: &mut PgConnection, id: DbId) -> Result<Option<SkiLift>, CoreError> {
        let query = format!("{SELECT_WITH_SPORTS} WHERE l.id = $1 GROUP BY l.id");
        let row = sqlx::query_as::<_, SkiLiftRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(internal)?;
        row.map(SkiLift::try_from).transpose()
    }

    /// Lock the lift row for the rest of the transaction and return its name.
    async fn lock(conn: &mut PgConnection, id: DbId) -> Result<String, CoreError> {
        sqlx::query_scalar("SELECT name FROM ski_lifts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: SkiLift::ENTITY,
                id,
            })
    }
}

#[async_trait]
impl SkiLiftStore for PgSkiLiftStore {
    /// Insert the lift and its sport associations in one transaction.
    async fn create(&self, lift: &SkiLift) -> Result<SkiLift, CoreError> {
        if lift.id().is_some() {
            return Err(predefined_id_error(SkiLift::ENTITY));
        }
        if lift.name().trim().is_empty() {
            return Err(blank_name_error(SkiLift::ENTITY));
        }
        let commissioning_date = Self::required_date(lift)?;

        let mut tx = self.pool.begin().await.map_err(internal)?;

        Self::ensure_name_free(&mut tx, lift.name(), None).await?;
        Self::ensure_sports_exist(&mut tx, lift.available_sports()).await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO ski_lifts (name, lift_type, status, comment, commissioning_date) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(lift.name())
        .bind(lift.lift_type().as_str())
        .bind(lift.status().as_str())
        .bind(lift.comment())
        .bind(commissioning_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(SkiLift::ENTITY, lift.name(), e))?;

        Self::set_sports_inner(&mut tx, id, lift.available_sports()).await?;

        let created = Self::fetch(&mut tx, id).await?.ok_or_else(|| {
            CoreError::Internal(format!("ski lift {id} vanished inside its own transaction"))
        })?;
        tx.commit().await.map_err(internal)?;
        Ok(created)
    }

    /// All lifts ordered by id.
    async fn find_all(&self) -> Result<Vec<SkiLift>, CoreError> {
        let query = format!("{SELECT_WITH_SPORTS} GROUP BY l.id ORDER BY l.id");
        let rows = sqlx::query_as::<_, SkiLiftRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        rows.into_iter().map(SkiLift::try_from).collect()
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<SkiLift>, CoreError> {
        let mut conn = self.pool.acquire().await.map_err(internal)?;
        Self::fetch(&mut conn, id).await
    }

    /// Update in one transaction: lock, re-check name (if changed) and
    /// sports, write the row, replace associations, re-read.
    async fn update(&self, lift: &SkiLift) -> Result<SkiLift, CoreError> {
        let id = lift.id().ok_or_else(|| missing_id_error(SkiLift::ENTITY))?;
        if lift.name().trim().is_empty() {
            return Err(blank_name_error(SkiLift::ENTITY));
        }
        let commissioning_date = Self::required_date(lift)?;

        let mut tx = self.pool.begin().await.map_err(internal)?;

        let current_name = Self::lock(&mut tx, id).await?;
        if !same_name(&current_name, lift.name()) {
            Self::ensure_name_free(&mut tx, lift.name(), Some(id)).await?;
        }
        Self::ensure_sports_exist(&mut tx, lift.available_sports()).await?;

        sqlx::query(
            "UPDATE ski_lifts SET \
                name = $2, \
                lift_type = $3, \
                status = $4, \
                comment = $5, \
                commissioning_date = $6 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(lift.name())
        .bind(lift.lift_type().as_str())
        .bind(lift.status().as_str())
        .bind(lift.comment())
        .bind(commissioning_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(SkiLift::ENTITY, lift.name(), e))?;

        Self::set_sports_inner(&mut tx, id, lift.available_sports()).await?;

        let updated = Self::fetch(&mut tx, id).await?.ok_or(CoreError::NotFound {
            entity: SkiLift::ENTITY,
            id,
        })?;
        tx.commit().await.map_err(internal)?;
        Ok(updated)
    }

    /// Detach all sports, then delete the lift, in one transaction.
    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(internal)?;

        Self::lock(&mut tx, id).await?;
        Self::set_sports_inner(&mut tx, id, &BTreeSet::new()).await?;

        sqlx::query("DELETE FROM ski_lifts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(internal)?;

        tx.commit().await.map_err(internal)?;
        Ok(())
    }

    async fn exists_by_id(&self, id: DbId) -> Result<bool, CoreError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM ski_lifts WHERE id = $1)")
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
                SELECT 1 FROM ski_lifts \
                WHERE lower(name) = lower($1) AND ($2::BIGINT IS NULL OR id <> $2)\
             )",
        )
        .bind(name)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await
        .map_err(internal)
    }

    async fn count_by_sport(&self, sport_id: DbId) -> Result<i64, CoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM ski_lift_sports WHERE sport_id = $1")
            .bind(sport_id)
            .fetch_one(&self.pool)
            .await
            .map_err(internal)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(internal)
    }
}
