//! In-memory persistence gateway.
//!
//! Both stores share one set of tables, so lift writes see the sports they
//! reference and sport deletes see the lifts offering them. Records live in
//! insertion order behind async `RwLock`s; identifiers come from atomic
//! counters so they are never reused, even after deletes. Locks are held from
//! the invariant checks through the write and are always taken sports first,
//! then lifts.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    blank_name_error, missing_commissioning_date_error, missing_id_error, predefined_id_error,
    same_name, sport_in_use_error, SkiLiftStore, SportStore,
};
use crate::error::CoreError;
use crate::ski_lift::SkiLift;
use crate::sport::Sport;
use crate::types::DbId;

/// What the table needs to know about a stored record.
trait Record: Clone + Send + Sync {
    const ENTITY: &'static str;
    fn record_id(&self) -> Option<DbId>;
    fn record_name(&self) -> &str;
    fn assign_id(&self, id: DbId) -> Self;
}

impl Record for Sport {
    const ENTITY: &'static str = Sport::ENTITY;

    fn record_id(&self) -> Option<DbId> {
        self.id()
    }

    fn record_name(&self) -> &str {
        self.name()
    }

    fn assign_id(&self, id: DbId) -> Self {
        self.with_id(id)
    }
}

impl Record for SkiLift {
    const ENTITY: &'static str = SkiLift::ENTITY;

    fn record_id(&self) -> Option<DbId> {
        self.id()
    }

    fn record_name(&self) -> &str {
        self.name()
    }

    fn assign_id(&self, id: DbId) -> Self {
        self.with_id(id)
    }
}

/// Insertion-ordered table with sequential identifiers.
struct Table<T> {
    rows: RwLock<Vec<T>>,
    next_id: AtomicI64,
}

impl<T: Record> Table<T> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Append `record` under the next identifier. Callers hold the write lock.
    fn push(&self, rows: &mut Vec<T>, record: &T) -> T {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let persisted = record.assign_id(id);
        rows.push(persisted.clone());
        persisted
    }

    async fn insert(&self, record: &T) -> Result<T, CoreError> {
        check_new(record)?;
        let mut rows = self.rows.write().await;
        ensure_name_free(&rows, record.record_name(), None)?;
        Ok(self.push(&mut rows, record))
    }

    async fn all(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    async fn get(&self, id: DbId) -> Option<T> {
        self.rows
            .read()
            .await
            .iter()
            .find(|r| r.record_id() == Some(id))
            .cloned()
    }

    async fn replace(&self, record: &T) -> Result<T, CoreError> {
        let id = check_existing(record)?;
        let mut rows = self.rows.write().await;
        let index = locate(&rows, id)?;
        ensure_rename_free(&rows, index, record)?;
        rows[index] = record.clone();
        Ok(record.clone())
    }

    async fn remove(&self, id: DbId) -> Result<T, CoreError> {
        let mut rows = self.rows.write().await;
        let index = locate(&rows, id)?;
        Ok(rows.remove(index))
    }

    async fn contains(&self, id: DbId) -> bool {
        self.rows
            .read()
            .await
            .iter()
            .any(|r| r.record_id() == Some(id))
    }

    async fn name_taken(&self, name: &str, excluding: Option<DbId>) -> bool {
        self.rows
            .read()
            .await
            .iter()
            .any(|r| r.record_id() != excluding && same_name(r.record_name(), name))
    }
}

/// Create candidates carry no identifier and a non-blank name.
fn check_new<T: Record>(record: &T) -> Result<(), CoreError> {
    if record.record_id().is_some() {
        return Err(predefined_id_error(T::ENTITY));
    }
    if record.record_name().trim().is_empty() {
        return Err(blank_name_error(T::ENTITY));
    }
    Ok(())
}

/// Update candidates carry an identifier and a non-blank name.
fn check_existing<T: Record>(record: &T) -> Result<DbId, CoreError> {
    let id = record.record_id().ok_or_else(|| missing_id_error(T::ENTITY))?;
    if record.record_name().trim().is_empty() {
        return Err(blank_name_error(T::ENTITY));
    }
    Ok(id)
}

fn locate<T: Record>(rows: &[T], id: DbId) -> Result<usize, CoreError> {
    rows.iter()
        .position(|r| r.record_id() == Some(id))
        .ok_or(CoreError::NotFound {
            entity: T::ENTITY,
            id,
        })
}

fn ensure_name_free<T: Record>(
    rows: &[T],
    name: &str,
    excluding: Option<DbId>,
) -> Result<(), CoreError> {
    if rows
        .iter()
        .any(|r| r.record_id() != excluding && same_name(r.record_name(), name))
    {
        return Err(CoreError::duplicate_name(T::ENTITY, name));
    }
    Ok(())
}

/// Uniqueness is only re-checked when the name changed beyond letter case.
fn ensure_rename_free<T: Record>(rows: &[T], index: usize, record: &T) -> Result<(), CoreError> {
    let current = &rows[index];
    if same_name(current.record_name(), record.record_name()) {
        return Ok(());
    }
    ensure_name_free(rows, record.record_name(), current.record_id())
}

/// Reports the lowest referenced sport id that is not stored.
fn ensure_sports_exist(sports: &[Sport], ids: &BTreeSet<DbId>) -> Result<(), CoreError> {
    match ids
        .iter()
        .find(|&&id| !sports.iter().any(|s| s.id() == Some(id)))
    {
        Some(&id) => Err(CoreError::NotFound {
            entity: Sport::ENTITY,
            id,
        }),
        None => Ok(()),
    }
}

fn offering<'a>(lifts: &'a [SkiLift], sport_id: DbId) -> impl Iterator<Item = &'a SkiLift> {
    lifts
        .iter()
        .filter(move |lift| lift.available_sports().contains(&sport_id))
}

/// The tables behind one in-memory backend.
struct Tables {
    sports: Table<Sport>,
    lifts: Table<SkiLift>,
}

// ---------------------------------------------------------------------------
// Sports
// ---------------------------------------------------------------------------

/// Non-persistent sport store for development and tests.
///
/// Owns a fresh backend; pair it with [`InMemorySkiLiftStore::for_sports`].
pub struct InMemorySportStore {
    tables: Arc<Tables>,
}

impl InMemorySportStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Tables {
                sports: Table::new(),
                lifts: Table::new(),
            }),
        }
    }
}

impl Default for InMemorySportStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SportStore for InMemorySportStore {
    async fn create(&self, sport: &Sport) -> Result<Sport, CoreError> {
        self.tables.sports.insert(sport).await
    }

    async fn find_all(&self) -> Result<Vec<Sport>, CoreError> {
        Ok(self.tables.sports.all().await)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Sport>, CoreError> {
        Ok(self.tables.sports.get(id).await)
    }

    async fn update(&self, sport: &Sport) -> Result<Sport, CoreError> {
        self.tables.sports.replace(sport).await
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let mut sports = self.tables.sports.rows.write().await;
        let lifts = self.tables.lifts.rows.read().await;
        let index = locate(&sports, id)?;
        let in_use = offering(&lifts, id).count();
        if in_use > 0 {
            return Err(sport_in_use_error(in_use as i64));
        }
        sports.remove(index);
        Ok(())
    }

    async fn exists_by_id(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.tables.sports.contains(id).await)
    }

    async fn exists_by_name(
        &self,
        name: &str,
        excluding: Option<DbId>,
    ) -> Result<bool, CoreError> {
        Ok(self.tables.sports.name_taken(name, excluding).await)
    }
}

// ---------------------------------------------------------------------------
// Ski lifts
// ---------------------------------------------------------------------------

/// Non-persistent ski lift store for development and tests.
pub struct InMemorySkiLiftStore {
    tables: Arc<Tables>,
}

impl InMemorySkiLiftStore {
    /// Lift store sharing the backend of `sports`.
    pub fn for_sports(sports: &InMemorySportStore) -> Self {
        Self {
            tables: Arc::clone(&sports.tables),
        }
    }
}

#[async_trait]
impl SkiLiftStore for InMemorySkiLiftStore {
    async fn create(&self, lift: &SkiLift) -> Result<SkiLift, CoreError> {
        check_new(lift)?;
        if lift.commissioning_date().is_none() {
            return Err(missing_commissioning_date_error());
        }

        let sports = self.tables.sports.rows.read().await;
        let mut lifts = self.tables.lifts.rows.write().await;
        ensure_name_free(&lifts, lift.name(), None)?;
        ensure_sports_exist(&sports, lift.available_sports())?;
        Ok(self.tables.lifts.push(&mut lifts, lift))
    }

    async fn find_all(&self) -> Result<Vec<SkiLift>, CoreError> {
        Ok(self.tables.lifts.all().await)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<SkiLift>, CoreError> {
        Ok(self.tables.lifts.get(id).await)
    }

    async fn update(&self, lift: &SkiLift) -> Result<SkiLift, CoreError> {
        let id = check_existing(lift)?;
        if lift.commissioning_date().is_none() {
            return Err(missing_commissioning_date_error());
        }

        let sports = self.tables.sports.rows.read().await;
        let mut lifts = self.tables.lifts.rows.write().await;
        let index = locate(&lifts, id)?;
        ensure_rename_free(&lifts, index, lift)?;
        ensure_sports_exist(&sports, lift.available_sports())?;
        lifts[index] = lift.clone();
        Ok(lift.clone())
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let removed = self.tables.lifts.remove(id).await?;
        tracing::debug!(
            lift_id = id,
            detached_sports = removed.available_sports().len(),
            "Ski lift removed with its sport associations"
        );
        Ok(())
    }

    async fn exists_by_id(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.tables.lifts.contains(id).await)
    }

    async fn exists_by_name(
        &self,
        name: &str,
        excluding: Option<DbId>,
    ) -> Result<bool, CoreError> {
        Ok(self.tables.lifts.name_taken(name, excluding).await)
    }

    async fn count_by_sport(&self, sport_id: DbId) -> Result<i64, CoreError> {
        let lifts = self.tables.lifts.rows.read().await;
        Ok(offering(&lifts, sport_id).count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::ValidationContext;
    use crate::ski_lift::{LiftStatus, LiftType};
    use crate::sport::Season;
    use crate::types::Date;

    fn sport(name: &str) -> Sport {
        Sport::builder().name(name).season(Season::Winter).build().unwrap()
    }

    fn lift(name: &str, sports: &[DbId]) -> SkiLift {
        SkiLift::builder()
            .name(name)
            .lift_type(LiftType::Chairlift)
            .status(LiftStatus::Open)
            .sports(sports.iter().copied())
            .commissioning_date(Date::from_ymd_opt(2001, 11, 20).unwrap())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn first_sport_gets_id_one() {
        let store = InMemorySportStore::new();
        let created = store.create(&sport("Ski")).await.unwrap();
        assert_eq!(created.id(), Some(1));
    }

    #[tokio::test]
    async fn duplicate_name_ignores_case() {
        let store = InMemorySportStore::new();
        store.create(&sport("Ski")).await.unwrap();
        let err = store.create(&sport("ski")).await.unwrap_err();
        assert_matches!(
            err,
            CoreError::Duplicate { entity: "Sport", field: "name", ref value } if value == "ski"
        );
    }

    #[tokio::test]
    async fn create_with_identifier_is_persistence_error() {
        let store = InMemorySportStore::new();
        let err = store.create(&sport("Ski").with_id(10)).await.unwrap_err();
        assert_matches!(
            err,
            CoreError::Validation { context: ValidationContext::Persistence, .. }
        );
    }

    #[tokio::test]
    async fn create_with_blank_name_is_persistence_error() {
        let store = InMemorySportStore::new();
        let err = store.create(&sport("   ")).await.unwrap_err();
        assert_eq!(err.field_messages(), vec!["name: must not be blank"]);
    }

    #[tokio::test]
    async fn identifiers_are_never_reused() {
        let store = InMemorySportStore::new();
        let a = store.create(&sport("Ski")).await.unwrap();
        let b = store.create(&sport("Luge")).await.unwrap();
        store.delete(b.id().unwrap()).await.unwrap();
        let c = store.create(&sport("Curling")).await.unwrap();
        assert_eq!(a.id(), Some(1));
        assert_eq!(b.id(), Some(2));
        assert_eq!(c.id(), Some(3));
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = InMemorySportStore::new();
        for name in ["Zorbing", "Biathlon", "Moguls"] {
            store.create(&sport(name)).await.unwrap();
        }
        let names: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["Zorbing", "Biathlon", "Moguls"]);
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let store = InMemorySportStore::new();
        assert_eq!(store.find_by_id(99).await.unwrap(), None);
        assert!(!store.exists_by_id(99).await.unwrap());
    }

    #[tokio::test]
    async fn update_to_own_name_is_allowed() {
        let store = InMemorySportStore::new();
        let created = store.create(&sport("Ski")).await.unwrap();
        let updated = store
            .update(&created.to_builder().description("Alpine").build().unwrap())
            .await
            .unwrap();
        assert_eq!(updated.description(), "Alpine");
    }

    #[tokio::test]
    async fn update_to_other_records_name_is_duplicate() {
        let store = InMemorySportStore::new();
        store.create(&sport("Ski")).await.unwrap();
        let luge = store.create(&sport("Luge")).await.unwrap();
        let err = store
            .update(&luge.to_builder().name("SKI").build().unwrap())
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Duplicate { field: "name", .. });
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = InMemorySportStore::new();
        let err = store.update(&sport("Ski").with_id(5)).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "Sport", id: 5 });
    }

    #[tokio::test]
    async fn update_without_id_is_persistence_error() {
        let store = InMemorySportStore::new();
        let err = store.update(&sport("Ski")).await.unwrap_err();
        assert_eq!(err.field_messages(), vec!["id: must not be null on update"]);
    }

    #[tokio::test]
    async fn case_only_rename_is_stored() {
        let store = InMemorySportStore::new();
        let created = store.create(&sport("Ski")).await.unwrap();
        let updated = store
            .update(&created.to_builder().name("SKI").build().unwrap())
            .await
            .unwrap();
        assert_eq!(updated.name(), "SKI");
        assert_eq!(store.find_by_id(1).await.unwrap().unwrap().name(), "SKI");
    }

    async fn backend_with_sports(names: &[&str]) -> (InMemorySportStore, InMemorySkiLiftStore) {
        let sports = InMemorySportStore::new();
        for name in names {
            sports.create(&sport(name)).await.unwrap();
        }
        let lifts = InMemorySkiLiftStore::for_sports(&sports);
        (sports, lifts)
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let (_, store) = backend_with_sports(&[]).await;
        let err = store.delete(3).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "SkiLift", id: 3 });
    }

    #[tokio::test]
    async fn delete_detaches_sports() {
        let (_, store) = backend_with_sports(&["Ski", "Snowboard"]).await;
        let created = store.create(&lift("Gipfelbahn", &[1, 2])).await.unwrap();
        assert_eq!(store.count_by_sport(1).await.unwrap(), 1);

        store.delete(created.id().unwrap()).await.unwrap();
        assert_eq!(store.count_by_sport(1).await.unwrap(), 0);
        assert!(!store.exists_by_id(created.id().unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn name_lookup_excludes_own_record() {
        let (_, store) = backend_with_sports(&["Ski"]).await;
        let created = store.create(&lift("Gipfelbahn", &[1])).await.unwrap();
        assert!(store.exists_by_name("GIPFELBAHN", None).await.unwrap());
        assert!(!store
            .exists_by_name("gipfelbahn", created.id())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn unknown_sport_reference_is_not_found() {
        let (_, store) = backend_with_sports(&["Ski"]).await;
        let err = store.create(&lift("Gipfelbahn", &[1, 9, 4])).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "Sport", id: 4 });
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_with_unknown_sport_keeps_stored_lift() {
        let (_, store) = backend_with_sports(&["Ski"]).await;
        let created = store.create(&lift("Gipfelbahn", &[1])).await.unwrap();

        let changed = created.to_builder().sports([1, 6]).build().unwrap();
        let err = store.update(&changed).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "Sport", id: 6 });
        assert_eq!(store.find_by_id(1).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn missing_commissioning_date_is_persistence_error() {
        let (_, store) = backend_with_sports(&["Ski"]).await;
        let mut undated = lift("Gipfelbahn", &[1]).to_builder();
        undated.commissioning_date = None;
        let undated = undated.build().unwrap();

        let err = store.create(&undated).await.unwrap_err();
        assert_matches!(
            &err,
            CoreError::Validation { context: ValidationContext::Persistence, .. }
        );
        assert_eq!(err.field_messages(), vec!["commissioning_date: must not be null"]);
    }

    #[tokio::test]
    async fn sport_still_offered_cannot_be_deleted() {
        let (sports, lifts) = backend_with_sports(&["Ski", "Luge"]).await;
        let created = lifts.create(&lift("Gipfelbahn", &[1])).await.unwrap();

        let err = sports.delete(1).await.unwrap_err();
        assert_matches!(
            &err,
            CoreError::Validation { context: ValidationContext::BusinessRule, .. }
        );
        assert_eq!(err.field_messages(), vec!["id: sport is still offered by 1 ski lift(s)"]);
        assert!(sports.exists_by_id(1).await.unwrap());

        sports.delete(2).await.unwrap();
        lifts.delete(created.id().unwrap()).await.unwrap();
        sports.delete(1).await.unwrap();
        assert!(sports.find_all().await.unwrap().is_empty());
    }
}
