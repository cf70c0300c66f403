//! Integration tests for the PostgreSQL sport store.
//!
//! Exercises the store against a real database:
//! - Identifier assignment and lookup
//! - Case-insensitive name uniqueness on create and update
//! - Not-found handling for update and delete
//! - Delete protection while a lift still references the sport

use assert_matches::assert_matches;
use skiadmin_core::error::{CoreError, ValidationContext};
use skiadmin_core::ski_lift::{LiftStatus, LiftType, SkiLift};
use skiadmin_core::sport::{Season, Sport};
use skiadmin_core::store::{SkiLiftStore, SportStore};
use skiadmin_core::types::Date;
use skiadmin_db::{PgSkiLiftStore, PgSportStore};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sport(name: &str) -> Sport {
    Sport::builder()
        .name(name)
        .description("Downhill on two planks")
        .season(Season::Winter)
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_assigns_identifier_and_round_trips(pool: PgPool) {
    let store = PgSportStore::new(pool);

    let created = store.create(&sport("Ski")).await.unwrap();
    let id = created.id().expect("identifier assigned");
    assert!(id > 0);
    assert_eq!(created.name(), "Ski");
    assert!(created.is_active());

    let fetched = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert!(store.exists_by_id(id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_missing_returns_none(pool: PgPool) {
    let store = PgSportStore::new(pool);
    assert!(store.find_by_id(999).await.unwrap().is_none());
    assert!(!store.exists_by_id(999).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_all_is_ordered_by_id(pool: PgPool) {
    let store = PgSportStore::new(pool);
    let a = store.create(&sport("Snowboard")).await.unwrap();
    let b = store.create(&sport("Ski")).await.unwrap();

    let all = store.find_all().await.unwrap();
    let ids: Vec<_> = all.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![a.id(), b.id()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_name_ignores_case(pool: PgPool) {
    let store = PgSportStore::new(pool);
    store.create(&sport("Ski")).await.unwrap();

    let err = store.create(&sport("SKI")).await.unwrap_err();
    assert_matches!(err, CoreError::Duplicate { entity: "Sport", field: "name", .. });
    assert!(store.exists_by_name("ski", None).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_identifier_is_rejected(pool: PgPool) {
    let store = PgSportStore::new(pool);
    let err = store.create(&sport("Ski").with_id(5)).await.unwrap_err();
    assert_matches!(
        err,
        CoreError::Validation { context: ValidationContext::Persistence, .. }
    );
    assert!(store.find_all().await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_keeps_own_name_and_changes_fields(pool: PgPool) {
    let store = PgSportStore::new(pool);
    let ski = store.create(&sport("Ski")).await.unwrap();

    let changed = ski
        .to_builder()
        .active(false)
        .season(Season::Both)
        .build()
        .unwrap();
    let updated = store.update(&changed).await.unwrap();
    assert_eq!(updated.id(), ski.id());
    assert!(!updated.is_active());
    assert_eq!(updated.season(), Season::Both);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rename_to_taken_name_is_duplicate(pool: PgPool) {
    let store = PgSportStore::new(pool);
    store.create(&sport("Ski")).await.unwrap();
    let board = store.create(&sport("Snowboard")).await.unwrap();

    let renamed = board.to_builder().name("ski").build().unwrap();
    let err = store.update(&renamed).await.unwrap_err();
    assert_matches!(err, CoreError::Duplicate { entity: "Sport", .. });

    let unchanged = store.find_by_id(board.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(unchanged.name(), "Snowboard");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_delete_of_missing_sport_are_not_found(pool: PgPool) {
    let store = PgSportStore::new(pool);

    let err = store.update(&sport("Ski").with_id(42)).await.unwrap_err();
    assert_matches!(err, CoreError::NotFound { entity: "Sport", id: 42 });

    let err = store.delete(42).await.unwrap_err();
    assert_matches!(err, CoreError::NotFound { entity: "Sport", id: 42 });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn referenced_sport_delete_is_blocked(pool: PgPool) {
    let sports = PgSportStore::new(pool.clone());
    let lifts = PgSkiLiftStore::new(pool);

    let ski = sports.create(&sport("Ski")).await.unwrap().id().unwrap();
    let lift = SkiLift::builder()
        .name("Streif")
        .lift_type(LiftType::Gondola)
        .status(LiftStatus::Open)
        .sport(ski)
        .commissioning_date(Date::from_ymd_opt(1985, 12, 1).unwrap())
        .build()
        .unwrap();
    let lift_id = lifts.create(&lift).await.unwrap().id().unwrap();

    let err = sports.delete(ski).await.unwrap_err();
    assert_matches!(
        &err,
        CoreError::Validation { context: ValidationContext::BusinessRule, .. }
    );
    assert_eq!(err.field_messages(), vec!["id: sport is still offered by 1 ski lift(s)"]);

    lifts.delete(lift_id).await.unwrap();
    sports.delete(ski).await.unwrap();
    assert!(sports.find_by_id(ski).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn case_only_rename_is_stored(pool: PgPool) {
    let store = PgSportStore::new(pool);
    let created = store.create(&sport("Ski")).await.unwrap();

    let renamed = created.to_builder().name("SKI").build().unwrap();
    let updated = store.update(&renamed).await.unwrap();
    assert_eq!(updated.name(), "SKI");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn identifiers_are_not_reused(pool: PgPool) {
    let store = PgSportStore::new(pool);
    let first = store.create(&sport("Ski")).await.unwrap().id().unwrap();
    store.delete(first).await.unwrap();

    let second = store.create(&sport("Ski")).await.unwrap().id().unwrap();
    assert!(second > first);
}
