//! Repository layer.
//!
//! Each repository wraps a `PgPool` and implements the matching core store
//! trait. Every write runs in a single transaction that re-checks the
//! invariants the consistency checker already verified, so a concurrent
//! writer cannot slip in between check and write.

pub mod ski_lift_repo;
pub mod sport_repo;

pub use ski_lift_repo::PgSkiLiftStore;
pub use sport_repo::PgSportStore;
