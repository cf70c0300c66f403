//! Domain core for the ski resort administration backend.
//!
//! Holds the entity types, field validation, cross-record consistency
//! checks, the persistence gateway traits (with an in-memory backend) and
//! the services composing them. No HTTP or SQL dependencies live here.

pub mod consistency;
pub mod error;
pub mod service;
pub mod ski_lift;
pub mod sport;
pub mod store;
pub mod types;
pub mod validation;
