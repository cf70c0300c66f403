//! Ski resort administration API server library.
//!
//! Exposes the building blocks (config, state, error handling, request
//! bodies, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod requests;
pub mod response;
pub mod routes;
pub mod state;
