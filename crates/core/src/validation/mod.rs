//! Field-level validation for sports and ski lifts.
//!
//! `rules` holds the individual field checks and the create/update rule
//! groups; `validator` applies them to whole entities. Everything here is
//! pure: no store access.

pub mod rules;
pub mod validator;

pub use rules::ValidationGroup;
pub use validator::Validator;
