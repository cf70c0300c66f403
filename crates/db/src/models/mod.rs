//! Row structs and their conversion into core entities.
//!
//! Rows carry enum columns as their text labels; conversion parses them and
//! rebuilds the immutable entity through its builder.

pub mod ski_lift;
pub mod sport;
