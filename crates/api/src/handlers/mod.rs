pub mod ski_lift;
pub mod sport;
