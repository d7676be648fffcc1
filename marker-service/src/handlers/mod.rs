pub mod health;
pub mod markers;

pub use health::health_check;
pub use markers::{create_marker, delete_marker, list_markers, update_marker};
