pub mod markers;

pub use markers::{ImageDto, MarkerRequest, MarkerResponse};
