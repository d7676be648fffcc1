pub mod marker;

pub use marker::{Coords, CoordsError, Image, ImageError, Marker, ValidationError};
