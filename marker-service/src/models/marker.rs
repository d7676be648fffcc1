use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named point of interest as stored in the `markers` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub location: Coords,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coords {
    pub latitude: f64,
    pub longitude: f64,
}

/// Image embedded in its parent marker. The id is only meaningful within
/// that marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    #[serde(rename = "_id")]
    pub id: String,
    pub uri: String,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("empty id")]
    EmptyId,

    #[error("empty name")]
    EmptyName,

    #[error("invalid location: {0}")]
    InvalidLocation(#[source] CoordsError),

    #[error("invalid image {id}: {source}")]
    InvalidImage { id: String, source: ImageError },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordsError {
    #[error("invalid latitude")]
    InvalidLatitude,

    #[error("invalid longitude")]
    InvalidLongitude,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("empty id")]
    EmptyId,

    #[error("empty uri")]
    EmptyUri,

    #[error("invalid dimensions")]
    InvalidDimensions,
}

// Latitude is bounded by ±180 and longitude by ±90, the bounds existing
// clients were written against.
const LATITUDE_BOUND: f64 = 180.0;
const LONGITUDE_BOUND: f64 = 90.0;

impl Coords {
    pub fn validate(&self) -> Result<(), CoordsError> {
        if !(-LATITUDE_BOUND..=LATITUDE_BOUND).contains(&self.latitude) {
            return Err(CoordsError::InvalidLatitude);
        }

        if !(-LONGITUDE_BOUND..=LONGITUDE_BOUND).contains(&self.longitude) {
            return Err(CoordsError::InvalidLongitude);
        }

        Ok(())
    }
}

impl Image {
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.id.is_empty() {
            return Err(ImageError::EmptyId);
        }

        if self.uri.is_empty() {
            return Err(ImageError::EmptyUri);
        }

        if self.width <= 0 || self.height <= 0 {
            return Err(ImageError::InvalidDimensions);
        }

        Ok(())
    }
}

impl Marker {
    /// Checks fields top-down and reports the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId);
        }

        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        self.location
            .validate()
            .map_err(ValidationError::InvalidLocation)?;

        for image in &self.images {
            image
                .validate()
                .map_err(|source| ValidationError::InvalidImage {
                    id: image.id.clone(),
                    source,
                })?;
        }

        Ok(())
    }
}
