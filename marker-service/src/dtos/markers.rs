use crate::models::{Coords, Image, Marker};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageDto {
    pub id: String,
    pub uri: String,
    pub width: i64,
    pub height: i64,
}

/// Body of create and update requests. `images` may be `null` or absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerRequest {
    pub id: String,
    pub name: String,
    pub location: Coords,
    #[serde(default)]
    pub images: Option<Vec<ImageDto>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerResponse {
    pub id: String,
    pub name: String,
    pub location: Coords,
    pub images: Vec<ImageDto>,
}

impl From<ImageDto> for Image {
    fn from(dto: ImageDto) -> Self {
        Self {
            id: dto.id,
            uri: dto.uri,
            width: dto.width,
            height: dto.height,
        }
    }
}

impl From<Image> for ImageDto {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            uri: image.uri,
            width: image.width,
            height: image.height,
        }
    }
}

impl MarkerRequest {
    /// Canonical stored form: a missing image list becomes an empty one.
    pub fn normalize(self) -> Marker {
        Marker {
            id: self.id,
            name: self.name,
            location: self.location,
            images: self
                .images
                .unwrap_or_default()
                .into_iter()
                .map(Image::from)
                .collect(),
        }
    }
}

impl From<Marker> for MarkerResponse {
    fn from(marker: Marker) -> Self {
        Self {
            id: marker.id,
            name: marker.name,
            location: marker.location,
            images: marker.images.into_iter().map(ImageDto::from).collect(),
        }
    }
}
