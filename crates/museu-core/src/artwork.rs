//! Artwork catalog and gallery layout
//!
//! Artworks are plain records read from the `[[artwork]]` tables of the
//! museum configuration. The gallery places them on a circle around the room
//! centre, evenly spaced by angle, each turned to face the centre.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f32::consts::TAU;
use thiserror::Error;

use crate::config::GalleryConfig;

#[derive(Error, Debug)]
pub enum ArtworkError {
    #[error("Duplicate artwork id: {0}")]
    DuplicateId(String),
    #[error("Artwork {id} has an empty {field}")]
    EmptyField { id: String, field: &'static str },
    #[error("Artwork {id} has invalid interaction radius {radius}")]
    InvalidRadius { id: String, radius: f32 },
    #[error("Artwork {id} has invalid scale {scale}")]
    InvalidScale { id: String, scale: f32 },
}

/// A single artwork entry in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    /// Unique identifier (e.g., "abaporu")
    pub id: String,
    /// Title shown in the overlay
    pub title: String,
    /// Longer description shown in the overlay
    #[serde(default)]
    pub description: String,
    /// External reference link
    #[serde(default)]
    pub link: Option<String>,
    /// Path to the 3D model (relative to the asset root)
    pub model: String,
    /// Adjustment applied on top of the circle slot
    #[serde(default)]
    pub offset: PlacementOffset,
    /// Interaction radius; the gallery default is used when absent
    #[serde(default)]
    pub radius: Option<f32>,
}

/// Per-artwork placement tweak relative to its circle slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementOffset {
    #[serde(default)]
    pub position: [f32; 3],
    /// Extra yaw in radians
    #[serde(default)]
    pub yaw: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

impl Default for PlacementOffset {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            yaw: 0.0,
            scale: default_scale(),
        }
    }
}

/// An artwork with its final world placement
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedArtwork {
    /// Position in the catalog; also the proximity iteration order
    pub index: usize,
    pub artwork: Artwork,
    pub position: Vec3,
    pub yaw: f32,
    pub scale: f32,
    pub radius: f32,
}

impl PlacedArtwork {
    /// Distance from `point` to this artwork measured on the floor plane
    pub fn floor_distance(&self, point: Vec3) -> f32 {
        let dx = point.x - self.position.x;
        let dz = point.z - self.position.z;
        (dx * dx + dz * dz).sqrt()
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.floor_distance(point) <= self.radius
    }
}

/// Check a catalog for duplicate ids and unusable values
pub fn validate_catalog(artworks: &[Artwork]) -> Result<(), ArtworkError> {
    let mut seen = HashSet::new();
    for artwork in artworks {
        if artwork.id.trim().is_empty() {
            return Err(ArtworkError::EmptyField {
                id: artwork.title.clone(),
                field: "id",
            });
        }
        if !seen.insert(artwork.id.as_str()) {
            return Err(ArtworkError::DuplicateId(artwork.id.clone()));
        }
        if artwork.model.trim().is_empty() {
            return Err(ArtworkError::EmptyField {
                id: artwork.id.clone(),
                field: "model",
            });
        }
        if let Some(radius) = artwork.radius {
            if !(radius > 0.0) {
                return Err(ArtworkError::InvalidRadius {
                    id: artwork.id.clone(),
                    radius,
                });
            }
        }
        if !(artwork.offset.scale > 0.0) {
            return Err(ArtworkError::InvalidScale {
                id: artwork.id.clone(),
                scale: artwork.offset.scale,
            });
        }
    }
    Ok(())
}

/// Yaw that turns a model's +Z front toward the origin from `angle` on the circle
fn facing_centre(angle: f32) -> f32 {
    (-angle.cos()).atan2(-angle.sin())
}

/// Place every artwork on the gallery circle
pub fn layout(artworks: &[Artwork], gallery: &GalleryConfig, default_radius: f32) -> Vec<PlacedArtwork> {
    let count = artworks.len();
    artworks
        .iter()
        .enumerate()
        .map(|(index, artwork)| {
            let angle = index as f32 * TAU / count as f32;
            let slot = Vec3::new(
                gallery.radius * angle.cos(),
                gallery.base_height,
                gallery.radius * angle.sin(),
            );
            PlacedArtwork {
                index,
                artwork: artwork.clone(),
                position: slot + Vec3::from_array(artwork.offset.position),
                yaw: facing_centre(angle) + artwork.offset.yaw,
                scale: artwork.offset.scale,
                radius: artwork.radius.unwrap_or(default_radius),
            }
        })
        .collect()
}
