//! Museum configuration loading and validation
//!
//! Every tunable constant of the walkthrough lives here: room size, motion
//! feel, camera rig, proximity sampling, lighting, the avatar roster and the
//! artwork catalog. All sections are optional in the TOML file and fall back
//! to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::artwork::{validate_catalog, Artwork, ArtworkError};
use crate::motion::RoomBounds;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Artwork(#[from] ArtworkError),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuseumConfig {
    #[serde(default)]
    pub room: RoomConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub proximity: ProximityConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default = "default_avatars", rename = "avatar")]
    pub avatars: Vec<AvatarChoice>,
    #[serde(default, rename = "artwork")]
    pub artworks: Vec<Artwork>,
}

impl Default for MuseumConfig {
    fn default() -> Self {
        Self {
            room: RoomConfig::default(),
            motion: MotionConfig::default(),
            camera: CameraConfig::default(),
            proximity: ProximityConfig::default(),
            animation: AnimationConfig::default(),
            lighting: LightingConfig::default(),
            gallery: GalleryConfig::default(),
            avatars: default_avatars(),
            artworks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Half the side length of the square room (walls sit on this line)
    #[serde(default = "default_half_extent")]
    pub half_extent: f32,
    #[serde(default = "default_wall_height")]
    pub wall_height: f32,
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: f32,
    /// Avatar X/Z clamp
    #[serde(default = "default_walkable_limit")]
    pub walkable_limit: f32,
    #[serde(default = "default_floor_texture")]
    pub floor_texture: String,
    #[serde(default = "default_wall_texture")]
    pub wall_texture: String,
    /// Texture tiling across the floor and ceiling
    #[serde(default = "default_texture_repeat")]
    pub texture_repeat: f32,
    /// Ceiling lamp positions on the X/Z plane
    #[serde(default = "default_lamps")]
    pub lamps: Vec<[f32; 2]>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            half_extent: default_half_extent(),
            wall_height: default_wall_height(),
            wall_thickness: default_wall_thickness(),
            walkable_limit: default_walkable_limit(),
            floor_texture: default_floor_texture(),
            wall_texture: default_wall_texture(),
            texture_repeat: default_texture_repeat(),
            lamps: default_lamps(),
        }
    }
}

impl RoomConfig {
    pub fn bounds(&self) -> RoomBounds {
        RoomBounds::new(self.walkable_limit)
    }
}

fn default_half_extent() -> f32 {
    10.0
}

fn default_wall_height() -> f32 {
    3.0
}

fn default_wall_thickness() -> f32 {
    1.0
}

fn default_walkable_limit() -> f32 {
    9.0
}

fn default_floor_texture() -> String {
    "textures/floor.jpg".to_string()
}

fn default_wall_texture() -> String {
    "textures/wall.jpg".to_string()
}

fn default_texture_repeat() -> f32 {
    4.0
}

fn default_lamps() -> Vec<[f32; 2]> {
    vec![[-5.0, -5.0], [5.0, -5.0], [-5.0, 5.0], [5.0, 5.0]]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    #[serde(default = "default_step")]
    pub step: f32,
    #[serde(default = "default_acceleration")]
    pub acceleration: f32,
    /// Radians per second
    #[serde(default = "default_turn_speed")]
    pub turn_speed: f32,
    #[serde(default = "default_damping")]
    pub damping: f32,
    #[serde(default = "default_rest_epsilon")]
    pub rest_epsilon: f32,
    /// Throttle the integrator to a fixed rate (e.g. 30); unthrottled when absent
    #[serde(default)]
    pub max_updates_per_second: Option<f32>,
    #[serde(default)]
    pub spawn: [f32; 3],
    #[serde(default = "default_avatar_scale")]
    pub avatar_scale: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            acceleration: default_acceleration(),
            turn_speed: default_turn_speed(),
            damping: default_damping(),
            rest_epsilon: default_rest_epsilon(),
            max_updates_per_second: None,
            spawn: [0.0; 3],
            avatar_scale: default_avatar_scale(),
        }
    }
}

fn default_step() -> f32 {
    0.2
}

fn default_acceleration() -> f32 {
    2.0
}

fn default_turn_speed() -> f32 {
    2.0
}

fn default_damping() -> f32 {
    0.9
}

fn default_rest_epsilon() -> f32 {
    1e-4
}

fn default_avatar_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Offset from the avatar, in the avatar's local frame
    #[serde(default = "default_camera_offset")]
    pub offset: [f32; 3],
    /// Lowest camera height
    #[serde(default = "default_min_height")]
    pub min_height: f32,
    /// Height above the avatar's feet the camera looks at
    #[serde(default = "default_look_height")]
    pub look_height: f32,
    /// Fraction of the remaining distance covered each frame
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    /// Keep the camera target inside the walkable square
    #[serde(default)]
    pub clamp_to_room: bool,
    #[serde(default = "default_fov_degrees")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Radians of orbit per pixel of mouse drag
    #[serde(default = "default_orbit_sensitivity")]
    pub orbit_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: default_camera_offset(),
            min_height: default_min_height(),
            look_height: default_look_height(),
            smoothing: default_smoothing(),
            clamp_to_room: false,
            fov_degrees: default_fov_degrees(),
            near: default_near(),
            far: default_far(),
            orbit_sensitivity: default_orbit_sensitivity(),
        }
    }
}

fn default_camera_offset() -> [f32; 3] {
    [0.0, 2.0, -3.0]
}

fn default_min_height() -> f32 {
    1.0
}

fn default_look_height() -> f32 {
    1.5
}

fn default_smoothing() -> f32 {
    0.2
}

fn default_fov_degrees() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_orbit_sensitivity() -> f32 {
    0.005
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Sample proximity once every N frames
    #[serde(default = "default_sample_every")]
    pub sample_every: u32,
    /// Interaction radius for artworks that do not set their own
    #[serde(default = "default_radius")]
    pub default_radius: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            sample_every: default_sample_every(),
            default_radius: default_radius(),
        }
    }
}

fn default_sample_every() -> u32 {
    10
}

fn default_radius() -> f32 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Cross-fade duration between idle and walk, in seconds
    #[serde(default = "default_fade_seconds")]
    pub fade_seconds: f32,
    #[serde(default = "default_idle_clip")]
    pub idle_clip: String,
    #[serde(default = "default_walk_clip")]
    pub walk_clip: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fade_seconds: default_fade_seconds(),
            idle_clip: default_idle_clip(),
            walk_clip: default_walk_clip(),
        }
    }
}

fn default_fade_seconds() -> f32 {
    0.5
}

fn default_idle_clip() -> String {
    "idle".to_string()
}

fn default_walk_clip() -> String {
    "walk".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    #[serde(default = "default_white")]
    pub ambient_color: [f32; 3],
    #[serde(default = "default_ambient_brightness")]
    pub ambient_brightness: f32,
    #[serde(default = "default_directional_illuminance")]
    pub directional_illuminance: f32,
    #[serde(default = "default_directional_position")]
    pub directional_position: [f32; 3],
    #[serde(default = "default_true")]
    pub shadows: bool,
    #[serde(default = "default_lamp_color")]
    pub lamp_color: [f32; 3],
    /// Lamp point-light intensity in lumens
    #[serde(default = "default_lamp_intensity")]
    pub lamp_intensity: f32,
    #[serde(default = "default_lamp_range")]
    pub lamp_range: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: default_white(),
            ambient_brightness: default_ambient_brightness(),
            directional_illuminance: default_directional_illuminance(),
            directional_position: default_directional_position(),
            shadows: true,
            lamp_color: default_lamp_color(),
            lamp_intensity: default_lamp_intensity(),
            lamp_range: default_lamp_range(),
        }
    }
}

fn default_white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_ambient_brightness() -> f32 {
    400.0
}

fn default_directional_illuminance() -> f32 {
    3000.0
}

fn default_directional_position() -> [f32; 3] {
    [5.0, 10.0, 5.0]
}

fn default_true() -> bool {
    true
}

fn default_lamp_color() -> [f32; 3] {
    // #ffe6b8
    [1.0, 0.902, 0.722]
}

fn default_lamp_intensity() -> f32 {
    60_000.0
}

fn default_lamp_range() -> f32 {
    10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Radius of the circle the artworks stand on
    #[serde(default = "default_gallery_radius")]
    pub radius: f32,
    #[serde(default)]
    pub base_height: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            radius: default_gallery_radius(),
            base_height: 0.0,
        }
    }
}

fn default_gallery_radius() -> f32 {
    6.0
}

/// An avatar offered on the start screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarChoice {
    pub name: String,
    /// Path to the rigged model (relative to the asset root)
    pub model: String,
    #[serde(default)]
    pub portrait: Option<String>,
}

fn default_avatars() -> Vec<AvatarChoice> {
    ["Elizabeth", "David", "Jody", "Adam"]
        .iter()
        .map(|name| {
            let stem = name.to_lowercase();
            AvatarChoice {
                name: name.to_string(),
                model: format!("avatares/{}.glb", stem),
                portrait: Some(format!("perfilAvatar/{}Avatar.png", stem)),
            }
        })
        .collect()
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl MuseumConfig {
    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: MuseumConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config = Self::from_toml(&content)?;
            info!(
                path = %path.display(),
                artworks = config.artworks.len(),
                "Loaded museum configuration"
            );
            Ok(config)
        } else {
            info!(
                path = %path.display(),
                "Configuration file not found, using defaults"
            );
            Ok(Self::default())
        }
    }

    /// Write this configuration as pretty TOML
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find an avatar on the roster by name (case-insensitive)
    pub fn find_avatar(&self, name: &str) -> Option<&AvatarChoice> {
        self.avatars
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Reject values the walkthrough cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let room = &self.room;
        if !(room.half_extent > 0.0) {
            return Err(invalid("room.half_extent", "must be positive"));
        }
        if !(room.walkable_limit > 0.0 && room.walkable_limit <= room.half_extent) {
            return Err(invalid(
                "room.walkable_limit",
                format!("must be in (0, {}]", room.half_extent),
            ));
        }
        if !(room.wall_height > 0.0) {
            return Err(invalid("room.wall_height", "must be positive"));
        }

        let motion = &self.motion;
        if !(motion.damping > 0.0 && motion.damping < 1.0) {
            return Err(invalid("motion.damping", "must be in (0, 1)"));
        }
        if !(motion.rest_epsilon >= 0.0) {
            return Err(invalid("motion.rest_epsilon", "must not be negative"));
        }
        if let Some(rate) = motion.max_updates_per_second {
            if !(rate > 0.0) {
                return Err(invalid("motion.max_updates_per_second", "must be positive"));
            }
        }

        if !(self.camera.smoothing > 0.0 && self.camera.smoothing <= 1.0) {
            return Err(invalid("camera.smoothing", "must be in (0, 1]"));
        }
        if self.proximity.sample_every == 0 {
            return Err(invalid("proximity.sample_every", "must be at least 1"));
        }
        if !(self.proximity.default_radius > 0.0) {
            return Err(invalid("proximity.default_radius", "must be positive"));
        }
        if !(self.animation.fade_seconds >= 0.0) {
            return Err(invalid("animation.fade_seconds", "must not be negative"));
        }
        if self.avatars.is_empty() {
            return Err(invalid("avatar", "at least one avatar is required"));
        }

        validate_catalog(&self.artworks)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = MuseumConfig::from_toml("").unwrap();
        assert_eq!(config, MuseumConfig::default());
        assert_eq!(config.avatars.len(), 4);
        assert_eq!(config.avatars[3].model, "avatares/adam.glb");
        assert_eq!(config.camera.offset, [0.0, 2.0, -3.0]);
        assert_eq!(config.room.bounds().limit, 9.0);
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
[motion]
damping = 0.85
max_updates_per_second = 30.0

[camera]
offset = [0.0, 1.5, -1.5]
clamp_to_room = true

[[artwork]]
id = "abaporu"
title = "Abaporu"
description = "Tarsila do Amaral, 1928"
link = "https://example.org/abaporu"
model = "obras/abaporu.glb"
radius = 2.5

[artwork.offset]
position = [0.0, 0.3, 0.0]
scale = 0.8

[[artwork]]
id = "operarios"
title = "Operarios"
model = "obras/operarios.glb"
"#;

        let config = MuseumConfig::from_toml(toml).unwrap();
        assert_eq!(config.motion.damping, 0.85);
        assert_eq!(config.motion.max_updates_per_second, Some(30.0));
        assert_eq!(config.motion.step, 0.2);
        assert!(config.camera.clamp_to_room);
        assert_eq!(config.camera.smoothing, 0.2);
        assert_eq!(config.artworks.len(), 2);
        assert_eq!(config.artworks[0].offset.scale, 0.8);
        assert_eq!(config.artworks[0].radius, Some(2.5));
        assert_eq!(config.artworks[1].offset.scale, 1.0);
        assert!(config.artworks[1].link.is_none());
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            ("[motion]\ndamping = 1.0", "motion.damping"),
            ("[motion]\nmax_updates_per_second = 0.0", "motion.max_updates_per_second"),
            ("[camera]\nsmoothing = 0.0", "camera.smoothing"),
            ("[proximity]\nsample_every = 0", "proximity.sample_every"),
            ("[room]\nwalkable_limit = 12.0", "room.walkable_limit"),
        ];

        for (toml, expected) in cases {
            match MuseumConfig::from_toml(toml) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("{}: unexpected result {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_duplicate_artwork_rejected() {
        let toml = r#"
[[artwork]]
id = "a"
title = "A"
model = "a.glb"

[[artwork]]
id = "a"
title = "Again"
model = "b.glb"
"#;
        assert!(matches!(
            MuseumConfig::from_toml(toml),
            Err(ConfigError::Artwork(ArtworkError::DuplicateId(_)))
        ));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = MuseumConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, MuseumConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("museu.toml");

        let mut config = MuseumConfig::default();
        config.lighting.shadows = false;
        config.proximity.sample_every = 4;
        config.save(&path).unwrap();

        let loaded = MuseumConfig::load(&path).unwrap();
        assert!(!loaded.lighting.shadows);
        assert_eq!(loaded.proximity.sample_every, 4);
    }

    #[test]
    fn test_find_avatar_case_insensitive() {
        let config = MuseumConfig::default();
        assert_eq!(config.find_avatar("jody").unwrap().name, "Jody");
        assert!(config.find_avatar("nobody").is_none());
    }
}
