//! Museu Core - Renderer-free logic for the virtual museum walkthrough
//!
//! This crate provides everything that runs once per frame without touching
//! the engine:
//! - Avatar motion integration (damped velocity, room clamping)
//! - Smoothed third-person camera follow
//! - Edge-triggered artwork proximity detection
//! - The idle/walk animation switch
//! - Museum configuration and the declarative artwork catalog

pub mod animation;
pub mod artwork;
pub mod config;
pub mod follow;
pub mod motion;
pub mod proximity;
pub mod throttle;

pub use animation::{AnimationState, AnimationSwitch, Transition};
pub use artwork::{layout, Artwork, ArtworkError, PlacedArtwork, PlacementOffset};
pub use config::{AvatarChoice, ConfigError, MuseumConfig};
pub use follow::{CameraPose, CameraRig, FollowParams};
pub use motion::{AvatarState, MotionParams, MovementKeys, RoomBounds};
pub use proximity::{ProximityChange, ProximityDetector};
pub use throttle::FixedStep;
