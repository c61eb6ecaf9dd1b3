//! Shared resources, components and messages for the walkthrough

use bevy::prelude::*;
use museu_core::{
    AnimationState, AnimationSwitch, AvatarChoice, AvatarState, CameraRig, FixedStep, FollowParams, MotionParams,
    MovementKeys, MuseumConfig, PlacedArtwork, ProximityDetector,
};

/// Top-level application state
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TourState {
    /// Start screen with the avatar roster
    #[default]
    Welcome,
    /// Live walkthrough
    Touring,
}

/// Ordered stages of the per-frame walkthrough update
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourSet {
    Input,
    Motion,
    Animation,
    Proximity,
    Camera,
}

/// Museum configuration shared by every plugin
#[derive(Debug, Clone, Resource, Default)]
pub struct MuseumSettings(pub MuseumConfig);

impl MuseumSettings {
    pub fn motion(&self) -> MotionParams {
        MotionParams::from_config(&self.0)
    }

    pub fn follow(&self) -> FollowParams {
        FollowParams::from_config(&self.0)
    }

    pub fn spawn_point(&self) -> Vec3 {
        Vec3::from_array(self.0.motion.spawn)
    }
}

/// Artworks with their world placement, rebuilt on every tour start
#[derive(Debug, Clone, Resource, Default)]
pub struct Gallery {
    pub artworks: Vec<PlacedArtwork>,
}

impl Gallery {
    pub fn get(&self, index: usize) -> Option<&PlacedArtwork> {
        self.artworks.get(index)
    }
}

/// Avatar picked on the start screen
#[derive(Debug, Clone, Resource, Default)]
pub struct SelectedAvatar(pub Option<AvatarChoice>);

/// Movement keys held this frame
#[derive(Debug, Clone, Copy, Resource, Default)]
pub struct HeldKeys(pub MovementKeys);

/// Artwork the avatar currently stands next to
#[derive(Debug, Clone, Copy, Resource, Default)]
pub struct NearbyArtwork(pub Option<usize>);

/// Proximity sampler state
#[derive(Debug, Clone, Resource)]
pub struct Proximity(pub ProximityDetector);

impl Default for Proximity {
    fn default() -> Self {
        Self(ProximityDetector::new(10))
    }
}

/// Sent when the nearby artwork changes
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearbyArtworkChanged {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

/// Loading progress of a single model slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Model loading progress shown in the overlay
#[derive(Debug, Clone, Resource, Default)]
pub struct LoadStatus {
    pub avatar: SlotStatus,
    pub artworks_total: usize,
    pub artworks_ready: usize,
    pub artworks_failed: usize,
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        self.avatar == SlotStatus::Loading
            || self.artworks_ready + self.artworks_failed < self.artworks_total
    }
}

/// Idle/walk switch plus the clips it drives
#[derive(Debug, Clone, Resource)]
pub struct AvatarAnimation {
    pub switch: AnimationSwitch,
    pub graph: Option<Handle<AnimationGraph>>,
    pub idle: Option<AnimationNodeIndex>,
    pub walk: Option<AnimationNodeIndex>,
    /// Entity carrying the avatar's `AnimationPlayer`
    pub player: Option<Entity>,
}

impl Default for AvatarAnimation {
    fn default() -> Self {
        Self {
            switch: AnimationSwitch::new(std::time::Duration::from_millis(500)),
            graph: None,
            idle: None,
            walk: None,
            player: None,
        }
    }
}

impl AvatarAnimation {
    pub fn node(&self, state: AnimationState) -> Option<AnimationNodeIndex> {
        match state {
            AnimationState::Idle => self.idle,
            AnimationState::Walk => self.walk,
        }
    }

    pub fn reset(&mut self) {
        self.switch.reset();
        self.graph = None;
        self.idle = None;
        self.walk = None;
        self.player = None;
    }
}

/// Marker for everything spawned for a tour; despawned on teardown
#[derive(Component)]
pub struct TourEntity;

/// Avatar group entity; the model is attached as a child once loaded
#[derive(Component)]
pub struct Avatar {
    pub state: AvatarState,
    pub throttle: FixedStep,
}

/// Placed artwork entity
#[derive(Component)]
pub struct ArtworkEntity {
    pub index: usize,
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Follow rig driving the main camera
#[derive(Component)]
pub struct FollowCamera {
    pub rig: CameraRig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_status_settles() {
        let mut status = LoadStatus {
            avatar: SlotStatus::Loading,
            artworks_total: 2,
            ..Default::default()
        };
        assert!(status.is_loading());

        status.avatar = SlotStatus::Ready;
        status.artworks_ready = 1;
        assert!(status.is_loading());

        // A failed artwork still counts as settled
        status.artworks_failed = 1;
        assert!(!status.is_loading());
        assert!(!LoadStatus::default().is_loading());
    }
}
