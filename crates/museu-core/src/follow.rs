//! Third-person camera rig that trails the avatar

use glam::{Quat, Vec3};

use crate::config::MuseumConfig;
use crate::motion::RoomBounds;

/// Camera follow settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowParams {
    /// Offset from the avatar in its local frame (behind and above)
    pub offset: Vec3,
    pub min_height: f32,
    pub look_height: f32,
    /// Interpolation factor applied once per frame
    pub smoothing: f32,
    /// Clamp the target's X/Z when set
    pub bounds: Option<RoomBounds>,
}

impl Default for FollowParams {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 2.0, -3.0),
            min_height: 1.0,
            look_height: 1.5,
            smoothing: 0.2,
            bounds: None,
        }
    }
}

impl FollowParams {
    pub fn from_config(config: &MuseumConfig) -> Self {
        let camera = &config.camera;
        Self {
            offset: Vec3::from_array(camera.offset),
            min_height: camera.min_height,
            look_height: camera.look_height,
            smoothing: camera.smoothing,
            bounds: camera.clamp_to_room.then(|| config.room.bounds()),
        }
    }

    /// Where the camera wants to be for an avatar at `position` facing `heading`
    pub fn target(&self, position: Vec3, heading: f32) -> Vec3 {
        let rotated = Quat::from_rotation_y(heading) * self.offset;
        let mut target = position + rotated;
        target.y = (position.y + self.offset.y).max(self.min_height);
        match self.bounds {
            Some(bounds) => bounds.clamp(target),
            None => target,
        }
    }

    /// Point the camera looks at
    pub fn focus(&self, position: Vec3) -> Vec3 {
        position + Vec3::Y * self.look_height
    }
}

/// Resulting camera transform for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Smoothed camera state.
///
/// `user_interacting` is set while the user drags the camera; automatic
/// follow is suspended until it is cleared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub user_interacting: bool,
}

impl CameraRig {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            user_interacting: false,
        }
    }

    /// Rig already sitting at its follow target, so the first frame does not sweep
    pub fn settled(avatar_position: Vec3, heading: f32, params: &FollowParams) -> Self {
        Self::new(params.target(avatar_position, heading))
    }

    /// Advance one frame toward the follow target
    pub fn update(&mut self, avatar_position: Vec3, heading: f32, params: &FollowParams) -> CameraPose {
        if !self.user_interacting {
            let target = params.target(avatar_position, heading);
            self.position = self.position.lerp(target, params.smoothing);
        }
        CameraPose {
            position: self.position,
            look_at: params.focus(avatar_position),
        }
    }

    /// Swing the camera around `focus`: `yaw` radians about +Y, `pitch`
    /// radians of elevation (held within 1.2 rad of the horizon).
    pub fn orbit(&mut self, focus: Vec3, yaw: f32, pitch: f32) {
        let arm = self.position - focus;
        let distance = arm.length();
        if distance <= f32::EPSILON {
            return;
        }
        let turn = Quat::from_rotation_y(yaw);
        let arm = turn * arm;
        // An arm pointing straight up or down has no heading; swing out behind
        let horizontal = Vec3::new(arm.x, 0.0, arm.z)
            .try_normalize()
            .unwrap_or(turn * Vec3::NEG_Z);
        let elevation = (arm.y / distance).clamp(-1.0, 1.0).asin();
        let elevation = (elevation + pitch).clamp(-1.2, 1.2);
        let ground = horizontal * distance * elevation.cos();
        self.position = focus + ground + Vec3::Y * distance * elevation.sin();
    }
}
