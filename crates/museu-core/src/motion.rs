//! Avatar motion integration
//!
//! Movement is a damped velocity integrator: held keys push a small
//! local-space direction into a velocity accumulator that is never reset,
//! only multiplied by a damping factor every frame. This gives the avatar a
//! short glide after the keys are released.

use glam::{Quat, Vec3};

use crate::config::MuseumConfig;

/// Movement keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementKeys {
    /// True when a translation key (forward or back) is held
    pub fn is_walking(&self) -> bool {
        self.forward || self.back
    }

    /// True when no movement key is held
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.back || self.left || self.right)
    }
}

/// Square interior of the room, centred on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomBounds {
    /// Maximum absolute X and Z coordinate
    pub limit: f32,
}

impl RoomBounds {
    pub fn new(limit: f32) -> Self {
        Self { limit: limit.abs() }
    }

    /// Clamp X and Z into the square, leaving Y untouched
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(-self.limit, self.limit),
            point.y,
            point.z.clamp(-self.limit, self.limit),
        )
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x.abs() <= self.limit && point.z.abs() <= self.limit
    }
}

/// Tuning constants for [`AvatarState::integrate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// Local-space magnitude set by the forward/back keys
    pub step: f32,
    /// Scale applied to the rotated direction together with the frame delta
    pub acceleration: f32,
    /// Heading change per second while a turn key is held (radians)
    pub turn_speed: f32,
    /// Per-frame velocity multiplier, in (0, 1)
    pub damping: f32,
    /// Velocity magnitude below which the avatar is considered at rest
    pub rest_epsilon: f32,
    pub bounds: RoomBounds,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            step: 0.2,
            acceleration: 2.0,
            turn_speed: 2.0,
            damping: 0.9,
            rest_epsilon: 1e-4,
            bounds: RoomBounds::new(9.0),
        }
    }
}

impl MotionParams {
    pub fn from_config(config: &MuseumConfig) -> Self {
        Self {
            step: config.motion.step,
            acceleration: config.motion.acceleration,
            turn_speed: config.motion.turn_speed,
            damping: config.motion.damping,
            rest_epsilon: config.motion.rest_epsilon,
            bounds: config.room.bounds(),
        }
    }
}

/// Position, heading and momentum of the avatar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AvatarState {
    pub position: Vec3,
    /// Yaw around +Y in radians
    pub heading: f32,
    pub velocity: Vec3,
}

impl AvatarState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            heading: 0.0,
            velocity: Vec3::ZERO,
        }
    }

    /// Rotation matching the current heading
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.heading)
    }

    /// Advance one frame.
    ///
    /// Heading is updated before the direction is rotated, so a turn applied
    /// this frame already steers this frame's push. When both forward and
    /// back are held, back wins.
    pub fn integrate(&mut self, keys: &MovementKeys, delta: f32, params: &MotionParams) {
        let mut direction = Vec3::ZERO;
        if keys.forward {
            direction.z = params.step;
        }
        if keys.back {
            direction.z = -params.step;
        }
        if keys.left {
            self.heading += delta * params.turn_speed;
        }
        if keys.right {
            self.heading -= delta * params.turn_speed;
        }

        let world = self.rotation() * direction;
        self.velocity += world * (delta * params.acceleration);
        self.position = params.bounds.clamp(self.position + self.velocity);
        self.velocity *= params.damping;

        if self.velocity.length() < params.rest_epsilon {
            self.velocity = Vec3::ZERO;
        }
    }
}
