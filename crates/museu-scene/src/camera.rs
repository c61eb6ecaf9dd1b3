//! Third-person follow camera with a drag-to-orbit override

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use museu_core::CameraRig;

use crate::types::*;

/// Plugin for the follow camera
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(OnEnter(TourState::Touring), settle_camera)
            .add_systems(
                Update,
                (orbit_camera, follow_avatar).chain().in_set(TourSet::Camera),
            );
    }
}

/// The camera outlives tours so the egui context stays attached to it
fn spawn_camera(mut commands: Commands, settings: Res<MuseumSettings>) {
    let camera = &settings.0.camera;
    let params = settings.follow();
    let spawn = settings.spawn_point();
    let rig = CameraRig::settled(spawn, 0.0, &params);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov_degrees.to_radians(),
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        Transform::from_translation(rig.position).looking_at(params.focus(spawn), Vec3::Y),
        MainCamera,
        FollowCamera { rig },
    ));
}

/// Put the rig behind the freshly spawned avatar so the tour opens without a sweep
fn settle_camera(
    settings: Res<MuseumSettings>,
    mut cameras: Query<(&mut FollowCamera, &mut Transform), With<MainCamera>>,
) {
    let Ok((mut follow, mut transform)) = cameras.single_mut() else {
        return;
    };
    let params = settings.follow();
    let spawn = settings.spawn_point();
    follow.rig = CameraRig::settled(spawn, 0.0, &params);
    *transform = Transform::from_translation(follow.rig.position).looking_at(params.focus(spawn), Vec3::Y);
}

/// Left-drag swings the camera around the avatar and suspends follow
fn orbit_camera(
    mut cameras: Query<&mut FollowCamera, With<MainCamera>>,
    avatars: Query<&Avatar>,
    settings: Res<MuseumSettings>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut contexts: bevy_egui::EguiContexts,
) {
    let Ok(mut follow) = cameras.single_mut() else {
        return;
    };

    // Check if egui wants the mouse - if so, don't process camera controls
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let dragging = mouse_button.pressed(MouseButton::Left) && !egui_wants_pointer;
    if follow.rig.user_interacting != dragging {
        follow.rig.user_interacting = dragging;
    }
    if !dragging || mouse_motion.delta == Vec2::ZERO {
        return;
    }

    let Ok(avatar) = avatars.single() else {
        return;
    };
    let sensitivity = settings.0.camera.orbit_sensitivity;
    let focus = settings.follow().focus(avatar.state.position);
    follow.rig.orbit(
        focus,
        -mouse_motion.delta.x * sensitivity,
        mouse_motion.delta.y * sensitivity,
    );
}

fn follow_avatar(
    settings: Res<MuseumSettings>,
    avatars: Query<&Avatar>,
    mut cameras: Query<(&mut FollowCamera, &mut Transform), With<MainCamera>>,
) {
    let Ok(avatar) = avatars.single() else {
        return;
    };
    let Ok((mut follow, mut transform)) = cameras.single_mut() else {
        return;
    };

    let params = settings.follow();
    let pose = follow
        .rig
        .update(avatar.state.position, avatar.state.heading, &params);
    *transform = Transform::from_translation(pose.position).looking_at(pose.look_at, Vec3::Y);
}
