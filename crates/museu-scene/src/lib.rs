//! Museu Scene - Bevy plugins for the virtual museum walkthrough
//!
//! This crate wires the renderer-free logic of `museu-core` into Bevy:
//! room construction, model loading and animation, keyboard controls,
//! proximity sampling, the follow camera and the tour lifecycle. The egui
//! widgets in [`ui`] are shared by the front ends.

pub mod camera;
pub mod controls;
pub mod models;
pub mod scene;
pub mod tour;
pub mod types;
pub mod ui;

use bevy::prelude::*;

/// Plugin that sets up the whole walkthrough
pub struct MuseumScenePlugin;

impl Plugin for MuseumScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MuseumSettings>()
            .configure_sets(
                Update,
                (
                    TourSet::Input,
                    TourSet::Motion,
                    TourSet::Animation,
                    TourSet::Proximity,
                    TourSet::Camera,
                )
                    .chain()
                    .run_if(in_state(TourState::Touring)),
            )
            .add_plugins(tour::TourPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(controls::ControlsPlugin);
    }
}

// Re-export commonly used types
pub use tour::begin_tour;
pub use types::*;
