//! Bevy application setup

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;
use museu_core::MuseumConfig;
use museu_scene::{begin_tour, MuseumScenePlugin, MuseumSettings, SelectedAvatar, TourState};

use crate::ui::UiPlugin;

/// Everything the launcher decides before the app starts
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub config: MuseumConfig,
    /// Directory (native) or URL prefix (web) assets are loaded from
    pub asset_root: String,
    /// Avatar name that skips the start screen
    pub avatar: Option<String>,
}

/// Avatar requested at launch, applied once the state machine exists
#[derive(Debug, Clone, Resource, Default)]
struct PreselectedAvatar(Option<String>);

/// Run the Bevy application
pub fn run(options: LaunchOptions) {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.08, 0.07, 0.06)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Museu Virtual".to_string(),
                        canvas: Some("#museu-canvas".to_string()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: options.asset_root,
                    // Don't look for .meta files - the static host doesn't have them
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // These must be added BEFORE EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .insert_resource(MuseumSettings(options.config))
        .insert_resource(PreselectedAvatar(options.avatar))
        .add_plugins(MuseumScenePlugin)
        .add_plugins(UiPlugin)
        .add_systems(Startup, apply_preselected_avatar)
        .run();
}

fn apply_preselected_avatar(
    preselected: Res<PreselectedAvatar>,
    settings: Res<MuseumSettings>,
    mut selected: ResMut<SelectedAvatar>,
    mut next_state: ResMut<NextState<TourState>>,
) {
    let Some(name) = preselected.0.as_deref() else {
        return;
    };
    match settings.0.find_avatar(name) {
        Some(avatar) => begin_tour(&mut selected, &mut next_state, avatar.clone()),
        None => tracing::warn!("Unknown avatar '{}', showing the start screen", name),
    }
}
