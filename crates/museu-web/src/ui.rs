//! UI overlays using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass, EguiTextureHandle};
use museu_core::AvatarChoice;
use museu_scene::ui::{render_artwork_card, render_avatar_button, render_controls_hint, render_load_status};
use museu_scene::{begin_tour, Gallery, LoadStatus, MuseumSettings, NearbyArtwork, SelectedAvatar, TourState};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.init_resource::<Portraits>().add_systems(
            EguiPrimaryContextPass,
            (
                welcome_screen.run_if(in_state(TourState::Welcome)),
                tour_overlay.run_if(in_state(TourState::Touring)),
            ),
        );
    }
}

/// Roster portraits registered as egui textures, one slot per avatar
#[derive(Resource, Default)]
struct Portraits {
    textures: Vec<Option<egui::TextureId>>,
}

impl Portraits {
    /// Register every configured portrait once per roster
    fn sync(
        &mut self,
        avatars: &[AvatarChoice],
        mut register: impl FnMut(&str) -> egui::TextureId,
    ) {
        if self.textures.len() == avatars.len() {
            return;
        }
        self.textures = avatars
            .iter()
            .map(|avatar| avatar.portrait.as_deref().map(&mut register))
            .collect();
    }

    fn get(&self, index: usize) -> Option<egui::TextureId> {
        self.textures.get(index).copied().flatten()
    }
}

/// Start screen with the avatar roster
fn welcome_screen(
    mut contexts: EguiContexts,
    settings: Res<MuseumSettings>,
    asset_server: Res<AssetServer>,
    mut portraits: ResMut<Portraits>,
    mut selected: ResMut<SelectedAvatar>,
    mut next_state: ResMut<NextState<TourState>>,
) {
    portraits.sync(&settings.0.avatars, |path| {
        contexts.add_image(EguiTextureHandle::Strong(asset_server.load(path.to_string())))
    });

    let Ok(ctx) = contexts.ctx_mut() else { return };

    let mut picked = None;
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.heading(egui::RichText::new("Bem-vindo ao Museu Virtual").size(32.0));
            ui.label("Escolha seu avatar para iniciar o tour");
            ui.add_space(24.0);

            ui.horizontal_wrapped(|ui| {
                for (index, avatar) in settings.0.avatars.iter().enumerate() {
                    if render_avatar_button(ui, avatar, portraits.get(index)) {
                        picked = Some(avatar.clone());
                    }
                }
            });

            ui.add_space(24.0);
            if ui.button("Iniciar tour").clicked() && picked.is_none() {
                picked = settings.0.avatars.first().cloned();
            }

            ui.add_space(48.0);
            ui.label(
                egui::RichText::new("Por Matheus Viana, Thales e Webert")
                    .small()
                    .color(egui::Color32::GRAY),
            );
        });
    });

    if let Some(avatar) = picked {
        begin_tour(&mut selected, &mut next_state, avatar);
    }
}

/// In-tour overlay: loading progress, controls hint, leave button and the
/// card for the nearby artwork
fn tour_overlay(
    mut contexts: EguiContexts,
    status: Res<LoadStatus>,
    nearby: Res<NearbyArtwork>,
    gallery: Res<Gallery>,
    mut next_state: ResMut<NextState<TourState>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::Window::new("Museu Virtual")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            render_load_status(ui, &status);
            render_controls_hint(ui);
            ui.separator();
            if ui.button("Sair do tour").clicked() {
                next_state.set(TourState::Welcome);
            }
        });

    if let Some(placed) = nearby.0.and_then(|index| gallery.get(index)) {
        egui::Window::new("artwork_card")
            .title_bar(false)
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .resizable(false)
            .default_width(420.0)
            .show(ctx, |ui| {
                render_artwork_card(ui, placed);
            });
    }
}
