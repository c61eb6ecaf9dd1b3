//! Shared UI components for the tour overlay

use bevy_egui::egui;
use museu_core::{AvatarChoice, PlacedArtwork};

use crate::types::{LoadStatus, SlotStatus};

/// Render the card for the artwork the avatar stands next to
pub fn render_artwork_card(ui: &mut egui::Ui, placed: &PlacedArtwork) {
    let artwork = &placed.artwork;
    ui.heading(&artwork.title);
    if !artwork.description.is_empty() {
        ui.separator();
        egui::ScrollArea::vertical()
            .max_height(160.0)
            .show(ui, |ui| {
                ui.label(&artwork.description);
            });
    }
    if let Some(link) = &artwork.link {
        ui.add_space(4.0);
        ui.hyperlink_to("Saiba mais", link);
    }
}

/// Render model loading progress; nothing once everything has settled
pub fn render_load_status(ui: &mut egui::Ui, status: &LoadStatus) {
    match status.avatar {
        SlotStatus::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Carregando avatar...");
            });
        }
        SlotStatus::Failed => {
            ui.label(egui::RichText::new("Avatar indisponível").color(egui::Color32::GRAY));
        }
        SlotStatus::Idle | SlotStatus::Ready => {}
    }

    let settled = status.artworks_ready + status.artworks_failed;
    if settled < status.artworks_total {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(format!("Obras: {}/{}", settled, status.artworks_total));
        });
    }
}

/// Render the keyboard/mouse hint
pub fn render_controls_hint(ui: &mut egui::Ui) {
    ui.label(
        egui::RichText::new("W/S ou ↑/↓: andar   A/D ou ←/→: girar")
            .small()
            .color(egui::Color32::GRAY),
    );
    ui.label(
        egui::RichText::new("Arraste com o mouse: girar câmera   Esc: sair")
            .small()
            .color(egui::Color32::GRAY),
    );
}

/// Size of a portrait card on the start screen
pub const PORTRAIT_SIZE: egui::Vec2 = egui::vec2(140.0, 140.0);

/// Render one avatar on the start screen, its portrait above its name;
/// returns true when picked
pub fn render_avatar_button(
    ui: &mut egui::Ui,
    avatar: &AvatarChoice,
    portrait: Option<egui::TextureId>,
) -> bool {
    ui.vertical(|ui| {
        let portrait_clicked = portrait.is_some_and(|texture| {
            ui.add(egui::Image::new((texture, PORTRAIT_SIZE)).sense(egui::Sense::click()))
                .clicked()
        });
        let button = egui::Button::new(egui::RichText::new(&avatar.name).size(18.0))
            .min_size(egui::vec2(PORTRAIT_SIZE.x, 36.0));
        let name_clicked = ui.add(button).clicked();
        portrait_clicked || name_clicked
    })
    .inner
}
