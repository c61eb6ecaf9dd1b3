//! Room construction - floor, walls, ceiling, lamps and lights

use bevy::asset::LoadState;
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::math::Affine2;
use bevy::prelude::*;
use museu_core::config::{LightingConfig, RoomConfig};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::types::*;

/// Plugin for room setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoomTextures>()
            .add_systems(OnEnter(TourState::Touring), (spawn_room, spawn_lights))
            .add_systems(
                Update,
                fallback_missing_textures.run_if(in_state(TourState::Touring)),
            );
    }
}

/// Textures in flight and the materials that use them
#[derive(Resource, Default)]
pub struct RoomTextures {
    pub pending: Vec<(String, Handle<Image>, Handle<StandardMaterial>)>,
}

/// Center and size of one wall box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBox {
    pub center: Vec3,
    pub size: Vec3,
}

/// The four walls, placed on the room's edge lines
pub fn wall_boxes(room: &RoomConfig) -> [WallBox; 4] {
    let e = room.half_extent;
    let h = room.wall_height;
    let t = room.wall_thickness;
    let span = 2.0 * e;
    let y = h / 2.0;
    [
        WallBox { center: Vec3::new(0.0, y, -e), size: Vec3::new(span, h, t) },
        WallBox { center: Vec3::new(0.0, y, e), size: Vec3::new(span, h, t) },
        WallBox { center: Vec3::new(-e, y, 0.0), size: Vec3::new(t, h, span) },
        WallBox { center: Vec3::new(e, y, 0.0), size: Vec3::new(t, h, span) },
    ]
}

/// Lamp disc positions just below the ceiling
pub fn lamp_positions(room: &RoomConfig) -> Vec<Vec3> {
    room.lamps
        .iter()
        .map(|[x, z]| Vec3::new(*x, room.wall_height - 0.01, *z))
        .collect()
}

fn repeating_texture(asset_server: &AssetServer, path: &str) -> Handle<Image> {
    asset_server.load_with_settings(path.to_string(), |settings: &mut ImageLoaderSettings| {
        settings.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
            address_mode_u: ImageAddressMode::Repeat,
            address_mode_v: ImageAddressMode::Repeat,
            ..default()
        });
    })
}

fn spawn_room(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut textures: ResMut<RoomTextures>,
    asset_server: Res<AssetServer>,
    settings: Res<MuseumSettings>,
) {
    let room = &settings.0.room;
    let span = 2.0 * room.half_extent;

    let floor_texture = repeating_texture(&asset_server, &room.floor_texture);
    let floor_material = materials.add(StandardMaterial {
        base_color_texture: Some(floor_texture.clone()),
        uv_transform: Affine2::from_scale(Vec2::splat(room.texture_repeat)),
        perceptual_roughness: 0.8,
        ..default()
    });
    // The ceiling reuses the floor texture, seen from inside the room
    let ceiling_material = materials.add(StandardMaterial {
        base_color_texture: Some(floor_texture.clone()),
        uv_transform: Affine2::from_scale(Vec2::splat(room.texture_repeat)),
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    let wall_texture = repeating_texture(&asset_server, &room.wall_texture);
    let wall_material = materials.add(StandardMaterial {
        base_color_texture: Some(wall_texture.clone()),
        perceptual_roughness: 0.9,
        ..default()
    });

    textures.pending = vec![
        (room.floor_texture.clone(), floor_texture.clone(), floor_material.clone()),
        (room.floor_texture.clone(), floor_texture, ceiling_material.clone()),
        (room.wall_texture.clone(), wall_texture, wall_material.clone()),
    ];

    let plane = meshes.add(Plane3d::default().mesh().size(span, span));

    commands.spawn((
        Mesh3d(plane.clone()),
        MeshMaterial3d(floor_material),
        Transform::IDENTITY,
        TourEntity,
    ));

    commands.spawn((
        Mesh3d(plane),
        MeshMaterial3d(ceiling_material),
        Transform::from_xyz(0.0, room.wall_height, 0.0).with_rotation(Quat::from_rotation_x(PI)),
        TourEntity,
    ));

    for wall in wall_boxes(room) {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(wall.size))),
            MeshMaterial3d(wall_material.clone()),
            Transform::from_translation(wall.center),
            TourEntity,
        ));
    }

    tracing::debug!("Room built: {} x {} m", span, span);
}

fn spawn_lights(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<MuseumSettings>,
) {
    let room = &settings.0.room;
    let lighting: &LightingConfig = &settings.0.lighting;
    let [r, g, b] = lighting.ambient_color;

    commands.insert_resource(AmbientLight {
        color: Color::srgb(r, g, b),
        brightness: lighting.ambient_brightness,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: lighting.directional_illuminance,
            shadows_enabled: lighting.shadows,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(lighting.directional_position))
            .looking_at(Vec3::ZERO, Vec3::Y),
        TourEntity,
    ));

    let [lr, lg, lb] = lighting.lamp_color;
    let lamp_color = Color::srgb(lr, lg, lb);
    let disc = meshes.add(Circle::new(0.3));
    let disc_material = materials.add(StandardMaterial {
        base_color: lamp_color,
        emissive: LinearRgba::from(lamp_color) * 4.0,
        unlit: true,
        ..default()
    });

    for position in lamp_positions(room) {
        // Circle meshes face +Z; tip them to face the floor
        commands.spawn((
            Mesh3d(disc.clone()),
            MeshMaterial3d(disc_material.clone()),
            Transform::from_translation(position).with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
            TourEntity,
        ));
        commands.spawn((
            PointLight {
                color: lamp_color,
                intensity: lighting.lamp_intensity,
                range: lighting.lamp_range,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(position - Vec3::Y * 0.2),
            TourEntity,
        ));
    }
}

/// Strip textures that failed to load so the surface renders in plain colour
fn fallback_missing_textures(
    mut textures: ResMut<RoomTextures>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
) {
    if textures.pending.is_empty() {
        return;
    }
    textures.pending.retain(|(path, image, material)| {
        match asset_server.get_load_state(image.id()) {
            Some(LoadState::Loaded) => false,
            Some(LoadState::Failed(_)) => {
                tracing::error!("Failed to load texture: {}", path);
                if let Some(material) = materials.get_mut(material) {
                    material.base_color_texture = None;
                    material.base_color = Color::srgb(0.85, 0.83, 0.8);
                }
                false
            }
            _ => true,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walls_sit_on_room_edges() {
        let room = RoomConfig::default();
        let walls = wall_boxes(&room);

        for wall in &walls {
            let on_x_edge = (wall.center.x.abs() - room.half_extent).abs() < 1e-6;
            let on_z_edge = (wall.center.z.abs() - room.half_extent).abs() < 1e-6;
            assert!(on_x_edge ^ on_z_edge);
            assert_eq!(wall.center.y, room.wall_height / 2.0);
            assert_eq!(wall.size.y, room.wall_height);
            assert_eq!(wall.size.min_element(), room.wall_thickness);
            assert_eq!(wall.size.max_element(), 2.0 * room.half_extent);
        }
    }

    #[test]
    fn test_walkable_area_clears_walls() {
        let room = RoomConfig::default();
        let inner_face = room.half_extent - room.wall_thickness / 2.0;
        assert!(room.bounds().limit <= inner_face);
    }

    #[test]
    fn test_lamps_hang_under_ceiling() {
        let room = RoomConfig::default();
        let lamps = lamp_positions(&room);
        assert_eq!(lamps.len(), 4);
        for lamp in lamps {
            assert!(lamp.y < room.wall_height);
            assert!(lamp.x.abs() < room.half_extent && lamp.z.abs() < room.half_extent);
        }
    }
}
