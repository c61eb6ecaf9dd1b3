//! Tour lifecycle - entering from the start screen and tearing down on exit

use bevy::prelude::*;
use museu_core::AvatarChoice;

use crate::models::ModelLoads;
use crate::scene::RoomTextures;
use crate::types::*;

/// Plugin for the tour state machine
pub struct TourPlugin;

impl Plugin for TourPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<TourState>()
            .init_resource::<SelectedAvatar>()
            .add_systems(OnEnter(TourState::Touring), prepare_tour)
            .add_systems(OnExit(TourState::Touring), teardown_tour)
            .add_systems(
                Update,
                leave_on_escape.run_if(in_state(TourState::Touring)),
            );
    }
}

/// Pick an avatar and enter the tour
pub fn begin_tour(
    selected: &mut SelectedAvatar,
    next_state: &mut NextState<TourState>,
    avatar: AvatarChoice,
) {
    tracing::info!("Starting tour as {}", avatar.name);
    selected.0 = Some(avatar);
    next_state.set(TourState::Touring);
}

fn prepare_tour(settings: Res<MuseumSettings>, mut proximity: ResMut<Proximity>) {
    proximity.0 = museu_core::ProximityDetector::new(settings.0.proximity.sample_every);
}

fn leave_on_escape(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<TourState>>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        next_state.set(TourState::Welcome);
    }
}

/// Despawn every tour entity and reset per-tour state so the next tour starts clean
fn teardown_tour(
    mut commands: Commands,
    tour_entities: Query<Entity, With<TourEntity>>,
    mut keys: ResMut<ButtonInput<KeyCode>>,
    mut held: ResMut<HeldKeys>,
    mut proximity: ResMut<Proximity>,
    mut nearby: ResMut<NearbyArtwork>,
    mut animation: ResMut<AvatarAnimation>,
    mut loads: ResMut<ModelLoads>,
    mut status: ResMut<LoadStatus>,
    mut textures: ResMut<RoomTextures>,
    mut gallery: ResMut<Gallery>,
) {
    let count = tour_entities.iter().count();
    for entity in &tour_entities {
        commands.entity(entity).despawn();
    }

    keys.reset_all();
    *held = HeldKeys::default();
    proximity.0.reset();
    *nearby = NearbyArtwork::default();
    animation.reset();
    loads.pending.clear();
    *status = LoadStatus::default();
    textures.pending.clear();
    gallery.artworks.clear();

    tracing::info!("Tour ended, {} entities removed", count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use museu_core::config::GalleryConfig;
    use museu_core::{layout, AnimationState, Artwork, MovementKeys, PlacementOffset};

    use crate::models::{ModelSlot, PendingModel};

    fn tour_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, TourPlugin))
            .init_resource::<MuseumSettings>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<HeldKeys>()
            .init_resource::<NearbyArtwork>()
            .init_resource::<Proximity>()
            .init_resource::<AvatarAnimation>()
            .init_resource::<ModelLoads>()
            .init_resource::<LoadStatus>()
            .init_resource::<RoomTextures>()
            .init_resource::<Gallery>();
        app
    }

    fn set_state(app: &mut App, state: TourState) {
        app.world_mut()
            .resource_mut::<NextState<TourState>>()
            .set(state);
        app.update();
        assert_eq!(*app.world().resource::<State<TourState>>().get(), state);
    }

    #[test]
    fn test_leaving_tour_resets_everything() {
        let mut app = tour_app();
        app.update();
        set_state(&mut app, TourState::Touring);

        let world = app.world_mut();
        world.spawn(TourEntity);
        world.spawn((TourEntity, Transform::default()));
        let camera = world.spawn(MainCamera).id();
        let avatar = world.spawn((TourEntity, Transform::default())).id();

        let artwork = Artwork {
            id: "abaporu".into(),
            title: "Abaporu".into(),
            description: String::new(),
            link: None,
            model: "obras/abaporu.glb".into(),
            offset: PlacementOffset::default(),
            radius: None,
        };
        let artworks = layout(&[artwork], &GalleryConfig::default(), 2.0);
        let standing = artworks[0].position;

        world.resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::KeyW);
        world.resource_mut::<HeldKeys>().0.forward = true;
        world.resource_mut::<NearbyArtwork>().0 = Some(0);
        assert!(world
            .resource_mut::<Proximity>()
            .0
            .sample(standing, &artworks)
            .is_some());
        world.resource_mut::<Gallery>().artworks = artworks;
        {
            let mut animation = world.resource_mut::<AvatarAnimation>();
            animation.switch.start(AnimationState::Walk);
            animation.graph = Some(Handle::default());
            animation.player = Some(avatar);
        }
        world.resource_mut::<ModelLoads>().pending.push(PendingModel {
            slot: ModelSlot::Avatar,
            path: "avatares/jody.glb".into(),
            target: avatar,
            scale: 1.0,
            handle: Handle::default(),
        });
        *world.resource_mut::<LoadStatus>() = LoadStatus {
            avatar: SlotStatus::Ready,
            artworks_total: 1,
            artworks_ready: 1,
            artworks_failed: 0,
        };

        set_state(&mut app, TourState::Welcome);

        let world = app.world_mut();
        let mut tour_entities = world.query_filtered::<(), With<TourEntity>>();
        assert_eq!(tour_entities.iter(world).count(), 0);
        // The camera outlives the tour
        assert!(world.get_entity(camera).is_ok());

        assert!(!world.resource::<ButtonInput<KeyCode>>().pressed(KeyCode::KeyW));
        assert_eq!(world.resource::<HeldKeys>().0, MovementKeys::default());
        assert_eq!(world.resource::<NearbyArtwork>().0, None);
        assert_eq!(world.resource::<Proximity>().0.current(), None);

        let animation = world.resource::<AvatarAnimation>();
        assert_eq!(animation.switch.current(), None);
        assert!(animation.graph.is_none());
        assert!(animation.player.is_none());

        assert!(world.resource::<ModelLoads>().pending.is_empty());
        let status = world.resource::<LoadStatus>();
        assert_eq!(status.avatar, SlotStatus::Idle);
        assert_eq!(status.artworks_total, 0);
        assert!(world.resource::<Gallery>().artworks.is_empty());
    }

    #[test]
    fn test_second_tour_starts_clean() {
        let mut app = tour_app();
        app.update();
        set_state(&mut app, TourState::Touring);
        app.world_mut().spawn(TourEntity);
        set_state(&mut app, TourState::Welcome);
        set_state(&mut app, TourState::Touring);

        let world = app.world_mut();
        let mut tour_entities = world.query_filtered::<(), With<TourEntity>>();
        assert_eq!(tour_entities.iter(world).count(), 0);
        assert_eq!(world.resource::<Proximity>().0.current(), None);
    }
}
