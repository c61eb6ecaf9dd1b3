//! glTF model loading for the avatar and the artworks, and the idle/walk
//! animation wiring

use bevy::asset::LoadState;
use bevy::prelude::*;
use museu_core::animation::find_clip;
use museu_core::{layout, AnimationState, AnimationSwitch, AvatarState, FixedStep};

use crate::types::*;

/// Plugin for model loading
pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelLoads>()
            .init_resource::<LoadStatus>()
            .init_resource::<Gallery>()
            .init_resource::<AvatarAnimation>()
            .add_systems(OnEnter(TourState::Touring), (spawn_avatar, spawn_artworks))
            .add_systems(
                Update,
                (load_models, attach_animation_player)
                    .chain()
                    .before(TourSet::Input)
                    .run_if(in_state(TourState::Touring)),
            )
            .add_systems(Update, switch_animation.in_set(TourSet::Animation));
    }
}

/// What a pending model becomes once loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSlot {
    Avatar,
    Artwork(usize),
}

#[derive(Debug, Clone)]
pub struct PendingModel {
    pub slot: ModelSlot,
    pub path: String,
    /// Entity the scene is attached under
    pub target: Entity,
    pub scale: f32,
    pub handle: Handle<Gltf>,
}

/// glTF files still loading
#[derive(Resource, Default)]
pub struct ModelLoads {
    pub pending: Vec<PendingModel>,
}

/// Spawn the avatar group; its model is attached once the glTF resolves
fn spawn_avatar(
    mut commands: Commands,
    mut loads: ResMut<ModelLoads>,
    mut status: ResMut<LoadStatus>,
    mut animation: ResMut<AvatarAnimation>,
    selected: Res<SelectedAvatar>,
    settings: Res<MuseumSettings>,
    asset_server: Res<AssetServer>,
) {
    let spawn = settings.spawn_point();
    let state = AvatarState::new(spawn);
    let target = commands
        .spawn((
            Avatar {
                state,
                throttle: FixedStep::from_rate(settings.0.motion.max_updates_per_second),
            },
            Transform::from_translation(spawn).with_rotation(state.rotation()),
            Visibility::default(),
            TourEntity,
        ))
        .id();

    animation.switch = AnimationSwitch::from_config(&settings.0.animation);

    let Some(choice) = selected.0.as_ref().or_else(|| settings.0.avatars.first()) else {
        tracing::warn!("No avatar available, touring without a model");
        return;
    };

    tracing::info!("Loading avatar {} from {}", choice.name, choice.model);
    loads.pending.push(PendingModel {
        slot: ModelSlot::Avatar,
        path: choice.model.clone(),
        target,
        scale: settings.0.motion.avatar_scale,
        handle: asset_server.load(choice.model.clone()),
    });
    status.avatar = SlotStatus::Loading;
}

/// Place every catalog artwork and start loading its model
fn spawn_artworks(
    mut commands: Commands,
    mut loads: ResMut<ModelLoads>,
    mut status: ResMut<LoadStatus>,
    mut gallery: ResMut<Gallery>,
    settings: Res<MuseumSettings>,
    asset_server: Res<AssetServer>,
) {
    let config = &settings.0;
    gallery.artworks = layout(
        &config.artworks,
        &config.gallery,
        config.proximity.default_radius,
    );
    status.artworks_total = gallery.artworks.len();
    status.artworks_ready = 0;
    status.artworks_failed = 0;

    for placed in &gallery.artworks {
        let target = commands
            .spawn((
                ArtworkEntity { index: placed.index },
                Transform::from_translation(placed.position)
                    .with_rotation(Quat::from_rotation_y(placed.yaw)),
                Visibility::default(),
                Name::new(placed.artwork.id.clone()),
                TourEntity,
            ))
            .id();

        loads.pending.push(PendingModel {
            slot: ModelSlot::Artwork(placed.index),
            path: placed.artwork.model.clone(),
            target,
            scale: placed.scale,
            handle: asset_server.load(placed.artwork.model.clone()),
        });
    }

    tracing::info!("Placed {} artworks", gallery.artworks.len());
}

/// Check loading state and attach scenes from loaded glTFs
fn load_models(
    mut commands: Commands,
    mut loads: ResMut<ModelLoads>,
    mut status: ResMut<LoadStatus>,
    mut animation: ResMut<AvatarAnimation>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    settings: Res<MuseumSettings>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
) {
    if loads.pending.is_empty() {
        return;
    }

    let mut still_loading = Vec::new();
    for pending in loads.pending.drain(..) {
        match asset_server.get_load_state(pending.handle.id()) {
            Some(LoadState::Loaded) => {
                let Some(gltf) = gltf_assets.get(&pending.handle) else {
                    still_loading.push(pending);
                    continue;
                };
                let scene = gltf
                    .default_scene
                    .clone()
                    .or_else(|| gltf.scenes.first().cloned());
                let Some(scene) = scene else {
                    tracing::error!("Model has no scene: {}", pending.path);
                    mark_failed(&mut status, pending.slot);
                    continue;
                };

                if let Ok(mut target) = commands.get_entity(pending.target) {
                    target.with_children(|parent| {
                        parent.spawn((
                            SceneRoot(scene),
                            Transform::from_scale(Vec3::splat(pending.scale)),
                        ));
                    });
                }

                if pending.slot == ModelSlot::Avatar {
                    let idle = AnimationState::Idle.clip_name(&settings.0.animation);
                    let walk = AnimationState::Walk.clip_name(&settings.0.animation);
                    build_animation_graph(&mut animation, &mut graphs, gltf, idle, walk);
                }

                tracing::info!("Model loaded: {}", pending.path);
                match pending.slot {
                    ModelSlot::Avatar => status.avatar = SlotStatus::Ready,
                    ModelSlot::Artwork(_) => status.artworks_ready += 1,
                }
            }
            Some(LoadState::Failed(_)) => {
                tracing::error!("Failed to load model: {}", pending.path);
                mark_failed(&mut status, pending.slot);
            }
            _ => still_loading.push(pending),
        }
    }
    loads.pending = still_loading;
}

fn mark_failed(status: &mut LoadStatus, slot: ModelSlot) {
    match slot {
        ModelSlot::Avatar => status.avatar = SlotStatus::Failed,
        ModelSlot::Artwork(_) => status.artworks_failed += 1,
    }
}

/// Build a two-clip graph from the avatar's named animations
fn build_animation_graph(
    animation: &mut AvatarAnimation,
    graphs: &mut Assets<AnimationGraph>,
    gltf: &Gltf,
    idle_name: &str,
    walk_name: &str,
) {
    let names = || gltf.named_animations.keys().map(|name| name.as_ref());
    let idle_clip = find_clip(names(), idle_name).and_then(|name| gltf.named_animations.get(name));
    let walk_clip = find_clip(names(), walk_name).and_then(|name| gltf.named_animations.get(name));

    if idle_clip.is_none() {
        tracing::warn!("Avatar has no '{}' clip", idle_name);
    }
    if walk_clip.is_none() {
        tracing::warn!("Avatar has no '{}' clip", walk_name);
    }

    let clips: Vec<Handle<AnimationClip>> = idle_clip.into_iter().chain(walk_clip).cloned().collect();
    if clips.is_empty() {
        return;
    }

    let (graph, nodes) = AnimationGraph::from_clips(clips);
    let mut nodes = nodes.into_iter();
    animation.idle = idle_clip.and_then(|_| nodes.next());
    animation.walk = walk_clip.and_then(|_| nodes.next());
    animation.graph = Some(graphs.add(graph));
}

/// Hook the graph onto the avatar's `AnimationPlayer` once the scene spawns it
fn attach_animation_player(
    mut commands: Commands,
    mut animation: ResMut<AvatarAnimation>,
    mut players: Query<(Entity, &mut AnimationPlayer), Added<AnimationPlayer>>,
    parents: Query<&ChildOf>,
    avatars: Query<(), With<Avatar>>,
    held: Res<HeldKeys>,
) {
    for (entity, mut player) in &mut players {
        let under_avatar = parents
            .iter_ancestors(entity)
            .any(|ancestor| avatars.contains(ancestor));
        if !under_avatar || animation.player.is_some() {
            continue;
        }
        let Some(graph) = animation.graph.clone() else {
            continue;
        };

        let mut transitions = AnimationTransitions::new();
        let initial = animation.switch.start(AnimationState::for_keys(&held.0));
        if let Some(node) = animation.node(initial.to) {
            transitions.play(&mut player, node, initial.fade).repeat();
        }

        commands
            .entity(entity)
            .insert((AnimationGraphHandle(graph), transitions));
        animation.player = Some(entity);
        tracing::debug!("Animation player attached, starting {:?}", initial.to);
    }
}

fn switch_animation(
    held: Res<HeldKeys>,
    mut animation: ResMut<AvatarAnimation>,
    mut players: Query<(&mut AnimationPlayer, &mut AnimationTransitions)>,
) {
    let Some(player_entity) = animation.player else {
        return;
    };
    let wanted = AnimationState::for_keys(&held.0);
    if animation.switch.current().is_none_or(|current| current == wanted) {
        return;
    }
    // Only commit the switch once the clip can actually start
    let Some(node) = animation.node(wanted) else {
        return;
    };
    let Ok((mut player, mut transitions)) = players.get_mut(player_entity) else {
        return;
    };
    let Some(transition) = animation.switch.request(wanted) else {
        return;
    };
    transitions
        .play(&mut player, node, transition.fade)
        .repeat();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use museu_core::MovementKeys;
    use std::time::Duration;

    fn animated_world() -> (World, Entity, AnimationNodeIndex) {
        let mut graph = AnimationGraph::new();
        let idle = graph.add_clip(Handle::default(), 1.0, graph.root);
        let walk = graph.add_clip(Handle::default(), 1.0, graph.root);

        let mut world = World::new();
        let player = world.spawn(AnimationPlayer::default()).id();

        let mut animation = AvatarAnimation::default();
        animation.switch.start(AnimationState::Idle);
        animation.idle = Some(idle);
        animation.walk = Some(walk);
        animation.player = Some(player);
        world.insert_resource(animation);
        world.insert_resource(HeldKeys(MovementKeys {
            forward: true,
            ..Default::default()
        }));

        (world, player, walk)
    }

    #[test]
    fn test_walk_starts_once_player_is_ready() {
        let (mut world, player, walk) = animated_world();

        // Player found but its transitions not inserted yet
        world.run_system_once(switch_animation).unwrap();
        assert_eq!(
            world.resource::<AvatarAnimation>().switch.current(),
            Some(AnimationState::Idle)
        );

        world.entity_mut(player).insert(AnimationTransitions::new());
        world.run_system_once(switch_animation).unwrap();

        let animation = world.resource::<AvatarAnimation>();
        assert_eq!(animation.switch.current(), Some(AnimationState::Walk));
        let transitions = world.get::<AnimationTransitions>(player).unwrap();
        assert_eq!(transitions.get_main_animation(), Some(walk));
    }

    #[test]
    fn test_missing_walk_clip_keeps_idle() {
        let (mut world, player, _) = animated_world();
        world.entity_mut(player).insert(AnimationTransitions::new());
        world.resource_mut::<AvatarAnimation>().walk = None;

        world.run_system_once(switch_animation).unwrap();
        assert_eq!(
            world.resource::<AvatarAnimation>().switch.current(),
            Some(AnimationState::Idle)
        );

        // Releasing the key is a no-op rather than a fade back to idle
        world.resource_mut::<HeldKeys>().0 = MovementKeys::default();
        world.run_system_once(switch_animation).unwrap();
        let transitions = world.get::<AnimationTransitions>(player).unwrap();
        assert_eq!(transitions.get_main_animation(), None);
    }

    fn loading_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Gltf>()
            .init_asset::<AnimationGraph>()
            .init_resource::<MuseumSettings>()
            .init_resource::<ModelLoads>()
            .init_resource::<LoadStatus>()
            .init_resource::<AvatarAnimation>()
            .add_systems(Update, load_models);
        app
    }

    #[test]
    fn test_failed_avatar_load_leaves_slot_empty() {
        let mut app = loading_app();
        let world = app.world_mut();
        let target = world.spawn(Transform::default()).id();
        let path = "avatares/missing.glb";
        let handle = world.resource::<AssetServer>().load(path);
        world.resource_mut::<ModelLoads>().pending.push(PendingModel {
            slot: ModelSlot::Avatar,
            path: path.to_string(),
            target,
            scale: 1.0,
            handle,
        });
        world.resource_mut::<LoadStatus>().avatar = SlotStatus::Loading;

        for _ in 0..500 {
            app.update();
            if app.world().resource::<ModelLoads>().pending.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }

        let world = app.world();
        assert!(world.resource::<ModelLoads>().pending.is_empty());
        assert_eq!(world.resource::<LoadStatus>().avatar, SlotStatus::Failed);
        assert!(!world.resource::<LoadStatus>().is_loading());
        assert!(world.resource::<AvatarAnimation>().graph.is_none());
        assert!(world.get::<Children>(target).is_none());
    }
}
