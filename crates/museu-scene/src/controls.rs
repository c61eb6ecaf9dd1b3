//! Keyboard capture, avatar motion and proximity sampling

use bevy::prelude::*;
use museu_core::MovementKeys;

use crate::types::*;

/// Plugin for avatar controls
pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeldKeys>()
            .init_resource::<NearbyArtwork>()
            .init_resource::<Proximity>()
            .add_message::<NearbyArtworkChanged>()
            .add_systems(Update, capture_keys.in_set(TourSet::Input))
            .add_systems(Update, drive_avatar.in_set(TourSet::Motion))
            .add_systems(
                Update,
                (sample_proximity, announce_nearby)
                    .chain()
                    .in_set(TourSet::Proximity),
            );
    }
}

/// Map physical keys to movement: W/S and the up/down arrows move, A/D and
/// left/right arrows turn.
pub fn movement_keys(input: &ButtonInput<KeyCode>) -> MovementKeys {
    MovementKeys {
        forward: input.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]),
        back: input.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]),
        left: input.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]),
        right: input.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]),
    }
}

fn capture_keys(input: Res<ButtonInput<KeyCode>>, mut held: ResMut<HeldKeys>) {
    let keys = movement_keys(&input);
    if held.0 != keys {
        held.0 = keys;
    }
}

/// Integrate the avatar and copy the result onto its transform
fn drive_avatar(
    held: Res<HeldKeys>,
    settings: Res<MuseumSettings>,
    time: Res<Time>,
    mut avatars: Query<(&mut Avatar, &mut Transform)>,
) {
    let params = settings.motion();
    for (mut avatar, mut transform) in &mut avatars {
        let Some(delta) = avatar.throttle.tick(time.delta_secs()) else {
            continue;
        };
        avatar.state.integrate(&held.0, delta, &params);
        transform.translation = avatar.state.position;
        transform.rotation = avatar.state.rotation();
    }
}

fn sample_proximity(
    mut proximity: ResMut<Proximity>,
    mut nearby: ResMut<NearbyArtwork>,
    gallery: Res<Gallery>,
    avatars: Query<&Avatar>,
    mut changes: MessageWriter<NearbyArtworkChanged>,
) {
    let Ok(avatar) = avatars.single() else {
        return;
    };
    if let Some(change) = proximity.0.observe(avatar.state.position, &gallery.artworks) {
        nearby.0 = change.current;
        changes.write(NearbyArtworkChanged {
            previous: change.previous,
            current: change.current,
        });
    }
}

fn announce_nearby(mut changes: MessageReader<NearbyArtworkChanged>, gallery: Res<Gallery>) {
    for change in changes.read() {
        match change.current.and_then(|index| gallery.get(index)) {
            Some(placed) => tracing::info!("Near artwork: {}", placed.artwork.title),
            None => tracing::debug!("Left artwork {:?}", change.previous),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_arrows_map_to_same_keys() {
        let mut input = ButtonInput::<KeyCode>::default();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::ArrowLeft);
        let keys = movement_keys(&input);
        assert!(keys.forward && keys.left);
        assert!(!keys.back && !keys.right);

        input.release(KeyCode::KeyW);
        input.press(KeyCode::ArrowDown);
        input.press(KeyCode::KeyD);
        let keys = movement_keys(&input);
        assert!(keys.back && keys.right && keys.left);
        assert!(!keys.forward);
    }

    #[test]
    fn test_unrelated_keys_are_ignored() {
        let mut input = ButtonInput::<KeyCode>::default();
        input.press(KeyCode::Space);
        input.press(KeyCode::KeyQ);
        assert!(movement_keys(&input).is_idle());
    }
}
