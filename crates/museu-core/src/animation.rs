//! Idle/walk animation switch
//!
//! A two-state machine sitting on top of the engine's animation player. The
//! switch only decides *when* to cross-fade and *to what*; playing the clips
//! is left to the caller.

use std::time::Duration;

use crate::config::AnimationConfig;
use crate::motion::MovementKeys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationState {
    Idle,
    Walk,
}

impl AnimationState {
    /// Walk while forward or back is held, idle otherwise
    pub fn for_keys(keys: &MovementKeys) -> Self {
        if keys.is_walking() {
            AnimationState::Walk
        } else {
            AnimationState::Idle
        }
    }

    /// Configured clip name for this state
    pub fn clip_name<'a>(&self, config: &'a AnimationConfig) -> &'a str {
        match self {
            AnimationState::Idle => &config.idle_clip,
            AnimationState::Walk => &config.walk_clip,
        }
    }
}

/// Pick the clip matching `wanted`, ignoring case
pub fn find_clip<'a, I>(names: I, wanted: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().find(|name| name.eq_ignore_ascii_case(wanted))
}

/// A cross-fade the caller should start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// `None` for the initial clip
    pub from: Option<AnimationState>,
    pub to: AnimationState,
    pub fade: Duration,
}

#[derive(Debug, Clone)]
pub struct AnimationSwitch {
    current: Option<AnimationState>,
    fade: Duration,
}

impl AnimationSwitch {
    pub fn new(fade: Duration) -> Self {
        Self { current: None, fade }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        Self::new(Duration::from_secs_f32(config.fade_seconds.max(0.0)))
    }

    pub fn current(&self) -> Option<AnimationState> {
        self.current
    }

    /// Clips are available: begin in `state` without fading
    pub fn start(&mut self, state: AnimationState) -> Transition {
        let transition = Transition {
            from: self.current,
            to: state,
            fade: Duration::ZERO,
        };
        self.current = Some(state);
        transition
    }

    /// Ask to be in `next`. Returns the cross-fade to perform, or `None` when
    /// already there or not started yet.
    pub fn request(&mut self, next: AnimationState) -> Option<Transition> {
        let current = self.current?;
        let to = match (current, next) {
            (AnimationState::Idle, AnimationState::Walk) => AnimationState::Walk,
            (AnimationState::Walk, AnimationState::Idle) => AnimationState::Idle,
            (AnimationState::Idle, AnimationState::Idle)
            | (AnimationState::Walk, AnimationState::Walk) => return None,
        };
        self.current = Some(to);
        Some(Transition {
            from: Some(current),
            to,
            fade: self.fade,
        })
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(forward: bool, back: bool) -> MovementKeys {
        MovementKeys {
            forward,
            back,
            ..Default::default()
        }
    }

    #[test]
    fn test_state_for_key_combinations() {
        assert_eq!(AnimationState::for_keys(&keys(false, false)), AnimationState::Idle);
        assert_eq!(AnimationState::for_keys(&keys(true, false)), AnimationState::Walk);
        assert_eq!(AnimationState::for_keys(&keys(false, true)), AnimationState::Walk);
        assert_eq!(AnimationState::for_keys(&keys(true, true)), AnimationState::Walk);

        // Turning alone does not walk
        let turning = MovementKeys {
            left: true,
            ..Default::default()
        };
        assert_eq!(AnimationState::for_keys(&turning), AnimationState::Idle);
    }

    #[test]
    fn test_requests_ignored_before_start() {
        let mut switch = AnimationSwitch::new(Duration::from_millis(500));
        assert!(switch.request(AnimationState::Walk).is_none());
        assert_eq!(switch.current(), None);

        let initial = switch.start(AnimationState::Idle);
        assert_eq!(initial.from, None);
        assert_eq!(initial.fade, Duration::ZERO);

        let walk = switch.request(AnimationState::Walk).unwrap();
        assert_eq!(walk.from, Some(AnimationState::Idle));
        assert_eq!(walk.to, AnimationState::Walk);
        assert_eq!(walk.fade, Duration::from_millis(500));
    }

    #[test]
    fn test_same_state_is_noop() {
        let mut switch = AnimationSwitch::new(Duration::from_millis(500));
        switch.start(AnimationState::Idle);

        assert!(switch.request(AnimationState::Idle).is_none());
        assert!(switch.request(AnimationState::Walk).is_some());
        assert!(switch.request(AnimationState::Walk).is_none());

        let back = switch.request(AnimationState::Idle).unwrap();
        assert_eq!(back.from, Some(AnimationState::Walk));
        assert_eq!(back.fade, Duration::from_millis(500));
        assert_eq!(switch.current(), Some(AnimationState::Idle));
    }

    #[test]
    fn test_held_keys_drive_transitions() {
        let mut switch = AnimationSwitch::from_config(&AnimationConfig::default());
        switch.start(AnimationState::Idle);

        let frames = [
            keys(false, false),
            keys(true, false),
            keys(true, true),
            keys(false, true),
            keys(false, false),
            keys(false, false),
        ];
        let fired: Vec<AnimationState> = frames
            .iter()
            .filter_map(|k| switch.request(AnimationState::for_keys(k)))
            .map(|t| t.to)
            .collect();

        assert_eq!(fired, vec![AnimationState::Walk, AnimationState::Idle]);
    }

    #[test]
    fn test_clip_lookup_ignores_case() {
        let names = ["Armature|Idle", "IDLE", "Walk"];
        assert_eq!(find_clip(names, "idle"), Some("IDLE"));
        assert_eq!(find_clip(names, "walk"), Some("Walk"));
        assert_eq!(find_clip(names, "run"), None);

        let config = AnimationConfig::default();
        assert_eq!(AnimationState::Walk.clip_name(&config), "walk");
    }

    #[test]
    fn test_reset_returns_to_unstarted() {
        let mut switch = AnimationSwitch::new(Duration::from_millis(250));
        switch.start(AnimationState::Walk);
        switch.reset();
        assert_eq!(switch.current(), None);
        assert!(switch.request(AnimationState::Idle).is_none());
    }
}
