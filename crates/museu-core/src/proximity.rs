//! Edge-triggered artwork proximity detection
//!
//! The detector samples every `sample_every` frames and reports a change
//! only when the nearby artwork differs from the last sample.

use glam::Vec3;

use crate::artwork::PlacedArtwork;

/// A change of the nearby artwork between two samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

impl ProximityChange {
    pub fn entered(&self) -> Option<usize> {
        self.current
    }

    pub fn left(&self) -> Option<usize> {
        self.previous
    }
}

/// First artwork (in catalog order) whose radius contains `position`
pub fn find_nearby(position: Vec3, artworks: &[PlacedArtwork]) -> Option<usize> {
    artworks
        .iter()
        .find(|artwork| artwork.contains(position))
        .map(|artwork| artwork.index)
}

#[derive(Debug, Clone)]
pub struct ProximityDetector {
    sample_every: u32,
    frame: u32,
    current: Option<usize>,
}

impl ProximityDetector {
    pub fn new(sample_every: u32) -> Self {
        Self {
            sample_every: sample_every.max(1),
            frame: 0,
            current: None,
        }
    }

    /// Artwork reported by the most recent sample
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Call once per frame; returns a change only on sampled frames where
    /// the nearby artwork differs from the previous sample.
    pub fn observe(&mut self, position: Vec3, artworks: &[PlacedArtwork]) -> Option<ProximityChange> {
        self.frame = self.frame.wrapping_add(1);
        if self.frame % self.sample_every != 0 {
            return None;
        }
        self.sample(position, artworks)
    }

    /// Sample immediately, ignoring the frame counter
    pub fn sample(&mut self, position: Vec3, artworks: &[PlacedArtwork]) -> Option<ProximityChange> {
        let nearby = find_nearby(position, artworks);
        if nearby == self.current {
            return None;
        }
        let change = ProximityChange {
            previous: self.current,
            current: nearby,
        };
        self.current = nearby;
        Some(change)
    }

    pub fn reset(&mut self) {
        self.frame = 0;
        self.current = None;
    }
}
