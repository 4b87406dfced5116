use std::ops::Index;
use std::sync::Arc;

use crate::foundation::core::{Timestamp, quarter_label};
use crate::foundation::error::{RaceError, RaceResult};

/// One entity's row inside a keyframe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntityFrame {
    /// Stable identity across keyframes.
    pub entity_id: String,
    /// Display name.
    pub label: String,
    /// Secondary display text.
    pub secondary_label: String,
    /// Grouping key.
    pub group_key: String,
    /// Interpolated value (never rounded or clamped).
    pub value: f64,
}

/// A fully ranked snapshot of every entity at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Instant this snapshot represents.
    pub timestamp: Timestamp,
    /// All entities, sorted descending by value (stable for ties).
    pub entries: Vec<EntityFrame>,
}

impl Keyframe {
    /// The `n` highest-ranked entries (all of them if fewer exist).
    pub fn top(&self, n: usize) -> &[EntityFrame] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// `YYYYQn` caption for this keyframe's timestamp.
    pub fn quarter_label(&self) -> String {
        quarter_label(self.timestamp)
    }

    /// Largest value in the frame, `0.0` for a frame without entries.
    pub fn max_value(&self) -> f64 {
        self.entries.first().map_or(0.0, |e| e.value)
    }
}

/// Shared, immutable, non-empty keyframe sequence.
#[derive(Clone, Debug)]
pub struct KeyframeTrack {
    frames: Arc<[Keyframe]>,
}

impl KeyframeTrack {
    /// Wrap a keyframe list, rejecting an empty one.
    pub fn new(frames: Vec<Keyframe>) -> RaceResult<Self> {
        if frames.is_empty() {
            return Err(RaceError::invalid_input(
                "keyframe track must contain at least one keyframe",
            ));
        }
        Ok(Self {
            frames: frames.into(),
        })
    }

    /// Number of keyframes (always >= 1).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the terminal keyframe.
    pub fn last_index(&self) -> usize {
        self.frames.len() - 1
    }

    /// Keyframe at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Keyframe> {
        self.frames.get(index)
    }

    /// All keyframes in order.
    pub fn frames(&self) -> &[Keyframe] {
        &self.frames
    }

    /// `true` when both tracks share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.frames, &other.frames)
    }
}

impl Index<usize> for KeyframeTrack {
    type Output = Keyframe;

    fn index(&self, index: usize) -> &Keyframe {
        &self.frames[index]
    }
}
