/// Snapshot of the controller's cursor and play flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct AnimationState {
    /// Index of the keyframe currently shown.
    pub frame_index: usize,
    /// Incremented on every replay or reload so consumers can re-mount.
    pub play_cycle_id: u64,
    /// `true` while a tick is pending and the last frame has not been reached.
    pub playing: bool,
}

/// Coarse playback state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlaybackState {
    /// Not playing. The cursor may be anywhere.
    Idle,
    /// A tick is scheduled.
    Playing,
    /// Reached the last frame by playing through it.
    Finished,
}

/// What a delivered tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not the pending tick, or playback was stopped; nothing changed.
    Stale,
    /// The cursor moved to this index.
    Advanced(usize),
    /// The cursor was already on the last frame; playback finished.
    Finished,
}
