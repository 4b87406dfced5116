use std::time::Duration;

use crate::foundation::error::{RaceError, RaceResult};
use crate::keyframes::model::{Keyframe, KeyframeTrack};
use crate::playback::scheduler::{TickScheduler, TickToken};
use crate::playback::state::{AnimationState, PlaybackState, TickOutcome};

type Listener = Box<dyn FnMut(&AnimationState)>;

/// Timer-driven cursor over a [`KeyframeTrack`].
///
/// The controller owns the [`AnimationState`] and the scheduler. At most one tick is
/// pending at a time; its token is remembered so that a tick delivered after `stop`,
/// `replay`, or `reload` is recognized as stale and ignored.
///
/// Started/stopped listeners fire once per change of the `playing` flag, never per tick.
pub struct PlaybackController<S: TickScheduler> {
    track: KeyframeTrack,
    scheduler: S,
    frame_duration: Duration,
    state: AnimationState,
    finished: bool,
    pending: Option<TickToken>,
    next_token: u64,
    on_started: Vec<Listener>,
    on_stopped: Vec<Listener>,
}

impl<S: TickScheduler> PlaybackController<S> {
    /// Controller at frame 0, not playing.
    pub fn new(track: KeyframeTrack, frame_duration: Duration, scheduler: S) -> RaceResult<Self> {
        validate_frame_duration(frame_duration)?;
        Ok(Self {
            track,
            scheduler,
            frame_duration,
            state: AnimationState::default(),
            finished: false,
            pending: None,
            next_token: 0,
            on_started: Vec::new(),
            on_stopped: Vec::new(),
        })
    }

    /// Register a listener for false → true transitions of `playing`.
    pub fn on_started(&mut self, f: impl FnMut(&AnimationState) + 'static) {
        self.on_started.push(Box::new(f));
    }

    /// Register a listener for true → false transitions of `playing`.
    pub fn on_stopped(&mut self, f: impl FnMut(&AnimationState) + 'static) {
        self.on_stopped.push(Box::new(f));
    }

    /// Begin playing from the current frame.
    ///
    /// No-op while already playing, and no-op on the last frame: use [`Self::replay`]
    /// to play again from the start.
    pub fn start(&mut self) {
        if self.state.playing {
            return;
        }
        if self.state.frame_index == self.track.last_index() {
            tracing::debug!(frame = self.state.frame_index, "start ignored on last frame");
            return;
        }
        self.finished = false;
        self.set_playing(true);
        self.schedule_tick();
    }

    /// Cancel the pending tick and pause. Idempotent.
    pub fn stop(&mut self) {
        self.cancel_pending();
        self.set_playing(false);
    }

    /// Restart from frame 0 in a new play cycle and keep playing.
    pub fn replay(&mut self) {
        self.cancel_pending();
        self.state.frame_index = 0;
        self.state.play_cycle_id += 1;
        self.finished = false;
        tracing::debug!(cycle = self.state.play_cycle_id, "replay");
        self.set_playing(true);
        self.schedule_tick();
    }

    /// Deliver a fired timer.
    ///
    /// Tokens other than the pending one, and ticks arriving while paused, are discarded.
    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if self.pending != Some(token) {
            tracing::debug!(token = token.0, "stale tick discarded");
            return TickOutcome::Stale;
        }
        self.pending = None;
        if !self.state.playing {
            tracing::debug!(token = token.0, "tick while paused discarded");
            return TickOutcome::Stale;
        }

        if self.state.frame_index == self.track.last_index() {
            self.finished = true;
            self.set_playing(false);
            return TickOutcome::Finished;
        }

        let next = self.state.frame_index + 1;
        debug_assert!(next < self.track.len(), "frame index past the end of the track");
        self.state.frame_index = next;
        if self.state.playing {
            self.schedule_tick();
        }
        TickOutcome::Advanced(next)
    }

    /// Move the cursor to `index`, keeping the current play state.
    pub fn seek(&mut self, index: usize) -> RaceResult<()> {
        if index >= self.track.len() {
            return Err(RaceError::out_of_range(index, self.track.len()));
        }
        self.state.frame_index = index;
        self.finished = false;
        Ok(())
    }

    /// Replace the keyframe track (the dataset changed) and rewind in a new play cycle.
    ///
    /// Playback is stopped; call [`Self::start`] to play the new track.
    pub fn reload(&mut self, track: KeyframeTrack) {
        self.stop();
        self.track = track;
        self.state.frame_index = 0;
        self.state.play_cycle_id += 1;
        self.finished = false;
        tracing::debug!(
            frames = self.track.len(),
            cycle = self.state.play_cycle_id,
            "reloaded track"
        );
    }

    /// Change the delay used for ticks scheduled from now on. A tick already in flight
    /// keeps the delay it was scheduled with.
    pub fn set_frame_duration(&mut self, frame_duration: Duration) -> RaceResult<()> {
        validate_frame_duration(frame_duration)?;
        self.frame_duration = frame_duration;
        Ok(())
    }

    /// Current tick delay.
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Current cursor, cycle, and play flag.
    pub fn animation_state(&self) -> AnimationState {
        self.state
    }

    /// Coarse state derived from the play flag and how playback last ended.
    pub fn state(&self) -> PlaybackState {
        if self.state.playing {
            PlaybackState::Playing
        } else if self.finished {
            PlaybackState::Finished
        } else {
            PlaybackState::Idle
        }
    }

    /// `true` while playing.
    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    /// Cursor position.
    pub fn frame_index(&self) -> usize {
        self.state.frame_index
    }

    /// Current play cycle.
    pub fn play_cycle_id(&self) -> u64 {
        self.state.play_cycle_id
    }

    /// Keyframe under the cursor.
    pub fn current_frame(&self) -> &Keyframe {
        &self.track[self.state.frame_index]
    }

    /// The track being played.
    pub fn track(&self) -> &KeyframeTrack {
        &self.track
    }

    /// Token of the tick in flight, if any.
    pub fn pending_tick(&self) -> Option<TickToken> {
        self.pending
    }

    /// The underlying scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The underlying scheduler, mutably (to drive a virtual clock).
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn schedule_tick(&mut self) {
        if self.pending.is_some() {
            tracing::debug!("tick already in flight, not scheduling another");
            return;
        }
        self.next_token += 1;
        let token = TickToken(self.next_token);
        self.scheduler.schedule(token, self.frame_duration);
        self.pending = Some(token);
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.state.playing == playing {
            return;
        }
        self.state.playing = playing;
        let state = self.state;
        let listeners = if playing {
            tracing::debug!(frame = state.frame_index, cycle = state.play_cycle_id, "started");
            &mut self.on_started
        } else {
            tracing::debug!(frame = state.frame_index, cycle = state.play_cycle_id, "stopped");
            &mut self.on_stopped
        };
        for f in listeners.iter_mut() {
            f(&state);
        }
    }
}

impl<S: TickScheduler + std::fmt::Debug> std::fmt::Debug for PlaybackController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("frames", &self.track.len())
            .field("state", &self.state)
            .field("finished", &self.finished)
            .field("pending", &self.pending)
            .field("frame_duration", &self.frame_duration)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

fn validate_frame_duration(d: Duration) -> RaceResult<()> {
    if d.is_zero() {
        return Err(RaceError::validation("frame duration must be > 0"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
