use std::time::Duration;

use tokio::sync::mpsc;

use crate::foundation::error::{RaceError, RaceResult};
use crate::keyframes::model::{Keyframe, KeyframeTrack};
use crate::playback::controller::PlaybackController;
use crate::playback::scheduler::{TickToken, TokioScheduler};
use crate::playback::state::{AnimationState, TickOutcome};

/// Real-time driver: a controller on tokio timers plus the loop that feeds it fired ticks.
///
/// Runs cooperatively on whatever runtime polls it; a current-thread runtime is enough.
#[derive(Debug)]
pub struct Player {
    controller: PlaybackController<TokioScheduler>,
    ticks: mpsc::UnboundedReceiver<TickToken>,
}

impl Player {
    /// Player over `track`, not yet playing. Must be created inside a tokio runtime.
    pub fn new(track: KeyframeTrack, frame_duration: Duration) -> RaceResult<Self> {
        let (scheduler, ticks) = TokioScheduler::new();
        Ok(Self {
            controller: PlaybackController::new(track, frame_duration, scheduler)?,
            ticks,
        })
    }

    /// The controller, for reading state.
    pub fn controller(&self) -> &PlaybackController<TokioScheduler> {
        &self.controller
    }

    /// The controller, for start/stop/replay and listener registration.
    pub fn controller_mut(&mut self) -> &mut PlaybackController<TokioScheduler> {
        &mut self.controller
    }

    /// Pump ticks until playback stops, calling `on_frame` after every advance.
    ///
    /// Returns immediately when the controller is not playing.
    pub async fn run<F>(&mut self, mut on_frame: F) -> RaceResult<AnimationState>
    where
        F: FnMut(&Keyframe, &AnimationState),
    {
        while self.controller.is_playing() {
            let token = self.ticks.recv().await.ok_or_else(|| {
                RaceError::Other(anyhow::anyhow!("tick channel closed while playing"))
            })?;
            match self.controller.tick(token) {
                TickOutcome::Advanced(_) => {
                    let state = self.controller.animation_state();
                    on_frame(self.controller.current_frame(), &state);
                }
                TickOutcome::Finished | TickOutcome::Stale => {}
            }
        }
        Ok(self.controller.animation_state())
    }

    /// Replay from frame 0 and run to the end, reporting frame 0 first.
    pub async fn play_from_start<F>(&mut self, mut on_frame: F) -> RaceResult<AnimationState>
    where
        F: FnMut(&Keyframe, &AnimationState),
    {
        self.controller.replay();
        let state = self.controller.animation_state();
        on_frame(self.controller.current_frame(), &state);
        self.run(on_frame).await
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
