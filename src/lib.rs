//! barrace turns a sparse time series into an animated, ranked bar chart race.
//!
//! The crate covers the two pieces with real logic behind them:
//!
//! 1. **Keyframes**: `&[Observation] -> Vec<Keyframe>` via [`build_keyframes`]. Every pair
//!    of consecutive report dates is subdivided into evenly timed, linearly interpolated
//!    snapshots; every snapshot lists every entity, ranked descending by value.
//! 2. **Playback**: [`PlaybackController`] walks a [`KeyframeTrack`] one frame per tick,
//!    with start/stop/replay and edge-triggered started/stopped listeners. Timers sit behind
//!    [`TickScheduler`]; [`ManualScheduler`] is a virtual clock and [`Player`] drives the
//!    controller on tokio timers.
//!
//! Rendering is left to the caller; the `barrace` binary prints frames as text.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod data;
mod foundation;
mod keyframes;
mod playback;

/// Engine and playback configuration.
pub mod config;

pub use config::RaceConfig;
pub use data::observation::Observation;
pub use data::quarterly::{
    QuarterlyRow, normalize_quarterly, parse_quarter_key, quarter_report_date,
};
pub use foundation::core::{CalendarDate, StepLerp, Timestamp, quarter_label, report_timestamp};
pub use foundation::error::{RaceError, RaceResult};
pub use keyframes::builder::build_keyframes;
pub use keyframes::model::{EntityFrame, Keyframe, KeyframeTrack};
pub use playback::controller::PlaybackController;
pub use playback::player::Player;
pub use playback::scheduler::{ManualScheduler, TickScheduler, TickToken, TokioScheduler};
pub use playback::state::{AnimationState, PlaybackState, TickOutcome};
