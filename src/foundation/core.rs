use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// A reporting date as it appears in the input data.
pub type CalendarDate = NaiveDate;

/// An instant on the animation timeline (a report date or a point between two of them).
pub type Timestamp = NaiveDateTime;

/// Midnight of a report date, the anchor every keyframe timestamp is derived from.
pub fn report_timestamp(date: CalendarDate) -> Timestamp {
    date.and_time(NaiveTime::MIN)
}

/// `YYYYQn` caption for the quarter containing `ts`.
pub fn quarter_label(ts: Timestamp) -> String {
    format!("{}Q{}", ts.year(), ts.month0() / 3 + 1)
}

/// Interpolation at an integer step `step` of `steps` between two values.
///
/// Step `0` returns `a` and step `steps` returns `b` exactly.
pub trait StepLerp: Sized {
    /// Value at `step / steps` of the way from `a` to `b`. `steps` must be non-zero.
    fn lerp_step(a: &Self, b: &Self, step: u32, steps: u32) -> Self;
}

impl StepLerp for f64 {
    fn lerp_step(a: &Self, b: &Self, step: u32, steps: u32) -> Self {
        if step == 0 {
            return *a;
        }
        if step >= steps {
            return *b;
        }
        let t = f64::from(step) / f64::from(steps);
        let delta = b - a;
        if delta.is_finite() {
            a + delta * t
        } else {
            // Endpoints of opposite sign near the f64 limits: weight each side instead.
            a * (1.0 - t) + b * t
        }
    }
}

impl StepLerp for Timestamp {
    fn lerp_step(a: &Self, b: &Self, step: u32, steps: u32) -> Self {
        let span_ms = i128::from((*b - *a).num_milliseconds());
        let offset_ms = span_ms * i128::from(step) / i128::from(steps);
        // A span that fits in i64 milliseconds divided by steps >= step still fits.
        *a + TimeDelta::milliseconds(offset_ms as i64)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
