use crate::foundation::error::{RaceError, RaceResult};

/// Knobs recognized by the keyframe engine and the playback controller.
///
/// Every field is optional in JSON; missing ones take the defaults below.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Interpolated keyframes between two consecutive report dates (>= 1).
    pub subdivisions: u32,
    /// Delay between ticks in milliseconds (> 0).
    pub frame_duration_ms: u64,
    /// Rows a presentation layer draws per frame (>= 1).
    pub visible_bars: usize,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            subdivisions: 10,
            frame_duration_ms: 250,
            visible_bars: 12,
        }
    }
}

impl RaceConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(s: &str) -> RaceResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check field ranges.
    pub fn validate(&self) -> RaceResult<()> {
        if self.subdivisions == 0 {
            return Err(RaceError::validation("subdivisions must be >= 1"));
        }
        if self.frame_duration_ms == 0 {
            return Err(RaceError::validation("frame_duration_ms must be > 0"));
        }
        if self.visible_bars == 0 {
            return Err(RaceError::validation("visible_bars must be >= 1"));
        }
        Ok(())
    }

    /// Tick delay as a [`std::time::Duration`].
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_duration_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
