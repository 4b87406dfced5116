use crate::foundation::core::CalendarDate;
use crate::foundation::error::{RaceError, RaceResult};

/// One entity's measured value at one reporting date.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Observation {
    /// Report date.
    pub date: CalendarDate,
    /// Stable identity across dates.
    pub entity_id: String,
    /// Display name.
    pub label: String,
    /// Secondary display text (the author, for books).
    #[serde(default)]
    pub secondary_label: String,
    /// Grouping key used for coloring (the category, for books).
    #[serde(default)]
    pub group_key: String,
    /// Measured value.
    pub value: f64,
}

impl Observation {
    /// Observation with empty secondary label and group.
    pub fn new(
        date: CalendarDate,
        entity_id: impl Into<String>,
        label: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            date,
            entity_id: entity_id.into(),
            label: label.into(),
            secondary_label: String::new(),
            group_key: String::new(),
            value,
        }
    }

    /// Set the secondary label.
    pub fn with_secondary_label(mut self, secondary_label: impl Into<String>) -> Self {
        self.secondary_label = secondary_label.into();
        self
    }

    /// Set the group key.
    pub fn with_group_key(mut self, group_key: impl Into<String>) -> Self {
        self.group_key = group_key.into();
        self
    }

    /// Reject observations the keyframe engine cannot rank.
    pub fn validate(&self) -> RaceResult<()> {
        if self.entity_id.trim().is_empty() {
            return Err(RaceError::invalid_input(format!(
                "observation on {} has an empty entity_id",
                self.date
            )));
        }
        if !self.value.is_finite() {
            return Err(RaceError::invalid_input(format!(
                "observation '{}' on {} has a non-finite value",
                self.entity_id, self.date
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/observation.rs"]
mod tests;
