use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::data::observation::Observation;
use crate::foundation::core::{CalendarDate, StepLerp, Timestamp, report_timestamp};
use crate::foundation::error::{RaceError, RaceResult};
use crate::keyframes::model::{EntityFrame, Keyframe};

/// Turn sparse observations into a dense, chronologically ordered keyframe sequence.
///
/// Every pair of consecutive report dates contributes `subdivisions` keyframes, the last
/// date contributes one, and every keyframe holds one entry per entity sorted descending by
/// value. Entities missing at a date are zero-filled. Equal values keep the order in which
/// entities first appear in `observations`.
#[tracing::instrument(skip(observations), fields(observations = observations.len()))]
pub fn build_keyframes(
    observations: &[Observation],
    subdivisions: u32,
) -> RaceResult<Vec<Keyframe>> {
    if observations.is_empty() {
        return Err(RaceError::invalid_input("observation list is empty"));
    }
    if subdivisions == 0 {
        return Err(RaceError::invalid_input("subdivisions must be >= 1"));
    }

    let table = ObservationTable::index(observations)?;
    let snapshots: Vec<Snapshot<'_>> = table
        .dates
        .iter()
        .map(|(date, cells)| table.snapshot(*date, cells))
        .collect();

    let mut out = Vec::with_capacity((snapshots.len() - 1) * subdivisions as usize + 1);
    for pair in snapshots.windows(2) {
        expand_segment(&pair[0], &pair[1], subdivisions, &mut out);
    }
    if let Some(last) = snapshots.last() {
        out.push(last.keyframe_at(last.timestamp, |v| v.start));
    }

    tracing::debug!(
        dates = snapshots.len(),
        entities = table.entities.len(),
        keyframes = out.len(),
        "built keyframes"
    );
    Ok(out)
}

/// Per-call lookup structure: entity slots in first-appearance order, and a dense
/// cell row per report date.
struct ObservationTable<'a> {
    entities: Vec<&'a Observation>,
    dates: BTreeMap<CalendarDate, Vec<Option<&'a Observation>>>,
}

impl<'a> ObservationTable<'a> {
    fn index(observations: &'a [Observation]) -> RaceResult<Self> {
        let mut slots: HashMap<&'a str, usize> = HashMap::new();
        let mut entities = Vec::new();
        for obs in observations {
            obs.validate()?;
            slots.entry(obs.entity_id.as_str()).or_insert_with(|| {
                entities.push(obs);
                entities.len() - 1
            });
        }

        let mut dates: BTreeMap<CalendarDate, Vec<Option<&'a Observation>>> = BTreeMap::new();
        for obs in observations {
            let slot = slots[obs.entity_id.as_str()];
            let cells = dates
                .entry(obs.date)
                .or_insert_with(|| vec![None; entities.len()]);
            if cells[slot].replace(obs).is_some() {
                tracing::warn!(
                    entity = %obs.entity_id,
                    date = %obs.date,
                    "duplicate observation, keeping the later one"
                );
            }
        }

        Ok(Self { entities, dates })
    }

    fn snapshot(&self, date: CalendarDate, cells: &[Option<&'a Observation>]) -> Snapshot<'a> {
        let rows = self
            .entities
            .iter()
            .zip(cells)
            .map(|(&first_seen, &cell)| Row {
                meta: cell.unwrap_or(first_seen),
                value: cell.map_or(0.0, |o| o.value),
            })
            .collect();
        Snapshot {
            timestamp: report_timestamp(date),
            rows,
        }
    }
}

/// Dense row set at one report date, in entity-slot order.
struct Snapshot<'a> {
    timestamp: Timestamp,
    rows: Vec<Row<'a>>,
}

struct Row<'a> {
    meta: &'a Observation,
    value: f64,
}

struct SegmentValue {
    start: f64,
    end: f64,
}

impl Snapshot<'_> {
    fn keyframe_at(&self, timestamp: Timestamp, value: impl Fn(SegmentValue) -> f64) -> Keyframe {
        self.keyframe_towards(self, timestamp, value)
    }

    fn keyframe_towards(
        &self,
        next: &Snapshot<'_>,
        timestamp: Timestamp,
        value: impl Fn(SegmentValue) -> f64,
    ) -> Keyframe {
        let mut entries: Vec<EntityFrame> = self
            .rows
            .iter()
            .zip(&next.rows)
            .map(|(row, next_row)| EntityFrame {
                entity_id: row.meta.entity_id.clone(),
                label: row.meta.label.clone(),
                secondary_label: row.meta.secondary_label.clone(),
                group_key: row.meta.group_key.clone(),
                value: value(SegmentValue {
                    start: row.value,
                    end: next_row.value,
                }),
            })
            .collect();
        rank_entries(&mut entries);
        Keyframe { timestamp, entries }
    }
}

/// Emit the keyframes for `[from, to)`: `subdivisions` steps, or a single one when the two
/// snapshots share a timestamp.
fn expand_segment(
    from: &Snapshot<'_>,
    to: &Snapshot<'_>,
    subdivisions: u32,
    out: &mut Vec<Keyframe>,
) {
    if from.timestamp == to.timestamp {
        out.push(from.keyframe_at(from.timestamp, |v| v.start));
        return;
    }
    for step in 0..subdivisions {
        let ts = Timestamp::lerp_step(&from.timestamp, &to.timestamp, step, subdivisions);
        out.push(from.keyframe_towards(to, ts, |v| {
            f64::lerp_step(&v.start, &v.end, step, subdivisions)
        }));
    }
}

/// Stable descending sort by value.
fn rank_entries(entries: &mut [EntityFrame]) {
    entries.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
#[path = "../../tests/unit/keyframes/builder.rs"]
mod tests;
