use std::collections::{BTreeMap, BTreeSet};

use crate::data::observation::Observation;
use crate::foundation::core::CalendarDate;
use crate::foundation::error::{RaceError, RaceResult};

/// One book row of a quarterly sales table: identity columns plus one `YYYY/Qn` cell per quarter.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuarterlyRow {
    /// Store item code.
    pub id: String,
    /// Title.
    pub name: String,
    /// Author.
    #[serde(default)]
    pub author: String,
    /// Category.
    #[serde(default)]
    pub category: String,
    /// Sales per quarter, keyed `YYYY/Qn`.
    #[serde(default)]
    pub quarters: BTreeMap<String, f64>,
}

/// Parse a `YYYY/Qn` column key into `(year, quarter)` with `quarter` in `1..=4`.
pub fn parse_quarter_key(key: &str) -> RaceResult<(i32, u32)> {
    let bad = || RaceError::invalid_input(format!("malformed quarter key '{key}'"));
    let (year, quarter) = key.split_once('/').ok_or_else(bad)?;
    let year: i32 = year.trim().parse().map_err(|_| bad())?;
    let quarter: u32 = quarter
        .trim()
        .strip_prefix('Q')
        .ok_or_else(bad)?
        .parse()
        .map_err(|_| bad())?;
    if !(1..=4).contains(&quarter) {
        return Err(bad());
    }
    Ok((year, quarter))
}

/// Report date for a quarter: the 15th of its middle month.
pub fn quarter_report_date(year: i32, quarter: u32) -> RaceResult<CalendarDate> {
    if !(1..=4).contains(&quarter) {
        return Err(RaceError::invalid_input(format!(
            "quarter must be in 1..=4, got {quarter}"
        )));
    }
    CalendarDate::from_ymd_opt(year, 3 * (quarter - 1) + 2, 15)
        .ok_or_else(|| RaceError::invalid_input(format!("year {year} is out of range")))
}

/// Flatten quarterly rows into observations, quarter by quarter in chronological order.
///
/// Empty (zero) cells are skipped; the keyframe engine zero-fills them again.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn normalize_quarterly(rows: &[QuarterlyRow]) -> RaceResult<Vec<Observation>> {
    let cells = rows
        .iter()
        .map(|row| {
            row.quarters
                .iter()
                .map(|(key, value)| Ok((parse_quarter_key(key)?, *value)))
                .collect::<RaceResult<BTreeMap<(i32, u32), f64>>>()
        })
        .collect::<RaceResult<Vec<_>>>()?;
    let quarters: BTreeSet<(i32, u32)> = cells.iter().flat_map(|c| c.keys().copied()).collect();

    let mut out = Vec::new();
    for &(year, quarter) in &quarters {
        let date = quarter_report_date(year, quarter)?;
        for (row, row_cells) in rows.iter().zip(&cells) {
            let Some(&value) = row_cells.get(&(year, quarter)) else {
                continue;
            };
            if value == 0.0 {
                continue;
            }
            out.push(
                Observation::new(date, row.id.clone(), row.name.clone(), value)
                    .with_secondary_label(row.author.clone())
                    .with_group_key(row.category.clone()),
            );
        }
    }

    tracing::debug!(observations = out.len(), quarters = quarters.len(), "normalized");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/data/quarterly.rs"]
mod tests;
