use crate::services::region_codes::state_code;
use crate::services::trends_provider::{RawTable, RegionalTable, TimeSeriesTable};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoints {
    pub dates: Vec<String>,
    pub values: Vec<i64>,
}

/// JSON-ready shape of a provider table. Both variants serialize as a plain
/// object keyed by keyword, so an empty result is `{}` whichever shape it has.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResult {
    TimeSeries(BTreeMap<String, SeriesPoints>),
    Regional(BTreeMap<String, BTreeMap<String, i64>>),
}

impl Default for NormalizedResult {
    fn default() -> Self {
        NormalizedResult::TimeSeries(BTreeMap::new())
    }
}

impl NormalizedResult {
    pub fn is_empty(&self) -> bool {
        match self {
            NormalizedResult::TimeSeries(series) => series.is_empty(),
            NormalizedResult::Regional(series) => series.is_empty(),
        }
    }
}

pub fn normalize(table: Option<&RawTable>) -> NormalizedResult {
    match table {
        None => NormalizedResult::default(),
        Some(table) if table.is_empty() => NormalizedResult::default(),
        Some(RawTable::TimeSeries(table)) => normalize_time_series(table),
        Some(RawTable::Regional(table)) => normalize_regional(table),
    }
}

fn normalize_time_series(table: &TimeSeriesTable) -> NormalizedResult {
    let dates: Vec<String> = table
        .dates
        .iter()
        .map(|date| date.format("%Y-%m-%d").to_string())
        .collect();

    let series = table
        .series
        .iter()
        .map(|column| {
            // Short columns are padded so every date in the index is kept.
            let values = (0..dates.len())
                .map(|index| column.values.get(index).copied().unwrap_or(0))
                .collect();
            let points = SeriesPoints {
                dates: dates.clone(),
                values,
            };
            (column.label.clone(), points)
        })
        .collect();

    NormalizedResult::TimeSeries(series)
}

fn normalize_regional(table: &RegionalTable) -> NormalizedResult {
    let series = table
        .series
        .iter()
        .map(|column| {
            let values = table
                .regions
                .iter()
                .enumerate()
                .filter_map(|(index, region)| {
                    let code = state_code(region)?;
                    let value = column.values.get(index).copied().flatten();
                    Some((code.to_string(), to_integer(value)))
                })
                .collect();
            (column.label.clone(), values)
        })
        .collect();

    NormalizedResult::Regional(series)
}

/// Truncating cast; missing and NaN values count as zero.
fn to_integer(value: Option<f64>) -> i64 {
    match value {
        Some(v) if v.is_finite() => v as i64,
        _ => 0,
    }
}
