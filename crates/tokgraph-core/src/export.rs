//! JSON export of the activity index

use crate::{ActivityIndex, Result};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayExport {
    /// Sorted for stable output
    pub sessions: Vec<String>,
    pub interactions: u64,
    pub tokens: u64,
}

/// `YYYY-MM-DD` -> day totals
pub fn to_export(index: &ActivityIndex) -> BTreeMap<String, DayExport> {
    index
        .iter()
        .map(|(date, day)| {
            let mut sessions: Vec<String> = day.session_ids.iter().cloned().collect();
            sessions.sort();
            (
                date.format("%Y-%m-%d").to_string(),
                DayExport {
                    sessions,
                    interactions: day.interactions,
                    tokens: day.tokens,
                },
            )
        })
        .collect()
}

pub fn to_json_string(index: &ActivityIndex) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_export(index))?)
}
