#![deny(clippy::all)]

mod aggregator;
mod error;
pub mod export;
pub mod graph;
pub mod scanner;
pub mod session;
pub mod stats;

pub use aggregator::*;
pub use error::{Error, Result};
pub use graph::{build_grid, classify, Cell, Grid, Week};
pub use stats::{compute_stats, HeatmapStats};

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Which per-day quantity drives the heatmap shading and the stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    /// Distinct sessions active on the day
    #[default]
    Sessions,
    /// Sum of input, output, cache-write and cache-read tokens
    Tokens,
    /// Number of logged records
    Interactions,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Sessions => "sessions",
            Metric::Tokens => "tokens",
            Metric::Interactions => "interactions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Sessions => "Sessions",
            Metric::Tokens => "Tokens",
            Metric::Interactions => "Interactions",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sessions" => Ok(Metric::Sessions),
            "tokens" => Ok(Metric::Tokens),
            "interactions" => Ok(Metric::Interactions),
            _ => Err(Error::InvalidMetric(s.to_string())),
        }
    }
}

/// Token counters carried by one log record's `message.usage` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenBreakdown {
    pub input: u64,
    pub output: u64,
    pub cache_write: u64,
    pub cache_read: u64,
}

impl TokenBreakdown {
    pub fn total(&self) -> u64 {
        self.input
            .saturating_add(self.output)
            .saturating_add(self.cache_write)
            .saturating_add(self.cache_read)
    }
}

/// Activity accumulated for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayActivity {
    /// `"<project>/<session>"` keys seen on this day
    pub session_ids: HashSet<String>,
    pub interactions: u64,
    pub tokens: u64,
}

impl DayActivity {
    /// Fold one qualifying record into the day.
    pub fn record(&mut self, session_key: &str, tokens: u64) {
        if !self.session_ids.contains(session_key) {
            self.session_ids.insert(session_key.to_string());
        }
        self.interactions = self.interactions.saturating_add(1);
        self.tokens = self.tokens.saturating_add(tokens);
    }

    pub fn merge(&mut self, other: DayActivity) {
        self.session_ids.extend(other.session_ids);
        self.interactions = self.interactions.saturating_add(other.interactions);
        self.tokens = self.tokens.saturating_add(other.tokens);
    }

    pub fn value(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Sessions => self.session_ids.len() as u64,
            Metric::Tokens => self.tokens,
            Metric::Interactions => self.interactions,
        }
    }
}

/// Per-day activity keyed by UTC calendar date, iterated in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityIndex {
    days: BTreeMap<NaiveDate, DayActivity>,
}

impl ActivityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&DayActivity> {
        self.days.get(date)
    }

    /// Metric value for `date`, 0 when nothing was recorded.
    pub fn value(&self, date: &NaiveDate, metric: Metric) -> u64 {
        self.days.get(date).map_or(0, |day| day.value(metric))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayActivity)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub(crate) fn day_mut(&mut self, date: NaiveDate) -> &mut DayActivity {
        self.days.entry(date).or_default()
    }

    pub fn merge(&mut self, other: ActivityIndex) {
        for (date, day) in other.days {
            self.days.entry(date).or_default().merge(day);
        }
    }
}

impl FromIterator<(NaiveDate, DayActivity)> for ActivityIndex {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, DayActivity)>>(iter: I) -> Self {
        let mut index = ActivityIndex::new();
        for (date, day) in iter {
            index.day_mut(date).merge(day);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("sessions".parse::<Metric>().unwrap(), Metric::Sessions);
        assert_eq!("Tokens".parse::<Metric>().unwrap(), Metric::Tokens);
        assert_eq!(
            " interactions ".parse::<Metric>().unwrap(),
            Metric::Interactions
        );
        assert!(matches!(
            "cost".parse::<Metric>(),
            Err(Error::InvalidMetric(name)) if name == "cost"
        ));
    }

    #[test]
    fn test_token_breakdown_total() {
        let tokens = TokenBreakdown {
            input: 100,
            output: 200,
            cache_write: 0,
            cache_read: 5,
        };
        assert_eq!(tokens.total(), 305);

        let huge = TokenBreakdown {
            input: u64::MAX,
            output: 1,
            ..Default::default()
        };
        assert_eq!(huge.total(), u64::MAX);
    }

    #[test]
    fn test_day_activity_record_and_value() {
        let mut day = DayActivity::default();
        day.record("proj/a", 10);
        day.record("proj/a", 5);
        day.record("proj/b", 0);

        assert_eq!(day.value(Metric::Sessions), 2);
        assert_eq!(day.value(Metric::Interactions), 3);
        assert_eq!(day.value(Metric::Tokens), 15);
    }

    #[test]
    fn test_index_merge_unions_sessions() {
        let mut a = ActivityIndex::new();
        a.day_mut(date("2024-01-01")).record("p/one", 1);

        let mut b = ActivityIndex::new();
        b.day_mut(date("2024-01-01")).record("p/one", 2);
        b.day_mut(date("2024-01-01")).record("p/two", 3);
        b.day_mut(date("2024-01-02")).record("p/two", 4);

        a.merge(b);

        let first = a.get(&date("2024-01-01")).unwrap();
        assert_eq!(first.session_ids.len(), 2);
        assert_eq!(first.interactions, 3);
        assert_eq!(first.tokens, 6);
        let dates: Vec<NaiveDate> = a.iter().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![date("2024-01-01"), date("2024-01-02")]);
    }

    #[test]
    fn test_index_value_missing_date_is_zero() {
        let index = ActivityIndex::new();
        assert_eq!(index.value(&date("2024-05-05"), Metric::Tokens), 0);
        assert!(index.is_empty());
    }
}
