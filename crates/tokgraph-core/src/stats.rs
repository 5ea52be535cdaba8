//! Totals and streaks over the activity index

use crate::{ActivityIndex, Metric};
use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeatmapStats {
    pub active_days: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_value: u64,
    pub max_value: u64,
    pub busiest_day: Option<NaiveDate>,
}

/// Compute totals and streaks for `metric`.
///
/// A day is active when its metric value is positive. Days after `today`
/// are ignored, as they are in the grid. The current streak is
/// the run ending at the latest active day, and only counts while that day is
/// today or yesterday.
pub fn compute_stats(index: &ActivityIndex, metric: Metric, today: NaiveDate) -> HeatmapStats {
    let mut stats = HeatmapStats::default();

    let mut streak = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for (date, day) in index.iter() {
        if *date > today {
            break;
        }
        let value = day.value(metric);
        if value == 0 {
            continue;
        }

        stats.active_days += 1;
        stats.total_value = stats.total_value.saturating_add(value);
        if value > stats.max_value {
            stats.max_value = value;
            stats.busiest_day = Some(*date);
        }

        streak = match prev {
            Some(p) if p.checked_add_days(Days::new(1)) == Some(*date) => streak + 1,
            _ => 1,
        };
        stats.longest_streak = stats.longest_streak.max(streak);
        prev = Some(*date);
    }

    if let Some(last) = prev {
        let yesterday = today.checked_sub_days(Days::new(1));
        if last == today || Some(last) == yesterday {
            stats.current_streak = streak;
        }
    }

    stats
}
