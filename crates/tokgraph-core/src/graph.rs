//! Contribution grid construction and quartile shading
//!
//! Weeks run Sunday to Saturday. Cells before the window start or after
//! today carry no intensity and are drawn blank.

use crate::{ActivityIndex, Metric};
use chrono::{Datelike, Days, NaiveDate};

/// Number of shading levels above "no activity"
pub const MAX_INTENSITY: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub date: NaiveDate,
    pub value: u64,
    /// `None` for padding and future days, otherwise a level in `0..=4`
    pub intensity: Option<u8>,
}

impl Cell {
    pub fn is_renderable(&self) -> bool {
        self.intensity.is_some()
    }
}

pub type Week = [Cell; 7];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub weeks: Vec<Week>,
    pub metric: Metric,
    /// First day inside the window
    pub start_date: NaiveDate,
    /// Last day inside the window (today)
    pub end_date: NaiveDate,
}

impl Grid {
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.weeks.iter().flat_map(|w| w.iter())
    }

    fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.weeks.iter_mut().flat_map(|w| w.iter_mut())
    }
}

/// Inclusive `[start, end]` of a window of `window_days` ending on `today`.
pub fn window_bounds(window_days: u32, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = u64::from(window_days.max(1) - 1);
    let start = today.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
    (start, today)
}

/// Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Lay the window out as full weeks, keeping at most `display_columns` of
/// the most recent ones. Intensities are left at 0 until [`classify`] runs.
pub fn build_grid(
    index: &ActivityIndex,
    window_days: u32,
    metric: Metric,
    display_columns: usize,
    today: NaiveDate,
) -> Grid {
    let (start_date, end_date) = window_bounds(window_days, today);

    let first_week = start_of_week(start_date);
    let last_week = start_of_week(end_date);
    let total_weeks = ((last_week - first_week).num_days() / 7 + 1) as usize;

    // Drop whole weeks from the front only
    let shown = total_weeks.min(display_columns.max(1));
    let shown_from = last_week
        .checked_sub_days(Days::new(7 * (shown as u64 - 1)))
        .unwrap_or(first_week);

    let weeks = (0..shown as u64)
        .map(|w| {
            let week_start = shown_from + Days::new(7 * w);
            std::array::from_fn(|d| {
                let date = week_start + Days::new(d as u64);
                if date > end_date {
                    Cell {
                        date,
                        value: 0,
                        intensity: None,
                    }
                } else {
                    Cell {
                        date,
                        value: index.value(&date, metric),
                        intensity: (date >= start_date).then_some(0),
                    }
                }
            })
        })
        .collect();

    Grid {
        weeks,
        metric,
        start_date,
        end_date,
    }
}

/// Q1/Q2/Q3 taken at `floor(n * p)` of the sorted values, no interpolation.
pub fn quartile_breakpoints(values: &mut [u64]) -> Option<[u64; 3]> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let n = values.len();
    Some([values[n / 4], values[n / 2], values[n * 3 / 4]])
}

/// First breakpoint the value does not exceed wins.
pub fn intensity_level(value: u64, breakpoints: &[u64; 3]) -> u8 {
    if value == 0 {
        return 0;
    }
    breakpoints
        .iter()
        .position(|&q| value <= q)
        .map_or(MAX_INTENSITY, |i| i as u8 + 1)
}

/// Assign levels 0..=4 to every renderable cell from the quartiles of the
/// positive renderable values.
pub fn classify(grid: &mut Grid) {
    let mut values: Vec<u64> = grid
        .cells()
        .filter(|c| c.is_renderable() && c.value > 0)
        .map(|c| c.value)
        .collect();

    let Some(breakpoints) = quartile_breakpoints(&mut values) else {
        return;
    };

    for cell in grid.cells_mut() {
        if cell.intensity.is_some() {
            cell.intensity = Some(intensity_level(cell.value, &breakpoints));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DayActivity;
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn index_with(days: &[(&str, u64)]) -> ActivityIndex {
        days.iter()
            .map(|(d, interactions)| {
                (
                    date(d),
                    DayActivity {
                        interactions: *interactions,
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_window_bounds() {
        assert_eq!(
            window_bounds(30, date("2024-03-31")),
            (date("2024-03-02"), date("2024-03-31"))
        );
        assert_eq!(
            window_bounds(1, date("2024-03-31")),
            (date("2024-03-31"), date("2024-03-31"))
        );
    }

    #[test]
    fn test_start_of_week_is_sunday() {
        // 2024-01-03 is a Wednesday
        assert_eq!(start_of_week(date("2024-01-03")), date("2023-12-31"));
        assert_eq!(start_of_week(date("2023-12-31")), date("2023-12-31"));
    }

    #[test]
    fn test_grid_pads_partial_weeks() {
        // Wednesday 2024-01-10, 7-day window starts Thursday 2024-01-04
        let today = date("2024-01-10");
        let grid = build_grid(&ActivityIndex::new(), 7, Metric::Sessions, 52, today);

        assert_eq!(grid.weeks.len(), 2);
        assert!(grid.weeks.iter().all(|w| w.len() == 7));
        assert_eq!(grid.weeks[0][0].date, date("2023-12-31"));
        assert_eq!(grid.weeks[0][0].date.weekday(), Weekday::Sun);

        let renderable: Vec<NaiveDate> = grid
            .cells()
            .filter(|c| c.is_renderable())
            .map(|c| c.date)
            .collect();
        assert_eq!(renderable.len(), 7);
        assert_eq!(renderable.first(), Some(&date("2024-01-04")));
        assert_eq!(renderable.last(), Some(&today));

        // Sunday..Wednesday of the first week are padding
        assert!(grid.weeks[0][..4].iter().all(|c| c.intensity.is_none()));
        // Thursday..Saturday of the last week are in the future
        assert!(grid.weeks[1][4..].iter().all(|c| c.intensity.is_none()));
    }

    #[test]
    fn test_grid_masks_future_days() {
        let today = date("2024-01-10");
        let index = index_with(&[("2024-01-10", 3), ("2024-01-11", 99), ("2024-01-13", 7)]);
        let mut grid = build_grid(&index, 7, Metric::Interactions, 52, today);
        classify(&mut grid);

        for cell in grid.cells().filter(|c| c.date > today) {
            assert_eq!(cell.intensity, None);
            assert_eq!(cell.value, 0);
        }
        let today_cell = grid.cells().find(|c| c.date == today).unwrap();
        assert_eq!(today_cell.value, 3);
        // Future data never feeds the quartiles
        assert_eq!(today_cell.intensity, Some(1));
    }

    #[test]
    fn test_grid_values_follow_metric() {
        let mut day = DayActivity::default();
        day.record("p/a", 40);
        day.record("p/b", 2);
        let index: ActivityIndex = vec![(date("2024-01-09"), day)].into_iter().collect();
        let today = date("2024-01-10");

        let value_for = |metric| {
            build_grid(&index, 7, metric, 52, today)
                .cells()
                .find(|c| c.date == date("2024-01-09"))
                .unwrap()
                .value
        };
        assert_eq!(value_for(Metric::Sessions), 2);
        assert_eq!(value_for(Metric::Interactions), 2);
        assert_eq!(value_for(Metric::Tokens), 42);
    }

    #[test]
    fn test_grid_clips_oldest_weeks() {
        let today = date("2024-03-31");
        let full = build_grid(&ActivityIndex::new(), 365, Metric::Sessions, 1000, today);
        let clipped = build_grid(&ActivityIndex::new(), 365, Metric::Sessions, 10, today);

        assert_eq!(full.weeks.len(), 53);
        assert_eq!(clipped.weeks.len(), 10);
        assert_eq!(clipped.weeks[..], full.weeks[full.weeks.len() - 10..]);
        assert_eq!(clipped.weeks[0][0].date.weekday(), Weekday::Sun);
        assert_eq!(clipped.cells().filter(|c| c.is_renderable()).count(), 7 * 9 + 1);
    }

    #[test]
    fn test_grid_zero_columns_shows_current_week() {
        let today = date("2024-03-31");
        let grid = build_grid(&ActivityIndex::new(), 30, Metric::Sessions, 0, today);
        assert_eq!(grid.weeks.len(), 1);
        assert_eq!(grid.weeks[0][0].date, today);
    }

    #[test]
    fn test_quartile_breakpoints_floor_indexing() {
        let mut values = vec![8, 1, 6, 3, 5, 2, 7, 4];
        // sorted: 1..=8, n=8 -> indices 2, 4, 6
        assert_eq!(quartile_breakpoints(&mut values), Some([3, 5, 7]));

        let mut three = vec![10, 30, 20];
        // n=3 -> indices 0, 1, 2
        assert_eq!(quartile_breakpoints(&mut three), Some([10, 20, 30]));

        assert_eq!(quartile_breakpoints(&mut []), None);
    }

    #[test]
    fn test_intensity_level_ties_fall_low() {
        let bp = [3, 5, 7];
        assert_eq!(intensity_level(0, &bp), 0);
        assert_eq!(intensity_level(1, &bp), 1);
        assert_eq!(intensity_level(3, &bp), 1);
        assert_eq!(intensity_level(4, &bp), 2);
        assert_eq!(intensity_level(5, &bp), 2);
        assert_eq!(intensity_level(7, &bp), 3);
        assert_eq!(intensity_level(8, &bp), 4);
    }

    #[test]
    fn test_classify_equal_values_land_on_level_one() {
        // Sunday..Saturday, fully inside the window
        let today = date("2024-01-13");
        let index = index_with(&[
            ("2024-01-07", 5),
            ("2024-01-09", 5),
            ("2024-01-11", 5),
            ("2024-01-13", 5),
        ]);
        let mut grid = build_grid(&index, 7, Metric::Interactions, 52, today);
        classify(&mut grid);

        for cell in grid.cells() {
            let expected = if cell.value > 0 { 1 } else { 0 };
            assert_eq!(cell.intensity, Some(expected), "{}", cell.date);
        }
    }

    #[test]
    fn test_classify_spreads_levels() {
        let today = date("2024-01-13");
        let index = index_with(&[
            ("2024-01-07", 1),
            ("2024-01-08", 2),
            ("2024-01-09", 3),
            ("2024-01-10", 4),
            ("2024-01-11", 5),
            ("2024-01-12", 6),
            ("2024-01-13", 7),
        ]);
        let mut grid = build_grid(&index, 7, Metric::Interactions, 52, today);
        classify(&mut grid);

        // n=7 -> Q1=values[1]=2, Q2=values[3]=4, Q3=values[5]=6
        let levels: Vec<Option<u8>> = grid.weeks[0].iter().map(|c| c.intensity).collect();
        assert_eq!(
            levels,
            vec![Some(1), Some(1), Some(2), Some(2), Some(3), Some(3), Some(4)]
        );
    }

    #[test]
    fn test_classify_ignores_padding_values() {
        // Padding day 2024-01-07 holds a large value that must not shift quartiles
        let today = date("2024-01-13");
        let index = index_with(&[("2024-01-07", 1000), ("2024-01-12", 1), ("2024-01-13", 2)]);
        let mut grid = build_grid(&index, 2, Metric::Interactions, 52, today);
        classify(&mut grid);

        let padding = &grid.weeks[0][0];
        assert_eq!(padding.intensity, None);
        // n=2 -> Q1=values[0]=1, Q2=Q3=values[1]=2
        assert_eq!(grid.weeks[0][5].intensity, Some(1));
        assert_eq!(grid.weeks[0][6].intensity, Some(2));
    }

    #[test]
    fn test_classify_no_activity_keeps_zero() {
        let today = date("2024-01-13");
        let mut grid = build_grid(&ActivityIndex::new(), 7, Metric::Tokens, 52, today);
        classify(&mut grid);
        assert!(grid
            .cells()
            .filter(|c| c.is_renderable())
            .all(|c| c.intensity == Some(0)));
    }
}
