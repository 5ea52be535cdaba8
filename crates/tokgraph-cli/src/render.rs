use chrono::Datelike;
use colored::{ColoredString, Colorize};

use crate::themes::{Rgb, Theme};
use tokgraph_core::{Grid, HeatmapStats, Metric};

pub const CELL_WIDTH: usize = 2;
pub const LABEL_WIDTH: usize = 4;
const MONTH_LABELS: &[&str] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const DAY_LABELS: &[&str] = &["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const CELL: &str = "██";
const STAT_LABEL_WIDTH: usize = 17;
const STAT_VALUE_WIDTH: usize = 14;

/// Weeks that fit beside the day labels in a terminal `width` columns wide.
pub fn display_columns(width: u16) -> usize {
    (usize::from(width).saturating_sub(LABEL_WIDTH) / CELL_WIDTH).max(1)
}

fn paint(text: &str, color: Rgb) -> ColoredString {
    text.truecolor(color.0, color.1, color.2)
}

/// Title, graph, legend and stats as one printable block.
pub fn render(grid: &Grid, stats: &HeatmapStats, theme: &Theme, window_days: u32) -> String {
    let mut lines = vec![
        render_title(grid.metric, window_days, theme),
        String::new(),
        render_month_row(grid, theme),
    ];
    lines.extend(render_day_rows(grid, theme));
    lines.push(String::new());
    lines.push(render_legend(theme));
    lines.push(String::new());
    lines.extend(render_stats(grid.metric, stats, theme));
    lines.join("\n")
}

fn render_title(metric: Metric, window_days: u32, theme: &Theme) -> String {
    let plural = if window_days == 1 { "" } else { "s" };
    format!(
        "  {}",
        paint(
            &format!("{} · last {} day{}", metric.label(), window_days, plural),
            theme.highlight
        )
        .bold()
    )
}

fn render_month_row(grid: &Grid, theme: &Theme) -> String {
    let width = LABEL_WIDTH + grid.weeks.len() * CELL_WIDTH;
    let mut row = vec![' '; width];
    let mut current_month: Option<u32> = None;
    let mut next_free = 0;

    for (week_idx, week) in grid.weeks.iter().enumerate() {
        let month = week[0].date.month0();
        if current_month == Some(month) {
            continue;
        }
        current_month = Some(month);

        let x = LABEL_WIDTH + week_idx * CELL_WIDTH;
        let label = MONTH_LABELS[month as usize];
        if x >= next_free && x + label.len() <= width {
            for (i, ch) in label.chars().enumerate() {
                row[x + i] = ch;
            }
            next_free = x + label.len() + 1;
        }
    }

    let text: String = row.into_iter().collect();
    paint(text.trim_end(), theme.muted).to_string()
}

fn render_day_rows(grid: &Grid, theme: &Theme) -> Vec<String> {
    (0..7)
        .map(|day_idx| {
            let label = if day_idx % 2 == 1 { DAY_LABELS[day_idx] } else { "" };
            let mut line = paint(&format!("{:<width$}", label, width = LABEL_WIDTH), theme.muted)
                .to_string();

            for week in &grid.weeks {
                match week[day_idx].intensity {
                    Some(level) => line.push_str(&paint(CELL, theme.level_color(level)).to_string()),
                    None => line.push_str(&" ".repeat(CELL_WIDTH)),
                }
            }
            line
        })
        .collect()
}

fn render_legend(theme: &Theme) -> String {
    let mut line = " ".repeat(LABEL_WIDTH);
    line.push_str(&paint("Less ", theme.muted).to_string());
    let cells: Vec<String> = theme
        .colors
        .iter()
        .map(|color| paint(CELL, *color).to_string())
        .collect();
    line.push_str(&cells.join(" "));
    line.push_str(&paint(" More", theme.muted).to_string());
    line
}

fn stat_pair(label: &str, value: &str, theme: &Theme) -> String {
    format!(
        "{}{}",
        paint(
            &format!("{:<width$}", label, width = STAT_LABEL_WIDTH),
            theme.muted
        ),
        format!("{:<width$}", value, width = STAT_VALUE_WIDTH).cyan()
    )
}

fn render_stats(metric: Metric, stats: &HeatmapStats, theme: &Theme) -> Vec<String> {
    let mut lines = vec![
        format!(
            "  {}{}",
            stat_pair(
                &format!("Total {}:", metric.as_str()),
                &format_value(metric, stats.total_value),
                theme
            ),
            stat_pair("Active days:", &stats.active_days.to_string(), theme)
        ),
        format!(
            "  {}{}",
            stat_pair("Current streak:", &format_days(stats.current_streak), theme),
            stat_pair("Longest streak:", &format_days(stats.longest_streak), theme)
        ),
    ];

    if let Some(day) = stats.busiest_day {
        lines.push(format!(
            "  {}{}",
            paint(
                &format!("{:<width$}", "Busiest day:", width = STAT_LABEL_WIDTH),
                theme.muted
            ),
            format!(
                "{} ({} {})",
                day.format("%b %d, %Y"),
                format_value(metric, stats.max_value),
                metric.as_str()
            )
            .cyan()
        ));
    }

    lines
}

fn format_days(n: u32) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}

pub fn format_value(metric: Metric, value: u64) -> String {
    match metric {
        Metric::Tokens => format_tokens(value),
        Metric::Sessions | Metric::Interactions => format_with_commas(value),
    }
}

pub fn format_tokens(tokens: u64) -> String {
    if tokens >= 1_000_000_000 {
        format!("{:.1}B", tokens as f64 / 1_000_000_000.0)
    } else if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.1}K", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}

pub fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
