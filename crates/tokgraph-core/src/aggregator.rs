//! Parallel aggregation of session logs into per-day activity
//!
//! Uses rayon for parallel map-reduce over session files.

use crate::scanner::{self, SessionFile};
use crate::session::{self, SessionLog};
use crate::ActivityIndex;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Counters describing what a scan saw, including everything it skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub roots_scanned: usize,
    pub projects: usize,
    pub session_files: usize,
    /// Directories or files that could not be listed or read
    pub unreadable_paths: usize,
    /// Records folded into the index
    pub records: usize,
    pub malformed_lines: usize,
    /// Parsed records outside the window or without a usable timestamp
    pub skipped_records: usize,
}

impl ScanStats {
    fn merge(&mut self, other: ScanStats) {
        self.roots_scanned += other.roots_scanned;
        self.projects += other.projects;
        self.session_files += other.session_files;
        self.unreadable_paths += other.unreadable_paths;
        self.records += other.records;
        self.malformed_lines += other.malformed_lines;
        self.skipped_records += other.skipped_records;
    }
}

#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    pub index: ActivityIndex,
    pub stats: ScanStats,
    pub processing_time_ms: u64,
}

/// Earliest instant still inside a window of `window_days` ending on `today`.
///
/// Midnight UTC of `today - window_days`.
pub fn cutoff_instant(window_days: u32, today: NaiveDate) -> DateTime<Utc> {
    today
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Scan `roots` and fold every in-window record into a fresh index.
///
/// Never fails: unreadable paths and malformed lines are counted in
/// [`ScanStats`] and otherwise ignored.
pub fn aggregate(roots: &[PathBuf], window_days: u32, today: NaiveDate) -> AggregateResult {
    let start = Instant::now();

    let scan = scanner::scan_roots(roots);
    let cutoff = cutoff_instant(window_days, today);
    let (index, mut stats) = aggregate_files(&scan.files, cutoff);

    stats.roots_scanned = scan.roots_scanned;
    stats.projects = scan.projects;
    stats.unreadable_paths += scan.unreadable;

    info!(
        roots = stats.roots_scanned,
        projects = stats.projects,
        files = stats.session_files,
        records = stats.records,
        malformed = stats.malformed_lines,
        skipped = stats.skipped_records,
        days = index.len(),
        "aggregation finished"
    );

    AggregateResult {
        index,
        stats,
        processing_time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}

/// Parse and fold a set of session files in parallel.
pub fn aggregate_files(
    files: &[SessionFile],
    cutoff: DateTime<Utc>,
) -> (ActivityIndex, ScanStats) {
    files
        .par_iter()
        .fold(
            || (ActivityIndex::new(), ScanStats::default()),
            |(mut index, mut stats), file| {
                match session::parse_session_file(&file.path) {
                    Ok(log) => {
                        stats.session_files += 1;
                        fold_session_log(&mut index, &mut stats, &file.session_key(), &log, cutoff);
                    }
                    Err(err) => {
                        debug!(path = %file.path.display(), error = %err, "skipping unreadable session file");
                        stats.unreadable_paths += 1;
                    }
                }
                (index, stats)
            },
        )
        .reduce(
            || (ActivityIndex::new(), ScanStats::default()),
            |(mut a_index, mut a_stats), (b_index, b_stats)| {
                a_index.merge(b_index);
                a_stats.merge(b_stats);
                (a_index, a_stats)
            },
        )
}

/// Fold one parsed session log into `index`.
pub fn fold_session_log(
    index: &mut ActivityIndex,
    stats: &mut ScanStats,
    session_key: &str,
    log: &SessionLog,
    cutoff: DateTime<Utc>,
) {
    stats.malformed_lines += log.malformed_lines;

    for entry in &log.entries {
        let timestamp = match entry.timestamp {
            Some(ts) if ts >= cutoff => ts,
            _ => {
                stats.skipped_records += 1;
                continue;
            }
        };

        index
            .day_mut(timestamp.date_naive())
            .record(session_key, entry.tokens.total());
        stats.records += 1;
    }
}
