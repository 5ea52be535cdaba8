//! Parallel file scanner for session log directories
//!
//! Layout under each root: `<root>/<project>/<session>.jsonl`.
//! Uses walkdir for listing and rayon to list projects in parallel.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File name suffix of a session log
pub const LOG_EXTENSION: &str = ".jsonl";

/// One session log found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile {
    pub project: String,
    pub session_id: String,
    pub path: PathBuf,
}

impl SessionFile {
    /// Identifier recorded in a day's session set
    pub fn session_key(&self) -> String {
        format!("{}/{}", self.project, self.session_id)
    }
}

/// Result of scanning all roots
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<SessionFile>,
    pub roots_scanned: usize,
    pub projects: usize,
    /// Directory entries that could not be listed
    pub unreadable: usize,
}

/// Scan every root for project directories and their session logs.
///
/// Missing roots and unlistable entries are skipped; everything else found is returned.
pub fn scan_roots(roots: &[PathBuf]) -> ScanResult {
    let mut result = ScanResult::default();

    for root in roots {
        if !root.is_dir() {
            debug!(root = %root.display(), "skipping missing root");
            continue;
        }
        result.roots_scanned += 1;

        let (projects, unreadable) = list_projects(root);
        result.unreadable += unreadable;
        result.projects += projects.len();

        let listed: Vec<(Vec<SessionFile>, usize)> =
            projects.par_iter().map(|p| list_session_files(p)).collect();

        for (files, unreadable) in listed {
            result.files.extend(files);
            result.unreadable += unreadable;
        }
    }

    // Stable order for logging; aggregation itself does not depend on it
    result.files.sort_by(|a, b| a.path.cmp(&b.path));
    result
}

fn list_projects(root: &Path) -> (Vec<PathBuf>, usize) {
    let mut unreadable = 0;
    let mut projects = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        match entry {
            Ok(e) if e.path().is_dir() => projects.push(e.into_path()),
            Ok(_) => {}
            Err(err) => {
                debug!(root = %root.display(), error = %err, "unreadable entry");
                unreadable += 1;
            }
        }
    }

    (projects, unreadable)
}

/// List `*.jsonl` files directly inside one project directory.
pub fn list_session_files(project_dir: &Path) -> (Vec<SessionFile>, usize) {
    let project = match project_dir.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => return (Vec::new(), 0),
    };

    let mut unreadable = 0;
    let mut files = Vec::new();

    for entry in WalkDir::new(project_dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!(project = %project, error = %err, "unreadable entry");
                unreadable += 1;
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => continue,
        };
        if let Some(session_id) = file_name.strip_suffix(LOG_EXTENSION) {
            files.push(SessionFile {
                project: project.clone(),
                session_id: session_id.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    (files, unreadable)
}
