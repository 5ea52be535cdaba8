//! Log root discovery
//!
//! Priority: `--dir` flags > `CLAUDE_CONFIG_DIR` > default locations.
//! Roots from settings are appended to whatever was discovered.

use std::path::{Path, PathBuf};

pub const CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";
const PROJECTS_DIR: &str = "projects";

/// Resolve the roots to scan from the process environment.
pub fn resolve_roots(explicit: &[PathBuf], extra: &[PathBuf]) -> Vec<PathBuf> {
    let env_value = std::env::var(CONFIG_DIR_ENV).ok();
    let home = dirs::home_dir();
    discover_roots(explicit, env_value.as_deref(), home.as_deref(), extra)
}

pub fn discover_roots(
    explicit: &[PathBuf],
    env_value: Option<&str>,
    home: Option<&Path>,
    extra: &[PathBuf],
) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        return dedup(explicit.to_vec());
    }

    let mut roots: Vec<PathBuf> = match env_value {
        Some(value) if !value.trim().is_empty() => value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| PathBuf::from(entry).join(PROJECTS_DIR))
            .collect(),
        _ => home
            .map(|home| {
                vec![
                    home.join(".config/claude").join(PROJECTS_DIR),
                    home.join(".claude").join(PROJECTS_DIR),
                ]
            })
            .unwrap_or_default(),
    };

    roots.extend(extra.iter().cloned());
    dedup(roots)
}

fn dedup(roots: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut unique: Vec<PathBuf> = Vec::with_capacity(roots.len());
    for root in roots {
        if !unique.contains(&root) {
            unique.push(root);
        }
    }
    unique
}
