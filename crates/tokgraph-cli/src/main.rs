mod paths;
mod render;
mod settings;
mod themes;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use colored::Colorize;
use tokgraph_core::{aggregate, build_grid, classify, compute_stats, export, AggregateResult, Metric};

use settings::Settings;
use themes::{Theme, ThemeName};

const FALLBACK_TERMINAL_WIDTH: u16 = 80;

#[derive(Parser)]
#[command(name = "tokgraph")]
#[command(author, version, about = "Contribution heatmap of local AI assistant usage")]
struct Cli {
    #[arg(
        short,
        long,
        help = "Number of days to show, ending today",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    days: Option<u32>,

    #[arg(short, long, help = "Metric to plot: sessions, tokens or interactions")]
    metric: Option<Metric>,

    #[arg(short, long, help = "Graph color theme")]
    theme: Option<String>,

    #[arg(long = "dir", value_name = "PATH", help = "Log root to scan (repeatable, skips discovery)")]
    dirs: Vec<PathBuf>,

    #[arg(long, help = "Output daily activity as JSON")]
    json: bool,

    #[arg(short, long, requires = "json", help = "Write JSON to file instead of stdout")]
    output: Option<PathBuf>,

    #[arg(long, help = "Disable colored output")]
    no_color: bool,

    #[arg(long, help = "Show processing time")]
    benchmark: bool,

    #[arg(long, help = "Enable debug logging")]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = Settings::load();
    let days = cli.days.unwrap_or_else(|| settings.days());
    let metric = cli.metric.unwrap_or_else(|| settings.metric());
    let theme_name = match &cli.theme {
        Some(name) => name.parse().unwrap_or(ThemeName::Green),
        None => settings.theme_name(),
    };

    let roots = paths::resolve_roots(&cli.dirs, &settings.roots);
    tracing::debug!(?roots, days, %metric, "starting scan");

    let today = Utc::now().date_naive();
    let result = aggregate(&roots, days, today);

    if cli.json {
        if let Err(err) = run_json(&result, cli.output.as_deref()) {
            eprintln!("\n  {}", format!("Error: {:#}", err).red());
            std::process::exit(1);
        }
    } else {
        run_graph(&result, &roots, days, metric, &Theme::from_name(theme_name), today);
    }

    if cli.benchmark {
        print_benchmark(&result);
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let filter = if debug {
        Some(tracing_subscriber::EnvFilter::new("debug"))
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().ok()
    };

    if let Some(filter) = filter {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run_json(result: &AggregateResult, output: Option<&Path>) -> Result<()> {
    let json_output = export::to_json_string(&result.index)?;

    if let Some(output_path) = output {
        std::fs::write(output_path, json_output)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        eprintln!(
            "{}",
            format!("✓ Activity data written to {}", output_path.display()).green()
        );
        eprintln!(
            "{}",
            format!("  {} days with activity", result.index.len()).bright_black()
        );
    } else {
        println!("{}", json_output);
    }

    Ok(())
}

fn run_graph(
    result: &AggregateResult,
    roots: &[PathBuf],
    days: u32,
    metric: Metric,
    theme: &Theme,
    today: NaiveDate,
) {
    if result.index.is_empty() {
        eprintln!("\n  {}", "No activity found.".yellow());
        if roots.is_empty() {
            eprintln!("{}", "  No log directories configured.".bright_black());
        }
        for root in roots {
            eprintln!("{}", format!("  Scanned: {}", root.display()).bright_black());
        }
        eprintln!();
        return;
    }

    let columns = render::display_columns(terminal_width());

    let mut grid = build_grid(&result.index, days, metric, columns, today);
    classify(&mut grid);
    let stats = compute_stats(&result.index, metric, today);

    println!();
    println!("{}", render::render(&grid, &stats, theme, days));
    println!();
}

fn terminal_width() -> u16 {
    if !std::io::stdout().is_terminal() {
        return FALLBACK_TERMINAL_WIDTH;
    }
    crossterm::terminal::size()
        .map(|(width, _)| width)
        .unwrap_or(FALLBACK_TERMINAL_WIDTH)
}

fn print_benchmark(result: &AggregateResult) {
    let stats = &result.stats;
    eprintln!(
        "{}",
        format!("  Processing time: {}ms (Rust native)", result.processing_time_ms).bright_black()
    );
    eprintln!(
        "{}",
        format!(
            "  {} roots, {} projects, {} session files, {} records",
            stats.roots_scanned, stats.projects, stats.session_files, stats.records
        )
        .bright_black()
    );
    if stats.malformed_lines > 0 || stats.unreadable_paths > 0 {
        eprintln!(
            "{}",
            format!(
                "  Skipped {} malformed lines, {} unreadable paths",
                stats.malformed_lines, stats.unreadable_paths
            )
            .bright_black()
        );
    }
}
