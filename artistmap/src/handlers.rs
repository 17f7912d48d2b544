use anyhow::{Context, Result};
use artistmap_core::export::{ExportFormat, write_tables};
use artistmap_core::{
    AggregateOptions, AggregateProgressCallback, AggregateSummary, SpotifyPlaylistSource,
    execute_aggregation,
};
use artistmap_spotify::{Credentials, SpotifyClient};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use url::Url;

/// Everything a `build` run needs, resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub credentials: Credentials,
    pub playlist_id: String,
    pub output_dir: PathBuf,
    pub formats: Vec<ExportFormat>,
    pub options: AggregateOptions,
    pub api_base: String,
    pub accounts_base: String,
}

impl BuildConfig {
    pub fn from_matches(args: &ArgMatches) -> Result<Self> {
        let required = |name: &str| -> Result<String> {
            args.get_one::<String>(name)
                .cloned()
                .with_context(|| format!("--{} is required", name))
        };

        let output_dir = args
            .get_one::<String>("output-dir")
            .map(|dir| resolve_output_dir(dir))
            .unwrap_or_else(|| PathBuf::from("."));
        let base = |name: &str, default: &str| {
            args.get_one::<Url>(name)
                .map(|url| url.to_string())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            credentials: Credentials::new(required("client-id")?, required("client-secret")?),
            playlist_id: required("playlist")?,
            output_dir,
            formats: export_formats(args.get_flag("json")),
            options: AggregateOptions {
                include_playlist_artist_genres: !args.get_flag("no-playlist-genres"),
            },
            api_base: base("api-base", artistmap_spotify::client::DEFAULT_API_BASE),
            accounts_base: base(
                "accounts-base",
                artistmap_spotify::client::DEFAULT_ACCOUNTS_BASE,
            ),
        })
    }
}

/// Expands a leading `~` in the output directory
pub fn resolve_output_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// CSV is always written; JSON only when asked for.
pub fn export_formats(json: bool) -> Vec<ExportFormat> {
    if json {
        vec![ExportFormat::Csv, ExportFormat::Json]
    } else {
        vec![ExportFormat::Csv]
    }
}

pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Authenticates, aggregates the playlist and writes the tables. Nothing is
/// written unless the whole traversal succeeded.
pub async fn run_build(
    config: &BuildConfig,
    progress_callback: Option<AggregateProgressCallback>,
) -> Result<(AggregateSummary, Vec<PathBuf>)> {
    let mut client = SpotifyClient::new()
        .context("Failed to create HTTP client")?
        .with_api_base(&config.api_base)?
        .with_accounts_base(&config.accounts_base)?;

    client
        .authenticate(&config.credentials)
        .await
        .context("Failed to authenticate with Spotify")?;

    let source = SpotifyPlaylistSource::new(client, config.playlist_id.clone());
    let (tables, summary) =
        execute_aggregation(&source, config.options.clone(), progress_callback)
            .await
            .with_context(|| format!("Failed to aggregate playlist {}", config.playlist_id))?;

    let written = write_tables(&tables, &config.output_dir, &config.formats)
        .with_context(|| format!("Failed to write tables to {}", config.output_dir.display()))?;

    Ok((summary, written))
}

/// Human-readable run summary
pub fn format_summary(summary: &AggregateSummary, written: &[PathBuf], output_dir: &Path) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Tracks: {}\n", summary.tracks));
    report.push_str(&format!("  Playlist artists: {}\n", summary.playlist_artists));
    report.push_str(&format!("  Related artists: {}\n", summary.related_artists));
    report.push_str(&format!("  Genres: {}\n", summary.genres));
    report.push_str(&format!("  Origin links: {}\n", summary.origin_links));
    report.push_str(&format!(
        "\n# Files written to {}:\n",
        output_dir.display()
    ));
    for path in written {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        report.push_str(&format!("  {}\n", name));
    }
    report
}

pub async fn handle_build(sub_matches: &ArgMatches, verbose: bool, quiet: bool) {
    init_logging(verbose, quiet);

    let config = match BuildConfig::from_matches(sub_matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if !quiet {
        println!("{} Playlist: {}", "→".blue(), config.playlist_id.bright_white());
        println!(
            "{} Output: {}",
            "→".blue(),
            config.output_dir.display().to_string().bright_white()
        );
        println!();
    }

    let spinner = Arc::new(ProgressBar::new_spinner());
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Fetching playlist...");

    let spinner_clone = spinner.clone();
    let progress_callback: AggregateProgressCallback =
        Arc::new(move |done: usize, total: usize, name: &str| {
            spinner_clone.set_message(format!("Visiting artist {}/{}: {}", done, total, name));
        });

    match run_build(&config, Some(progress_callback)).await {
        Ok((summary, written)) => {
            spinner.finish_and_clear();
            println!("{} Tables written!\n", "✓".green().bold());
            if !quiet {
                print!("{}", format_summary(&summary, &written, &config.output_dir));
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
