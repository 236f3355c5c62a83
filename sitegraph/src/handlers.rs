use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use sitegraph_core::config::{
    Settings, SettingsOverrides, config_file_in, default_config_path, expand_path,
};
use sitegraph_core::crawl::{CrawlOptions, execute_crawl};
use sitegraph_core::export::{ExportFormat, render, save_report};
use sitegraph_scanner::CrawlResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::info;
use url::Url;

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // Try to parse as-is
    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(line.to_string());
    }

    // Try adding http://
    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    None
}

/// Settings file, then command-line overrides.
pub fn settings_from_args(args: &ArgMatches) -> Result<Settings> {
    let path = args
        .get_one::<PathBuf>("config")
        .map(|p| expand_path(&p.to_string_lossy()))
        .unwrap_or_else(default_config_path);

    let mut settings = Settings::load(&path)?;
    settings.apply(&SettingsOverrides {
        max_pages: args.get_one::<usize>("max-pages").copied(),
        max_depth: args.get_one::<usize>("max-depth").copied(),
        workers: args.get_one::<usize>("workers").copied(),
        timeout_secs: args.get_one::<u64>("timeout").copied(),
    });
    Ok(settings)
}

#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    Overwritten(PathBuf),
    AlreadyExists(PathBuf),
}

/// Write the default settings file into `dir`.
pub fn init_settings(dir: &str, force: bool) -> Result<InitOutcome> {
    let path = config_file_in(dir);
    let existed = path.exists();
    if existed && !force {
        return Ok(InitOutcome::AlreadyExists(path));
    }

    Settings::default().save(&path)?;
    if existed {
        Ok(InitOutcome::Overwritten(path))
    } else {
        Ok(InitOutcome::Created(path))
    }
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    let dir = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(sitegraph_core::config::DEFAULT_CONFIG_DIR);
    let force = args.get_flag("force");

    match init_settings(dir, force)? {
        InitOutcome::Created(path) => {
            println!(
                "{} Settings written to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        InitOutcome::Overwritten(path) => {
            println!(
                "{} Existing settings replaced at {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        InitOutcome::AlreadyExists(path) => {
            println!("{}", "⚠ WARNING".yellow().bold());
            println!(
                "Settings file already exists: {}",
                path.display().to_string().bright_white()
            );
            println!("Use --force to overwrite it.");
        }
    }
    Ok(())
}

pub fn format_from_args(args: &ArgMatches) -> Result<ExportFormat> {
    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    ExportFormat::from_str(format_name).ok_or_else(|| anyhow!("Unknown format '{}'", format_name))
}

/// `-o report` becomes `report.<ext>` for the chosen format; explicit
/// extensions are left alone.
pub fn output_path(path: &Path, format: ExportFormat) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(format.extension())
    }
}

/// Run the crawl described by `args` and return the rendered output.
pub async fn crawl_output(
    args: &ArgMatches,
    cancel: Arc<AtomicBool>,
    show_progress: bool,
) -> Result<(CrawlResult, String)> {
    let raw_url = args
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("--url must be provided"))?;
    let url = parse_url_line(raw_url).ok_or_else(|| anyhow!("Invalid URL '{}'", raw_url))?;

    let format = format_from_args(args)?;

    let settings = settings_from_args(args)?;
    info!(
        "Crawling {} (max {} pages, depth {}, {} workers)",
        url, settings.max_pages, settings.max_depth, settings.workers
    );

    let options = CrawlOptions {
        url: url.clone(),
        settings,
        show_progress_bars: show_progress && !args.get_flag("no-progress"),
        cancel: Some(cancel),
    };

    let result = execute_crawl(options, None)
        .await
        .with_context(|| format!("Crawl of {} failed", url))?;
    if args.get_one::<PathBuf>("output").is_some() {
        // Files get plain text even when stdout is a terminal.
        colored::control::set_override(false);
    }
    let output = render(format, &result, &url).context("Failed to render output")?;

    Ok((result, output))
}

pub async fn handle_crawl(args: &ArgMatches, cancel: Arc<AtomicBool>, quiet: bool) -> Result<()> {
    let (result, output) = crawl_output(args, cancel, !quiet).await?;

    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            let path = output_path(path, format_from_args(args)?);
            save_report(&output, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{} {} pages, {} links written to {}",
                    "✓".green().bold(),
                    result.stats.pages,
                    result.stats.links,
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", output),
    }

    Ok(())
}
