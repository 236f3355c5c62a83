use crate::config::Settings;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitegraph_scanner::error::Result;
use sitegraph_scanner::{CrawlNode, CrawlResult, Crawler};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub url: String,
    pub settings: Settings,
    pub show_progress_bars: bool,
    /// Set from outside (e.g. Ctrl-C) to stop dispatching new fetches.
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Callback for reporting individual pages as they are added to the graph
pub type CrawlPageCallback = Arc<dyn Fn(CrawlNode) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options and return the page graph
pub async fn execute_crawl(
    options: CrawlOptions,
    page_callback: Option<CrawlPageCallback>,
) -> Result<CrawlResult> {
    let CrawlOptions {
        url,
        settings,
        show_progress_bars,
        cancel,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Starting crawl of {}...", url));
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let mut crawler = Crawler::new(settings.crawler_config())?;

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let count_clone = processed_count.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |_worker_id: usize, url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            pb_clone.set_message(format!("[{}] {}", count, extract_url_path(&url)));
        }));
    }

    if let Some(cb) = page_callback {
        crawler = crawler.with_page_callback(cb);
    }

    if let Some(cancel) = cancel {
        crawler = crawler.with_cancel_flag(cancel);
    }

    let outcome = crawler.crawl(&url).await;

    if let Some(ref pb) = progress_bar {
        match &outcome {
            Ok(result) => pb.finish_with_message(format!(
                "Crawl complete! {} pages, {} links",
                result.stats.pages, result.stats.links
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    outcome
}

/// Generate a human-readable crawl summary
pub fn generate_crawl_report(result: &CrawlResult, seed: &str) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str(&format!("# {}\n", seed.bold()));
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Pages crawled: {}\n", result.stats.pages));
    report.push_str(&format!("  Links recorded: {}\n", result.stats.links));
    report.push_str(&format!("  URLs discovered: {}\n", result.stats.crawled));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if result.nodes.is_empty() {
        report.push_str("  No pages could be fetched.\n");
        return report;
    }

    let mut by_depth: BTreeMap<usize, Vec<(usize, &CrawlNode)>> = BTreeMap::new();
    for (idx, node) in result.nodes.iter().enumerate() {
        by_depth.entry(node.meta.depth).or_default().push((idx, node));
    }

    for (depth, nodes) in by_depth.iter() {
        report.push_str(&format!("## Depth {}\n", depth));
        report.push_str(&format!("  {} pages found\n\n", nodes.len()));

        for (idx, node) in nodes {
            let inbound = result.edges.iter().filter(|e| e.target == *idx).count();
            report.push_str(&format!(
                "  {} {} {}",
                format!("[{}]", idx).cyan(),
                extract_url_path(&node.url),
                node.title.bright_black()
            ));
            if inbound > 0 {
                report.push_str(&format!(" ({} inbound)", inbound));
            }
            report.push('\n');
        }
        report.push('\n');
    }

    report
}
