use crate::canonical::canonical_url;
use crate::error::{Result, ScanError};
use crate::extract::extract_page;
use crate::frontier::{Frontier, FrontierEntry};
use crate::graph::GraphBuilder;
use crate::result::{CrawlNode, CrawlResult};
use reqwest::Client;
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_MAX_PAGES: usize = 200;
pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MAX_REDIRECTS: usize = 5;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;
pub type PageCallback = Arc<dyn Fn(CrawlNode) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub max_pages: usize,
    pub max_depth: usize,
    /// Number of fetches allowed in flight. 1 gives a strictly sequential crawl.
    pub workers: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            workers: 1,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("sitegraph/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Everything the workers share, behind one lock so that dequeueing,
/// dedup and graph updates are never interleaved.
struct CrawlState {
    frontier: Frontier,
    graph: GraphBuilder,
    in_flight: usize,
}

#[derive(Clone)]
struct WorkerContext {
    client: Client,
    origin: Arc<Url>,
    state: Arc<Mutex<CrawlState>>,
    max_pages: usize,
    cancel: Arc<AtomicBool>,
    progress_callback: Option<ProgressCallback>,
    page_callback: Option<PageCallback>,
}

pub struct Crawler {
    client: Client,
    config: CrawlerConfig,
    progress_callback: Option<ProgressCallback>,
    page_callback: Option<PageCallback>,
    cancel: Arc<AtomicBool>,
}

impl Crawler {
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .pool_max_idle_per_host(config.workers.max(1))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(same_origin_redirects())
            .build()?;

        Ok(Self {
            client,
            config,
            progress_callback: None,
            page_callback: None,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Called with every node as soon as it is added to the graph.
    pub fn with_page_callback(mut self, callback: PageCallback) -> Self {
        self.page_callback = Some(callback);
        self
    }

    /// Share a cancellation flag. Once it is set no new fetch is started and
    /// the crawl returns what it has built so far.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub async fn crawl(&self, start_url: &str) -> Result<CrawlResult> {
        let workers = self.config.workers.max(1);
        info!(
            "Starting crawl of {} (max {} pages, depth {}, {} workers)",
            start_url, self.config.max_pages, self.config.max_depth, workers
        );

        let origin = Url::parse(start_url.trim())
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", start_url, e)))?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(ScanError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                start_url,
                origin.scheme()
            )));
        }

        let mut frontier = Frontier::new(self.config.max_depth);
        frontier.seed(canonical_url(origin.clone()).into());

        let state = Arc::new(Mutex::new(CrawlState {
            frontier,
            graph: GraphBuilder::new(),
            in_flight: 0,
        }));

        let context = WorkerContext {
            client: self.client.clone(),
            origin: Arc::new(origin),
            state: state.clone(),
            max_pages: self.config.max_pages,
            cancel: self.cancel.clone(),
            progress_callback: self.progress_callback.clone(),
            page_callback: self.page_callback.clone(),
        };

        let mut worker_set = JoinSet::new();
        for worker_id in 0..workers {
            worker_set.spawn(Self::run_worker(worker_id, context.clone()));
        }
        while let Some(joined) = worker_set.join_next().await {
            if let Err(e) = joined {
                warn!("Crawl worker failed: {}", e);
                self.cancel.store(true, Ordering::Relaxed);
                worker_set.abort_all();
                return Err(e.into());
            }
        }

        let mut state = state.lock().await;
        let crawled = state.frontier.visited_count();
        let graph = std::mem::take(&mut state.graph);
        let result = graph.finish(crawled);

        info!(
            "Crawl complete. {} pages, {} links, {} URLs seen",
            result.stats.pages, result.stats.links, result.stats.crawled
        );
        Ok(result)
    }

    async fn run_worker(worker_id: usize, ctx: WorkerContext) {
        debug!("Worker {} started", worker_id);

        loop {
            if ctx.cancel.load(Ordering::Relaxed) {
                debug!("Worker {} cancelled", worker_id);
                break;
            }

            let next = {
                let mut state = ctx.state.lock().await;
                let built = state.graph.node_count();
                if built >= ctx.max_pages {
                    break;
                }
                if built + state.in_flight >= ctx.max_pages {
                    // Enough fetches are already running to fill the page budget.
                    None
                } else {
                    match state.frontier.pop() {
                        Some(entry) => {
                            state.in_flight += 1;
                            Some(entry)
                        }
                        None if state.in_flight == 0 => break,
                        None => None,
                    }
                }
            };

            let Some(entry) = next else {
                tokio::time::sleep(Duration::from_millis(10)).await;
                continue;
            };

            if let Some(ref callback) = ctx.progress_callback {
                callback(worker_id, entry.url.clone());
            }

            Self::process_entry(&ctx, entry).await;
        }

        debug!("Worker {} finished", worker_id);
    }

    /// Fetch one frontier entry and fold the page into the shared graph.
    async fn process_entry(ctx: &WorkerContext, entry: FrontierEntry) {
        let page = Self::fetch_page(&ctx.client, &entry.url)
            .await
            .map(|(final_url, html)| extract_page(&html, &final_url, &ctx.origin));

        let node = {
            let mut state = ctx.state.lock().await;
            state.in_flight -= 1;

            match page {
                Ok(page) => {
                    let id = state
                        .graph
                        .add_node(page.title.clone(), entry.url.clone(), entry.depth);
                    for link in page.links {
                        state.graph.link(id, &link);
                        if state.frontier.push(link.clone(), entry.depth + 1) {
                            debug!("Queued {} (depth {})", link, entry.depth + 1);
                        }
                    }
                    Some(CrawlNode::new(page.title, entry.url, entry.depth))
                }
                Err(e) => {
                    warn!("Crawl error for {}: {}", entry.url, e);
                    None
                }
            }
        };

        if let Some(node) = node
            && let Some(ref callback) = ctx.page_callback
        {
            callback(node);
        }
    }

    /// GET `url` and return the URL the body was served from along with the body.
    async fn fetch_page(client: &Client, url: &str) -> Result<(Url, String)> {
        debug!("Fetching {}", url);

        let response = client.get(url).send().await?;
        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            return Err(ScanError::UnfollowedRedirect {
                url: url.to_string(),
                location,
            });
        }
        if !status.is_success() {
            return Err(ScanError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            && !is_html_content_type(content_type)
        {
            return Err(ScanError::NotHtml {
                url: url.to_string(),
                content_type: content_type.to_string(),
            });
        }

        let final_url = response.url().clone();
        Ok((final_url, response.text().await?))
    }
}

/// Follow redirects within the origin of the first request only. An offsite
/// hop stops the chain and the 3xx response is returned to the caller.
fn same_origin_redirects() -> Policy {
    Policy::custom(|attempt| {
        let hops = attempt.previous().len();
        let offsite = attempt
            .previous()
            .first()
            .is_some_and(|first| first.origin() != attempt.url().origin());
        if hops > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if offsite {
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

fn is_html_content_type(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.starts_with("text/html") || lower.starts_with("application/xhtml+xml")
}
