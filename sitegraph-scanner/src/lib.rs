pub mod canonical;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod frontier;
pub mod graph;
pub mod result;

pub use canonical::{canonicalize, is_binary};
pub use crawler::{Crawler, CrawlerConfig, PageCallback, ProgressCallback};
pub use error::ScanError;
pub use result::{CrawlEdge, CrawlNode, CrawlResult, CrawlStats, EdgeKind, NodeMeta};
