use crate::result::{CrawlEdge, CrawlNode, CrawlResult, CrawlStats};
use std::collections::HashMap;

/// Accumulates nodes and edges while a crawl runs.
///
/// Node indices are handed out in insertion order and never change. Edges
/// are only recorded towards URLs that already have a node, so every edge
/// endpoint is valid at the moment it is created.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<CrawlNode>,
    edges: Vec<CrawlEdge>,
    index: HashMap<String, usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node for `url`, or return the index it already has.
    pub fn add_node(&mut self, title: String, url: String, depth: usize) -> usize {
        if let Some(&existing) = self.index.get(&url) {
            return existing;
        }
        let id = self.nodes.len();
        self.index.insert(url.clone(), id);
        self.nodes.push(CrawlNode::new(title, url, depth));
        id
    }

    /// Record `source -> target_url` if the target is already a node.
    pub fn link(&mut self, source: usize, target_url: &str) -> Option<usize> {
        let target = *self.index.get(target_url)?;
        self.edges.push(CrawlEdge::link(source, target));
        Some(target)
    }

    pub fn node_index(&self, url: &str) -> Option<usize> {
        self.index.get(url).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn finish(self, crawled: usize) -> CrawlResult {
        let stats = CrawlStats {
            pages: self.nodes.len(),
            links: self.edges.len(),
            crawled,
        };
        CrawlResult {
            nodes: self.nodes,
            edges: self.edges,
            stats,
        }
    }
}
