use serde::{Deserialize, Serialize};

/// Per-node metadata carried alongside the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    pub depth: usize,
}

/// A successfully fetched page. Its position in `CrawlResult::nodes` is its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlNode {
    pub title: String,
    pub url: String,
    pub meta: NodeMeta,
}

impl CrawlNode {
    pub fn new(title: String, url: String, depth: usize) -> Self {
        Self {
            title,
            url,
            meta: NodeMeta { depth },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Link,
}

/// A hyperlink between two nodes, by node index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlEdge {
    pub source: usize,
    pub target: usize,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl CrawlEdge {
    pub fn link(source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            kind: EdgeKind::Link,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Number of nodes.
    pub pages: usize,
    /// Number of edges.
    pub links: usize,
    /// Size of the visited set when the crawl stopped.
    pub crawled: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub nodes: Vec<CrawlNode>,
    pub edges: Vec<CrawlEdge>,
    pub stats: CrawlStats,
}

impl CrawlResult {
    pub fn node_index(&self, url: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.url == url)
    }

    pub fn has_edge(&self, source: usize, target: usize) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_in_graph_shape() {
        let result = CrawlResult {
            nodes: vec![CrawlNode::new(
                "Home".to_string(),
                "http://a.com/".to_string(),
                0,
            )],
            edges: vec![CrawlEdge::link(0, 0)],
            stats: CrawlStats {
                pages: 1,
                links: 1,
                crawled: 3,
            },
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["nodes"][0]["title"], "Home");
        assert_eq!(value["nodes"][0]["meta"]["depth"], 0);
        assert_eq!(value["edges"][0]["type"], "link");
        assert_eq!(value["edges"][0]["source"], 0);
        assert_eq!(value["stats"]["crawled"], 3);
    }

    #[test]
    fn test_node_index_lookup() {
        let result = CrawlResult {
            nodes: vec![
                CrawlNode::new("A".into(), "http://a.com/".into(), 0),
                CrawlNode::new("B".into(), "http://a.com/b".into(), 1),
            ],
            edges: vec![CrawlEdge::link(1, 0)],
            stats: CrawlStats::default(),
        };

        assert_eq!(result.node_index("http://a.com/b"), Some(1));
        assert_eq!(result.node_index("http://a.com/c"), None);
        assert!(result.has_edge(1, 0));
        assert!(!result.has_edge(0, 1));
    }
}
