// Sitemap and graph export for crawl results

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use sitegraph_scanner::{CrawlNode, CrawlResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Text,
    Json,
    Xml,
    Csv,
    Dot,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ExportFormat::Text),
            "json" => Some(ExportFormat::Json),
            "xml" | "sitemap" => Some(ExportFormat::Xml),
            "csv" => Some(ExportFormat::Csv),
            "dot" | "graphviz" => Some(ExportFormat::Dot),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
            ExportFormat::Csv => "csv",
            ExportFormat::Dot => "dot",
        }
    }
}

/// sitemaps.org document listing every node that has a URL.
pub fn generate_sitemap_xml(nodes: &[CrawlNode]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for node in nodes.iter().filter(|n| !n.url.is_empty()) {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&node.url)));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// One row per node; the ID column is the node index used by edges.
pub fn generate_sitemap_csv(nodes: &[CrawlNode]) -> String {
    let mut csv = String::from("ID,Title,URL,Depth\n");
    for (idx, node) in nodes.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            idx,
            quote_csv(&node.title),
            quote_csv(&node.url),
            node.meta.depth
        ));
    }
    csv
}

pub fn generate_json_report(result: &CrawlResult, seed: &str) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "metadata": {
            "generator": "Sitegraph",
            "version": env!("CARGO_PKG_VERSION"),
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "seed": seed,
        },
        "nodes": result.nodes,
        "edges": result.edges,
        "stats": result.stats,
    });

    serde_json::to_string_pretty(&json_report)
}

/// Directed graph with one vertex per node, in node-index order.
pub fn build_graph(result: &CrawlResult) -> DiGraph<String, &'static str> {
    let mut graph = DiGraph::with_capacity(result.nodes.len(), result.edges.len());
    for node in &result.nodes {
        graph.add_node(node.url.clone());
    }
    for edge in &result.edges {
        graph.add_edge(NodeIndex::new(edge.source), NodeIndex::new(edge.target), "link");
    }
    graph
}

pub fn generate_dot(result: &CrawlResult) -> String {
    let graph = build_graph(result);
    format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
}

/// Render `result` in the requested output format.
pub fn render(format: ExportFormat, result: &CrawlResult, seed: &str) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Json => generate_json_report(result, seed),
        ExportFormat::Xml => Ok(generate_sitemap_xml(&result.nodes)),
        ExportFormat::Csv => Ok(generate_sitemap_csv(&result.nodes)),
        ExportFormat::Dot => Ok(generate_dot(result)),
        ExportFormat::Text => Ok(crate::crawl::generate_crawl_report(result, seed)),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn quote_csv(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a?x=1&y=<2>"), "a?x=1&amp;y=&lt;2&gt;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_quote_csv() {
        assert_eq!(quote_csv("Say \"hi\", ok"), "\"Say \"\"hi\"\", ok\"");
        assert_eq!(quote_csv(""), "\"\"");
    }
}
