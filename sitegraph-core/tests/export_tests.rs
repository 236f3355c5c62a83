// Tests for sitemap and graph export

use sitegraph_core::export::{
    ExportFormat, build_graph, generate_dot, generate_json_report, generate_sitemap_csv,
    generate_sitemap_xml, render, save_report,
};
use sitegraph_scanner::{CrawlEdge, CrawlNode, CrawlResult, CrawlStats};
use tempfile::TempDir;

fn sample_result() -> CrawlResult {
    CrawlResult {
        nodes: vec![
            CrawlNode::new("Home".into(), "http://a.com/".into(), 0),
            CrawlNode::new("Search \"all\"".into(), "http://a.com/s?q=1&p=2".into(), 1),
            CrawlNode::new("Contact".into(), "http://a.com/contact".into(), 1),
        ],
        edges: vec![CrawlEdge::link(1, 0), CrawlEdge::link(2, 1)],
        stats: CrawlStats {
            pages: 3,
            links: 2,
            crawled: 5,
        },
    }
}

// ============================================================================
// Export Format Tests
// ============================================================================

#[test]
fn test_export_format_from_str() {
    assert_eq!(ExportFormat::from_str("text"), Some(ExportFormat::Text));
    assert_eq!(ExportFormat::from_str("json"), Some(ExportFormat::Json));
    assert_eq!(ExportFormat::from_str("xml"), Some(ExportFormat::Xml));
    assert_eq!(ExportFormat::from_str("sitemap"), Some(ExportFormat::Xml));
    assert_eq!(ExportFormat::from_str("csv"), Some(ExportFormat::Csv));
    assert_eq!(ExportFormat::from_str("dot"), Some(ExportFormat::Dot));
    assert_eq!(ExportFormat::from_str("graphviz"), Some(ExportFormat::Dot));
}

#[test]
fn test_export_format_from_str_case_insensitive() {
    assert_eq!(ExportFormat::from_str("JSON"), Some(ExportFormat::Json));
    assert_eq!(ExportFormat::from_str("Csv"), Some(ExportFormat::Csv));
}

#[test]
fn test_export_format_from_str_invalid() {
    assert_eq!(ExportFormat::from_str("pdf"), None);
    assert_eq!(ExportFormat::from_str(""), None);
}

#[test]
fn test_export_format_extension() {
    assert_eq!(ExportFormat::Xml.extension(), "xml");
    assert_eq!(ExportFormat::Dot.extension(), "dot");
}

// ============================================================================
// Sitemap Tests
// ============================================================================

#[test]
fn test_sitemap_xml_lists_every_url_escaped() {
    let xml = generate_sitemap_xml(&sample_result().nodes);

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
    assert_eq!(xml.matches("<url>").count(), 3);
    assert!(xml.contains("<loc>http://a.com/</loc>"));
    assert!(xml.contains("<loc>http://a.com/s?q=1&amp;p=2</loc>"));
    assert!(xml.trim_end().ends_with("</urlset>"));
}

#[test]
fn test_sitemap_xml_skips_empty_urls() {
    let nodes = vec![
        CrawlNode::new("Planned".into(), String::new(), 0),
        CrawlNode::new("Home".into(), "http://a.com/".into(), 0),
    ];
    let xml = generate_sitemap_xml(&nodes);
    assert_eq!(xml.matches("<url>").count(), 1);
}

#[test]
fn test_sitemap_csv_rows() {
    let csv = generate_sitemap_csv(&sample_result().nodes);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "ID,Title,URL,Depth");
    assert_eq!(lines[1], "0,\"Home\",\"http://a.com/\",0");
    assert_eq!(lines[2], "1,\"Search \"\"all\"\"\",\"http://a.com/s?q=1&p=2\",1");
    assert_eq!(lines.len(), 4);
}

// ============================================================================
// Graph Export Tests
// ============================================================================

#[test]
fn test_json_report_shape() {
    let json = generate_json_report(&sample_result(), "http://a.com/").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["metadata"]["generator"], "Sitegraph");
    assert_eq!(value["metadata"]["seed"], "http://a.com/");
    assert!(value["metadata"]["generated_at"].is_string());
    assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(value["nodes"][1]["meta"]["depth"], 1);
    assert_eq!(value["edges"][0]["source"], 1);
    assert_eq!(value["edges"][0]["target"], 0);
    assert_eq!(value["edges"][0]["type"], "link");
    assert_eq!(value["stats"]["pages"], 3);
    assert_eq!(value["stats"]["links"], 2);
    assert_eq!(value["stats"]["crawled"], 5);
}

#[test]
fn test_build_graph_preserves_indices() {
    let graph = build_graph(&sample_result());
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph[petgraph::graph::NodeIndex::new(2)], "http://a.com/contact");
    assert!(graph.contains_edge(
        petgraph::graph::NodeIndex::new(1),
        petgraph::graph::NodeIndex::new(0)
    ));
}

#[test]
fn test_dot_output() {
    let dot = generate_dot(&sample_result());
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("1 -> 0"));
    assert!(dot.contains("2 -> 1"));
    assert!(dot.contains("http://a.com/contact"));
}

#[test]
fn test_render_dispatches_on_format() {
    let result = sample_result();
    assert!(render(ExportFormat::Xml, &result, "http://a.com/").unwrap().contains("<urlset"));
    assert!(render(ExportFormat::Csv, &result, "http://a.com/").unwrap().starts_with("ID,"));
    assert!(render(ExportFormat::Dot, &result, "http://a.com/").unwrap().contains("digraph"));
    assert!(render(ExportFormat::Text, &result, "http://a.com/").unwrap().contains("Pages crawled: 3"));
}

#[test]
fn test_save_report() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("sitemap.xml");
    let content = generate_sitemap_xml(&sample_result().nodes);

    save_report(&content, &path)?;

    assert_eq!(std::fs::read_to_string(&path)?, content);
    Ok(())
}
