//! KDL catalog parsing: extracts node and edge specs from a catalog
//! description document.
//!
//! Format, one top-level KDL node per catalog asset:
//!
//! ```kdl
//! orders type="table" tags="core,sales" {
//!     column "id" datatype="uuid" key="primary"
//!     column "customer_id" datatype="uuid" key="reference"
//!     link target="customers" kind="many-to-one" {
//!         view "orders_by_customer"
//!     }
//! }
//! ```

use anyhow::{anyhow, Result};
use catviz_model::{ContentRow, DownstreamView, EdgeSpec, NodeKind, NodeSpec, RelationshipKind, RowKey};

/// Parse KDL content and extract catalog nodes with their relationships.
pub fn parse_catalog(content: &str) -> Result<(Vec<NodeSpec>, Vec<EdgeSpec>)> {
    let doc = kdl::KdlDocument::parse(content)
        .map_err(|e| anyhow!("invalid KDL catalog: {e}"))?;

    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    // First pass: collect all assets.
    for kdl_node in doc.nodes() {
        let name = kdl_node.name().to_string();

        let Some(kind) = entry_string(kdl_node, "type").and_then(|t| parse_kind(&t)) else {
            continue;
        };

        let tags = entry_string(kdl_node, "tags")
            .map(|t| t.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();

        let mut content_rows = Vec::new();
        if let Some(children) = kdl_node.children() {
            for child in children.nodes() {
                if child.name().to_string() == "column" {
                    content_rows.push(extract_column(child));
                }
            }
        }

        nodes.push(NodeSpec {
            id: name.clone(),
            display_name: name,
            kind,
            tags,
            content_rows,
        });
    }

    // Second pass: collect link children into edges.
    for kdl_node in doc.nodes() {
        let source = kdl_node.name().to_string();
        if entry_string(kdl_node, "type").is_none() {
            continue;
        }

        let Some(children) = kdl_node.children() else {
            continue;
        };
        for child in children.nodes() {
            if child.name().to_string() != "link" {
                continue;
            }
            let Some(target) = entry_string(child, "target") else {
                continue;
            };
            let relationship = entry_string(child, "kind").and_then(|k| parse_relationship(&k));
            let views = extract_views(child);
            edges.push(EdgeSpec {
                source: source.clone(),
                target,
                relationship,
                views,
            });
        }
    }

    Ok((nodes, edges))
}

fn entry_string(node: &kdl::KdlNode, key: &str) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().map(|n| n.to_string().as_str() == key).unwrap_or(false))
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn positional_string(node: &kdl::KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn extract_column(node: &kdl::KdlNode) -> ContentRow {
    let name = positional_string(node).unwrap_or_else(|| "unnamed".to_string());
    let data_type = entry_string(node, "datatype").unwrap_or_else(|| "text".to_string());
    let key = match entry_string(node, "key").as_deref() {
        Some("primary") => RowKey::Primary,
        Some("reference") => RowKey::Reference,
        _ => RowKey::None,
    };
    ContentRow::new(name, data_type).with_key(key)
}

fn extract_views(link_node: &kdl::KdlNode) -> Vec<DownstreamView> {
    let mut views = Vec::new();
    if let Some(children) = link_node.children() {
        for child in children.nodes() {
            if child.name().to_string() == "view" {
                if let Some(name) = positional_string(child) {
                    views.push(DownstreamView {
                        name,
                        kind: entry_string(child, "type"),
                    });
                }
            }
        }
    }
    views
}

fn parse_kind(value: &str) -> Option<NodeKind> {
    match value {
        "source" => Some(NodeKind::DataSource),
        "table" => Some(NodeKind::Table),
        "view" => Some(NodeKind::View),
        "formula" => Some(NodeKind::Formula),
        "report" => Some(NodeKind::Report),
        "dashboard" => Some(NodeKind::Dashboard),
        "model" => Some(NodeKind::ModelArtifact),
        _ => None,
    }
}

fn parse_relationship(value: &str) -> Option<RelationshipKind> {
    match value {
        "one-to-one" => Some(RelationshipKind::OneToOne),
        "one-to-many" => Some(RelationshipKind::OneToMany),
        "many-to-one" => Some(RelationshipKind::ManyToOne),
        "many-to-many" => Some(RelationshipKind::ManyToMany),
        _ => None,
    }
}
