//! Mind-map file format (`mindmap.json`).
//!
//! ```json
//! {
//!   "nodes": [{ "id", "title", "content", "kind", "parentId", "x", "y", "color" }],
//!   "links": [{ "id", "source", "target" }]
//! }
//! ```
//!
//! Physics bindings are never written. On read, link ids are re-derived
//! from their endpoints, and the older `type` spelling of `kind` is accepted.

use crate::error::ImportError;
use crate::id::NodeId;
use crate::model::{Color, Link, Node, NodeKind, Snapshot};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Name of the file offered for download on export.
pub const EXPORT_FILE_NAME: &str = "mindmap.json";

#[derive(Debug, Serialize, Deserialize)]
struct MindMapFile {
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    links: Vec<LinkRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    id: NodeId,
    title: String,
    #[serde(default)]
    content: String,
    #[serde(alias = "type")]
    kind: NodeKind,
    #[serde(default)]
    parent_id: Option<NodeId>,
    x: f64,
    y: f64,
    color: Option<Color>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LinkRecord {
    #[serde(default, skip_deserializing)]
    id: Option<String>,
    source: NodeId,
    target: NodeId,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            title: node.title.clone(),
            content: node.content.clone(),
            kind: node.kind,
            parent_id: node.parent_id,
            x: node.position.x,
            y: node.position.y,
            color: Some(node.color),
        }
    }
}

impl From<NodeRecord> for Node {
    fn from(rec: NodeRecord) -> Self {
        Node {
            id: rec.id,
            title: rec.title,
            content: rec.content,
            kind: rec.kind,
            parent_id: rec.parent_id,
            position: Point::new(rec.x, rec.y),
            color: rec.color.unwrap_or_else(|| rec.kind.base_color()),
        }
    }
}

/// Serialize a snapshot as pretty-printed JSON.
pub fn to_json(snapshot: &Snapshot) -> String {
    let file = MindMapFile {
        nodes: snapshot.nodes.iter().map(NodeRecord::from).collect(),
        links: snapshot
            .links
            .iter()
            .map(|l| LinkRecord {
                id: Some(l.id.to_string()),
                source: l.source(),
                target: l.target(),
            })
            .collect(),
    };
    // Only strings, numbers, and derived structs: serialization cannot fail.
    serde_json::to_string_pretty(&file).unwrap_or_default()
}

/// Parse a mind-map file.
///
/// Only the JSON shape is checked here. Links whose endpoints are missing
/// are kept and skipped later when the graph is built.
///
/// # Errors
/// `ImportError::Parse` when the text is not a valid mind-map document.
pub fn from_json(text: &str) -> Result<Snapshot, ImportError> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    let declared_ids = declared_link_ids(&raw);
    let file: MindMapFile = serde_json::from_value(raw)?;

    let links = file
        .links
        .into_iter()
        .enumerate()
        .map(|(i, rec)| {
            let link = Link::new(rec.source, rec.target);
            if let Some(Some(declared)) = declared_ids.get(i)
                && *declared != link.id.to_string()
            {
                log::warn!("link id `{declared}` re-derived as `{}`", link.id);
            }
            link
        })
        .collect();

    Ok(Snapshot {
        nodes: file.nodes.into_iter().map(Node::from).collect(),
        links,
    })
}

/// The `id` strings written in the file, by link position.
fn declared_link_ids(raw: &serde_json::Value) -> Vec<Option<String>> {
    raw.get("links")
        .and_then(|l| l.as_array())
        .map(|links| {
            links
                .iter()
                .map(|l| l.get("id").and_then(|v| v.as_str()).map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_legacy_browser_export() {
        let text = r##"{
            "nodes": [
                {"id": "17000001", "title": "Center", "content": "", "type": "center",
                 "parentId": null, "x": 400, "y": 300, "color": "#4a6bdf"},
                {"id": "17000002", "title": "Sub", "content": "notes", "type": "child",
                 "parentId": "17000001", "x": 200.5, "y": 200, "color": "rgba(105, 152, 255, 0.5)",
                 "body": null}
            ],
            "links": [{"id": "17000001-17000002", "source": "17000001", "target": "17000002",
                       "constraint": null}]
        }"##;
        let snap = from_json(text).unwrap();
        assert_eq!(snap.nodes.len(), 2);
        assert_eq!(snap.nodes[1].kind, NodeKind::Child);
        assert_eq!(snap.nodes[1].parent_id, Some(NodeId::intern("17000001")));
        assert_eq!(snap.nodes[1].position, Point::new(200.5, 200.0));
        assert_eq!(snap.nodes[1].content, "notes");
        assert_eq!(snap.nodes[1].color.to_hex(), "#6998FF80");
        assert_eq!(snap.links[0].id.to_string(), "17000001-17000002");
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let text = r#"{"nodes":[{"id":"solo","title":"Solo","kind":"center","x":0,"y":0}]}"#;
        let snap = from_json(text).unwrap();
        assert_eq!(snap.nodes[0].content, "");
        assert_eq!(snap.nodes[0].parent_id, None);
        assert_eq!(snap.nodes[0].color, NodeKind::Center.base_color());
        assert!(snap.links.is_empty());
    }

    #[test]
    fn malformed_json_is_an_import_error() {
        assert!(matches!(from_json("{ nodes: "), Err(ImportError::Parse(_))));
        assert!(matches!(
            from_json(r#"{"nodes":[{"id":"x"}]}"#),
            Err(ImportError::Parse(_))
        ));
        assert!(matches!(
            from_json(r#"{"nodes":[{"id":"x","title":"t","kind":"leaf","x":0,"y":0}]}"#),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn written_file_uses_camel_case_and_link_ids() {
        let parent = Node::new(NodeId::intern("fw_p"), "P", NodeKind::Center);
        let child = Node::new(NodeId::intern("fw_c"), "C", NodeKind::Child)
            .with_parent(parent.id)
            .at(Point::new(10.0, -5.0));
        let snap = Snapshot {
            links: vec![Link::new(parent.id, child.id)],
            nodes: vec![parent, child],
        };
        let text = to_json(&snap);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["nodes"][1]["parentId"], "fw_p");
        assert_eq!(value["nodes"][1]["kind"], "child");
        assert_eq!(value["nodes"][1]["x"], 10.0);
        assert_eq!(value["links"][0]["id"], "fw_p-fw_c");
        assert_eq!(value["nodes"][0]["color"], "#4A6BDF");
    }
}
