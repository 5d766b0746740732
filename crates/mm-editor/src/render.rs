//! Render sync: turns the graph store into a flat `Frame` for the host.
//!
//! The renderer is a collaborator behind `RenderSink`. Every frame is a
//! full picture of the map (nodes and links with resolved endpoint
//! positions), so a sink never has to diff or track lifetimes itself.

use crate::selection::Selection;
use kurbo::Point;
use mm_core::{Color, GraphStore, LinkId, NodeId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: NodeId,
    pub position: Point,
    pub title: String,
    pub color: Color,
    pub selected: bool,
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    pub id: LinkId,
    pub source_id: NodeId,
    pub target_id: NodeId,
    pub source_position: Point,
    pub target_position: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub nodes: Vec<NodeView>,
    pub links: Vec<LinkView>,
}

impl Frame {
    pub fn node(&self, id: NodeId) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn link(&self, id: LinkId) -> Option<&LinkView> {
        self.links.iter().find(|l| l.id == id)
    }

    /// JSON form handed to browser hosts.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Receives one `Frame` per render pass.
pub trait RenderSink {
    fn render(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> RenderSink for F {
    fn render(&mut self, frame: &Frame) {
        self(frame)
    }
}

/// Build a frame from the store's current positions.
/// Links whose endpoints are missing are left out.
pub fn build_frame(graph: &GraphStore, selection: &Selection) -> Frame {
    let nodes = graph
        .nodes()
        .map(|node| NodeView {
            id: node.id,
            position: node.position,
            title: node.title.clone(),
            color: node.color,
            selected: selection.is_selected(node.id),
            editing: selection.is_editing(node.id),
        })
        .collect();

    let links = graph
        .links()
        .filter_map(|link| {
            let source = graph.find_node(link.source())?;
            let target = graph.find_node(link.target())?;
            Some(LinkView {
                id: link.id,
                source_id: source.id,
                target_id: target.id,
                source_position: source.position,
                target_position: target.position,
            })
        })
        .collect();

    Frame { nodes, links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::{Node, NodeKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn frame_mirrors_store_and_selection() {
        let mut graph = GraphStore::new();
        let c = NodeId::intern("rf_c");
        let a = NodeId::intern("rf_a");
        graph.add_node(Node::new(c, "Center", NodeKind::Center).at(Point::new(10.0, 20.0)));
        graph.add_node(
            Node::new(a, "Child", NodeKind::Child)
                .with_parent(c)
                .at(Point::new(30.0, 40.0)),
        );
        let link = graph.create_link(c, a).unwrap();

        let mut selection = Selection::default();
        selection.select(a);

        let frame = build_frame(&graph, &selection);
        assert_eq!(frame.nodes.len(), 2);
        assert!(frame.node(a).unwrap().selected);
        assert!(!frame.node(c).unwrap().selected);
        assert!(!frame.node(a).unwrap().editing);

        let view = frame.link(link.id).unwrap();
        assert_eq!(view.source_position, Point::new(10.0, 20.0));
        assert_eq!(view.target_position, Point::new(30.0, 40.0));
    }

    #[test]
    fn closures_are_sinks() {
        let mut frames = Vec::new();
        let mut sink = |frame: &Frame| frames.push(frame.nodes.len());
        sink.render(&Frame::default());
        assert_eq!(frames, vec![0]);
    }

    #[test]
    fn frame_json_uses_camel_case() {
        let graph = GraphStore::new();
        let json = build_frame(&graph, &Selection::default()).to_json();
        assert_eq!(json, r#"{"nodes":[],"links":[]}"#);
    }
}
