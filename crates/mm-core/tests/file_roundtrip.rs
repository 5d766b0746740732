//! Integration tests: store → snapshot → JSON → snapshot → store round-trip.
//!
//! Verifies that no data is lost when writing a mind map to `mindmap.json`
//! and reading it back.

use mm_core::file::{from_json, to_json};
use mm_core::*;
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn build_store() -> GraphStore {
    let mut store = GraphStore::new();
    let center = store
        .create_node("Central Topic", NodeKind::Center, None)
        .at(Point::new(400.0, 300.0));
    let center_id = center.id;
    store.add_node(center);

    let mut previous = center_id;
    for (i, title) in ["Ideas", "Tasks", "Notes — 日本語"].iter().enumerate() {
        let mut node = store
            .create_node(title, NodeKind::Child, Some(previous))
            .at(Point::new(100.0 * i as f64, -37.25 * i as f64));
        node.content = format!("line one\nline {i}");
        let id = node.id;
        store.add_node(node);
        store.create_link(previous, id).unwrap();
        previous = id;
    }
    store
}

fn assert_snapshots_equivalent(a: &Snapshot, b: &Snapshot) {
    assert_eq!(a.nodes.len(), b.nodes.len(), "node count mismatch");
    for node in &a.nodes {
        let other = b
            .node(node.id)
            .unwrap_or_else(|| panic!("node {:?} lost after round-trip", node.id));
        assert_eq!(node.title, other.title);
        assert_eq!(node.content, other.content);
        assert_eq!(node.kind, other.kind);
        assert_eq!(node.parent_id, other.parent_id);
        assert_eq!(node.position, other.position);
        assert_eq!(node.color, other.color, "color drifted");
    }
    let mut la: Vec<String> = a.links.iter().map(|l| l.id.to_string()).collect();
    let mut lb: Vec<String> = b.links.iter().map(|l| l.id.to_string()).collect();
    la.sort();
    lb.sort();
    assert_eq!(la, lb);
}

// ─── Round trip ──────────────────────────────────────────────────────────

#[test]
fn snapshot_survives_json() {
    let original = build_store().snapshot();
    let text = to_json(&original);
    let parsed = from_json(&text).expect("re-parse failed");
    assert_snapshots_equivalent(&original, &parsed);
}

#[test]
fn json_is_stable_after_second_pass() {
    let text1 = to_json(&build_store().snapshot());
    let text2 = to_json(&from_json(&text1).unwrap());
    assert_eq!(text1, text2);
}

#[test]
fn rebuilt_store_has_every_link() {
    let original = build_store().snapshot();
    let parsed = from_json(&to_json(&original)).unwrap();

    let mut rebuilt = GraphStore::new();
    for node in parsed.nodes {
        rebuilt.add_node(node);
    }
    for link in &parsed.links {
        rebuilt.create_link(link.source(), link.target()).unwrap();
    }
    assert_eq!(rebuilt.len(), 4);
    assert_eq!(rebuilt.link_count(), 3);
}

#[test]
fn dangling_link_in_file_is_rejected_by_store() {
    let text = r#"{
        "nodes": [{"id": "dl_a", "title": "A", "kind": "center", "x": 0, "y": 0}],
        "links": [{"id": "dl_a-dl_b", "source": "dl_a", "target": "dl_b"}]
    }"#;
    let snap = from_json(text).unwrap();
    let mut store = GraphStore::new();
    for node in snap.nodes {
        store.add_node(node);
    }
    let err = store
        .create_link(snap.links[0].source(), snap.links[0].target())
        .unwrap_err();
    assert!(matches!(err, LinkError::MissingEndpoint { .. }));
    assert_eq!(store.link_count(), 0);
}
