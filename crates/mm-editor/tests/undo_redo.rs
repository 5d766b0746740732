//! Integration tests: bounded undo/redo history (mm-editor).
//!
//! Drives `MindMap` through its public API and checks that history entries
//! are evicted, reverted and replayed in the right order.

use mm_core::{NodeId, NodeKind, Point, Size};
use mm_editor::{EditorConfig, HistoryEntry, InputEvent, MindMap};
use pretty_assertions::assert_eq;

fn make_map() -> MindMap {
    MindMap::with_rapier_world(EditorConfig::default(), Size::new(800.0, 600.0))
}

fn find(map: &MindMap, title: &str) -> NodeId {
    map.document()
        .graph
        .nodes()
        .find(|n| n.title == title)
        .map(|n| n.id)
        .unwrap_or_else(|| panic!("no node titled {title:?}"))
}

fn center(map: &MindMap) -> NodeId {
    map.document()
        .graph
        .nodes()
        .find(|n| n.kind == NodeKind::Center)
        .map(|n| n.id)
        .unwrap()
}

fn title_of(map: &MindMap, id: NodeId) -> String {
    map.node(id).unwrap().title.clone()
}

// ─── Capacity ────────────────────────────────────────────────────────────

#[test]
fn fifteen_actions_keep_the_newest_ten() {
    let mut map = make_map();
    let root = center(&map);
    map.select(root);
    // The initial map is entry 1; fourteen edits make fifteen.
    for n in 1..=14 {
        assert!(map.apply_edit(&format!("T{n}"), ""));
    }
    assert_eq!(map.history().len(), 10);
    assert_eq!(map.history().cursor(), Some(9));
    assert!(
        !matches!(map.history().entries()[0], HistoryEntry::Init { .. }),
        "the initial entry should have been evicted"
    );

    let mut seen = Vec::new();
    while map.undo() {
        seen.push(title_of(&map, root));
    }
    let expected: Vec<String> = (4..=13).rev().map(|n| format!("T{n}")).collect();
    assert_eq!(seen, expected);
    assert!(!map.history().can_undo());
}

#[test]
fn capacity_can_be_lowered() {
    let config = EditorConfig {
        history_capacity: 3,
        ..EditorConfig::default()
    };
    let mut map = MindMap::with_rapier_world(config, Size::new(800.0, 600.0));
    let root = center(&map);
    map.select(root);
    for n in 0..5 {
        map.apply_edit(&format!("E{n}"), "");
    }
    assert_eq!(map.history().len(), 3);
    assert_eq!(map.history().capacity(), 3);
}

#[test]
fn capacity_above_ten_is_capped() {
    let config = EditorConfig {
        history_capacity: 50,
        ..EditorConfig::default()
    };
    let mut map = MindMap::with_rapier_world(config, Size::new(800.0, 600.0));
    assert_eq!(map.config().history_capacity, 10);
    let root = center(&map);
    map.select(root);
    for n in 0..20 {
        map.apply_edit(&format!("E{n}"), "");
    }
    assert_eq!(map.history().len(), 10);
}

// ─── Redo ────────────────────────────────────────────────────────────────

#[test]
fn undo_then_record_discards_redo() {
    let mut map = make_map();
    let root = center(&map);
    map.select(root);
    map.apply_edit("First", "");
    map.select(root);
    map.apply_edit("Second", "");

    assert!(map.undo());
    assert_eq!(title_of(&map, root), "First");
    assert!(map.history().can_redo());

    map.select(root);
    map.apply_edit("Third", "");
    assert!(!map.history().can_redo());
    assert!(!map.redo(), "redo should be a no-op");
    assert_eq!(title_of(&map, root), "Third");
}

#[test]
fn redo_replays_in_order() {
    let mut map = make_map();
    let root = center(&map);
    map.select(root);
    let child = map.add_child().unwrap();
    map.select(root);
    map.apply_edit("Renamed", "body");

    assert!(map.undo());
    assert!(map.undo());
    assert!(!map.document().graph.contains(child));
    assert_eq!(title_of(&map, root), "Central Topic");

    assert!(map.redo());
    assert!(map.document().graph.contains(child));
    assert!(map.redo());
    assert_eq!(title_of(&map, root), "Renamed");
    assert_eq!(map.node(root).unwrap().content, "body");
    assert!(!map.redo());
    assert!(map.document().is_consistent());
}

#[test]
fn undo_past_start_is_silent() {
    let mut map = make_map();
    assert!(map.undo(), "initial entry can be undone");
    assert!(map.document().graph.is_empty());
    assert!(!map.undo());
    map.drain_requests();
    assert!(!map.handle(InputEvent::ctrl_key("z")));
    assert!(map.drain_requests().is_empty());

    assert!(map.redo());
    assert_eq!(map.document().graph.len(), 3);
    assert!(map.document().is_consistent());
}

#[test]
fn undo_clears_selection_and_hides_editor() {
    let mut map = make_map();
    let root = center(&map);
    map.handle(InputEvent::NodeDoubleClick(root));
    map.apply_edit("Changed", "");
    map.drain_requests();

    assert!(map.handle(InputEvent::ctrl_key("z")));
    assert_eq!(map.selection().selected(), None);
    assert_eq!(map.drain_requests(), vec![mm_editor::UiRequest::HideEditor]);
}

// ─── Move ────────────────────────────────────────────────────────────────

#[test]
fn move_undo_restores_pre_drag_position() {
    let mut map = make_map();
    let sub = find(&map, "Subtopic 1");
    let start = map.position_of(sub).unwrap();
    assert_eq!(start, Point::new(200.0, 200.0));

    map.select(sub);
    assert!(map.drag_start(sub, Point::new(205.0, 210.0)));
    map.drag_move(Point::new(255.0, 260.0));
    map.drag_move(Point::new(305.0, 310.0));
    assert!(map.drag_end());
    assert_eq!(map.position_of(sub), Some(Point::new(300.0, 300.0)));

    match map.history().entries().last() {
        Some(HistoryEntry::Move { id, to, from }) => {
            assert_eq!(*id, sub);
            assert_eq!(*to, Point::new(300.0, 300.0));
            assert_eq!(*from, Some(start));
        }
        other => panic!("expected a move entry, got {other:?}"),
    }

    assert!(map.undo());
    assert_eq!(map.position_of(sub), Some(start));
    assert!(map.redo());
    assert_eq!(map.position_of(sub), Some(Point::new(300.0, 300.0)));
}

#[test]
fn release_without_motion_still_records_move() {
    let mut map = make_map();
    let c = center(&map);
    let start = map.position_of(c).unwrap();
    map.select(c);
    assert!(map.drag_start(c, start));
    assert!(map.drag_end());
    assert_eq!(map.history().len(), 2);
    match map.history().entries().last() {
        Some(HistoryEntry::Move { id, to, from }) => {
            assert_eq!(*id, c);
            assert_eq!(*to, start);
            assert_eq!(*from, Some(start));
        }
        other => panic!("expected a move entry, got {other:?}"),
    }
    assert!(map.undo());
    assert_eq!(map.position_of(c), Some(start));
}
