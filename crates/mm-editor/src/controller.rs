//! Interaction controller: the single owner of a mind map's state.
//!
//! `MindMap` translates user intent (clicks, drags, keys, editor commits)
//! into document mutations and history entries, and talks back to the host
//! through an outbox of `UiRequest`s. The host drives time: it calls
//! `frame` (or `advance_clock` + `tick_physics` + `render_frame`) once per
//! animation frame.

use crate::config::EditorConfig;
use crate::document::Document;
use crate::free_float::FreeFloat;
use crate::history::{EditValues, History, HistoryEntry};
use crate::input::InputEvent;
use crate::render::{Frame, RenderSink, build_frame};
use crate::selection::Selection;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use kurbo::{Point, Size, Vec2};
use mm_core::{DEFAULT_TITLE, ImportError, Node, NodeId, NodeKind, file};
use mm_physics::{RapierWorld, Simulator};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Something the host UI should do on the core's behalf.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UiRequest {
    /// Open the node editor panel filled with these values.
    ShowEditor {
        id: NodeId,
        title: String,
        content: String,
    },
    /// Move keyboard focus into the editor's title field.
    FocusTitle,
    HideEditor,
    /// Tell the user something went wrong.
    Alert { message: String },
    /// Offer `contents` as a file download.
    Download { file_name: String, contents: String },
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    id: NodeId,
    /// Pointer minus body position at grab time.
    offset: Vec2,
    /// Body position at grab time.
    from: Point,
    /// Body position after the last move.
    last: Point,
}

pub struct MindMap<S: Simulator = RapierWorld> {
    config: EditorConfig,
    doc: Document<S>,
    history: History,
    selection: Selection,
    drag: Option<DragState>,
    free_float: FreeFloat,
    rng: SmallRng,
    requests: Vec<UiRequest>,
}

impl MindMap<RapierWorld> {
    /// A map backed by a `rapier2d` world.
    pub fn with_rapier_world(config: EditorConfig, viewport: Size) -> Self {
        let sim = RapierWorld::from_config(&config.physics);
        Self::new(config, sim, viewport)
    }
}

impl<S: Simulator> MindMap<S> {
    /// Build the starting map: a central topic in the middle of `viewport`
    /// with two subtopics above it, recorded as the first history entry.
    pub fn new(config: EditorConfig, sim: S, viewport: Size) -> Self {
        let config = config.sanitized();
        let mut map = Self {
            doc: Document::new(sim, config.physics),
            history: History::new(config.history_capacity),
            selection: Selection::default(),
            drag: None,
            free_float: FreeFloat::new(config.free_float_interval_ms),
            rng: SmallRng::seed_from_u64(config.seed),
            requests: Vec::new(),
            config,
        };
        map.seed_initial(viewport);
        map
    }

    fn seed_initial(&mut self, viewport: Size) {
        let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        let root = self
            .doc
            .graph
            .create_node("Central Topic", NodeKind::Center, None)
            .at(center);
        let root_id = root.id;
        self.doc.insert_node(root);

        for (title, dx) in [("Subtopic 1", -200.0), ("Subtopic 2", 200.0)] {
            let child = self
                .doc
                .graph
                .create_node(title, NodeKind::Child, Some(root_id))
                .at(center + Vec2::new(dx, -100.0));
            let child_id = child.id;
            self.doc.insert_node(child);
            if let Err(err) = self.doc.insert_link(root_id, child_id) {
                log::warn!("initial map: {err}");
            }
        }

        let snapshot = self.doc.snapshot();
        self.history.record(HistoryEntry::Init {
            snapshot,
            replaced: None,
        });
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document<S> {
        &self.doc
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.doc.graph.find_node(id)
    }

    /// Live position of a node's body.
    pub fn position_of(&self, id: NodeId) -> Option<Point> {
        self.doc.position_of(id)
    }

    pub fn is_free_floating(&self) -> bool {
        self.free_float.is_enabled()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Hand pending UI requests to the host.
    pub fn drain_requests(&mut self) -> Vec<UiRequest> {
        std::mem::take(&mut self.requests)
    }

    // ─── Input dispatch ──────────────────────────────────────────────────

    /// Dispatch one input event. Returns whether it was consumed.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::NodeClick(id) => self.select(id),
            InputEvent::NodeDoubleClick(id) => self.begin_edit(id),
            InputEvent::NodeDragStart { id, pointer } => self.drag_start(id, pointer),
            InputEvent::NodeDragMove { pointer } => self.drag_move(pointer),
            InputEvent::NodeDragEnd => self.drag_end(),
            InputEvent::BackgroundClick => self.clear_selection(),
            InputEvent::Key {
                key,
                ctrl,
                shift,
                alt,
                meta,
            } => self.handle_key(&key, ctrl, shift, alt, meta),
        }
    }

    /// Run the shortcut bound to a key combo, if any.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return false;
        };
        match action {
            ShortcutAction::AddChild => self.add_child().is_some(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Deselect => self.clear_selection(),
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select a node (single click). Free float stops, and the editor
    /// panel is requested with the node's current text.
    pub fn select(&mut self, id: NodeId) -> bool {
        let Some(node) = self.doc.graph.find_node(id) else {
            return false;
        };
        let values = EditValues::of(node);
        // Re-clicking the node being edited keeps the text it had when
        // first selected.
        if !self.selection.is_selected(id) || self.selection.snapshot().is_none() {
            self.selection.set_snapshot(values.clone());
        }
        self.selection.select(id);

        if self.free_float.is_enabled() {
            self.damp_velocities();
            self.free_float.pause_for_selection();
        }

        self.requests.push(UiRequest::ShowEditor {
            id,
            title: values.title,
            content: values.content,
        });
        true
    }

    /// Select a node and enter edit mode (double click).
    pub fn begin_edit(&mut self, id: NodeId) -> bool {
        if !self.select(id) {
            return false;
        }
        self.selection.begin_edit(id);
        self.requests.push(UiRequest::FocusTitle);
        true
    }

    /// Drop selection and edit mode (background click). Free float
    /// resumes if selecting a node is what stopped it.
    pub fn clear_selection(&mut self) -> bool {
        if self.selection.selected().is_none() {
            return false;
        }
        self.selection.clear();
        self.requests.push(UiRequest::HideEditor);
        if self.free_float.is_paused_by_selection() {
            self.free_float.start();
        }
        true
    }

    // ─── Drag ────────────────────────────────────────────────────────────

    /// Grab the selected node. Its body goes static until release.
    pub fn drag_start(&mut self, id: NodeId, pointer: Point) -> bool {
        if !self.selection.is_selected(id) {
            return false;
        }
        let Some(position) = self.doc.position_of(id) else {
            return false;
        };
        self.cancel_drag();
        self.doc.physics.set_static(id, true);
        self.drag = Some(DragState {
            id,
            offset: pointer - position,
            from: position,
            last: position,
        });
        true
    }

    /// Follow the pointer; direct children move by the same delta.
    pub fn drag_move(&mut self, pointer: Point) -> bool {
        let Some(mut drag) = self.drag else {
            return false;
        };
        let target = pointer - drag.offset;
        let delta = target - drag.last;
        self.doc.move_node(drag.id, target);
        for child in self.doc.graph.children_of(drag.id) {
            if let Some(p) = self.doc.position_of(child) {
                self.doc.move_node(child, p + delta);
            }
        }
        drag.last = target;
        self.drag = Some(drag);
        true
    }

    /// Release the dragged node and record where it went.
    pub fn drag_end(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.doc.physics.set_static(drag.id, false);
        let to = self.doc.position_of(drag.id).unwrap_or(drag.last);
        self.history.record(HistoryEntry::Move {
            id: drag.id,
            to,
            from: Some(drag.from),
        });
        true
    }

    /// Release without recording anything.
    fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.doc.physics.set_static(drag.id, false);
        }
    }

    // ─── Structure edits ─────────────────────────────────────────────────

    /// Add a child below the selected node (Tab). Selection stays on the
    /// parent.
    pub fn add_child(&mut self) -> Option<NodeId> {
        let parent_id = self.selection.selected()?;
        let parent_position = self.doc.position_of(parent_id)?;

        let spread = self.config.child_offset_x.abs();
        let (lo, hi) = self.config.child_offset_y;
        let offset = Vec2::new(
            self.rng.gen_range(-spread..=spread),
            self.rng.gen_range(lo.min(hi)..=lo.max(hi)),
        );

        let node = self
            .doc
            .graph
            .create_node(DEFAULT_TITLE, NodeKind::Child, Some(parent_id))
            .at(parent_position + offset);
        let id = node.id;
        self.doc.insert_node(node.clone());
        let link = match self.doc.insert_link(parent_id, id) {
            Ok(link) => Some(link),
            Err(err) => {
                log::warn!("add child: {err}");
                None
            }
        };
        self.history.record(HistoryEntry::Add { node, link });
        Some(id)
    }

    /// Delete the selected node with its whole subtree (Delete key).
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.selected() else {
            return false;
        };
        if self.drag.is_some_and(|d| self.doc.graph.subtree(id).contains(&d.id)) {
            self.drag = None;
        }
        let (nodes, links) = self.doc.remove_subtree(id);
        if nodes.is_empty() {
            return false;
        }
        log::debug!("deleted {} nodes, {} links", nodes.len(), links.len());
        self.history.record(HistoryEntry::Delete { nodes, links });
        self.selection.clear();
        self.requests.push(UiRequest::HideEditor);
        true
    }

    // ─── Text edits ──────────────────────────────────────────────────────

    /// Live title update while typing; nothing is recorded. Returns the
    /// title as stored (cut to the configured length).
    pub fn set_title_input(&mut self, text: &str) -> Option<String> {
        let id = self.selection.selected()?;
        let title = truncate_chars(text, self.config.title_max_chars);
        let node = self.doc.graph.find_node_mut(id)?;
        node.title = title.clone();
        Some(title)
    }

    /// Commit the editor panel. Records an `Edit` only when the values
    /// differ from those at selection time. Always leaves edit mode.
    pub fn apply_edit(&mut self, title: &str, content: &str) -> bool {
        let Some(id) = self.selection.selected() else {
            return false;
        };
        self.selection.end_edit();
        let Some(node) = self.doc.graph.find_node(id) else {
            return false;
        };
        let old = self
            .selection
            .snapshot()
            .cloned()
            .unwrap_or_else(|| EditValues::of(node));
        let new = EditValues::new(truncate_chars(title, self.config.title_max_chars), content);

        self.doc.set_text(id, &new.title, &new.content);
        if old == new {
            return false;
        }
        self.selection.set_snapshot(new.clone());
        self.history.record(HistoryEntry::Edit { id, old, new });
        true
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.cancel_drag();
        match self.history.undo(&mut self.doc) {
            Ok(entry) => log::debug!("undid {}", entry.label()),
            Err(err) => {
                log::debug!("undo ignored: {err}");
                return false;
            }
        }
        self.after_history_step();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_drag();
        match self.history.redo(&mut self.doc) {
            Ok(entry) => log::debug!("redid {}", entry.label()),
            Err(err) => {
                log::debug!("redo ignored: {err}");
                return false;
            }
        }
        self.after_history_step();
        true
    }

    fn after_history_step(&mut self) {
        self.selection.clear();
        self.requests.push(UiRequest::HideEditor);
    }

    // ─── Free float ──────────────────────────────────────────────────────

    /// Switch free float; returns the new state. Switching on clears the
    /// selection, switching off halves every body's velocity once.
    pub fn toggle_free_float(&mut self) -> bool {
        if self.free_float.is_enabled() {
            self.free_float.stop();
            self.damp_velocities();
            self.free_float.forget_pause();
        } else {
            self.cancel_drag();
            if self.selection.selected().is_some() {
                self.selection.clear();
                self.requests.push(UiRequest::HideEditor);
            }
            self.free_float.start();
        }
        self.free_float.is_enabled()
    }

    fn damp_velocities(&mut self) {
        let factor = self.config.free_float_damping;
        for id in self.doc.graph.node_ids() {
            self.doc.physics.scale_velocity(id, factor);
        }
    }

    /// Nudge every body with a small random force.
    fn pulse(&mut self) {
        let f = self.config.free_float_force.abs();
        for id in self.doc.graph.node_ids() {
            let force = Vec2::new(self.rng.gen_range(-f..=f), self.rng.gen_range(-f..=f));
            self.doc.physics.apply_force(id, force);
        }
    }

    // ─── File ────────────────────────────────────────────────────────────

    /// Replace the map with the contents of a mind-map file.
    ///
    /// # Errors
    /// `ImportError::Parse` when `text` is not a valid file; the map is left
    /// untouched and an `Alert` is requested.
    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        let snapshot = match file::from_json(text) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("import failed: {err}");
                self.requests.push(UiRequest::Alert {
                    message: format!("Could not import the file: {err}"),
                });
                return Err(err);
            }
        };
        self.cancel_drag();
        let replaced = self.doc.snapshot();
        self.doc.load(&snapshot);
        log::info!(
            "imported {} nodes and {} links",
            self.doc.graph.len(),
            self.doc.graph.link_count()
        );
        if self.selection.selected().is_some() {
            self.selection.clear();
            self.requests.push(UiRequest::HideEditor);
        }
        self.history.record(HistoryEntry::Init {
            snapshot,
            replaced: Some(replaced),
        });
        Ok(())
    }

    /// Serialize the current map and request a download of it.
    pub fn export_json(&mut self) -> String {
        let snapshot = self.doc.snapshot();
        let contents = file::to_json(&snapshot);
        log::info!(
            "exporting {} nodes and {} links",
            snapshot.nodes.len(),
            snapshot.links.len()
        );
        self.requests.push(UiRequest::Download {
            file_name: file::EXPORT_FILE_NAME.to_string(),
            contents: contents.clone(),
        });
        contents
    }

    // ─── Frame loop ──────────────────────────────────────────────────────

    /// Advance the free-float clock, applying a pulse when one is due.
    pub fn advance_clock(&mut self, elapsed_ms: f64) {
        if self.free_float.advance(elapsed_ms) {
            self.pulse();
        }
    }

    pub fn tick_physics(&mut self) {
        self.doc.physics.tick();
    }

    /// Copy body positions into the store and push a full frame.
    pub fn render_frame(&mut self, sink: &mut impl RenderSink) {
        let frame = self.current_frame();
        sink.render(&frame);
    }

    /// Positions synced, frame built, nothing pushed.
    pub fn current_frame(&mut self) -> Frame {
        self.doc.sync_positions();
        let frame = build_frame(&self.doc.graph, &self.selection);
        log::trace!("frame: {} nodes, {} links", frame.nodes.len(), frame.links.len());
        frame
    }

    /// One animation frame: clock, physics step, render.
    pub fn frame(&mut self, elapsed_ms: f64, sink: &mut impl RenderSink) {
        self.advance_clock(elapsed_ms);
        self.tick_physics();
        self.render_frame(sink);
    }
}

/// First `max` characters of `text`.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
