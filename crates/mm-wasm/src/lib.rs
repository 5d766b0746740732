//! WASM bridge for MM: exposes the mind-map controller to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the DOM:
//! it forwards pointer/keyboard events here, calls `frame` from
//! `requestAnimationFrame`, draws the returned frame JSON, and acts on the
//! UI requests returned by `drain_requests`.

use mm_core::{NodeId, Point, Size};
use mm_editor::{EditorConfig, MindMap};
use wasm_bindgen::prelude::*;

/// The main WASM-facing mind-map controller.
#[wasm_bindgen]
pub struct MindMapCanvas {
    map: MindMap,
}

#[wasm_bindgen]
impl MindMapCanvas {
    /// Create a mind map centered in a `width` × `height` viewport.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        let config = EditorConfig {
            seed: random_seed(),
            ..EditorConfig::default()
        };
        Self::build(config, width, height)
    }

    /// Like `new`, with a (possibly partial) JSON `EditorConfig`.
    /// An unreadable config falls back to the defaults.
    pub fn with_config(width: f64, height: f64, config_json: &str) -> Self {
        console_error_panic_hook_setup();
        let config = EditorConfig::from_json(config_json).unwrap_or_else(|e| {
            log::warn!("ignoring editor config: {e}");
            EditorConfig::default()
        });
        Self::build(config, width, height)
    }

    // ─── Pointer & keyboard ──────────────────────────────────────────────

    pub fn node_click(&mut self, id: &str) -> bool {
        self.map.select(NodeId::intern(id))
    }

    pub fn node_double_click(&mut self, id: &str) -> bool {
        self.map.begin_edit(NodeId::intern(id))
    }

    /// Pointer pressed on a node, canvas coordinates.
    pub fn node_drag_start(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.map.drag_start(NodeId::intern(id), Point::new(x, y))
    }

    pub fn node_drag_move(&mut self, x: f64, y: f64) -> bool {
        self.map.drag_move(Point::new(x, y))
    }

    pub fn node_drag_end(&mut self) -> bool {
        self.map.drag_end()
    }

    pub fn background_click(&mut self) -> bool {
        self.map.clear_selection()
    }

    /// Handle a keydown. Returns `true` when the key was consumed and the
    /// host should `preventDefault()`.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        self.map.handle_key(key, ctrl, shift, alt, meta)
    }

    // ─── Editor panel ────────────────────────────────────────────────────

    /// Live title input; returns the title as stored, or `undefined` when
    /// nothing is selected.
    pub fn set_title_input(&mut self, text: &str) -> Option<String> {
        self.map.set_title_input(text)
    }

    pub fn apply_edit(&mut self, title: &str, content: &str) -> bool {
        self.map.apply_edit(title, content)
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    /// Returns the new free-float state.
    pub fn toggle_free_float(&mut self) -> bool {
        self.map.toggle_free_float()
    }

    pub fn is_free_floating(&self) -> bool {
        self.map.is_free_floating()
    }

    pub fn undo(&mut self) -> bool {
        self.map.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.map.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.map.history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.map.history().can_redo()
    }

    /// Current map as file JSON. A download request is queued as well.
    pub fn export_json(&mut self) -> String {
        self.map.export_json()
    }

    /// Replace the map with a file's contents. On failure the map is kept
    /// and an alert request is queued.
    pub fn import_json(&mut self, text: &str) -> bool {
        self.map.import_json(text).is_ok()
    }

    // ─── Frame loop ──────────────────────────────────────────────────────

    /// Advance by `elapsed_ms`, step physics, and return the frame as JSON:
    /// `{"nodes":[...],"links":[...]}`.
    pub fn frame(&mut self, elapsed_ms: f64) -> String {
        let mut json = String::new();
        self.map
            .frame(elapsed_ms, &mut |frame: &mm_editor::Frame| json = frame.to_json());
        json
    }

    /// Pending UI requests as a JSON array of `{"type": ...}` objects.
    pub fn drain_requests(&mut self) -> String {
        let requests = self.map.drain_requests();
        serde_json::to_string(&requests).unwrap_or_else(|_| "[]".to_string())
    }
}

impl MindMapCanvas {
    fn build(config: EditorConfig, width: f64, height: f64) -> Self {
        Self {
            map: MindMap::with_rapier_world(config, Size::new(width, height)),
        }
    }
}

/// Check a mind-map file without loading it.
/// Returns `{"ok":true,"nodes":N,"links":M}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_file(text: &str) -> String {
    let result = match mm_core::file::from_json(text) {
        Ok(snapshot) => serde_json::json!({
            "ok": true,
            "nodes": snapshot.nodes.len(),
            "links": snapshot.links.len(),
        }),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
    };
    result.to_string()
}

fn random_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * u64::MAX as f64) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        EditorConfig::default().seed
    }
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("MM WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn center_id(canvas: &mut MindMapCanvas) -> String {
        let frame: serde_json::Value = serde_json::from_str(&canvas.frame(0.0)).unwrap();
        frame["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["title"] == "Central Topic")
            .and_then(|n| n["id"].as_str())
            .unwrap()
            .to_string()
    }

    #[test]
    fn frame_json_lists_initial_map() {
        let mut canvas = MindMapCanvas::new(800.0, 600.0);
        let frame: serde_json::Value = serde_json::from_str(&canvas.frame(16.0)).unwrap();
        assert_eq!(frame["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(frame["links"].as_array().unwrap().len(), 2);
        let link = &frame["links"][0];
        assert!(link["sourceId"].is_string());
        assert!(link["targetPosition"]["x"].is_number());
    }

    #[test]
    fn requests_are_tagged_json() {
        let mut canvas = MindMapCanvas::new(800.0, 600.0);
        let id = center_id(&mut canvas);
        assert!(canvas.node_double_click(&id));
        let requests: serde_json::Value = serde_json::from_str(&canvas.drain_requests()).unwrap();
        assert_eq!(requests[0]["type"], "showEditor");
        assert_eq!(requests[0]["title"], "Central Topic");
        assert_eq!(requests[1]["type"], "focusTitle");
        assert_eq!(canvas.drain_requests(), "[]");
    }

    #[test]
    fn export_queues_download_and_import_rejects_garbage() {
        let mut canvas = MindMapCanvas::new(800.0, 600.0);
        let json = canvas.export_json();
        let requests: serde_json::Value = serde_json::from_str(&canvas.drain_requests()).unwrap();
        assert_eq!(requests[0]["type"], "download");
        assert_eq!(requests[0]["fileName"], "mindmap.json");

        assert!(canvas.import_json(&json));
        assert!(!canvas.import_json("not json"));
        let requests: serde_json::Value = serde_json::from_str(&canvas.drain_requests()).unwrap();
        assert_eq!(requests[0]["type"], "alert");
    }

    #[test]
    fn partial_config_is_accepted() {
        let mut canvas =
            MindMapCanvas::with_config(800.0, 600.0, r#"{"history_capacity": 2}"#);
        let id = center_id(&mut canvas);
        canvas.node_click(&id);
        canvas.apply_edit("One", "");
        canvas.node_click(&id);
        canvas.apply_edit("Two", "");
        assert!(canvas.undo());
        assert!(canvas.undo());
        assert!(!canvas.undo(), "only two entries fit");
    }

    #[test]
    fn validate_reports_counts_or_error() {
        let ok = validate_file(r#"{"nodes": [], "links": []}"#);
        assert_eq!(ok, r#"{"links":0,"nodes":0,"ok":true}"#);
        let bad: serde_json::Value = serde_json::from_str(&validate_file("[")).unwrap();
        assert_eq!(bad["ok"], false);
    }
}
