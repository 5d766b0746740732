//! Mind-map editor engine: document, history, interaction, render sync.

pub mod config;
pub mod controller;
pub mod document;
pub mod free_float;
pub mod history;
pub mod input;
pub mod render;
pub mod selection;
pub mod shortcuts;

pub use config::EditorConfig;
pub use controller::{MindMap, UiRequest};
pub use document::Document;
pub use history::{EditValues, History, HistoryEntry};
pub use input::InputEvent;
pub use render::{Frame, LinkView, NodeView, RenderSink, build_frame};
pub use selection::Selection;
pub use shortcuts::{ShortcutAction, ShortcutMap};
