//! Input abstraction layer.
//!
//! The host turns DOM pointer and keyboard events into `InputEvent`s. Hit
//! testing happens on the host side (it owns the rendered elements), so
//! node events already carry the node id.

use kurbo::Point;
use mm_core::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Single click on a node.
    NodeClick(NodeId),

    /// Double click on a node: select and start editing.
    NodeDoubleClick(NodeId),

    /// Pointer pressed on a node, in canvas coordinates.
    NodeDragStart { id: NodeId, pointer: Point },

    /// Pointer moved while a drag is active.
    NodeDragMove { pointer: Point },

    /// Pointer released.
    NodeDragEnd,

    /// Click on empty canvas.
    BackgroundClick,

    /// Keyboard event, `key` being `KeyboardEvent.key`.
    Key {
        key: String,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    },
}

impl InputEvent {
    /// A key press without modifiers.
    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        }
    }

    /// A key press with Ctrl (or ⌘ on macOS hosts).
    pub fn ctrl_key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            ctrl: true,
            shift: false,
            alt: false,
            meta: false,
        }
    }
}
