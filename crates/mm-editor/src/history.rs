//! Bounded undo/redo history.
//!
//! A flat log of `HistoryEntry` values plus a cursor pointing at the most
//! recently applied entry (`None` = nothing applied). Recording after an
//! undo discards the redo tail; when the log grows past its capacity the
//! oldest entry is evicted.
//!
//! Each entry carries exactly the data needed to apply it in either
//! direction, so undo and redo are plain matches over the enum.

use crate::document::Document;
use kurbo::Point;
use mm_core::{HistoryBoundsError, Link, Node, NodeId, Snapshot};
use mm_physics::Simulator;

/// Title and content of a node at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditValues {
    pub title: String,
    pub content: String,
}

impl EditValues {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn of(node: &Node) -> Self {
        Self::new(node.title.clone(), node.content.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// The whole map was (re)built: initial state or an import.
    /// `replaced` holds what an import overwrote.
    Init {
        snapshot: Snapshot,
        replaced: Option<Snapshot>,
    },
    /// A child node was created, with the link to its parent.
    Add { node: Node, link: Option<Link> },
    /// A subtree was deleted; nodes are parents-first.
    Delete { nodes: Vec<Node>, links: Vec<Link> },
    /// Title/content were committed from the editor.
    Edit {
        id: NodeId,
        old: EditValues,
        new: EditValues,
    },
    /// A node was dragged to `to`, starting from `from`.
    Move {
        id: NodeId,
        to: Point,
        from: Option<Point>,
    },
}

impl HistoryEntry {
    /// Short human-readable description, for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Init { replaced: None, .. } => "init",
            Self::Init { .. } => "import",
            Self::Add { .. } => "add node",
            Self::Delete { .. } => "delete nodes",
            Self::Edit { .. } => "edit node",
            Self::Move { .. } => "move node",
        }
    }

    /// Re-apply this entry.
    fn apply<S: Simulator>(&self, doc: &mut Document<S>) {
        match self {
            Self::Init { snapshot, .. } => doc.load(snapshot),
            Self::Add { node, link } => {
                doc.insert_node(node.clone());
                if let Some(link) = link
                    && let Err(err) = doc.insert_link(link.source(), link.target())
                {
                    log::warn!("redo add: {err}");
                }
            }
            Self::Delete { nodes, .. } => {
                for node in nodes {
                    doc.remove_node(node.id);
                }
            }
            Self::Edit { id, new, .. } => {
                doc.set_text(*id, &new.title, &new.content);
            }
            Self::Move { id, to, .. } => {
                doc.move_node(*id, *to);
            }
        }
    }

    /// Reverse this entry. `previous` is the entry just before it in the
    /// log, consulted when reverting an `Init` that has no `replaced` state.
    fn revert<S: Simulator>(&self, doc: &mut Document<S>, previous: Option<&HistoryEntry>) {
        match self {
            Self::Init { replaced, .. } => {
                doc.clear();
                match (replaced, previous) {
                    (Some(old), _) => doc.load(old),
                    (None, Some(Self::Init { snapshot, .. })) => doc.load(snapshot),
                    (None, _) => {}
                }
            }
            Self::Add { node, .. } => {
                doc.remove_node(node.id);
            }
            Self::Delete { nodes, links } => doc.restore(nodes, links),
            Self::Edit { id, old, .. } => {
                doc.set_text(*id, &old.title, &old.content);
            }
            Self::Move { id, from, .. } => {
                if let Some(from) = from {
                    doc.move_node(*id, *from);
                }
            }
        }
    }
}

/// Most undo steps a history keeps.
pub const MAX_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Index of the last applied entry.
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_CAPACITY)
    }
}

impl History {
    /// `capacity` is clamped to `1..=MAX_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_CAPACITY);
        Self {
            entries: Vec::with_capacity(capacity),
            cursor: None,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The entry undo would revert next.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        next < self.entries.len()
    }

    /// Append an already-applied entry, dropping any redo tail.
    pub fn record(&mut self, entry: HistoryEntry) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.entries.len() {
            log::debug!("history: dropping {} redo entries", self.entries.len() - keep);
            self.entries.truncate(keep);
        }
        log::debug!("history: record {}", entry.label());
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            let evicted = self.entries.remove(0);
            log::debug!("history: evicted {}", evicted.label());
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Revert the entry at the cursor and step back.
    ///
    /// # Errors
    /// `HistoryBoundsError::NothingToUndo` when nothing is applied.
    pub fn undo<S: Simulator>(
        &mut self,
        doc: &mut Document<S>,
    ) -> Result<&HistoryEntry, HistoryBoundsError> {
        let cursor = self.cursor.ok_or(HistoryBoundsError::NothingToUndo)?;
        let previous = cursor.checked_sub(1).and_then(|p| self.entries.get(p));
        let entry = self
            .entries
            .get(cursor)
            .ok_or(HistoryBoundsError::NothingToUndo)?;
        entry.revert(doc, previous);
        log::debug!("history: undo {} (cursor {cursor})", entry.label());
        self.cursor = cursor.checked_sub(1);
        Ok(entry)
    }

    /// Step forward and re-apply the entry there.
    ///
    /// # Errors
    /// `HistoryBoundsError::NothingToRedo` when the cursor is at the end.
    pub fn redo<S: Simulator>(
        &mut self,
        doc: &mut Document<S>,
    ) -> Result<&HistoryEntry, HistoryBoundsError> {
        let next = self.cursor.map_or(0, |c| c + 1);
        let entry = self
            .entries
            .get(next)
            .ok_or(HistoryBoundsError::NothingToRedo)?;
        entry.apply(doc);
        log::debug!("history: redo {} (cursor {next})", entry.label());
        self.cursor = Some(next);
        Ok(entry)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
