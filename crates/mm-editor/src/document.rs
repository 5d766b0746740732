//! Document: the graph store and its physics bodies, kept in lockstep.
//!
//! Every structural mutation of a mind map goes through here so that a node
//! never exists without its body, a link never exists without its spring,
//! and neither outlives its counterpart:
//!
//! - **Insert**: the body is created before the node is registered; the
//!   spring after the link.
//! - **Remove**: incident links (and springs) go first, then the node and
//!   its body. A link can therefore never dangle.
//!
//! Positions flow one way: physics → store, in `sync_positions`, which the
//! render loop calls once per frame. Explicit moves write both sides.

use kurbo::Point;
use mm_core::{GraphStore, Link, LinkError, LinkId, Node, NodeId, Snapshot};
use mm_physics::{PhysicsAdapter, PhysicsConfig, Simulator};

pub struct Document<S: Simulator> {
    /// Logical graph: nodes, links, titles, positions as of the last sync.
    pub graph: GraphStore,

    /// Bodies and springs keyed by the same ids as `graph`.
    pub physics: PhysicsAdapter<S>,
}

impl<S: Simulator> Document<S> {
    pub fn new(sim: S, config: PhysicsConfig) -> Self {
        Self {
            graph: GraphStore::new(),
            physics: PhysicsAdapter::new(sim, config),
        }
    }

    /// Register `node` together with a fresh body at its position.
    pub fn insert_node(&mut self, node: Node) {
        self.physics.create_body(node.id, node.position);
        self.graph.add_node(node);
    }

    /// Link two existing nodes and attach a spring between their bodies.
    ///
    /// # Errors
    /// `LinkError::MissingEndpoint` when either node is absent; nothing is
    /// created in that case.
    pub fn insert_link(&mut self, source: NodeId, target: NodeId) -> Result<Link, LinkError> {
        let link = self.graph.create_link(source, target)?;
        if !self.physics.has_constraint(link.id) {
            self.physics.create_constraint(link.id);
        }
        Ok(link)
    }

    pub fn remove_link(&mut self, id: LinkId) -> Option<Link> {
        self.physics.destroy_constraint(id);
        self.graph.remove_link(id)
    }

    /// Remove one node, its body, and every link touching it.
    /// Returns the node (position synced from physics) and the removed links.
    pub fn remove_node(&mut self, id: NodeId) -> Option<(Node, Vec<Link>)> {
        self.sync_position(id);
        let links = self.graph.links_touching(&[id]);
        for link in &links {
            self.remove_link(link.id);
        }
        self.physics.destroy_body(id);
        let node = self.graph.remove_node(id)?;
        Some((node, links))
    }

    /// Remove `id` and all of its descendants plus every incident link.
    ///
    /// Returns what was removed, nodes in pre-order (parents before
    /// children) and positions as of this call, ready to be restored.
    pub fn remove_subtree(&mut self, id: NodeId) -> (Vec<Node>, Vec<Link>) {
        let ids = self.graph.subtree(id);
        for &node_id in &ids {
            self.sync_position(node_id);
        }
        let links = self.graph.links_touching(&ids);
        for link in &links {
            self.remove_link(link.id);
        }
        let mut nodes = Vec::with_capacity(ids.len());
        for node_id in ids {
            self.physics.destroy_body(node_id);
            if let Some(node) = self.graph.remove_node(node_id) {
                nodes.push(node);
            }
        }
        (nodes, links)
    }

    /// Re-insert previously captured nodes, then their links. Links whose
    /// endpoints are gone are skipped.
    pub fn restore(&mut self, nodes: &[Node], links: &[Link]) {
        for node in nodes {
            self.insert_node(node.clone());
        }
        for link in links {
            if let Err(err) = self.insert_link(link.source(), link.target()) {
                log::warn!("skipping link while restoring: {err}");
            }
        }
    }

    /// Drop every node, link, body, and spring.
    pub fn clear(&mut self) {
        self.physics.clear();
        self.graph.clear();
    }

    /// Replace the whole document with `snapshot`, recreating physics.
    pub fn load(&mut self, snapshot: &Snapshot) {
        self.clear();
        self.restore(&snapshot.nodes, &snapshot.links);
    }

    /// Detached copy with positions freshly pulled from physics.
    pub fn snapshot(&mut self) -> Snapshot {
        self.sync_positions();
        self.graph.snapshot()
    }

    /// Copy a node's live body position into the store.
    pub fn sync_position(&mut self, id: NodeId) {
        if let Some(p) = self.physics.current_position(id) {
            self.graph.set_position(id, p);
        }
    }

    /// Copy every live body position into the store.
    pub fn sync_positions(&mut self) {
        for id in self.graph.node_ids() {
            self.sync_position(id);
        }
    }

    /// Teleport a node (body and stored copy).
    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        self.physics.set_position(id, position);
        self.graph.set_position(id, position)
    }

    /// Live position: the body's if it has one, else the stored copy.
    pub fn position_of(&self, id: NodeId) -> Option<Point> {
        self.physics
            .current_position(id)
            .or_else(|| self.graph.find_node(id).map(|n| n.position))
    }

    /// Overwrite a node's title and content.
    pub fn set_text(&mut self, id: NodeId, title: &str, content: &str) -> bool {
        match self.graph.find_node_mut(id) {
            Some(node) => {
                node.title = title.to_string();
                node.content = content.to_string();
                true
            }
            None => false,
        }
    }

    /// Whether the store and the physics tables describe the same ids.
    pub fn is_consistent(&self) -> bool {
        self.graph.len() == self.physics.body_count()
            && self.graph.link_count() == self.physics.constraint_count()
            && self.graph.nodes().all(|n| self.physics.has_body(n.id))
            && self.graph.links().all(|l| {
                self.physics.has_constraint(l.id)
                    && self.graph.contains(l.source())
                    && self.graph.contains(l.target())
            })
    }
}
