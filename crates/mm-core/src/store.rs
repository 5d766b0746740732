//! Graph store: the node and link collections of one mind map.
//!
//! Pure data, with no physics or rendering knowledge. Nodes sit in a
//! `StableDiGraph` arena with an id → index table; links are the graph's
//! edges (source → target). Tree queries (`children_of`, `subtree`) scan the
//! nodes' `parent_id` fields, which is fine at the size of a hand-built map.

use crate::error::LinkError;
use crate::id::{LinkId, NodeId};
use crate::model::{DEFAULT_TITLE, Link, Node, NodeKind, Snapshot};
use kurbo::Point;
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Nodes as graph vertices, links as edges.
    graph: StableDiGraph<Node, Link>,

    /// Index from NodeId → NodeIndex for fast lookup.
    id_index: HashMap<NodeId, NodeIndex>,

    /// Index from LinkId → EdgeIndex.
    link_index: HashMap<LinkId, EdgeIndex>,
}

impl GraphStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// A generated id not used by any node in this store.
    pub fn fresh_id(&self) -> NodeId {
        loop {
            let id = NodeId::generate();
            if !self.contains(id) {
                return id;
            }
        }
    }

    /// Build a new, unregistered node.
    ///
    /// The color is a lightened copy of the parent's when `parent_id` names
    /// an existing node, otherwise the base color of `kind`.
    pub fn create_node(&self, title: &str, kind: NodeKind, parent_id: Option<NodeId>) -> Node {
        let title = if title.is_empty() { DEFAULT_TITLE } else { title };
        let mut node = Node::new(self.fresh_id(), title, kind);
        node.parent_id = parent_id;
        if let Some(parent) = parent_id.and_then(|p| self.find_node(p)) {
            node.color = parent.color.derive_child();
        }
        node
    }

    /// Register a node. An existing node with the same id is overwritten
    /// in place (its links are kept).
    pub fn add_node(&mut self, node: Node) {
        match self.id_index.get(&node.id) {
            Some(&idx) => self.graph[idx] = node,
            None => {
                let id = node.id;
                let idx = self.graph.add_node(node);
                self.id_index.insert(id, idx);
            }
        }
    }

    /// Remove a node. Links still attached to it are dropped with it; callers
    /// that track link resources must remove those links first.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.id_index.remove(&id)?;
        let attached: Vec<LinkId> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().id)
            .collect();
        for link_id in attached {
            log::debug!("link {link_id} dropped with node {id}");
            self.link_index.remove(&link_id);
        }
        self.graph.remove_node(idx)
    }

    /// Create and register a link between two existing nodes.
    ///
    /// # Errors
    /// `LinkError::MissingEndpoint` when either node is absent.
    pub fn create_link(&mut self, source: NodeId, target: NodeId) -> Result<Link, LinkError> {
        let (Some(&a), Some(&b)) = (self.id_index.get(&source), self.id_index.get(&target)) else {
            return Err(LinkError::MissingEndpoint {
                source_id: source,
                target_id: target,
            });
        };
        let link = Link::new(source, target);
        if !self.link_index.contains_key(&link.id) {
            let edge = self.graph.add_edge(a, b, link);
            self.link_index.insert(link.id, edge);
        }
        Ok(link)
    }

    pub fn remove_link(&mut self, id: LinkId) -> Option<Link> {
        let edge = self.link_index.remove(&id)?;
        self.graph.remove_edge(edge)
    }

    pub fn find_node(&self, id: NodeId) -> Option<&Node> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn find_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn find_link(&self, id: LinkId) -> Option<&Link> {
        self.link_index.get(&id).map(|e| &self.graph[*e])
    }

    /// Overwrite the stored position of a node. Returns false if absent.
    pub fn set_position(&mut self, id: NodeId, position: Point) -> bool {
        match self.find_node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.graph.edge_indices().map(move |e| &self.graph[e])
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|n| n.id).collect()
    }

    pub fn link_ids(&self) -> Vec<LinkId> {
        self.links().map(|l| l.id).collect()
    }

    /// Direct children, found by scanning `parent_id`.
    pub fn children_of(&self, id: NodeId) -> SmallVec<[NodeId; 4]> {
        self.nodes()
            .filter(|n| n.parent_id == Some(id))
            .map(|n| n.id)
            .collect()
    }

    /// `id` followed by all of its descendants, depth-first pre-order.
    ///
    /// Parent cycles (only possible through a malformed import) are cut
    /// at the first revisit. Empty if `id` is not in the store.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            out.push(current);
            // Reverse so the first child is visited first.
            stack.extend(self.children_of(current).into_iter().rev());
        }
        out
    }

    /// Every link with at least one endpoint in `ids`.
    pub fn links_touching(&self, ids: &[NodeId]) -> Vec<Link> {
        let set: HashSet<NodeId> = ids.iter().copied().collect();
        self.links()
            .filter(|l| set.contains(&l.source()) || set.contains(&l.target()))
            .copied()
            .collect()
    }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.id_index.clear();
        self.link_index.clear();
    }

    /// Detached copy of every node and link.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes().cloned().collect(),
            links: self.links().copied().collect(),
        }
    }
}
