//! Physics adapter: binds mind-map ids to simulator handles.
//!
//! Bodies are keyed by `NodeId` and constraints by `LinkId`, in tables that
//! run parallel to the graph store. The adapter owns the simulator, so a
//! handle can never outlive the world it belongs to.

use crate::config::PhysicsConfig;
use crate::sim::{BodyHandle, BodySpec, ConstraintHandle, ConstraintSpec, Simulator};
use kurbo::{Point, Vec2};
use mm_core::{LinkId, NodeId};
use std::collections::HashMap;

pub struct PhysicsAdapter<S: Simulator> {
    sim: S,
    config: PhysicsConfig,
    bodies: HashMap<NodeId, BodyHandle>,
    constraints: HashMap<LinkId, ConstraintHandle>,
}

impl<S: Simulator> PhysicsAdapter<S> {
    /// Wrap a simulator. Gravity is switched off: layout comes from link
    /// tension alone.
    pub fn new(mut sim: S, config: PhysicsConfig) -> Self {
        sim.set_gravity(Vec2::ZERO);
        Self {
            sim,
            config,
            bodies: HashMap::new(),
            constraints: HashMap::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn simulator(&self) -> &S {
        &self.sim
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn has_body(&self, id: NodeId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn has_constraint(&self, id: LinkId) -> bool {
        self.constraints.contains_key(&id)
    }

    pub fn body_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.bodies.keys().copied()
    }

    /// Create the body for a node. A body already bound to `id` is
    /// destroyed first, keeping the table one-to-one.
    pub fn create_body(&mut self, id: NodeId, position: Point) -> BodyHandle {
        self.destroy_body(id);
        let c = &self.config;
        let handle = self.sim.add_body(BodySpec {
            position,
            radius: c.body_radius,
            linear_damping: c.linear_damping,
            restitution: c.restitution,
            friction: c.friction,
            mass: c.body_mass,
        });
        self.bodies.insert(id, handle);
        handle
    }

    pub fn destroy_body(&mut self, id: NodeId) -> bool {
        match self.bodies.remove(&id) {
            Some(handle) => {
                self.sim.remove_body(handle);
                true
            }
            None => false,
        }
    }

    /// Create the spring for a link with the configured length, stiffness
    /// and damping. `None` if either endpoint has no body.
    pub fn create_constraint(&mut self, link: LinkId) -> Option<ConstraintHandle> {
        let c = self.config;
        self.create_constraint_with(link, c.link_length, c.link_stiffness, c.link_damping)
    }

    pub fn create_constraint_with(
        &mut self,
        link: LinkId,
        length: f64,
        stiffness: f64,
        damping: f64,
    ) -> Option<ConstraintHandle> {
        let (Some(&body_a), Some(&body_b)) =
            (self.bodies.get(&link.source), self.bodies.get(&link.target))
        else {
            log::debug!("no constraint for {link}: endpoint has no body");
            return None;
        };
        self.destroy_constraint(link);
        let handle = self.sim.add_constraint(ConstraintSpec {
            body_a,
            body_b,
            length,
            stiffness,
            damping,
        });
        self.constraints.insert(link, handle);
        Some(handle)
    }

    pub fn destroy_constraint(&mut self, link: LinkId) -> bool {
        match self.constraints.remove(&link) {
            Some(handle) => {
                self.sim.remove_constraint(handle);
                true
            }
            None => false,
        }
    }

    pub fn set_static(&mut self, id: NodeId, is_static: bool) {
        if let Some(&h) = self.bodies.get(&id) {
            self.sim.set_static(h, is_static);
        }
    }

    pub fn set_position(&mut self, id: NodeId, position: Point) {
        if let Some(&h) = self.bodies.get(&id) {
            self.sim.set_position(h, position);
        }
    }

    pub fn apply_force(&mut self, id: NodeId, force: Vec2) {
        if let Some(&h) = self.bodies.get(&id) {
            self.sim.apply_force(h, force);
        }
    }

    pub fn current_position(&self, id: NodeId) -> Option<Point> {
        self.bodies.get(&id).and_then(|&h| self.sim.position(h))
    }

    pub fn velocity(&self, id: NodeId) -> Option<Vec2> {
        self.bodies.get(&id).and_then(|&h| self.sim.velocity(h))
    }

    /// Multiply a body's velocity by `factor`.
    pub fn scale_velocity(&mut self, id: NodeId, factor: f64) {
        if let Some(&h) = self.bodies.get(&id)
            && let Some(v) = self.sim.velocity(h)
        {
            self.sim.set_velocity(h, v * factor);
        }
    }

    /// Advance the simulation one step.
    pub fn tick(&mut self) {
        self.sim.step();
    }

    /// Destroy every constraint and body.
    pub fn clear(&mut self) {
        for (_, handle) in self.constraints.drain() {
            self.sim.remove_constraint(handle);
        }
        for (_, handle) in self.bodies.drain() {
            self.sim.remove_body(handle);
        }
    }
}
