//! The rigid-body simulator seam.
//!
//! The mind-map core never reaches into a physics engine directly; it talks
//! to anything implementing `Simulator`. `RapierWorld` is the default
//! implementation, and hosts may plug in another engine behind the same
//! trait.

use kurbo::{Point, Vec2};

/// Opaque handle to a body owned by a `Simulator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// Opaque handle to a distance constraint owned by a `Simulator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintHandle(pub u32);

/// Parameters of a circular body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySpec {
    pub position: Point,
    pub radius: f64,
    /// Velocity damping coefficient, per second.
    pub linear_damping: f64,
    /// Bounciness on collision, 0..=1.
    pub restitution: f64,
    /// Surface friction on contact.
    pub friction: f64,
    pub mass: f64,
}

/// Parameters of a spring-like distance constraint between two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintSpec {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Rest length.
    pub length: f64,
    /// Force per unit of stretch.
    pub stiffness: f64,
    /// Force per unit of relative speed along the link.
    pub damping: f64,
}

/// A black-box 2D rigid-body world.
///
/// Operations on unknown handles are ignored (or return `None`).
/// Bodies never rotate.
pub trait Simulator {
    fn add_body(&mut self, spec: BodySpec) -> BodyHandle;
    fn remove_body(&mut self, body: BodyHandle);

    fn add_constraint(&mut self, spec: ConstraintSpec) -> ConstraintHandle;
    fn remove_constraint(&mut self, constraint: ConstraintHandle);

    /// A static body ignores forces and constraints but still collides.
    fn set_static(&mut self, body: BodyHandle, is_static: bool);

    /// Teleport a body; its velocity is kept.
    fn set_position(&mut self, body: BodyHandle, position: Point);

    /// Accumulate a force for the next step.
    fn apply_force(&mut self, body: BodyHandle, force: Vec2);

    fn position(&self, body: BodyHandle) -> Option<Point>;
    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    fn set_gravity(&mut self, gravity: Vec2);

    /// Advance the simulation by one fixed step. Accumulated forces are
    /// consumed.
    fn step(&mut self);
}
