//! `RapierWorld`: the `Simulator` backed by `rapier2d`.
//!
//! Every node is a dynamic ball with rotations locked; every link is a
//! spring joint. Forces are cleared after each step, so `apply_force`
//! acts for exactly one step. Static bodies are switched to `Fixed`.

use crate::config::PhysicsConfig;
use crate::sim::{BodyHandle, BodySpec, ConstraintHandle, ConstraintSpec, Simulator};
use kurbo::{Point, Vec2};
use rapier2d::prelude::*;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x as Real, v.y as Real]
}

fn to_point_vector(p: Point) -> Vector<Real> {
    vector![p.x as Real, p.y as Real]
}

pub struct RapierWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    body_handles: BTreeMap<BodyHandle, RigidBodyHandle>,
    joint_handles: BTreeMap<ConstraintHandle, ImpulseJointHandle>,
    next_body: u32,
    next_constraint: u32,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

impl RapierWorld {
    pub fn from_config(config: &PhysicsConfig) -> Self {
        let mut params = IntegrationParameters::default();
        params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations as usize).unwrap_or(NonZeroUsize::MIN);
        Self {
            gravity: vector![0.0, 0.0],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            body_handles: BTreeMap::new(),
            joint_handles: BTreeMap::new(),
            next_body: 0,
            next_constraint: 0,
        }
    }

    pub fn body_count(&self) -> usize {
        self.body_handles.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.joint_handles.len()
    }

    pub fn is_static(&self, body: BodyHandle) -> Option<bool> {
        self.body(body).map(RigidBody::is_fixed)
    }

    fn body(&self, body: BodyHandle) -> Option<&RigidBody> {
        self.body_handles
            .get(&body)
            .and_then(|&h| self.bodies.get(h))
    }

    fn body_mut(&mut self, body: BodyHandle) -> Option<&mut RigidBody> {
        let &h = self.body_handles.get(&body)?;
        self.bodies.get_mut(h)
    }
}

impl Simulator for RapierWorld {
    fn add_body(&mut self, spec: BodySpec) -> BodyHandle {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(to_point_vector(spec.position))
            .linear_damping(spec.linear_damping.max(0.0) as Real)
            .lock_rotations()
            .build();
        let collider = ColliderBuilder::ball(spec.radius as Real)
            .restitution(spec.restitution as Real)
            .friction(spec.friction as Real)
            .mass(spec.mass as Real)
            .build();
        let rb = self.bodies.insert(rigid_body);
        self.colliders.insert_with_parent(collider, rb, &mut self.bodies);

        let handle = BodyHandle(self.next_body);
        self.next_body += 1;
        self.body_handles.insert(handle, rb);
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) {
        let Some(rb) = self.body_handles.remove(&body) else {
            return;
        };
        self.bodies.remove(
            rb,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        // Joints attached to the body went with it.
        let joints = &self.impulse_joints;
        self.joint_handles.retain(|_, j| joints.get(*j).is_some());
    }

    fn add_constraint(&mut self, spec: ConstraintSpec) -> ConstraintHandle {
        let handle = ConstraintHandle(self.next_constraint);
        self.next_constraint += 1;
        let (Some(&a), Some(&b)) = (
            self.body_handles.get(&spec.body_a),
            self.body_handles.get(&spec.body_b),
        ) else {
            log::debug!("constraint {handle:?} skipped: unknown body");
            return handle;
        };
        let joint = SpringJointBuilder::new(
            spec.length as Real,
            spec.stiffness as Real,
            spec.damping as Real,
        );
        let joint = self.impulse_joints.insert(a, b, joint, true);
        self.joint_handles.insert(handle, joint);
        handle
    }

    fn remove_constraint(&mut self, constraint: ConstraintHandle) {
        if let Some(joint) = self.joint_handles.remove(&constraint) {
            self.impulse_joints.remove(joint, true);
        }
    }

    fn set_static(&mut self, body: BodyHandle, is_static: bool) {
        if let Some(rb) = self.body_mut(body) {
            let kind = if is_static {
                RigidBodyType::Fixed
            } else {
                RigidBodyType::Dynamic
            };
            rb.set_body_type(kind, true);
            rb.set_linvel(vector![0.0, 0.0], true);
        }
    }

    fn set_position(&mut self, body: BodyHandle, position: Point) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_translation(to_point_vector(position), true);
        }
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2) {
        if let Some(rb) = self.body_mut(body) {
            rb.add_force(to_vector(force), true);
        }
    }

    fn position(&self, body: BodyHandle) -> Option<Point> {
        self.body(body).map(|rb| {
            let t = rb.translation();
            Point::new(f64::from(t.x), f64::from(t.y))
        })
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.body(body).map(|rb| {
            let v = rb.linvel();
            Vec2::new(f64::from(v.x), f64::from(v.y))
        })
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_linvel(to_vector(velocity), true);
        }
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_vector(gravity);
    }

    fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
        }
    }
}
