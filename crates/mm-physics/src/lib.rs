//! Physics for mind-map layout: the `Simulator` seam, the id-keyed
//! `PhysicsAdapter`, and the `rapier2d`-backed `RapierWorld`.

pub mod adapter;
pub mod config;
pub mod rapier;
pub mod sim;

pub use adapter::PhysicsAdapter;
pub use config::PhysicsConfig;
pub use rapier::RapierWorld;
pub use sim::{BodyHandle, BodySpec, ConstraintHandle, ConstraintSpec, Simulator};
