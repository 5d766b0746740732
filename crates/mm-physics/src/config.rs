use serde::Deserialize;

/// Body and link tuning, in canvas units and seconds. Defaults give drags
/// that feel responsive but settle within a second or two.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Collider radius of every node body.
    pub body_radius: f64,
    pub body_mass: f64,
    /// Air friction, as a velocity damping coefficient per second.
    pub linear_damping: f64,
    pub restitution: f64,
    pub friction: f64,

    /// Rest length of a link.
    pub link_length: f64,
    pub link_stiffness: f64,
    pub link_damping: f64,

    /// Solver passes per step.
    pub solver_iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            body_radius: 60.0,
            body_mass: 1.0,
            linear_damping: 3.0,
            restitution: 0.7,
            friction: 0.01,
            link_length: 150.0,
            link_stiffness: 10.0,
            link_damping: 2.0,
            solver_iterations: 4,
        }
    }
}
