//! Editor configuration.
//!
//! Every field has a default, so a host may pass a partial JSON object
//! (or nothing at all).

use crate::history::MAX_CAPACITY;
use mm_physics::PhysicsConfig;
use serde::Deserialize;

/// Largest accepted child placement offset, in canvas units.
const MAX_CHILD_OFFSET: f64 = 10_000.0;

/// Largest accepted free-float force component.
const MAX_FREE_FLOAT_FORCE: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo steps kept before the oldest is evicted, at most 10.
    pub history_capacity: usize,

    /// Longest title accepted from the title field, in characters.
    pub title_max_chars: usize,

    /// Period of free-float nudges, in milliseconds.
    pub free_float_interval_ms: f64,

    /// Largest force component of a free-float nudge.
    pub free_float_force: f64,

    /// Velocity multiplier applied once when free float is switched off.
    pub free_float_damping: f64,

    /// New children are placed at `parent.x ± child_offset_x`.
    pub child_offset_x: f64,

    /// New children are placed `child_offset_y.0 .. child_offset_y.1` below
    /// their parent.
    pub child_offset_y: (f64, f64),

    /// Seed for child placement and free-float nudges.
    pub seed: u64,

    pub physics: PhysicsConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            title_max_chars: 20,
            free_float_interval_ms: 1000.0,
            free_float_force: 1800.0,
            free_float_damping: 0.5,
            child_offset_x: 50.0,
            child_offset_y: (100.0, 200.0),
            seed: 0x5eed,
            physics: PhysicsConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config.
    ///
    /// # Errors
    /// Returns the serde error if `json` is not a valid config object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Clamp every field into a range the editor can work with. Values
    /// that are not finite fall back to their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let bounded = |v: f64, fallback: f64, max: f64| {
            if v.is_finite() { v.clamp(-max, max) } else { fallback }
        };
        let (lo, hi) = self.child_offset_y;
        Self {
            history_capacity: self.history_capacity.clamp(1, MAX_CAPACITY),
            free_float_interval_ms: if self.free_float_interval_ms.is_finite() {
                self.free_float_interval_ms
            } else {
                defaults.free_float_interval_ms
            },
            free_float_force: bounded(
                self.free_float_force,
                defaults.free_float_force,
                MAX_FREE_FLOAT_FORCE,
            ),
            free_float_damping: if self.free_float_damping.is_finite() {
                self.free_float_damping
            } else {
                defaults.free_float_damping
            },
            child_offset_x: bounded(self.child_offset_x, defaults.child_offset_x, MAX_CHILD_OFFSET),
            child_offset_y: (
                bounded(lo, defaults.child_offset_y.0, MAX_CHILD_OFFSET),
                bounded(hi, defaults.child_offset_y.1, MAX_CHILD_OFFSET),
            ),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EditorConfig::from_json(r#"{"history_capacity": 3, "physics": {"link_length": 90}}"#)
                .unwrap();
        assert_eq!(config.history_capacity, 3);
        assert_eq!(config.title_max_chars, 20);
        assert_eq!(config.physics.link_length, 90.0);
        assert_eq!(config.physics.body_radius, 60.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = EditorConfig::from_json(
            r#"{"history_capacity": 50, "child_offset_x": 1e308, "child_offset_y": [-1e308, 1e308]}"#,
        )
        .unwrap();
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.child_offset_x, MAX_CHILD_OFFSET);
        assert_eq!(config.child_offset_y, (-MAX_CHILD_OFFSET, MAX_CHILD_OFFSET));

        let config = EditorConfig {
            child_offset_x: f64::INFINITY,
            free_float_force: f64::NAN,
            history_capacity: 0,
            ..EditorConfig::default()
        }
        .sanitized();
        assert_eq!(config.child_offset_x, 50.0);
        assert_eq!(config.free_float_force, EditorConfig::default().free_float_force);
        assert_eq!(config.history_capacity, 1);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }
}
