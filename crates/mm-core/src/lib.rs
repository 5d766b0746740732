pub mod error;
pub mod file;
pub mod id;
pub mod model;
pub mod store;

pub use error::{HistoryBoundsError, ImportError, LinkError};
pub use id::{LinkId, NodeId};
pub use model::*;
pub use store::GraphStore;

// Re-export kurbo geometry so downstream crates agree on one point type
pub use kurbo::{Point, Size, Vec2};
