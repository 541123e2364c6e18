pub mod collider;
pub mod error;
pub mod quadtree;

pub use collider::{Collider, ColliderRef, EntityTag};
pub use error::{QuadtreeError, QuadtreeResult};
pub use quadtree::{CollisionResults, Config, QuadTree, QuadTreeAnalytics};
