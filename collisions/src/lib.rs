//! Rigid body stepping and narrow phase resolution against axis aligned
//! colliders, plus the world that owns gravity, bounds and the collider lists.

pub mod body;
pub mod config;
pub mod error;
pub mod world;

pub use body::{BodyRef, RigidBody, StepContext};
pub use config::{NarrowPhase, WorldConfig};
pub use error::{PhysicsError, PhysicsResult};
pub use world::PhysicsWorld;
