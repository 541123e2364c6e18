use quadtree::QuadtreeError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PhysicsError {
    #[error(transparent)]
    Quadtree(#[from] QuadtreeError),
    #[error("world width and height must be finite and positive (width: {width}, height: {height})")]
    InvalidWorldSize { width: f32, height: f32 },
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
