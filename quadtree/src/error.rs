use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuadtreeError {
    #[error("quadtree size must be finite and positive (size: {size})")]
    InvalidSize { size: f32 },
    #[error("quadtree max depth must be between 1 and {max} (max_depth: {max_depth})")]
    InvalidMaxDepth { max_depth: usize, max: usize },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;
