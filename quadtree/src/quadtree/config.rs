use crate::error::{QuadtreeError, QuadtreeResult};

/// Deepest tree `QuadTree::with_config` accepts.
pub const MAX_SUPPORTED_DEPTH: usize = 16;

#[derive(Debug, Clone)]
pub struct Config {
    /// Side length of the square covered by the root, anchored at (0, 0)
    /// bottom left.
    pub size: f32,
    /// Number of levels including the root. Only nodes at `max_depth - 1`
    /// store colliders.
    pub max_depth: usize,
}

impl Config {
    pub fn validate(&self) -> QuadtreeResult<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(QuadtreeError::InvalidSize { size: self.size });
        }
        if self.max_depth == 0 || self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(QuadtreeError::InvalidMaxDepth {
                max_depth: self.max_depth,
                max: MAX_SUPPORTED_DEPTH,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size: 1000.0,
            max_depth: 4,
        }
    }
}
