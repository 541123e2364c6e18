pub mod shapes;

pub use shapes::{Point, Rect};
