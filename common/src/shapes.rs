use rand::Rng;
use std::fmt;

/// Default tolerance used by `Rect::approx_eq`.
pub const EPSILON: f32 = 0.00001;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn cross(self, other: Point) -> f32 {
        self.x * other.y - self.y * other.x
    }

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Intersection point of segment `a_start..a_end` with segment `b_start..b_end`.
    /// Parallel (including collinear) segments report no intersection.
    pub fn segment_intersection(
        a_start: Point,
        a_end: Point,
        b_start: Point,
        b_end: Point,
    ) -> Option<Point> {
        let r = a_end.sub(a_start);
        let s = b_end.sub(b_start);
        let denominator = r.cross(s);
        if denominator == 0.0 {
            return None;
        }

        let offset = b_start.sub(a_start);
        let t = offset.cross(s) / denominator;
        let u = offset.cross(r) / denominator;
        if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
            return None;
        }

        Some(Point::new(a_start.x + t * r.x, a_start.y + t * r.y))
    }
}

/// Axis aligned rectangle stored as left, width, top, height.
///
/// Y grows upwards: `top` is the larger coordinate and `bottom = top - height`.
/// Width and height are clamped to zero whenever they are written, so a rect
/// can never be inverted.
#[derive(Debug, Copy, Clone, Default)]
pub struct Rect {
    left: f32,
    width: f32,
    top: f32,
    height: f32,
}

impl Rect {
    pub fn new(left: f32, width: f32, top: f32, height: f32) -> Self {
        let mut rect = Self::default();
        rect.set(left, width, top, height);
        rect
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top - self.height
    }

    pub fn center_x(&self) -> f32 {
        self.left + self.width * 0.5
    }

    pub fn center_y(&self) -> f32 {
        self.top - self.height * 0.5
    }

    pub fn set_left(&mut self, left: f32) {
        self.left = left;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
    }

    pub fn set_top(&mut self, top: f32) {
        self.top = top;
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height.max(0.0);
    }

    pub fn set(&mut self, left: f32, width: f32, top: f32, height: f32) {
        self.left = left;
        self.width = width.max(0.0);
        self.top = top;
        self.height = height.max(0.0);
    }

    pub fn set_position(&mut self, left: f32, top: f32) {
        self.left = left;
        self.top = top;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Strict interior test, points on an edge are outside.
    pub fn point_inside(&self, x: f32, y: f32) -> bool {
        x > self.left && x < self.right() && y < self.top && y > self.bottom()
    }

    /// Exclusive on all four edges: rects that only touch do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.right() > other.left
            && self.left < other.right()
            && self.top > other.bottom()
            && self.bottom() < other.top
    }

    /// True when `other` lies fully inside this rect, edges included.
    pub fn encapsulates(&self, other: &Rect) -> bool {
        self.left <= other.left
            && self.right() >= other.right()
            && self.top >= other.top
            && self.bottom() <= other.bottom()
    }

    /// Whether the horizontal spans overlap: one rect's left edge lies within
    /// the other's span. With `include_edges` touching spans count.
    pub fn edge_overlap_x(&self, other: &Rect, include_edges: bool) -> bool {
        if include_edges {
            (self.left <= other.left && other.left <= self.right())
                || (other.left <= self.left && self.left <= other.right())
        } else {
            (self.left < other.left && other.left < self.right())
                || (other.left < self.left && self.left < other.right())
        }
    }

    /// Whether the vertical spans overlap: one rect's top edge lies within
    /// the other's span. With `include_edges` touching spans count.
    pub fn edge_overlap_y(&self, other: &Rect, include_edges: bool) -> bool {
        if include_edges {
            (self.top >= other.top && self.bottom() <= other.top)
                || (other.top >= self.top && other.bottom() <= self.top)
        } else {
            (self.top > other.top && self.bottom() < other.top)
                || (other.top > self.top && other.bottom() < self.top)
        }
    }

    /// First point where the segment crosses a side, tested left, top,
    /// bottom, right in that order.
    pub fn intersection_point(&self, start: Point, end: Point) -> Option<Point> {
        let top_left = Point::new(self.left, self.top);
        let top_right = Point::new(self.right(), self.top);
        let bottom_left = Point::new(self.left, self.bottom());
        let bottom_right = Point::new(self.right(), self.bottom());

        [
            (top_left, bottom_left),
            (top_left, top_right),
            (bottom_left, bottom_right),
            (top_right, bottom_right),
        ]
        .into_iter()
        .find_map(|(side_start, side_end)| {
            Point::segment_intersection(start, end, side_start, side_end)
        })
    }

    /// Component-wise comparison of left, width, top and height.
    pub fn equals(&self, other: &Rect, threshold: f32) -> bool {
        (self.left - other.left).abs() <= threshold
            && (self.width - other.width).abs() <= threshold
            && (self.top - other.top).abs() <= threshold
            && (self.height - other.height).abs() <= threshold
    }

    pub fn approx_eq(&self, other: &Rect) -> bool {
        self.equals(other, EPSILON)
    }

    /// Smallest rect covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let right = self.right().max(other.right());
        let top = self.top.max(other.top);
        let bottom = self.bottom().min(other.bottom());
        Rect::new(left, right - left, top, top - bottom)
    }

    /// Grows the rect by `amount` on every side.
    pub fn inflate(&self, amount: f32) -> Rect {
        Rect::new(
            self.left - amount,
            self.width + amount * 2.0,
            self.top + amount,
            self.height + amount * 2.0,
        )
    }

    /// A `width` x `height` rect placed at a random spot fully inside this one.
    /// When it cannot fit it is pinned to the top left corner.
    pub fn random_rect_inside<R: Rng>(&self, width: f32, height: f32, rng: &mut R) -> Rect {
        let left = safe_rand_f32(rng, self.left, self.right() - width);
        let top = if self.bottom() + height > self.top {
            self.top
        } else {
            safe_rand_f32(rng, self.bottom() + height, self.top)
        };
        Rect::new(left, width, top, height)
    }
}

fn safe_rand_f32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.5}, {:.5}] ({:.5} X {:.5})",
            self.left, self.top, self.width, self.height
        )
    }
}
