//! Shape primitives shared by the region tree and the interaction loop.
//!
//! Both shapes are immutable value types. A [`Rectangle`] is described by
//! its *center* and *half-extents*, a [`Circle`] by its center and radius.
//! Containment uses closed intervals (`<=`), so a point on an edge belongs
//! to every shape whose edge it lies on.

use glam::DVec2;

/// Axis-aligned rectangle given by center `(x, y)` and half-extents `(w, h)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Circle given by center `(x, y)` and radius `r`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// A query range or node boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Rect(Rectangle),
    Circle(Circle),
}

/// The four children of a subdivided node, in insertion visit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Quadrant {
    /// Visit order used when delegating an insertion to children.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthEast,
        Quadrant::NorthWest,
        Quadrant::SouthEast,
        Quadrant::SouthWest,
    ];
}

impl Rectangle {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a rectangle from its minimum and maximum corners.
    pub fn from_min_max(min: DVec2, max: DVec2) -> Self {
        let center = (min + max) * 0.5;
        let half = (max - min) * 0.5;
        Self::new(center.x, center.y, half.x, half.y)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn half_extents(&self) -> DVec2 {
        DVec2::new(self.w, self.h)
    }

    pub fn min(&self) -> DVec2 {
        self.center() - self.half_extents()
    }

    pub fn max(&self) -> DVec2 {
        self.center() + self.half_extents()
    }

    pub fn contains_point(&self, p: DVec2) -> bool {
        (p.x - self.x).abs() <= self.w && (p.y - self.y).abs() <= self.h
    }

    /// Overlap test between two rectangles. Touching edges count as overlap.
    pub fn intersects_rect(&self, other: &Rectangle) -> bool {
        !(other.x - other.w > self.x + self.w
            || other.x + other.w < self.x - self.w
            || other.y - other.h > self.y + self.h
            || other.y + other.h < self.y - self.h)
    }

    /// `true` while halving still yields non-zero extents on both axes.
    pub fn is_divisible(&self) -> bool {
        self.w / 2.0 > 0.0 && self.h / 2.0 > 0.0
    }

    /// Boundary of one quadrant after subdivision: half the width and height,
    /// centered in the matching corner. North is towards smaller `y`.
    pub fn quadrant(&self, q: Quadrant) -> Rectangle {
        let w = self.w / 2.0;
        let h = self.h / 2.0;
        match q {
            Quadrant::NorthEast => Rectangle::new(self.x + w, self.y - h, w, h),
            Quadrant::NorthWest => Rectangle::new(self.x - w, self.y - h, w, h),
            Quadrant::SouthEast => Rectangle::new(self.x + w, self.y + h, w, h),
            Quadrant::SouthWest => Rectangle::new(self.x - w, self.y + h, w, h),
        }
    }
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    pub fn centered_at(center: DVec2, r: f64) -> Self {
        Self::new(center.x, center.y, r)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn contains_point(&self, p: DVec2) -> bool {
        self.center().distance_squared(p) <= self.r * self.r
    }

    /// Circle against rectangle.
    ///
    /// Rejects on the bounding square first, accepts when the circle center
    /// lies within the rectangle's band on either axis, and only then falls
    /// back to the corner distance check.
    pub fn intersects_rect(&self, rect: &Rectangle) -> bool {
        let x_dist = (rect.x - self.x).abs();
        let y_dist = (rect.y - self.y).abs();

        if x_dist > self.r + rect.w || y_dist > self.r + rect.h {
            return false;
        }

        if x_dist <= rect.w || y_dist <= rect.h {
            return true;
        }

        let dx = x_dist - rect.w;
        let dy = y_dist - rect.h;
        dx * dx + dy * dy <= self.r * self.r
    }

    pub fn intersects_circle(&self, other: &Circle) -> bool {
        let reach = self.r + other.r;
        self.center().distance_squared(other.center()) <= reach * reach
    }
}

impl Shape {
    pub fn contains_point(&self, p: DVec2) -> bool {
        match self {
            Shape::Rect(r) => r.contains_point(p),
            Shape::Circle(c) => c.contains_point(p),
        }
    }

    /// Symmetric overlap test between any two shapes.
    pub fn intersects(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Rect(a), Shape::Rect(b)) => a.intersects_rect(b),
            (Shape::Circle(c), Shape::Rect(r)) | (Shape::Rect(r), Shape::Circle(c)) => {
                c.intersects_rect(r)
            }
            (Shape::Circle(a), Shape::Circle(b)) => a.intersects_circle(b),
        }
    }

    /// Shortcut used by tree traversal, where boundaries are always rectangles.
    pub fn intersects_rect(&self, rect: &Rectangle) -> bool {
        match self {
            Shape::Rect(r) => r.intersects_rect(rect),
            Shape::Circle(c) => c.intersects_rect(rect),
        }
    }
}

impl From<Rectangle> for Shape {
    fn from(r: Rectangle) -> Self {
        Shape::Rect(r)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_contains_uses_center_and_half_extents() {
        let r = Rectangle::new(10.0, 10.0, 5.0, 2.0);

        assert!(r.contains_point(DVec2::new(10.0, 10.0)));
        assert!(r.contains_point(DVec2::new(15.0, 12.0)), "corner is inside");
        assert!(r.contains_point(DVec2::new(5.0, 8.0)), "opposite corner is inside");
        assert!(!r.contains_point(DVec2::new(15.1, 10.0)));
        assert!(!r.contains_point(DVec2::new(10.0, 7.9)));
    }

    #[test]
    fn from_min_max_round_trips_corners() {
        let r = Rectangle::from_min_max(DVec2::new(0.0, 0.0), DVec2::new(100.0, 50.0));
        assert_eq!(r, Rectangle::new(50.0, 25.0, 50.0, 25.0));
        assert_eq!(r.min(), DVec2::new(0.0, 0.0));
        assert_eq!(r.max(), DVec2::new(100.0, 50.0));
    }

    #[test]
    fn rectangles_touching_on_an_edge_intersect() {
        let a = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let b = Rectangle::new(2.0, 0.0, 1.0, 1.0);
        let c = Rectangle::new(2.1, 0.0, 1.0, 1.0);

        assert!(a.intersects_rect(&b));
        assert!(b.intersects_rect(&a));
        assert!(!a.intersects_rect(&c));
        assert!(!c.intersects_rect(&a));
    }

    #[test]
    fn quadrants_tile_the_parent() {
        let parent = Rectangle::new(0.0, 0.0, 8.0, 4.0);
        let quads: Vec<Rectangle> = Quadrant::ALL.iter().map(|&q| parent.quadrant(q)).collect();

        let area: f64 = quads.iter().map(|q| 4.0 * q.w * q.h).sum();
        assert_eq!(area, 4.0 * parent.w * parent.h, "no gap and no overlap in area");

        for q in &quads {
            assert_eq!((q.w, q.h), (4.0, 2.0));
            assert!(q.min().cmpge(parent.min()).all());
            assert!(q.max().cmple(parent.max()).all());
        }

        assert_eq!(quads[0], Rectangle::new(4.0, -2.0, 4.0, 2.0));
        assert_eq!(quads[1], Rectangle::new(-4.0, -2.0, 4.0, 2.0));
        assert_eq!(quads[2], Rectangle::new(4.0, 2.0, 4.0, 2.0));
        assert_eq!(quads[3], Rectangle::new(-4.0, 2.0, 4.0, 2.0));
    }

    #[test]
    fn circle_contains_by_squared_distance() {
        let c = Circle::new(0.0, 0.0, 5.0);
        assert!(c.contains_point(DVec2::new(3.0, 4.0)), "boundary point is inside");
        assert!(!c.contains_point(DVec2::new(3.0, 4.1)));
    }

    #[test]
    fn circle_rejects_rectangle_outside_bounding_square() {
        let c = Circle::new(0.0, 0.0, 1.0);
        let far = Rectangle::new(10.0, 0.0, 1.0, 1.0);
        assert!(!c.intersects_rect(&far));
    }

    #[test]
    fn circle_rectangle_corner_cases() {
        let c = Circle::new(0.0, 0.0, 1.0);

        // Inside the bounding square but past the rounded corner.
        let corner = Rectangle::new(1.9, 1.9, 1.0, 1.0);
        assert!(!c.intersects_rect(&corner));

        // Corner at (0.5, 0.5) is inside the circle.
        let touching = Rectangle::new(1.5, 1.5, 1.0, 1.0);
        assert!(c.intersects_rect(&touching));

        // Center within the rectangle's horizontal band.
        let side = Rectangle::new(1.5, 0.0, 1.0, 1.0);
        assert!(c.intersects_rect(&side));
    }

    #[test]
    fn shape_intersection_is_symmetric() {
        let shapes = [
            Shape::from(Rectangle::new(0.0, 0.0, 2.0, 1.0)),
            Shape::from(Rectangle::new(3.5, 0.0, 1.0, 1.0)),
            Shape::from(Circle::new(2.0, 2.0, 1.5)),
            Shape::from(Circle::new(-3.0, 0.0, 0.5)),
            Shape::from(Circle::new(10.0, 10.0, 1.0)),
        ];

        for a in &shapes {
            for b in &shapes {
                assert_eq!(a.intersects(b), b.intersects(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn circles_intersect_by_radius_sum() {
        let a = Circle::new(0.0, 0.0, 1.0);
        assert!(a.intersects_circle(&Circle::new(2.0, 0.0, 1.0)));
        assert!(!a.intersects_circle(&Circle::new(2.5, 0.0, 1.0)));
    }
}
