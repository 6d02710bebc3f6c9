use crate::math::{point, Point, Vector};

/// A line segment between two points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    #[inline]
    pub fn new(from: Point, to: Point) -> Self {
        LineSegment { from, to }
    }

    #[inline]
    pub fn to_vector(&self) -> Vector {
        self.to - self.from
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.to_vector().length()
    }

    /// Returns the segment with flipped direction.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// The x coordinate of the point on the (extended) segment at height `y`.
    ///
    /// The segment must not be horizontal.
    #[inline]
    pub fn solve_x_for_y(&self, y: f64) -> f64 {
        self.from.x
            + (self.to.x - self.from.x) * ((y - self.from.y) / (self.to.y - self.from.y))
    }

    /// Normalized implicit equation of the supporting line.
    #[inline]
    pub fn equation(&self) -> LineEquation {
        LineEquation::from_edge(self.from, self.to)
    }
}

/// A normalized implicit line equation `a*x + b*y + c = 0` with
/// `a² + b² = 1`.
///
/// For an edge oriented top-down (`to.y > from.y`) the normalization gives
/// `a ≥ 0`, so `signed_distance` is a perpendicular distance, positive to
/// the right of the directed edge.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineEquation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LineEquation {
    /// Equation of the line through `from` and `to`.
    ///
    /// The endpoints must not coincide.
    pub fn from_edge(from: Point, to: Point) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let s = 1.0 / (dx * dx + dy * dy).sqrt();
        let a = dy * s;
        let b = -dx * s;
        LineEquation {
            a,
            b,
            c: -(a * from.x + b * from.y),
        }
    }

    /// Signed perpendicular distance from the line, in coordinate units.
    #[inline]
    pub fn signed_distance(&self, x: f64, y: f64) -> f64 {
        self.a * x + self.b * y + self.c
    }

    /// The point on the line closest to `p`.
    pub fn project(&self, p: Point) -> Point {
        let d = self.signed_distance(p.x, p.y);
        point(p.x - self.a * d, p.y - self.b * d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    #[test]
    fn equation_normalized() {
        let eq = LineEquation::from_edge(point(1.0, 2.0), point(4.0, 6.0));
        assert!((eq.a * eq.a + eq.b * eq.b - 1.0).abs() < 1e-12);
        assert!(eq.a >= 0.0);
        // Both endpoints are on the line.
        assert!(eq.signed_distance(1.0, 2.0).abs() < 1e-12);
        assert!(eq.signed_distance(4.0, 6.0).abs() < 1e-12);
    }

    #[test]
    fn signed_distance_side() {
        // Vertical edge going down through x = 1: points to its right are at
        // positive distance.
        let eq = LineEquation::from_edge(point(1.0, 0.0), point(1.0, 10.0));
        assert!(eq.signed_distance(3.0, 5.0) > 0.0);
        assert!(eq.signed_distance(-1.0, 5.0) < 0.0);
        assert!((eq.signed_distance(3.0, 5.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn solve_x_for_y() {
        let seg = LineSegment::new(point(0.0, 0.0), point(10.0, 5.0));
        assert!((seg.solve_x_for_y(2.5) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn project() {
        let eq = LineEquation::from_edge(point(0.0, 0.0), point(0.0, 1.0));
        let p = eq.project(point(3.0, 0.5));
        assert!((p.x - 0.0).abs() < 1e-12);
        assert!((p.y - 0.5).abs() < 1e-12);
    }
}
