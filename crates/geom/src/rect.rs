//! Integer render rectangles.

use crate::math::Box2D;

/// Alias for `euclid::default::Box2D<i32>`, the pixel-space render
/// rectangle type.
pub type IntBox = euclid::default::Box2D<i32>;

/// Shorthand for `IntBox::new(..)` from the four bounds.
#[inline]
pub fn int_box(x0: i32, y0: i32, x1: i32, y1: i32) -> IntBox {
    IntBox::new(
        euclid::default::Point2D::new(x0, y0),
        euclid::default::Point2D::new(x1, y1),
    )
}

/// The smallest integer rectangle containing `b` (floor the min corner,
/// ceil the max corner).
pub fn outward_int_box(b: &Box2D) -> IntBox {
    int_box(
        b.min.x.floor() as i32,
        b.min.y.floor() as i32,
        b.max.x.ceil() as i32,
        b.max.y.ceil() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{point, Box2D};

    #[test]
    fn outward_rounding() {
        let b = Box2D::new(point(0.25, -1.75), point(3.0, 2.5));
        let ib = outward_int_box(&b);
        assert_eq!((ib.min.x, ib.min.y, ib.max.x, ib.max.y), (0, -2, 3, 3));
    }

    #[test]
    fn union_and_intersection() {
        let a = int_box(0, 0, 4, 4);
        let b = int_box(2, 2, 6, 6);
        assert_eq!(a.union(&b), int_box(0, 0, 6, 6));
        assert_eq!(a.intersection(&b), Some(int_box(2, 2, 4, 4)));
        assert!(a.intersection(&int_box(5, 5, 6, 6)).is_none());
    }

    #[test]
    fn emptiness() {
        assert!(int_box(5, 5, 5, 5).is_empty());
        assert!(int_box(3, 0, 2, 4).is_empty());
        assert!(!int_box(0, 0, 1, 1).is_empty());
        // Boxes that merely touch intersect in an empty box.
        let a = int_box(0, 0, 4, 4);
        let b = int_box(4, 0, 8, 4);
        assert!(a.intersection_unchecked(&b).is_empty());
    }
}
