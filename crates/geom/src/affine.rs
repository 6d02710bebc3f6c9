//! Small helpers over affine transformations.
//!
//! The transforms themselves are plain `euclid::Transform2D<f64>` values
//! (see [`crate::math::Transform`]); only the handful of queries euclid does
//! not provide live here.

use crate::math::Transform;

const EPSILON: f64 = 1e-6;

/// The transform's "expansion factor": the factor by which it scales areas,
/// as a length ratio.
#[inline]
pub fn expansion(t: &Transform) -> f64 {
    t.determinant().sqrt()
}

/// Whether the transform maps axis-aligned rectangles to axis-aligned
/// rectangles (i.e. it is a combination of scales, translations and
/// quarter-turn rotations).
pub fn is_rectilinear(t: &Transform) -> bool {
    (t.m12.abs() < EPSILON && t.m21.abs() < EPSILON)
        || (t.m11.abs() < EPSILON && t.m22.abs() < EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{point, Transform};

    #[test]
    fn identity_is_exact() {
        let m = Transform::identity();
        for &(x, y) in &[(0.0, 0.0), (1.5, -2.25), (1e9, -1e-9), (0.1, 0.2)] {
            let p = point(x, y);
            assert_eq!(m.transform_point(p), p);
        }
    }

    #[test]
    fn composition_matches_sequential_application() {
        let a = Transform::new(0.8, 0.6, -0.6, 0.8, 3.0, -2.0);
        let b = Transform::new(2.0, 0.0, 0.0, 0.5, -1.0, 4.0);
        let ab = b.then(&a);
        for &(x, y) in &[(0.0, 0.0), (1.0, 1.0), (-3.5, 7.25), (100.0, -0.125)] {
            let p = point(x, y);
            let composed = ab.transform_point(p);
            let sequential = a.transform_point(b.transform_point(p));
            assert!((composed.x - sequential.x).abs() <= 1e-12 * composed.x.abs().max(1.0));
            assert!((composed.y - sequential.y).abs() <= 1e-12 * composed.y.abs().max(1.0));
        }
    }

    #[test]
    fn expansion_of_scale() {
        let m = Transform::scale(2.0, 3.0);
        assert!((expansion(&m) - 6.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn rectilinear() {
        assert!(is_rectilinear(&Transform::identity()));
        assert!(is_rectilinear(&Transform::scale(2.0, -1.0)));
        // A quarter turn is rectilinear, an eighth turn is not.
        assert!(is_rectilinear(&Transform::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0)));
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!(!is_rectilinear(&Transform::new(s, s, -s, s, 0.0, 0.0)));
    }
}
