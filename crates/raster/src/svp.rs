//! Sorted vector paths: the canonical rasterizer input.
//!
//! An [`Svp`] is a set of y-monotone polyline chains ([`SvpSeg`]) tagged
//! with a winding direction and sorted lexicographically by top point.
//! Arbitrary (possibly self-intersecting) paths are first split into
//! monotone chains here, then handed to the sweep-line intersector for
//! boolean cleanup.

use crate::math::{point, Box2D, Point};
use crate::path::{Event, Path};

use std::cmp::Ordering;

/// Fuzz for the lexicographic segment ordering.
const EPSILON: f64 = 1e-6;

/// Winding contribution of a segment.
///
/// A chain stores its points top-down regardless of how the polygon was
/// traversed; the direction records the traversal sense. Crossing a `Down`
/// chain from left to right increments the winding number, crossing an
/// `Up` chain decrements it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Direction {
    /// The polygon ran downward (+y) along this chain.
    Down,
    /// The polygon ran upward (-y) along this chain.
    Up,
}

impl Direction {
    #[inline]
    pub fn winding(self) -> i32 {
        match self {
            Direction::Down => 1,
            Direction::Up => -1,
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }
}

/// One monotone chain of an [`Svp`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SvpSeg {
    pub dir: Direction,
    /// At least two points, with non-decreasing y.
    pub points: Vec<Point>,
    pub bbox: Box2D,
}

impl SvpSeg {
    /// Builds a segment from top-down points, computing the bounding box
    /// (x range over all points, y range from the first and last point).
    pub fn new(dir: Direction, points: Vec<Point>) -> Self {
        debug_assert!(points.len() >= 2);
        let mut x_min = points[0].x;
        let mut x_max = points[0].x;
        for p in &points[1..] {
            if p.x < x_min {
                x_min = p.x;
            }
            if p.x > x_max {
                x_max = p.x;
            }
        }
        let bbox = Box2D::new(
            point(x_min, points[0].y),
            point(x_max, points[points.len() - 1].y),
        );
        SvpSeg { dir, points, bbox }
    }

    #[inline]
    pub fn top(&self) -> Point {
        self.points[0]
    }

    #[inline]
    pub fn bottom(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}

/// A sorted vector path.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Svp {
    pub segs: Vec<SvpSeg>,
}

impl Svp {
    pub fn new() -> Self {
        Svp { segs: Vec::new() }
    }

    /// Splits a path into monotone chains.
    ///
    /// Every subpath is treated as a closed polygon; unclosed subpaths
    /// are closed implicitly, since openness only matters to the stroke
    /// tessellator. The polygon is broken at each local y extremum;
    /// descending runs are reversed and tagged [`Direction::Up`].
    ///
    /// Callers that cannot guarantee degeneracy-free input (coincident
    /// points, exactly horizontal edges, collinear overlaps) should run
    /// [`perturb`] first; the sweep's tolerances assume it.
    pub fn from_path(path: &Path) -> Svp {
        let mut svp = Svp::new();
        let mut ring: Vec<Point> = Vec::new();
        for event in path.iter() {
            match event {
                Event::Begin { at } => {
                    ring.clear();
                    ring.push(at);
                }
                Event::Line { to, .. } => {
                    if to != *ring.last().unwrap() {
                        ring.push(to);
                    }
                }
                Event::End { .. } => {
                    if ring.last() == ring.first() && ring.len() > 1 {
                        ring.pop();
                    }
                    svp.add_ring(&ring);
                }
            }
        }
        svp.sort();
        svp
    }

    fn add_ring(&mut self, ring: &[Point]) {
        let n = ring.len();
        if n < 2 {
            return;
        }

        // Sign of dy for the edge leaving vertex i. Horizontal edges count
        // as descending so that a flat top still splits into two chains.
        let edge_down = |i: usize| ring[(i + 1) % n].y >= ring[i].y;

        // Start at a vertex where the direction changes; if there is none
        // the ring is degenerate (a zero-height polygon) and fills nothing.
        let mut start = n;
        for i in 0..n {
            if edge_down((i + n - 1) % n) != edge_down(i) {
                start = i;
                break;
            }
        }
        if start == n {
            return;
        }

        let mut i = start;
        let mut remaining = n;
        while remaining > 0 {
            let down = edge_down(i);
            let mut run = vec![ring[i]];
            while remaining > 0 && edge_down(i) == down {
                i = (i + 1) % n;
                run.push(ring[i]);
                remaining -= 1;
            }
            let dir = if down {
                Direction::Down
            } else {
                run.reverse();
                Direction::Up
            };
            self.segs.push(SvpSeg::new(dir, run));
        }
    }

    /// Sorts the segments lexicographically by (top.y, top.x, initial
    /// slope).
    pub fn sort(&mut self) {
        self.segs.sort_by(seg_compare);
    }

    /// Verifies the cleaned-SVP invariants: each segment is y-monotone
    /// with at least two points, and no two segments cross in their
    /// interiors.
    ///
    /// Quadratic; intended for tests and debugging.
    pub fn sanity_check(&self) -> Result<(), crate::InternalError> {
        use crate::InternalError;

        for seg in &self.segs {
            if seg.points.len() < 2 {
                return Err(InternalError::SegmentTooShort);
            }
            for w in seg.points.windows(2) {
                if w[1].y < w[0].y {
                    return Err(InternalError::NonMonotoneSegment);
                }
            }
        }

        for (i, a) in self.segs.iter().enumerate() {
            for b in &self.segs[i + 1..] {
                if a.bbox.min.y >= b.bbox.max.y || b.bbox.min.y >= a.bbox.max.y {
                    continue;
                }
                for ea in a.points.windows(2) {
                    for eb in b.points.windows(2) {
                        if edges_cross_interior(ea[0], ea[1], eb[0], eb[1]) {
                            return Err(InternalError::SegmentsCross);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Proper interior crossing test with a tolerance matching the sweep's
/// own fuzz: near-touching configurations do not count.
fn edges_cross_interior(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    let area = |p: Point, q: Point, r: Point| (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);

    let scale = (a1 - a0).length() * (b1 - b0).length();
    if scale == 0.0 {
        return false;
    }
    let tol = 1e-6 * scale;

    let d0 = area(a0, a1, b0);
    let d1 = area(a0, a1, b1);
    let d2 = area(b0, b1, a0);
    let d3 = area(b0, b1, a1);

    (d0 > tol && d1 < -tol || d0 < -tol && d1 > tol)
        && (d2 > tol && d3 < -tol || d2 < -tol && d3 > tol)
}

/// Fuzzy lexicographic ordering on (top.y, top.x), with the initial slope
/// (as a cross product) as the tie-break.
pub(crate) fn seg_compare(seg1: &SvpSeg, seg2: &SvpSeg) -> Ordering {
    let p1 = seg1.points[0];
    let p2 = seg2.points[0];
    if p1.y - EPSILON > p2.y {
        Ordering::Greater
    } else if p1.y + EPSILON < p2.y {
        Ordering::Less
    } else if p1.x - EPSILON > p2.x {
        Ordering::Greater
    } else if p1.x + EPSILON < p2.x {
        Ordering::Less
    } else {
        let q1 = seg1.points[1];
        let q2 = seg2.points[1];
        if (q1.x - p1.x) * (q2.y - p2.y) - (q1.y - p1.y) * (q2.x - p2.x) > 0.0 {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    }
}

/// A small multiplicative congruential generator, fixed-seeded so that
/// perturbation (and the test inputs built on it) is deterministic.
#[derive(Clone, Debug)]
pub(crate) struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new() -> Self {
        Lcg { state: 1 }
    }

    /// Uniform value in [0, 0x7fff].
    pub fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (self.state >> 16) & 0x7fff
    }

    /// Uniform value in [lo, hi).
    pub fn next_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * (self.next() as f64 / 32768.0)
    }
}

/// Displaces every coordinate by a deterministic pseudo-random amount in
/// (-1e-12, 1e-12).
///
/// This nudges coincident endpoints and collinear configurations off
/// degeneracy before segmentation, which the sweep-line intersector's
/// invariants rely on. The generator is fixed-seed: identical inputs
/// produce bit-identical outputs.
pub fn perturb(path: &Path) -> Path {
    let mut rng = Lcg::new();
    let mut builder = Path::builder();
    for event in path.iter() {
        match event {
            Event::Begin { at } => {
                builder.begin(perturb_point(at, &mut rng));
            }
            Event::Line { to, .. } => {
                builder.line_to(perturb_point(to, &mut rng));
            }
            Event::End { close, .. } => {
                builder.end(close);
            }
        }
    }
    builder.build()
}

fn perturb_point(p: Point, rng: &mut Lcg) -> Point {
    point(
        p.x + rng.next_f64(-1e-12, 1e-12),
        p.y + rng.next_f64(-1e-12, 1e-12),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
        Path::from_polygon(&[
            point(x0, y0),
            point(x1, y0),
            point(x1, y1),
            point(x0, y1),
        ])
    }

    #[test]
    fn rect_splits_into_two_chains() {
        let svp = Svp::from_path(&rect_path(1.0, 1.0, 9.0, 9.0));
        // The flat top and bottom edges fold into the two vertical chains.
        assert_eq!(svp.segs.len(), 2);
        let down: Vec<_> = svp
            .segs
            .iter()
            .filter(|s| s.dir == Direction::Down)
            .collect();
        let up: Vec<_> = svp.segs.iter().filter(|s| s.dir == Direction::Up).collect();
        assert_eq!(down.len(), 1);
        assert_eq!(up.len(), 1);
        for seg in &svp.segs {
            assert!(seg.points.len() >= 2);
            for w in seg.points.windows(2) {
                assert!(w[1].y >= w[0].y);
            }
        }
        // The downward chain carries the right edge, the upward one the
        // left edge.
        assert!(down[0].points.iter().any(|p| p.x == 9.0));
        assert!(up[0].points.iter().any(|p| p.x == 1.0));
    }

    #[test]
    fn triangle_chains() {
        let svp = Svp::from_path(&Path::from_polygon(&[
            point(0.0, 0.0),
            point(10.0, 10.0),
            point(-10.0, 10.0),
        ]));
        assert_eq!(svp.segs.len(), 2);
        // Both chains start at the apex.
        for seg in &svp.segs {
            assert_eq!(seg.top(), point(0.0, 0.0));
        }
    }

    #[test]
    fn segs_are_sorted() {
        let mut builder = Path::builder();
        for &(x, y) in &[(20.0, 5.0), (30.0, 15.0), (10.0, 15.0)] {
            if x == 20.0 {
                builder.begin(point(x, y));
            } else {
                builder.line_to(point(x, y));
            }
        }
        builder.close();
        let mut b2 = Path::builder();
        b2.begin(point(0.0, 0.0));
        b2.line_to(point(5.0, 10.0));
        b2.line_to(point(-5.0, 10.0));
        b2.close();

        let mut svp = Svp::from_path(&builder.build());
        let second = Svp::from_path(&b2.build());
        svp.segs.extend(second.segs);
        svp.sort();

        let mut last = svp.segs[0].top();
        for seg in &svp.segs[1..] {
            let top = seg.top();
            assert!(
                top.y > last.y - EPSILON
                    && (top.y > last.y + EPSILON || top.x > last.x - EPSILON)
            );
            last = top;
        }
    }

    #[test]
    fn perturb_is_deterministic_and_tiny() {
        let path = rect_path(1.0, 1.0, 9.0, 9.0);
        let a = perturb(&path);
        let b = perturb(&path);
        for (pa, pb) in a.points().iter().zip(b.points().iter()) {
            assert_eq!(pa, pb);
        }
        for (p, q) in path.points().iter().zip(a.points().iter()) {
            assert!((p.x - q.x).abs() < 1e-12);
            assert!((p.y - q.y).abs() < 1e-12);
            assert_ne!(p, q);
        }
    }

    #[test]
    fn sanity_check_flags_crossing() {
        // A clean rectangle passes.
        let svp = Svp::from_path(&rect_path(0.0, 0.0, 4.0, 4.0));
        assert!(svp.sanity_check().is_ok());

        // Two hand-built crossing chains do not.
        let bad = Svp {
            segs: vec![
                SvpSeg::new(
                    Direction::Down,
                    vec![point(0.0, 0.0), point(10.0, 10.0)],
                ),
                SvpSeg::new(
                    Direction::Up,
                    vec![point(10.0, 0.0), point(0.0, 10.0)],
                ),
            ],
        };
        assert!(bad.sanity_check().is_err());
    }
}
