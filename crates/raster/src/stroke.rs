//! Stroke tessellation: converts a polyline plus width, join and cap
//! styles into the outline of the stroked region.
//!
//! The outline is built from two parallel chains offset half a line
//! width to each side of the direction of travel. It is not guaranteed
//! simple: joins may fold it over itself (deliberately so on the inside
//! of sharp turns), and the result is meant to be cleaned up by the
//! sweep-line intersector under the non-zero rule, which
//! [`stroke_path_to_svp`] does in one go.

use arrayvec::ArrayVec;
use crate::math::{point, vector, Point, Vector};
use crate::path::{Event, FillRule, LineCap, LineJoin, Path, PathEvent};
use crate::svp::{perturb, Svp};
use crate::{RasterError, UnsupportedParameter};

const EPSILON_2: f64 = 1e-12;

/// Parameters for the stroke tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct StrokeOptions {
    /// What cap to use at the start of each sub-path.
    ///
    /// Default value: `LineCap::Butt`.
    pub start_cap: LineCap,

    /// What cap to use at the end of each sub-path.
    ///
    /// Default value: `LineCap::Butt`.
    pub end_cap: LineCap,

    /// See the SVG specification.
    ///
    /// Default value: `LineJoin::Miter`.
    pub line_join: LineJoin,

    /// Line width.
    ///
    /// Default value: `StrokeOptions::DEFAULT_LINE_WIDTH`.
    pub line_width: f64,

    /// See the SVG specification.
    ///
    /// Must be greater than or equal to 1.0.
    /// Default value: `StrokeOptions::DEFAULT_MITER_LIMIT`.
    pub miter_limit: f64,

    /// Maximum distance between a round join or cap and its polygonal
    /// approximation.
    ///
    /// Default value: `StrokeOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f64,
}

impl StrokeOptions {
    /// Minimum miter limit as defined by the SVG specification.
    pub const MINIMUM_MITER_LIMIT: f64 = 1.0;
    /// Default miter limit as defined by the SVG specification.
    pub const DEFAULT_MITER_LIMIT: f64 = 4.0;
    pub const DEFAULT_LINE_CAP: LineCap = LineCap::Butt;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Miter;
    pub const DEFAULT_LINE_WIDTH: f64 = 1.0;
    pub const DEFAULT_TOLERANCE: f64 = 0.1;

    pub const DEFAULT: Self = StrokeOptions {
        start_cap: Self::DEFAULT_LINE_CAP,
        end_cap: Self::DEFAULT_LINE_CAP,
        line_join: Self::DEFAULT_LINE_JOIN,
        line_width: Self::DEFAULT_LINE_WIDTH,
        miter_limit: Self::DEFAULT_MITER_LIMIT,
        tolerance: Self::DEFAULT_TOLERANCE,
    };

    #[inline]
    pub const fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    #[inline]
    pub const fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self.end_cap = cap;
        self
    }

    #[inline]
    pub const fn with_start_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self
    }

    #[inline]
    pub const fn with_end_cap(mut self, cap: LineCap) -> Self {
        self.end_cap = cap;
        self
    }

    #[inline]
    pub const fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        assert!(limit >= Self::MINIMUM_MITER_LIMIT);
        self.miter_limit = limit;
        self
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A context object that tessellates stroke outlines.
#[derive(Default)]
pub struct StrokeTessellator {
    // The two parallel chains: forw runs to the right of the direction
    // of travel, rev to its left.
    forw: Vec<Point>,
    rev: Vec<Point>,
}

impl StrokeTessellator {
    pub fn new() -> Self {
        StrokeTessellator::default()
    }

    /// Computes the stroked outline of a path from an event iterator.
    pub fn tessellate(
        &mut self,
        input: impl IntoIterator<Item = PathEvent>,
        options: &StrokeOptions,
    ) -> Result<Path, RasterError> {
        if !(options.line_width > 0.0) || !options.line_width.is_finite() {
            return Err(UnsupportedParameter::InvalidLineWidth.into());
        }
        if !(options.miter_limit >= StrokeOptions::MINIMUM_MITER_LIMIT) {
            return Err(UnsupportedParameter::InvalidMiterLimit.into());
        }

        let mut builder = Path::builder();
        let mut subpath: Vec<Point> = Vec::new();
        for event in input {
            match event {
                Event::Begin { at } => {
                    check_point(at)?;
                    subpath.clear();
                    subpath.push(at);
                }
                Event::Line { to, .. } => {
                    check_point(to)?;
                    // Coincident vertices would produce zero-length
                    // normals; drop them here.
                    if to != *subpath.last().unwrap() {
                        subpath.push(to);
                    }
                }
                Event::End { close, .. } => {
                    let mut closed = close;
                    if subpath.len() > 1 && subpath.first() == subpath.last() {
                        subpath.pop();
                        closed = true;
                    }
                    self.stroke_subpath(&mut builder, &subpath, closed, options);
                }
            }
        }
        Ok(builder.build())
    }

    /// Computes the stroked outline of a path.
    pub fn tessellate_path(
        &mut self,
        path: &Path,
        options: &StrokeOptions,
    ) -> Result<Path, RasterError> {
        self.tessellate(path.iter(), options)
    }

    fn stroke_subpath(
        &mut self,
        builder: &mut crate::path::Builder,
        pts: &[Point],
        closed: bool,
        options: &StrokeOptions,
    ) {
        let n = pts.len();
        if n < 2 {
            return;
        }

        self.forw.clear();
        self.rev.clear();

        let half_width = 0.5 * options.line_width;

        if closed {
            // We do not know what the first vertex joins with until the
            // last edge comes around, so its join is emitted last.
            for i in 1..n {
                self.join_at(pts[i - 1], pts[i], pts[(i + 1) % n], options, half_width);
            }
            self.join_at(pts[n - 1], pts[0], pts[1], options, half_width);

            // Forward chain forward and reverse chain reversed, as two
            // closed subpaths forming the annulus.
            builder.begin(self.forw[self.forw.len() - 1]);
            for j in 0..self.forw.len() - 1 {
                builder.line_to(self.forw[j]);
            }
            builder.close();

            builder.begin(self.rev[0]);
            for j in (1..self.rev.len()).rev() {
                builder.line_to(self.rev[j]);
            }
            builder.close();
        } else {
            for i in 1..n - 1 {
                self.join_at(pts[i - 1], pts[i], pts[i + 1], options, half_width);
            }

            // Cap at the end goes onto forw so that forw is never empty.
            let mut outline = std::mem::take(&mut self.forw);
            cap_points(
                &mut outline,
                pts[n - 2],
                pts[n - 1],
                options.end_cap,
                half_width,
                options.tolerance,
            );
            for j in (0..self.rev.len()).rev() {
                outline.push(self.rev[j]);
            }
            cap_points(
                &mut outline,
                pts[1],
                pts[0],
                options.start_cap,
                half_width,
                options.tolerance,
            );

            builder.begin(outline[0]);
            for p in &outline[1..] {
                builder.line_to(*p);
            }
            builder.close();

            self.forw = outline;
        }
    }

    /// Brings both chains past `vertex`, joining the edge from `prev`
    /// with the edge to `next`.
    fn join_at(
        &mut self,
        prev: Point,
        vertex: Point,
        next: Point,
        options: &StrokeOptions,
        half_width: f64,
    ) {
        let d0 = vertex - prev;
        let d1 = next - vertex;

        // Half-width normals of the two edges, rotated counterclockwise
        // from the direction of travel.
        let scale0 = half_width / d0.length();
        let dl0 = vector(d0.y * scale0, -d0.x * scale0);
        let scale1 = half_width / d1.length();
        let dl1 = vector(d1.y * scale1, -d1.x * scale1);

        // Positive for positive area (a left turn).
        let cross = d1.x * d0.y - d0.x * d1.y;

        let dm = (dl0 + dl1) * 0.5;
        let dmr2 = dm.square_length();

        let mut join = options.line_join;
        if join == LineJoin::Miter
            && dmr2 * options.miter_limit * options.miter_limit < half_width * half_width
        {
            join = LineJoin::Bevel;
        }

        // The miter point offset. Degenerate when the edges nearly
        // reverse (dmr2 ~ 0); every consumer below guards against that.
        let dm = dm * (half_width * half_width / dmr2);

        if cross * cross < EPSILON_2 && d0.dot(d1) >= 0.0 {
            // Going straight.
            self.forw.push(vertex - dl0);
            self.rev.push(vertex + dl0);
        } else if cross > 0.0 {
            // Left turn: forw is outside and rev is inside.
            for p in inner_join(vertex, d0, d1, dl0, dl1, dm, 1.0) {
                self.rev.push(p);
            }
            match join {
                LineJoin::Bevel => {
                    self.forw.push(vertex - dl0);
                    self.forw.push(vertex - dl1);
                }
                LineJoin::Miter => {
                    self.forw.push(vertex - dm);
                }
                LineJoin::Round => {
                    round_points(&mut self.forw, vertex, -dl0, -dl1, options.tolerance);
                }
            }
        } else {
            // Right turn: rev is outside and forw is inside.
            for p in inner_join(vertex, d0, d1, dl0, dl1, dm, -1.0) {
                self.forw.push(p);
            }
            match join {
                LineJoin::Bevel => {
                    self.rev.push(vertex + dl0);
                    self.rev.push(vertex + dl1);
                }
                LineJoin::Miter => {
                    self.rev.push(vertex + dm);
                }
                LineJoin::Round => {
                    round_points(&mut self.rev, vertex, dl0, dl1, options.tolerance);
                }
            }
        }
    }
}

/// The inside of a join: a single crossing point when the miter point
/// provably stays inside both adjacent edge rectangles, otherwise a
/// loop-de-loop triplet through the vertex itself, which the fill-rule
/// cleanup resolves even when the chain folds over itself.
fn inner_join(
    vertex: Point,
    d0: Vector,
    d1: Vector,
    dl0: Vector,
    dl1: Vector,
    dm: Vector,
    side: f64,
) -> ArrayVec<Point, 3> {
    let mut out = ArrayVec::new();
    let m = dm * side;
    if (d0 + m).dot(d0) > 0.0 && (d1 - m).dot(d1) > 0.0 {
        out.push(vertex + m);
    } else {
        out.push(vertex + dl0 * side);
        out.push(vertex);
        out.push(vertex + dl1 * side);
    }
    out
}

/// Appends the points of a circular arc around `center` from offset
/// `from` to offset `to` (both included), flattened to `tolerance`.
fn round_points(chain: &mut Vec<Point>, center: Point, from: Vector, to: Vector, tolerance: f64) {
    chain.push(center + from);
    let radius = from.length();
    let a0 = from.y.atan2(from.x);
    let a1 = to.y.atan2(to.x);
    let mut sweep = a1 - a0;
    // Joins turn by less than half a circle; normalize accordingly.
    if sweep > std::f64::consts::PI {
        sweep -= 2.0 * std::f64::consts::PI;
    } else if sweep < -std::f64::consts::PI {
        sweep += 2.0 * std::f64::consts::PI;
    }
    arc_interior(chain, center, radius, a0, sweep, tolerance);
    chain.push(center + to);
}

/// Interior points of an arc (endpoints excluded).
fn arc_interior(
    chain: &mut Vec<Point>,
    center: Point,
    radius: f64,
    a0: f64,
    sweep: f64,
    tolerance: f64,
) {
    // The lower bound keeps pathological tolerances from exploding the
    // point count.
    let max_step = if tolerance < radius {
        (2.0 * (1.0 - tolerance / radius).acos()).max(1e-2)
    } else {
        std::f64::consts::PI
    };
    let n = (sweep.abs() / max_step).ceil().max(1.0) as usize;
    for k in 1..n {
        let a = a0 + sweep * (k as f64 / n as f64);
        chain.push(point(center.x + radius * a.cos(), center.y + radius * a.sin()));
    }
}

/// Caps the endpoint `to`, approached from `from`, appending the cap's
/// points right side first.
fn cap_points(
    out: &mut Vec<Point>,
    from: Point,
    to: Point,
    cap: LineCap,
    half_width: f64,
    tolerance: f64,
) {
    let d = to - from;
    let scale = half_width / d.length();
    let dl = vector(d.y * scale, -d.x * scale);
    match cap {
        LineCap::Butt => {
            out.push(to - dl);
            out.push(to + dl);
        }
        LineCap::Square => {
            let ext = vector(d.x * scale, d.y * scale);
            out.push(to - dl + ext);
            out.push(to + dl + ext);
        }
        LineCap::Round => {
            // Half circle from the right offset to the left one, bulging
            // in the direction of travel.
            let a0 = (-dl.y).atan2(-dl.x);
            out.push(to - dl);
            arc_interior(out, to, half_width, a0, -std::f64::consts::PI, tolerance);
            out.push(to + dl);
        }
    }
}

fn check_point(p: Point) -> Result<(), RasterError> {
    if p.x.is_nan() || p.y.is_nan() {
        return Err(UnsupportedParameter::PositionIsNaN.into());
    }
    Ok(())
}

/// Strokes a path all the way to a cleaned SVP: outline, perturbation,
/// monotone segmentation, then sweep cleanup under the non-zero rule.
pub fn stroke_path_to_svp(path: &Path, options: &StrokeOptions) -> Result<Svp, RasterError> {
    let mut tessellator = StrokeTessellator::new();
    let outline = tessellator.tessellate_path(path, options)?;
    let outline = perturb(&outline);
    Svp::from_path(&outline).rewound(FillRule::NonZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    fn outline_points(path: &Path) -> Vec<Point> {
        path.points().to_vec()
    }

    #[test]
    fn horizontal_line_butt_outline() {
        let mut b = Path::builder();
        b.begin(point(10.0, 50.0));
        b.line_to(point(90.0, 50.0));
        b.end(false);

        let mut tess = StrokeTessellator::new();
        let outline = tess
            .tessellate_path(&b.build(), &StrokeOptions::default().with_line_width(10.0))
            .unwrap();

        let pts = outline_points(&outline);
        assert_eq!(pts.len(), 4);
        let bbox = outline.bounding_box();
        assert_eq!(bbox.min, point(10.0, 45.0));
        assert_eq!(bbox.max, point(90.0, 55.0));
    }

    #[test]
    fn square_cap_extends_past_endpoints() {
        let mut b = Path::builder();
        b.begin(point(10.0, 50.0));
        b.line_to(point(90.0, 50.0));
        b.end(false);

        let mut tess = StrokeTessellator::new();
        let options = StrokeOptions::default()
            .with_line_width(10.0)
            .with_line_cap(LineCap::Square);
        let outline = tess.tessellate_path(&b.build(), &options).unwrap();
        let bbox = outline.bounding_box();
        assert_eq!(bbox.min, point(5.0, 45.0));
        assert_eq!(bbox.max, point(95.0, 55.0));
    }

    #[test]
    fn round_cap_is_flattened_arc() {
        let mut b = Path::builder();
        b.begin(point(0.0, 0.0));
        b.line_to(point(10.0, 0.0));
        b.end(false);

        let mut tess = StrokeTessellator::new();
        let options = StrokeOptions::default()
            .with_line_width(4.0)
            .with_line_cap(LineCap::Round);
        let outline = tess.tessellate_path(&b.build(), &options).unwrap();
        // More vertices than the butt rectangle, and every cap vertex
        // stays within half a width of the endpoints.
        let pts = outline_points(&outline);
        assert!(pts.len() > 4);
        let bbox = outline.bounding_box();
        assert!(bbox.max.x <= 12.0 + 1e-9);
        assert!(bbox.min.x >= -2.0 - 1e-9);
    }

    #[test]
    fn closed_square_makes_annulus() {
        let square = Path::from_polygon(&[
            point(0.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
            point(0.0, 10.0),
        ]);
        let mut tess = StrokeTessellator::new();
        let outline = tess
            .tessellate_path(&square, &StrokeOptions::default().with_line_width(2.0))
            .unwrap();

        // Two closed subpaths.
        let mut begins = 0;
        for event in &outline {
            if let Event::Begin { .. } = event {
                begins += 1;
            }
        }
        assert_eq!(begins, 2);

        // Outer boundary reaches one half width outside the square.
        let bbox = outline.bounding_box();
        assert_eq!(bbox.min, point(-1.0, -1.0));
        assert_eq!(bbox.max, point(11.0, 11.0));
    }

    #[test]
    fn sharp_miter_demotes_to_bevel() {
        // A hairpin: the miter would be enormous, so the outside must
        // fall back to two bevel points.
        let mut b = Path::builder();
        b.begin(point(0.0, 0.0));
        b.line_to(point(100.0, 1.0));
        b.line_to(point(0.0, 2.0));
        b.end(false);

        let mut tess = StrokeTessellator::new();
        let outline = tess
            .tessellate_path(&b.build(), &StrokeOptions::default().with_line_width(2.0))
            .unwrap();

        // The outline may not wander far past the geometry: the miter
        // point for this near-reversal would lie ~100 units out.
        let bbox = outline.bounding_box();
        assert!(bbox.max.x < 110.0, "miter point escaped: {:?}", bbox);
        assert!(!outline_points(&outline).is_empty());
    }

    #[test]
    fn rejects_bad_width() {
        let mut tess = StrokeTessellator::new();
        let path = Path::from_polygon(&[point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)]);
        assert!(tess
            .tessellate_path(&path, &StrokeOptions::default().with_line_width(0.0))
            .is_err());
    }

    #[test]
    fn stroke_pipeline_produces_clean_svp() {
        let mut b = Path::builder();
        b.begin(point(10.0, 50.0));
        b.line_to(point(90.0, 50.0));
        b.end(false);
        let svp = stroke_path_to_svp(
            &b.build(),
            &StrokeOptions::default().with_line_width(10.0),
        )
        .unwrap();
        assert!(svp.sanity_check().is_ok());
        assert!(!svp.segs.is_empty());
        // The stroked region spans the expected rectangle.
        let mut y_min = f64::MAX;
        let mut y_max = f64::MIN;
        for seg in &svp.segs {
            y_min = y_min.min(seg.bbox.min.y);
            y_max = y_max.max(seg.bbox.max.y);
        }
        assert!((y_min - 45.0).abs() < 1e-6);
        assert!((y_max - 55.0).abs() < 1e-6);
    }
}
