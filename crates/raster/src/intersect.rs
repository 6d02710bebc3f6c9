//! The sweep-line intersector.
//!
//! Transforms an unsorted, possibly self-intersecting [`Svp`] into a
//! stream of non-crossing monotone segments, emitted to an [`SvpWriter`]
//! together with winding information. This is a Bentley-Ottmann style
//! sweep tailored to numerical robustness on flattened polygon input:
//! rather than trying to be exact, it relies on the pre-sweep
//! perturbation, a set of distance tolerances, and a commit pass that
//! defers winding emission to scanline boundaries so that same-scanline
//! reordering fuzz cannot produce spurious output edges.

use crate::geom::LineEquation;
use crate::math::{point, Point};
use crate::svp::Svp;
use crate::writer::{SegId, SvpWriter};
use crate::{InternalError, RasterError, RasterResult, UnsupportedParameter};
use crate::path::FillRule;
use crate::writer::RewindWriter;

/// Fuzz for insertion of new active segments.
const EPSILON_A: f64 = 1e-6;
/// Fuzz for crossing tests.
const EPSILON_B: f64 = 1e-6;
/// Threshold for breaking lines at point insertions.
const EPSILON_C: f64 = 1e-5;

#[cfg(debug_assertions)]
macro_rules! sweep_log {
    ($obj:ident, $fmt:expr) => (
        if $obj.log {
            println!($fmt);
        }
    );
    ($obj:ident, $fmt:expr, $($arg:tt)*) => (
        if $obj.log {
            println!($fmt, $($arg)*);
        }
    );
}

#[cfg(not(debug_assertions))]
macro_rules! sweep_log {
    ($obj:ident, $fmt:expr) => {};
    ($obj:ident, $fmt:expr, $($arg:tt)*) => {};
}

type ActiveId = u32;

const INVALID_ACTIVE_ID: ActiveId = u32::MAX;

#[inline]
fn valid(id: ActiveId) -> bool {
    id != INVALID_ACTIVE_ID
}

/// What a priority queue event refers to.
#[derive(Copy, Clone, Debug)]
enum EventData {
    /// Admit the next not-yet-active input segment.
    Admit,
    /// Advance the given active segment past the event point.
    Seg(ActiveId),
}

#[derive(Copy, Clone, Debug)]
struct PriPoint {
    x: f64,
    y: f64,
    data: EventData,
}

#[inline]
fn pri_less(a: &PriPoint, b: &PriPoint) -> bool {
    a.y < b.y || (a.y == b.y && a.x < b.x)
}

/// A binary min-heap on (y, x) lexicographic order.
struct PriQ {
    items: Vec<PriPoint>,
}

impl PriQ {
    fn new() -> Self {
        PriQ {
            items: Vec::with_capacity(16),
        }
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn bubble_up(&mut self, mut vacant: usize, missing: PriPoint) {
        while vacant > 0 {
            let parent = (vacant - 1) >> 1;
            if !pri_less(&missing, &self.items[parent]) {
                break;
            }
            self.items[vacant] = self.items[parent];
            vacant = parent;
        }
        self.items[vacant] = missing;
    }

    fn insert(&mut self, pt: PriPoint) {
        self.items.push(pt);
        let vacant = self.items.len() - 1;
        self.bubble_up(vacant, pt);
    }

    /// Pops the least event.
    fn pop(&mut self) -> Option<PriPoint> {
        if self.items.is_empty() {
            return None;
        }
        let result = self.items[0];
        let missing = self.items.pop().unwrap();
        if !self.items.is_empty() {
            self.sift_down_from_root(missing);
        }
        Some(result)
    }

    fn sift_down_from_root(&mut self, missing: PriPoint) {
        let n = self.items.len();
        let mut vacant = 0;
        let mut child = 2;
        while child < n {
            if pri_less(&self.items[child - 1], &self.items[child]) {
                child -= 1;
            }
            self.items[vacant] = self.items[child];
            vacant = child;
            child = (vacant + 1) << 1;
        }
        if child == n {
            self.items[vacant] = self.items[n - 1];
            vacant = n - 1;
        }
        self.bubble_up(vacant, missing);
    }
}

/// Sweep-line state for one input segment straddling the scan line.
struct ActiveSeg {
    wind_left: i32,
    delta_wind: i32,

    // Doubly linked active list, ordered in x along the sweep line.
    left: ActiveId,
    right: ActiveId,

    /// Index of the input segment in the source [`Svp`].
    in_seg: usize,
    /// Index of the next input point; the current edge runs from
    /// `points[in_curs - 1]` to `points[in_curs]`.
    in_curs: usize,

    /// Top and bottom x of the current (possibly split) edge.
    x: [f64; 2],
    y0: f64,
    y1: f64,
    /// Normalized line equation of the current edge; `a >= 0` for
    /// top-down edges.
    eq: LineEquation,
    /// Set for `\` edges (running right to left top to bottom is false;
    /// the flag is true when dx > 0), so `x[bneg ^ 1] <= x[bneg]`.
    bneg: bool,

    /// Whether `seg_id` refers to a live output segment.
    out: bool,
    seg_id: SegId,

    /// Bottom point (entry 0) plus pending intersection points, nearest
    /// last.
    stack: Vec<Point>,

    // Horizontal commit list linkage.
    in_horiz: bool,
    horiz_left: ActiveId,
    horiz_right: ActiveId,
    horiz_x: f64,
}

impl ActiveSeg {
    fn new() -> Self {
        ActiveSeg {
            wind_left: 0,
            delta_wind: 0,
            left: INVALID_ACTIVE_ID,
            right: INVALID_ACTIVE_ID,
            in_seg: 0,
            in_curs: 0,
            x: [0.0, 0.0],
            y0: 0.0,
            y1: 0.0,
            eq: LineEquation {
                a: 0.0,
                b: 0.0,
                c: 0.0,
            },
            bneg: false,
            out: false,
            seg_id: SegId::INVALID,
            stack: Vec::with_capacity(4),
            in_horiz: false,
            horiz_left: INVALID_ACTIVE_ID,
            horiz_right: INVALID_ACTIVE_ID,
            horiz_x: 0.0,
        }
    }

    /// x of the larger end of the current edge's x interval.
    #[inline]
    fn x_hi(&self) -> f64 {
        self.x[self.bneg as usize]
    }

    /// x of the smaller end of the current edge's x interval.
    #[inline]
    fn x_lo(&self) -> f64 {
        self.x[(self.bneg as usize) ^ 1]
    }
}

struct Intersector<'l> {
    input: &'l Svp,
    out: &'l mut dyn SvpWriter,

    pq: PriQ,

    segs: Vec<ActiveSeg>,
    free: Vec<ActiveId>,

    active_head: ActiveId,

    y: f64,
    horiz_first: ActiveId,
    horiz_last: ActiveId,

    /// Index of the next input segment to be admitted.
    in_curs: usize,

    log: bool,
}

impl<'l> Intersector<'l> {
    fn new(input: &'l Svp, out: &'l mut dyn SvpWriter) -> Self {
        #[cfg(debug_assertions)]
        let log = std::env::var("SABLE_FORCE_LOGGING").is_ok();
        #[cfg(not(debug_assertions))]
        let log = false;

        Intersector {
            input,
            out,
            pq: PriQ::new(),
            segs: Vec::new(),
            free: Vec::new(),
            active_head: INVALID_ACTIVE_ID,
            y: 0.0,
            horiz_first: INVALID_ACTIVE_ID,
            horiz_last: INVALID_ACTIVE_ID,
            in_curs: 0,
            log,
        }
    }

    #[inline]
    fn seg(&self, id: ActiveId) -> &ActiveSeg {
        &self.segs[id as usize]
    }

    #[inline]
    fn seg_mut(&mut self, id: ActiveId) -> &mut ActiveSeg {
        &mut self.segs[id as usize]
    }

    fn alloc_seg(&mut self) -> ActiveId {
        if let Some(id) = self.free.pop() {
            let slot = &mut self.segs[id as usize];
            let stack = std::mem::take(&mut slot.stack);
            *slot = ActiveSeg::new();
            slot.stack = stack;
            slot.stack.clear();
            id
        } else {
            self.segs.push(ActiveSeg::new());
            (self.segs.len() - 1) as ActiveId
        }
    }

    /// Sets the current-edge state (x interval, line equation, direction
    /// flag, bottom-point stack) from the input cursor, advances the
    /// cursor, and queues the bottom-point event.
    fn setup_seg(&mut self, id: ActiveId) {
        let (p0, p1) = {
            let s = self.seg(id);
            let pts = &self.input.segs[s.in_seg].points;
            (pts[s.in_curs], pts[s.in_curs + 1])
        };

        let s = self.seg_mut(id);
        s.in_curs += 1;
        s.eq = LineEquation::from_edge(p0, p1);
        s.bneg = p1.x - p0.x > 0.0;
        s.x = [p0.x, p1.x];
        s.y0 = p0.y;
        s.y1 = p1.y;
        s.stack.clear();
        s.stack.push(p1);

        self.pq.insert(PriPoint {
            x: p1.x,
            y: p1.y,
            data: EventData::Seg(id),
        });
    }

    /// Pushes an intersection point onto the segment's stack, making it
    /// the segment's current bottom, and queues the matching event.
    fn push_point(&mut self, id: ActiveId, x: f64, y: f64) {
        let s = self.seg_mut(id);
        s.stack.push(point(x, y));
        s.x[1] = x;
        s.y1 = y;

        self.pq.insert(PriPoint {
            x,
            y,
            data: EventData::Seg(id),
        });
    }

    /// Breaks an active segment at the scan line.
    ///
    /// `y` must be strictly between the current input edge's endpoints.
    /// Returns the x coordinate of the break point.
    fn break_at(&mut self, id: ActiveId, y: f64) -> f64 {
        let x = {
            let s = self.seg(id);
            let pts = &self.input.segs[s.in_seg].points;
            let p0 = pts[s.in_curs - 1];
            let p1 = pts[s.in_curs];
            p0.x + (p1.x - p0.x) * ((y - p0.y) / (p1.y - p0.y))
        };

        // With sane arithmetic x stays within the edge's x interval; the
        // push below also relies on that.
        self.push_point(id, x, y);
        x
    }

    /// Tests crossing of a pair of adjacent active segments, queueing the
    /// intersection point into both when they cross below the scan line.
    ///
    /// Returns true if the crossing happens at the current scan line, in
    /// which case the pair has been swapped in the active list and the
    /// caller needs to iterate.
    fn test_cross(&mut self, left_id: ActiveId, right_id: ActiveId) -> bool {
        let left_y1 = self.seg(left_id).y1;
        let right_y1 = self.seg(right_id).y1;

        sweep_log!(self, "test_cross {} <-> {}", left_id, right_id);

        if left_y1 < right_y1 {
            // Test left's bottom against the right segment.
            let left_x1 = self.seg(left_id).x[1];
            let right = self.seg(right_id);

            if left_x1 < right.x_lo() || left_y1 == right.y0 {
                return false;
            }
            let d = right.eq.signed_distance(left_x1, left_y1);
            if d < -EPSILON_C {
                return false;
            } else if d < EPSILON_C {
                log::warn!("test_cross: need to break");
            }
        } else if left_y1 > right_y1 {
            // Test right's bottom against the left segment.
            let right_x1 = self.seg(right_id).x[1];
            let left = self.seg(left_id);

            if right_x1 > left.x_hi() || right_y1 == left.y0 {
                return false;
            }
            let d = left.eq.signed_distance(right_x1, right_y1);
            if d > EPSILON_C {
                return false;
            } else if d > -EPSILON_C {
                log::warn!("test_cross: need to break");
            }
        } else {
            // Equal bottoms: ordered iff left's is not to the right.
            if self.seg(left_id).x[1] <= self.seg(right_id).x[1] {
                return false;
            }
        }

        // The segments cross. Find the intersection point by intersecting
        // the left segment's current input edge with the right's line.
        let (l0, l1) = {
            let s = self.seg(left_id);
            let pts = &self.input.segs[s.in_seg].points;
            (pts[s.in_curs - 1], pts[s.in_curs])
        };
        let right_eq = self.seg(right_id).eq;
        let d0 = right_eq.signed_distance(l0.x, l0.y);
        let d1 = right_eq.signed_distance(l1.x, l1.y);

        let mut x;
        let mut y;
        if d0 == d1 {
            x = l0.x;
            y = l0.y;
        } else {
            // Is this division always safe? It could possibly overflow.
            let t = d0 / (d0 - d1);
            if t <= 0.0 {
                x = l0.x;
                y = l0.y;
            } else if t >= 1.0 {
                x = l1.x;
                y = l1.y;
            } else {
                x = l0.x + t * (l1.x - l0.x);
                y = l0.y + t * (l1.y - l0.y);
            }
        }

        // Clamp the intersection point into the right segment's range.
        {
            let right = self.seg(right_id);
            if y < right.y0 {
                x = right.x[0];
                y = right.y0;
            } else if y > right.y1 {
                x = right.x[1];
                y = right.y1;
            } else if x < right.x_lo() {
                x = right.x_lo();
            } else if x > right.x_hi() {
                x = right.x_hi();
            }
        }

        if y == self.seg(left_id).y0 {
            if y != self.seg(right_id).y0 {
                log::warn!(
                    "test_cross: intersection ({}, {}) matches former top of {}, {}",
                    x,
                    y,
                    left_id,
                    right_id
                );
            }

            // The intersection takes place at the current scan line;
            // process it immediately by swapping the pair rather than
            // queueing the point.

            let ll = self.seg(left_id).left;
            let rr = self.seg(right_id).right;

            self.seg_mut(right_id).left = ll;
            if valid(ll) {
                self.seg_mut(ll).right = right_id;
            } else {
                self.active_head = right_id;
            }
            self.seg_mut(left_id).right = rr;
            if valid(rr) {
                self.seg_mut(rr).left = left_id;
            }
            self.seg_mut(left_id).left = right_id;
            self.seg_mut(right_id).right = left_id;

            return true;
        } else if y == self.seg(right_id).y0 {
            log::warn!(
                "test_cross: intersection ({}, {}) matches latter top of {}, {}",
                x,
                y,
                left_id,
                right_id
            );
        } else {
            sweep_log!(self, "inserting ({}, {}) into {}, {}", x, y, left_id, right_id);
            // Queue the intersection point into both segments.
            self.push_point(left_id, x, y);
            self.push_point(right_id, x, y);
        }
        false
    }

    /// Deletes a segment from the active list and recycles its slot.
    fn delete_active(&mut self, id: ActiveId) {
        let (left, right) = {
            let s = self.seg(id);
            (s.left, s.right)
        };
        if valid(left) {
            self.seg_mut(left).right = right;
        } else {
            self.active_head = right;
        }
        if valid(right) {
            self.seg_mut(right).left = left;
        }
        // The slot must not linger in the horizontal list once freed.
        if self.seg(id).in_horiz {
            self.unlink_horiz(id);
        }
        self.free.push(id);
    }

    fn unlink_horiz(&mut self, id: ActiveId) {
        let (hl, hr) = {
            let s = self.seg(id);
            (s.horiz_left, s.horiz_right)
        };
        if valid(hl) {
            self.seg_mut(hl).horiz_right = hr;
        } else {
            self.horiz_first = hr;
        }
        if valid(hr) {
            self.seg_mut(hr).horiz_left = hl;
        } else {
            self.horiz_last = hl;
        }
        let s = self.seg_mut(id);
        s.in_horiz = false;
        s.horiz_left = INVALID_ACTIVE_ID;
        s.horiz_right = INVALID_ACTIVE_ID;
    }

    /// Inserts the segment into the horizontal commit list, keeping the
    /// list in ascending `horiz_x` order.
    ///
    /// The commit routine processes clusters of equal `horiz_x` in active
    /// list order, so the relative order of equal keys here _should_ be
    /// irrelevant; `b` is still used as a secondary key as a belt and
    /// suspenders tactic.
    fn add_horiz(&mut self, id: ActiveId) {
        sweep_log!(self, "add_horiz {}, x = {}", id, self.seg(id).horiz_x);

        if self.seg(id).in_horiz {
            self.unlink_horiz(id);
        }

        let horiz_x = self.seg(id).horiz_x;
        let b = self.seg(id).eq.b;

        let mut place_right = INVALID_ACTIVE_ID;
        let mut place = self.horiz_last;
        while valid(place) {
            let p = self.seg(place);
            if !(p.horiz_x > horiz_x || (p.horiz_x == horiz_x && p.eq.b < b)) {
                break;
            }
            place_right = place;
            place = p.horiz_left;
        }

        if valid(place_right) {
            self.seg_mut(place_right).horiz_left = id;
        } else {
            self.horiz_last = id;
        }
        {
            let s = self.seg_mut(id);
            s.horiz_left = place;
            s.horiz_right = place_right;
            s.in_horiz = true;
        }
        if valid(place) {
            self.seg_mut(place).horiz_right = id;
        } else {
            self.horiz_first = id;
        }
    }

    /// Runs cross tests outward from `id` until the neighborhood
    /// stabilizes, following same-scanline swaps as they happen.
    fn insert_cross(&mut self, id: ActiveId) {
        let mut left = id;
        let mut right = id;
        loop {
            if valid(left) && valid(self.seg(left).left) {
                let ll = self.seg(left).left;
                if self.test_cross(ll, left) {
                    if left == right || !valid(right) {
                        right = self.seg(left).right;
                    }
                } else {
                    left = INVALID_ACTIVE_ID;
                }
            } else if valid(right) && valid(self.seg(right).right) {
                let rr = self.seg(right).right;
                if self.test_cross(right, rr) {
                    if left == right || !valid(left) {
                        left = self.seg(right).left;
                    }
                } else {
                    right = INVALID_ACTIVE_ID;
                }
            } else {
                break;
            }
        }
    }

    /// Slides the segment past the intersection point on top of its
    /// stack.
    fn process_intersection(&mut self, id: ActiveId) {
        {
            let s = self.seg_mut(id);
            let popped = s.stack.pop().unwrap();
            let new_bottom = *s.stack.last().unwrap();
            s.x[1] = new_bottom.x;
            s.y1 = new_bottom.y;
            s.x[0] = popped.x;
            s.y0 = popped.y;
            s.horiz_x = popped.x;
        }
        self.add_horiz(id);
        self.insert_cross(id);
    }

    /// Advances the segment's input cursor past its current bottom point,
    /// emitting the point and retiring the segment when it was the last.
    fn advance_cursor(&mut self, id: ActiveId) {
        let (emit, seg_id, x1, y1, at_end) = {
            let s = self.seg(id);
            let n_points = self.input.segs[s.in_seg].points.len();
            (
                s.out,
                s.seg_id,
                s.x[1],
                s.y1,
                s.in_curs + 1 == n_points,
            )
        };

        if emit {
            self.out.add_point(seg_id, x1, y1);
        }
        if at_end {
            let (left, right) = {
                let s = self.seg(id);
                (s.left, s.right)
            };
            if emit {
                self.out.close_segment(seg_id);
            }
            self.delete_active(id);
            if valid(left) && valid(right) {
                self.test_cross(left, right);
            }
        } else {
            self.seg_mut(id).horiz_x = x1;
            self.add_horiz(id);

            self.setup_seg(id);
            self.insert_cross(id);
        }
    }

    /// Commits the points in the horizontal list to the output.
    ///
    /// Much of the heavy lifting happens here: the active list can get
    /// out of order from ordinary intersection events and from numerical
    /// fuzz, and committing once per scanline (with winding numbers
    /// recomputed from the active list) tolerates both without emitting
    /// spurious zero-area edges.
    fn horiz_commit(&mut self) {
        sweep_log!(self, "horiz_commit: y={}", self.y);

        // The per-event bookkeeping is done; clear the membership flags
        // before walking the clusters.
        let mut t = self.horiz_first;
        while valid(t) {
            self.seg_mut(t).in_horiz = false;
            t = self.seg(t).horiz_right;
        }

        let mut seg = self.horiz_first;
        while valid(seg) {
            // Find a cluster with common horiz_x.
            let x = self.seg(seg).horiz_x;

            // Beginning of the cluster, in active list order.
            let mut curs = seg;
            while valid(self.seg(curs).left) {
                let l = self.seg(curs).left;
                if self.seg(l).horiz_x != x {
                    break;
                }
                curs = l;
            }

            let mut winding_number = {
                let l = self.seg(curs).left;
                if valid(l) {
                    self.seg(l).wind_left + self.seg(l).delta_wind
                } else {
                    0
                }
            };

            loop {
                sweep_log!(
                    self,
                    " winding_number = {} += {}",
                    winding_number,
                    self.seg(curs).delta_wind
                );
                let (out_flag, wind_left, delta_wind, horiz_x, seg_id) = {
                    let s = self.seg(curs);
                    (s.out, s.wind_left, s.delta_wind, s.horiz_x, s.seg_id)
                };
                if !out_flag || wind_left != winding_number {
                    if out_flag {
                        self.out.add_point(seg_id, horiz_x, self.y);
                        self.out.close_segment(seg_id);
                    }
                    let new_id =
                        self.out
                            .add_segment(winding_number, delta_wind, horiz_x, self.y);
                    let s = self.seg_mut(curs);
                    s.seg_id = new_id;
                    s.out = true;
                }
                self.seg_mut(curs).wind_left = winding_number;
                winding_number += delta_wind;
                let next = self.seg(curs).right;
                if !valid(next) || self.seg(next).horiz_x != x {
                    break;
                }
                curs = next;
            }

            // Skip past the cluster.
            loop {
                seg = self.seg(seg).horiz_right;
                if !valid(seg) || self.seg(seg).horiz_x != x {
                    break;
                }
            }
        }
        self.horiz_first = INVALID_ACTIVE_ID;
        self.horiz_last = INVALID_ACTIVE_ID;
    }

    /// Adds a point to the sweep, breaking neighbors within tolerance of
    /// it.
    ///
    /// `seg` is a segment near the insertion point (or INVALID for
    /// leftmost). Returns the segment immediately to the left of the new
    /// point, or INVALID if the point is leftmost.
    fn break_neighbors(&mut self, x: f64, y: f64, seg: ActiveId) -> ActiveId {
        let mut x_min = x;
        let mut x_max = x;

        let mut left;
        if !valid(seg) {
            left = self.active_head;
            if !valid(left) {
                return INVALID_ACTIVE_ID;
            }
        } else {
            left = seg;
        }
        let mut right = self.seg(left).right;
        let mut left_live = true;
        let mut right_live = valid(right);

        while left_live || right_live {
            if left_live {
                let l = self.seg(left);
                // It may be that one of these conjuncts turns out to be
                // always true. We test both anyway, to be defensive.
                if x <= l.x_hi() && y != l.y0 && y != l.y1 {
                    let d = l.eq.signed_distance(x_min, y);
                    if d < EPSILON_C {
                        let new_x = self.break_at(left, y);
                        if new_x > x_max {
                            x_max = new_x;
                            right_live = valid(right);
                        } else if new_x < x_min {
                            x_min = new_x;
                        }
                        left = self.seg(left).left;
                        left_live = valid(left);
                    } else {
                        left_live = false;
                    }
                } else {
                    left_live = false;
                }
            } else if right_live {
                let r = self.seg(right);
                if x <= r.x_lo() && y != r.y0 && y != r.y1 {
                    let d = r.eq.signed_distance(x_max, y);
                    if d > -EPSILON_C {
                        let new_x = self.break_at(right, y);
                        if new_x < x_min {
                            x_min = new_x;
                            left_live = valid(left);
                        } else if new_x >= x_max {
                            x_max = new_x;
                        }
                        right = self.seg(right).right;
                        right_live = valid(right);
                    } else {
                        right_live = false;
                    }
                } else {
                    right_live = false;
                }
            }
        }

        // Now (left, right) bounds the interval of broken segments. Walk
        // it to find the rightmost whose bottom is left of the new point.
        let mut test = if !valid(left) {
            self.active_head
        } else {
            self.seg(left).right
        };
        let mut result = left;
        if valid(test) && test != right {
            let mut x_test = self.seg(test).x[1];
            loop {
                if x_test <= x {
                    result = test;
                }
                test = self.seg(test).right;
                if test == right {
                    break;
                }
                let new_x = self.seg(test).x[1];
                if new_x < x_test {
                    log::warn!("break_neighbors: non-ascending x");
                }
                x_test = new_x;
            }
        }
        result
    }

    /// Materializes the next input segment as an active segment.
    fn admit_seg(&mut self, in_seg: usize) {
        let id = self.alloc_seg();
        {
            let s = self.seg_mut(id);
            s.in_seg = in_seg;
            s.in_curs = 0;
        }
        self.setup_seg(id);

        let top = self.input.segs[in_seg].points[0];
        let (x0, y0) = (top.x, top.y);

        // Find the insertion place for the new segment. This is a
        // left-to-right scan; a binary search would do as well once the
        // ordering is trusted.
        let mut last = INVALID_ACTIVE_ID;
        let mut test = self.active_head;
        while valid(test) {
            let t = self.seg(test);
            if x0 < t.x_hi() {
                if x0 < t.x_lo() {
                    break;
                }
                if t.eq.signed_distance(x0, y0) < 0.0 {
                    break;
                }
            }
            last = test;
            test = t.right;
        }

        let left = self.break_neighbors(x0, y0, last);
        self.seg_mut(id).left = left;
        let right;
        if !valid(left) {
            right = self.active_head;
            self.active_head = id;
        } else {
            right = self.seg(left).right;
            self.seg_mut(left).right = id;
        }
        self.seg_mut(id).right = right;
        if valid(right) {
            self.seg_mut(right).left = id;
        }

        {
            let delta = self.input.segs[in_seg].dir.winding();
            let s = self.seg_mut(id);
            s.delta_wind = delta;
            s.horiz_x = x0;
        }
        self.add_horiz(id);

        while valid(self.seg(id).left) {
            let l = self.seg(id).left;
            if !self.test_cross(l, id) {
                break;
            }
        }
        while valid(self.seg(id).right) {
            let r = self.seg(id).right;
            if !self.test_cross(id, r) {
                break;
            }
        }
    }

    #[cfg(debug_assertions)]
    fn print_active(&self) {
        if !self.log {
            return;
        }
        println!("Active list (y = {}):", self.y);
        let mut id = self.active_head;
        while valid(id) {
            let s = self.seg(id);
            println!(
                " {}: ({}, {})-({}, {}), (a, b, c) = ({}, {}, {})",
                id, s.x[0], s.y0, s.x[1], s.y1, s.eq.a, s.eq.b, s.eq.c
            );
            id = s.right;
        }
    }

    /// Verifies the active list's pairwise ordering invariant. Too slow
    /// for production; only run under debug_assertions.
    #[cfg(debug_assertions)]
    fn sanity_check(&self) {
        let mut last = INVALID_ACTIVE_ID;
        let mut id = self.active_head;
        while valid(id) {
            let seg = self.seg(id);
            if seg.left != last {
                log::warn!("sanity_check: last={}, seg.left={}", last, seg.left);
            }
            if valid(last) {
                let prev = self.seg(last);
                // Pairwise compare bottoms with the previous seg.
                if prev.y1 < seg.y1 {
                    if !(prev.x[1] < seg.x_lo() || prev.y1 == seg.y0) {
                        let d = seg.eq.signed_distance(prev.x[1], prev.y1);
                        if d >= -EPSILON_C {
                            log::warn!(
                                "sanity_check: bottom ({}, {}) of {} is not clear of {} to right (d = {})",
                                prev.x[1], prev.y1, last, id, d
                            );
                        }
                    }
                } else if prev.y1 > seg.y1 {
                    if !(seg.x[1] > prev.x_hi() || seg.y1 == prev.y0) {
                        let d = prev.eq.signed_distance(seg.x[1], seg.y1);
                        if d <= EPSILON_C {
                            log::warn!(
                                "sanity_check: bottom ({}, {}) of {} is not clear of {} to left (d = {})",
                                seg.x[1], seg.y1, id, last, d
                            );
                        }
                    }
                } else if prev.x[1] > seg.x[1] {
                    log::warn!(
                        "sanity_check: bottoms ({}, {}) of {} and ({}, {}) of {} out of order",
                        prev.x[1], prev.y1, last, seg.x[1], seg.y1, id
                    );
                }
            }
            last = id;
            id = seg.right;
        }
    }

    fn run(&mut self) {
        if self.input.segs.is_empty() {
            return;
        }

        let first = self.input.segs[0].points[0];
        self.y = first.y;
        self.pq.insert(PriPoint {
            x: first.x,
            y: first.y,
            data: EventData::Admit,
        });

        #[cfg(debug_assertions)]
        let mut count = 0;

        while let Some(pri) = self.pq.pop() {
            #[cfg(debug_assertions)]
            {
                sweep_log!(self, "\nIntersector step {}", count);
                count += 1;
                self.print_active();
                sweep_log!(
                    self,
                    "priq choose ({}, {}) {:?}",
                    pri.x,
                    pri.y,
                    pri.data
                );
                self.sanity_check();
            }

            if self.y != pri.y {
                self.horiz_commit();
                self.y = pri.y;
            }

            match pri.data {
                EventData::Admit => {
                    let in_seg = self.in_curs;
                    self.in_curs += 1;
                    self.admit_seg(in_seg);
                    if self.in_curs < self.input.segs.len() {
                        let next = self.input.segs[self.in_curs].points[0];
                        self.pq.insert(PriPoint {
                            x: next.x,
                            y: next.y,
                            data: EventData::Admit,
                        });
                    }
                }
                EventData::Seg(id) => {
                    if self.seg(id).stack.len() > 1 {
                        self.process_intersection(id);
                    } else {
                        self.advance_cursor(id);
                    }
                }
            }
        }

        self.horiz_commit();
    }
}

fn validate_input(input: &Svp) -> RasterResult {
    for seg in &input.segs {
        if seg.points.len() < 2 {
            return Err(InternalError::SegmentTooShort.into());
        }
        for w in seg.points.windows(2) {
            if w[0].x.is_nan() || w[0].y.is_nan() || w[1].x.is_nan() || w[1].y.is_nan() {
                return Err(UnsupportedParameter::PositionIsNaN.into());
            }
            if w[1].y < w[0].y {
                return Err(InternalError::NonMonotoneSegment.into());
            }
        }
    }
    Ok(())
}

/// Computes the intersections of an SVP's segments, feeding the output
/// writer a stream of non-crossing segments annotated with winding
/// numbers.
///
/// The input must be sorted ([`Svp::from_path`] produces it sorted) with
/// y-monotone segments of at least two points each.
pub fn intersect(input: &Svp, out: &mut dyn SvpWriter) -> RasterResult {
    validate_input(input)?;
    Intersector::new(input, out).run();
    Ok(())
}

impl Svp {
    /// Resolves self-intersections and applies the fill rule, returning
    /// the cleaned SVP whose segments bound the filled region.
    pub fn rewound(&self, rule: FillRule) -> Result<Svp, RasterError> {
        let mut writer = RewindWriter::new(rule);
        intersect(self, &mut writer)?;
        Ok(writer.reap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;
    use crate::path::Path;
    use crate::svp::{perturb, Direction};
    use crate::writer::DebugWriter;

    fn diamond() -> Svp {
        Svp::from_path(&perturb(&Path::from_polygon(&[
            point(5.0, 0.0),
            point(10.0, 5.0),
            point(5.0, 10.0),
            point(0.0, 5.0),
        ])))
    }

    #[test]
    fn pri_q_orders_events() {
        let mut pq = PriQ::new();
        for &(x, y) in &[(3.0, 1.0), (0.0, 2.0), (5.0, 0.0), (1.0, 1.0), (2.0, 0.0)] {
            pq.insert(PriPoint {
                x,
                y,
                data: EventData::Admit,
            });
        }
        let mut popped = Vec::new();
        while let Some(p) = pq.pop() {
            popped.push((p.y, p.x));
        }
        let mut sorted = popped.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(popped, sorted);
    }

    #[test]
    fn simple_polygon_survives_rewind() {
        let clean = diamond().rewound(crate::path::FillRule::NonZero).unwrap();
        assert_eq!(clean.segs.len(), 2);
        assert!(clean.sanity_check().is_ok());
        let down = clean
            .segs
            .iter()
            .filter(|s| s.dir == Direction::Down)
            .count();
        assert_eq!(down, 1);
    }

    #[test]
    fn bowtie_is_uncrossed() {
        // Self-crossing bowtie; after cleanup no two segments cross and
        // under the non-zero rule both triangles are kept.
        let path = Path::from_polygon(&[
            point(0.0, 0.0),
            point(10.0, 10.0),
            point(10.0, 0.0),
            point(0.0, 10.0),
        ]);
        let clean = Svp::from_path(&perturb(&path))
            .rewound(crate::path::FillRule::NonZero)
            .unwrap();
        assert!(clean.sanity_check().is_ok());
        assert!(!clean.segs.is_empty());
        // The crossing introduces a vertex near the center on every
        // output chain side.
        let mut touches_center = 0;
        for seg in &clean.segs {
            for p in &seg.points {
                if (p.x - 5.0).abs() < 1e-6 && (p.y - 5.0).abs() < 1e-6 {
                    touches_center += 1;
                }
            }
        }
        assert!(touches_center >= 2);
    }

    #[test]
    fn writer_stream_shape() {
        let mut w = DebugWriter::new();
        intersect(&diamond(), &mut w).unwrap();
        // Two boundary chains and two interior-free transitions: every
        // segment gets added, extended and closed.
        use crate::writer::WriterEvent;
        let adds = w
            .events
            .iter()
            .filter(|e| matches!(e, WriterEvent::AddSegment { .. }))
            .count();
        let closes = w
            .events
            .iter()
            .filter(|e| matches!(e, WriterEvent::CloseSegment { .. }))
            .count();
        assert_eq!(adds, 2);
        assert_eq!(closes, 2);
    }

    #[test]
    fn empty_input() {
        let mut w = DebugWriter::new();
        intersect(&Svp::new(), &mut w).unwrap();
        assert!(w.events.is_empty());
    }
}
