//! Output assembly for the sweep-line intersector.
//!
//! The intersector does not build its output directly; it drives an
//! [`SvpWriter`] with a stream of winding-annotated segment events. The
//! stock implementation is the fill-rule [`RewindWriter`], which keeps
//! only the edges forming the boundary of the filled region.

use crate::math::{point, Box2D};
use crate::path::FillRule;
use crate::svp::{Direction, Svp, SvpSeg};

/// Identifies an output segment of a writer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SegId(pub u32);

impl SegId {
    /// Returned by [`SvpWriter::add_segment`] for segments the writer
    /// discards; subsequent `add_point`/`close_segment` calls with it are
    /// no-ops.
    pub const INVALID: SegId = SegId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != SegId::INVALID
    }

    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

/// A consumer of the intersector's output stream.
///
/// `wind_left` is the winding number just left of the new segment and
/// `delta_wind` (±1) the jump the segment makes; `(x, y)` is its top
/// point.
pub trait SvpWriter {
    fn add_segment(&mut self, wind_left: i32, delta_wind: i32, x: f64, y: f64) -> SegId;
    fn add_point(&mut self, seg_id: SegId, x: f64, y: f64);
    fn close_segment(&mut self, seg_id: SegId);
}

/// The fill-rule rewinder: materializes only segments lying on the
/// boundary between filled and unfilled regions under `rule`.
pub struct RewindWriter {
    rule: FillRule,
    segs: Vec<SvpSeg>,
}

impl RewindWriter {
    pub fn new(rule: FillRule) -> Self {
        RewindWriter {
            rule,
            segs: Vec::new(),
        }
    }

    /// Takes the accumulated output.
    pub fn reap(self) -> Svp {
        Svp { segs: self.segs }
    }
}

impl SvpWriter for RewindWriter {
    fn add_segment(&mut self, wind_left: i32, delta_wind: i32, x: f64, y: f64) -> SegId {
        let wind_right = wind_left + delta_wind;
        let left_filled = self.rule.is_in(wind_left);
        let right_filled = self.rule.is_in(wind_right);

        if left_filled == right_filled {
            // Not a boundary edge; discard now.
            return SegId::INVALID;
        }

        let seg_id = SegId(self.segs.len() as u32);
        self.segs.push(SvpSeg {
            dir: if right_filled {
                Direction::Down
            } else {
                Direction::Up
            },
            points: vec![point(x, y)],
            bbox: Box2D::new(point(x, y), point(x, y)),
        });
        seg_id
    }

    fn add_point(&mut self, seg_id: SegId, x: f64, y: f64) {
        if !seg_id.is_valid() {
            // Omitted segment.
            return;
        }

        let seg = &mut self.segs[seg_id.to_usize()];
        seg.points.push(point(x, y));
        if x < seg.bbox.min.x {
            seg.bbox.min.x = x;
        }
        // TODO: this comparison looks like it wants to be against max.y
        // (it mirrors the historical behavior); grow a pixel-diff baseline
        // before touching it. Rendering only consumes the y range.
        if y < seg.bbox.max.x {
            seg.bbox.max.x = x;
        }
        seg.bbox.max.y = y;
    }

    fn close_segment(&mut self, _seg_id: SegId) {
        // Not needed here. A potential future optimization is to merge
        // segments that can be merged safely.
    }
}

/// Records the raw writer event stream; useful to inspect what the
/// intersector emits in tests.
#[derive(Debug, Default)]
pub struct DebugWriter {
    pub events: Vec<WriterEvent>,
    next_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriterEvent {
    AddSegment {
        id: SegId,
        wind_left: i32,
        delta_wind: i32,
        x: f64,
        y: f64,
    },
    AddPoint {
        id: SegId,
        x: f64,
        y: f64,
    },
    CloseSegment {
        id: SegId,
    },
}

impl DebugWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SvpWriter for DebugWriter {
    fn add_segment(&mut self, wind_left: i32, delta_wind: i32, x: f64, y: f64) -> SegId {
        let id = SegId(self.next_id);
        self.next_id += 1;
        self.events.push(WriterEvent::AddSegment {
            id,
            wind_left,
            delta_wind,
            x,
            y,
        });
        id
    }

    fn add_point(&mut self, seg_id: SegId, x: f64, y: f64) {
        if seg_id.is_valid() {
            self.events.push(WriterEvent::AddPoint { id: seg_id, x, y });
        }
    }

    fn close_segment(&mut self, seg_id: SegId) {
        if seg_id.is_valid() {
            self.events.push(WriterEvent::CloseSegment { id: seg_id });
        }
    }
}
