//! The default path data structure.

use crate::math::{point, Box2D, Point, Transform};
use crate::private::DebugValidator;
use crate::{Event, PathEvent};

use std::fmt;
use std::iter::IntoIterator;

/// Enumeration corresponding to the [Event](enum.Event.html) enum without
/// the parameters.
///
/// This is used by the [Path](struct.Path.html) data structure to store
/// events a tad more efficiently.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub(crate) enum Verb {
    LineTo,
    Begin,
    Close,
    End,
}

/// A simple flattened path data structure.
///
/// # Representation
///
/// Paths contain two buffers:
/// - a buffer of commands (Begin, Line, Close or End),
/// - and a buffer of points.
///
/// The order of storage for points is determined by the sequence of
/// commands: `Begin` and `LineTo` each consume one point, `Close` and
/// `End` consume none (a `Close` produces the implicit edge back to the
/// first point of the subpath).
#[derive(Clone, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Path {
    points: Box<[Point]>,
    verbs: Box<[Verb]>,
}

impl Path {
    /// Creates a [Builder](struct.Builder.html) to build a path.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Creates an empty `Path`.
    #[inline]
    pub fn new() -> Path {
        Path {
            points: Box::new([]),
            verbs: Box::new([]),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// The number of stored points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Slice of all stored points, in storage order.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterates over the path events.
    pub fn iter(&self) -> Iter {
        Iter {
            points: &self.points,
            verbs: &self.verbs,
            p: 0,
            v: 0,
            first: point(0.0, 0.0),
            current: point(0.0, 0.0),
        }
    }

    /// A single closed subpath through the provided points.
    pub fn from_polygon(points: &[Point]) -> Path {
        let mut builder = Path::builder();
        if let Some((first, rest)) = points.split_first() {
            builder.begin(*first);
            for p in rest {
                builder.line_to(*p);
            }
            builder.close();
        }
        builder.build()
    }

    /// A closed polygonal approximation of a circle, matching the
    /// fixed-step construction used by the test drivers.
    pub fn circle(center: Point, radius: f64) -> Path {
        // The number of steps should really depend on the radius.
        const CIRCLE_STEPS: usize = 128;

        let mut builder = Path::builder();
        for i in 0..CIRCLE_STEPS {
            let theta = i as f64 * (std::f64::consts::PI * 2.0 / CIRCLE_STEPS as f64);
            let p = point(
                center.x + radius * theta.cos(),
                center.y - radius * theta.sin(),
            );
            if i == 0 {
                builder.begin(p);
            } else {
                builder.line_to(p);
            }
        }
        builder.close();
        builder.build()
    }

    /// The path with the orientation of every subpath flipped.
    pub fn reversed(&self) -> Path {
        let mut builder = Path::builder();
        let mut subpath: Vec<Point> = Vec::new();
        for event in self.iter() {
            match event {
                Event::Begin { at } => {
                    subpath.clear();
                    subpath.push(at);
                }
                Event::Line { to, .. } => {
                    subpath.push(to);
                }
                Event::End { close, .. } => {
                    let mut rev = subpath.iter().rev();
                    if let Some(first) = rev.next() {
                        builder.begin(*first);
                        for p in rev {
                            builder.line_to(*p);
                        }
                        builder.end(close);
                    }
                }
            }
        }
        builder.build()
    }

    /// Axis-aligned bounding box over all points (zero box if empty).
    pub fn bounding_box(&self) -> Box2D {
        if self.points.is_empty() {
            return Box2D::zero();
        }
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in self.points.iter() {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Box2D::new(min, max)
    }

    /// Applies an affine transformation to every point of the path.
    pub fn transformed(&self, mat: &Transform) -> Path {
        Path {
            points: self
                .points
                .iter()
                .map(|p| mat.transform_point(*p))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
            verbs: self.verbs.clone(),
        }
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("Path {")?;
        for event in self.iter() {
            match event {
                Event::Begin { at } => write!(formatter, " M {:?}", at)?,
                Event::Line { to, .. } => write!(formatter, " L {:?}", to)?,
                Event::End { close: true, .. } => formatter.write_str(" Z")?,
                Event::End { close: false, .. } => formatter.write_str(" O")?,
            }
        }
        formatter.write_str(" }")
    }
}

impl<'l> IntoIterator for &'l Path {
    type Item = PathEvent;
    type IntoIter = Iter<'l>;

    fn into_iter(self) -> Iter<'l> {
        self.iter()
    }
}

/// An iterator over the events of a [Path](struct.Path.html).
#[derive(Clone)]
pub struct Iter<'l> {
    points: &'l [Point],
    verbs: &'l [Verb],
    p: usize,
    v: usize,
    first: Point,
    current: Point,
}

impl<'l> Iterator for Iter<'l> {
    type Item = PathEvent;

    fn next(&mut self) -> Option<PathEvent> {
        let verb = *self.verbs.get(self.v)?;
        self.v += 1;
        match verb {
            Verb::Begin => {
                self.first = self.points[self.p];
                self.current = self.first;
                self.p += 1;
                Some(Event::Begin { at: self.first })
            }
            Verb::LineTo => {
                let from = self.current;
                self.current = self.points[self.p];
                self.p += 1;
                Some(Event::Line {
                    from,
                    to: self.current,
                })
            }
            Verb::Close => Some(Event::End {
                last: self.current,
                first: self.first,
                close: true,
            }),
            Verb::End => Some(Event::End {
                last: self.current,
                first: self.first,
                close: false,
            }),
        }
    }
}

/// Builds path objects.
#[derive(Default)]
pub struct Builder {
    points: Vec<Point>,
    verbs: Vec<Verb>,
    validator: DebugValidator,
}

impl Builder {
    pub fn new() -> Self {
        Builder::default()
    }

    pub fn with_capacity(points: usize) -> Self {
        Builder {
            points: Vec::with_capacity(points),
            verbs: Vec::with_capacity(points + 2),
            validator: DebugValidator::new(),
        }
    }

    /// Starts a new subpath at `at`.
    pub fn begin(&mut self, at: Point) {
        self.validator.begin();
        self.points.push(at);
        self.verbs.push(Verb::Begin);
    }

    /// Adds an edge from the current position to `to`.
    pub fn line_to(&mut self, to: Point) {
        self.validator.edge();
        self.points.push(to);
        self.verbs.push(Verb::LineTo);
    }

    /// Ends the current subpath; `close` adds the implicit edge back to the
    /// first point.
    pub fn end(&mut self, close: bool) {
        self.validator.end();
        self.verbs.push(if close { Verb::Close } else { Verb::End });
    }

    /// Shorthand for `end(true)`.
    pub fn close(&mut self) {
        self.end(true);
    }

    pub fn build(self) -> Path {
        self.validator.build();
        Path {
            points: self.points.into_boxed_slice(),
            verbs: self.verbs.into_boxed_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    #[test]
    fn simple_path_events() {
        let mut builder = Path::builder();
        builder.begin(point(0.0, 0.0));
        builder.line_to(point(1.0, 0.0));
        builder.line_to(point(1.0, 1.0));
        builder.close();
        builder.begin(point(5.0, 5.0));
        builder.line_to(point(6.0, 5.0));
        builder.end(false);
        let path = builder.build();

        let events: Vec<PathEvent> = path.iter().collect();
        assert_eq!(
            events,
            vec![
                Event::Begin { at: point(0.0, 0.0) },
                Event::Line {
                    from: point(0.0, 0.0),
                    to: point(1.0, 0.0)
                },
                Event::Line {
                    from: point(1.0, 0.0),
                    to: point(1.0, 1.0)
                },
                Event::End {
                    last: point(1.0, 1.0),
                    first: point(0.0, 0.0),
                    close: true
                },
                Event::Begin { at: point(5.0, 5.0) },
                Event::Line {
                    from: point(5.0, 5.0),
                    to: point(6.0, 5.0)
                },
                Event::End {
                    last: point(6.0, 5.0),
                    first: point(5.0, 5.0),
                    close: false
                },
            ]
        );
    }

    #[test]
    fn reversed_round_trip() {
        let path = Path::from_polygon(&[
            point(0.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
            point(0.0, 10.0),
        ]);
        let twice = path.reversed().reversed();
        let a: Vec<PathEvent> = path.iter().collect();
        let b: Vec<PathEvent> = twice.iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn bounding_box() {
        let path = Path::from_polygon(&[point(1.0, 2.0), point(-3.0, 4.0), point(5.0, -6.0)]);
        let bbox = path.bounding_box();
        assert_eq!(bbox.min, point(-3.0, -6.0));
        assert_eq!(bbox.max, point(5.0, 4.0));
    }

    #[test]
    fn circle_is_closed() {
        let path = Path::circle(point(250.0, 250.0), 100.0);
        let mut n_edges = 0;
        for event in &path {
            if event.is_edge() {
                n_edges += 1;
            }
        }
        // 127 explicit edges plus the closing one.
        assert_eq!(n_edges, 128);
        let bbox = path.bounding_box();
        assert!(bbox.min.x >= 150.0 - 1e-9 && bbox.max.x <= 350.0 + 1e-9);
    }

    #[test]
    fn transformed_path() {
        let path = Path::from_polygon(&[point(1.0, 1.0), point(2.0, 1.0), point(2.0, 2.0)]);
        let m = Transform::translation(10.0, 20.0);
        let moved = path.transformed(&m);
        assert_eq!(moved.points()[0], point(11.0, 21.0));
    }
}
