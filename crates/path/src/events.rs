use crate::math::{Point, Transform};

/// An event (edge or subpath boundary) of a flattened path.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Event<Endpoint> {
    Begin {
        at: Endpoint,
    },
    Line {
        from: Endpoint,
        to: Endpoint,
    },
    End {
        last: Endpoint,
        first: Endpoint,
        close: bool,
    },
}

/// A path event with endpoints as positions.
pub type PathEvent = Event<Point>;

impl<Ep> Event<Ep> {
    /// Whether this event contributes an edge to the outline (a line, or
    /// the implicit closing edge of a closed subpath).
    pub fn is_edge(&self) -> bool {
        match self {
            Event::Line { .. } | Event::End { close: true, .. } => true,
            _ => false,
        }
    }

    pub fn from(&self) -> Ep
    where
        Ep: Clone,
    {
        match self {
            Event::Line { from, .. } | Event::Begin { at: from } | Event::End { last: from, .. } => {
                from.clone()
            }
        }
    }

    pub fn to(&self) -> Ep
    where
        Ep: Clone,
    {
        match self {
            Event::Line { to, .. } | Event::Begin { at: to } | Event::End { first: to, .. } => {
                to.clone()
            }
        }
    }
}

impl PathEvent {
    pub fn transformed(&self, mat: &Transform) -> Self {
        match *self {
            Event::Line { from, to } => Event::Line {
                from: mat.transform_point(from),
                to: mat.transform_point(to),
            },
            Event::Begin { at } => Event::Begin {
                at: mat.transform_point(at),
            },
            Event::End { last, first, close } => Event::End {
                last: mat.transform_point(last),
                first: mat.transform_point(first),
                close,
            },
        }
    }
}
