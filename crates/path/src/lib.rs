#![deny(bare_trait_objects)]
#![allow(clippy::match_like_matches_macro)]

//! Data structures to work with flattened vector paths: sequences of
//! straight-line subpaths, open or closed.
//!
//! Curves are out of scope: callers are expected to flatten béziers and
//! arcs into line segments before handing paths to this crate.
//!
//! This crate is reexported in `sable`.
//!
//! # Examples
//!
//! ```
//! use sable_path::Path;
//! use sable_path::math::point;
//!
//! let mut builder = Path::builder();
//! builder.begin(point(0.0, 0.0));
//! builder.line_to(point(1.0, 2.0));
//! builder.line_to(point(2.0, 0.0));
//! builder.close();
//! let path = builder.build();
//!
//! for event in path.iter() {
//!     println!("{:?}", event);
//! }
//! ```

pub use sable_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod events;
pub mod path;

#[doc(hidden)]
pub mod private;

pub use crate::events::*;
#[doc(inline)]
pub use crate::path::{Builder, Path};

pub use crate::geom::math;

/// The fill rule: a predicate over the winding number deciding what is
/// inside the shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FillRule {
    /// Filled where the winding number is non-zero.
    NonZero,
    /// Filled where the winding number is odd.
    EvenOdd,
    /// Filled where the winding number is strictly positive.
    Positive,
    /// Filled where the winding number is greater than one (the overlap of
    /// at least two positively wound regions).
    Intersect,
}

impl FillRule {
    #[inline]
    pub fn is_in(self, winding_number: i32) -> bool {
        match self {
            FillRule::NonZero => winding_number != 0,
            FillRule::EvenOdd => winding_number % 2 != 0,
            FillRule::Positive => winding_number > 0,
            FillRule::Intersect => winding_number > 1,
        }
    }

    #[inline]
    pub fn is_out(self, winding_number: i32) -> bool {
        !self.is_in(winding_number)
    }
}

/// Line join as defined by the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    /// Sharp corners up to the miter limit, beveled beyond it.
    Miter,
    /// The corner is cut by a straight edge between the two offset points.
    Bevel,
    /// The corner is rounded with a circular arc.
    Round,
}

/// Line cap as defined by the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineCap {
    /// The stroke ends flat at the endpoint.
    Butt,
    /// The stroke extends half a line width past the endpoint.
    Square,
    /// The stroke ends with a half disc centered on the endpoint.
    Round,
}

#[cfg(test)]
mod tests {
    use super::FillRule;

    #[test]
    fn fill_rules() {
        for w in -3..=3 {
            assert_eq!(FillRule::NonZero.is_in(w), w != 0);
            assert_eq!(FillRule::EvenOdd.is_in(w), w.rem_euclid(2) == 1);
            assert_eq!(FillRule::Positive.is_in(w), w > 0);
            assert_eq!(FillRule::Intersect.is_in(w), w > 1);
        }
    }
}
