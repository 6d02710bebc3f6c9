#![deny(bare_trait_objects)]
#![allow(clippy::many_single_char_names)]

//! Simple 2D geometric primitives on top of euclid.
//!
//! This crate is reexported in `sable`.
//!
//! Everything here is concrete `f64`: the rasterization pipeline trades in
//! double precision coordinates end to end, so there is no scalar
//! genericity to carry around.

// Reexport dependencies.
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod affine;
mod line;
pub mod rect;

#[doc(inline)]
pub use crate::line::{LineEquation, LineSegment};

pub mod math {
    //! f64 aliases for the euclid types used everywhere. The other sable
    //! crates reexport them.

    /// Alias for `euclid::default::Point2D<f64>`.
    pub type Point = euclid::default::Point2D<f64>;

    /// Alias for `euclid::default::Vector2D<f64>`.
    pub type Vector = euclid::default::Vector2D<f64>;

    /// Alias for `euclid::default::Box2D<f64>`.
    pub type Box2D = euclid::default::Box2D<f64>;

    /// Alias for `euclid::default::Transform2D<f64>`.
    pub type Transform = euclid::default::Transform2D<f64>;

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }
}
