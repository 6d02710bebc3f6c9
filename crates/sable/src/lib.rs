#![deny(bare_trait_objects)]

//! Antialiased 2D vector graphics rasterization in Rust.
//!
//! # Crates
//!
//! This meta-crate (`sable`) reexports the following sub-crates for
//! convenience:
//!
//! * **sable_raster** - Stroke tessellation, sweep-line path cleanup and
//!   antialiased scanline rendering.
//! * **sable_path** - Tools to build and iterate over flattened paths.
//! * **sable_geom** - 2d line segment, line equation and affine math.
//!
//! Each `sable_<name>` crate is reexported as a `<name>` module in
//! `sable`. For example:
//!
//! ```ignore
//! use sable_raster::StrokeTessellator;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! use sable::raster::StrokeTessellator;
//! ```
//!
//! # Feature flags
//!
//! Serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! # Example
//!
//! ```
//! use sable::math::point;
//! use sable::path::{FillRule, Path};
//! use sable::raster::{fill_path_to_svp, paint};
//!
//! fn main() {
//!     // A self-intersecting polygon: the sweep untangles it.
//!     let path = Path::from_polygon(&[
//!         point(1.0, 1.0),
//!         point(15.0, 15.0),
//!         point(15.0, 1.0),
//!         point(1.0, 15.0),
//!     ]);
//!
//!     let svp = fill_path_to_svp(&path, FillRule::NonZero).unwrap();
//!
//!     let mut pixels = vec![0u8; 16 * 16 * 3];
//!     paint::rgb_svp_aa(
//!         &svp,
//!         0, 0, 16, 16,
//!         0x000000, 0xffffff,
//!         &mut pixels,
//!         16 * 3,
//!     );
//! }
//! ```

pub use sable_raster as raster;

pub use crate::raster::geom;
pub use crate::raster::path;

pub use crate::raster::math;

#[doc(inline)]
pub use crate::path::{FillRule, LineCap, LineJoin, Path};

#[doc(inline)]
pub use crate::raster::{
    fill_path_to_svp, render_aa, stroke_path_to_svp, CoverageStep, RasterError, StrokeOptions,
    StrokeTessellator, Svp, SvpSeg,
};
