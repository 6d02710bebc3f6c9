#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]
#![allow(dead_code)]

//! Antialiased rasterization of flattened 2D vector paths.
//!
//! ## Overview
//!
//! The crate is a pipeline. A [`Path`](crate::path::Path) of straight
//! line subpaths is either filled directly or first expanded to the
//! outline of its stroked region ([`StrokeTessellator`]); the outline is
//! split into y-monotone chains ([`Svp::from_path`]); a sweep-line pass
//! ([`intersect`]) removes self-intersections and resolves the fill rule
//! through the [`RewindWriter`]; and the cleaned [`Svp`] is scan
//! converted ([`render_aa`]) into per-scanline coverage deltas that the
//! color fillers in [`paint`] integrate into RGB(A) or grayscale byte
//! buffers.
//!
//! The two high-level entry points are [`fill_path_to_svp`] and
//! [`stroke_path_to_svp`]; everything in between is public so renderers
//! can cache SVPs, plug their own [`SvpWriter`], or consume raw coverage
//! steps.
//!
//! Curves are out of scope: flatten them to line segments first.
//!
//! # Example
//!
//! ```
//! use sable_raster::{fill_path_to_svp, paint};
//! use sable_raster::path::{FillRule, Path};
//! use sable_raster::math::point;
//!
//! let path = Path::from_polygon(&[
//!     point(1.0, 1.0),
//!     point(9.0, 1.0),
//!     point(9.0, 9.0),
//!     point(1.0, 9.0),
//! ]);
//! let svp = fill_path_to_svp(&path, FillRule::NonZero).unwrap();
//!
//! let mut buf = vec![0u8; 10 * 10];
//! paint::gray_svp_aa(&svp, 0, 0, 10, 10, &mut buf, 10);
//! assert_eq!(buf[5 * 10 + 5], 255);
//! ```

pub use sable_path as path;

pub use crate::path::geom;

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;

mod error;
mod intersect;
pub mod paint;
mod render;
mod stroke;
pub mod svp;
mod writer;


pub use crate::path::math;

#[doc(inline)]
pub use crate::error::*;

#[doc(inline)]
pub use crate::intersect::intersect;

#[doc(inline)]
pub use crate::render::{render_aa, CoverageStep};

#[doc(inline)]
pub use crate::stroke::{stroke_path_to_svp, StrokeOptions, StrokeTessellator};

#[doc(inline)]
pub use crate::svp::{perturb, Direction, Svp, SvpSeg};

#[doc(inline)]
pub use crate::writer::{DebugWriter, RewindWriter, SegId, SvpWriter};

pub use crate::path::{FillRule, LineCap, LineJoin};

use crate::path::Path;

/// Fills a path all the way to a cleaned SVP: perturbation, monotone
/// segmentation, then sweep cleanup under `rule`.
pub fn fill_path_to_svp(path: &Path, rule: FillRule) -> Result<Svp, RasterError> {
    let perturbed = svp::perturb(path);
    Svp::from_path(&perturbed).rewound(rule)
}
