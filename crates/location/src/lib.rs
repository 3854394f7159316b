//! # Design-space coordinates
//!
//! Coordinate algebra for n-dimensional design spaces: named axes, scalar or
//! split (anisotropic) per-axis values, and the classification queries the
//! interpolation engine builds on.
//!
//! ## Example
//!
//! ```
//! use blendspace_location::Location;
//!
//! let bold = Location::from_pairs([("weight", 1.0)]);
//! let condensed = Location::from_pairs([("width", -1.0)]);
//!
//! let corner = bold.add(&condensed);
//! assert!(corner.is_off_axis());
//! assert_eq!(corner.subtract(&condensed), bold.with("width", 0.0));
//! ```

mod axis_value;
mod location;

pub use axis_value::{AxisValue, Component};
pub use location::{Location, bias_from_locations};
