//! # Blendspace mutator
//!
//! Piecewise-linear interpolation and extrapolation over an n-dimensional
//! design space.
//!
//! A *master* pins a known value to a location in the space; the builder
//! turns a sparse master set into a [`Mutator`], a continuous function over
//! the whole space. On-axis masters define a piecewise-linear model per axis;
//! off-axis masters contribute the residual interaction that the per-axis
//! models cannot explain; queries beyond master coverage extrapolate instead
//! of failing. Values can be anything with vector-space arithmetic — see
//! [`Interpolable`].
//!
//! ## Example
//!
//! ```
//! use blendspace_mutator::{Location, build_mutator};
//!
//! let mutator = build_mutator(vec![
//!     (Location::origin(), 0.0),
//!     (Location::from_pairs([("weight", 1.0)]), 10.0),
//!     (Location::from_pairs([("width", 1.0)]), -4.0),
//! ])
//! .unwrap();
//!
//! let q = Location::from_pairs([("weight", 0.5), ("width", 1.0)]);
//! assert_eq!(mutator.instance(&q), 1.0);
//! ```

mod axis_model;
mod builder;
mod error;
mod mutator;
mod offaxis;
mod value;

pub use blendspace_location::{AxisValue, Component, Location, bias_from_locations};
pub use builder::{Bias, Options, build_mutator, build_mutator_with};
pub use error::{Error, Result};
pub use mutator::Mutator;
pub use value::Interpolable;
