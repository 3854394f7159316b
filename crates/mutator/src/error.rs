//! Error types for mutator construction.

use blendspace_location::Location;
use thiserror::Error;

/// Result type for mutator construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a mutator.
///
/// All of these are construction errors: evaluation itself never fails, it
/// extrapolates instead.
#[derive(Debug, Error)]
pub enum Error {
    /// No masters were supplied.
    #[error("no masters supplied")]
    EmptyMasterSet,

    /// Two masters share an identical location.
    #[error("duplicate master location: {location}")]
    DuplicateLocation { location: Location },

    /// More than one master sits at the neutral location. Distinct locations
    /// can both classify as the origin (a scalar zero and an all-zero split
    /// pair), so this is not always a duplicate.
    #[error("more than one master at the neutral location: {first} and {second}")]
    AmbiguousNeutral { first: Location, second: Location },

    /// Two breakpoints collide on one axis component. A master component
    /// landing exactly on zero collides with the implicit origin breakpoint.
    #[error("duplicate breakpoint on axis '{axis}' at {coordinate}")]
    DuplicateBreakpoint { axis: String, coordinate: f64 },

    /// Strict mode: the axis is defined by a single master, so every query
    /// off that master would extrapolate.
    #[error("axis '{axis}' is defined by a single master and strict interpolation is enabled")]
    SingleMasterAxis { axis: String },
}
