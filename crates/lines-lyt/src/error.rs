//! Error types for the layout engine

use crate::axis::Axis;
use std::fmt;
use thiserror::Error;

/// Result type alias for layout operations
pub type Result<T> = std::result::Result<T, LytError>;

/// Errors reported by a [`Manager`](crate::Manager).
///
/// These signal programmer mistakes in the dimer tree. A viewport that is
/// too small is not an error: it shows up as clipped and off-screen dims.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LytError {
    /// No root dimer was installed
    #[error("layout: root dimer is not set")]
    NoRoot,

    /// Neither the viewport nor the root provides a positive size
    #[error("layout: viewport must be positive, got {width}x{height}")]
    Viewport { width: i32, height: i32 },

    /// A stacked or chained child can't be dimensioned
    #[error(transparent)]
    Dim(#[from] DimError),
}

/// The kind of container that rejected a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Stacker,
    Chainer,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stacker => f.write_str("stacker"),
            Self::Chainer => f.write_str("chainer"),
        }
    }
}

/// A child has neither a positive size nor a positive fill minimum in
/// some axis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("layout: dimension: {container} child {index} has neither {axis} size nor fill")]
pub struct DimError {
    pub container: ContainerKind,
    pub index: usize,
    pub axis: Axis,
}
