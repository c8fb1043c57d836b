//! Layout engine for component-based terminal UIs
//!
//! Components describe their size as a [`Dim`]: fixed, or filling with a
//! minimum, per axis. Containers arrange children top to bottom
//! ([`Stacker`]) or left to right ([`Chainer`]), and any node can open a
//! floating [`Layer`]. A [`Manager`] turns the tree into screen rectangles:
//!
//! - **Fill**: filling children share the space left by fixed ones
//! - **Center**: fixed children that don't fill the space get margins
//! - **Clip**: children that don't fit are cut or hidden
//!
//! # Architecture
//!
//! ```text
//! component tree ──► Manager::reflow ──► Dim per node ──► renderer
//!       ▲                  │
//!       │                  ▼
//!   update_*/set_*    dirty callback (base, layers by z, uncovered)
//! ```

mod axis;
mod config;
mod dim;
mod dimer;
mod error;
mod geometry;
mod layer;
mod manager;
mod traverse;
mod viewport;

#[cfg(any(test, feature = "test-utils"))]
pub mod proptest_strategies;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use axis::Axis;
pub use config::{LytConfig, DEFAULT_LAYER_HEIGHT, DEFAULT_LAYER_INSET, DEFAULT_LAYER_WIDTH};
pub use dim::Dim;
pub use dimer::{same, Chainer, ChildVisitor, Dimer, DimerRef, Layered, Stacker};
pub use error::{ContainerKind, DimError, LytError, Result};
pub use geometry::{Edges, Rect};
pub use layer::{Layer, LayerPos, Layers};
pub use manager::Manager;
pub use viewport::terminal_size;
