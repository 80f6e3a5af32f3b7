//! # GMSlicer Model
//!
//! Query contract for the simulation model and the two extractors that read
//! domain data out of it:
//!
//! - **GeometryExtractor**: domain id, position and size per block feature
//! - **MagnetizationExtractor**: magnetization direction per constraint feature
//!
//! The model is reached through an explicit [`ModelSession`]. A JSON-backed
//! [`SnapshotModel`] implements the session for offline runs and tests.

pub mod error;
pub mod extraction;
pub mod geometry;
pub mod magnetization;
pub mod selection;
pub mod session;
pub mod snapshot;

pub use error::{SnapshotError, SnapshotResult};
pub use extraction::{Extraction, FeatureFailure};
pub use geometry::{GeometryExtractor, DEFAULT_GEOMETRY_TAG_MARKER};
pub use magnetization::{
    parse_magnetization, MagnetizationExtractor, DEFAULT_MAGNETIZATION_RELATION,
    DEFAULT_PHYSICS_TAG_MARKER,
};
pub use selection::{FirstEntity, LastEntity, SelectionPolicy, SelectionStrategy};
pub use session::{ModelResult, ModelSession, SelectionMode, VectorAttribute};
pub use snapshot::{GeometryFeatureSnapshot, PhysicsFeatureSnapshot, SnapshotModel};
