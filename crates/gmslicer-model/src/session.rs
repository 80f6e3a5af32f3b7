//! Simulation model query contract
//!
//! The simulation model is an external collaborator. Everything the
//! extractors know about it goes through [`ModelSession`], which is passed
//! explicitly (`&mut`) so that the order of state-mutating queries is part of
//! the call graph rather than hidden global state.

use gmslicer_core::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for model queries
pub type ModelResult<T> = Result<T, ModelError>;

/// Which entity level a geometry feature's result selection reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Report domains (volumes)
    Domain,
    /// Report boundaries (faces)
    Boundary,
    /// Report edges
    Edge,
    /// Report points
    Point,
}

impl Default for SelectionMode {
    fn default() -> Self {
        Self::Domain
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain => write!(f, "dom"),
            Self::Boundary => write!(f, "bnd"),
            Self::Edge => write!(f, "edg"),
            Self::Point => write!(f, "pnt"),
        }
    }
}

/// Vector-valued attribute declared on a geometry feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorAttribute {
    /// Block position (`pos`)
    Position,
    /// Block extent (`size`)
    Size,
}

impl VectorAttribute {
    /// Attribute name as stored in the model
    pub fn name(&self) -> &'static str {
        match self {
            Self::Position => "pos",
            Self::Size => "size",
        }
    }
}

impl fmt::Display for VectorAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sequential session against a simulation model
///
/// Geometry queries mutate the model in place: a feature's domain entities
/// are only meaningful after selection has been enabled, the selection mode
/// set and the geometry re-evaluated, in that order. Implementations must
/// not reorder or batch these calls.
pub trait ModelSession {
    /// Tags of every geometry feature, in model order
    fn list_geometry_features(&self) -> ModelResult<Vec<String>>;

    /// Turn on result selection for a geometry feature
    fn enable_selection(&mut self, tag: &str) -> ModelResult<()>;

    /// Choose which entity level the feature's result selection reports
    fn set_selection_mode(&mut self, tag: &str, mode: SelectionMode) -> ModelResult<()>;

    /// Enable selection and force the selection mode to domains
    fn geometry_feature_select_domain(&mut self, tag: &str) -> ModelResult<()> {
        self.enable_selection(tag)?;
        self.set_selection_mode(tag, SelectionMode::Domain)
    }

    /// Re-evaluate the geometry sequence
    fn geometry_recompute(&mut self) -> ModelResult<()>;

    /// Domain entities currently selected by a geometry feature
    fn geometry_domain_entities(&self, tag: &str) -> ModelResult<Vec<i64>>;

    /// A vector attribute of a geometry feature
    fn geometry_feature_vector(&self, tag: &str, attribute: VectorAttribute)
        -> ModelResult<Vec<f64>>;

    /// Tags of every physics feature, in model order
    fn list_physics_features(&self) -> ModelResult<Vec<String>>;

    /// Constitutive relation declared by a physics feature
    fn physics_feature_relation(&self, tag: &str) -> ModelResult<String>;

    /// Raw magnetization components as stored in the model
    fn physics_feature_magnetization_raw(&self, tag: &str) -> ModelResult<Vec<String>>;

    /// Domains a physics feature is assigned to
    fn physics_feature_domain_ids(&self, tag: &str) -> ModelResult<Vec<i64>>;
}
