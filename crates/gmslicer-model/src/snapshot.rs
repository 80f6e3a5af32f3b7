//! In-memory model loaded from a JSON export
//!
//! [`SnapshotModel`] answers the [`ModelSession`] queries from data exported
//! out of a simulation, so the pipeline can run without the simulation
//! process. It reproduces the live model's selection behavior: a block's
//! domain entities are only reported once selection is enabled, the mode is
//! set to domain and the geometry has been recomputed.
//!
//! ```json
//! {
//!   "geometry": [
//!     { "tag": "blk1", "pos": [0.0, 0.0, 0.0], "size": [0.001, 0.001, 0.001], "entities": [1] }
//!   ],
//!   "physics": [
//!     { "tag": "mfc1", "relation": "Magnetization", "magnetization": ["0", "0", "1"], "domains": [1] }
//!   ]
//! }
//! ```

use crate::error::{SnapshotError, SnapshotResult};
use crate::session::{ModelResult, ModelSession, SelectionMode, VectorAttribute};
use gmslicer_core::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Exported state of one geometry feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryFeatureSnapshot {
    /// Feature tag
    pub tag: String,
    /// Position attribute, if declared
    #[serde(default)]
    pub pos: Option<Vec<f64>>,
    /// Size attribute, if declared
    #[serde(default)]
    pub size: Option<Vec<f64>>,
    /// Domain entities the feature resolves to after recompute
    #[serde(default)]
    pub entities: Vec<i64>,
}

/// Exported state of one physics feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsFeatureSnapshot {
    /// Feature tag
    pub tag: String,
    /// Constitutive relation, if declared
    #[serde(default)]
    pub relation: Option<String>,
    /// Raw magnetization components, if declared
    #[serde(default)]
    pub magnetization: Option<Vec<String>>,
    /// Domains the feature is assigned to
    #[serde(default)]
    pub domains: Vec<i64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct SelectionState {
    enabled: bool,
    mode: Option<SelectionMode>,
}

/// A [`ModelSession`] backed by exported model data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotModel {
    /// Geometry features in model order
    #[serde(default)]
    pub geometry: Vec<GeometryFeatureSnapshot>,
    /// Physics features in model order
    #[serde(default)]
    pub physics: Vec<PhysicsFeatureSnapshot>,
    #[serde(skip)]
    selection: HashMap<String, SelectionState>,
    #[serde(skip)]
    resolved: HashSet<String>,
    #[serde(skip)]
    recompute_count: usize,
}

impl SnapshotModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from JSON text
    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.check_unique_tags()?;
        Ok(model)
    }

    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> SnapshotResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let model = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            geometry = model.geometry.len(),
            physics = model.physics.len(),
            "Loaded model snapshot"
        );
        Ok(model)
    }

    /// Add a geometry feature
    pub fn add_geometry(&mut self, feature: GeometryFeatureSnapshot) -> &mut Self {
        self.geometry.push(feature);
        self
    }

    /// Add a physics feature
    pub fn add_physics(&mut self, feature: PhysicsFeatureSnapshot) -> &mut Self {
        self.physics.push(feature);
        self
    }

    /// Number of geometry re-evaluations performed so far
    pub fn recompute_count(&self) -> usize {
        self.recompute_count
    }

    fn check_unique_tags(&self) -> SnapshotResult<()> {
        let mut seen = HashSet::new();
        let tags = self
            .geometry
            .iter()
            .map(|g| &g.tag)
            .chain(self.physics.iter().map(|p| &p.tag));
        for tag in tags {
            if !seen.insert(tag) {
                return Err(SnapshotError::DuplicateTag(tag.clone()));
            }
        }
        Ok(())
    }

    fn geometry_feature(&self, tag: &str) -> ModelResult<&GeometryFeatureSnapshot> {
        self.geometry
            .iter()
            .find(|g| g.tag == tag)
            .ok_or_else(|| ModelError::UnknownFeature {
                tag: tag.to_string(),
            })
    }

    fn physics_feature(&self, tag: &str) -> ModelResult<&PhysicsFeatureSnapshot> {
        self.physics
            .iter()
            .find(|p| p.tag == tag)
            .ok_or_else(|| ModelError::UnknownFeature {
                tag: tag.to_string(),
            })
    }
}

fn missing(tag: &str, attribute: &str) -> ModelError {
    ModelError::MissingAttribute {
        tag: tag.to_string(),
        attribute: attribute.to_string(),
    }
}

impl ModelSession for SnapshotModel {
    fn list_geometry_features(&self) -> ModelResult<Vec<String>> {
        Ok(self.geometry.iter().map(|g| g.tag.clone()).collect())
    }

    fn enable_selection(&mut self, tag: &str) -> ModelResult<()> {
        self.geometry_feature(tag)?;
        self.selection.entry(tag.to_string()).or_default().enabled = true;
        Ok(())
    }

    fn set_selection_mode(&mut self, tag: &str, mode: SelectionMode) -> ModelResult<()> {
        self.geometry_feature(tag)?;
        self.selection.entry(tag.to_string()).or_default().mode = Some(mode);
        Ok(())
    }

    fn geometry_recompute(&mut self) -> ModelResult<()> {
        self.recompute_count += 1;
        self.resolved = self
            .selection
            .iter()
            .filter(|(_, s)| s.enabled && s.mode == Some(SelectionMode::Domain))
            .map(|(tag, _)| tag.clone())
            .collect();
        Ok(())
    }

    fn geometry_domain_entities(&self, tag: &str) -> ModelResult<Vec<i64>> {
        let feature = self.geometry_feature(tag)?;
        if self.resolved.contains(tag) {
            Ok(feature.entities.clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn geometry_feature_vector(&self, tag: &str, attribute: VectorAttribute) -> ModelResult<Vec<f64>> {
        let feature = self.geometry_feature(tag)?;
        let value = match attribute {
            VectorAttribute::Position => feature.pos.as_ref(),
            VectorAttribute::Size => feature.size.as_ref(),
        };
        value.cloned().ok_or_else(|| missing(tag, attribute.name()))
    }

    fn list_physics_features(&self) -> ModelResult<Vec<String>> {
        Ok(self.physics.iter().map(|p| p.tag.clone()).collect())
    }

    fn physics_feature_relation(&self, tag: &str) -> ModelResult<String> {
        self.physics_feature(tag)?
            .relation
            .clone()
            .ok_or_else(|| missing(tag, "ConstitutiveRelationBH"))
    }

    fn physics_feature_magnetization_raw(&self, tag: &str) -> ModelResult<Vec<String>> {
        self.physics_feature(tag)?
            .magnetization
            .clone()
            .ok_or_else(|| missing(tag, "M"))
    }

    fn physics_feature_domain_ids(&self, tag: &str) -> ModelResult<Vec<i64>> {
        Ok(self.physics_feature(tag)?.domains.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(tag: &str, entities: Vec<i64>) -> GeometryFeatureSnapshot {
        GeometryFeatureSnapshot {
            tag: tag.to_string(),
            pos: Some(vec![0.0, 0.0, 0.0]),
            size: Some(vec![1.0e-3, 1.0e-3, 1.0e-3]),
            entities,
        }
    }

    #[test]
    fn test_entities_hidden_until_recompute() {
        let mut model = SnapshotModel::new();
        model.add_geometry(block("blk1", vec![1, 2]));

        assert!(model.geometry_domain_entities("blk1").unwrap().is_empty());

        model.geometry_feature_select_domain("blk1").unwrap();
        assert!(model.geometry_domain_entities("blk1").unwrap().is_empty());

        model.geometry_recompute().unwrap();
        assert_eq!(model.geometry_domain_entities("blk1").unwrap(), vec![1, 2]);
        assert_eq!(model.recompute_count(), 1);
    }

    #[test]
    fn test_non_domain_mode_resolves_nothing() {
        let mut model = SnapshotModel::new();
        model.add_geometry(block("blk1", vec![1]));

        model.enable_selection("blk1").unwrap();
        model
            .set_selection_mode("blk1", SelectionMode::Boundary)
            .unwrap();
        model.geometry_recompute().unwrap();
        assert!(model.geometry_domain_entities("blk1").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_and_missing_attributes() {
        let mut model = SnapshotModel::new();
        model.add_geometry(GeometryFeatureSnapshot {
            tag: "blk1".to_string(),
            pos: None,
            size: None,
            entities: vec![],
        });

        assert_eq!(
            model.geometry_feature_vector("blk1", VectorAttribute::Position),
            Err(ModelError::MissingAttribute {
                tag: "blk1".to_string(),
                attribute: "pos".to_string()
            })
        );
        assert!(matches!(
            model.physics_feature_relation("mfc9"),
            Err(ModelError::UnknownFeature { .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "geometry": [
                { "tag": "blk1", "pos": [0.0, 0.0, 0.0], "size": [0.001, 0.001, 0.001], "entities": [1] }
            ],
            "physics": [
                { "tag": "mfc1", "relation": "Magnetization", "magnetization": ["0", "0", "1"], "domains": [1] }
            ]
        }"#;
        let model = SnapshotModel::from_json(json).unwrap();
        assert_eq!(model.list_geometry_features().unwrap(), vec!["blk1"]);
        assert_eq!(model.physics_feature_domain_ids("mfc1").unwrap(), vec![1]);
        assert_eq!(
            model.physics_feature_magnetization_raw("mfc1").unwrap(),
            vec!["0", "0", "1"]
        );
    }

    #[test]
    fn test_duplicate_tags_rejected() {
        let json = r#"{
            "geometry": [ { "tag": "blk1" }, { "tag": "blk1" } ]
        }"#;
        assert!(matches!(
            SnapshotModel::from_json(json),
            Err(SnapshotError::DuplicateTag(_))
        ));
    }
}
