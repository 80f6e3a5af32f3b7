//! Magnetization extraction
//!
//! Reads magnetization-constraint physics features and converts their
//! magnetization vectors into spherical head angles.

use crate::extraction::Extraction;
use crate::session::ModelSession;
use gmslicer_core::{
    cartesian_to_spherical, DomainId, DomainMagnetization, ExtractionError, ModelError, ParseError,
    Vec3,
};

/// Tag fragment that marks magnetization-constraint physics features
pub const DEFAULT_PHYSICS_TAG_MARKER: &str = "mfc";
/// Constitutive relation fragment that marks a magnetization-based relation
pub const DEFAULT_MAGNETIZATION_RELATION: &str = "Magnetization";

/// Extracts [`DomainMagnetization`] records from a model session
#[derive(Debug, Clone)]
pub struct MagnetizationExtractor {
    tag_marker: String,
    relation_marker: String,
}

impl Default for MagnetizationExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PHYSICS_TAG_MARKER, DEFAULT_MAGNETIZATION_RELATION)
    }
}

impl MagnetizationExtractor {
    /// Create an extractor keeping features whose tag contains `tag_marker`
    /// and whose constitutive relation contains `relation_marker`
    pub fn new(tag_marker: impl Into<String>, relation_marker: impl Into<String>) -> Self {
        Self {
            tag_marker: tag_marker.into(),
            relation_marker: relation_marker.into(),
        }
    }

    /// Extract magnetization for every magnetization-based constraint feature
    pub fn extract<S>(&self, session: &S) -> Result<Extraction<DomainMagnetization>, ModelError>
    where
        S: ModelSession + ?Sized,
    {
        let tags: Vec<String> = session
            .list_physics_features()?
            .into_iter()
            .filter(|tag| tag.contains(&self.tag_marker))
            .collect();

        let mut extraction = Extraction::default();
        for tag in &tags {
            match session.physics_feature_relation(tag) {
                Ok(relation) if relation.contains(&self.relation_marker) => {}
                Ok(relation) => {
                    tracing::debug!(tag = %tag, relation = %relation, "Ignoring non-magnetization relation");
                    continue;
                }
                Err(e) => {
                    extraction.push(tag, Err(e.into()));
                    continue;
                }
            }

            let outcome = self.extract_feature(session, tag);
            if let Ok(m) = &outcome {
                tracing::debug!(
                    tag = %tag,
                    domains = m.domain_ids.len(),
                    theta = m.direction.theta,
                    phi = m.direction.phi,
                    "Read magnetization"
                );
            }
            extraction.push(tag, outcome);
        }

        tracing::info!(
            features = extraction.items.len(),
            failed = extraction.failures.len(),
            "Magnetization features read"
        );
        Ok(extraction)
    }

    fn extract_feature<S>(&self, session: &S, tag: &str) -> Result<DomainMagnetization, ExtractionError>
    where
        S: ModelSession + ?Sized,
    {
        let raw = session.physics_feature_magnetization_raw(tag)?;
        let vector = parse_magnetization(&raw)?;
        let direction = cartesian_to_spherical(vector)?;

        let mut domain_ids: Vec<DomainId> = Vec::new();
        for raw_id in session.physics_feature_domain_ids(tag)? {
            let id = DomainId::from_raw(raw_id)
                .ok_or(ExtractionError::InvalidDomainId { value: raw_id })?;
            if !domain_ids.contains(&id) {
                domain_ids.push(id);
            }
        }
        if domain_ids.is_empty() {
            return Err(ExtractionError::NoAssignedDomains);
        }

        Ok(DomainMagnetization {
            tag: tag.to_string(),
            domain_ids,
            direction,
        })
    }
}

/// Parse the three string components of a magnetization vector
pub fn parse_magnetization(raw: &[String]) -> Result<Vec3, ExtractionError> {
    if raw.len() != 3 {
        return Err(ExtractionError::WrongLength {
            attribute: "M".to_string(),
            expected: 3,
            actual: raw.len(),
        });
    }

    let mut components = [0.0f64; 3];
    for (i, value) in raw.iter().enumerate() {
        components[i] = value.trim().parse::<f64>().map_err(|_| ParseError {
            field: format!("M[{}]", i),
            value: value.clone(),
        })?;
    }
    Ok(Vec3::new(components[0], components[1], components[2]))
}
