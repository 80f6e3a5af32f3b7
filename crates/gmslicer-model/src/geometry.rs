//! Geometry extraction
//!
//! Reads the domain id, position and size of every block feature. Each
//! feature is queried in the fixed order: enable selection, set selection
//! mode to domain, recompute, read entities, read vectors.

use crate::extraction::Extraction;
use crate::selection::{LastEntity, SelectionPolicy};
use crate::session::{ModelSession, VectorAttribute};
use gmslicer_core::{DomainGeometry, DomainId, ExtractionError, ModelError, Vec3};

/// Tag fragment that marks domain-defining block features
pub const DEFAULT_GEOMETRY_TAG_MARKER: &str = "blk";

/// Extracts [`DomainGeometry`] records from a model session
pub struct GeometryExtractor<P = LastEntity> {
    tag_marker: String,
    policy: P,
}

impl Default for GeometryExtractor<LastEntity> {
    fn default() -> Self {
        Self::new(DEFAULT_GEOMETRY_TAG_MARKER, LastEntity)
    }
}

impl<P: SelectionPolicy> GeometryExtractor<P> {
    /// Create an extractor for features whose tag contains `tag_marker`
    pub fn new(tag_marker: impl Into<String>, policy: P) -> Self {
        Self {
            tag_marker: tag_marker.into(),
            policy,
        }
    }

    /// Replace the domain selection policy
    pub fn with_policy<Q: SelectionPolicy>(self, policy: Q) -> GeometryExtractor<Q> {
        GeometryExtractor {
            tag_marker: self.tag_marker,
            policy,
        }
    }

    /// Whether a geometry feature tag marks a domain-defining block
    pub fn is_domain_feature(&self, tag: &str) -> bool {
        tag.contains(&self.tag_marker)
    }

    /// Extract geometry for every block feature
    ///
    /// Fails only if the feature list itself cannot be read; per-feature
    /// problems are collected in [`Extraction::failures`].
    pub fn extract<S>(&self, session: &mut S) -> Result<Extraction<DomainGeometry>, ModelError>
    where
        S: ModelSession + ?Sized,
    {
        let tags: Vec<String> = session
            .list_geometry_features()?
            .into_iter()
            .filter(|tag| self.is_domain_feature(tag))
            .collect();
        tracing::info!(count = tags.len(), marker = %self.tag_marker, "Reading block features");

        let mut extraction = Extraction::default();
        for tag in &tags {
            let outcome = self.extract_feature(session, tag);
            if let Ok(geometry) = &outcome {
                tracing::debug!(
                    tag = %tag,
                    domain = %geometry.domain_id,
                    position = %geometry.position,
                    "Read block geometry"
                );
            }
            extraction.push(tag, outcome);
        }
        Ok(extraction)
    }

    fn extract_feature<S>(&self, session: &mut S, tag: &str) -> Result<DomainGeometry, ExtractionError>
    where
        S: ModelSession + ?Sized,
    {
        session.geometry_feature_select_domain(tag)?;
        session.geometry_recompute()?;

        let entities = session.geometry_domain_entities(tag)?;
        let raw = self
            .policy
            .select(&entities)
            .ok_or(ExtractionError::NoDomainEntities)?;
        let domain_id =
            DomainId::from_raw(raw).ok_or(ExtractionError::InvalidDomainId { value: raw })?;

        let position = read_vector(&*session, tag, VectorAttribute::Position)?;
        let size = read_vector(&*session, tag, VectorAttribute::Size)?;

        Ok(DomainGeometry {
            domain_id,
            tag: tag.to_string(),
            position,
            size,
        })
    }
}

fn read_vector<S>(session: &S, tag: &str, attribute: VectorAttribute) -> Result<Vec3, ExtractionError>
where
    S: ModelSession + ?Sized,
{
    let values = session.geometry_feature_vector(tag, attribute)?;
    let vector = Vec3::from_slice(&values).ok_or_else(|| ExtractionError::WrongLength {
        attribute: attribute.name().to_string(),
        expected: 3,
        actual: values.len(),
    })?;
    if !vector.is_finite() {
        return Err(ExtractionError::NonFinite {
            attribute: attribute.name().to_string(),
        });
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_filter() {
        let extractor: GeometryExtractor = GeometryExtractor::default();
        assert!(extractor.is_domain_feature("blk1"));
        assert!(extractor.is_domain_feature("blk12"));
        assert!(!extractor.is_domain_feature("cyl1"));
        assert!(!extractor.is_domain_feature("fin"));
    }

    #[test]
    fn test_custom_marker() {
        let extractor = GeometryExtractor::new("vox", LastEntity);
        assert!(extractor.is_domain_feature("vox3"));
        assert!(!extractor.is_domain_feature("blk3"));
    }
}
