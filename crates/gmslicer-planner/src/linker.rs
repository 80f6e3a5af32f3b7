//! Domain linking
//!
//! Joins geometry and magnetization records on domain id. Geometry is
//! indexed by id so the join is linear in the number of records; matching is
//! exact id equality and the first geometry for an id wins.

use gmslicer_core::{DomainGeometry, DomainId, DomainMagnetization, DomainRecord};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A magnetization references a domain with no geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkageGap {
    /// The unmatched domain id
    pub domain_id: DomainId,
    /// Tag of the magnetization feature that referenced it
    pub magnetization_tag: String,
}

impl fmt::Display for LinkageGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "domain {} referenced by {} has no geometry",
            self.domain_id, self.magnetization_tag
        )
    }
}

/// A domain claimed by more than one magnetization feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateAssignment {
    /// The contested domain id
    pub domain_id: DomainId,
    /// Feature whose direction was used
    pub kept_tag: String,
    /// Feature whose claim was dropped
    pub dropped_tag: String,
}

impl fmt::Display for DuplicateAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "domain {} assigned by both {} and {}, keeping {}",
            self.domain_id, self.kept_tag, self.dropped_tag, self.kept_tag
        )
    }
}

/// Two geometry features resolved to the same domain id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGeometry {
    /// The shared domain id
    pub domain_id: DomainId,
    /// Feature whose geometry was used
    pub kept_tag: String,
    /// Feature whose geometry was ignored
    pub dropped_tag: String,
}

/// Outcome of linking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linkage {
    /// Linked records, in magnetization order
    pub records: Vec<DomainRecord>,
    /// Magnetization domain ids without geometry
    pub gaps: Vec<LinkageGap>,
    /// Domain ids claimed more than once
    pub duplicate_assignments: Vec<DuplicateAssignment>,
    /// Geometry ids produced by more than one feature
    pub duplicate_geometries: Vec<DuplicateGeometry>,
    /// Geometry ids no magnetization referenced, ascending
    pub unmagnetized: Vec<DomainId>,
}

/// Joins geometry with magnetization by domain id
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainLinker;

impl DomainLinker {
    /// Create a linker
    pub fn new() -> Self {
        Self
    }

    /// Link every magnetized domain to its geometry
    ///
    /// Emits at most one record per domain id. Unmatched ids become
    /// [`LinkageGap`]s and are skipped.
    pub fn link(
        &self,
        geometries: &[DomainGeometry],
        magnetizations: &[DomainMagnetization],
    ) -> Linkage {
        let mut linkage = Linkage::default();

        let mut index: HashMap<DomainId, &DomainGeometry> = HashMap::with_capacity(geometries.len());
        for geometry in geometries {
            if let Some(existing) = index.get(&geometry.domain_id) {
                tracing::warn!(
                    domain = %geometry.domain_id,
                    kept = %existing.tag,
                    dropped = %geometry.tag,
                    "Duplicate geometry for domain"
                );
                linkage.duplicate_geometries.push(DuplicateGeometry {
                    domain_id: geometry.domain_id,
                    kept_tag: existing.tag.clone(),
                    dropped_tag: geometry.tag.clone(),
                });
                continue;
            }
            index.insert(geometry.domain_id, geometry);
        }

        let mut claimed: HashMap<DomainId, &str> = HashMap::new();
        for magnetization in magnetizations {
            for &domain_id in &magnetization.domain_ids {
                if let Some(kept) = claimed.get(&domain_id) {
                    let duplicate = DuplicateAssignment {
                        domain_id,
                        kept_tag: kept.to_string(),
                        dropped_tag: magnetization.tag.clone(),
                    };
                    tracing::warn!("{}", duplicate);
                    linkage.duplicate_assignments.push(duplicate);
                    continue;
                }

                let Some(geometry) = index.get(&domain_id) else {
                    let gap = LinkageGap {
                        domain_id,
                        magnetization_tag: magnetization.tag.clone(),
                    };
                    tracing::warn!("Linkage gap: {}", gap);
                    linkage.gaps.push(gap);
                    continue;
                };

                claimed.insert(domain_id, &magnetization.tag);
                linkage
                    .records
                    .push(DomainRecord::link(geometry, magnetization.direction));
            }
        }

        let unmagnetized: BTreeSet<DomainId> = index
            .keys()
            .filter(|id| !claimed.contains_key(*id))
            .copied()
            .collect();
        linkage.unmagnetized = unmagnetized.into_iter().collect();

        tracing::info!(
            linked = linkage.records.len(),
            gaps = linkage.gaps.len(),
            unmagnetized = linkage.unmagnetized.len(),
            "Linked domains"
        );
        linkage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmslicer_core::{SphericalDirection, Vec3};

    fn geometry(id: u32, tag: &str, x: f64) -> DomainGeometry {
        DomainGeometry {
            domain_id: DomainId(id),
            tag: tag.to_string(),
            position: Vec3::new(x, 0.0, 0.0),
            size: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    fn magnetization(tag: &str, ids: &[u32], theta: f64) -> DomainMagnetization {
        DomainMagnetization {
            tag: tag.to_string(),
            domain_ids: ids.iter().map(|&i| DomainId(i)).collect(),
            direction: SphericalDirection { theta, phi: 0.0 },
        }
    }

    #[test]
    fn test_one_magnetization_covers_many_domains() {
        let geometries = vec![geometry(1, "blk1", 0.0), geometry(2, "blk2", 1.0)];
        let magnetizations = vec![magnetization("mfc1", &[2, 1], 45.0)];

        let linkage = DomainLinker::new().link(&geometries, &magnetizations);
        assert_eq!(linkage.records.len(), 2);
        assert_eq!(linkage.records[0].domain_id, DomainId(2));
        assert_eq!(linkage.records[0].position.x, 1.0);
        assert_eq!(linkage.records[1].direction.theta, 45.0);
        assert!(linkage.gaps.is_empty());
    }

    #[test]
    fn test_missing_geometry_is_a_gap() {
        let geometries = vec![geometry(1, "blk1", 0.0)];
        let magnetizations = vec![magnetization("mfc1", &[1, 99], 0.0)];

        let linkage = DomainLinker::new().link(&geometries, &magnetizations);
        assert_eq!(linkage.records.len(), 1);
        assert_eq!(
            linkage.gaps,
            vec![LinkageGap {
                domain_id: DomainId(99),
                magnetization_tag: "mfc1".to_string()
            }]
        );
    }

    #[test]
    fn test_first_geometry_wins() {
        let geometries = vec![geometry(1, "blk1", 5.0), geometry(1, "blk2", 7.0)];
        let magnetizations = vec![magnetization("mfc1", &[1], 0.0)];

        let linkage = DomainLinker::new().link(&geometries, &magnetizations);
        assert_eq!(linkage.records.len(), 1);
        assert_eq!(linkage.records[0].position.x, 5.0);
        assert_eq!(linkage.duplicate_geometries.len(), 1);
        assert_eq!(linkage.duplicate_geometries[0].dropped_tag, "blk2");
    }

    #[test]
    fn test_duplicate_assignment_keeps_first_claim() {
        let geometries = vec![geometry(1, "blk1", 0.0)];
        let magnetizations = vec![
            magnetization("mfc1", &[1], 10.0),
            magnetization("mfc2", &[1], 20.0),
        ];

        let linkage = DomainLinker::new().link(&geometries, &magnetizations);
        assert_eq!(linkage.records.len(), 1);
        assert_eq!(linkage.records[0].direction.theta, 10.0);
        assert_eq!(
            linkage.duplicate_assignments,
            vec![DuplicateAssignment {
                domain_id: DomainId(1),
                kept_tag: "mfc1".to_string(),
                dropped_tag: "mfc2".to_string()
            }]
        );
    }

    #[test]
    fn test_unmagnetized_geometry_is_listed() {
        let geometries = vec![
            geometry(3, "blk3", 0.0),
            geometry(1, "blk1", 0.0),
            geometry(2, "blk2", 0.0),
        ];
        let magnetizations = vec![magnetization("mfc1", &[2], 0.0)];

        let linkage = DomainLinker::new().link(&geometries, &magnetizations);
        assert_eq!(linkage.unmagnetized, vec![DomainId(1), DomainId(3)]);
    }
}
