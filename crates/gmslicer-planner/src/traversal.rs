//! Traversal ordering
//!
//! The rig builds bottom-up: every domain of a lower layer is placed and
//! cured before anything above it. Within a layer, domains nearer the Z axis
//! come first so consecutive moves stay short.

use gmslicer_core::DomainRecord;
use std::cmp::Ordering;

/// How records are grouped into Z layers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayeringPolicy {
    /// Records share a layer only when their Z values are identical
    Exact,
    /// Records whose Z lies within the tolerance (meters) of the first Z of
    /// the current layer share that layer
    Tolerance(f64),
}

impl Default for LayeringPolicy {
    fn default() -> Self {
        Self::Exact
    }
}

impl LayeringPolicy {
    /// Build a policy from an optional tolerance
    pub fn from_tolerance(tolerance: Option<f64>) -> Self {
        match tolerance {
            Some(eps) => Self::Tolerance(eps),
            None => Self::Exact,
        }
    }

    /// Whether the policy parameters are usable
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Exact => true,
            Self::Tolerance(eps) => eps.is_finite() && *eps >= 0.0,
        }
    }
}

/// Orders domain records for traversal
#[derive(Debug, Clone, Copy, Default)]
pub struct TraversalSorter {
    policy: LayeringPolicy,
}

impl TraversalSorter {
    /// Create a sorter using the given layering policy
    pub fn new(policy: LayeringPolicy) -> Self {
        Self { policy }
    }

    /// Active layering policy
    pub fn policy(&self) -> LayeringPolicy {
        self.policy
    }

    /// Sort records in place: ascending Z layer, then ascending radial
    /// distance. The sort is stable, so records with equal keys keep their
    /// input order.
    pub fn sort(&self, records: &mut [DomainRecord]) {
        match self.policy {
            LayeringPolicy::Exact => records.sort_by(compare_exact),
            LayeringPolicy::Tolerance(eps) => sort_layered(records, eps),
        }
        tracing::debug!(count = records.len(), policy = ?self.policy, "Sorted domains");
    }

    /// Consume and return the records in traversal order
    pub fn sorted(&self, mut records: Vec<DomainRecord>) -> Vec<DomainRecord> {
        self.sort(&mut records);
        records
    }

    /// Split already-sorted records into layers according to the policy
    pub fn layers<'a>(&self, records: &'a [DomainRecord]) -> Vec<&'a [DomainRecord]> {
        let eps = match self.policy {
            LayeringPolicy::Exact => 0.0,
            LayeringPolicy::Tolerance(eps) => eps,
        };
        layer_bounds(records, eps)
            .into_iter()
            .map(|(start, end)| &records[start..end])
            .collect()
    }
}

// Adding +0.0 folds -0.0 into +0.0 so both land in the same layer
fn layer_z(record: &DomainRecord) -> f64 {
    record.position.z + 0.0
}

fn compare_z(a: &DomainRecord, b: &DomainRecord) -> Ordering {
    layer_z(a).total_cmp(&layer_z(b))
}

fn compare_exact(a: &DomainRecord, b: &DomainRecord) -> Ordering {
    compare_z(a, b).then_with(|| compare_radial(a, b))
}

fn compare_radial(a: &DomainRecord, b: &DomainRecord) -> Ordering {
    a.position.radial().total_cmp(&b.position.radial())
}

fn sort_layered(records: &mut [DomainRecord], eps: f64) {
    records.sort_by(compare_z);
    for (start, end) in layer_bounds(records, eps) {
        records[start..end].sort_by(compare_radial);
    }
}

// Records must already be ascending in Z
fn layer_bounds(records: &[DomainRecord], eps: f64) -> Vec<(usize, usize)> {
    let mut bounds = Vec::new();
    let mut start = 0;
    while start < records.len() {
        let base = layer_z(&records[start]);
        let mut end = start + 1;
        while end < records.len() && layer_z(&records[end]) - base <= eps {
            end += 1;
        }
        bounds.push((start, end));
        start = end;
    }
    bounds
}

/// Check that adjacent records satisfy the exact traversal order:
/// `z1 <= z2`, and `radial1 <= radial2` whenever `z1 == z2`
pub fn is_traversal_ordered(records: &[DomainRecord]) -> bool {
    records.windows(2).all(|pair| {
        let (a, b) = (&pair[0], &pair[1]);
        match compare_z(a, b) {
            Ordering::Less => true,
            Ordering::Equal => a.position.radial() <= b.position.radial(),
            Ordering::Greater => false,
        }
    })
}
