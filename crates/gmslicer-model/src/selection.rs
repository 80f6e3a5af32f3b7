//! Policies for picking a feature's authoritative domain id
//!
//! After re-evaluation a block feature may enumerate several candidate
//! domain entities. The live model appends the most recently created domain
//! last, so [`LastEntity`] is the default. The choice is kept behind a trait
//! so it can be swapped without touching the extractor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Picks one domain entity out of the list reported by the model
pub trait SelectionPolicy {
    /// Return the chosen entity, or `None` if the list offers no candidate
    fn select(&self, entities: &[i64]) -> Option<i64>;
}

impl<F> SelectionPolicy for F
where
    F: Fn(&[i64]) -> Option<i64>,
{
    fn select(&self, entities: &[i64]) -> Option<i64> {
        self(entities)
    }
}

/// Pick the most recently created entity (the last one)
#[derive(Debug, Clone, Copy, Default)]
pub struct LastEntity;

impl SelectionPolicy for LastEntity {
    fn select(&self, entities: &[i64]) -> Option<i64> {
        entities.last().copied()
    }
}

/// Pick the first entity
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEntity;

impl SelectionPolicy for FirstEntity {
    fn select(&self, entities: &[i64]) -> Option<i64> {
        entities.first().copied()
    }
}

/// Configurable selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// See [`LastEntity`]
    Last,
    /// See [`FirstEntity`]
    First,
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        Self::Last
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Last => write!(f, "last"),
            Self::First => write!(f, "first"),
        }
    }
}

impl SelectionPolicy for SelectionStrategy {
    fn select(&self, entities: &[i64]) -> Option<i64> {
        match self {
            Self::Last => LastEntity.select(entities),
            Self::First => FirstEntity.select(entities),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_entity() {
        assert_eq!(LastEntity.select(&[1, 2, 3]), Some(3));
        assert_eq!(LastEntity.select(&[]), None);
    }

    #[test]
    fn test_first_entity() {
        assert_eq!(FirstEntity.select(&[4, 5]), Some(4));
        assert_eq!(FirstEntity.select(&[]), None);
    }

    #[test]
    fn test_closure_policy() {
        let max = |entities: &[i64]| entities.iter().copied().max();
        assert_eq!(max.select(&[3, 9, 2]), Some(9));
    }

    #[test]
    fn test_strategy_dispatch() {
        assert_eq!(SelectionStrategy::default().select(&[1, 2]), Some(2));
        assert_eq!(SelectionStrategy::First.select(&[1, 2]), Some(1));
    }
}
