//! Partial results of an extraction pass
//!
//! A bad feature never aborts the run. Its error is logged with the feature
//! tag and kept alongside the records that were read successfully.

use gmslicer_core::ExtractionError;
use serde::Serialize;
use std::fmt;

/// A feature that could not be read
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFailure {
    /// Tag of the failed feature
    pub tag: String,
    /// Why it failed
    pub error: ExtractionError,
}

impl fmt::Display for FeatureFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag, self.error)
    }
}

impl Serialize for FeatureFailure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("FeatureFailure", 2)?;
        s.serialize_field("tag", &self.tag)?;
        s.serialize_field("reason", &self.error.to_string())?;
        s.end()
    }
}

/// Records read from the model plus the features that failed
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    /// Successfully extracted records, in feature order
    pub items: Vec<T>,
    /// Features skipped because of an error
    pub failures: Vec<FeatureFailure>,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Extraction<T> {
    /// Record the outcome of reading one feature
    pub fn push(&mut self, tag: &str, outcome: Result<T, ExtractionError>) {
        match outcome {
            Ok(item) => self.items.push(item),
            Err(error) => {
                tracing::warn!(tag, %error, "Skipping feature");
                self.failures.push(FeatureFailure {
                    tag: tag.to_string(),
                    error,
                });
            }
        }
    }

    /// Whether every feature was read
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
