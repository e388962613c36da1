//! Conflict detection.
//!
//! A detector is a pluggable rule: given two changes, decide whether they
//! conflict under that rule and, if so, describe how. Detectors are pure
//! with respect to everything but their own configuration, which the
//! [`ConflictManager`](crate::manager::ConflictManager) pushes to them via
//! [`ConflictDetector::configure`].

pub mod adjacent;
pub mod import;
pub mod overlapping;
pub mod related;

pub use adjacent::AdjacentConflictDetector;
pub use import::ImportConflictDetector;
pub use overlapping::OverlappingConflictDetector;
pub use related::RelatedConflictDetector;

use crate::errors::ConflictError;
use crate::models::{CodeChange, Conflict, ConflictType};
use crate::options::DetectionOptions;

/// A pluggable conflict detection rule.
///
/// Each detector has a unique name and emits exactly one
/// [`ConflictType`]. `detect_conflict` returns `Ok(None)` when the pair
/// does not conflict under this detector's rule; an `Err` is logged by the
/// manager and never aborts the surrounding scan.
pub trait ConflictDetector: Send {
    /// Unique identifier, used as the registry key.
    fn name(&self) -> &str;

    /// The single conflict type this detector can emit.
    fn conflict_type(&self) -> ConflictType;

    /// Examine one pair of changes.
    fn detect_conflict(
        &self,
        first: &CodeChange,
        second: &CodeChange,
    ) -> Result<Option<Conflict>, ConflictError>;

    /// Receive the manager's merged detection options. Detectors without
    /// knobs ignore this.
    fn configure(&mut self, _options: &DetectionOptions) {}
}

/// Signature of an ad hoc detection rule.
pub type DetectRule = dyn Fn(&CodeChange, &CodeChange) -> Option<Conflict> + Send + Sync;

/// A detector wrapping a caller-supplied closure.
///
/// Lets callers inject one-off rules through the ordinary detector
/// registry, with the same ordering and error-isolation guarantees as the
/// built-in detectors.
pub struct RuleDetector {
    name: String,
    conflict_type: ConflictType,
    rule: Box<DetectRule>,
}

impl RuleDetector {
    /// Wrap `rule` as a named detector emitting `conflict_type`.
    pub fn new(
        name: impl Into<String>,
        conflict_type: ConflictType,
        rule: impl Fn(&CodeChange, &CodeChange) -> Option<Conflict> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            conflict_type,
            rule: Box::new(rule),
        }
    }
}

impl ConflictDetector for RuleDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn conflict_type(&self) -> ConflictType {
        self.conflict_type
    }

    fn detect_conflict(
        &self,
        first: &CodeChange,
        second: &CodeChange,
    ) -> Result<Option<Conflict>, ConflictError> {
        Ok((self.rule)(first, second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConflictLocation, ConflictSeverity};

    #[test]
    fn test_rule_detector_delegates_to_closure() {
        let detector = RuleDetector::new("same-text", ConflictType::Semantic, |c1, c2| {
            if c1.modified_code == c2.modified_code {
                Some(Conflict::new(
                    ConflictType::Semantic,
                    ConflictSeverity::Low,
                    c1.clone(),
                    c2.clone(),
                    "identical replacement text",
                ))
            } else {
                None
            }
        });

        let loc = ConflictLocation::in_file("src/App.tsx", 1, 2);
        let a = CodeChange::new("x", "y", loc.clone());
        let b = CodeChange::new("x", "y", loc.clone());
        let c = CodeChange::new("x", "z", loc);

        assert_eq!(detector.name(), "same-text");
        assert!(detector.detect_conflict(&a, &b).unwrap().is_some());
        assert!(detector.detect_conflict(&a, &c).unwrap().is_none());
    }
}
