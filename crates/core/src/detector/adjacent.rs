//! Detection of nearby, non-overlapping edits.

use tracing::debug;

use super::ConflictDetector;
use crate::errors::ConflictError;
use crate::models::{CodeChange, Conflict, ConflictSeverity, ConflictType};
use crate::options::DetectionOptions;

/// Detects two same-file changes whose line ranges sit within a small gap
/// of each other without overlapping.
///
/// Adjacent edits usually merge cleanly by applying them in order, but the
/// second change's offsets may shift once the first lands, so they are
/// still worth flagging.
#[derive(Debug)]
pub struct AdjacentConflictDetector {
    threshold: u32,
}

impl AdjacentConflictDetector {
    /// Detector with the default 3-line gap.
    pub fn new() -> Self {
        Self { threshold: 3 }
    }

    /// Detector with a custom gap.
    pub fn with_threshold(threshold: u32) -> Self {
        Self { threshold }
    }
}

impl Default for AdjacentConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictDetector for AdjacentConflictDetector {
    fn name(&self) -> &str {
        "adjacent"
    }

    fn conflict_type(&self) -> ConflictType {
        ConflictType::Adjacent
    }

    fn detect_conflict(
        &self,
        first: &CodeChange,
        second: &CodeChange,
    ) -> Result<Option<Conflict>, ConflictError> {
        if !first.location.is_adjacent(&second.location, self.threshold) {
            return Ok(None);
        }

        let gap = first.location.distance(&second.location).unwrap_or(0);
        debug!(gap, threshold = self.threshold, "adjacent edits detected");

        Ok(Some(Conflict::new(
            ConflictType::Adjacent,
            ConflictSeverity::Low,
            first.clone(),
            second.clone(),
            format!("changes are {gap} line(s) apart and may shift each other"),
        )))
    }

    fn configure(&mut self, options: &DetectionOptions) {
        self.threshold = options.adjacency_threshold;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConflictLocation;

    fn change(start: u32, end: u32) -> CodeChange {
        CodeChange::new(
            "old",
            "new",
            ConflictLocation::in_file("src/App.tsx", start, end),
        )
    }

    #[test]
    fn test_detects_nearby_changes() {
        let detector = AdjacentConflictDetector::new();
        let conflict = detector
            .detect_conflict(&change(1, 4), &change(6, 8))
            .unwrap()
            .unwrap();
        assert_eq!(conflict.conflict_type, ConflictType::Adjacent);
        assert_eq!(conflict.severity, ConflictSeverity::Low);
    }

    #[test]
    fn test_ignores_overlapping_and_distant_changes() {
        let detector = AdjacentConflictDetector::new();
        assert!(detector
            .detect_conflict(&change(1, 4), &change(3, 6))
            .unwrap()
            .is_none());
        assert!(detector
            .detect_conflict(&change(1, 4), &change(20, 22))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_configure_updates_threshold() {
        let mut detector = AdjacentConflictDetector::new();
        let far = change(10, 12);
        assert!(detector
            .detect_conflict(&change(1, 4), &far)
            .unwrap()
            .is_none());

        let mut options = DetectionOptions::default();
        options.adjacency_threshold = 6;
        detector.configure(&options);
        assert!(detector
            .detect_conflict(&change(1, 4), &far)
            .unwrap()
            .is_some());
    }
}
