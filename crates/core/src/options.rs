//! Engine configuration.
//!
//! Options come in pairs: a concrete struct holding the effective
//! configuration with defaults, and a partial `*Update` struct whose set
//! fields overwrite the corresponding values when merged. Unset fields
//! leave the existing configuration untouched, so repeated updates compose.

use serde::{Deserialize, Serialize};

use crate::models::{ConflictSeverity, ResolutionStrategy};

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Effective detection configuration.
///
/// The `detect_*` flags gate registered detectors by the conflict type they
/// emit; `adjacency_threshold` is the line gap within which two
/// non-overlapping changes count as adjacent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectionOptions {
    #[serde(default = "default_true")]
    pub detect_overlapping: bool,
    #[serde(default = "default_true")]
    pub detect_adjacent: bool,
    #[serde(default = "default_true")]
    pub detect_related: bool,
    #[serde(default = "default_true")]
    pub detect_semantic: bool,
    #[serde(default = "default_true")]
    pub detect_import: bool,
    #[serde(default = "default_true")]
    pub detect_dependency: bool,
    /// Line gap for adjacency detection.
    #[serde(default = "default_adjacency_threshold")]
    pub adjacency_threshold: u32,
}

fn default_true() -> bool {
    true
}
fn default_adjacency_threshold() -> u32 {
    3
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            detect_overlapping: true,
            detect_adjacent: true,
            detect_related: true,
            detect_semantic: true,
            detect_import: true,
            detect_dependency: true,
            adjacency_threshold: default_adjacency_threshold(),
        }
    }
}

impl DetectionOptions {
    /// Apply a partial update. Set fields override, unset fields are kept.
    pub fn merge(&mut self, update: &DetectionUpdate) {
        if let Some(v) = update.detect_overlapping {
            self.detect_overlapping = v;
        }
        if let Some(v) = update.detect_adjacent {
            self.detect_adjacent = v;
        }
        if let Some(v) = update.detect_related {
            self.detect_related = v;
        }
        if let Some(v) = update.detect_semantic {
            self.detect_semantic = v;
        }
        if let Some(v) = update.detect_import {
            self.detect_import = v;
        }
        if let Some(v) = update.detect_dependency {
            self.detect_dependency = v;
        }
        if let Some(v) = update.adjacency_threshold {
            self.adjacency_threshold = v;
        }
    }
}

/// Partial detection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectionUpdate {
    pub detect_overlapping: Option<bool>,
    pub detect_adjacent: Option<bool>,
    pub detect_related: Option<bool>,
    pub detect_semantic: Option<bool>,
    pub detect_import: Option<bool>,
    pub detect_dependency: Option<bool>,
    pub adjacency_threshold: Option<u32>,
}

impl DetectionUpdate {
    pub fn adjacency_threshold(threshold: u32) -> Self {
        Self {
            adjacency_threshold: Some(threshold),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Effective resolution configuration, shared between the manager and the
/// resolvers it pushes updates to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolutionOptions {
    /// Strategy used when a conflict carries no suggestion.
    #[serde(default = "default_strategy")]
    pub default_strategy: ResolutionStrategy,
    /// Whether the manager resolves conflicts without being asked per-conflict.
    #[serde(default = "default_true")]
    pub auto_resolve: bool,
    /// Severity ceiling above which auto-resolution is refused.
    pub auto_resolve_threshold: Option<ConflictSeverity>,
    /// Whether unreconcilable merge regions get inline conflict markers.
    #[serde(default = "default_true")]
    pub add_conflict_markers: bool,
    /// Complexity score above which the merge resolver declines.
    #[serde(default = "default_max_merge_complexity")]
    pub max_merge_complexity: f64,
    /// Whether related conflicts take the semantic merge path.
    #[serde(default = "default_true")]
    pub attempt_semantic_merge: bool,
}

fn default_strategy() -> ResolutionStrategy {
    ResolutionStrategy::Merge
}
fn default_max_merge_complexity() -> f64 {
    10.0
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            default_strategy: default_strategy(),
            auto_resolve: true,
            auto_resolve_threshold: None,
            add_conflict_markers: true,
            max_merge_complexity: default_max_merge_complexity(),
            attempt_semantic_merge: true,
        }
    }
}

impl ResolutionOptions {
    /// Apply a partial update. Set fields override, unset fields are kept.
    pub fn merge(&mut self, update: &ResolutionUpdate) {
        if let Some(v) = update.default_strategy {
            self.default_strategy = v;
        }
        if let Some(v) = update.auto_resolve {
            self.auto_resolve = v;
        }
        if let Some(v) = update.auto_resolve_threshold {
            self.auto_resolve_threshold = Some(v);
        }
        if let Some(v) = update.add_conflict_markers {
            self.add_conflict_markers = v;
        }
        if let Some(v) = update.max_merge_complexity {
            self.max_merge_complexity = v;
        }
        if let Some(v) = update.attempt_semantic_merge {
            self.attempt_semantic_merge = v;
        }
    }
}

/// Partial resolution configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResolutionUpdate {
    pub default_strategy: Option<ResolutionStrategy>,
    pub auto_resolve: Option<bool>,
    pub auto_resolve_threshold: Option<ConflictSeverity>,
    pub add_conflict_markers: Option<bool>,
    pub max_merge_complexity: Option<f64>,
    pub attempt_semantic_merge: Option<bool>,
}

impl ResolutionUpdate {
    pub fn auto_resolve(enabled: bool) -> Self {
        Self {
            auto_resolve: Some(enabled),
            ..Self::default()
        }
    }

    pub fn auto_resolve_threshold(threshold: ConflictSeverity) -> Self {
        Self {
            auto_resolve_threshold: Some(threshold),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_defaults() {
        let options = DetectionOptions::default();
        assert!(options.detect_overlapping);
        assert!(options.detect_dependency);
        assert_eq!(options.adjacency_threshold, 3);
    }

    #[test]
    fn test_merge_overrides_only_set_fields() {
        let mut options = DetectionOptions::default();
        options.merge(&DetectionUpdate {
            detect_import: Some(false),
            ..DetectionUpdate::default()
        });
        assert!(!options.detect_import);
        assert!(options.detect_overlapping);
        assert_eq!(options.adjacency_threshold, 3);
    }

    #[test]
    fn test_later_updates_override_earlier() {
        let mut options = DetectionOptions::default();
        options.merge(&DetectionUpdate::adjacency_threshold(5));
        options.merge(&DetectionUpdate::adjacency_threshold(8));
        assert_eq!(options.adjacency_threshold, 8);

        // A later update that does not mention the key keeps it.
        options.merge(&DetectionUpdate {
            detect_related: Some(false),
            ..DetectionUpdate::default()
        });
        assert_eq!(options.adjacency_threshold, 8);
        assert!(!options.detect_related);
    }

    #[test]
    fn test_resolution_defaults() {
        let options = ResolutionOptions::default();
        assert_eq!(options.default_strategy, ResolutionStrategy::Merge);
        assert!(options.auto_resolve);
        assert!(options.auto_resolve_threshold.is_none());
        assert!(options.add_conflict_markers);
        assert_eq!(options.max_merge_complexity, 10.0);
    }

    #[test]
    fn test_resolution_merge() {
        let mut options = ResolutionOptions::default();
        options.merge(&ResolutionUpdate {
            auto_resolve: Some(false),
            max_merge_complexity: Some(4.0),
            ..ResolutionUpdate::default()
        });
        assert!(!options.auto_resolve);
        assert_eq!(options.max_merge_complexity, 4.0);
        assert_eq!(options.default_strategy, ResolutionStrategy::Merge);
    }
}
