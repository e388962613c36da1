//! The merge strategy.

use tracing::{debug, info};

use super::ConflictResolver;
use crate::errors::ConflictError;
use crate::merge::{naive_merge, three_way_merge};
use crate::models::{
    Conflict, ConflictSeverity, ConflictType, ResolutionResult, ResolutionStrategy,
};
use crate::options::ResolutionOptions;

/// Failure message for merges predicted to be unreliable.
const COMPLEXITY_REJECTION: &str = "merge complexity exceeds the configured ceiling";

/// Implements [`ResolutionStrategy::Merge`].
///
/// Overlapping conflicts get a three-way merge against the original text,
/// adjacent conflicts are stitched in source order, import conflicts are
/// merged by line union, and everything else falls back to the naive
/// prefix/suffix merge. Conflicts predicted too complex to merge reliably
/// are declined with a failure result rather than merged badly.
pub struct MergeResolver {
    options: ResolutionOptions,
}

impl MergeResolver {
    pub fn new() -> Self {
        Self {
            options: ResolutionOptions::default(),
        }
    }

    pub fn with_options(options: ResolutionOptions) -> Self {
        Self { options }
    }

    fn merge_overlapping(&self, conflict: &Conflict) -> ResolutionResult {
        let first = &conflict.first_change;
        let second = &conflict.second_change;

        // Both editors landed on the same text; nothing to reconcile.
        if first.modified_code == second.modified_code {
            debug!("identical replacement text, trivial merge");
            return ResolutionResult::resolved(
                conflict.clone(),
                ResolutionStrategy::Merge,
                first.modified_code.clone(),
                "both changes produce identical text",
            );
        }

        let outcome = three_way_merge(
            &first.original_code,
            &first.modified_code,
            &second.modified_code,
            self.options.add_conflict_markers,
        );

        ResolutionResult::resolved(
            conflict.clone(),
            ResolutionStrategy::Merge,
            outcome.merged,
            "three-way merge against the original text",
        )
        .with_warnings(outcome.warnings)
    }

    fn merge_adjacent(&self, conflict: &Conflict) -> ResolutionResult {
        let (earlier, later) = ordered_by_start(conflict);

        // Offsets are not recalculated; the later change is appended as-is.
        let resolved = format!("{}\n\n{}", earlier.modified_code, later.modified_code);
        ResolutionResult::resolved(
            conflict.clone(),
            ResolutionStrategy::Merge,
            resolved,
            "adjacent changes applied in source order",
        )
    }

    fn merge_imports(&self, conflict: &Conflict) -> ResolutionResult {
        // Exact string dedup; textually different duplicates survive.
        let mut lines: Vec<&str> = conflict
            .first_change
            .modified_code
            .lines()
            .chain(conflict.second_change.modified_code.lines())
            .collect();
        lines.sort_unstable();
        lines.dedup();

        ResolutionResult::resolved(
            conflict.clone(),
            ResolutionStrategy::Merge,
            lines.join("\n"),
            "import statements merged and sorted",
        )
    }

    fn merge_related(&self, conflict: &Conflict) -> ResolutionResult {
        let merged = naive_merge(
            &conflict.first_change.modified_code,
            &conflict.second_change.modified_code,
        );

        if self.options.attempt_semantic_merge {
            ResolutionResult::resolved(
                conflict.clone(),
                ResolutionStrategy::Merge,
                merged,
                "semantic merge",
            )
            .with_warnings(vec![
                "semantic merging is a placeholder; result produced by line-based merge"
                    .to_string(),
            ])
        } else {
            ResolutionResult::resolved(
                conflict.clone(),
                ResolutionStrategy::Merge,
                merged,
                "line-based fallback merge",
            )
            .with_warnings(vec!["semantic merging disabled".to_string()])
        }
    }
}

impl Default for MergeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictResolver for MergeResolver {
    fn name(&self) -> &str {
        "merge"
    }

    fn strategy(&self) -> ResolutionStrategy {
        ResolutionStrategy::Merge
    }

    fn resolve_conflict(&self, conflict: &Conflict) -> Result<ResolutionResult, ConflictError> {
        if conflict.severity == ConflictSeverity::Critical {
            return Ok(ResolutionResult::failed(
                conflict.clone(),
                ResolutionStrategy::Merge,
                "critical conflicts are never merged automatically",
            ));
        }

        let score = complexity_score(conflict);
        if score > self.options.max_merge_complexity {
            info!(score, ceiling = self.options.max_merge_complexity, "declining merge");
            return Ok(ResolutionResult::failed(
                conflict.clone(),
                ResolutionStrategy::Merge,
                COMPLEXITY_REJECTION,
            ));
        }

        let result = match conflict.conflict_type {
            ConflictType::Overlapping => self.merge_overlapping(conflict),
            ConflictType::Adjacent => self.merge_adjacent(conflict),
            ConflictType::Import => self.merge_imports(conflict),
            _ => self.merge_related(conflict),
        };
        Ok(result)
    }

    fn configure(&mut self, options: &ResolutionOptions) {
        self.options = options.clone();
    }
}

/// Predict how risky a merge is before attempting it.
///
/// One point per ten lines of the larger change, plus three for an
/// overlapping conflict, plus five for HIGH severity.
fn complexity_score(conflict: &Conflict) -> f64 {
    let lines = conflict
        .first_change
        .modified_line_count()
        .max(conflict.second_change.modified_line_count());

    let mut score = lines as f64 / 10.0;
    if conflict.conflict_type == ConflictType::Overlapping {
        score += 3.0;
    }
    if conflict.severity == ConflictSeverity::High {
        score += 5.0;
    }
    score
}

/// The two changes ordered by ascending start line.
fn ordered_by_start(conflict: &Conflict) -> (&crate::models::CodeChange, &crate::models::CodeChange) {
    let first = &conflict.first_change;
    let second = &conflict.second_change;
    if first.location.start_line <= second.location.start_line {
        (first, second)
    } else {
        (second, first)
    }
}
