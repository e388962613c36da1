//! The sequential-application strategy.

use tracing::debug;

use super::ConflictResolver;
use crate::errors::ConflictError;
use crate::models::{Conflict, ResolutionResult, ResolutionStrategy};

/// Implements [`ResolutionStrategy::Sequential`]: order the two changes by
/// start line and apply them one after the other.
///
/// By the default claim heuristic this resolver takes ADJACENT and RELATED
/// conflicts, whose ranges don't collide. Offsets are not recalculated for
/// the later change.
#[derive(Debug, Default)]
pub struct SequentialResolver;

impl SequentialResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ConflictResolver for SequentialResolver {
    fn name(&self) -> &str {
        "sequential"
    }

    fn strategy(&self) -> ResolutionStrategy {
        ResolutionStrategy::Sequential
    }

    fn resolve_conflict(&self, conflict: &Conflict) -> Result<ResolutionResult, ConflictError> {
        let first = &conflict.first_change;
        let second = &conflict.second_change;
        let (earlier, later) = if first.location.start_line <= second.location.start_line {
            (first, second)
        } else {
            (second, first)
        };

        debug!(
            earlier = earlier.location.start_line,
            later = later.location.start_line,
            "resolving conflict: apply changes sequentially"
        );

        Ok(ResolutionResult::resolved(
            conflict.clone(),
            ResolutionStrategy::Sequential,
            format!("{}\n\n{}", earlier.modified_code, later.modified_code),
            "changes applied in source order",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CodeChange, ConflictLocation, ConflictSeverity, ConflictType};

    #[test]
    fn test_orders_by_start_line() {
        let later = CodeChange::new(
            "b",
            "second block",
            ConflictLocation::in_file("src/App.tsx", 9, 10),
        );
        let earlier = CodeChange::new(
            "a",
            "first block",
            ConflictLocation::in_file("src/App.tsx", 2, 3),
        );
        let conflict = Conflict::new(
            ConflictType::Adjacent,
            ConflictSeverity::Low,
            later,
            earlier,
            "adjacent edits",
        );

        let result = SequentialResolver::new().resolve_conflict(&conflict).unwrap();
        assert!(result.success);
        assert_eq!(
            result.resolved_code.as_deref(),
            Some("first block\n\nsecond block")
        );
    }

    #[test]
    fn test_claims_adjacent_and_related_at_any_severity() {
        let resolver = SequentialResolver::new();
        let loc = ConflictLocation::in_file("src/App.tsx", 1, 2);
        let mut conflict = Conflict::new(
            ConflictType::Related,
            ConflictSeverity::High,
            CodeChange::new("a", "b", loc.clone()),
            CodeChange::new("a", "c", loc),
            "related edits",
        );
        assert!(resolver.can_resolve(&conflict));

        conflict.conflict_type = ConflictType::Overlapping;
        assert!(!resolver.can_resolve(&conflict));
    }
}
