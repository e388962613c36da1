//! The take-one-side strategies.

use tracing::debug;

use super::ConflictResolver;
use crate::errors::ConflictError;
use crate::models::{Conflict, ResolutionResult, ResolutionStrategy};

/// Implements [`ResolutionStrategy::TakeFirst`]: keep the first change's
/// modified text and discard the second change entirely.
#[derive(Debug, Default)]
pub struct TakeFirstResolver;

impl TakeFirstResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ConflictResolver for TakeFirstResolver {
    fn name(&self) -> &str {
        "take_first"
    }

    fn strategy(&self) -> ResolutionStrategy {
        ResolutionStrategy::TakeFirst
    }

    fn resolve_conflict(&self, conflict: &Conflict) -> Result<ResolutionResult, ConflictError> {
        debug!(conflict_id = %conflict.id, "resolving conflict: keep first change");
        Ok(ResolutionResult::resolved(
            conflict.clone(),
            ResolutionStrategy::TakeFirst,
            conflict.first_change.modified_code.clone(),
            "kept the first change, discarded the second",
        ))
    }
}

/// Implements [`ResolutionStrategy::TakeSecond`]: keep the second change's
/// modified text and discard the first change entirely.
#[derive(Debug, Default)]
pub struct TakeSecondResolver;

impl TakeSecondResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ConflictResolver for TakeSecondResolver {
    fn name(&self) -> &str {
        "take_second"
    }

    fn strategy(&self) -> ResolutionStrategy {
        ResolutionStrategy::TakeSecond
    }

    fn resolve_conflict(&self, conflict: &Conflict) -> Result<ResolutionResult, ConflictError> {
        debug!(conflict_id = %conflict.id, "resolving conflict: keep second change");
        Ok(ResolutionResult::resolved(
            conflict.clone(),
            ResolutionStrategy::TakeSecond,
            conflict.second_change.modified_code.clone(),
            "kept the second change, discarded the first",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CodeChange, ConflictLocation, ConflictSeverity, ConflictType};

    fn conflict() -> Conflict {
        let loc = ConflictLocation::in_file("src/App.tsx", 1, 2);
        Conflict::new(
            ConflictType::Overlapping,
            ConflictSeverity::Low,
            CodeChange::new("old", "first version", loc.clone()),
            CodeChange::new("old", "second version", loc),
            "competing one-liners",
        )
    }

    #[test]
    fn test_take_first_keeps_first_text() {
        let result = TakeFirstResolver::new().resolve_conflict(&conflict()).unwrap();
        assert!(result.success);
        assert_eq!(result.resolved_code.as_deref(), Some("first version"));
        assert_eq!(result.strategy, ResolutionStrategy::TakeFirst);
    }

    #[test]
    fn test_take_second_keeps_second_text() {
        let result = TakeSecondResolver::new().resolve_conflict(&conflict()).unwrap();
        assert!(result.success);
        assert_eq!(result.resolved_code.as_deref(), Some("second version"));
        assert_eq!(result.strategy, ResolutionStrategy::TakeSecond);
    }

    #[test]
    fn test_take_resolvers_claim_only_low_severity() {
        let resolver = TakeFirstResolver::new();
        let mut high = conflict();
        high.severity = ConflictSeverity::High;
        assert!(resolver.can_resolve(&conflict()));
        assert!(!resolver.can_resolve(&high));
    }
}
