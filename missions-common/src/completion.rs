//! Completion ledger
//!
//! In-process record of which person has completed which mission step.
//! Recording is idempotent: at most one completion exists per
//! (person, step) pair, and re-recording an existing pair is a no-op.
//! Stands in for the external completion-recording collaborator; nothing
//! here is persisted.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Shared, clonable completion ledger
#[derive(Clone, Default)]
pub struct CompletionLedger {
    inner: Arc<RwLock<BTreeMap<String, BTreeSet<String>>>>,
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion. Returns true when it was newly recorded,
    /// false when the pair was already present.
    pub async fn record(&self, person: &str, step: &str) -> bool {
        let mut inner = self.inner.write().await;
        let newly = inner
            .entry(person.to_string())
            .or_default()
            .insert(step.to_string());
        if newly {
            info!("{} completed step {}", person, step);
        }
        newly
    }

    /// Whether a person has completed a step
    pub async fn is_completed(&self, person: &str, step: &str) -> bool {
        self.inner
            .read()
            .await
            .get(person)
            .map(|steps| steps.contains(step))
            .unwrap_or(false)
    }

    /// All steps a person has completed
    pub async fn completed_steps(&self, person: &str) -> BTreeSet<String> {
        self.inner
            .read()
            .await
            .get(person)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_is_idempotent() {
        let ledger = CompletionLedger::new();

        assert!(ledger.record("paulproteus", "tar").await);
        assert!(!ledger.record("paulproteus", "tar").await);

        let steps = ledger.completed_steps("paulproteus").await;
        assert_eq!(steps.len(), 1);
        assert!(ledger.is_completed("paulproteus", "tar").await);
    }

    #[tokio::test]
    async fn people_and_steps_are_independent() {
        let ledger = CompletionLedger::new();

        ledger.record("paulproteus", "tar").await;

        assert!(!ledger.is_completed("paulproteus", "tar_extract").await);
        assert!(!ledger.is_completed("someoneelse", "tar").await);
        assert!(ledger.completed_steps("someoneelse").await.is_empty());
    }
}
