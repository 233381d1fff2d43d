use crate::core::SwipeObserver;
use crate::models::{Candidate, Decision, DecisionRecord};

/// In-memory record of committed decisions
///
/// Stands in for the host's persistence: every like/pass reaches it through
/// the controller's decision hook.
#[derive(Debug, Clone, Default)]
pub struct DecisionLog {
    records: Vec<DecisionRecord>,
}

impl DecisionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[DecisionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records with the given decision
    pub fn count(&self, decision: Decision) -> usize {
        self.records.iter().filter(|r| r.decision == decision).count()
    }
}

impl SwipeObserver for DecisionLog {
    fn on_decision(&mut self, candidate: &Candidate, decision: Decision) {
        tracing::debug!("Recording {:?} for {}", decision, candidate.id);
        self.records.push(DecisionRecord {
            candidate_id: candidate.id.clone(),
            candidate_name: candidate.name.clone(),
            decision,
            decided_at: chrono::Utc::now(),
        });
    }
}
