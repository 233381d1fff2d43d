use std::collections::{HashSet, VecDeque};

use crate::models::Candidate;

/// Ordered queue of undecided candidates
///
/// The front candidate is interactive, the second is shown as a preview.
/// Decided ids are remembered so a refill can never re-offer them.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    queue: VecDeque<Candidate>,
    queued_ids: HashSet<String>,
    decided_ids: HashSet<String>,
}

/// Counts returned by [`Deck::extend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtendSummary {
    pub added: usize,
    pub skipped: usize,
}

impl Deck {
    /// Build a deck; duplicate ids keep their first occurrence
    pub fn new(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut deck = Self::default();
        deck.extend(candidates);
        deck
    }

    /// Append candidates, skipping ids already queued or decided
    pub fn extend(&mut self, candidates: impl IntoIterator<Item = Candidate>) -> ExtendSummary {
        let mut summary = ExtendSummary::default();

        for candidate in candidates {
            if self.decided_ids.contains(&candidate.id) || self.queued_ids.contains(&candidate.id) {
                tracing::debug!("Skipping candidate {} already queued or decided", candidate.id);
                summary.skipped += 1;
                continue;
            }
            self.queued_ids.insert(candidate.id.clone());
            self.queue.push_back(candidate);
            summary.added += 1;
        }

        summary
    }

    /// The interactive candidate
    pub fn front(&self) -> Option<&Candidate> {
        self.queue.front()
    }

    /// The preview candidate behind the front
    pub fn next(&self) -> Option<&Candidate> {
        self.queue.get(1)
    }

    /// Remove the front candidate permanently
    pub(crate) fn pop_decided(&mut self) -> Option<Candidate> {
        let candidate = self.queue.pop_front()?;
        self.queued_ids.remove(&candidate.id);
        self.decided_ids.insert(candidate.id.clone());
        Some(candidate)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn decided_count(&self) -> usize {
        self.decided_ids.len()
    }

    pub fn was_decided(&self, id: &str) -> bool {
        self.decided_ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.queue.iter()
    }
}
