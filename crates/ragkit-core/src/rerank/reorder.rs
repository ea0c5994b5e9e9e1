//! Long-context reorder post-step.

use crate::document::Document;
use std::collections::VecDeque;

/// Re-interleaves ranked documents so the strongest sit at both edges.
///
/// Language models attend least to the middle of a long context, so after
/// reranking the best documents are spread to the front and the back of
/// the list, leaving the weakest in the middle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReorderRunner;

impl ReorderRunner {
    /// Creates a reorder runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reorders documents ranked best-first into an edges-first layout.
    #[must_use]
    pub fn run(&self, documents: Vec<Document>) -> Vec<Document> {
        let mut reordered = VecDeque::with_capacity(documents.len());
        for (position, document) in documents.into_iter().rev().enumerate() {
            if position % 2 == 0 {
                reordered.push_front(document);
            } else {
                reordered.push_back(document);
            }
        }
        reordered.into()
    }
}
