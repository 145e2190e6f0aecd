/// Listing scoring for fuzzy catalog search
///
/// A listing's score against a tokenized query is built per token:
///   1. best = max over fields of weight(field) * similarity(token, field)
///   2. running = min(1.0, running + best)
///   3. final = running / max(1, token count)
///
/// Weighted field scores may exceed 1.0; only the running total is clamped.
/// All scoring is pure: no I/O and no mutation of the listing.

use crate::catalog::Listing;
use crate::search::similarity::SimilarityScorer;
use crate::search::weights::{ScoringWeights, SearchField};

/// Scores listings against query tokens with a fixed weighting table.
#[derive(Debug, Clone)]
pub struct ListingScorer {
    weights: ScoringWeights,
    similarity: SimilarityScorer,
}

impl Default for ListingScorer {
    fn default() -> Self {
        ListingScorer::new(ScoringWeights::default())
    }
}

impl ListingScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        let similarity = SimilarityScorer::new(weights.containment);
        ListingScorer { weights, similarity }
    }

    /// Best weighted similarity of one token across the searchable fields.
    pub fn token_score(&self, listing: &Listing, token: &str) -> f64 {
        SearchField::ALL
            .iter()
            .map(|&field| {
                self.weights.weight(field) * self.similarity.similarity(token, listing.field_text(field))
            })
            .fold(0.0, f64::max)
    }

    /// Score of a listing in [0, 1].
    ///
    /// Callers short-circuit blank queries before getting here; with no tokens
    /// this returns 0.0.
    pub fn score(&self, listing: &Listing, tokens: &[String]) -> f64 {
        let total = tokens.iter().fold(0.0_f64, |running, token| {
            (running + self.token_score(listing, token)).min(1.0)
        });
        total / tokens.len().max(1) as f64
    }
}
