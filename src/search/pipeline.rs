/// Ranking pipeline for catalog search
///
/// Steps, in order:
/// 1. Keep listings in the requested category (catalog order preserved)
/// 2. Blank query: everything left matches, unscored, in catalog order
/// 3. Otherwise match by strategy:
///    - fuzzy-weighted: score every listing, keep score >= threshold,
///      sort by score descending then id ascending
///    - exact-substring: keep listings where a field contains the query, catalog order
/// 4. Slice the requested page and report the pre-pagination total
///
/// The pipeline is total: any page/limit/threshold is normalized rather than rejected,
/// and the catalog slice is only ever borrowed.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Listing;
use crate::config::SearchConfig;
use crate::search::scorer::ListingScorer;
use crate::search::tokenizer::{is_blank_query, tokenize_query};
use crate::search::weights::SearchField;

/// How a non-blank query selects listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// Weighted Levenshtein similarity across fields, thresholded and ranked
    #[default]
    FuzzyWeighted,
    /// Case-insensitive containment of the whole query in any field, unranked
    ExactSubstring,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::FuzzyWeighted => write!(f, "fuzzy-weighted"),
            MatchStrategy::ExactSubstring => write!(f, "exact-substring"),
        }
    }
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fuzzy" | "fuzzy-weighted" => Ok(MatchStrategy::FuzzyWeighted),
            "exact" | "exact-substring" => Ok(MatchStrategy::ExactSubstring),
            other => Err(format!("Unknown match strategy: {}", other)),
        }
    }
}

/// A search as requested by a caller. Missing values fall back to configured defaults.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub category_id: Option<i64>,
    /// 1-based page number
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub threshold: Option<f64>,
    pub strategy: Option<MatchStrategy>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        SearchRequest {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// Page/limit/threshold after defaulting and clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpec {
    pub page: usize,
    pub limit: usize,
    pub threshold: f64,
    pub strategy: MatchStrategy,
}

/// One page of results plus the total number of matches across all pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub listings: Vec<Listing>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// A listing paired with its fuzzy score. Never leaves this module.
struct ScoredListing<'a> {
    listing: &'a Listing,
    score: f64,
}

pub struct RankingPipeline {
    scorer: ListingScorer,
    defaults: SearchConfig,
}

impl RankingPipeline {
    pub fn new(scorer: ListingScorer, defaults: SearchConfig) -> Self {
        RankingPipeline { scorer, defaults }
    }

    pub fn scorer(&self) -> &ListingScorer {
        &self.scorer
    }

    /// Resolve a request's page/limit/threshold/strategy against the defaults.
    ///
    /// page <= 0 → 1; limit <= 0 → default_limit; any positive limit is honored
    /// so pages 1..=ceil(total/limit) always cover every match.
    /// NaN threshold → default_threshold; threshold clamped into [0, 1].
    pub fn page_spec(&self, request: &SearchRequest) -> PageSpec {
        let default_limit = self.defaults.default_limit.max(1) as usize;

        let page = match request.page {
            Some(p) if p > 0 => usize::try_from(p).unwrap_or(usize::MAX),
            _ => 1,
        };
        let limit = match request.limit {
            Some(l) if l > 0 => usize::try_from(l).unwrap_or(usize::MAX),
            _ => default_limit,
        };
        let threshold = match request.threshold {
            Some(t) if !t.is_nan() => t,
            _ => self.defaults.default_threshold,
        };
        let threshold = if threshold.is_nan() { 0.0 } else { threshold.clamp(0.0, 1.0) };

        PageSpec {
            page,
            limit,
            threshold,
            strategy: request.strategy.unwrap_or(self.defaults.strategy),
        }
    }

    /// Every matching listing, in result order, before pagination.
    pub fn ranked<'a>(&self, catalog: &'a [Listing], request: &SearchRequest) -> Vec<&'a Listing> {
        let spec = self.page_spec(request);
        self.matches(catalog, request, &spec)
    }

    /// Run a search over a borrowed catalog snapshot.
    pub fn search(&self, catalog: &[Listing], request: &SearchRequest) -> SearchPage {
        let spec = self.page_spec(request);
        let matches = self.matches(catalog, request, &spec);
        let total = matches.len();

        let start = (spec.page - 1).saturating_mul(spec.limit);
        let listings = matches
            .into_iter()
            .skip(start)
            .take(spec.limit)
            .cloned()
            .collect();

        SearchPage {
            listings,
            total,
            page: spec.page,
            limit: spec.limit,
        }
    }

    fn matches<'a>(
        &self,
        catalog: &'a [Listing],
        request: &SearchRequest,
        spec: &PageSpec,
    ) -> Vec<&'a Listing> {
        let in_category: Vec<&Listing> = catalog
            .iter()
            .filter(|l| match request.category_id {
                Some(category) => l.category_id == Some(category),
                None => true,
            })
            .collect();

        // Blank query is a browse, not a zero-threshold search: keep catalog order
        if is_blank_query(&request.query) {
            return in_category;
        }

        match spec.strategy {
            MatchStrategy::FuzzyWeighted => self.fuzzy_matches(in_category, &request.query, spec.threshold),
            MatchStrategy::ExactSubstring => exact_matches(in_category, &request.query),
        }
    }

    fn fuzzy_matches<'a>(&self, candidates: Vec<&'a Listing>, query: &str, threshold: f64) -> Vec<&'a Listing> {
        let tokens = tokenize_query(query);
        let candidate_count = candidates.len();

        let mut scored: Vec<ScoredListing<'a>> = candidates
            .into_iter()
            .map(|listing| ScoredListing {
                listing,
                score: self.scorer.score(listing, &tokens),
            })
            .filter(|s| s.score >= threshold)
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.listing.id.cmp(&b.listing.id))
        });

        tracing::debug!(
            tokens = tokens.len(),
            candidates = candidate_count,
            matched = scored.len(),
            threshold,
            "Fuzzy ranking complete"
        );

        scored.into_iter().map(|s| s.listing).collect()
    }
}

fn exact_matches<'a>(candidates: Vec<&'a Listing>, query: &str) -> Vec<&'a Listing> {
    let needle = query.trim().to_lowercase();
    candidates
        .into_iter()
        .filter(|listing| {
            SearchField::ALL
                .iter()
                .any(|&field| listing.field_text(field).to_lowercase().contains(&needle))
        })
        .collect()
}
