//! Property-based tests for the ranking core using proptest.

use proptest::prelude::*;
use std::collections::HashSet;

use marketsearch::catalog::Listing;
use marketsearch::config::SearchConfig;
use marketsearch::search::{
    tokenize_query, ListingScorer, MatchStrategy, RankingPipeline, SearchRequest, SimilarityScorer,
};

// ============================================================================
// STRATEGIES
// ============================================================================

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z]{1,8}").unwrap()
}

fn text_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::collection::vec(word_strategy(), 1..4).prop_map(|w| w.join(" ")))
}

fn listing_strategy() -> impl Strategy<Value = Listing> {
    (
        text_strategy(),
        text_strategy(),
        prop::option::of(0i64..4),
        text_strategy(),
        text_strategy(),
        text_strategy(),
    )
        .prop_map(|(title, description, category_id, category_name, location, condition)| Listing {
            id: 0,
            title,
            description,
            category_id,
            category_name,
            location,
            condition,
            ..Default::default()
        })
}

/// Catalog with unique ids, deliberately not in id order.
fn catalog_strategy() -> impl Strategy<Value = Vec<Listing>> {
    prop::collection::vec(listing_strategy(), 0..25).prop_map(|mut listings| {
        let n = listings.len() as i64;
        for (i, listing) in listings.iter_mut().enumerate() {
            listing.id = n - i as i64;
        }
        listings
    })
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 0..4).prop_map(|w| w.join(" "))
}

fn request_strategy() -> impl Strategy<Value = SearchRequest> {
    (
        query_strategy(),
        prop::option::of(0i64..4),
        0.0f64..=1.0,
        prop::bool::ANY,
    )
        .prop_map(|(query, category_id, threshold, exact)| SearchRequest {
            query,
            category_id,
            threshold: Some(threshold),
            strategy: Some(if exact { MatchStrategy::ExactSubstring } else { MatchStrategy::FuzzyWeighted }),
            ..Default::default()
        })
}

fn pipeline() -> RankingPipeline {
    RankingPipeline::new(ListingScorer::default(), SearchConfig::default())
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_similarity_reflexive(s in "\\PC{1,12}") {
        prop_assert_eq!(SimilarityScorer::default().similarity(&s, &s), 1.0);
    }

    #[test]
    fn prop_similarity_symmetric_and_bounded(a in "\\PC{0,10}", b in "\\PC{0,10}") {
        let scorer = SimilarityScorer::default();
        let ab = scorer.similarity(&a, &b);
        prop_assert_eq!(ab, scorer.similarity(&b, &a));
        prop_assert!((0.0..=1.0).contains(&ab), "similarity was {}", ab);
    }

    #[test]
    fn prop_listing_score_bounded(listing in listing_strategy(), words in prop::collection::vec(word_strategy(), 1..6)) {
        let tokens = tokenize_query(&words.join(" "));
        let score = ListingScorer::default().score(&listing, &tokens);
        prop_assert!((0.0..=1.0).contains(&score), "score was {}", score);
    }

    #[test]
    fn prop_fuzzy_results_meet_threshold(catalog in catalog_strategy(), query in query_strategy(), threshold in 0.0f64..=1.0) {
        prop_assume!(!query.trim().is_empty());
        let p = pipeline();
        let request = SearchRequest {
            threshold: Some(threshold),
            ..SearchRequest::new(query.clone())
        };
        let tokens = tokenize_query(&query);
        for listing in p.ranked(&catalog, &request) {
            prop_assert!(p.scorer().score(listing, &tokens) >= threshold);
        }
    }

    #[test]
    fn prop_pages_concatenate_to_full_result(catalog in catalog_strategy(), request in request_strategy(), limit in 1i64..7) {
        let p = pipeline();
        let expected: Vec<i64> = p.ranked(&catalog, &request).iter().map(|l| l.id).collect();

        let mut collected = Vec::new();
        let mut page_no = 1;
        loop {
            let page = p.search(&catalog, &SearchRequest {
                page: Some(page_no),
                limit: Some(limit),
                ..request.clone()
            });
            prop_assert_eq!(page.total, expected.len());
            if page.listings.is_empty() {
                break;
            }
            prop_assert!(page.listings.len() <= limit as usize);
            collected.extend(page.listings.iter().map(|l| l.id));
            page_no += 1;
        }

        let unique: HashSet<i64> = collected.iter().copied().collect();
        prop_assert_eq!(unique.len(), collected.len());
        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn prop_search_is_idempotent(catalog in catalog_strategy(), request in request_strategy()) {
        let p = pipeline();
        let first = p.search(&catalog, &request);
        let second = p.search(&catalog, &request);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_blank_query_preserves_catalog_order(catalog in catalog_strategy(), category in prop::option::of(0i64..4)) {
        let request = SearchRequest {
            category_id: category,
            threshold: Some(1.0),
            ..SearchRequest::new("  ")
        };
        let got: Vec<i64> = pipeline().ranked(&catalog, &request).iter().map(|l| l.id).collect();
        let expected: Vec<i64> = catalog
            .iter()
            .filter(|l| category.map_or(true, |c| l.category_id == Some(c)))
            .map(|l| l.id)
            .collect();
        prop_assert_eq!(got, expected);
    }
}
