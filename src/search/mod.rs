pub mod pipeline;
pub mod scorer;
pub mod service;
pub mod similarity;
pub mod tokenizer;
pub mod weights;

// Re-export key types for convenience
pub use pipeline::{MatchStrategy, PageSpec, RankingPipeline, SearchPage, SearchRequest};
pub use scorer::ListingScorer;
pub use service::SearchService;
pub use similarity::{levenshtein, SimilarityScorer};
pub use tokenizer::tokenize_query;
pub use weights::{ScoringWeights, SearchField};
