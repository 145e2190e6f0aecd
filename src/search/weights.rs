/// Field weighting table for listing search.
///
/// Each searchable listing field carries a multiplier applied to the raw
/// similarity of a token against that field. Weighted scores are compared
/// across fields before any clamping, so a strong title match (x1.5) can beat
/// an exact condition match (x0.8).

use serde::{Deserialize, Serialize};

/// The five listing fields the fuzzy scorer looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Title,
    Description,
    CategoryName,
    Location,
    Condition,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        SearchField::Title,
        SearchField::Description,
        SearchField::CategoryName,
        SearchField::Location,
        SearchField::Condition,
    ];
}

/// Relative importance of each field plus the fixed containment score.
///
/// Loaded from the `[scoring]` config section; defaults reproduce the
/// production weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_title")]
    pub title: f64,
    #[serde(default = "default_description")]
    pub description: f64,
    #[serde(default = "default_category")]
    pub category: f64,
    #[serde(default = "default_location")]
    pub location: f64,
    #[serde(default = "default_condition")]
    pub condition: f64,
    /// Similarity assigned when one string contains the other (but they differ).
    #[serde(default = "default_containment")]
    pub containment: f64,
}

fn default_title() -> f64 {
    1.5
}

fn default_description() -> f64 {
    1.0
}

fn default_category() -> f64 {
    1.2
}

fn default_location() -> f64 {
    0.8
}

fn default_condition() -> f64 {
    0.8
}

fn default_containment() -> f64 {
    0.9
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            title: default_title(),
            description: default_description(),
            category: default_category(),
            location: default_location(),
            condition: default_condition(),
            containment: default_containment(),
        }
    }
}

impl ScoringWeights {
    pub fn weight(&self, field: SearchField) -> f64 {
        match field {
            SearchField::Title => self.title,
            SearchField::Description => self.description,
            SearchField::CategoryName => self.category,
            SearchField::Location => self.location,
            SearchField::Condition => self.condition,
        }
    }
}
