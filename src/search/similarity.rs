/// String similarity for fuzzy listing search.
///
/// Similarity is a value in [0, 1] computed case-insensitively, in order:
///   1. Either side empty          → 0.0 (empty vs empty is also 0.0)
///   2. Exact match                → 1.0
///   3. One contains the other     → containment score (0.9 by default)
///   4. Otherwise                  → 1 - levenshtein / max(len)
///
/// Lengths and edits are counted in chars, not bytes.

/// Scores string pairs using a configurable containment score.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityScorer {
    containment: f64,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        SimilarityScorer { containment: 0.9 }
    }
}

impl SimilarityScorer {
    /// Containment score is clamped into [0, 1]; NaN falls back to 0.9.
    pub fn new(containment: f64) -> Self {
        let containment = if containment.is_nan() {
            SimilarityScorer::default().containment
        } else {
            containment.clamp(0.0, 1.0)
        };
        SimilarityScorer { containment }
    }

    /// Similarity of `a` and `b` in [0, 1]. Never panics.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let a = a.to_lowercase();
        let b = b.to_lowercase();

        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        if a == b {
            return 1.0;
        }
        if a.contains(&b) || b.contains(&a) {
            return self.containment;
        }

        let longest = a.chars().count().max(b.chars().count());
        let distance = levenshtein(&a, &b);
        1.0 - distance as f64 / longest as f64
    }
}

/// Levenshtein edit distance with unit insert/delete/substitute costs.
///
/// Fills the full (len(b)+1) x (len(a)+1) table; row 0 and column 0 hold
/// their index.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            let cost = if b[i - 1] == a[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[b.len()][a.len()]
}
