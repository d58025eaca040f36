//! Term-weighted vectors and cosine similarity

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

/// Sparse L2-normalized term vector
pub type TermVector = HashMap<String, f64>;

const CHAR_GRAM: usize = 3;

/// TF-IDF over word tokens and character trigrams.
///
/// Trigrams run over the raw lowercased text, whitespace included, so
/// spacing differences lower similarity without zeroing it. Uses smoothed
/// idf: `ln((1 + n) / (1 + df)) + 1`.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    documents: Vec<HashMap<String, f64>>,
    idf: HashMap<String, f64>,
}

impl TfIdfVectorizer {
    pub fn fit(texts: &[&str]) -> Self {
        let documents: Vec<HashMap<String, f64>> =
            texts.iter().map(|text| term_counts(text)).collect();

        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in &documents {
            for term in doc.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let idf = df
            .into_iter()
            .map(|(term, count)| {
                let weight = ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0;
                (term.to_string(), weight)
            })
            .collect();

        Self { documents, idf }
    }

    /// Weighted, normalized vectors in input order
    pub fn transform(&self) -> Vec<TermVector> {
        self.documents
            .iter()
            .map(|counts| {
                let mut vector: TermVector = counts
                    .iter()
                    .map(|(term, tf)| {
                        let idf = self.idf.get(term).copied().unwrap_or(1.0);
                        (term.clone(), tf * idf)
                    })
                    .collect();

                let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for weight in vector.values_mut() {
                        *weight /= norm;
                    }
                }
                vector
            })
            .collect()
    }
}

/// Cosine of two normalized vectors, clamped to [0, 1]
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let dot: f64 = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .sum();

    dot.clamp(0.0, 1.0)
}

fn term_counts(text: &str) -> HashMap<String, f64> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<String, f64> = HashMap::new();

    for word in lowered.unicode_words() {
        *counts.entry(format!("w:{}", word)).or_insert(0.0) += 1.0;
    }

    let chars: Vec<char> = lowered.chars().collect();
    if chars.len() < CHAR_GRAM {
        if !lowered.trim().is_empty() {
            *counts.entry(format!("c:{}", lowered)).or_insert(0.0) += 1.0;
        }
    } else {
        for window in chars.windows(CHAR_GRAM) {
            let gram: String = window.iter().collect();
            *counts.entry(format!("c:{}", gram)).or_insert(0.0) += 1.0;
        }
    }

    counts
}
