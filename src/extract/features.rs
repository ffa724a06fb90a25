use super::lexicon::{HEDGE_WORDS, OVERCLAIM_WORDS};
use super::text::{contains_term, count_quotes, words, Document};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Features {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub avg_sentence_len_first5: f64,
    pub quotes_detected: usize,
    pub hedge_hits: Vec<&'static str>,
    pub overclaim_hits: Vec<&'static str>,
}

pub fn compute_features(doc: &Document) -> Features {
    let text = doc.full_text();
    let lower = text.to_lowercase();
    let first_five = doc
        .sentences
        .iter()
        .take(5)
        .map(|sentence| sentence.text.as_str())
        .collect::<Vec<_>>();

    Features {
        word_count: doc.word_count(),
        sentence_count: doc.sentences.len(),
        paragraph_count: doc.paragraphs.len(),
        avg_sentence_len_first5: avg_sentence_len(&first_five),
        quotes_detected: count_quotes(&text),
        hedge_hits: distinct_hits(&lower, HEDGE_WORDS),
        overclaim_hits: distinct_hits(&lower, OVERCLAIM_WORDS),
    }
}

fn avg_sentence_len(sentences: &[&str]) -> f64 {
    if sentences.is_empty() {
        return 0.0;
    }
    let total: usize = sentences.iter().map(|sentence| words(sentence).count()).sum();
    total as f64 / sentences.len() as f64
}

pub fn distinct_hits(lower: &str, terms: &[&'static str]) -> Vec<&'static str> {
    terms
        .iter()
        .copied()
        .filter(|term| contains_term(lower, term))
        .collect()
}
