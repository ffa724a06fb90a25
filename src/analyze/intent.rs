use crate::article::Article;
use crate::extract::lexicon::{
    EXPLAINER_BODY_TERMS, EXPLAINER_TITLE_TERMS, LIVE_TERMS, OPINION_TERMS, OPINION_TITLE_TERMS,
    QUOTE_VERBS, WHEN_TERMS,
};
use crate::extract::text::{contains_term, count_quotes, count_term, words, Document};
use crate::types::scoring::Intent;
use tracing::debug;

/// A winning cue score below this is too weak to trust.
pub const MIN_CONFIDENCE: f64 = 2.0;

pub fn intent_scores(article: &Article, doc: &Document) -> [(Intent, f64); 6] {
    let title = article.title.as_deref().unwrap_or("").trim().to_lowercase();
    let author = article.author.as_deref().unwrap_or("").to_lowercase();
    let body = doc.full_text();
    let lower = body.to_lowercase();
    let word_count = doc.word_count();

    Intent::ALL.map(|intent| {
        let score = match intent {
            Intent::HardNews => hard_news_cues(doc, &lower),
            Intent::Explainer => explainer_cues(&title, &lower),
            Intent::Opinion => opinion_cues(&title, &author, &body, &lower),
            Intent::Brief => brief_cues(word_count),
            Intent::Feature => feature_cues(word_count, &body),
            Intent::LiveBlog => live_blog_cues(&title, doc),
        };
        (intent, score)
    })
}

pub fn classify(article: &Article, doc: &Document, default: Intent) -> Intent {
    if doc.is_empty() {
        debug!(intent = %default, "empty document, using default intent");
        return default;
    }

    let scores = intent_scores(article, doc);
    let best = scores
        .iter()
        .map(|(_, score)| *score)
        .fold(f64::NEG_INFINITY, f64::max);
    let leaders = scores
        .iter()
        .filter(|(_, score)| *score == best)
        .map(|(intent, _)| *intent)
        .collect::<Vec<_>>();

    let intent = match leaders.as_slice() {
        [only] if best >= MIN_CONFIDENCE => *only,
        _ => default,
    };
    debug!(?scores, %intent, "classified intent");
    intent
}

fn hard_news_cues(doc: &Document, lower: &str) -> f64 {
    let mut score = 0.0;
    let attributions: usize = QUOTE_VERBS
        .iter()
        .map(|term| count_term(lower, term))
        .sum();
    if attributions >= 2 {
        score += 1.0;
    }
    if let Some(lede) = doc.lede() {
        if WHEN_TERMS.iter().any(|term| contains_term(&lede.lower, term)) {
            score += 1.0;
        }
        let concrete = lede.text.chars().any(|ch| ch.is_ascii_digit())
            && words(&lede.text)
                .skip(1)
                .any(|word| word.chars().next().map(char::is_uppercase).unwrap_or(false));
        if concrete {
            score += 1.0;
        }
    }
    if first_person_count(lower) == 0 && attributions > 0 {
        score += 0.5;
    }
    score
}

fn explainer_cues(title: &str, lower: &str) -> f64 {
    let mut score = 0.0;
    let first_word = words(title).next().unwrap_or("");
    if EXPLAINER_TITLE_TERMS.contains(&first_word)
        || title.ends_with('?')
        || ["explained", "explainer", "what to know"]
            .iter()
            .any(|term| contains_term(title, term))
    {
        score += 2.0;
    }
    let body_cues = EXPLAINER_BODY_TERMS
        .iter()
        .filter(|term| contains_term(lower, term))
        .count()
        .min(2);
    score + body_cues as f64
}

fn opinion_cues(title: &str, author: &str, body: &str, lower: &str) -> f64 {
    let mut score = 0.0;
    if OPINION_TITLE_TERMS.iter().any(|term| contains_term(title, term)) {
        score += 3.0;
    }
    if contains_term(author, "editorial board") {
        score += 2.0;
    }
    let stance = OPINION_TERMS
        .iter()
        .filter(|term| contains_term(lower, term))
        .count()
        .min(3);
    score += stance as f64;
    if words(body).filter(|word| *word == "I").count() >= 3 {
        score += 1.0;
    }
    score
}

fn brief_cues(word_count: usize) -> f64 {
    match word_count {
        0 => 0.0,
        1..=120 => 3.0,
        121..=250 => 2.0,
        _ => 0.0,
    }
}

fn feature_cues(word_count: usize, body: &str) -> f64 {
    let mut score = 0.0;
    if word_count >= 1200 {
        score += 2.0;
    }
    if word_count >= 800 && count_quotes(body) >= 4 {
        score += 1.0;
    }
    score
}

fn live_blog_cues(title: &str, doc: &Document) -> f64 {
    let mut score = 0.0;
    if LIVE_TERMS.iter().any(|term| contains_term(title, term)) {
        score += 3.0;
    }
    let stamped = doc
        .paragraphs
        .iter()
        .filter(|paragraph| starts_with_timestamp(&paragraph.text))
        .count();
    score += match stamped {
        0 => 0.0,
        1 => 1.0,
        _ => 3.0,
    };
    score
}

/// `10:32`, `9:05 a.m.` or `Updated ...` at the start of a paragraph.
fn starts_with_timestamp(text: &str) -> bool {
    let trimmed = text.trim_start();
    if trimmed.to_lowercase().starts_with("updated") {
        return true;
    }
    let head = trimmed.split_whitespace().next().unwrap_or("");
    let head = head.trim_end_matches(|ch: char| !ch.is_ascii_digit());
    match head.split_once(':') {
        Some((hours, minutes)) => {
            (1..=2).contains(&hours.len())
                && minutes.len() == 2
                && hours.chars().all(|ch| ch.is_ascii_digit())
                && minutes.chars().all(|ch| ch.is_ascii_digit())
        }
        None => false,
    }
}

fn first_person_count(lower: &str) -> usize {
    ["i think", "i believe", "in my view", "my view"]
        .iter()
        .map(|term| count_term(lower, term))
        .sum()
}
