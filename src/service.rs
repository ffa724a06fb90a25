use crate::analyze::necessity::NECESSITY_MATRIX_VERSION;
use crate::analyze::{self, EngineSettings};
use crate::article::Article;
use crate::cache::AnalysisCache;
use crate::error::Result;
use crate::extract::lexicon::STOP_WORDS;
use crate::extract::text::{split_sentences, words, Document};
use crate::types::config::{JudgeConfig, DEFAULT_AGENT_VERSION};
use crate::types::report::{AnalyzeResponse, HeadlineSummary, Meta, RawInfo};
use crate::types::scoring::Mode;
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Analyzer {
    settings: EngineSettings,
    agent_version: String,
    cache: Option<AnalysisCache>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            settings: EngineSettings::default(),
            agent_version: DEFAULT_AGENT_VERSION.to_string(),
            cache: None,
        }
    }
}

impl Analyzer {
    pub fn new(settings: EngineSettings, agent_version: impl Into<String>) -> Self {
        Self {
            settings,
            agent_version: agent_version.into(),
            cache: None,
        }
    }

    pub fn from_config(config: Option<&JudgeConfig>, root: &Path, use_cache: bool) -> Self {
        let config = config.cloned().unwrap_or_default();
        let analyzer = Self::new(config.engine_settings(), config.agent_version());
        if use_cache && config.cache_enabled() {
            analyzer.with_cache(AnalysisCache::new(config.cache_dir(root)))
        } else {
            analyzer
        }
    }

    pub fn with_cache(mut self, cache: AnalysisCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn analyze(&self, article: &Article, mode: Mode, force: bool) -> Result<AnalyzeResponse> {
        let fingerprint = AnalysisCache::fingerprint(
            &article.identity(),
            &self.agent_version,
            mode,
            NECESSITY_MATRIX_VERSION,
            &self.settings.canonical(),
        );

        if !force {
            if let Some(cached) = self.cache.as_ref().and_then(|cache| cache.get(&fingerprint)) {
                info!(article = %article.label(), %mode, "served from cache");
                return Ok(cached);
            }
        }

        let result = analyze::analyze(article, mode, &self.settings)?;
        let doc = Document::parse(&article.text);
        let response = AnalyzeResponse {
            meta: Meta {
                title: article.title.clone(),
                author: article.author.clone(),
                thumbnail: article.thumbnail.clone(),
                fetched_at: Utc::now().to_rfc3339(),
            },
            result,
            headline_summary: headline_summary(article.title.as_deref(), &doc),
            raw: RawInfo {
                url: article.url.clone(),
                word_count: doc.word_count(),
            },
            version: self.agent_version.clone(),
            rubric_version: NECESSITY_MATRIX_VERSION.to_string(),
            from_cache: false,
        };

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.put(&fingerprint, &response) {
                warn!(error = %err, "could not write cache entry");
            }
        }
        Ok(response)
    }
}

pub fn headline_summary(title: Option<&str>, doc: &Document) -> HeadlineSummary {
    let one_sentence_summary = doc
        .lede()
        .and_then(|lede| split_sentences(&lede.text).first().map(|s| s.to_string()));
    HeadlineSummary {
        one_sentence_summary,
        headline_body_match: headline_matches_body(title, doc),
    }
}

/// Half of the headline's significant words appear in the body.
fn headline_matches_body(title: Option<&str>, doc: &Document) -> bool {
    let Some(title) = title else {
        return true;
    };
    let significant = words(title)
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() >= 4 && !STOP_WORDS.contains(&word.as_str()))
        .collect::<HashSet<_>>();
    if significant.is_empty() {
        return true;
    }

    let body = doc.full_text().to_lowercase();
    let body_words = words(&body).collect::<HashSet<_>>();
    let present = significant
        .iter()
        .filter(|word| body_words.contains(word.as_str()))
        .count();
    present * 2 >= significant.len()
}
