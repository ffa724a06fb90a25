use crate::types::scoring::AnalysisResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub thumbnail: Option<String>,
    pub fetched_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineSummary {
    pub one_sentence_summary: Option<String>,
    pub headline_body_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInfo {
    pub url: Option<String>,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub meta: Meta,
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub headline_summary: HeadlineSummary,
    pub raw: RawInfo,
    pub version: String,
    pub rubric_version: String,
    #[serde(rename = "fromCache", default)]
    pub from_cache: bool,
}
