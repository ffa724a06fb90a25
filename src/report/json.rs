use crate::types::report::AnalyzeResponse;

pub fn to_json(response: &AnalyzeResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(response)
}

pub fn to_json_batch(responses: &[AnalyzeResponse]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Article;
    use crate::service::Analyzer;
    use crate::types::scoring::Mode;

    fn response(mode: Mode) -> AnalyzeResponse {
        let article = Article {
            title: Some("Bridge closed".to_string()),
            text: "The north bridge closed on Monday for repairs, officials said.".to_string(),
            ..Article::default()
        };
        Analyzer::default()
            .analyze(&article, mode, false)
            .expect("analysis succeeds")
    }

    #[test]
    fn json_report_follows_the_response_contract() {
        let rendered = to_json(&response(Mode::IntentAccrual)).expect("json should serialize");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        for key in [
            "meta",
            "mode",
            "fromCache",
            "overall",
            "intent",
            "necessity_map",
            "scores",
            "headline_summary",
            "raw",
            "version",
            "rubric_version",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["overall"]["method"], "intent_accrual");
        assert_eq!(value["scores"].as_array().map(Vec::len), Some(11));
        assert_eq!(value["scores"][0]["criterion"], "clarity_coherence");
    }

    #[test]
    fn editors_bench_json_omits_intent_and_parses_back() {
        let original = response(Mode::EditorsBench);
        let rendered = to_json(&original).expect("json should serialize");
        assert!(!rendered.contains("\"intent\""));
        let parsed: AnalyzeResponse = serde_json::from_str(&rendered).expect("json should parse");
        assert_eq!(parsed, original);
    }

    #[test]
    fn batch_renders_an_array() {
        let rendered = to_json_batch(&[response(Mode::EditorsBench), response(Mode::IntentAccrual)])
            .expect("json should serialize");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }
}
