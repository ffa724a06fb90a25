use crate::analyze::accrual::AccrualParams;
use crate::types::report::AnalyzeResponse;
use crate::types::scoring::{Criterion, Intent, Mode, NecessityMap};

pub fn to_markdown(response: &AnalyzeResponse) -> String {
    let meta = &response.meta;
    let result = &response.result;
    let mut output = String::new();

    output.push_str(&format!(
        "# {}\n\n",
        meta.title.as_deref().unwrap_or("Untitled")
    ));
    output.push_str(&format!(
        "By {}\n\n",
        meta.author.as_deref().unwrap_or("Unknown")
    ));
    output.push_str(&format!("Overall: {:.2}\n\n", result.overall.average));
    output.push_str(&format!(
        "Method: {} · Mode: {} · {}\n",
        result.overall.method,
        result.mode,
        if response.from_cache {
            "from cache"
        } else {
            "fresh"
        }
    ));
    if let Some(intent) = result.intent {
        output.push_str(&format!("Intent: {} ({intent})\n", intent.label()));
    }
    output.push('\n');

    if let Some(summary) = &response.headline_summary.one_sentence_summary {
        output.push_str(&format!("> {summary}\n\n"));
    }
    if !response.headline_summary.headline_body_match {
        output.push_str("Headline does not match the body.\n\n");
    }

    output.push_str("## Scores\n\n");
    for item in &result.scores {
        output.push_str(&format!(
            "- {} ({}): {:.2}\n  {}\n",
            item.criterion.label(),
            item.criterion,
            item.score,
            item.rationale
        ));
        if !item.flags.is_empty() {
            output.push_str(&format!("  flags: {}\n", item.flags.join(", ")));
        }
    }

    if let Some(map) = &result.necessity_map {
        output.push_str("\n## Necessity weights (0-1)\n\n");
        for (criterion, weight) in map.iter() {
            output.push_str(&format!("- {criterion}: {weight}\n"));
        }
    }

    output.push_str(&format!(
        "\nagent {} · rubric {} · {} words · fetched {}\n",
        response.version, response.rubric_version, response.raw.word_count, meta.fetched_at
    ));
    output
}

pub fn necessity_table(rows: &[(Intent, NecessityMap)]) -> String {
    let mut output = String::from("| criterion |");
    for (intent, _) in rows {
        output.push_str(&format!(" {intent} |"));
    }
    output.push_str("\n|---|");
    output.push_str(&"---|".repeat(rows.len()));
    output.push('\n');
    for criterion in Criterion::ALL {
        output.push_str(&format!("| {criterion} |"));
        for (_, map) in rows {
            output.push_str(&format!(" {:.1} |", map.weight(criterion)));
        }
        output.push('\n');
    }
    output
}

pub fn explain(mode: Mode, params: &AccrualParams) -> String {
    let mut output = String::new();
    match mode {
        Mode::EditorsBench => {
            output.push_str("# Editor's Bench\n\n");
            output.push_str(
                "Scores one article on 11 criteria (0-10), citing the article itself (headline, lede, para N).\n",
            );
            output.push_str(
                "Every criterion counts as fully necessary (w = 1); no intent is inferred and unstated elements are not assumed.\n\n",
            );
        }
        Mode::IntentAccrual => {
            output.push_str("# Intent-Aware Accrual\n\n");
            output.push_str(
                "Infers the article's intent (hard news, explainer, opinion, brief, feature, live blog) and gives each criterion a necessity weight w in [0,1] for that intent.\n",
            );
            output.push_str(&format!(
                "When w is below {}, a missing element is not penalized; harmful or misleading content is always penalized, with w raised to at least {}.\n",
                params.low_necessity_threshold, params.harm_floor
            ));
            output.push_str("The detected intent and the necessity map are reported with the scores.\n\n");
        }
    }
    output.push_str(&format!(
        "score = clamp(0, 10, 5 + {}·w·e − {}·w·v)\n",
        params.reward_scale, params.penalty_scale
    ));
    output.push_str("overall = unweighted mean of the 11 scores, rounded to 2 decimals\n\n");
    output.push_str("## Criteria\n\n");
    for criterion in Criterion::ALL {
        output.push_str(&format!(
            "- {} ({criterion}): {}\n",
            criterion.label(),
            criterion.description()
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::necessity::{necessity_map, NecessityOverrides};
    use crate::article::Article;
    use crate::service::Analyzer;

    fn response(mode: Mode) -> AnalyzeResponse {
        let article = Article {
            title: Some("Bridge closed".to_string()),
            author: Some("Ana Ruiz".to_string()),
            text: "The north bridge closed on Monday for repairs, officials said.".to_string(),
            ..Article::default()
        };
        Analyzer::default()
            .analyze(&article, mode, false)
            .expect("analysis succeeds")
    }

    #[test]
    fn markdown_report_contains_sections() {
        let rendered = to_markdown(&response(Mode::IntentAccrual));
        assert!(rendered.contains("# Bridge closed"));
        assert!(rendered.contains("By Ana Ruiz"));
        assert!(rendered.contains("Mode: intent_accrual · fresh"));
        assert!(rendered.contains("Intent: "));
        assert!(rendered.contains("## Scores"));
        assert!(rendered.contains("- Clarity & coherence (clarity_coherence): "));
        assert!(rendered.contains("## Necessity weights (0-1)"));
        assert!(rendered.contains("rubric nmv1"));
    }

    #[test]
    fn editors_bench_markdown_has_no_intent_or_weights() {
        let rendered = to_markdown(&response(Mode::EditorsBench));
        assert!(!rendered.contains("Intent: "));
        assert!(!rendered.contains("## Necessity weights"));
    }

    #[test]
    fn necessity_table_lists_every_criterion() {
        let rows = Intent::ALL
            .into_iter()
            .map(|intent| {
                (
                    intent,
                    necessity_map(intent, &NecessityOverrides::new()).expect("valid"),
                )
            })
            .collect::<Vec<_>>();
        let table = necessity_table(&rows);
        assert_eq!(table.lines().count(), 2 + Criterion::COUNT);
        assert!(table.starts_with("| criterion | hard_news | explainer |"));
        assert!(table.contains("| attribution_evidence | 1.0 | 0.8 | 0.6 |"));
    }

    #[test]
    fn explain_names_the_formula_for_each_mode() {
        let params = AccrualParams::default();
        let bench = explain(Mode::EditorsBench, &params);
        assert!(bench.contains("Editor's Bench"));
        assert!(bench.contains("5 + 5·w·e − 6·w·v"));
        let accrual = explain(Mode::IntentAccrual, &params);
        assert!(accrual.contains("below 0.3"));
        assert!(accrual.contains("at least 0.5"));
        assert_eq!(
            accrual.lines().filter(|line| line.starts_with("- ")).count(),
            Criterion::COUNT
        );
    }
}
