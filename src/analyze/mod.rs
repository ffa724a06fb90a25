pub mod accrual;
pub mod aggregate;
pub mod intent;
pub mod necessity;
pub mod rationale;

use crate::article::Article;
use crate::error::JudgeError;
use crate::extract::features::compute_features;
use crate::extract::signals::{apply_headline, extract_signals};
use crate::extract::text::Document;
use crate::types::scoring::{
    round2, AnalysisResult, Criterion, Intent, Mode, NecessityMap, ScoreResult, SCORE_MAX,
    SCORE_MIN,
};
use accrual::{accrue, AccrualParams};
use necessity::{necessity_map, NecessityOverrides};
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub params: AccrualParams,
    pub default_intent: Intent,
    pub overrides: NecessityOverrides,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            params: AccrualParams::default(),
            default_intent: Intent::Brief,
            overrides: NecessityOverrides::new(),
        }
    }
}

impl EngineSettings {
    pub fn canonical(&self) -> String {
        let params = &self.params;
        let mut canonical = format!(
            "reward_scale={};penalty_scale={};harm_floor={};low_necessity_threshold={};default_intent={}",
            params.reward_scale,
            params.penalty_scale,
            params.harm_floor,
            params.low_necessity_threshold,
            self.default_intent.as_str()
        );
        let overrides = self
            .overrides
            .iter()
            .flat_map(|(intent, row)| {
                row.iter()
                    .map(move |(criterion, weight)| ((*intent, *criterion), *weight))
            })
            .collect::<BTreeMap<_, _>>();
        for ((intent, criterion), weight) in overrides {
            canonical.push_str(&format!(
                ";necessity.{}.{}={weight}",
                intent.as_str(),
                criterion.as_str()
            ));
        }
        canonical
    }
}

pub fn analyze(
    article: &Article,
    mode: Mode,
    settings: &EngineSettings,
) -> Result<AnalysisResult, JudgeError> {
    if article.text.trim().is_empty() {
        return Err(JudgeError::ArticleUnavailable(
            "article text is empty".to_string(),
        ));
    }

    let doc = Document::parse(&article.text);
    let features = compute_features(&doc);
    let mut signals = extract_signals(&doc, &features);
    if let Some(title) = article.title.as_deref() {
        apply_headline(&mut signals, title);
    }
    debug!(
        words = features.word_count,
        sentences = features.sentence_count,
        paragraphs = features.paragraph_count,
        "extracted features"
    );

    let (intent, weights) = match mode {
        Mode::EditorsBench => (None, NecessityMap::uniform()),
        Mode::IntentAccrual => {
            let intent = intent::classify(article, &doc, settings.default_intent);
            (Some(intent), necessity_map(intent, &settings.overrides)?)
        }
    };

    let mut scores = Vec::with_capacity(Criterion::COUNT);
    for signal in &signals {
        let weight = weights.weight(signal.criterion);
        let accrual = accrue(&settings.params, weight, signal.evidence, &signal.violation)?;

        let mut flags = signal
            .flags
            .iter()
            .map(|flag| flag.to_string())
            .collect::<Vec<_>>();
        if accrual.absence_waived {
            flags.push("absence_waived".to_string());
        }

        debug!(
            criterion = %signal.criterion,
            weight,
            evidence = signal.evidence,
            violation = signal.violation.strength,
            score = accrual.score,
            "accrued criterion"
        );
        scores.push(ScoreResult {
            criterion: signal.criterion,
            score: round2(accrual.score),
            rationale: rationale::build_rationale(signal, &accrual),
            flags,
        });
    }

    let overall = aggregate::aggregate(&scores, mode)?;
    let result = AnalysisResult {
        mode,
        intent,
        necessity_map: match mode {
            Mode::EditorsBench => None,
            Mode::IntentAccrual => Some(weights),
        },
        scores,
        overall,
    };
    validate_result(&result)?;

    info!(
        mode = %mode,
        intent = intent.map(Intent::as_str).unwrap_or("-"),
        average = result.overall.average,
        "analysis complete"
    );
    Ok(result)
}

pub fn validate_result(result: &AnalysisResult) -> Result<(), JudgeError> {
    match (result.mode, result.intent, &result.necessity_map) {
        (Mode::EditorsBench, None, None) => {}
        (Mode::IntentAccrual, Some(_), Some(map)) => map.validate()?,
        (Mode::EditorsBench, _, _) => {
            return Err(JudgeError::EngineInvariantViolation(
                "editors_bench result carries an intent or necessity map".to_string(),
            ))
        }
        (Mode::IntentAccrual, _, _) => {
            return Err(JudgeError::EngineInvariantViolation(
                "intent_accrual result lacks an intent or necessity map".to_string(),
            ))
        }
    }

    for item in &result.scores {
        if !item.score.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&item.score) {
            return Err(JudgeError::EngineInvariantViolation(format!(
                "score for {} out of [0,10]: {}",
                item.criterion, item.score
            )));
        }
        if !rationale::cites_location(&item.rationale) {
            return Err(JudgeError::EngineInvariantViolation(format!(
                "rationale for {} does not cite the article",
                item.criterion
            )));
        }
    }

    let expected = aggregate::aggregate(&result.scores, result.mode)?;
    if expected != result.overall {
        return Err(JudgeError::EngineInvariantViolation(format!(
            "overall {} does not match the mean of the scores ({})",
            result.overall.average, expected.average
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "City Council voted 7-2 on Tuesday in Springfield to raise the transit budget by 4 percent because ridership grew.\n\n\
\"We had no choice,\" Mayor Ana Ruiz said. Critics said the tax burden falls on families, however.\n\n\
Ridership has grown every year since 2019, according to city data. Residents can register for the new fare program at the city website before the deadline.\n\n\
Correction: an earlier version misstated the vote count. The transit authority declined to comment.";

    fn article(title: &str, text: &str) -> Article {
        Article {
            title: Some(title.to_string()),
            text: text.to_string(),
            ..Article::default()
        }
    }

    #[test]
    fn analysis_is_deterministic() {
        let article = article("Council raises transit budget", REPORT);
        let settings = EngineSettings::default();
        for mode in [Mode::EditorsBench, Mode::IntentAccrual] {
            let first = analyze(&article, mode, &settings).expect("analysis succeeds");
            let second = analyze(&article, mode, &settings).expect("analysis succeeds");
            assert_eq!(first, second);
            assert_eq!(
                serde_json::to_string(&first).expect("serializes"),
                serde_json::to_string(&second).expect("serializes")
            );
        }
    }

    #[test]
    fn editors_bench_omits_intent_and_necessity() {
        let result = analyze(
            &article("Council raises transit budget", REPORT),
            Mode::EditorsBench,
            &EngineSettings::default(),
        )
        .expect("analysis succeeds");
        assert_eq!(result.intent, None);
        assert_eq!(result.necessity_map, None);
        assert_eq!(result.overall.method, Mode::EditorsBench);

        let json = serde_json::to_value(&result).expect("serializes");
        assert!(json.get("intent").is_none());
        assert!(json.get("necessity_map").is_none());
    }

    #[test]
    fn intent_accrual_reports_intent_and_necessity() {
        let result = analyze(
            &article("Council raises transit budget", REPORT),
            Mode::IntentAccrual,
            &EngineSettings::default(),
        )
        .expect("analysis succeeds");
        let intent = result.intent.expect("intent present");
        let map = result.necessity_map.expect("necessity map present");
        assert_eq!(
            map,
            necessity_map(intent, &NecessityOverrides::new()).expect("valid")
        );
        assert_eq!(result.overall.method, Mode::IntentAccrual);
    }

    #[test]
    fn every_criterion_is_scored_in_range_with_grounded_rationale() {
        for mode in [Mode::EditorsBench, Mode::IntentAccrual] {
            let result = analyze(
                &article("Council raises transit budget", REPORT),
                mode,
                &EngineSettings::default(),
            )
            .expect("analysis succeeds");
            assert_eq!(result.scores.len(), Criterion::COUNT);
            for (item, criterion) in result.scores.iter().zip(Criterion::ALL) {
                assert_eq!(item.criterion, criterion);
                assert!((0.0..=10.0).contains(&item.score));
                assert!(rationale::cites_location(&item.rationale), "{item:?}");
            }
        }
    }

    #[test]
    fn blank_article_is_unavailable() {
        let err = analyze(&article("Empty", " \n\n "), Mode::IntentAccrual, &EngineSettings::default())
            .expect_err("blank text must fail");
        assert!(matches!(err, JudgeError::ArticleUnavailable(_)));
    }

    #[test]
    fn low_necessity_absence_is_waived_in_intent_mode_only() {
        // Short brief: multidisciplinarity has weight 0.2 and no second lens.
        let brief = article("Road closed", "The north bridge is closed for repairs.");
        let settings = EngineSettings::default();

        let accrual = analyze(&brief, Mode::IntentAccrual, &settings).expect("analysis succeeds");
        assert_eq!(accrual.intent, Some(Intent::Brief));
        let lens = accrual
            .score(Criterion::Multidisciplinarity)
            .expect("scored");
        assert_eq!(lens.score, 5.0);
        assert!(lens.flags.iter().any(|flag| flag == "absence_waived"));
        assert!(lens.rationale.contains("not held against"));

        let bench = analyze(&brief, Mode::EditorsBench, &settings).expect("analysis succeeds");
        let lens = bench.score(Criterion::Multidisciplinarity).expect("scored");
        assert!(lens.score < 5.0);
        assert!(!lens.flags.iter().any(|flag| flag == "absence_waived"));
    }

    #[test]
    fn harmful_content_is_penalized_even_when_necessity_is_low() {
        let mut settings = EngineSettings::default();
        settings
            .overrides
            .entry(Intent::Brief)
            .or_default()
            .insert(Criterion::LanguageCredibility, 0.0);
        let result = analyze(
            &article("Road closed", "The bridge closure is a hoax."),
            Mode::IntentAccrual,
            &settings,
        )
        .expect("analysis succeeds");
        let language = result
            .score(Criterion::LanguageCredibility)
            .expect("scored");
        assert!(language.score < 5.0, "{language:?}");
        assert!(language.flags.iter().any(|flag| flag == "harm"));
    }

    #[test]
    fn loaded_headline_lowers_language_credibility() {
        let settings = EngineSettings::default();
        let calm = analyze(
            &article("Council raises transit budget", REPORT),
            Mode::EditorsBench,
            &settings,
        )
        .expect("analysis succeeds");
        let loud = analyze(
            &article("Council SLAMS riders with outrageous budget!", REPORT),
            Mode::EditorsBench,
            &settings,
        )
        .expect("analysis succeeds");

        let calm = calm.score(Criterion::LanguageCredibility).expect("scored");
        let loud = loud.score(Criterion::LanguageCredibility).expect("scored");
        assert!(loud.score < calm.score);
        assert!(loud.rationale.contains("headline"));
    }

    #[test]
    fn headline_violation_cues_never_raise_a_score() {
        let body = "The council met on Monday.";
        let settings = EngineSettings::default();
        for mode in [Mode::EditorsBench, Mode::IntentAccrual] {
            let calm = analyze(&article("Council meets", body), mode, &settings)
                .expect("analysis succeeds");
            for title in [
                "Shocking council meeting",
                "Council SLAMS outrageous meeting!",
                "Council meeting was a hoax",
            ] {
                let cued = analyze(&article(title, body), mode, &settings)
                    .expect("analysis succeeds");
                assert_eq!(cued.intent, calm.intent);
                for (before, after) in calm.scores.iter().zip(&cued.scores) {
                    assert!(
                        after.score <= before.score,
                        "{mode} {title}: {} rose from {} to {}",
                        after.criterion,
                        before.score,
                        after.score
                    );
                }
            }
        }
    }

    #[test]
    fn harmful_headline_is_penalized_at_zero_necessity() {
        let mut settings = EngineSettings::default();
        let row = settings.overrides.entry(Intent::Brief).or_default();
        row.insert(Criterion::LanguageCredibility, 0.0);
        row.insert(Criterion::HedgingOverclaim, 0.0);
        let result = analyze(
            &article("Vaccine is a hoax and a cover-up", "The council met on Monday."),
            Mode::IntentAccrual,
            &settings,
        )
        .expect("analysis succeeds");
        assert_eq!(result.intent, Some(Intent::Brief));
        for criterion in [Criterion::LanguageCredibility, Criterion::HedgingOverclaim] {
            let item = result.score(criterion).expect("scored");
            // 5 - 6 * 0.5 * 0.8
            assert_eq!(item.score, 2.6, "{item:?}");
            assert!(item.flags.iter().any(|flag| flag == "harm"));
            assert!(item.rationale.contains("headline"));
        }
    }

    #[test]
    fn canonical_settings_change_with_every_knob() {
        let base = EngineSettings::default();
        assert_eq!(base.canonical(), EngineSettings::default().canonical());

        let mut scaled = base.clone();
        scaled.params.penalty_scale = 9.0;
        let mut defaulted = base.clone();
        defaulted.default_intent = Intent::Feature;
        let mut overridden = base.clone();
        overridden
            .overrides
            .entry(Intent::Opinion)
            .or_default()
            .insert(Criterion::CivicUtility, 0.9);
        for other in [&scaled, &defaulted, &overridden] {
            assert_ne!(base.canonical(), other.canonical());
        }
    }

    #[test]
    fn canonical_settings_ignore_override_insertion_order() {
        let mut first = EngineSettings::default();
        let mut second = EngineSettings::default();
        let cells = [
            (Intent::Opinion, Criterion::CivicUtility, 0.9),
            (Intent::Brief, Criterion::LanguageCredibility, 0.1),
            (Intent::Opinion, Criterion::ClarityCoherence, 0.4),
        ];
        for (intent, criterion, weight) in cells {
            first.overrides.entry(intent).or_default().insert(criterion, weight);
        }
        for (intent, criterion, weight) in cells.into_iter().rev() {
            second.overrides.entry(intent).or_default().insert(criterion, weight);
        }
        assert_eq!(first.canonical(), second.canonical());
        // Intents then criteria in rubric order.
        assert!(first.canonical().ends_with(
            ";necessity.opinion.clarity_coherence=0.4;necessity.opinion.civic_utility=0.9;necessity.brief.language_credibility=0.1"
        ));
    }

    #[test]
    fn tampered_result_fails_validation() {
        let mut result = analyze(
            &article("Council raises transit budget", REPORT),
            Mode::IntentAccrual,
            &EngineSettings::default(),
        )
        .expect("analysis succeeds");
        result.overall.average += 1.0;
        assert!(matches!(
            validate_result(&result),
            Err(JudgeError::EngineInvariantViolation(_))
        ));

        let mut stripped = analyze(
            &article("Council raises transit budget", REPORT),
            Mode::IntentAccrual,
            &EngineSettings::default(),
        )
        .expect("analysis succeeds");
        stripped.necessity_map = None;
        assert!(validate_result(&stripped).is_err());
    }
}
