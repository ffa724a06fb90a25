use crate::error::JudgeError;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Score = f64;
pub type Weight = f64;

pub const SCORE_MIN: Score = 0.0;
pub const SCORE_MAX: Score = 10.0;
pub const SCORE_BASELINE: Score = 5.0;

// Declaration order is the rubric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    ClarityCoherence,
    FiveWOneH,
    AttributionEvidence,
    HedgingOverclaim,
    BalanceOpposing,
    InversionTouch,
    ContextProportionality,
    Multidisciplinarity,
    CivicUtility,
    TransparencyCues,
    LanguageCredibility,
}

impl Criterion {
    pub const COUNT: usize = 11;

    pub const ALL: [Criterion; Criterion::COUNT] = [
        Criterion::ClarityCoherence,
        Criterion::FiveWOneH,
        Criterion::AttributionEvidence,
        Criterion::HedgingOverclaim,
        Criterion::BalanceOpposing,
        Criterion::InversionTouch,
        Criterion::ContextProportionality,
        Criterion::Multidisciplinarity,
        Criterion::CivicUtility,
        Criterion::TransparencyCues,
        Criterion::LanguageCredibility,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::ClarityCoherence => "clarity_coherence",
            Criterion::FiveWOneH => "five_w_one_h",
            Criterion::AttributionEvidence => "attribution_evidence",
            Criterion::HedgingOverclaim => "hedging_overclaim",
            Criterion::BalanceOpposing => "balance_opposing",
            Criterion::InversionTouch => "inversion_touch",
            Criterion::ContextProportionality => "context_proportionality",
            Criterion::Multidisciplinarity => "multidisciplinarity",
            Criterion::CivicUtility => "civic_utility",
            Criterion::TransparencyCues => "transparency_cues",
            Criterion::LanguageCredibility => "language_credibility",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::ClarityCoherence => "Clarity & coherence",
            Criterion::FiveWOneH => "Five Ws and one H",
            Criterion::AttributionEvidence => "Attribution & evidence",
            Criterion::HedgingOverclaim => "Hedging vs. overclaim",
            Criterion::BalanceOpposing => "Balance & opposing views",
            Criterion::InversionTouch => "Inverted pyramid",
            Criterion::ContextProportionality => "Context & proportionality",
            Criterion::Multidisciplinarity => "Multidisciplinarity",
            Criterion::CivicUtility => "Civic utility",
            Criterion::TransparencyCues => "Transparency cues",
            Criterion::LanguageCredibility => "Language credibility",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Criterion::ClarityCoherence => {
                "Readable opening sentences; run-on sentences count against it."
            }
            Criterion::FiveWOneH => "The lede answers who, what, when, where, why and how.",
            Criterion::AttributionEvidence => {
                "Claims carry named sources, direct quotes or data; anonymous sourcing counts against it."
            }
            Criterion::HedgingOverclaim => {
                "Uncertainty is signalled where warranted; absolute claims count against it."
            }
            Criterion::BalanceOpposing => "Opposing or dissenting views are represented.",
            Criterion::InversionTouch => "Key facts come first; a buried lede counts against it.",
            Criterion::ContextProportionality => {
                "Background and scale are given; sensational framing counts against it."
            }
            Criterion::Multidisciplinarity => "The story draws on more than one field or lens.",
            Criterion::CivicUtility => "Readers get actionable information they can use.",
            Criterion::TransparencyCues => {
                "Corrections, updates, disclosures or right-of-reply notes are present."
            }
            Criterion::LanguageCredibility => {
                "Measured tone; loaded words, shouting and exclamations count against it."
            }
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = JudgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Criterion::ALL
            .into_iter()
            .find(|criterion| criterion.as_str() == value.trim())
            .ok_or_else(|| JudgeError::ConfigParse(format!("unknown criterion: {value}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    HardNews,
    Explainer,
    Opinion,
    Brief,
    Feature,
    LiveBlog,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::HardNews,
        Intent::Explainer,
        Intent::Opinion,
        Intent::Brief,
        Intent::Feature,
        Intent::LiveBlog,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::HardNews => "hard_news",
            Intent::Explainer => "explainer",
            Intent::Opinion => "opinion",
            Intent::Brief => "brief",
            Intent::Feature => "feature",
            Intent::LiveBlog => "live_blog",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Intent::HardNews => "Hard News",
            Intent::Explainer => "Explainer",
            Intent::Opinion => "Opinion",
            Intent::Brief => "Brief",
            Intent::Feature => "Feature",
            Intent::LiveBlog => "Live Blog",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = JudgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == value.trim())
            .ok_or_else(|| JudgeError::ConfigParse(format!("unknown intent: {value}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "editors_bench")]
    EditorsBench,
    #[serde(rename = "intent_accrual")]
    IntentAccrual,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::EditorsBench => "editors_bench",
            Mode::IntentAccrual => "intent_accrual",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NecessityMap {
    weights: [Weight; Criterion::COUNT],
}

impl NecessityMap {
    pub fn from_weights(weights: [Weight; Criterion::COUNT]) -> Self {
        Self { weights }
    }

    pub fn uniform() -> Self {
        Self {
            weights: [1.0; Criterion::COUNT],
        }
    }

    pub fn weight(&self, criterion: Criterion) -> Weight {
        self.weights[criterion.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, Weight)> + '_ {
        Criterion::ALL
            .into_iter()
            .map(move |criterion| (criterion, self.weight(criterion)))
    }

    pub fn validate(&self) -> Result<(), JudgeError> {
        for (criterion, weight) in self.iter() {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(JudgeError::EngineInvariantViolation(format!(
                    "necessity weight for {criterion} out of [0,1]: {weight}"
                )));
            }
        }
        Ok(())
    }
}

impl Serialize for NecessityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Criterion::COUNT))?;
        for (criterion, weight) in self.iter() {
            map.serialize_entry(criterion.as_str(), &weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NecessityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NecessityVisitor;

        impl<'de> Visitor<'de> for NecessityVisitor {
            type Value = NecessityMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from criterion id to weight")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut weights: [Option<Weight>; Criterion::COUNT] = [None; Criterion::COUNT];
                while let Some((key, weight)) = access.next_entry::<Criterion, Weight>()? {
                    if weights[key.index()].replace(weight).is_some() {
                        return Err(de::Error::custom(format!("duplicate criterion: {key}")));
                    }
                }
                let mut resolved = [0.0; Criterion::COUNT];
                for criterion in Criterion::ALL {
                    resolved[criterion.index()] = weights[criterion.index()]
                        .ok_or_else(|| de::Error::custom(format!("missing criterion: {criterion}")))?;
                }
                Ok(NecessityMap::from_weights(resolved))
            }
        }

        deserializer.deserialize_map(NecessityVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub criterion: Criterion,
    pub score: Score,
    pub rationale: String,
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overall {
    pub average: Score,
    pub method: Mode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub necessity_map: Option<NecessityMap>,
    pub scores: Vec<ScoreResult>,
    pub overall: Overall,
}

impl AnalysisResult {
    pub fn score(&self, criterion: Criterion) -> Option<&ScoreResult> {
        self.scores.iter().find(|item| item.criterion == criterion)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
