//! Per-criterion evidence and violation signals.

use super::features::{distinct_hits, Features};
use super::lexicon::{
    ANONYMOUS_SOURCING, BALANCE_TERMS, CIVIC_TERMS, CONTEXT_TERMS, DOMAINS, HARM_TERMS,
    HEDGE_WORDS, HOW_TERMS, LOADED_TERMS, OVERCLAIM_WORDS, PLACE_PREPOSITIONS, QUOTE_VERBS,
    SENSATIONAL_TERMS, TRANSPARENCY_TERMS, WHEN_TERMS, WHY_TERMS,
};
use super::text::{contains_term, count_quotes, count_term, words, Document, Location};
use crate::types::scoring::Criterion;
use std::collections::BTreeSet;

const MAX_LOCATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Violation {
    pub strength: f64,
    /// Only an expected element is missing; nothing in the text is wrong.
    pub absence_only: bool,
    pub harm: bool,
}

impl Violation {
    pub fn none() -> Self {
        Self::default()
    }

    fn absence(strength: f64) -> Self {
        Self {
            strength: strength.clamp(0.0, 1.0),
            absence_only: true,
            harm: false,
        }
    }

    fn breach(strength: f64) -> Self {
        Self {
            strength: strength.clamp(0.0, 1.0),
            absence_only: false,
            harm: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionSignal {
    pub criterion: Criterion,
    pub evidence: f64,
    pub violation: Violation,
    pub finding: String,
    pub locations: Vec<Location>,
    pub flags: Vec<&'static str>,
}

impl CriterionSignal {
    fn new(criterion: Criterion, evidence: f64, violation: Violation) -> Self {
        Self {
            criterion,
            evidence: evidence.clamp(0.0, 1.0),
            violation,
            finding: String::new(),
            locations: Vec::new(),
            flags: Vec::new(),
        }
    }

    fn finding(mut self, finding: impl Into<String>) -> Self {
        self.finding = finding.into();
        self
    }

    fn at(mut self, locations: Vec<Location>) -> Self {
        self.locations = if locations.is_empty() {
            vec![Location::Body]
        } else {
            locations
        };
        self
    }

    fn flag_if(mut self, condition: bool, flag: &'static str) -> Self {
        if condition {
            self.flags.push(flag);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TermHit {
    term: &'static str,
    paragraph: usize,
    count: usize,
}

fn scan(doc: &Document, terms: &[&'static str]) -> Vec<TermHit> {
    let mut hits = Vec::new();
    for paragraph in &doc.paragraphs {
        for term in terms {
            let count = count_term(&paragraph.lower, term);
            if count > 0 {
                hits.push(TermHit {
                    term: *term,
                    paragraph: paragraph.index,
                    count,
                });
            }
        }
    }
    hits
}

fn total(hits: &[TermHit]) -> usize {
    hits.iter().map(|hit| hit.count).sum()
}

fn distinct_terms(hits: &[TermHit]) -> Vec<&'static str> {
    let mut seen = Vec::new();
    for hit in hits {
        if !seen.contains(&hit.term) {
            seen.push(hit.term);
        }
    }
    seen
}

fn paragraph_locations(paragraphs: impl IntoIterator<Item = usize>) -> Vec<Location> {
    paragraphs
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(MAX_LOCATIONS)
        .map(Location::paragraph)
        .collect()
}

fn hit_locations(hits: &[TermHit]) -> Vec<Location> {
    paragraph_locations(hits.iter().map(|hit| hit.paragraph))
}

fn quoted_list(terms: &[&str]) -> String {
    terms
        .iter()
        .map(|term| format!("\"{term}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().map(char::is_uppercase).unwrap_or(false)
}

fn has_named_entity(sentence: &str) -> bool {
    words(sentence).skip(1).any(starts_uppercase)
}

fn has_year(text: &str) -> bool {
    words(text).any(|word| {
        word.len() == 4
            && word.chars().all(|ch| ch.is_ascii_digit())
            && (word.starts_with("19") || word.starts_with("20"))
    })
}

pub fn extract_signals(doc: &Document, features: &Features) -> Vec<CriterionSignal> {
    let mut signals = Criterion::ALL
        .into_iter()
        .map(|criterion| match criterion {
            Criterion::ClarityCoherence => clarity_coherence(doc, features),
            Criterion::FiveWOneH => five_w_one_h(doc),
            Criterion::AttributionEvidence => attribution_evidence(doc, features),
            Criterion::HedgingOverclaim => hedging_overclaim(doc, features),
            Criterion::BalanceOpposing => balance_opposing(doc),
            Criterion::InversionTouch => inversion_touch(doc),
            Criterion::ContextProportionality => context_proportionality(doc),
            Criterion::Multidisciplinarity => multidisciplinarity(doc),
            Criterion::CivicUtility => civic_utility(doc),
            Criterion::TransparencyCues => transparency_cues(doc),
            Criterion::LanguageCredibility => language_credibility(doc),
        })
        .collect::<Vec<_>>();

    let harm = scan(doc, HARM_TERMS);
    if !harm.is_empty() {
        apply_harm(
            &mut signals,
            &distinct_terms(&harm),
            total(&harm),
            &hit_locations(&harm),
        );
    }
    signals
}

fn clarity_coherence(doc: &Document, features: &Features) -> CriterionSignal {
    let avg = features.avg_sentence_len_first5;
    let evidence = if avg <= 0.0 {
        0.0
    } else if avg < 8.0 {
        0.6
    } else if avg <= 25.0 {
        1.0
    } else {
        (1.0 - (avg - 25.0) / 15.0).max(0.0)
    };
    let violation = if avg > 35.0 {
        Violation::breach((avg - 35.0) / 20.0 + 0.3)
    } else {
        Violation::none()
    };

    let locations = paragraph_locations(
        doc.sentences
            .iter()
            .take(5)
            .map(|sentence| sentence.paragraph),
    );
    CriterionSignal::new(Criterion::ClarityCoherence, evidence, violation)
        .finding(format!("Opening sentences average {avg:.1} words"))
        .at(locations)
        .flag_if(avg > 35.0, "long_sentences")
}

fn five_w_one_h(doc: &Document) -> CriterionSignal {
    let opening = doc
        .sentences
        .iter()
        .filter(|sentence| sentence.paragraph == 0)
        .take(2)
        .collect::<Vec<_>>();
    let text = opening
        .iter()
        .map(|sentence| sentence.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let lower = text.to_lowercase();

    let tokens = words(&text).collect::<Vec<_>>();
    let has_place = tokens.windows(2).any(|pair| {
        PLACE_PREPOSITIONS.contains(&pair[0].to_lowercase().as_str()) && starts_uppercase(pair[1])
    });

    let elements = [
        (
            "who",
            opening
                .iter()
                .any(|sentence| has_named_entity(&sentence.text)),
        ),
        ("what", tokens.len() >= 6),
        (
            "when",
            WHEN_TERMS.iter().any(|term| contains_term(&lower, term)) || has_year(&text),
        ),
        ("where", has_place),
        ("why", WHY_TERMS.iter().any(|term| contains_term(&lower, term))),
        ("how", HOW_TERMS.iter().any(|term| contains_term(&lower, term))),
    ];
    let found = elements
        .iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
    let missing = elements
        .iter()
        .filter(|(_, present)| !*present)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();

    let evidence = found.len() as f64 / elements.len() as f64;
    let violation = if missing.is_empty() {
        Violation::none()
    } else {
        Violation::absence(missing.len() as f64 / elements.len() as f64)
    };
    let finding = if missing.is_empty() {
        "Lede covers who, what, when, where, why and how".to_string()
    } else if found.is_empty() {
        format!("Lede answers none of {}", missing.join(", "))
    } else {
        format!(
            "Lede covers {} but not {}",
            found.join(", "),
            missing.join(", ")
        )
    };

    CriterionSignal::new(Criterion::FiveWOneH, evidence, violation)
        .finding(finding)
        .at(paragraph_locations(
            opening.iter().map(|sentence| sentence.paragraph),
        ))
        .flag_if(missing.len() >= 3, "incomplete_lede")
}

fn attribution_evidence(doc: &Document, features: &Features) -> CriterionSignal {
    let verbs = scan(doc, QUOTE_VERBS);
    let anonymous = scan(doc, ANONYMOUS_SOURCING);
    let quotes = features.quotes_detected;
    let attributions = total(&verbs);
    let anonymous_count = total(&anonymous);
    let support = quotes + attributions;

    let evidence = (support as f64 / 4.0).min(1.0);
    let violation = if support == 0 {
        Violation::absence(1.0)
    } else if anonymous_count > 0 {
        Violation::breach(0.25 * anonymous_count as f64)
    } else {
        Violation::none()
    };

    let mut finding = format!(
        "Found {quotes} direct quote(s) and {attributions} attribution phrase(s)"
    );
    if anonymous_count > 0 {
        finding.push_str(&format!(
            ", including {anonymous_count} unnamed-source attribution(s)"
        ));
    }

    let quote_paragraphs = doc
        .paragraphs
        .iter()
        .filter(|paragraph| count_quotes(&paragraph.text) > 0)
        .map(|paragraph| paragraph.index);
    let locations = paragraph_locations(
        verbs
            .iter()
            .map(|hit| hit.paragraph)
            .chain(quote_paragraphs),
    );

    CriterionSignal::new(Criterion::AttributionEvidence, evidence, violation)
        .finding(finding)
        .at(locations)
        .flag_if(support == 0, "no_attribution")
        .flag_if(support > 0 && anonymous_count > 0, "anonymous_sourcing")
}

fn hedging_overclaim(doc: &Document, features: &Features) -> CriterionSignal {
    let hedges = features.hedge_hits.len();
    let overclaims = features.overclaim_hits.len();

    let evidence = if overclaims == 0 {
        0.4 + 0.2 * hedges.min(3) as f64
    } else {
        0.0
    };
    let violation = if overclaims > 0 {
        Violation::breach(0.3 * overclaims as f64)
    } else {
        Violation::none()
    };

    let finding = match (hedges, overclaims) {
        (0, 0) => "Neither hedged nor absolute wording stands out".to_string(),
        (_, 0) => format!(
            "Signals uncertainty with {}",
            quoted_list(&features.hedge_hits)
        ),
        (0, _) => format!(
            "Uses absolute wording such as {}",
            quoted_list(&features.overclaim_hits)
        ),
        _ => format!(
            "Mixes hedges ({}) with absolute wording ({})",
            quoted_list(&features.hedge_hits),
            quoted_list(&features.overclaim_hits)
        ),
    };

    let overclaim_hits = scan(doc, OVERCLAIM_WORDS);
    let locations = if overclaim_hits.is_empty() {
        hit_locations(&scan(doc, HEDGE_WORDS))
    } else {
        hit_locations(&overclaim_hits)
    };

    CriterionSignal::new(Criterion::HedgingOverclaim, evidence, violation)
        .finding(finding)
        .at(locations)
        .flag_if(overclaims > 0, "overclaim")
}

fn balance_opposing(doc: &Document) -> CriterionSignal {
    let hits = scan(doc, BALANCE_TERMS);
    let terms = distinct_terms(&hits);

    let evidence = (terms.len() as f64 / 2.0).min(1.0);
    let violation = if terms.is_empty() {
        Violation::absence(0.6)
    } else {
        Violation::none()
    };
    let finding = if terms.is_empty() {
        "No opposing or dissenting voice is signalled".to_string()
    } else {
        format!("Opposing views are signalled by {}", quoted_list(&terms))
    };

    CriterionSignal::new(Criterion::BalanceOpposing, evidence, violation)
        .finding(finding)
        .at(hit_locations(&hits))
        .flag_if(terms.is_empty(), "one_sided")
}

fn inversion_touch(doc: &Document) -> CriterionSignal {
    let lede = doc.lede().map(|paragraph| paragraph.text.as_str()).unwrap_or("");
    let length = words(lede).count();
    let concrete = lede.chars().any(|ch| ch.is_ascii_digit()) || has_named_entity(lede);

    let evidence = if length == 0 {
        0.0
    } else if length <= 40 && concrete {
        1.0
    } else if length <= 60 {
        0.5
    } else {
        0.1
    };
    let violation = if length > 60 {
        Violation::absence((length as f64 - 60.0) / 60.0 + 0.3)
    } else {
        Violation::none()
    };
    let finding = format!(
        "Lede runs {length} words {} a concrete fact up front",
        if concrete { "with" } else { "without" }
    );

    CriterionSignal::new(Criterion::InversionTouch, evidence, violation)
        .finding(finding)
        .at(vec![Location::Lede])
        .flag_if(length > 60, "buried_lede")
}

fn context_proportionality(doc: &Document) -> CriterionSignal {
    let context = scan(doc, CONTEXT_TERMS);
    let sensational = scan(doc, SENSATIONAL_TERMS);
    let context_terms = distinct_terms(&context);
    let sensational_count = total(&sensational);

    let evidence = (context_terms.len() as f64 / 3.0).min(1.0);
    let violation = if sensational_count > 0 {
        Violation::breach(0.25 * sensational_count as f64)
    } else if context_terms.is_empty() {
        Violation::absence(0.4)
    } else {
        Violation::none()
    };

    let mut parts = Vec::new();
    if context_terms.is_empty() {
        parts.push("No background or scale is given".to_string());
    } else {
        parts.push(format!(
            "Background and scale come from {}",
            quoted_list(&context_terms)
        ));
    }
    if sensational_count > 0 {
        parts.push(format!(
            "sensational framing via {}",
            quoted_list(&distinct_terms(&sensational))
        ));
    }

    let locations = if sensational.is_empty() {
        hit_locations(&context)
    } else {
        hit_locations(&sensational)
    };

    CriterionSignal::new(Criterion::ContextProportionality, evidence, violation)
        .finding(parts.join("; "))
        .at(locations)
        .flag_if(sensational_count > 0, "sensational")
        .flag_if(sensational_count == 0 && context_terms.is_empty(), "no_context")
}

fn multidisciplinarity(doc: &Document) -> CriterionSignal {
    let mut lenses = Vec::new();
    let mut paragraphs = Vec::new();
    for (name, terms) in DOMAINS {
        let first = doc.paragraphs.iter().find(|paragraph| {
            terms
                .iter()
                .any(|term| contains_term(&paragraph.lower, term))
        });
        if let Some(paragraph) = first {
            lenses.push(*name);
            paragraphs.push(paragraph.index);
        }
    }

    let count = lenses.len();
    let evidence = (count.saturating_sub(1) as f64 / 2.0).min(1.0);
    let violation = if count <= 1 {
        Violation::absence(0.3)
    } else {
        Violation::none()
    };
    let finding = if lenses.is_empty() {
        "No distinct subject lens stands out".to_string()
    } else {
        format!("Draws on {count} lens(es): {}", lenses.join(", "))
    };

    CriterionSignal::new(Criterion::Multidisciplinarity, evidence, violation)
        .finding(finding)
        .at(paragraph_locations(paragraphs))
        .flag_if(count <= 1, "single_lens")
}

fn civic_utility(doc: &Document) -> CriterionSignal {
    let hits = scan(doc, CIVIC_TERMS);
    let terms = distinct_terms(&hits);

    let evidence = (terms.len() as f64 / 2.0).min(1.0);
    let violation = if terms.is_empty() {
        Violation::absence(0.5)
    } else {
        Violation::none()
    };
    let finding = if terms.is_empty() {
        "Offers readers no actionable next step".to_string()
    } else {
        format!("Gives readers actionable cues such as {}", quoted_list(&terms))
    };

    CriterionSignal::new(Criterion::CivicUtility, evidence, violation)
        .finding(finding)
        .at(hit_locations(&hits))
        .flag_if(terms.is_empty(), "no_actionable_info")
}

fn transparency_cues(doc: &Document) -> CriterionSignal {
    let hits = scan(doc, TRANSPARENCY_TERMS);
    let terms = distinct_terms(&hits);

    let evidence = (terms.len() as f64 / 2.0).min(1.0);
    let violation = if terms.is_empty() {
        Violation::absence(0.5)
    } else {
        Violation::none()
    };
    let finding = if terms.is_empty() {
        "No correction, update, disclosure or right-of-reply note".to_string()
    } else {
        format!("Transparency cues include {}", quoted_list(&terms))
    };

    CriterionSignal::new(Criterion::TransparencyCues, evidence, violation)
        .finding(finding)
        .at(hit_locations(&hits))
        .flag_if(terms.is_empty(), "no_transparency_cues")
}

fn language_credibility(doc: &Document) -> CriterionSignal {
    let loaded = scan(doc, LOADED_TERMS);
    let loaded_count = total(&loaded);
    let mut exclamations = 0;
    let mut shouting = 0;
    let mut paragraphs = loaded.iter().map(|hit| hit.paragraph).collect::<Vec<_>>();
    for paragraph in &doc.paragraphs {
        let marks = paragraph.text.matches('!').count();
        let caps = words(&paragraph.text)
            .filter(|word| {
                word.chars().count() >= 5 && word.chars().all(|ch| ch.is_alphabetic() && ch.is_uppercase())
            })
            .count();
        if marks + caps > 0 {
            paragraphs.push(paragraph.index);
        }
        exclamations += marks;
        shouting += caps;
    }

    let raw = 0.2 * loaded_count as f64 + 0.1 * exclamations as f64 + 0.1 * shouting as f64;
    let evidence = if raw == 0.0 { 0.8 } else { 0.0 };
    let violation = if raw > 0.0 {
        Violation::breach(raw)
    } else {
        Violation::none()
    };
    let finding = if raw == 0.0 {
        "Tone is measured, with no loaded terms, shouting or exclamations".to_string()
    } else {
        format!(
            "Found {loaded_count} loaded term(s), {exclamations} exclamation(s) and {shouting} all-caps word(s)"
        )
    };

    CriterionSignal::new(Criterion::LanguageCredibility, evidence, violation)
        .finding(finding)
        .at(paragraph_locations(paragraphs))
        .flag_if(raw > 0.0, "loaded_language")
}

/// Headline cues only add to what the body already shows.
pub fn apply_headline(signals: &mut [CriterionSignal], title: &str) {
    let lower = title.to_lowercase();
    let mut loaded = distinct_hits(&lower, LOADED_TERMS);
    if title.contains('!') {
        loaded.push("!");
    }
    let sensational = distinct_hits(&lower, SENSATIONAL_TERMS);

    for (criterion, terms, flag) in [
        (Criterion::LanguageCredibility, loaded, "loaded_language"),
        (Criterion::ContextProportionality, sensational, "sensational"),
    ] {
        if terms.is_empty() {
            continue;
        }
        let Some(signal) = signals
            .iter_mut()
            .find(|signal| signal.criterion == criterion)
        else {
            continue;
        };

        signal.violation = Violation {
            strength: (signal.violation.strength + 0.2 * terms.len() as f64).min(1.0),
            absence_only: false,
            harm: signal.violation.harm,
        };
        if criterion == Criterion::LanguageCredibility {
            signal.evidence = 0.0;
        }
        signal.finding = format!("{}; headline uses {}", signal.finding, quoted_list(&terms));
        cite_first(signal, &[Location::Headline]);
        if !signal.flags.contains(&flag) {
            signal.flags.push(flag);
        }
    }

    let harm = distinct_hits(&lower, HARM_TERMS);
    if !harm.is_empty() {
        let count = harm.iter().map(|term| count_term(&lower, term)).sum();
        apply_harm(signals, &harm, count, &[Location::Headline]);
    }
}

fn cite_first(signal: &mut CriterionSignal, cited: &[Location]) {
    let mut locations = cited.to_vec();
    for location in &signal.locations {
        if !locations.contains(location) && *location != Location::Body {
            locations.push(*location);
        }
    }
    locations.truncate(MAX_LOCATIONS + 1);
    signal.locations = locations;
}

const HARM_SENSITIVE: [Criterion; 3] = [
    Criterion::HedgingOverclaim,
    Criterion::ContextProportionality,
    Criterion::LanguageCredibility,
];

// Never absence-only, so low necessity cannot waive it.
fn apply_harm(
    signals: &mut [CriterionSignal],
    terms: &[&'static str],
    count: usize,
    locations: &[Location],
) {
    let strength = (0.4 + 0.2 * count as f64).min(1.0);
    let terms = quoted_list(terms);

    for signal in signals
        .iter_mut()
        .filter(|signal| HARM_SENSITIVE.contains(&signal.criterion))
    {
        signal.violation = Violation {
            strength: signal.violation.strength.max(strength),
            absence_only: false,
            harm: true,
        };
        signal.finding = format!("{}; misleading framing via {terms}", signal.finding);
        cite_first(signal, locations);
        if !signal.flags.contains(&"harm") {
            signal.flags.push("harm");
        }
    }
}
