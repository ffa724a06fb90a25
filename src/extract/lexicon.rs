// Term lists are lowercase; matching is on lowercased text with word boundaries.

pub const HEDGE_WORDS: &[&str] = &[
    "may",
    "might",
    "could",
    "suggests",
    "appears",
    "reportedly",
    "allegedly",
    "possible",
];

pub const OVERCLAIM_WORDS: &[&str] = &[
    "proves",
    "undeniably",
    "certainly",
    "always",
    "never",
    "guarantees",
];

pub const QUOTE_VERBS: &[&str] = &["said", "told", "according to", "stated", "wrote"];

pub const ANONYMOUS_SOURCING: &[&str] = &[
    "sources said",
    "sources say",
    "people familiar",
    "on condition of anonymity",
    "anonymous source",
    "insiders say",
];

pub const WHEN_TERMS: &[&str] = &[
    "today",
    "yesterday",
    "tonight",
    "tomorrow",
    "this week",
    "last week",
    "this morning",
    "on monday",
    "on tuesday",
    "on wednesday",
    "on thursday",
    "on friday",
    "on saturday",
    "on sunday",
    "january",
    "february",
    "march",
    "april",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

pub const WHY_TERMS: &[&str] = &[
    "because",
    "after",
    "due to",
    "amid",
    "following",
    "in order to",
    "so that",
    "in response to",
];

pub const HOW_TERMS: &[&str] = &["by", "through", "using", "via", "with a vote"];

pub const PLACE_PREPOSITIONS: &[&str] = &["in", "at", "from", "near"];

pub const BALANCE_TERMS: &[&str] = &[
    "however",
    "critics",
    "opponents",
    "on the other hand",
    "disagree",
    "disagreed",
    "countered",
    "disputed",
    "rejected the",
    "denied",
    "in contrast",
    "supporters",
    "skeptics",
];

pub const CONTEXT_TERMS: &[&str] = &[
    "previously",
    "last year",
    "earlier this year",
    "compared with",
    "compared to",
    "percent",
    "%",
    "average",
    "historically",
    "for context",
    "background",
    "a decade",
    "since",
    "the first time since",
];

pub const SENSATIONAL_TERMS: &[&str] = &[
    "shocking",
    "unprecedented",
    "catastrophic",
    "explosive",
    "bombshell",
    "devastating",
    "skyrocketing",
    "chaos",
    "jaw-dropping",
];

pub const CIVIC_TERMS: &[&str] = &[
    "how to",
    "deadline",
    "apply",
    "register",
    "vote",
    "hotline",
    "call",
    "visit",
    "website",
    "available at",
    "sign up",
    "eligible",
    "resources",
    "where to",
    "http",
    "www.",
];

pub const TRANSPARENCY_TERMS: &[&str] = &[
    "correction",
    "corrected",
    "updated",
    "editor's note",
    "disclosure",
    "methodology",
    "we contacted",
    "did not respond",
    "declined to comment",
    "could not be reached",
    "could not independently verify",
    "was not immediately available",
];

pub const LOADED_TERMS: &[&str] = &[
    "outrageous",
    "disgraceful",
    "idiot",
    "idiots",
    "evil",
    "slams",
    "destroys",
    "blasts",
    "insane",
    "pathetic",
    "traitor",
    "thugs",
];

pub const HARM_TERMS: &[&str] = &[
    "hoax",
    "cover-up",
    "miracle cure",
    "they don't want you to know",
    "plandemic",
    "rigged",
    "fake news",
    "guaranteed cure",
    "the truth they hide",
];

pub const DOMAINS: &[(&str, &[&str])] = &[
    (
        "economics",
        &["economy", "economic", "market", "inflation", "jobs", "budget", "tax"],
    ),
    (
        "law",
        &["court", "law", "legal", "judge", "regulation", "lawsuit"],
    ),
    (
        "science",
        &["study", "research", "scientists", "researchers", "data"],
    ),
    (
        "health",
        &["health", "hospital", "patients", "disease", "medical"],
    ),
    (
        "politics",
        &["election", "government", "minister", "senator", "policy", "parliament", "congress"],
    ),
    (
        "environment",
        &["climate", "emissions", "environment", "pollution", "energy"],
    ),
    (
        "technology",
        &["software", "technology", "digital", "internet", "artificial intelligence"],
    ),
    (
        "society",
        &["culture", "community", "education", "school", "families"],
    ),
];

pub const OPINION_TERMS: &[&str] = &[
    "i think",
    "i believe",
    "in my view",
    "we must",
    "we should",
    "i argue",
    "in my opinion",
    "my view",
];

pub const OPINION_TITLE_TERMS: &[&str] = &["opinion", "op-ed", "column", "editorial", "commentary"];

pub const EXPLAINER_TITLE_TERMS: &[&str] = &[
    "what",
    "how",
    "why",
    "explained",
    "explainer",
    "what to know",
    "here",
    "guide",
];

pub const EXPLAINER_BODY_TERMS: &[&str] = &[
    "here's what",
    "what this means",
    "in other words",
    "for example",
    "the answer",
    "to understand",
];

pub const LIVE_TERMS: &[&str] = &["live", "live updates", "as it happened", "latest updates"];

pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "that", "this", "into", "over", "after", "about", "what",
    "when", "where", "will", "says", "said", "have", "more", "than", "their", "they",
];
