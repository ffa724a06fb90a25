//! Versioned necessity table: how essential each criterion is per intent.

use crate::error::JudgeError;
use crate::types::scoring::{Criterion, Intent, NecessityMap, Weight};
use std::collections::HashMap;

pub const NECESSITY_MATRIX_VERSION: &str = "nmv1";

pub type NecessityOverrides = HashMap<Intent, HashMap<Criterion, Weight>>;

// Columns follow `Criterion::ALL`.
const HARD_NEWS: [Weight; Criterion::COUNT] = [0.9, 1.0, 1.0, 0.9, 0.7, 0.5, 0.8, 0.4, 0.5, 0.7, 0.8];
const EXPLAINER: [Weight; Criterion::COUNT] = [1.0, 0.6, 0.8, 0.7, 0.6, 0.6, 1.0, 0.8, 0.6, 0.6, 0.8];
const OPINION: [Weight; Criterion::COUNT] = [0.9, 0.4, 0.6, 0.8, 0.5, 0.7, 0.7, 0.6, 0.3, 0.7, 0.9];
const BRIEF: [Weight; Criterion::COUNT] = [0.9, 0.9, 0.8, 0.8, 0.4, 0.3, 0.6, 0.2, 0.4, 0.6, 0.8];
const FEATURE: [Weight; Criterion::COUNT] = [0.9, 0.5, 0.7, 0.7, 0.6, 0.7, 0.8, 0.7, 0.5, 0.6, 0.8];
const LIVE_BLOG: [Weight; Criterion::COUNT] = [0.7, 0.8, 0.8, 0.7, 0.4, 0.3, 0.6, 0.3, 0.5, 0.6, 0.8];

pub fn base_row(intent: Intent) -> [Weight; Criterion::COUNT] {
    match intent {
        Intent::HardNews => HARD_NEWS,
        Intent::Explainer => EXPLAINER,
        Intent::Opinion => OPINION,
        Intent::Brief => BRIEF,
        Intent::Feature => FEATURE,
        Intent::LiveBlog => LIVE_BLOG,
    }
}

pub fn necessity_map(
    intent: Intent,
    overrides: &NecessityOverrides,
) -> Result<NecessityMap, JudgeError> {
    let mut weights = base_row(intent);
    if let Some(row) = overrides.get(&intent) {
        for (criterion, weight) in row {
            weights[criterion.index()] = *weight;
        }
    }
    let map = NecessityMap::from_weights(weights);
    map.validate()?;
    Ok(map)
}
