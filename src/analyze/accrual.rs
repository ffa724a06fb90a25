use crate::error::JudgeError;
use crate::extract::signals::Violation;
use crate::types::scoring::{Score, Weight, SCORE_BASELINE, SCORE_MAX, SCORE_MIN};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualParams {
    /// `A`: how far full evidence can lift a fully necessary criterion.
    pub reward_scale: f64,
    /// `B`: how far full violation can sink a fully necessary criterion.
    pub penalty_scale: f64,
    pub harm_floor: Weight,
    pub low_necessity_threshold: Weight,
}

impl Default for AccrualParams {
    fn default() -> Self {
        Self {
            reward_scale: 5.0,
            penalty_scale: 6.0,
            harm_floor: 0.5,
            low_necessity_threshold: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accrual {
    pub score: Score,
    pub harm_applied: bool,
    pub absence_waived: bool,
}

/// Scores one criterion: `clamp(0, 10, 5 + A·w·e − B·w'·v')`.
pub fn accrue(
    params: &AccrualParams,
    weight: Weight,
    evidence: f64,
    violation: &Violation,
) -> Result<Accrual, JudgeError> {
    check_unit("necessity weight", weight)?;
    check_unit("evidence", evidence)?;
    check_unit("violation", violation.strength)?;

    let absence_waived = violation.absence_only
        && violation.strength > 0.0
        && weight < params.low_necessity_threshold;
    let effective_violation = if absence_waived {
        0.0
    } else {
        violation.strength
    };

    let harm_applied = violation.harm && violation.strength > 0.0;
    let penalty_weight = if harm_applied {
        weight.max(params.harm_floor)
    } else {
        weight
    };

    let raw = SCORE_BASELINE + params.reward_scale * weight * evidence
        - params.penalty_scale * penalty_weight * effective_violation;
    if !raw.is_finite() {
        return Err(JudgeError::EngineInvariantViolation(format!(
            "accrual produced a non-finite score (w={weight}, e={evidence}, v={})",
            violation.strength
        )));
    }

    Ok(Accrual {
        score: raw.clamp(SCORE_MIN, SCORE_MAX),
        harm_applied,
        absence_waived,
    })
}

fn check_unit(name: &str, value: f64) -> Result<(), JudgeError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(JudgeError::EngineInvariantViolation(format!(
            "{name} out of [0,1]: {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breach(strength: f64) -> Violation {
        Violation {
            strength,
            absence_only: false,
            harm: false,
        }
    }

    fn absence(strength: f64) -> Violation {
        Violation {
            strength,
            absence_only: true,
            harm: false,
        }
    }

    fn harm(strength: f64) -> Violation {
        Violation {
            strength,
            absence_only: false,
            harm: true,
        }
    }

    #[test]
    fn low_necessity_without_signals_stays_at_baseline() {
        let params = AccrualParams::default();
        let accrual = accrue(&params, 0.1, 0.0, &Violation::none()).expect("valid inputs");
        assert_eq!(accrual.score, 5.0);
        assert!(!accrual.harm_applied);
        assert!(!accrual.absence_waived);
    }

    #[test]
    fn necessary_misleading_criterion_drops_below_two() {
        let params = AccrualParams::default();
        let accrual = accrue(&params, 0.9, 0.0, &breach(0.8)).expect("valid inputs");
        assert!((accrual.score - 0.68).abs() < 1e-9);
        assert!(accrual.score < 2.0);
    }

    #[test]
    fn score_is_clamped_to_display_scale() {
        let params = AccrualParams {
            reward_scale: 20.0,
            penalty_scale: 20.0,
            ..AccrualParams::default()
        };
        let high = accrue(&params, 1.0, 1.0, &Violation::none()).expect("valid inputs");
        assert_eq!(high.score, 10.0);
        let low = accrue(&params, 1.0, 0.0, &breach(1.0)).expect("valid inputs");
        assert_eq!(low.score, 0.0);
    }

    #[test]
    fn score_is_monotone_in_evidence_and_violation() {
        let params = AccrualParams::default();
        let steps = (0..=10).map(|step| step as f64 / 10.0).collect::<Vec<_>>();
        for &w in &[0.2, 0.5, 1.0] {
            for window in steps.windows(2) {
                let lower = accrue(&params, w, window[0], &breach(0.3)).expect("valid");
                let higher = accrue(&params, w, window[1], &breach(0.3)).expect("valid");
                assert!(higher.score >= lower.score);

                let milder = accrue(&params, w, 0.5, &breach(window[0])).expect("valid");
                let harsher = accrue(&params, w, 0.5, &breach(window[1])).expect("valid");
                assert!(harsher.score <= milder.score);
            }
        }
    }

    #[test]
    fn zero_weight_keeps_baseline_unless_harm_is_flagged() {
        let params = AccrualParams::default();
        let plain = accrue(&params, 0.0, 1.0, &breach(1.0)).expect("valid inputs");
        assert_eq!(plain.score, 5.0);

        let mild = accrue(&params, 0.0, 0.0, &harm(0.4)).expect("valid inputs");
        let severe = accrue(&params, 0.0, 0.0, &harm(0.8)).expect("valid inputs");
        assert!(mild.harm_applied);
        // 5 - 6 * 0.5 * v
        assert!((mild.score - 3.8).abs() < 1e-9);
        assert!((severe.score - 2.6).abs() < 1e-9);
    }

    #[test]
    fn harm_floor_never_lowers_a_high_weight() {
        let params = AccrualParams::default();
        let flagged = accrue(&params, 0.9, 0.0, &harm(0.5)).expect("valid inputs");
        let plain = accrue(&params, 0.9, 0.0, &breach(0.5)).expect("valid inputs");
        assert_eq!(flagged.score, plain.score);
    }

    #[test]
    fn absence_below_threshold_is_waived() {
        let params = AccrualParams::default();
        let waived = accrue(&params, 0.2, 0.0, &absence(1.0)).expect("valid inputs");
        assert_eq!(waived.score, 5.0);
        assert!(waived.absence_waived);

        let counted = accrue(&params, 0.3, 0.0, &absence(1.0)).expect("valid inputs");
        assert!((counted.score - 3.2).abs() < 1e-9);
        assert!(!counted.absence_waived);
    }

    #[test]
    fn out_of_range_inputs_are_invariant_violations() {
        let params = AccrualParams::default();
        for (w, e, v) in [(1.1, 0.0, 0.0), (0.5, -0.1, 0.0), (0.5, 0.0, f64::NAN)] {
            let err = accrue(&params, w, e, &breach(v)).expect_err("must reject");
            assert!(matches!(err, JudgeError::EngineInvariantViolation(_)));
        }
    }
}
