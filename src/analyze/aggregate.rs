use crate::error::JudgeError;
use crate::types::scoring::{round2, Criterion, Mode, Overall, ScoreResult};

pub fn aggregate(scores: &[ScoreResult], mode: Mode) -> Result<Overall, JudgeError> {
    if scores.len() != Criterion::COUNT {
        return Err(JudgeError::EngineInvariantViolation(format!(
            "expected {} scores, found {}",
            Criterion::COUNT,
            scores.len()
        )));
    }
    for (item, expected) in scores.iter().zip(Criterion::ALL) {
        if item.criterion != expected {
            return Err(JudgeError::EngineInvariantViolation(format!(
                "score for {expected} expected, found {}",
                item.criterion
            )));
        }
    }

    let sum: f64 = scores.iter().map(|item| item.score).sum();
    Ok(Overall {
        average: round2(sum / scores.len() as f64),
        method: mode,
    })
}
