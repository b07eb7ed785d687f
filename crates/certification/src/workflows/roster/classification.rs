use super::domain::{ClassifiedEmployee, ScoredEmployee};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum final score that earns the certification.
pub const PASSING_SCORE: f64 = 70.0;
/// Minimum final score for the leadership track.
pub const EXCELLENCE_SCORE: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CertificationOutcome {
    Failed,
    Passed,
    PassedExcellent,
}

impl CertificationOutcome {
    pub const ALL: [CertificationOutcome; 3] = [
        CertificationOutcome::Failed,
        CertificationOutcome::Passed,
        CertificationOutcome::PassedExcellent,
    ];

    /// Order matters: the lower band is checked before the excellence band.
    pub fn resolve(final_score: f64) -> Self {
        if final_score < PASSING_SCORE {
            return CertificationOutcome::Failed;
        }

        if final_score >= EXCELLENCE_SCORE {
            return CertificationOutcome::PassedExcellent;
        }

        CertificationOutcome::Passed
    }

    pub fn is_eligible(self) -> bool {
        !matches!(self, CertificationOutcome::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            CertificationOutcome::Failed => "Failed",
            CertificationOutcome::Passed => "Passed",
            CertificationOutcome::PassedExcellent => "PassedExcellent",
        }
    }
}

impl fmt::Display for CertificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(scored: ScoredEmployee) -> ClassifiedEmployee {
    let outcome = CertificationOutcome::resolve(scored.final_score);
    ClassifiedEmployee {
        employee: scored.employee,
        final_score: scored.final_score,
        outcome,
    }
}
