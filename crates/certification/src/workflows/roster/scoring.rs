use super::domain::{EmployeeRecord, ScoredEmployee};

pub const PRACTICAL_WEIGHT: f64 = 0.6;
pub const THEORETICAL_WEIGHT: f64 = 0.4;
pub const SCORE_DECIMAL_PLACES: i32 = 2;

/// Weighted final score rounded to two decimals.
pub fn final_score(theoretical: f64, practical: f64) -> f64 {
    let raw = practical * PRACTICAL_WEIGHT + theoretical * THEORETICAL_WEIGHT;
    round_half_away(raw, SCORE_DECIMAL_PLACES)
}

pub fn score(employee: EmployeeRecord) -> ScoredEmployee {
    let final_score = final_score(employee.theoretical_score, employee.practical_score);
    ScoredEmployee {
        employee,
        final_score,
    }
}

/// Rounds to `places` decimals with midpoints going away from zero.
pub fn round_half_away(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    // Past this magnitude an f64 carries no fractional digits to round.
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
