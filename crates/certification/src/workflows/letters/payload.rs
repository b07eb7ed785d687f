use super::renderer::file_stem;
use crate::workflows::roster::scoring::round_half_away;
use crate::workflows::roster::{CertificationOutcome, ClassifiedEmployee, EXCELLENCE_SCORE};
use serde::{Deserialize, Serialize};

/// Shown in place of a missing phone number or e-mail address.
pub const NOT_PROVIDED: &str = "Not provided";

const STANDARD_BODY: &str = "We are pleased to confirm that you have completed the certification \
training. Unfortunately, no suitable role is currently available for you.";

/// Everything a letter template needs for one eligible employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterPayload {
    pub full_name: String,
    pub department: String,
    pub phone: String,
    pub email: String,
    pub final_score: String,
    pub outcome: CertificationOutcome,
    pub body: String,
    /// File name stem of the letter, without the `_Certification` suffix.
    pub document_name: String,
}

impl LetterPayload {
    /// Returns `None` for employees below the passing score; no letter is
    /// produced for them.
    pub fn for_employee(employee: &ClassifiedEmployee) -> Option<Self> {
        if !employee.is_eligible() {
            return None;
        }

        let record = &employee.employee;
        let full_name = format!("{} {}", record.first_name, record.last_name);
        Some(Self {
            document_name: file_stem(&full_name),
            full_name,
            department: record.department.clone(),
            phone: contact_or_placeholder(record.phone.as_deref()),
            email: contact_or_placeholder(record.email.as_deref()),
            final_score: format_score(employee.final_score),
            outcome: employee.outcome,
            body: body_text(employee.final_score),
        })
    }
}

/// One decimal place, midpoints rounded away from zero.
pub fn format_score(score: f64) -> String {
    format!("{:.1}", round_half_away(score, 1))
}

pub fn body_text(final_score: f64) -> String {
    if final_score >= EXCELLENCE_SCORE {
        format!(
            "We are pleased to inform you that you have successfully completed the certification \
training. Your final score is {}. You have been found suitable for the role of departmental \
technology lead.",
            format_score(final_score)
        )
    } else {
        STANDARD_BODY.to_string()
    }
}

fn contact_or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => NOT_PROVIDED.to_string(),
    }
}
