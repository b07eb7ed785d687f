use serde::{Deserialize, Serialize};

use super::classification::CertificationOutcome;

/// One roster entry as read from the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub theoretical_score: f64,
    pub practical_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl EmployeeRecord {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
        theoretical_score: f64,
        practical_score: f64,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
            theoretical_score,
            practical_score,
            email: None,
            phone: None,
        }
    }

    pub fn with_contact(mut self, email: Option<String>, phone: Option<String>) -> Self {
        self.email = email;
        self.phone = phone;
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Employee together with the weighted final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEmployee {
    pub employee: EmployeeRecord,
    pub final_score: f64,
}

/// Scored employee with its resolved certification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEmployee {
    pub employee: EmployeeRecord,
    pub final_score: f64,
    pub outcome: CertificationOutcome,
}

impl ClassifiedEmployee {
    pub fn full_name(&self) -> String {
        self.employee.full_name()
    }

    pub fn is_eligible(&self) -> bool {
        self.outcome.is_eligible()
    }
}
