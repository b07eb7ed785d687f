use crate::workflows::roster::domain::EmployeeRecord;

pub(super) const HEADER: &str = "FirstName,LastName,Department,TheoreticalScore,PracticalScore";

pub(super) fn roster_csv(lines: &[&str]) -> String {
    let mut csv = String::from(HEADER);
    for line in lines {
        csv.push('\n');
        csv.push_str(line);
    }
    csv.push('\n');
    csv
}

pub(super) fn record(first: &str, last: &str, department: &str) -> EmployeeRecord {
    EmployeeRecord::new(first, last, department, 80.0, 90.0)
}

pub(super) fn scored_record(theoretical: f64, practical: f64) -> EmployeeRecord {
    EmployeeRecord::new("Dana", "Levi", "Engineering", theoretical, practical)
}
