use super::domain::EmployeeRecord;
use std::collections::HashSet;

/// Placeholder department for rows that left the column empty.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

/// Capitalizes the first character and lowercases the rest. Multi-word
/// values are not title-cased: "VAN DER BERG" becomes "Van der berg".
pub fn normalize_name(value: &str) -> String {
    capitalize(value.trim())
}

pub fn normalize_department(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return UNKNOWN_DEPARTMENT.to_string();
    }
    capitalize(trimmed)
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut normalized = String::with_capacity(value.len());
    normalized.push(simple_upper(first));
    normalized.extend(chars.map(simple_lower));
    normalized
}

// Mappings that expand to several characters (e.g. 'ß' -> "SS") are left
// alone so a second pass gives the same result.
fn simple_upper(c: char) -> char {
    let mut mapped = c.to_uppercase();
    match (mapped.next(), mapped.next()) {
        (Some(upper), None) => upper,
        _ => c,
    }
}

fn simple_lower(c: char) -> char {
    let mut mapped = c.to_lowercase();
    match (mapped.next(), mapped.next()) {
        (Some(lower), None) => lower,
        _ => c,
    }
}

pub fn normalize_record(record: EmployeeRecord) -> EmployeeRecord {
    EmployeeRecord {
        first_name: normalize_name(&record.first_name),
        last_name: normalize_name(&record.last_name),
        department: normalize_department(&record.department),
        ..record
    }
}

/// Case-insensitive identity of a roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    first_name: String,
    last_name: String,
    department: String,
}

impl DuplicateKey {
    pub fn of(record: &EmployeeRecord) -> Self {
        Self {
            first_name: record.first_name.to_lowercase(),
            last_name: record.last_name.to_lowercase(),
            department: record.department.to_lowercase(),
        }
    }
}

/// Cleaned roster plus the number of entries dropped as duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedRoster {
    pub records: Vec<EmployeeRecord>,
    pub duplicates: usize,
}

/// Normalizes every record and drops duplicates in one forward pass. The
/// first record seen for a key is kept; later ones are discarded even when
/// their scores differ.
pub fn clean<I>(records: I) -> CleanedRoster
where
    I: IntoIterator<Item = EmployeeRecord>,
{
    let mut seen = HashSet::new();
    let mut cleaned = CleanedRoster::default();

    for record in records {
        let record = normalize_record(record);
        if seen.insert(DuplicateKey::of(&record)) {
            cleaned.records.push(record);
        } else {
            cleaned.duplicates += 1;
        }
    }

    cleaned
}
