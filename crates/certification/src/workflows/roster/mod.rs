//! Roster intake: reading the score export, canonicalizing names, removing
//! duplicates, scoring and resolving certification outcomes.

pub mod classification;
pub mod domain;
pub mod normalizer;
mod parser;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use classification::{classify, CertificationOutcome, EXCELLENCE_SCORE, PASSING_SCORE};
pub use domain::{ClassifiedEmployee, EmployeeRecord, ScoredEmployee};
pub use normalizer::{clean, normalize_department, normalize_name, CleanedRoster};
pub use parser::{RosterLoad, ScoreColumn, SkipReason, SkippedRow};
pub use scoring::{final_score, score};

use std::io::Read;
use std::path::Path;
use tracing::error;

/// Reads roster exports in the `FirstName,LastName,Department,Theoretical,Practical`
/// layout. Loading is best effort: bad lines are skipped and an unreadable
/// source yields an empty roster instead of an error.
pub struct RosterLoader;

impl RosterLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> RosterLoad {
        let path = path.as_ref();
        match std::fs::File::open(path) {
            Ok(file) => Self::from_reader(file),
            Err(err) => {
                error!(path = %path.display(), error = %err, "unable to open roster export");
                RosterLoad::unreadable(format!("failed to open {}: {err}", path.display()))
            }
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> RosterLoad {
        parser::parse_records(reader)
    }
}

/// Scores and classifies a cleaned roster, keeping its order.
pub fn evaluate<I>(records: I) -> Vec<ClassifiedEmployee>
where
    I: IntoIterator<Item = EmployeeRecord>,
{
    records
        .into_iter()
        .map(|record| classify(score(record)))
        .collect()
}
