use crate::workflows::letters::{DocumentNames, LetterPayload, LetterRenderer, RenderError};
use crate::workflows::roster::{
    self, CertificationOutcome, ClassifiedEmployee, RosterLoad, RosterLoader, SkippedRow,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Roster after loading, cleaning, scoring and classification.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Evaluation {
    pub loaded: usize,
    pub skipped: Vec<SkippedRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_error: Option<String>,
    pub duplicates: usize,
    pub employees: Vec<ClassifiedEmployee>,
}

impl Evaluation {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::from_load(RosterLoader::from_path(path))
    }

    pub fn from_load(load: RosterLoad) -> Self {
        let RosterLoad {
            records,
            skipped,
            source_error,
        } = load;
        let loaded = records.len();
        info!(loaded, skipped = skipped.len(), "roster loaded");

        let cleaned = roster::clean(records);
        info!(
            remaining = cleaned.records.len(),
            duplicates = cleaned.duplicates,
            "roster cleaned"
        );

        let employees = roster::evaluate(cleaned.records);

        Self {
            loaded,
            skipped,
            source_error,
            duplicates: cleaned.duplicates,
            employees,
        }
    }

    pub fn outcome_counts(&self) -> BTreeMap<CertificationOutcome, usize> {
        let mut counts: BTreeMap<CertificationOutcome, usize> = CertificationOutcome::ALL
            .into_iter()
            .map(|outcome| (outcome, 0))
            .collect();
        for employee in &self.employees {
            *counts.entry(employee.outcome).or_default() += 1;
        }
        counts
    }
}

/// Letter written for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedLetter {
    pub full_name: String,
    pub path: PathBuf,
}

/// Letter that could not be produced; the rest of the batch still runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterFailure {
    pub full_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub evaluation: Evaluation,
    pub documents: Vec<GeneratedLetter>,
    pub failures: Vec<LetterFailure>,
}

/// Drives load, clean, score, classify and letter rendering for a roster.
pub struct CertificationPipeline<R> {
    renderer: R,
}

impl<R: LetterRenderer> CertificationPipeline<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn run<P: AsRef<Path>>(&self, source: P) -> Result<RunSummary, RenderError> {
        self.run_evaluation(Evaluation::from_path(source))
    }

    /// Only fails when the renderer cannot be prepared; individual letter
    /// failures are collected in the summary.
    pub fn run_evaluation(&self, evaluation: Evaluation) -> Result<RunSummary, RenderError> {
        let mut documents = Vec::new();
        let mut failures = Vec::new();

        let mut names = DocumentNames::default();
        let payloads: Vec<LetterPayload> = evaluation
            .employees
            .iter()
            .filter_map(LetterPayload::for_employee)
            .map(|mut payload| {
                payload.document_name = names.claim(&payload.full_name);
                payload
            })
            .collect();

        if !payloads.is_empty() {
            self.renderer.prepare()?;
        }

        for payload in &payloads {
            match self.renderer.render(payload) {
                Ok(path) => documents.push(GeneratedLetter {
                    full_name: payload.full_name.clone(),
                    path,
                }),
                Err(err) => {
                    warn!(employee = %payload.full_name, error = %err, "letter generation failed");
                    failures.push(LetterFailure {
                        full_name: payload.full_name.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            written = documents.len(),
            failed = failures.len(),
            "letter generation finished"
        );

        Ok(RunSummary {
            evaluation,
            documents,
            failures,
        })
    }
}
