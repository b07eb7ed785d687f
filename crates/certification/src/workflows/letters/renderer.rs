use super::payload::LetterPayload;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Letter body used when no template file is configured.
pub const DEFAULT_TEMPLATE: &str = "Certification Results\n\
\n\
To: «FullName»\n\
Department: «Department»\n\
Phone: «Phone»\n\
Email: «Email»\n\
Final score: «FinalScore»\n\
\n\
«BodyText»\n\
\n\
Training and Certification Team\n";

const PLACEHOLDERS: [&str; 6] = [
    "«FullName»",
    "«Department»",
    "«Phone»",
    "«Email»",
    "«FinalScore»",
    "«BodyText»",
];

/// Failure while producing a single letter.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unable to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to serialize letter payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl RenderError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Failure while loading a letter template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("unable to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template {} contains none of the letter placeholders", .path.display())]
    NoPlaceholders { path: PathBuf },
}

/// Seam between the roster pipeline and whatever produces the documents.
pub trait LetterRenderer {
    /// Called once before the first letter is rendered.
    fn prepare(&self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Writes one letter and returns where it was stored.
    fn render(&self, payload: &LetterPayload) -> Result<PathBuf, RenderError>;
}

/// Folder receiving one document per eligible employee.
#[derive(Debug, Clone)]
pub struct OutputFolder {
    root: PathBuf,
}

impl OutputFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ensure(&self) -> Result<(), RenderError> {
        fs::create_dir_all(&self.root).map_err(|err| RenderError::io(&self.root, err))
    }

    pub fn document_path(&self, document_name: &str, extension: &str) -> PathBuf {
        self.root
            .join(format!("{}_Certification.{extension}", file_stem(document_name)))
    }

    /// Replaces `path` with `contents`, staging the bytes in a temporary file
    /// next to it first. An existing letter is only touched once the new one
    /// is fully written.
    fn write_document(&self, path: &Path, contents: &[u8]) -> Result<(), RenderError> {
        let staging = path.with_extension("tmp");

        if let Err(err) = fs::write(&staging, contents) {
            discard(&staging);
            return Err(RenderError::io(&staging, err));
        }

        if let Err(err) = replace(&staging, path) {
            discard(&staging);
            return Err(RenderError::io(path, err));
        }

        Ok(())
    }
}

// Platforms that refuse to rename over an existing file get the old letter
// removed first.
fn replace(staging: &Path, path: &Path) -> io::Result<()> {
    match fs::rename(staging, path) {
        Ok(()) => Ok(()),
        Err(_) if path.is_file() => {
            fs::remove_file(path)?;
            fs::rename(staging, path)
        }
        Err(err) => Err(err),
    }
}

fn discard(staging: &Path) {
    if staging.exists() {
        if let Err(err) = fs::remove_file(staging) {
            warn!(path = %staging.display(), error = %err, "could not remove staging file");
        }
    }
}

/// Keeps names usable as file names on every platform.
pub fn file_stem(full_name: &str) -> String {
    let stem: String = full_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.trim_matches(|c| c == '.' || c == ' ').is_empty() {
        "Unnamed".to_string()
    } else {
        stem
    }
}

/// Hands out document names that are unique within one run, so employees
/// sharing a name do not overwrite each other's letters. Later claims get a
/// numeric suffix (`John Doe_2`). Comparison ignores case.
#[derive(Debug, Default)]
pub struct DocumentNames {
    claimed: HashSet<String>,
}

impl DocumentNames {
    pub fn claim(&mut self, full_name: &str) -> String {
        let base = file_stem(full_name);
        let mut candidate = base.clone();
        let mut counter = 1;
        while !self.claimed.insert(candidate.to_lowercase()) {
            counter += 1;
            candidate = format!("{base}_{counter}");
        }
        candidate
    }
}

/// Fills `«Placeholder»` fields of a plain-text template.
#[derive(Debug, Clone)]
pub struct TemplateLetterRenderer {
    template: String,
    output: OutputFolder,
}

impl TemplateLetterRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_template(output_dir, DEFAULT_TEMPLATE)
    }

    pub fn with_template(output_dir: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            output: OutputFolder::new(output_dir),
        }
    }

    pub fn from_template_file(
        output_dir: impl Into<PathBuf>,
        template_path: impl AsRef<Path>,
    ) -> Result<Self, TemplateError> {
        let path = template_path.as_ref();
        let template = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if !PLACEHOLDERS
            .iter()
            .any(|placeholder| template.contains(placeholder))
        {
            return Err(TemplateError::NoPlaceholders {
                path: path.to_path_buf(),
            });
        }

        Ok(Self::with_template(output_dir, template))
    }

    pub fn fill(&self, payload: &LetterPayload) -> String {
        self.template
            .replace("«FullName»", &payload.full_name)
            .replace("«Department»", &payload.department)
            .replace("«Phone»", &payload.phone)
            .replace("«Email»", &payload.email)
            .replace("«FinalScore»", &payload.final_score)
            .replace("«BodyText»", &payload.body)
    }
}

impl LetterRenderer for TemplateLetterRenderer {
    fn prepare(&self) -> Result<(), RenderError> {
        self.output.ensure()
    }

    fn render(&self, payload: &LetterPayload) -> Result<PathBuf, RenderError> {
        let path = self.output.document_path(&payload.document_name, "txt");
        let letter = self.fill(payload);
        self.output.write_document(&path, letter.as_bytes())?;
        debug!(path = %path.display(), "letter written");
        Ok(path)
    }
}

/// Writes the raw payload as JSON for downstream document tooling.
#[derive(Debug, Clone)]
pub struct JsonLetterRenderer {
    output: OutputFolder,
}

impl JsonLetterRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output: OutputFolder::new(output_dir),
        }
    }
}

impl LetterRenderer for JsonLetterRenderer {
    fn prepare(&self) -> Result<(), RenderError> {
        self.output.ensure()
    }

    fn render(&self, payload: &LetterPayload) -> Result<PathBuf, RenderError> {
        let path = self.output.document_path(&payload.document_name, "json");
        let body = serde_json::to_vec_pretty(payload)?;
        self.output.write_document(&path, &body)?;
        debug!(path = %path.display(), "letter payload written");
        Ok(path)
    }
}

impl<T: LetterRenderer + ?Sized> LetterRenderer for Box<T> {
    fn prepare(&self) -> Result<(), RenderError> {
        (**self).prepare()
    }

    fn render(&self, payload: &LetterPayload) -> Result<PathBuf, RenderError> {
        (**self).render(payload)
    }
}
