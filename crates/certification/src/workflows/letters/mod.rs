//! Certification letters for employees who reached the passing score.

mod payload;
mod renderer;

pub use payload::{body_text, format_score, LetterPayload, NOT_PROVIDED};
pub use renderer::{
    file_stem, DocumentNames, JsonLetterRenderer, LetterRenderer, OutputFolder, RenderError,
    TemplateError, TemplateLetterRenderer, DEFAULT_TEMPLATE,
};
