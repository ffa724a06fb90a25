pub mod json;
pub mod md;

use crate::error::JudgeError;
use crate::types::report::AnalyzeResponse;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
    Summary,
}

pub fn render(response: &AnalyzeResponse, format: OutputFormat) -> Result<String, JudgeError> {
    match format {
        OutputFormat::Json => json::to_json(response).map_err(JudgeError::Json),
        OutputFormat::Md => Ok(md::to_markdown(response)),
        OutputFormat::Summary => Ok(summary_line(response)),
    }
}

pub fn render_batch(
    responses: &[AnalyzeResponse],
    format: OutputFormat,
) -> Result<String, JudgeError> {
    match format {
        OutputFormat::Json => json::to_json_batch(responses).map_err(JudgeError::Json),
        OutputFormat::Md => Ok(responses
            .iter()
            .map(md::to_markdown)
            .collect::<Vec<_>>()
            .join("\n---\n\n")),
        OutputFormat::Summary => Ok(responses
            .iter()
            .map(summary_line)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

pub fn summary_line(response: &AnalyzeResponse) -> String {
    response
        .headline_summary
        .one_sentence_summary
        .clone()
        .unwrap_or_default()
}
