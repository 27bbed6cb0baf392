use std::path::Path;

use anyhow::{Context, Result};

use crate::error::WebhookError;
use crate::models::{RawCallInput, StructuredAnalysis, WebhookEvent};

/// Parse a webhook payload file
pub fn parse_webhook_file(path: &Path) -> Result<WebhookEvent> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok(parse_webhook_json(&content)?)
}

/// Parse a webhook payload string
pub fn parse_webhook_json(json: &str) -> Result<WebhookEvent, WebhookError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a standalone analysis JSON document
///
/// Anything other than a JSON object yields `None`, as for webhook payloads.
pub fn parse_analysis_json(json: &str) -> Result<Option<StructuredAnalysis>> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("Failed to parse analysis JSON")?;
    Ok(StructuredAnalysis::from_value(value))
}

/// Assemble extractor input from a transcript text file and an analysis file
///
/// Both are optional; a missing transcript reads as empty.
pub fn read_call_input(
    transcript_path: Option<&Path>,
    analysis_path: Option<&Path>,
) -> Result<RawCallInput> {
    let transcript = match transcript_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {:?}", path))?,
        None => String::new(),
    };

    let structured_analysis = match analysis_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read analysis: {:?}", path))?;
            parse_analysis_json(&content)?
        }
        None => None,
    };

    Ok(RawCallInput::new(transcript, structured_analysis))
}
