use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::models::CallOutcomeRecord;

/// Status written to a call once the provider reports it has ended
pub const COMPLETED_STATUS: &str = "completed";

/// Update to persist against a call once it has ended
#[derive(Debug, Clone, Serialize)]
pub struct CompletionUpdate {
    /// Our call identifier, when the provider echoed it back
    pub call_id: Option<String>,
    /// Provider call identifier
    pub retell_call_id: Option<String>,
    pub status: String,
    pub ended_at: DateTime<Utc>,
    pub metadata: CompletionMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionMetadata {
    pub transcript: String,
    pub transcript_object: Value,
    pub call_analysis: Value,
    pub structured_data: CallOutcomeRecord,
}

impl CompletionUpdate {
    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// Write any serializable value as pretty JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

/// Human-readable summary of an extracted record
pub struct SummaryReport<'a> {
    record: &'a CallOutcomeRecord,
}

impl<'a> SummaryReport<'a> {
    pub fn new(record: &'a CallOutcomeRecord) -> Self {
        Self { record }
    }

    /// One aligned `label: value` line per field, in record order
    pub fn format(&self) -> String {
        let rows: Vec<(&str, String)> = match self.record {
            CallOutcomeRecord::Normal(r) => vec![
                ("Call type", "normal".to_string()),
                ("Outcome", r.call_outcome.clone()),
                ("Driver status", r.driver_status.as_str().to_string()),
                ("Location", display_optional(r.current_location.as_deref())),
                ("ETA", display_optional(r.eta.as_deref())),
                ("Delay reason", r.delay_reason.clone()),
                ("Unloading", r.unloading_status.clone()),
                ("POD acknowledged", yes_no(r.pod_reminder_acknowledged)),
            ],
            CallOutcomeRecord::Emergency(r) => vec![
                ("Call type", "emergency".to_string()),
                ("Outcome", r.call_outcome.clone()),
                ("Emergency type", r.emergency_type.as_str().to_string()),
                ("Safety", display_optional(r.safety_status.as_deref())),
                ("Injuries", display_optional(r.injury_status.as_deref())),
                ("Location", display_optional(r.emergency_location.as_deref())),
                ("Load secure", r.load_secure.map_or_else(|| "-".to_string(), yes_no)),
                ("Escalation", r.escalation_status.clone()),
            ],
        };

        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let mut output = String::new();
        for (label, value) in rows {
            let label = format!("{}:", label);
            output.push_str(&format!("{:<width$}  {}\n", label, value, width = width + 1));
        }
        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn display_optional(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}
