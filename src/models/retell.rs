use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RawCallInput, StructuredAnalysis};

/// Event name the provider sends once a call has finished
pub const CALL_ENDED_EVENT: &str = "call_ended";

/// Root webhook payload from Retell
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookEvent {
    /// Event type, e.g. "call_started" or "call_ended"
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub call: RetellCall,
}

/// The call object carried by a webhook event
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RetellCall {
    /// Provider-side call identifier
    #[serde(default)]
    pub call_id: Option<String>,
    /// Plain-text transcript
    #[serde(default)]
    pub transcript: Option<String>,
    /// Per-utterance transcript, carried through untouched
    #[serde(default)]
    pub transcript_object: Value,
    /// Provider post-call analysis
    #[serde(default)]
    pub call_analysis: Value,
    /// Metadata we attached when the call was created
    #[serde(default)]
    pub metadata: Value,
}

impl WebhookEvent {
    pub fn is_call_ended(&self) -> bool {
        self.event.as_deref() == Some(CALL_ENDED_EVENT)
    }
}

impl RetellCall {
    /// Our own call identifier, echoed back through the call metadata
    pub fn internal_call_id(&self) -> Option<&str> {
        self.metadata
            .get("call_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn transcript_text(&self) -> &str {
        self.transcript.as_deref().unwrap_or("")
    }

    /// Build the extractor input for this call
    pub fn to_raw_input(&self) -> RawCallInput {
        RawCallInput::new(
            self.transcript_text(),
            StructuredAnalysis::from_value(self.call_analysis.clone()),
        )
    }
}
