use tracing::debug;

use crate::models::{
    DEFAULT_DELAY_REASON, DEFAULT_UNLOADING_STATUS, DriverStatus, NormalRecord,
    StructuredAnalysis, UNKNOWN_OUTCOME,
};

use super::{CallText, ExtractorConfig, delay_reason, extract_eta, extract_location, first_match};

/// Partially resolved check-in fields, `None` meaning "not found here"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalFields {
    pub call_outcome: Option<String>,
    pub driver_status: Option<DriverStatus>,
    pub current_location: Option<String>,
    pub eta: Option<String>,
    pub delay_reason: Option<String>,
    pub unloading_status: Option<String>,
    pub pod_reminder_acknowledged: Option<bool>,
}

impl NormalFields {
    /// Fields the provider analysis defines
    pub fn from_analysis(analysis: &StructuredAnalysis) -> Self {
        Self {
            call_outcome: analysis.text("call_outcome"),
            driver_status: analysis.text("driver_status").map(DriverStatus::from),
            current_location: analysis.text("current_location"),
            eta: analysis.text("eta"),
            delay_reason: analysis.text("delay_reason"),
            unloading_status: analysis.text("unloading_status"),
            pod_reminder_acknowledged: analysis.flag("pod_reminder_acknowledged"),
        }
    }

    /// Fields recoverable from the transcript alone
    ///
    /// Unloading status and the outcome label are never read from text.
    pub fn from_transcript(text: &CallText<'_>, config: &ExtractorConfig) -> Self {
        if text.is_blank() {
            return Self::default();
        }

        Self {
            call_outcome: None,
            driver_status: first_match(&config.driver_status_rules, &text.lower),
            current_location: extract_location(text.original),
            eta: extract_eta(text.original),
            delay_reason: delay_reason(&text.lower, &config.delay_reasons),
            unloading_status: None,
            pod_reminder_acknowledged: Some(
                config.pod_terms.iter().any(|t| text.lower.contains(t.as_str())),
            ),
        }
    }

    /// Keep every field set here, taking the rest from `fallback`
    pub fn or(self, fallback: Self) -> Self {
        Self {
            call_outcome: self.call_outcome.or(fallback.call_outcome),
            driver_status: self.driver_status.or(fallback.driver_status),
            current_location: self.current_location.or(fallback.current_location),
            eta: self.eta.or(fallback.eta),
            delay_reason: self.delay_reason.or(fallback.delay_reason),
            unloading_status: self.unloading_status.or(fallback.unloading_status),
            pod_reminder_acknowledged: self
                .pod_reminder_acknowledged
                .or(fallback.pod_reminder_acknowledged),
        }
    }

    /// Fill every unresolved field with its default
    ///
    /// Without any evidence about the call the outcome is "Unknown";
    /// otherwise it follows from the driver status.
    pub fn into_record(self, has_evidence: bool) -> NormalRecord {
        let driver_status = self.driver_status.unwrap_or(DriverStatus::Unknown);
        let call_outcome = match self.call_outcome {
            Some(outcome) => outcome,
            None if has_evidence => driver_status.call_outcome().to_string(),
            None => UNKNOWN_OUTCOME.to_string(),
        };

        NormalRecord {
            call_outcome,
            driver_status,
            current_location: self.current_location,
            eta: self.eta,
            delay_reason: self
                .delay_reason
                .unwrap_or_else(|| DEFAULT_DELAY_REASON.to_string()),
            unloading_status: self
                .unloading_status
                .unwrap_or_else(|| DEFAULT_UNLOADING_STATUS.to_string()),
            pod_reminder_acknowledged: self.pod_reminder_acknowledged.unwrap_or(false),
        }
    }
}

/// Resolve a check-in call: analysis first, transcript second, then defaults
pub fn extract_normal(
    text: &CallText<'_>,
    analysis: Option<&StructuredAnalysis>,
    config: &ExtractorConfig,
) -> NormalRecord {
    let structured = analysis.map(NormalFields::from_analysis).unwrap_or_default();
    let heuristic = NormalFields::from_transcript(text, config);
    debug!("Normal fields from analysis: {:?}", structured);

    let has_evidence = analysis.is_some() || !text.is_blank();
    structured.or(heuristic).into_record(has_evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(transcript: &str, analysis: Option<serde_json::Value>) -> NormalRecord {
        let analysis = analysis.and_then(StructuredAnalysis::from_value);
        extract_normal(
            &CallText::new(transcript),
            analysis.as_ref(),
            &ExtractorConfig::default(),
        )
    }

    #[test]
    fn test_driver_status_priority() {
        assert_eq!(run("arrived, unloading now", None).driver_status, DriverStatus::Arrived);
        assert_eq!(run("at the dock unloading", None).driver_status, DriverStatus::Unloading);
        assert_eq!(run("waiting in traffic", None).driver_status, DriverStatus::Delayed);
        assert_eq!(run("driving, on the way", None).driver_status, DriverStatus::Driving);
        assert_eq!(run("hello there", None).driver_status, DriverStatus::Unknown);
    }

    #[test]
    fn test_outcome_follows_status() {
        assert_eq!(run("at the dock", None).call_outcome, "Unloading Update");
        assert_eq!(run("delayed by weather", None).call_outcome, "Delayed Update");
        assert_eq!(run("hello there", None).call_outcome, "In-Transit Update");
        assert_eq!(run("", None).call_outcome, "Unknown");
    }

    #[test]
    fn test_in_transit_check_in() {
        let transcript = "Yeah I'm driving on I-40 near Flagstaff, \
            should be there tomorrow at 6 am. I'll send the POD.";
        let record = run(transcript, None);

        assert_eq!(record.driver_status, DriverStatus::Driving);
        assert_eq!(record.current_location.as_deref(), Some("on I-40"));
        assert_eq!(record.eta.as_deref(), Some("tomorrow at 6 am"));
        assert_eq!(record.delay_reason, "None");
        assert_eq!(record.unloading_status, "N/A");
        assert!(record.pod_reminder_acknowledged);
    }

    #[test]
    fn test_delayed_check_in() {
        let record = run("Running late, weather is bad, maybe 2 hours out", None);

        assert_eq!(record.driver_status, DriverStatus::Unknown);
        assert_eq!(record.delay_reason, "Weather");
        assert_eq!(record.eta.as_deref(), Some("2 hours out"));
        assert!(!record.pod_reminder_acknowledged);
    }

    #[test]
    fn test_analysis_fills_and_transcript_completes() {
        let record = run(
            "Pulling in at door 7 in 10 minutes",
            Some(json!({
                "unloading_status": "Waiting for lumper",
                "pod_reminder_acknowledged": true,
                "delay_reason": ""
            })),
        );

        assert_eq!(record.unloading_status, "Waiting for lumper");
        assert!(record.pod_reminder_acknowledged);
        assert_eq!(record.driver_status, DriverStatus::Unloading);
        assert_eq!(record.call_outcome, "Unloading Update");
        assert_eq!(record.current_location.as_deref(), Some("at door 7"));
        assert_eq!(record.eta.as_deref(), Some("in 10 minutes"));
        assert_eq!(record.delay_reason, "");
    }

    #[test]
    fn test_blank_structured_string_is_kept() {
        let record = run(
            "stuck waiting on weather",
            Some(json!({"delay_reason": "", "current_location": "   "})),
        );
        assert_eq!(record.delay_reason, "");
        assert_eq!(record.current_location.as_deref(), Some("   "));
    }

    #[test]
    fn test_analysis_with_blank_transcript_uses_defaults() {
        let record = run("", Some(json!({"call_summary": "short call"})));

        assert_eq!(record.call_outcome, "In-Transit Update");
        assert_eq!(record.driver_status, DriverStatus::Unknown);
        assert_eq!(record.current_location, None);
        assert!(!record.pod_reminder_acknowledged);
    }

    #[test]
    fn test_analysis_pod_false_overrides_transcript() {
        let record = run(
            "I'll send the proof of delivery",
            Some(json!({"pod_reminder_acknowledged": false})),
        );
        assert!(!record.pod_reminder_acknowledged);
    }

    #[test]
    fn test_structured_outcome_is_verbatim() {
        let record = run(
            "arrived",
            Some(json!({"call_outcome": "Custom Outcome", "driver_status": "at shipper"})),
        );
        assert_eq!(record.call_outcome, "Custom Outcome");
        assert_eq!(record.driver_status, DriverStatus::Reported("at shipper".to_string()));
    }
}
