use tracing::debug;

use crate::models::{
    DEFAULT_ESCALATION_STATUS, EMERGENCY_OUTCOME, EmergencyRecord, EmergencyType,
    StructuredAnalysis,
};

use super::{
    CallText, ExtractorConfig, extract_location, first_match, injury_status, load_secure,
    safety_status,
};

/// Partially resolved emergency fields, `None` meaning "not found here"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmergencyFields {
    pub call_outcome: Option<String>,
    pub emergency_type: Option<EmergencyType>,
    pub safety_status: Option<String>,
    pub injury_status: Option<String>,
    pub emergency_location: Option<String>,
    pub load_secure: Option<bool>,
    pub escalation_status: Option<String>,
}

impl EmergencyFields {
    /// Fields the provider analysis defines
    ///
    /// `injury` is accepted when `injury_status` is absent.
    pub fn from_analysis(analysis: &StructuredAnalysis) -> Self {
        Self {
            call_outcome: analysis.text("call_outcome"),
            emergency_type: analysis.text("emergency_type").map(EmergencyType::from),
            safety_status: analysis.text("safety_status"),
            injury_status: analysis
                .text("injury_status")
                .or_else(|| analysis.text("injury")),
            emergency_location: analysis.text("emergency_location"),
            load_secure: analysis.flag("load_secure"),
            escalation_status: analysis.text("escalation_status"),
        }
    }

    /// Fields recoverable from the transcript alone
    pub fn from_transcript(text: &CallText<'_>, config: &ExtractorConfig) -> Self {
        if text.is_blank() {
            return Self::default();
        }

        Self {
            call_outcome: None,
            emergency_type: first_match(&config.emergency_type_rules, &text.lower),
            safety_status: safety_status(&text.lower),
            injury_status: injury_status(&text.lower),
            emergency_location: extract_location(text.original),
            load_secure: load_secure(&text.lower),
            escalation_status: None,
        }
    }

    /// Keep every field set here, taking the rest from `fallback`
    pub fn or(self, fallback: Self) -> Self {
        Self {
            call_outcome: self.call_outcome.or(fallback.call_outcome),
            emergency_type: self.emergency_type.or(fallback.emergency_type),
            safety_status: self.safety_status.or(fallback.safety_status),
            injury_status: self.injury_status.or(fallback.injury_status),
            emergency_location: self.emergency_location.or(fallback.emergency_location),
            load_secure: self.load_secure.or(fallback.load_secure),
            escalation_status: self.escalation_status.or(fallback.escalation_status),
        }
    }

    /// Fill unresolved fields with defaults; `load_secure` stays unknown
    pub fn into_record(self) -> EmergencyRecord {
        EmergencyRecord {
            call_outcome: self
                .call_outcome
                .unwrap_or_else(|| EMERGENCY_OUTCOME.to_string()),
            emergency_type: self.emergency_type.unwrap_or(EmergencyType::Other),
            safety_status: self.safety_status,
            injury_status: self.injury_status,
            emergency_location: self.emergency_location,
            load_secure: self.load_secure,
            escalation_status: self
                .escalation_status
                .unwrap_or_else(|| DEFAULT_ESCALATION_STATUS.to_string()),
        }
    }
}

/// Resolve an emergency call: analysis first, transcript second, then defaults
pub fn extract_emergency(
    text: &CallText<'_>,
    analysis: Option<&StructuredAnalysis>,
    config: &ExtractorConfig,
) -> EmergencyRecord {
    let structured = analysis.map(EmergencyFields::from_analysis).unwrap_or_default();
    let heuristic = EmergencyFields::from_transcript(text, config);
    debug!("Emergency fields from analysis: {:?}", structured);

    structured.or(heuristic).into_record()
}
