use crate::models::{CallType, StructuredAnalysis};

use super::{CallText, ExtractorConfig};

/// Decide whether a call is a routine check-in or an emergency
///
/// An analysis with at least one non-null value is trusted outright: an
/// explicit `call_type` wins, otherwise any emergency key marks an emergency.
/// Without one, the transcript is scanned for trigger terms. The scan is a
/// plain substring test, so "stuck in traffic" escalates.
pub fn classify(
    text: &CallText<'_>,
    analysis: Option<&StructuredAnalysis>,
    config: &ExtractorConfig,
) -> CallType {
    if let Some(analysis) = analysis.filter(|a| !a.is_empty()) {
        if let Some(call_type) = analysis.call_type() {
            return call_type;
        }
        let has_emergency_key = config.emergency_keys.iter().any(|k| analysis.contains(k));
        return if has_emergency_key {
            CallType::Emergency
        } else {
            CallType::Normal
        };
    }

    if contains_trigger(&text.lower, &config.emergency_triggers) {
        CallType::Emergency
    } else {
        CallType::Normal
    }
}

/// True if any trigger occurs anywhere in the lower-cased text
pub fn contains_trigger(lower: &str, triggers: &[String]) -> bool {
    triggers.iter().any(|t| lower.contains(t.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify_text(transcript: &str, analysis: Option<serde_json::Value>) -> CallType {
        let analysis = analysis.and_then(StructuredAnalysis::from_value);
        classify(
            &CallText::new(transcript),
            analysis.as_ref(),
            &ExtractorConfig::default(),
        )
    }

    #[test]
    fn test_empty_transcript_is_normal() {
        assert_eq!(classify_text("", None), CallType::Normal);
        assert_eq!(classify_text("", Some(json!({}))), CallType::Normal);
    }

    #[test]
    fn test_trigger_terms() {
        assert_eq!(classify_text("Had a BLOWOUT on the left side", None), CallType::Emergency);
        assert_eq!(classify_text("I got pulled over at the scale", None), CallType::Emergency);
        assert_eq!(classify_text("Rolling along, should be there at 5", None), CallType::Normal);
    }

    #[test]
    fn test_substring_match_favours_recall() {
        // "stuck in traffic" and "white" (contains "hit") both escalate
        assert_eq!(classify_text("stuck in traffic", None), CallType::Emergency);
        assert_eq!(classify_text("passing a white barn", None), CallType::Emergency);
    }

    #[test]
    fn test_explicit_call_type_wins() {
        assert_eq!(
            classify_text("there was a crash", Some(json!({"call_type": "normal"}))),
            CallType::Normal
        );
        assert_eq!(
            classify_text("all good", Some(json!({"call_type": "emergency"}))),
            CallType::Emergency
        );
    }

    #[test]
    fn test_emergency_keys_infer_category() {
        assert_eq!(classify_text("", Some(json!({"injury": "none"}))), CallType::Emergency);
        assert_eq!(
            classify_text("", Some(json!({"injury_status": "minor cut"}))),
            CallType::Emergency
        );
        assert_eq!(
            classify_text("", Some(json!({"emergency_type": null}))),
            CallType::Normal
        );
    }

    #[test]
    fn test_all_null_analysis_falls_back_to_triggers() {
        assert_eq!(
            classify_text("huge accident ahead", Some(json!({"call_summary": null}))),
            CallType::Emergency
        );
        assert_eq!(
            classify_text("rolling along", Some(json!({"call_summary": null}))),
            CallType::Normal
        );
    }

    #[test]
    fn test_analysis_without_category_ignores_transcript_triggers() {
        assert_eq!(
            classify_text("huge accident ahead", Some(json!({"eta": "6pm"}))),
            CallType::Normal
        );
    }
}
