pub mod classify;
pub mod emergency;
pub mod normal;
pub mod patterns;

pub use classify::*;
pub use emergency::*;
pub use normal::*;
pub use patterns::*;

use std::sync::LazyLock;

use tracing::{debug, warn};

use crate::models::{
    CallOutcomeRecord, CallType, DriverStatus, EmergencyType, RawCallInput, StructuredAnalysis,
};

/// Environment variable holding extra comma-separated emergency triggers
pub const TRIGGERS_ENV_VAR: &str = "POSTCALL_EMERGENCY_TRIGGERS";

/// A set of terms that, if any is found in the text, yields `value`
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule<T> {
    pub terms: Vec<String>,
    pub value: T,
}

impl<T: Clone> KeywordRule<T> {
    pub fn new(terms: &[&str], value: T) -> Self {
        Self {
            terms: terms.iter().map(|t| t.to_lowercase()).collect(),
            value,
        }
    }

    /// Substring test against already lower-cased text
    pub fn matches(&self, text: &str) -> bool {
        self.terms.iter().any(|t| text.contains(t.as_str()))
    }
}

/// Value of the first rule with a matching term, in list order
pub fn first_match<T: Clone>(rules: &[KeywordRule<T>], text: &str) -> Option<T> {
    rules.iter().find(|r| r.matches(text)).map(|r| r.value.clone())
}

/// Vocabularies driving classification and heuristic extraction
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Terms whose presence anywhere in a transcript marks an emergency
    pub emergency_triggers: Vec<String>,
    /// Analysis keys whose presence marks an emergency
    pub emergency_keys: Vec<String>,
    /// Driver status cascade, highest priority first
    pub driver_status_rules: Vec<KeywordRule<DriverStatus>>,
    /// Emergency type cascade, highest priority first
    pub emergency_type_rules: Vec<KeywordRule<EmergencyType>>,
    /// Delay reasons, highest priority first
    pub delay_reasons: Vec<String>,
    /// Phrases acknowledging the proof-of-delivery reminder
    pub pod_terms: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            emergency_triggers: to_strings(&[
                "accident",
                "crash",
                "collision",
                "hit",
                "blowout",
                "breakdown",
                "hurt",
                "injured",
                "injury",
                "medical",
                "emergency",
                "pulled over",
                "broke down",
                "stuck",
                "fire",
                "wreck",
            ]),
            emergency_keys: to_strings(&["emergency_type", "injury_status", "injury"]),
            driver_status_rules: vec![
                KeywordRule::new(
                    &["arrived", "i'm here", "i am here", "got here"],
                    DriverStatus::Arrived,
                ),
                KeywordRule::new(
                    &["unloading", "at the dock", "door", "backing in"],
                    DriverStatus::Unloading,
                ),
                KeywordRule::new(
                    &["delayed", "stuck", "traffic", "waiting"],
                    DriverStatus::Delayed,
                ),
                KeywordRule::new(
                    &["driving", "on the way", "on route", "in transit", "moving"],
                    DriverStatus::Driving,
                ),
            ],
            emergency_type_rules: vec![
                KeywordRule::new(
                    &["accident", "crash", "collision", "hit"],
                    EmergencyType::Accident,
                ),
                KeywordRule::new(
                    &["blowout", "tire", "broke", "breakdown", "mechanical"],
                    EmergencyType::Breakdown,
                ),
                KeywordRule::new(
                    &["hurt", "injured", "injury", "medical", "sick", "pain"],
                    EmergencyType::Medical,
                ),
            ],
            delay_reasons: to_strings(&[
                "traffic",
                "weather",
                "breakdown",
                "mechanical",
                "inspection",
                "waiting",
            ]),
            pod_terms: to_strings(&["pod", "proof of delivery", "will send", "i'll send"]),
        }
    }
}

impl ExtractorConfig {
    /// Default vocabularies plus any triggers listed in the environment
    pub fn from_env() -> Self {
        let extra = match std::env::var(TRIGGERS_ENV_VAR) {
            Ok(value) => parse_trigger_list(&value),
            Err(std::env::VarError::NotPresent) => Vec::new(),
            Err(err) => {
                warn!("Ignoring {}: {}", TRIGGERS_ENV_VAR, err);
                Vec::new()
            }
        };
        Self::default().with_extra_triggers(extra)
    }

    /// Add emergency triggers, lower-cased and without duplicates
    pub fn with_extra_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for trigger in triggers {
            let trigger = trigger.as_ref().trim().to_lowercase();
            if !trigger.is_empty() && !self.emergency_triggers.contains(&trigger) {
                self.emergency_triggers.push(trigger);
            }
        }
        self
    }
}

/// Split a comma-separated trigger list, lower-casing each entry and
/// dropping blanks
pub fn parse_trigger_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn to_strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

/// Transcript in the two forms the matchers need
#[derive(Debug, Clone)]
pub struct CallText<'a> {
    /// As received, for patterns that report original casing
    pub original: &'a str,
    /// Lower-cased with typographic apostrophes folded to `'`
    pub lower: String,
}

impl<'a> CallText<'a> {
    pub fn new(original: &'a str) -> Self {
        let lower = original.replace('\u{2019}', "'").to_lowercase();
        Self { original, lower }
    }

    pub fn is_blank(&self) -> bool {
        self.original.trim().is_empty()
    }
}

/// Post-call structured data extractor
///
/// Stateless once built; share one instance across threads.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the structured outcome for one call
    pub fn extract_call(&self, input: &RawCallInput) -> CallOutcomeRecord {
        self.extract(&input.transcript, input.structured_analysis.as_ref())
    }

    /// Extract from a transcript and an optional provider analysis
    ///
    /// 1. Classify as normal or emergency
    /// 2. Resolve the category's fields, analysis first, transcript second
    /// 3. Fill everything still unresolved with the record defaults
    pub fn extract(
        &self,
        transcript: &str,
        analysis: Option<&StructuredAnalysis>,
    ) -> CallOutcomeRecord {
        let analysis = analysis.filter(|a| !a.is_empty());
        let text = CallText::new(transcript);

        let call_type = classify(&text, analysis, &self.config);
        debug!(
            "Classified call as {} (analysis: {}, transcript chars: {})",
            call_type.as_str(),
            analysis.is_some(),
            transcript.len()
        );

        match call_type {
            CallType::Normal => {
                CallOutcomeRecord::Normal(extract_normal(&text, analysis, &self.config))
            }
            CallType::Emergency => {
                CallOutcomeRecord::Emergency(extract_emergency(&text, analysis, &self.config))
            }
        }
    }
}

static DEFAULT_EXTRACTOR: LazyLock<Extractor> = LazyLock::new(Extractor::default);

/// Extract with the default vocabularies
pub fn extract(transcript: &str, analysis: Option<&StructuredAnalysis>) -> CallOutcomeRecord {
    DEFAULT_EXTRACTOR.extract(transcript, analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmergencyRecord, NormalRecord};
    use serde_json::json;

    fn analysis(value: serde_json::Value) -> StructuredAnalysis {
        StructuredAnalysis::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_input_gives_default_normal_record() {
        let record = extract("", None);
        assert_eq!(record, CallOutcomeRecord::Normal(NormalRecord::default()));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["call_type"], "normal");
        assert_eq!(json["call_outcome"], "Unknown");
        assert_eq!(json["driver_status"], "Unknown");
        assert!(json["current_location"].is_null());
        assert!(json["eta"].is_null());
        assert_eq!(json["delay_reason"], "None");
        assert_eq!(json["unloading_status"], "N/A");
        assert_eq!(json["pod_reminder_acknowledged"], false);
    }

    #[test]
    fn test_arrival_scenario() {
        let record = extract(
            "Hi this is Dispatch, yes I've arrived and I'm backing into door 12 now",
            None,
        );

        match record {
            CallOutcomeRecord::Normal(r) => {
                assert_eq!(r.driver_status, DriverStatus::Arrived);
                assert_eq!(r.call_outcome, "Arrival Confirmation");
                assert_eq!(r.current_location.as_deref(), Some("into door 12"));
                assert_eq!(r.unloading_status, "N/A");
            }
            other => panic!("expected normal record, got {:?}", other),
        }
    }

    #[test]
    fn test_emergency_scenario() {
        let record = extract(
            "We just had an accident on I-10 near mile marker 45, everyone is safe, \
             no injuries, load looks secure",
            None,
        );

        match record {
            CallOutcomeRecord::Emergency(r) => {
                assert_eq!(r.emergency_type, EmergencyType::Accident);
                assert_eq!(r.safety_status.as_deref(), Some(SAFETY_CONFIRMED));
                assert_eq!(r.injury_status.as_deref(), Some(NO_INJURIES));
                assert_eq!(r.load_secure, Some(true));
                assert_eq!(r.emergency_location.as_deref(), Some("on I-10"));
                assert_eq!(r.call_outcome, "Emergency Escalation");
                assert_eq!(r.escalation_status, "Connected to Human Dispatcher");
            }
            other => panic!("expected emergency record, got {:?}", other),
        }
    }

    #[test]
    fn test_structured_override_scenario() {
        let a = analysis(json!({"emergency_type": "Medical"}));
        let record = extract("everything is fine", Some(&a));

        assert_eq!(
            record,
            CallOutcomeRecord::Emergency(EmergencyRecord {
                emergency_type: EmergencyType::Medical,
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_structured_fields_win_over_transcript() {
        let a = analysis(json!({
            "driver_status": "Driving",
            "eta": "around noon",
            "current_location": "Flagstaff"
        }));
        let record = extract("I've arrived at door 3, eta 4:15 pm", Some(&a));

        match record {
            CallOutcomeRecord::Normal(r) => {
                assert_eq!(r.driver_status, DriverStatus::Driving);
                assert_eq!(r.call_outcome, "In-Transit Update");
                assert_eq!(r.eta.as_deref(), Some("around noon"));
                assert_eq!(r.current_location.as_deref(), Some("Flagstaff"));
            }
            other => panic!("expected normal record, got {:?}", other),
        }
    }

    #[test]
    fn test_every_trigger_classifies_as_emergency() {
        let extractor = Extractor::default();
        for trigger in &extractor.config().emergency_triggers {
            let transcript = format!("Driver said: {} on the road", trigger.to_uppercase());
            let record = extractor.extract(&transcript, None);
            assert_eq!(record.call_type(), CallType::Emergency, "trigger {:?}", trigger);
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let a = analysis(json!({"call_type": "normal", "pod_reminder_acknowledged": "yes"}));
        let transcript = "Stuck in traffic on highway 50, about 2 hours out, will send the POD";

        let first = serde_json::to_string(&extract(transcript, Some(&a))).unwrap();
        let second = serde_json::to_string(&extract(transcript, Some(&a))).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_totality_over_odd_inputs() {
        let inputs = [
            "",
            "   \n\t ",
            "\u{1F69A}\u{1F69A}",
            "load",
            "near",
            "12:",
            "I’m here",
        ];
        for transcript in inputs {
            // call_type plus seven fields, whichever variant was chosen
            let json = serde_json::to_value(extract(transcript, None)).unwrap();
            assert_eq!(json.as_object().unwrap().len(), 8, "input {:?}", transcript);
        }
    }

    #[test]
    fn test_typographic_apostrophe_is_folded() {
        match extract("I\u{2019}m here at the receiver", None) {
            CallOutcomeRecord::Normal(r) => assert_eq!(r.driver_status, DriverStatus::Arrived),
            other => panic!("expected normal record, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_triggers() {
        let config = ExtractorConfig::default().with_extra_triggers(["  Smoke ", "", "fire"]);
        assert_eq!(config.emergency_triggers.iter().filter(|t| *t == "fire").count(), 1);
        assert!(config.emergency_triggers.contains(&"smoke".to_string()));

        let extractor = Extractor::new(config);
        assert_eq!(
            extractor.extract("there is smoke in the cab", None).call_type(),
            CallType::Emergency
        );
        assert_eq!(extract("there is smoke in the cab", None).call_type(), CallType::Normal);
    }

    #[test]
    fn test_trigger_list_parsing() {
        assert_eq!(parse_trigger_list(" Smoke , ,FIRE,,"), vec!["smoke", "fire"]);
        assert!(parse_trigger_list("").is_empty());
        assert!(parse_trigger_list(" , ").is_empty());

        let config =
            ExtractorConfig::default().with_extra_triggers(parse_trigger_list("Tornado,crash"));
        assert_eq!(config.emergency_triggers.iter().filter(|t| *t == "crash").count(), 1);
        assert_eq!(
            Extractor::new(config).extract("a tornado touched down", None).call_type(),
            CallType::Emergency
        );
    }

    #[test]
    fn test_first_match_respects_order() {
        let rules = vec![
            KeywordRule::new(&["door"], "unloading"),
            KeywordRule::new(&["arrived"], "arrived"),
        ];
        assert_eq!(first_match(&rules, "arrived at door 4"), Some("unloading"));
        assert_eq!(first_match(&rules, "nothing"), None);
    }

    #[test]
    fn test_extract_call_uses_input() {
        let input = RawCallInput::new("tire blowout on exit 9", None);
        match Extractor::default().extract_call(&input) {
            CallOutcomeRecord::Emergency(r) => {
                assert_eq!(r.emergency_type, EmergencyType::Breakdown);
                assert_eq!(r.emergency_location.as_deref(), Some("exit 9"));
                assert_eq!(r.load_secure, None);
            }
            other => panic!("expected emergency record, got {:?}", other),
        }
    }
}
