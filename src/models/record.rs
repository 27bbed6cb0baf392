use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_NORMAL_OUTCOME: &str = "In-Transit Update";
pub const UNKNOWN_OUTCOME: &str = "Unknown";
pub const DEFAULT_DELAY_REASON: &str = "None";
pub const DEFAULT_UNLOADING_STATUS: &str = "N/A";
pub const EMERGENCY_OUTCOME: &str = "Emergency Escalation";
pub const DEFAULT_ESCALATION_STATUS: &str = "Connected to Human Dispatcher";

/// Category of a completed call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    /// Routine check-in
    Normal,
    /// Accident, breakdown, medical or other escalation
    Emergency,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Normal => "normal",
            CallType::Emergency => "emergency",
        }
    }
}

/// Where the driver is in the delivery
///
/// Known labels round-trip through their exact names. Any other label
/// supplied by the analysis provider is kept as `Reported`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DriverStatus {
    Driving,
    Delayed,
    Arrived,
    Unloading,
    Unknown,
    Reported(String),
}

impl DriverStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DriverStatus::Driving => "Driving",
            DriverStatus::Delayed => "Delayed",
            DriverStatus::Arrived => "Arrived",
            DriverStatus::Unloading => "Unloading",
            DriverStatus::Unknown => "Unknown",
            DriverStatus::Reported(label) => label,
        }
    }

    /// Outcome label used when the provider did not name one
    pub fn call_outcome(&self) -> &'static str {
        match self {
            DriverStatus::Arrived => "Arrival Confirmation",
            DriverStatus::Unloading => "Unloading Update",
            DriverStatus::Delayed => "Delayed Update",
            _ => DEFAULT_NORMAL_OUTCOME,
        }
    }
}

impl From<String> for DriverStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Driving" => DriverStatus::Driving,
            "Delayed" => DriverStatus::Delayed,
            "Arrived" => DriverStatus::Arrived,
            "Unloading" => DriverStatus::Unloading,
            "Unknown" => DriverStatus::Unknown,
            _ => DriverStatus::Reported(label),
        }
    }
}

impl From<DriverStatus> for String {
    fn from(status: DriverStatus) -> Self {
        match status {
            DriverStatus::Reported(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Kind of emergency reported on the call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmergencyType {
    Accident,
    Breakdown,
    Medical,
    Other,
    Reported(String),
}

impl EmergencyType {
    pub fn as_str(&self) -> &str {
        match self {
            EmergencyType::Accident => "Accident",
            EmergencyType::Breakdown => "Breakdown",
            EmergencyType::Medical => "Medical",
            EmergencyType::Other => "Other",
            EmergencyType::Reported(label) => label,
        }
    }
}

impl From<String> for EmergencyType {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Accident" => EmergencyType::Accident,
            "Breakdown" => EmergencyType::Breakdown,
            "Medical" => EmergencyType::Medical,
            "Other" => EmergencyType::Other,
            _ => EmergencyType::Reported(label),
        }
    }
}

impl From<EmergencyType> for String {
    fn from(kind: EmergencyType) -> Self {
        match kind {
            EmergencyType::Reported(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Summary of a routine check-in call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalRecord {
    pub call_outcome: String,
    pub driver_status: DriverStatus,
    pub current_location: Option<String>,
    pub eta: Option<String>,
    pub delay_reason: String,
    pub unloading_status: String,
    pub pod_reminder_acknowledged: bool,
}

impl Default for NormalRecord {
    /// The record produced when nothing at all is known about the call
    fn default() -> Self {
        Self {
            call_outcome: UNKNOWN_OUTCOME.to_string(),
            driver_status: DriverStatus::Unknown,
            current_location: None,
            eta: None,
            delay_reason: DEFAULT_DELAY_REASON.to_string(),
            unloading_status: DEFAULT_UNLOADING_STATUS.to_string(),
            pod_reminder_acknowledged: false,
        }
    }
}

/// Summary of an emergency escalation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyRecord {
    pub call_outcome: String,
    pub emergency_type: EmergencyType,
    pub safety_status: Option<String>,
    pub injury_status: Option<String>,
    pub emergency_location: Option<String>,
    /// Tri-state: `None` when the call never mentioned the load
    pub load_secure: Option<bool>,
    pub escalation_status: String,
}

impl Default for EmergencyRecord {
    fn default() -> Self {
        Self {
            call_outcome: EMERGENCY_OUTCOME.to_string(),
            emergency_type: EmergencyType::Other,
            safety_status: None,
            injury_status: None,
            emergency_location: None,
            load_secure: None,
            escalation_status: DEFAULT_ESCALATION_STATUS.to_string(),
        }
    }
}

/// Structured outcome of one call, discriminated by `call_type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call_type", rename_all = "snake_case")]
pub enum CallOutcomeRecord {
    Normal(NormalRecord),
    Emergency(EmergencyRecord),
}

impl CallOutcomeRecord {
    pub fn call_type(&self) -> CallType {
        match self {
            CallOutcomeRecord::Normal(_) => CallType::Normal,
            CallOutcomeRecord::Emergency(_) => CallType::Emergency,
        }
    }

    pub fn call_outcome(&self) -> &str {
        match self {
            CallOutcomeRecord::Normal(record) => &record.call_outcome,
            CallOutcomeRecord::Emergency(record) => &record.call_outcome,
        }
    }

    /// Flat key/value view with every field of the variant present
    ///
    /// Unresolved optional fields appear as `null`.
    pub fn to_flat_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("call_type".into(), self.call_type().as_str().into());

        match self {
            CallOutcomeRecord::Normal(record) => {
                map.insert("call_outcome".into(), record.call_outcome.clone().into());
                map.insert("driver_status".into(), record.driver_status.as_str().into());
                map.insert(
                    "current_location".into(),
                    optional(record.current_location.as_deref()),
                );
                map.insert("eta".into(), optional(record.eta.as_deref()));
                map.insert("delay_reason".into(), record.delay_reason.clone().into());
                map.insert("unloading_status".into(), record.unloading_status.clone().into());
                map.insert(
                    "pod_reminder_acknowledged".into(),
                    record.pod_reminder_acknowledged.into(),
                );
            }
            CallOutcomeRecord::Emergency(record) => {
                map.insert("call_outcome".into(), record.call_outcome.clone().into());
                map.insert("emergency_type".into(), record.emergency_type.as_str().into());
                map.insert("safety_status".into(), optional(record.safety_status.as_deref()));
                map.insert("injury_status".into(), optional(record.injury_status.as_deref()));
                map.insert(
                    "emergency_location".into(),
                    optional(record.emergency_location.as_deref()),
                );
                map.insert(
                    "load_secure".into(),
                    record.load_secure.map_or(Value::Null, Value::Bool),
                );
                map.insert("escalation_status".into(), record.escalation_status.clone().into());
            }
        }

        map
    }
}

fn optional(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::String(v.to_string()))
}
