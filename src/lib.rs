pub mod error;
pub mod extract;
pub mod io;
pub mod models;

pub use error::WebhookError;
pub use extract::{Extractor, ExtractorConfig, extract};
pub use io::{
    CompletionUpdate, SummaryReport, complete_call, parse_webhook_file, parse_webhook_json,
    read_call_input,
};
pub use models::{
    CallOutcomeRecord, CallType, DriverStatus, EmergencyRecord, EmergencyType, NormalRecord,
    RawCallInput, StructuredAnalysis, WebhookEvent,
};
