use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::WebhookError;
use crate::extract::Extractor;
use crate::models::WebhookEvent;

use super::{COMPLETED_STATUS, CompletionMetadata, CompletionUpdate};

/// Turn a `call_ended` webhook event into the completion update for its call
///
/// Other event types are rejected with `WebhookError::IgnoredEvent`. The
/// caller owns persisting the update and matching it to a stored call when
/// only the provider identifier is known.
pub fn complete_call(
    event: &WebhookEvent,
    extractor: &Extractor,
    ended_at: DateTime<Utc>,
) -> Result<CompletionUpdate, WebhookError> {
    if !event.is_call_ended() {
        return Err(WebhookError::IgnoredEvent(event.event.clone()));
    }

    let call = &event.call;
    let structured_data = extractor.extract_call(&call.to_raw_input());

    info!(
        "Call ended: retell_call_id={:?}, call_id={:?}, call_type={}",
        call.call_id,
        call.internal_call_id(),
        structured_data.call_type().as_str()
    );

    Ok(CompletionUpdate {
        call_id: call.internal_call_id().map(str::to_string),
        retell_call_id: call.call_id.clone(),
        status: COMPLETED_STATUS.to_string(),
        ended_at,
        metadata: CompletionMetadata {
            transcript: call.transcript_text().to_string(),
            transcript_object: call.transcript_object.clone(),
            call_analysis: call.call_analysis.clone(),
            structured_data,
        },
    })
}
