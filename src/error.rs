use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid webhook JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("ignoring webhook event: {}", .0.as_deref().unwrap_or("<none>"))]
    IgnoredEvent(Option<String>),
}
