use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A complete function call whose arguments are not valid JSON. Fails the
    /// whole render pass.
    #[error("malformed arguments for action `{action}` in message {message_id}: {source}")]
    MalformedArguments {
        message_id: String,
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
