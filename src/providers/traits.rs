use async_trait::async_trait;

/// A chat-completion backend.
///
/// Implementations return the completion's text content. A completion with no
/// content is reported as `Ok(String::new())` rather than an error, so callers
/// can tell "the model said nothing" apart from "the call failed".
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send `message` as a single user-role message.
    async fn chat(&self, message: &str, model: &str, temperature: f64) -> anyhow::Result<String>;

    /// Human-readable provider name for logs.
    fn name(&self) -> &str;
}
