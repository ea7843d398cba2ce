//! Requests and responses for text-completion APIs.

pub mod openrouter;

/// A request to a text-completion API.
///
/// This trait follows a "builder" pattern where elements of the request
/// are built up over time:
///
/// ```
/// use twinsight::ai::client::APIRequest;
/// use twinsight::ai::client::openrouter::CompletionRequest;
///
/// let request = CompletionRequest::default()
///     .model("deepseek/deepseek-r1-distill-qwen-7b")
///     .prompt("Write a haiku about Rust.")
///     .max_tokens(64)
///     .temperature(0.2);
/// ```
///
/// It is often useful for your concrete implementation to also implement [`Default`]
/// to return an instance with default values already set, although this is not
/// required.
pub trait APIRequest {
    /// Sets the model used by the API request and returns a new request.
    ///
    /// Model identifiers are specific to each service.
    fn model(self, model: impl Into<String>) -> Self;

    /// Sets the text the model should continue and returns a new request.
    fn prompt(self, prompt: impl Into<String>) -> Self;

    /// Caps the number of tokens generated and returns a new request.
    fn max_tokens(self, max_tokens: u32) -> Self;

    /// Sets the sampling temperature and returns a new request.
    ///
    /// Lower values make output more deterministic.
    fn temperature(self, temperature: f32) -> Self;
}

/// A response from a text-completion API.
pub trait APIResponse {
    /// Text of the first completion choice, if the response has one.
    fn text(&self) -> Option<&str>;
}
