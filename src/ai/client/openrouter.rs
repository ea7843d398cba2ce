//! OpenRouter text-completion API.
//!
//! OpenRouter fronts many hosted models behind one OpenAI-compatible API.
//! twinsight uses its legacy [completions] endpoint, which takes a bare
//! prompt and returns a list of completion choices.
//!
//! # Access
//!
//! You will need an [OpenRouter account](https://openrouter.ai/) and an API
//! key. Store the key under the `$OPENROUTER_API_KEY` environment variable
//! (or in a `.env` file). The model defaults to
//! [`DEFAULT_MODEL`](crate::conf::DEFAULT_MODEL) and can be changed with
//! `$OPENROUTER_MODEL`.
//!
//! **You are solely responsible for the cost of your use of the OpenRouter
//! API.** Many models are free to use; others are billed per token.
//!
//! [completions]: https://openrouter.ai/docs/api-reference/completion

use crate::ai::client::{APIRequest, APIResponse};
use serde::{Deserialize, Serialize};

/// The completions endpoint.
pub const COMPLETIONS_URI: &str = "https://openrouter.ai/api/v1/completions";

/// Sent as `HTTP-Referer` so OpenRouter can attribute requests to the app.
pub const REFERER: &str = "https://github.com/twitter-insight-agent";

/// Sent as `X-Title`, the app name shown in OpenRouter's dashboards.
pub const TITLE: &str = "Twitter Insight Agent";

/// A body for an OpenRouter completion request.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CompletionRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self {
            model: String::from(crate::conf::DEFAULT_MODEL),
            prompt: String::new(),
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

impl APIRequest for CompletionRequest {
    fn model(self, model: impl Into<String>) -> Self {
        let model = model.into();
        Self { model, ..self }
    }

    fn prompt(self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        Self { prompt, ..self }
    }

    fn max_tokens(self, max_tokens: u32) -> Self {
        Self { max_tokens, ..self }
    }

    fn temperature(self, temperature: f32) -> Self {
        Self {
            temperature,
            ..self
        }
    }
}

/// A body of an OpenRouter completion response.
///
/// OpenRouter occasionally reports upstream failures with HTTP 200 and an
/// `error` member instead of `choices`.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,

    error: Option<ResponseError>,
}

impl CompletionResponse {
    /// Parses a completion response from its JSON text.
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// All completion choices, in order.
    pub fn choices(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter()
    }

    /// The error message embedded in the response, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

impl APIResponse for CompletionResponse {
    fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}

/// A single generated completion.
#[derive(Debug, Deserialize)]
pub struct Choice {
    text: String,
    finish_reason: Option<String>,
}

impl Choice {
    /// Generated text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Why generation stopped, e.g. `stop` or `length`.
    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    message: String,
}
