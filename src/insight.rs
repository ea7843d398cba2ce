//! AI-generated insights about a user's tweets.

use crate::ai::client::openrouter::{COMPLETIONS_URI, CompletionRequest, CompletionResponse};
use crate::ai::client::{APIRequest, APIResponse};
use crate::ai::service::{APIService, OpenRouterService};
use crate::auth::Auth;
use crate::backoff::Backoff;
use crate::clock::{Sleeper, TokioSleeper};
use crate::conf::Settings;
use crate::http::HTTPError;
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Number of insights the model is asked for.
pub const INSIGHT_COUNT: usize = 3;

const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.7;

static NUMBERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s").expect("invalid numbered item regex"));

/// Reasons insights could not be generated.
///
/// The `Display` text of each variant is suitable for showing directly to
/// the user.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// There was nothing to analyze.
    #[error("No tweets available for analysis.")]
    NoTweets,

    /// The service kept throttling requests until retries ran out.
    #[error("AI service is currently busy. Please try again in a few minutes.")]
    Busy,

    /// Requests kept timing out until retries ran out.
    #[error("Request timed out. Please try again.")]
    TimedOut,

    /// Requests kept failing to connect until retries ran out.
    #[error("Error connecting to AI service: {0}")]
    Connection(String),

    /// The service answered with an unexpected status. Never retried.
    #[error("Error generating insights: {status} - {body}")]
    Status { status: u16, body: String },

    /// Anything else, such as an unreadable response.
    #[error("Error generating insights: {0}")]
    Other(String),
}

impl GenerationError {
    fn from_http(error: HTTPError) -> Self {
        match error {
            HTTPError::RateLimited { .. } => GenerationError::Busy,
            HTTPError::Timeout => GenerationError::TimedOut,
            HTTPError::Connection(message) => GenerationError::Connection(message),
            HTTPError::Http { status, body } => GenerationError::Status {
                status: status.as_u16(),
                body,
            },
            err => GenerationError::Other(err.to_string()),
        }
    }
}

/// Builds the prompt asking for [`INSIGHT_COUNT`] insights about `tweets`.
///
/// `count` is the number of tweets reported to the model; it is normally
/// `tweets.len()`.
///
/// # Examples
///
/// ```
/// use twinsight::insight::prompt;
///
/// let tweets = vec![String::from("Great day!")];
/// let prompt = prompt(&tweets, tweets.len());
/// assert!(prompt.starts_with("Analyze the following 1 tweets"));
/// assert!(prompt.contains("Tweet 1: Great day!"));
/// ```
pub fn prompt(tweets: &[String], count: usize) -> String {
    const TEMPLATE: &str = include_str!("insight_prompt.txt");
    let tweets = tweets
        .iter()
        .enumerate()
        .map(|(i, tweet)| format!("Tweet {}: {tweet}", i + 1))
        .join("\n");
    // Tweets go in last so that braces inside them are never substituted.
    TEMPLATE
        .trim_end()
        .replace("{count}", &count.to_string())
        .replace("{tweets}", &tweets)
}

/// Number of lines in `text` that start a numbered list item.
pub fn numbered_items(text: &str) -> usize {
    NUMBERED_ITEM_RE.find_iter(text).count()
}

/// Generates insights about tweets using a hosted language model.
#[derive(Debug)]
pub struct InsightGenerator<S: APIService = OpenRouterService, Z: Sleeper = TokioSleeper> {
    service: S,
    auth: Auth,
    model: String,
    backoff: Backoff,
    sleeper: Z,
}

impl InsightGenerator {
    /// Creates a generator that talks to OpenRouter with the key and
    /// model in `settings`.
    pub fn new(settings: &Settings) -> Self {
        Self::with_parts(
            OpenRouterService::default(),
            settings.openrouter_auth().clone(),
            settings.model(),
            TokioSleeper,
        )
    }
}

impl<S: APIService, Z: Sleeper> InsightGenerator<S, Z> {
    /// Creates a generator from its collaborators.
    pub fn with_parts(service: S, auth: Auth, model: impl Into<String>, sleeper: Z) -> Self {
        let model = model.into();
        Self {
            service,
            auth,
            model,
            backoff: Backoff::default(),
            sleeper,
        }
    }

    /// Sets the retry policy.
    pub fn backoff(self, backoff: Backoff) -> Self {
        Self { backoff, ..self }
    }

    /// The request that [`generate`](Self::generate) sends for `tweets`.
    pub fn request(&self, tweets: &[String], count: usize) -> CompletionRequest {
        CompletionRequest::default()
            .model(&self.model)
            .prompt(prompt(tweets, count))
            .max_tokens(MAX_TOKENS)
            .temperature(TEMPERATURE)
    }

    /// Asks the model for three insights about `tweets`.
    ///
    /// Throttled, timed-out, and failed connections are retried with
    /// exponential backoff; when retries run out, the last failure is
    /// returned as a [`GenerationError`]. Any other unsuccessful status
    /// fails immediately.
    ///
    /// The model's output is returned trimmed but otherwise as-is. Nothing
    /// checks that it really contains three insights.
    pub async fn generate(&self, tweets: &[String], count: usize) -> Result<String, GenerationError> {
        if tweets.is_empty() {
            return Err(GenerationError::NoTweets);
        }

        let request = self.request(tweets, count);
        let mut attempt = 0;
        loop {
            log::debug!("Requesting insights from {} (attempt {})", self.model, attempt + 1);
            match self.service.post(COMPLETIONS_URI, &self.auth, &request).await {
                Ok(body) => return self.parse(&body),
                Err(err) if err.is_transient() => match self.backoff.delay(attempt) {
                    Some(delay) => {
                        log::warn!("{err}. Retrying in {} seconds...", delay.as_secs_f64());
                        self.sleeper.sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        log::warn!("Giving up after {} attempts: {err}", attempt + 1);
                        return Err(GenerationError::from_http(err));
                    }
                },
                Err(err) => return Err(GenerationError::from_http(err)),
            }
        }
    }

    fn parse(&self, body: &str) -> Result<String, GenerationError> {
        let resp = CompletionResponse::parse(body)
            .map_err(|err| GenerationError::Other(err.to_string()))?;
        let Some(text) = resp.text() else {
            let message = resp
                .error_message()
                .unwrap_or("response contained no completions");
            return Err(GenerationError::Other(message.to_string()));
        };

        let insights = text.trim().to_string();
        let items = numbered_items(&insights);
        if items != INSIGHT_COUNT {
            log::warn!("Expected {INSIGHT_COUNT} numbered insights but the model produced {items}");
        }
        Ok(insights)
    }
}
