//! Users and tweets as returned by the Twitter API v2.
//!
//! Every v2 response wraps its payload in a `data` member. When a lookup
//! fails for a reason such as a nonexistent account, the API still answers
//! with HTTP 200 but replaces `data` with an `errors` array, so `data` is
//! optional throughout.

use crate::clock::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// A Twitter account.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct User {
    id: String,
    name: String,
    username: String,
    #[serde(default)]
    protected: bool,
}

impl User {
    /// Parses a response from `/2/users/by/username/:username`.
    ///
    /// Returns `Ok(None)` if the response describes an account that does
    /// not exist.
    pub fn parse(user_data: &str) -> Result<Option<Self>, Error> {
        let resp: Envelope<User> = serde_json::from_str(user_data)?;
        if resp.data.is_none() {
            for problem in &resp.errors {
                log::debug!("User lookup problem: {problem}");
            }
        }
        Ok(resp.data)
    }

    /// Numeric account ID, as a string.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle, without the leading `@`.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// True if the account only shows its tweets to approved followers.
    pub fn is_protected(&self) -> bool {
        self.protected
    }
}

/// A single tweet.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Tweet {
    id: String,
    text: String,
    created_at: Option<DateTime<Utc>>,
    public_metrics: Option<PublicMetrics>,
}

impl Tweet {
    /// Parses a response from `/2/users/:id/tweets` into tweets, newest first.
    ///
    /// An account that has never tweeted produces a response without
    /// `data`, which parses as an empty list.
    pub fn parse_timeline(tweet_data: &str) -> Result<Vec<Self>, Error> {
        let resp: Envelope<Vec<Tweet>> = serde_json::from_str(tweet_data)?;
        Ok(resp.data.unwrap_or_default())
    }

    /// Tweet ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Text of the tweet.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// When the tweet was posted.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Public engagement counters.
    pub fn public_metrics(&self) -> Option<&PublicMetrics> {
        self.public_metrics.as_ref()
    }
}

/// Public engagement counters for a tweet.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PublicMetrics {
    retweet_count: u64,
    reply_count: u64,
    like_count: u64,
    quote_count: u64,
}

impl PublicMetrics {
    pub fn retweet_count(&self) -> u64 {
        self.retweet_count
    }

    pub fn reply_count(&self) -> u64 {
        self.reply_count
    }

    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    pub fn quote_count(&self) -> u64 {
        self.quote_count
    }

    /// Sum of all counters.
    pub fn engagement(&self) -> u64 {
        self.retweet_count + self.reply_count + self.like_count + self.quote_count
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<Problem>,
}

#[derive(Debug, Deserialize)]
struct Problem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.detail)
    }
}

/// An error parsing a Twitter API response.
#[derive(Debug, Error)]
#[error("Could not parse Twitter API response: {0}")]
pub struct Error(#[from] serde_json::Error);
