// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading a user's recent tweets from the Twitter API.

use crate::auth::Auth;
use crate::clock::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::http::HTTPError;
use crate::twitter::service::{MAX_TWEETS, Service, TwitterService};
use crate::twitter::thing::{self, Tweet, User};
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("invalid handle regex"));

/// Strips any leading `@` from a Twitter handle.
///
/// # Examples
///
/// ```
/// use twinsight::twitter::client::clean_handle;
/// assert_eq!(clean_handle("@jack"), "jack");
/// assert_eq!(clean_handle("jack"), "jack");
/// ```
pub fn clean_handle(handle: &str) -> &str {
    handle.trim().trim_start_matches('@')
}

/// A user's most recent tweets, newest first.
#[derive(Debug)]
pub struct Feed {
    user: User,
    tweets: Vec<Tweet>,
}

impl Feed {
    /// The account the tweets belong to.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Text of each tweet, newest first.
    pub fn texts(&self) -> Vec<String> {
        self.tweets.iter().map(|t| t.text().to_string()).collect()
    }

    /// Number of tweets retrieved.
    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    /// True if the user has not tweeted at all.
    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }
}

/// The outcome of fetching a user's tweets.
pub type FetchResult = Result<Feed, FetchError>;

/// Reasons a user's tweets could not be retrieved.
///
/// The `Display` text of each variant is suitable for showing directly to
/// the user.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No account has the requested handle.
    #[error("User '@{0}' not found. Please check the username and try again.")]
    UserNotFound(String),

    /// The account is protected, so its tweets are hidden.
    #[error("Account '@{0}' is private/protected. Cannot access tweets.")]
    AccessDenied(String),

    /// The API quota is exhausted.
    ///
    /// `wait_secs` is the number of seconds until the quota resets, when
    /// the API said so.
    #[error(
        "Twitter API rate limit exceeded. Please wait {} and try again.",
        wait_phrase(.wait_secs)
    )]
    RateLimited { wait_secs: Option<i64> },

    /// The bearer token was rejected.
    #[error(
        "Twitter API authentication failed. The Bearer Token needs to be from a Twitter Developer App attached to a Project. Please check your credentials in the Twitter Developer Portal."
    )]
    Unauthorized,

    /// The app is not allowed to use the endpoint.
    #[error(
        "Twitter API access forbidden. The Bearer Token needs to be from a Twitter Developer App attached to a Project. Please check your Twitter Developer Portal settings."
    )]
    Forbidden,

    /// Anything else that went wrong.
    #[error("Error fetching tweets: {0}")]
    Unknown(String),
}

fn wait_phrase(wait_secs: &Option<i64>) -> String {
    match wait_secs {
        Some(secs) => format!("{secs} seconds"),
        None => String::from("15 minutes"),
    }
}

impl FetchError {
    /// True if the error is the result of exceeding the API quota.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }
}

impl From<thing::Error> for FetchError {
    fn from(error: thing::Error) -> Self {
        FetchError::Unknown(error.to_string())
    }
}

/// Fetches a user's most recent tweets.
#[derive(Debug)]
pub struct FeedFetcher<S: Service, C: Clock = SystemClock, Z: Sleeper = TokioSleeper> {
    service: S,
    clock: C,
    sleeper: Z,
}

impl FeedFetcher<TwitterService> {
    /// Creates a fetcher that talks to the real Twitter API using the
    /// given bearer token.
    pub fn new(auth: Auth) -> Self {
        Self::with_parts(TwitterService::new(auth), SystemClock, TokioSleeper)
    }
}

impl<S: Service, C: Clock, Z: Sleeper> FeedFetcher<S, C, Z> {
    /// Pause taken before every fetch to avoid hammering the API.
    pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(1);

    /// Creates a fetcher from its collaborators.
    ///
    /// `clock` is used to work out how long a rate limit has left to run,
    /// and `sleeper` performs the courtesy pause before each fetch.
    pub fn with_parts(service: S, clock: C, sleeper: Z) -> Self {
        Self {
            service,
            clock,
            sleeper,
        }
    }

    /// Fetches up to five of the most recent tweets for `handle`.
    ///
    /// A leading `@` is ignored. The fetch is attempted exactly once; a
    /// failure is classified into a [`FetchError`] rather than retried.
    pub async fn fetch(&self, handle: &str) -> FetchResult {
        let username = clean_handle(handle);
        if !HANDLE_RE.is_match(username) {
            log::debug!("'{username}' cannot be a Twitter handle");
            return Err(FetchError::UserNotFound(username.to_string()));
        }

        self.sleeper.sleep(Self::DEFAULT_THROTTLE).await;

        let user = match self.service.get_user(username).await {
            Ok(data) => User::parse(&data)?,
            Err(HTTPError::Http { status, .. }) if status == StatusCode::NOT_FOUND => None,
            Err(err) => return Err(self.classify(err)),
        };
        let Some(user) = user else {
            return Err(FetchError::UserNotFound(username.to_string()));
        };
        log::debug!("Resolved @{} to user {}", user.username(), user.id());

        if user.is_protected() {
            return Err(FetchError::AccessDenied(username.to_string()));
        }

        let data = self
            .service
            .get_tweets(user.id())
            .await
            .map_err(|err| self.classify(err))?;
        let mut tweets = Tweet::parse_timeline(&data)?;
        tweets.truncate(MAX_TWEETS as usize);
        log::debug!("Retrieved {} tweets for @{}", tweets.len(), user.username());

        Ok(Feed { user, tweets })
    }

    fn classify(&self, error: HTTPError) -> FetchError {
        match error {
            HTTPError::RateLimited { reset } => {
                let wait_secs = reset
                    .map(|reset| self.clock.seconds_until(reset))
                    .filter(|secs| *secs > 0);
                FetchError::RateLimited { wait_secs }
            }
            HTTPError::Http { status, .. } if status == StatusCode::UNAUTHORIZED => {
                FetchError::Unauthorized
            }
            HTTPError::Http { status, .. } if status == StatusCode::FORBIDDEN => {
                FetchError::Forbidden
            }
            err => FetchError::Unknown(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    mod handles {
        use super::super::*;

        #[test]
        fn it_strips_leading_at_signs() {
            assert_eq!(clean_handle("@@jack"), "jack");
        }

        #[test]
        fn it_strips_surrounding_whitespace() {
            assert_eq!(clean_handle("  @jack "), "jack");
        }

        #[test]
        fn it_leaves_inner_at_signs_alone() {
            assert_eq!(clean_handle("ja@ck"), "ja@ck");
        }
    }

    mod public_user {
        use crate::test_utils::{RecordingSleeper, TestService, fetcher};
        use std::time::Duration;

        #[tokio::test]
        async fn it_fetches_five_tweets() {
            let feed = fetcher(TestService::new("jack")).fetch("jack").await.unwrap();
            assert_eq!(feed.len(), 5);
            assert_eq!(feed.user().username(), "jack");
        }

        #[tokio::test]
        async fn it_accepts_handles_with_an_at_sign() {
            let feed = fetcher(TestService::new("jack")).fetch("@jack").await.unwrap();
            assert_eq!(feed.len(), 5);
        }

        #[tokio::test]
        async fn it_keeps_tweets_newest_first() {
            let feed = fetcher(TestService::new("jack")).fetch("jack").await.unwrap();
            let texts = feed.texts();
            assert_eq!(texts.first().unwrap(), "just setting up my twttr");
            assert_eq!(
                texts.last().unwrap(),
                "Great day for a long walk and zero meetings."
            );
        }

        #[tokio::test]
        async fn it_fetches_fewer_tweets_when_fewer_exist() {
            let feed = fetcher(TestService::new("few")).fetch("few").await.unwrap();
            assert_eq!(feed.texts(), vec!["Launch went well", "Great day!"]);
        }

        #[tokio::test]
        async fn it_succeeds_with_no_tweets() {
            let feed = fetcher(TestService::new("quiet")).fetch("quiet").await.unwrap();
            assert!(feed.is_empty());
        }

        #[tokio::test]
        async fn it_pauses_once_before_fetching() {
            let sleeper = RecordingSleeper::default();
            let fetcher = crate::twitter::FeedFetcher::with_parts(
                TestService::new("jack"),
                crate::test_utils::FrozenClock::default(),
                sleeper.clone(),
            );
            fetcher.fetch("jack").await.unwrap();
            assert_eq!(sleeper.delays(), vec![Duration::from_secs(1)]);
        }
    }

    mod unavailable_user {
        use crate::test_utils::{TestService, fetcher};
        use crate::twitter::FetchError;

        #[tokio::test]
        async fn it_reports_missing_users() {
            let err = fetcher(TestService::new("404"))
                .fetch("doesnotexist")
                .await
                .unwrap_err();
            assert!(matches!(err, FetchError::UserNotFound(ref name) if name == "doesnotexist"));
            assert!(err.to_string().contains("not found"));
        }

        #[tokio::test]
        async fn it_reports_impossible_handles_as_missing() {
            let err = fetcher(TestService::new("jack"))
                .fetch("not a handle")
                .await
                .unwrap_err();
            assert!(err.to_string().contains("not found"));
        }

        #[tokio::test]
        async fn it_reports_protected_users() {
            let err = fetcher(TestService::new("locked"))
                .fetch("@locked")
                .await
                .unwrap_err();
            assert!(matches!(err, FetchError::AccessDenied(_)));
            assert!(err.to_string().contains("private/protected"));
            assert!(err.to_string().contains("'@locked'"));
        }
    }

    mod failures {
        use crate::clock::Clock;
        use crate::http::HTTPError;
        use crate::test_utils::{ErrorService, FrozenClock, RecordingSleeper, fetcher};
        use crate::twitter::{FeedFetcher, FetchError};
        use reqwest::StatusCode;
        use std::time::Duration;

        fn status(status: StatusCode) -> HTTPError {
            HTTPError::Http {
                status,
                body: String::from("{}"),
            }
        }

        #[tokio::test]
        async fn it_reports_the_remaining_wait_when_rate_limited() {
            let reset = FrozenClock::default().now().timestamp() + 300;
            let service = ErrorService::new(move || HTTPError::RateLimited { reset: Some(reset) });
            let err = fetcher(service).fetch("jack").await.unwrap_err();
            assert!(matches!(err, FetchError::RateLimited { wait_secs: Some(300) }));
            assert_eq!(
                err.to_string(),
                "Twitter API rate limit exceeded. Please wait 300 seconds and try again."
            );
            assert!(err.is_rate_limited());
        }

        #[tokio::test]
        async fn it_reports_a_generic_wait_without_a_reset_time() {
            let service = ErrorService::new(|| HTTPError::RateLimited { reset: None });
            let err = fetcher(service).fetch("jack").await.unwrap_err();
            assert_eq!(
                err.to_string(),
                "Twitter API rate limit exceeded. Please wait 15 minutes and try again."
            );
        }

        #[tokio::test]
        async fn it_reports_a_generic_wait_if_the_reset_time_has_passed() {
            let reset = FrozenClock::default().now().timestamp() - 10;
            let service = ErrorService::new(move || HTTPError::RateLimited { reset: Some(reset) });
            let err = fetcher(service).fetch("jack").await.unwrap_err();
            assert!(matches!(err, FetchError::RateLimited { wait_secs: None }));
        }

        #[tokio::test]
        async fn it_reports_authentication_failures() {
            let service = ErrorService::new(|| status(StatusCode::UNAUTHORIZED));
            let err = fetcher(service).fetch("jack").await.unwrap_err();
            assert!(matches!(err, FetchError::Unauthorized));
            assert!(err.to_string().contains("authentication failed"));
        }

        #[tokio::test]
        async fn it_reports_forbidden_access() {
            let service = ErrorService::new(|| status(StatusCode::FORBIDDEN));
            let err = fetcher(service).fetch("jack").await.unwrap_err();
            assert!(matches!(err, FetchError::Forbidden));
            assert!(err.to_string().contains("access forbidden"));
        }

        #[tokio::test]
        async fn it_treats_http_404_as_a_missing_user() {
            let service = ErrorService::new(|| status(StatusCode::NOT_FOUND));
            let err = fetcher(service).fetch("jack").await.unwrap_err();
            assert!(matches!(err, FetchError::UserNotFound(_)));
        }

        #[tokio::test]
        async fn it_wraps_anything_else() {
            let service = ErrorService::new(|| HTTPError::Connection(String::from("dns failure")));
            let err = fetcher(service).fetch("jack").await.unwrap_err();
            assert!(matches!(err, FetchError::Unknown(_)));
            assert_eq!(err.to_string(), "Error fetching tweets: dns failure");
            assert!(!err.is_rate_limited());
        }

        #[tokio::test]
        async fn it_wraps_server_errors() {
            let service = ErrorService::new(|| status(StatusCode::SERVICE_UNAVAILABLE));
            let err = fetcher(service).fetch("jack").await.unwrap_err();
            assert_eq!(
                err.to_string(),
                "Error fetching tweets: 503 Service Unavailable - {}"
            );
        }

        #[tokio::test]
        async fn it_ignores_an_absurd_reset_time() {
            let service = ErrorService::new(|| HTTPError::RateLimited { reset: Some(i64::MIN) });
            let err = fetcher(service).fetch("jack").await.unwrap_err();
            assert!(matches!(err, FetchError::RateLimited { wait_secs: None }));
        }

        async fn attempts_for(error: fn() -> HTTPError) -> (usize, Vec<Duration>) {
            let service = ErrorService::new(error);
            let sleeper = RecordingSleeper::default();
            let fetcher =
                FeedFetcher::with_parts(service.clone(), FrozenClock::default(), sleeper.clone());
            fetcher.fetch("jack").await.unwrap_err();
            (service.calls(), sleeper.delays())
        }

        #[tokio::test]
        async fn it_does_not_retry_when_rate_limited() {
            let (calls, delays) = attempts_for(|| HTTPError::RateLimited { reset: None }).await;
            assert_eq!(calls, 1);
            assert_eq!(delays, vec![Duration::from_secs(1)]);
        }

        #[tokio::test]
        async fn it_does_not_retry_after_a_connection_error() {
            let (calls, delays) =
                attempts_for(|| HTTPError::Connection(String::from("connection reset"))).await;
            assert_eq!(calls, 1);
            assert_eq!(delays, vec![Duration::from_secs(1)]);
        }
    }
}
