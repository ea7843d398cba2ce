// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Twitter API v2.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Twitter API over HTTPS, essentially a specialized HTTPS client
//! specifically for Twitter. They return raw JSON text; parsing happens in
//! [`thing`](crate::twitter::thing).

use crate::auth::Auth;
use crate::http::{self, HTTPResult, HTTPService};
use reqwest::{Client, header};

/// Root of the Twitter API v2.
pub const API_ROOT: &str = "https://api.twitter.com/2";

/// Maximum number of tweets requested per user.
///
/// This also happens to be the smallest page size the timeline endpoint
/// accepts.
pub const MAX_TWEETS: u8 = 5;

/// A service for retrieving information for Twitter users.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Twitter API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Looks up the account with the given `username`, returning the raw
    /// JSON response.
    fn get_user(&self, username: &str) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Retrieves the most recent tweets posted by the account with the
    /// numeric `user_id`, returning the raw JSON response.
    fn get_tweets(&self, user_id: &str) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that contacts the Twitter API directly to retrieve information.
#[derive(Debug)]
pub struct TwitterService {
    client: Client,
    auth: Auth,
}

impl HTTPService for TwitterService {}

impl TwitterService {
    /// Creates a new Twitter service authenticating with the given bearer
    /// token.
    pub fn new(auth: Auth) -> Self {
        let client = Self::client();
        Self { client, auth }
    }

    fn user_uri(&self, username: &str) -> String {
        format!("{API_ROOT}/users/by/username/{username}?user.fields=protected")
    }

    fn tweets_uri(&self, user_id: &str) -> String {
        format!(
            "{API_ROOT}/users/{user_id}/tweets?max_results={MAX_TWEETS}&tweet.fields=created_at,public_metrics"
        )
    }

    async fn get(&self, uri: &str) -> HTTPResult<String> {
        log::debug!("GET {uri}");
        let resp = self
            .client
            .get(uri)
            .header(header::AUTHORIZATION, self.auth.bearer())
            .send()
            .await?;
        log::debug!("{uri} returned {}", resp.status());
        http::into_json_body(resp).await
    }
}

impl Service for TwitterService {
    async fn get_user(&self, username: &str) -> HTTPResult<String> {
        let uri = self.user_uri(username);
        self.get(&uri).await
    }

    async fn get_tweets(&self, user_id: &str) -> HTTPResult<String> {
        let uri = self.tweets_uri(user_id);
        self.get(&uri).await
    }
}
