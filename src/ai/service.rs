// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with AI APIs using HTTP.

use crate::ai::client::openrouter::{REFERER, TITLE};
use crate::auth::Auth;
use crate::http::{self, HTTPResult, HTTPService};
use reqwest::{Client, header};
use serde::Serialize;
use std::time::Duration;

/// A general service for making HTTP calls to an AI API.
///
/// While this may appear to be more like a "client", think of it as a
/// proxy for a (possibly remote) API service.
pub trait APIService {
    /// Send a POST request to the `uri` with the JSON object `data` as
    /// the POST request body.
    ///
    /// On HTTP 200 the raw response body is returned. Throttling, timeouts,
    /// connection failures, and other statuses come back as the matching
    /// [`HTTPError`](crate::http::HTTPError).
    fn post<D>(
        &self,
        uri: &str,
        auth: &Auth,
        data: &D,
    ) -> impl Future<Output = HTTPResult<String>> + Send
    where
        D: Serialize + Sync;
}

/// An HTTPS connection to OpenRouter.
///
/// It more or less just wraps a Reqwest client, making it easier to swap
/// out the service for a scripted service when writing tests.
#[derive(Debug)]
pub struct OpenRouterService {
    client: Client,
}

impl HTTPService for OpenRouterService {}

impl Default for OpenRouterService {
    fn default() -> Self {
        Self::new(Self::TIMEOUT)
    }
}

impl OpenRouterService {
    /// How long a completion request may take before it is abandoned.
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a new service whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let client = Self::client_with_timeout(timeout);
        Self { client }
    }
}

impl APIService for OpenRouterService {
    // This is covered by the openrouter_service_https integration test.
    async fn post<D>(&self, uri: &str, auth: &Auth, data: &D) -> HTTPResult<String>
    where
        D: Serialize + Sync,
    {
        log::debug!("POST {uri}");
        let resp = self
            .client
            .post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, auth.bearer())
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(data)
            .send()
            .await?;
        log::debug!("{uri} returned {}", resp.status());
        http::into_body(resp).await
    }
}
