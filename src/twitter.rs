//! Twitter API clients and services for communicating with Twitter over HTTP.

pub mod client;
pub mod service;
pub mod thing;

pub use client::{Feed, FeedFetcher, FetchError, FetchResult};
