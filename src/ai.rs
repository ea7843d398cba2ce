//! AI services.
//!
//! Insights are produced by a hosted language model reached through
//! [OpenRouter]'s text-completion API. The [`client`] module describes the
//! requests and responses exchanged with it, and the [`service`] module
//! carries them over HTTPS.
//!
//! [OpenRouter]: https://openrouter.ai/

pub mod client;
pub mod service;
