// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! twinsight is a command-line tool that reads a Twitter user's five most
//! recent tweets and asks a language model for three specific, actionable
//! insights about them.
//!
//! # Examples
//!
//! Start an interactive session, then type handles (with or without `@`)
//! at the prompt. Type `quit`, `exit`, or `q`, or press Ctrl-C, to stop.
//!
//! ```bash
//! twinsight
//! ```
//!
//! Show debugging output, such as every HTTP request made:
//!
//! ```bash
//! twinsight -vv
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! twinsight --help
//! ```
//!
//! # API Setup
//!
//! twinsight needs two credentials, read from the environment or from a
//! `.env` file in the current directory:
//!
//! 1. `TWITTER_BEARER_TOKEN`: a Twitter API v2 bearer token. The token must
//!    come from a Twitter Developer App that is attached to a Project, or
//!    every request will be refused.
//! 2. `OPENROUTER_API_KEY`: an [OpenRouter] API key.
//!
//! Optionally, `OPENROUTER_MODEL` selects the completion model; it defaults
//! to [`DEFAULT_MODEL`](conf::DEFAULT_MODEL).
//!
//! ```bash
//! $ export TWITTER_BEARER_TOKEN='copied bearer token'
//! $ export OPENROUTER_API_KEY='copied api key'
//! ```
//!
//! **You are solely responsible for the cost of your use of both APIs!**
//!
//! # License
//!
//! twinsight is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [OpenRouter]: https://openrouter.ai/

pub mod ai;
pub mod auth;
pub mod backoff;
pub mod cli;
pub mod clock;
pub mod conf;
pub mod http;
pub mod insight;
pub mod twitter;
pub mod view;

#[cfg(test)]
mod test_utils;
