//! Draws viewable objects into a terminal window.

use crate::insight::GenerationError;
use crate::twitter::service::MAX_TWEETS;
use crate::twitter::{Feed, FetchError};
use colored::{ColoredString, Colorize};

/// View renderer options.
#[derive(Debug)]
pub struct ViewOptions {
    width: usize,
    color: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            width: 80,
            color: false,
        }
    }
}

impl ViewOptions {
    /// Incrementally builds a new set of view options.
    ///
    /// # Examples
    ///
    /// ```
    /// use twinsight::view::ViewOptions;
    /// let opts = ViewOptions::build().width(100).color(true).build();
    /// ```
    pub fn build() -> ViewOptionsBuilder {
        ViewOptionsBuilder::default()
    }

    /// Options suited to the current terminal.
    pub fn for_terminal() -> Self {
        use std::io::IsTerminal;
        Self::build()
            .width(textwrap::termwidth())
            .color(std::io::stdout().is_terminal())
            .build()
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// A builder for view options.
///
/// You probably don't want to use this directly; call [`ViewOptions::build()`]
/// and construct it incrementally instead.
#[derive(Debug, Default)]
#[must_use]
pub struct ViewOptionsBuilder {
    width: Option<usize>,
    color: bool,
}

impl ViewOptionsBuilder {
    /// Sets the column at which text is wrapped.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets whether ANSI colors are used.
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Finalizes the [`ViewOptions`].
    pub fn build(self) -> ViewOptions {
        let defaults = ViewOptions::default();
        ViewOptions {
            width: self.width.unwrap_or(defaults.width),
            color: self.color,
        }
    }
}

/// Marks an item that can be converted into a string for display on a terminal.
pub trait Viewable {
    /// Converts the item into a string for display on a terminal.
    fn view(&self, opts: &ViewOptions) -> String;
}

impl Viewable for Feed {
    fn view(&self, opts: &ViewOptions) -> String {
        let n = self.len();
        let s = if n < MAX_TWEETS as usize {
            format!("Found {n} tweets (less than {MAX_TWEETS} available)")
        } else {
            format!("Analyzing last {MAX_TWEETS} tweets")
        };
        opts.paint(&s, |s| s.cyan())
    }
}

impl Viewable for FetchError {
    fn view(&self, opts: &ViewOptions) -> String {
        let message = textwrap::fill(&self.to_string(), opts.width);
        let mut s = opts.paint(&message, |s| s.red());
        if self.is_rate_limited() {
            s += "\n";
            s += &opts.paint(
                "Tip: Wait a few minutes before trying again, or try a different username.",
                |s| s.yellow(),
            );
        }
        s
    }
}

/// The outcome of generating insights for one user, ready for display.
#[derive(Debug)]
pub struct Insights<'a> {
    username: &'a str,
    result: &'a Result<String, GenerationError>,
}

impl<'a> Insights<'a> {
    /// Wraps the insights (or the reason there are none) for `username`.
    pub fn new(username: &'a str, result: &'a Result<String, GenerationError>) -> Self {
        Self { username, result }
    }
}

impl Viewable for Insights<'_> {
    fn view(&self, opts: &ViewOptions) -> String {
        let heading = format!("Insights for @{}:", self.username);
        let rule = "=".repeat(50);
        let body = match self.result {
            Ok(text) => text
                .lines()
                .map(|line| textwrap::fill(line, opts.width))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(err) => opts.paint(&textwrap::fill(&err.to_string(), opts.width), |s| s.red()),
        };
        format!("{}\n{rule}\n{body}\n{rule}", opts.paint(&heading, |s| s.bold()))
    }
}
