//! Drives the command-line program.

use crate::ai::service::{APIService, OpenRouterService};
use crate::clock::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::conf::Settings;
use crate::insight::InsightGenerator;
use crate::twitter::FeedFetcher;
use crate::twitter::client::clean_handle;
use crate::twitter::service::{Service, TwitterService};
use crate::view::{Insights, ViewOptions, Viewable};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use log::LevelFilter;
use std::io::{self, BufRead, BufReader, Write};
use std::pin::pin;
use std::{process, thread};
use tokio::signal;
use tokio::sync::mpsc;

/// Words that end the interactive session, compared case-insensitively.
pub const EXIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

/// Prints `message` to standard error and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Turns a Twitter user's last five tweets into three actionable insights", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

impl Config {
    pub fn log_level_filter(&self) -> LevelFilter {
        self.verbosity.log_level_filter()
    }
}

/// True if `input` asks to end the session.
///
/// ```
/// use twinsight::cli::is_exit_word;
/// assert!(is_exit_word("QUIT"));
/// assert!(!is_exit_word("quitter"));
/// ```
pub fn is_exit_word(input: &str) -> bool {
    EXIT_WORDS
        .iter()
        .any(|word| input.trim().eq_ignore_ascii_case(word))
}

/// Reads lines from `input` on a separate thread.
///
/// The thread blocks on `input`, so it is never joined; it ends once
/// `input` is exhausted or the receiver is dropped.
pub fn read_lines<R>(input: R) -> mpsc::Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    thread::spawn(move || {
        for line in input.lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Completes when the user presses Ctrl-C.
///
/// Never completes if the handler cannot be installed.
pub async fn interrupted() {
    if let Err(err) = signal::ctrl_c().await {
        log::warn!("Could not listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}

/// Runs the interactive session.
pub struct Runner<
    S: Service = TwitterService,
    A: APIService = OpenRouterService,
    C: Clock = SystemClock,
    Z: Sleeper = TokioSleeper,
> {
    fetcher: FeedFetcher<S, C, Z>,
    generator: InsightGenerator<A, Z>,
    opts: ViewOptions,
}

impl Runner {
    /// Creates a runner that talks to the real Twitter and OpenRouter APIs.
    pub fn new(settings: &Settings) -> Self {
        let fetcher = FeedFetcher::new(settings.twitter_auth().clone());
        let generator = InsightGenerator::new(settings);
        Self::with_parts(fetcher, generator, ViewOptions::for_terminal())
    }
}

impl<S: Service, A: APIService, C: Clock, Z: Sleeper> Runner<S, A, C, Z> {
    /// Creates a runner from its collaborators.
    pub fn with_parts(
        fetcher: FeedFetcher<S, C, Z>,
        generator: InsightGenerator<A, Z>,
        opts: ViewOptions,
    ) -> Self {
        Self {
            fetcher,
            generator,
            opts,
        }
    }

    /// Reads handles from `lines` and writes analyses to `out` until the
    /// user types an [exit word](EXIT_WORDS), input ends, or `interrupt`
    /// completes.
    pub async fn repl<W, F>(
        &self,
        mut lines: mpsc::Receiver<io::Result<String>>,
        out: &mut W,
        interrupt: F,
    ) -> io::Result<()>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        let mut interrupt = pin!(interrupt);

        writeln!(out, "Twitter Insight Agent")?;
        writeln!(out, "{}", "=".repeat(30))?;
        writeln!(out, "Analyze Twitter accounts and get actionable insights!")?;
        writeln!(out, "Type 'quit' or 'exit' to stop.\n")?;

        loop {
            write!(out, "Enter Twitter username (with or without @): ")?;
            out.flush()?;

            let line = tokio::select! {
                _ = &mut interrupt => None,
                line = lines.recv() => line.transpose()?,
            };
            let Some(line) = line else {
                writeln!(out, "\nGoodbye!")?;
                break;
            };

            let handle = line.trim();
            if is_exit_word(handle) {
                writeln!(out, "Goodbye!")?;
                break;
            }
            if handle.is_empty() {
                writeln!(out, "Please enter a valid username.")?;
                continue;
            }

            let stopped = tokio::select! {
                _ = &mut interrupt => true,
                result = self.analyze(handle, &mut *out) => {
                    result?;
                    false
                }
            };
            if stopped {
                writeln!(out, "\nGoodbye!")?;
                break;
            }
        }
        Ok(())
    }

    /// Fetches tweets for `handle`, generates insights, and writes the
    /// results to `out`.
    ///
    /// Fetch and generation failures are written as messages; only I/O
    /// errors on `out` are returned.
    pub async fn analyze<W: Write>(&self, handle: &str, out: &mut W) -> io::Result<()> {
        let username = clean_handle(handle);
        writeln!(out, "\nAnalyzing @{username}...")?;

        let feed = match self.fetcher.fetch(handle).await {
            Ok(feed) => feed,
            Err(err) => {
                log::info!("Could not fetch tweets for @{username}: {err:?}");
                return writeln!(out, "{}", err.view(&self.opts));
            }
        };

        if feed.is_empty() {
            return writeln!(out, "No tweets found for @{username}");
        }

        writeln!(out, "{}", feed.view(&self.opts))?;
        writeln!(out, "Generating insights...")?;
        out.flush()?;

        let result = self.generator.generate(&feed.texts(), feed.len()).await;
        writeln!(out, "\n{}", Insights::new(username, &result).view(&self.opts))
    }
}

/// Runs the command-line program using the given configuration.
///
/// Exits the process with status 1 if credentials are missing.
pub async fn run(config: Config) {
    env_logger::Builder::new()
        .filter_level(config.log_level_filter())
        .init();

    let settings = Settings::load().unwrap_or_else(|err| {
        die(
            1,
            &format!(
                "Configuration Error: {err}\nPlease check your .env file and ensure all required API keys are set."
            ),
        )
    });
    log::debug!("Using model {}", settings.model());

    let runner = Runner::new(&settings);
    let lines = read_lines(BufReader::new(io::stdin()));
    let mut stdout = io::stdout();
    if let Err(err) = runner.repl(lines, &mut stdout, interrupted()).await {
        die(1, &format!("Fatal Error: {err}"));
    }
}
