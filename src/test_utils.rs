use crate::ai::service::APIService;
use crate::auth::Auth;
use crate::clock::{Clock, DateTime, Sleeper, Utc};
use crate::http::{HTTPError, HTTPResult};
use crate::insight::InsightGenerator;
use crate::twitter::FeedFetcher;
use crate::twitter::service::Service;
use serde::Serialize;
use std::collections::VecDeque;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

pub fn load_output(filename: &str) -> String {
    let filename = format!("tests/output/{filename}.out");
    String::from(
        fs::read_to_string(&filename)
            .expect(&format!("could not load test data from {filename}"))
            .trim_end(),
    )
}

/// Serves Twitter API responses from `tests/data`.
///
/// User lookups read `user_{suffix}.json` and timelines read
/// `tweets_{suffix}.json`, regardless of the username or ID requested.
pub struct TestService<'a> {
    suffix: &'a str,
}

impl<'a> TestService<'a> {
    pub fn new(suffix: &'a str) -> Self {
        Self { suffix }
    }
}

impl<'a> Service for TestService<'a> {
    async fn get_user(&self, _username: &str) -> HTTPResult<String> {
        Ok(load_data(&format!("user_{}", self.suffix)))
    }

    async fn get_tweets(&self, _user_id: &str) -> HTTPResult<String> {
        Ok(load_data(&format!("tweets_{}", self.suffix)))
    }
}

/// A Twitter service whose every request fails with the same error.
///
/// Clones share a count of the requests made.
#[derive(Clone)]
pub struct ErrorService {
    error: Arc<dyn Fn() -> HTTPError + Send + Sync>,
    calls: Arc<AtomicUsize>,
}

impl ErrorService {
    pub fn new(error: impl Fn() -> HTTPError + Send + Sync + 'static) -> Self {
        Self {
            error: Arc::new(error),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> HTTPError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.error)()
    }
}

impl Service for ErrorService {
    async fn get_user(&self, _username: &str) -> HTTPResult<String> {
        Err(self.fail())
    }

    async fn get_tweets(&self, _user_id: &str) -> HTTPResult<String> {
        Err(self.fail())
    }
}

/// An AI service that plays back canned results in order and remembers
/// every request body it was sent.
#[derive(Clone, Default)]
pub struct ScriptedService {
    responses: Arc<Mutex<VecDeque<HTTPResult<String>>>>,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl ScriptedService {
    pub fn new(responses: Vec<HTTPResult<String>>) -> Self {
        let responses = Arc::new(Mutex::new(responses.into()));
        Self {
            responses,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }
}

impl APIService for ScriptedService {
    async fn post<D>(&self, _uri: &str, _auth: &Auth, data: &D) -> HTTPResult<String>
    where
        D: Serialize + Sync,
    {
        let body = serde_json::to_value(data).expect("could not serialize request");
        self.requests.lock().unwrap().push(body);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted service ran out of responses")
    }
}

/// Remembers how long it was asked to sleep instead of sleeping.
#[derive(Clone, Debug, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl FrozenClock {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        FrozenClock { datetime }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2025-06-02T10:13:00-07:00")
            .expect("invalid date supplied")
            .with_timezone(&Utc);
        Self::new(datetime)
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}

/// A fetcher backed by `service` that never really sleeps.
pub fn fetcher<S: Service>(service: S) -> FeedFetcher<S, FrozenClock, RecordingSleeper> {
    FeedFetcher::with_parts(service, FrozenClock::default(), RecordingSleeper::default())
}

/// A generator backed by `service` that records its backoff in `sleeper`.
pub fn generator(
    service: &ScriptedService,
    sleeper: &RecordingSleeper,
) -> InsightGenerator<ScriptedService, RecordingSleeper> {
    InsightGenerator::with_parts(
        service.clone(),
        Auth::new("test-key"),
        "test/model",
        sleeper.clone(),
    )
}
