//! Scripted [`StockSource`] for tests.
//!
//! Answers are keyed by URL string. A URL with no scripted answer fails with
//! HTTP 404. Queued answers are consumed first, then the fixed answer set
//! with [`ScriptedSource::set`] repeats.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::domain::{Observation, ProductUrl};
use crate::error::SourceError;
use crate::port::StockSource;

#[derive(Debug, Clone)]
enum Answer {
    Found(Observation),
    Status(u16),
}

impl Answer {
    fn into_result(self) -> Result<Observation, SourceError> {
        match self {
            Self::Found(observation) => Ok(observation),
            Self::Status(status) => Err(SourceError::HttpStatus { status }),
        }
    }
}

#[derive(Default)]
struct Script {
    fixed: HashMap<String, Answer>,
    queued: HashMap<String, VecDeque<Answer>>,
    panics: HashSet<String>,
    calls: Vec<String>,
}

/// A stock source that replays scripted answers.
pub struct ScriptedSource {
    script: Mutex<Script>,
    started: AtomicUsize,
    delay: Mutex<Option<Duration>>,
    gate: watch::Sender<bool>,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSource {
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            script: Mutex::new(Script::default()),
            started: AtomicUsize::new(0),
            delay: Mutex::new(None),
            gate,
        }
    }

    /// Answer every query for `url` with `observation`.
    pub fn set(&self, url: &str, observation: Observation) {
        self.script
            .lock()
            .fixed
            .insert(url.to_string(), Answer::Found(observation));
    }

    /// Fail every query for `url` with an HTTP status.
    pub fn fail(&self, url: &str, status: u16) {
        self.script
            .lock()
            .fixed
            .insert(url.to_string(), Answer::Status(status));
    }

    /// Answer the next query for `url` with `observation`, once.
    pub fn push(&self, url: &str, observation: Observation) {
        self.script
            .lock()
            .queued
            .entry(url.to_string())
            .or_default()
            .push_back(Answer::Found(observation));
    }

    /// Panic inside the query for `url`.
    pub fn panic_on(&self, url: &str) {
        self.script.lock().panics.insert(url.to_string());
    }

    /// Sleep this long inside every query.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Hold every query open until [`ScriptedSource::release`].
    pub fn hold(&self) {
        self.gate.send_replace(false);
    }

    /// Let held and future queries finish.
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    /// Number of queries that have started.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// URLs queried so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.script.lock().calls.clone()
    }

    /// Wait until at least `count` queries have started.
    pub async fn wait_started(&self, count: usize) {
        while self.started() < count {
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

#[async_trait]
impl StockSource for ScriptedSource {
    async fn query(&self, url: &ProductUrl) -> Result<Observation, SourceError> {
        let key = url.as_str().to_string();
        let (answer, panics) = {
            let mut script = self.script.lock();
            script.calls.push(key.clone());
            let queued = script
                .queued
                .get_mut(&key)
                .and_then(VecDeque::pop_front);
            let answer = queued
                .or_else(|| script.fixed.get(&key).cloned())
                .unwrap_or(Answer::Status(404));
            (answer, script.panics.contains(&key))
        };
        self.started.fetch_add(1, Ordering::SeqCst);

        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if panics {
            panic!("scripted panic for {key}");
        }
        answer.into_result()
    }
}
