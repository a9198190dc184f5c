//! Shared helpers for network integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use badgestream_network::{NetworkError, NetworkResult, RequestFactory, ResilientClient};
use reqwest::Response;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One scripted outcome of an inner client call
pub enum Step {
    Status(u16, &'static str),
    StatusWithHeader(u16, &'static str, &'static str),
    Fail(&'static str),
}

/// Inner client that replays a script and counts calls
///
/// Once the script is exhausted the last step repeats.
pub struct ScriptedClient {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    calls: AtomicUsize,
    builds: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
            builds: AtomicUsize::new(0),
        }
    }

    pub fn always(step: Step) -> Self {
        Self::new(vec![step])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().expect("script lock");
        let mut last = self.last.lock().expect("last lock");
        if let Some(step) = steps.pop_front() {
            *last = Some(step.replay());
            return step;
        }
        last.as_ref().map(Step::replay).expect("script must not be empty")
    }
}

impl Step {
    fn replay(&self) -> Step {
        match self {
            Step::Status(code, body) => Step::Status(*code, *body),
            Step::StatusWithHeader(code, header, value) => {
                Step::StatusWithHeader(*code, *header, *value)
            }
            Step::Fail(message) => Step::Fail(*message),
        }
    }
}

pub fn response(code: u16, body: &str) -> Response {
    let response = http::Response::builder()
        .status(code)
        .body(body.to_string())
        .expect("valid response");
    Response::from(response)
}

#[async_trait]
impl ResilientClient for ScriptedClient {
    async fn send(&self, factory: &dyn RequestFactory) -> NetworkResult<Response> {
        // Mirror the base client: one build per attempt
        let _request = factory.build();
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.next_step() {
            Step::Status(code, body) => Ok(response(code, body)),
            Step::StatusWithHeader(code, header, value) => {
                let response = http::Response::builder()
                    .status(code)
                    .header(header, value)
                    .body(String::new())
                    .expect("valid response");
                Ok(Response::from(response))
            }
            Step::Fail(message) => Err(NetworkError::Custom(message.to_string())),
        }
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
