//! Log levels emitted by the fallback layer

mod common;

use badgestream_network::{
    CircuitBreakerClient, FallbackClient, OutboundRequest, ResilientClient, RetryClient,
};
use common::{ScriptedClient, Step};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

fn logger() -> &'static CapturingLogger {
    static LOGGER: OnceLock<&'static CapturingLogger> = OnceLock::new();
    LOGGER.get_or_init(|| {
        let logger: &'static CapturingLogger = Box::leak(Box::new(CapturingLogger {
            records: Mutex::new(Vec::new()),
        }));
        log::set_logger(logger).expect("logger installed once");
        log::set_max_level(LevelFilter::Trace);
        logger
    })
}

/// Returns captured records mentioning `needle`
///
/// Tests share one logger, so each one keys its records on a status code no
/// other test uses.
fn records_mentioning(needle: &str) -> Vec<(Level, String)> {
    logger()
        .records
        .lock()
        .expect("records")
        .iter()
        .filter(|(_, message)| message.contains(needle))
        .cloned()
        .collect()
}

fn levels_mentioning(needle: &str) -> Vec<Level> {
    records_mentioning(needle)
        .into_iter()
        .map(|(level, _)| level)
        .collect()
}

#[tokio::test]
async fn test_unexpected_error_logged_as_error() {
    logger();
    let client = FallbackClient::new(ScriptedClient::always(Step::Fail("refused-7f3a")));

    assert_eq!(client.send(&OutboundRequest::get("http://localhost:1")).await, "");
    assert_eq!(levels_mentioning("refused-7f3a"), vec![Level::Error]);
}

#[tokio::test]
async fn test_client_error_logged_as_warning() {
    logger();
    // Mocked responses carry no real URL, so match on the status instead
    let client = FallbackClient::new(ScriptedClient::always(Step::Status(451, "")));

    assert_eq!(client.send(&OutboundRequest::get("http://localhost:1")).await, "");
    assert!(levels_mentioning("with 451").contains(&Level::Warn));
}

#[tokio::test]
async fn test_server_error_not_logged_above_debug() {
    logger();
    let client = FallbackClient::new(ScriptedClient::always(Step::Status(507, "")));

    assert_eq!(client.send(&OutboundRequest::get("http://localhost:1")).await, "");
    let levels = levels_mentioning("answered 507");
    assert_eq!(levels, vec![Level::Debug]);
}

#[tokio::test(start_paused = true)]
async fn test_each_retry_logged_as_warning() {
    logger();
    let client = RetryClient::new(
        ScriptedClient::new(vec![
            Step::Status(502, ""),
            Step::Status(502, ""),
            Step::Status(200, "ok"),
        ]),
        3,
    );

    let response = client
        .send(&OutboundRequest::get("http://localhost:1"))
        .await
        .expect("response");
    assert_eq!(response.status(), 200);

    let records = records_mentioning("after status 502");
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|(level, _)| *level == Level::Warn));
    assert!(records[0].1.contains("2 retries left"));
    assert!(records[0].1.contains("waiting 2s"));
    assert!(records[1].1.contains("1 retries left"));
    assert!(records[1].1.contains("waiting 4s"));
}

#[tokio::test(start_paused = true)]
async fn test_opening_circuit_logged_with_break_duration() {
    logger();
    let client = CircuitBreakerClient::new(
        ScriptedClient::always(Step::StatusWithHeader(521, "retry-after", "120")),
        Duration::from_secs(30),
    );

    let response = client
        .send(&OutboundRequest::get("http://localhost:1"))
        .await
        .expect("response");
    assert_eq!(response.status().as_u16(), 521);

    let records = records_mentioning("upstream returned 521");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, Level::Warn);
    assert!(records[0].1.contains("breaking for 120s"));
}
