//! Integration tests for the logging facade
//!
//! These tests verify:
//! - Threshold filtering and fan-out across sinks
//! - Registry and pipeline reset
//! - Dynamic and replaced thresholds
//! - Mutation steps and stalled records
//! - Logstash delivery over UDP and TCP
//! - Configuration-driven setup

use logall::appenders::{CallbackAppender, LogstashConfig};
use logall::codec::{CodecKind, EventType};
use logall::core::{FixedClock, LogRecord, LoggingConfig, Notice, SinkConfig, Threshold};
use logall::prelude::*;
use logall::transport::TransportKind;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, UdpSocket};
use tokio_test::{assert_pending, assert_ready};

const TS: &str = "2015-07-02T11:28:30+01:00";

type Seen = Arc<Mutex<Vec<Arc<LogRecord>>>>;

fn collector() -> (Arc<dyn Appender>, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    let appender = CallbackAppender::new(move |r| seen_clone.lock().push(r));
    (Arc::new(appender), seen)
}

fn quiet_builder() -> logall::LoggerBuilder {
    Logger::builder()
        .on_notice(Arc::new(|_: &Notice| {}))
        .clock(FixedClock::shared(TS))
}

#[tokio::test]
async fn test_threshold_admits_iff_level_at_least_threshold() {
    for threshold in LogLevel::ALL {
        let (appender, seen) = collector();
        let logger = quiet_builder().appender("fake", threshold, appender).build();

        for level in LogLevel::ALL {
            logger.log(level, None, "TEST MESSAGE", None).await;
        }

        let delivered: Vec<LogLevel> = seen.lock().iter().map(|r| r.level).collect();
        let expected: Vec<LogLevel> = LogLevel::ALL
            .into_iter()
            .filter(|l| l.rank() >= threshold.rank())
            .collect();
        assert_eq!(delivered, expected, "threshold {}", threshold);
    }
}

#[tokio::test]
async fn test_fan_out_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut builder = quiet_builder();
    for name in ["first", "second", "third"] {
        let order_clone = Arc::clone(&order);
        builder = builder.appender(
            name,
            LogLevel::Debug,
            Arc::new(CallbackAppender::new(move |_| order_clone.lock().push(name))),
        );
    }
    let logger = builder.build();

    logger.warn("TEST MESSAGE").await;

    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_remove_all_delivers_to_nothing() {
    let (appender, seen) = collector();
    let logger = quiet_builder()
        .default_sink()
        .appender("fake", LogLevel::Debug, appender)
        .fn_step(|record: &mut LogRecord| record.message.push('!'))
        .build();

    logger.remove_all();
    logger.error("TEST MESSAGE").await;

    assert!(seen.lock().is_empty());
    assert_eq!(logger.sink_count(), 0);
    assert_eq!(logger.step_count(), 0);
    assert_eq!(logger.metrics().deliveries_started(), 0);
}

#[tokio::test]
async fn test_dynamic_threshold_is_evaluated_per_record() {
    let (appender, seen) = collector();
    let logger = quiet_builder()
        .appender("fake", LogLevel::Info, appender)
        .build();

    logger.debug("filtered").await;
    assert!(logger.set_threshold("fake", Threshold::dynamic(|_| LogLevel::Debug)));
    logger.debug("delivered").await;

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].message, "delivered");
}

#[tokio::test]
async fn test_dynamic_threshold_sees_record_fields() {
    let (appender, seen) = collector();
    let logger = quiet_builder()
        .appender(
            "fake",
            Threshold::dynamic(|record| {
                if record.module.as_deref() == Some("noisy") {
                    LogLevel::Error
                } else {
                    LogLevel::Debug
                }
            }),
            appender,
        )
        .build();

    logger.for_module("noisy").info("dropped").await;
    logger.for_module("quiet").debug("kept").await;

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].message, "kept");
}

#[tokio::test]
async fn test_set_threshold_on_default_sink() {
    let logger = Logger::new();
    assert!(logger.set_threshold(logall::DEFAULT_SINK_NAME, LogLevel::Debug));
    assert!(!logger.set_threshold("missing", LogLevel::Debug));

    logger.debug("visible on stdout").await;
    assert_eq!(logger.metrics().deliveries_started(), 1);
}

#[tokio::test]
async fn test_set_threshold_replaces_first_match_only() {
    let (first, first_seen) = collector();
    let (second, second_seen) = collector();
    let logger = quiet_builder()
        .appender("dup", LogLevel::Error, first)
        .appender("dup", LogLevel::Error, second)
        .build();

    logger.set_threshold("dup", LogLevel::Debug);
    logger.info("TEST MESSAGE").await;

    assert_eq!(first_seen.lock().len(), 1);
    assert!(second_seen.lock().is_empty());
}

#[tokio::test]
async fn test_steps_mutate_before_delivery() {
    let (appender, seen) = collector();
    let logger = quiet_builder()
        .appender("fake", LogLevel::Debug, appender)
        .build();

    logger.register_step(|mut record: LogRecord| async move {
        record.data_mut().insert("x", 1);
        record
    });
    logger.register_fn_step(|record: &mut LogRecord| {
        let x = record.field("x").and_then(Value::as_i64).unwrap_or(0);
        record.data_mut().insert("y", x + 1);
    });

    logger.info("TEST MESSAGE").await;

    let seen = seen.lock();
    assert_eq!(seen[0].field("x"), Some(&json!(1)));
    assert_eq!(seen[0].field("y"), Some(&json!(2)));
}

#[tokio::test]
async fn test_registration_during_dispatch_affects_later_records_only() {
    let (early, early_seen) = collector();
    let (late, late_seen) = collector();
    let logger = quiet_builder()
        .appender("early", LogLevel::Debug, early)
        .build();

    let (release, gate) = tokio::sync::oneshot::channel::<()>();
    let gate = Arc::new(Mutex::new(Some(gate)));
    logger.register_step(move |record: LogRecord| {
        let gate = gate.lock().take();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            record
        }
    });

    let mut held = tokio_test::task::spawn(logger.info("held"));
    assert_pending!(held.poll());

    logger.register_appender("late", LogLevel::Debug, late);
    logger.register_fn_step(|record: &mut LogRecord| record.message.push_str(" (late step)"));

    release.send(()).unwrap();
    assert!(held.is_woken());
    assert_ready!(held.poll());
    drop(held);

    logger.info("after").await;

    let early_seen = early_seen.lock();
    assert_eq!(early_seen[0].message, "held");
    assert_eq!(early_seen[1].message, "after (late step)");

    let late_seen = late_seen.lock();
    assert_eq!(late_seen.len(), 1);
    assert_eq!(late_seen[0].message, "after (late step)");
}

#[tokio::test]
async fn test_stalled_step_holds_only_its_own_record() {
    let (appender, seen) = collector();
    let logger = quiet_builder()
        .appender("fake", LogLevel::Debug, appender)
        .build();

    logger.register_step(|record: LogRecord| async move {
        if record.message == "stall" {
            std::future::pending::<()>().await;
        }
        record
    });

    let mut stalled = tokio_test::task::spawn(logger.info("stall"));
    assert_pending!(stalled.poll());

    logger.info("one").await;
    logger.error("two").await;

    assert_pending!(stalled.poll());
    let messages: Vec<String> = seen.lock().iter().map(|r| r.message.clone()).collect();
    assert_eq!(messages, vec!["one", "two"]);
}

#[tokio::test]
async fn test_step_writes_seen_by_every_sink() {
    let (first, first_seen) = collector();
    let (second, second_seen) = collector();
    let logger = quiet_builder()
        .appender("first", LogLevel::Debug, first)
        .appender("second", LogLevel::Info, second)
        .fn_step(|record: &mut LogRecord| {
            record.data_mut().insert("x", 1);
        })
        .build();

    logger.warn("TEST MESSAGE").await;

    for seen in [first_seen, second_seen] {
        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].field("x"), Some(&json!(1)));
    }
}

#[tokio::test]
async fn test_steps_removed_mid_flight_still_run() {
    let (appender, seen) = collector();
    let logger = quiet_builder()
        .appender("fake", LogLevel::Debug, appender)
        .build();

    let (release, gate) = tokio::sync::oneshot::channel::<()>();
    let gate = Arc::new(Mutex::new(Some(gate)));
    logger.register_step(move |record: LogRecord| {
        let gate = gate.lock().take();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            record
        }
    });
    logger.register_fn_step(|record: &mut LogRecord| record.message.push_str("+step2"));

    let mut held = tokio_test::task::spawn(logger.info("m"));
    assert_pending!(held.poll());

    logger.remove_all();
    assert_eq!(logger.step_count(), 0);
    assert_eq!(logger.sink_count(), 0);

    release.send(()).unwrap();
    assert_ready!(held.poll());
    drop(held);

    logger.info("after reset").await;

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].message, "m+step2");
}

#[tokio::test]
async fn test_logstash_udp_literal_type() {
    let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = server.local_addr().unwrap().port();

    let logger = quiet_builder().build();
    let config = LogstashConfig::new(TransportKind::Udp, "127.0.0.1", port)
        .with_event_type(EventType::literal("test_type"));
    logger
        .register_config(&SinkConfig::logstash("logstash", LogLevel::Info, config))
        .await
        .unwrap();

    logger.debug("filtered").await;
    logger.info("TEST MESSAGE").await;
    logger.flush().await.unwrap();

    let mut buf = vec![0u8; 65536];
    let len = tokio::time::timeout(Duration::from_secs(5), server.recv(&mut buf))
        .await
        .expect("no datagram received")
        .unwrap();
    let event: Value = serde_json::from_slice(&buf[..len]).unwrap();

    assert_eq!(
        event,
        json!({
            "@timestamp": TS,
            "type": "test_type",
            "message": "TEST MESSAGE",
            "level": "INFO"
        })
    );
    logger.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_logstash_tcp_legacy_codec() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let logger = quiet_builder().build();
    let config = LogstashConfig::new(TransportKind::Tcp, "127.0.0.1", port)
        .with_event_type(EventType::by_level("app_"))
        .with_codec(CodecKind::Legacy);
    logger
        .register_config(&SinkConfig::logstash("logstash", LogLevel::Debug, config))
        .await
        .unwrap();
    let (mut socket, _) = listener.accept().await.unwrap();

    logger
        .for_module("db")
        .warn_with("slow query", LogData::new().with_field("ms", 1200))
        .await;
    logger.shutdown().await.unwrap();

    let mut received = String::new();
    tokio::time::timeout(Duration::from_secs(5), socket.read_to_string(&mut received))
        .await
        .expect("stream was not closed")
        .unwrap();
    let event: Value = serde_json::from_str(&received).unwrap();

    assert_eq!(
        event,
        json!({
            "@timestamp": TS,
            "@type": "app_warn",
            "@message": "slow query",
            "@fields": { "ms": 1200, "module": "db" }
        })
    );
}

#[tokio::test]
async fn test_unreachable_tcp_server_does_not_break_logging() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let notices = Arc::new(Mutex::new(Vec::new()));
    let notices_clone = Arc::clone(&notices);
    let (appender, seen) = collector();
    let logger = Logger::builder()
        .on_notice(Arc::new(move |n: &Notice| notices_clone.lock().push(n.clone())))
        .appender("fake", LogLevel::Debug, appender)
        .build();

    let config = LogstashConfig::new(TransportKind::Tcp, "127.0.0.1", port);
    logger
        .register_config(&SinkConfig::logstash("logstash", LogLevel::Debug, config))
        .await
        .unwrap();

    logger.error("TEST MESSAGE").await;
    logger.flush().await.unwrap();

    assert_eq!(seen.lock().len(), 1);
    assert!(notices.lock().iter().any(Notice::is_fault));
}

#[tokio::test]
async fn test_from_config() {
    let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = server.local_addr().unwrap().port();

    let config = LoggingConfig::from_json(&format!(
        r#"{{
            "sinks": [
                {{ "type": "console", "level": "WARN" }},
                {{ "name": "logstash", "type": "logstash", "level": "debug",
                   "output": {{ "transport": "udp", "host": "127.0.0.1", "port": {} }} }}
            ]
        }}"#,
        port
    ))
    .unwrap();

    let logger = Logger::from_config(&config).await.unwrap();
    assert_eq!(logger.sink_names(), vec!["default", "logstash"]);

    logger.debug("TEST MESSAGE").await;
    logger.flush().await.unwrap();

    let mut buf = vec![0u8; 65536];
    let len = tokio::time::timeout(Duration::from_secs(5), server.recv(&mut buf))
        .await
        .expect("no datagram received")
        .unwrap();
    let event: Value = serde_json::from_slice(&buf[..len]).unwrap();
    assert_eq!(event["type"], "debug");
    assert_eq!(event["message"], "TEST MESSAGE");
    assert!(event.get("level").is_none());
}

#[tokio::test]
async fn test_config_rejects_unknown_level_and_sink_type() {
    let err = LoggingConfig::from_json(r#"{"sinks": [{"type": "console", "level": "TRACE"}]}"#)
        .unwrap_err();
    assert!(err.to_string().contains("TRACE"));

    assert!(LoggingConfig::from_json(r#"{"sinks": [{"type": "syslog"}]}"#).is_err());
}
