//! Logstash over UDP example
//!
//! Starts a local UDP listener standing in for Logstash, registers a
//! Logstash sink next to the console sink and prints what arrives.
//!
//! Run with: cargo run --example logstash_udp

use logall::appenders::LogstashConfig;
use logall::core::SinkConfig;
use logall::prelude::*;
use std::time::Duration;
use tokio::net::UdpSocket;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== logall - Logstash UDP Example ===\n");

    let server = UdpSocket::bind("127.0.0.1:0").await?;
    let port = server.local_addr()?.port();
    println!("Listening for events on 127.0.0.1:{}\n", port);

    let logger = Logger::new();
    let config = LogstashConfig::new(TransportKind::Udp, "127.0.0.1", port)
        .with_event_type(EventType::by_level("app_").with_override(LogLevel::Error, "alerts"));
    logger
        .register_config(&SinkConfig::logstash("logstash", LogLevel::Debug, config))
        .await?;

    logger.debug("Cache warmed").await;
    logger
        .for_module("checkout")
        .info_with(
            "Order placed",
            LogData::new()
                .with_field("order_id", 1042)
                .with_field("message", "kept as additionalMessage"),
        )
        .await;
    logger.error("Payment gateway unreachable").await;
    logger.flush().await?;

    println!("\nReceived events:");
    let mut buf = vec![0u8; 65536];
    for _ in 0..3 {
        match tokio::time::timeout(Duration::from_secs(1), server.recv(&mut buf)).await {
            Ok(Ok(len)) => println!("  {}", String::from_utf8_lossy(&buf[..len])),
            _ => break,
        }
    }

    logger.shutdown().await?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
