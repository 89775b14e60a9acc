//! Configuration-driven setup example
//!
//! Builds a logger from a JSON configuration. The Logstash sink points at
//! a TCP port nobody listens on, so it degrades and reports a notice
//! while the console sink keeps working.
//!
//! Run with: cargo run --example config_file

use logall::prelude::*;

const CONFIG: &str = r#"{
    "sinks": [
        { "name": "default", "type": "console", "level": "DEBUG", "colors": true },
        { "name": "logstash", "type": "logstash", "level": "WARN",
          "output": { "transport": "tcp", "host": "127.0.0.1", "port": 1 },
          "eventType": "my_service",
          "codec": "oldlogstashjson" }
    ]
}"#;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== logall - Configuration Example ===\n");

    let config = LoggingConfig::from_json(CONFIG)?;
    let logger = Logger::from_config(&config).await?;
    println!("Sinks: {:?}\n", logger.sink_names());

    logger.debug("Configuration loaded").await;
    logger.warn("Disk usage at 91%").await;

    match "verbose".parse::<LogLevel>() {
        Ok(level) => println!("Parsed level {}", level),
        Err(e) => println!("\nRejected level: {}", e),
    }

    logger.shutdown().await?;

    let metrics = logger.metrics();
    println!(
        "\nDispatched {} records, {} deliveries started, {} filtered",
        metrics.records_dispatched(),
        metrics.deliveries_started(),
        metrics.deliveries_filtered()
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
