//! Basic logger usage example
//!
//! Demonstrates the default console sink, thresholds, module loggers and
//! mutation steps.
//!
//! Run with: cargo run --example basic_usage

use logall::prelude::*;
use logall::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== logall - Basic Usage Example ===\n");

    // One console sink named "default" at INFO
    let logger = Logger::new();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message (hidden)").await;
    logger.info("This is an info message").await;
    logger.warn("This is a warning message").await;
    logger.error("This is an error message").await;

    println!("\n2. Lowering the default sink threshold to DEBUG:");
    logger.set_threshold(logall::DEFAULT_SINK_NAME, LogLevel::Debug);
    logger.debug("Debug message (visible)").await;

    println!("\n3. Module loggers and structured data:");
    let db = logger.for_module("database");
    db.info("Connection pool ready").await;
    db.warn_with(
        "Slow query",
        LogData::new().with_field("table", "orders").with_field("ms", 1250),
    )
    .await;

    println!("\n4. Mutation steps:");
    logger.register_fn_step(|record: &mut LogRecord| {
        record.data_mut().insert("host", "web-1");
    });
    logger.register_step(|mut record: LogRecord| async move {
        record.message = record.message.to_uppercase();
        record
    });
    info!(logger, "Request served in {} ms", 12).await;

    println!("\n5. Macros:");
    warn!(logger, "Retry attempt {} of {}", 2, 5).await;

    logger.shutdown().await?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
