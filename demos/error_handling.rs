//! Example demonstrating error handling.
//!
//! This example shows how to:
//! - Catch request validation errors before anything is sent
//! - Branch on the classified HTTP error kind
//! - Read the status code, message and decoded body of a failure
//! - Tell retryable failures apart from permanent ones
//! - Handle a polling timeout
//!
//! Run with: `GAMMA_API_KEY=sk-... cargo run --example error_handling`

use gamma_sdk::{ClientConfig, Error, ErrorKind, GammaClient, GenerationRequest};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("gamma_sdk=info")
        .init();

    println!("=== Example 1: Validation Errors ===");
    // No format or text mode: rejected locally
    let incomplete = GenerationRequest::new().input_text("Hello")?;
    match incomplete.build() {
        Ok(_) => println!("Unexpected success"),
        Err(Error::Validation(message)) => println!("Validation failed: {}", message),
        Err(e) => println!("Other error: {}", e),
    }
    match GenerationRequest::new().num_cards(0) {
        Ok(_) => println!("Unexpected success"),
        Err(e) => println!("Validation failed: {}", e),
    }
    println!();

    let client = GammaClient::builder()
        .config(ClientConfig::from_env().with_max_retries(1))
        .build()?;

    println!("=== Example 2: Classified HTTP Errors ===");
    match client.get_generation("does-not-exist").await {
        Ok(status) => println!("Found: {:?}", status),
        Err(Error::Api(e)) => {
            match e.kind {
                ErrorKind::Unauthorized | ErrorKind::Forbidden => {
                    println!("Check your API key: {}", e.message)
                }
                ErrorKind::NotFound => println!("No such generation: {}", e.message),
                ErrorKind::TooManyRequests => {
                    println!("Throttled, retry after {:?}", e.retry_after)
                }
                kind => println!("{}: {}", kind, e.message),
            }
            println!("  Status code: {}", e.status.as_u16());
            println!("  Body: {:?}", e.body);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 3: Retryable Errors ===");
    let unreachable = GammaClient::builder()
        .config(
            ClientConfig::from_env()
                .with_base_url("http://127.0.0.1:9")
                .with_connect_timeout(Duration::from_millis(500))
                .with_max_retries(2),
        )
        .build()?;
    match unreachable.get_generation("gen-123").await {
        Ok(_) => println!("Unexpected success"),
        Err(e) => {
            println!("Failed after retries: {}", e);
            println!("  Retryable: {}", e.is_retryable());
        }
    }
    println!();

    println!("=== Example 4: Polling Timeout ===");
    match client
        .poller()
        .wait_until_completed("gen-123", Duration::from_secs(1), Duration::from_secs(2))
        .await
    {
        Ok(done) => println!("Completed: {}", done.gamma_url),
        Err(Error::PollTimeout {
            generation_id,
            timeout,
        }) => println!("Gave up on {} after {:?}", generation_id, timeout),
        Err(e) => println!("Polling failed: {}", e),
    }

    Ok(())
}
