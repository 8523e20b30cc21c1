//! # gamma-sdk - a typed client for the Gamma generation API
//!
//! Build a generation request, submit it, and wait for the finished
//! presentation, document or social post. The client classifies every HTTP
//! failure into a typed error, retries transient status-check failures with
//! backoff, and turns the stateless status endpoint into a single awaitable
//! "wait until completed" call.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gamma_sdk::{CardSplit, Format, GammaClient, GenerationRequest, OptionMap, TextMode};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gamma_sdk::Error> {
//!     // Reads GAMMA_API_KEY from the environment
//!     let client = GammaClient::builder().build()?;
//!
//!     let request = GenerationRequest::new()
//!         .input_text("# Product launch\nVision\n---\nRoadmap")?
//!         .format(Format::Presentation)
//!         .text_mode(TextMode::Generate)
//!         .num_cards(8)?
//!         .card_split(CardSplit::InputTextBreaks)
//!         .text_options(OptionMap::new().with("tone", "confident"))?
//!         .export_as("pdf")?;
//!
//!     let created = client.create_generation(request).await?;
//!
//!     let done = client
//!         .poller()
//!         .wait_until_completed(&created.generation_id, Duration::from_secs(5), Duration::from_secs(300))
//!         .await?;
//!     println!("Gamma: {}", done.gamma_url);
//!     if let Some(pdf) = done.pdf_url {
//!         println!("PDF: {}", pdf);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every HTTP failure keeps its status code and decoded body:
//!
//! ```no_run
//! use gamma_sdk::{Error, ErrorKind, GammaClient};
//!
//! # async fn example(client: GammaClient) {
//! match client.get_generation("gen-123").await {
//!     Ok(status) => println!("{} is {}", status.generation_id(), status.status()),
//!     Err(Error::Api(e)) if e.kind == ErrorKind::Unauthorized => {
//!         eprintln!("Check GAMMA_API_KEY: {}", e.message);
//!     }
//!     Err(Error::Api(e)) => eprintln!("HTTP {}: {} ({:?})", e.status, e.message, e.body),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # }
//! ```
//!
//! ## Retries
//!
//! Status checks retry 429, 5xx and transport failures up to
//! [`ClientConfig::with_max_retries`] times (default 2). A 429's Retry-After
//! wins over the [`Backoff`] policy. Creating a generation is never retried.

pub mod catalog;
pub mod classify;
mod client;
pub mod config;
mod error;
pub mod polling;
pub mod request;
mod response;
pub mod retry;
pub mod sleep;
pub mod transport;

pub use catalog::{ImageModel, Language};
pub use client::{ClientBuilder, GammaClient};
pub use config::ClientConfig;
pub use error::{ApiError, Error, ErrorKind, Result};
pub use polling::Poller;
pub use request::{
    CardDimensions, CardSplit, ExportFormat, Format, GenerationPayload, GenerationRequest,
    OptionMap, TextMode,
};
pub use response::{
    CompletedGeneration, CreateGenerationResult, GenerationStatus, PendingGeneration,
};
pub use retry::Backoff;
pub use transport::{Transport, TransportError, TransportRequest, TransportResponse};
