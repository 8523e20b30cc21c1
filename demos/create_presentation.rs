//! Example: create a presentation and wait for it to finish.
//!
//! This example shows how to:
//! - Build a generation request with text, image and card options
//! - Submit it and print any warnings the API returns
//! - Poll until the generation completes and print the export links
//!
//! Run with: `GAMMA_API_KEY=sk-... cargo run --example create_presentation`

use gamma_sdk::{
    CardDimensions, CardSplit, Format, GammaClient, GenerationRequest, ImageModel, Language,
    OptionMap, TextMode,
};
use std::time::Duration;

const OUTLINE: &str = "\
# The future of urban transit
Why cities are rethinking mobility
---
# Three shifts
Electrification, micromobility and on-demand routing
---
# What to do next
Pilot programs and funding models";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("gamma_sdk=info")
        .init();

    let client = GammaClient::builder().build()?;

    let request = GenerationRequest::new()
        .input_text(OUTLINE)?
        .text_mode(TextMode::Generate)
        .format(Format::Presentation)
        .num_cards(6)?
        .card_split(CardSplit::InputTextBreaks)
        .additional_instructions("Keep each card to three bullet points.")
        .text_options(
            OptionMap::new()
                .with("amount", "medium")
                .with("tone", "optimistic, practical")
                .with("language", Language::En),
        )?
        .image_options(
            OptionMap::new()
                .with("source", "aiGenerated")
                .with("model", ImageModel::Imagen4Pro),
        )?
        .card_options(OptionMap::new().with("dimensions", CardDimensions::Wide))?
        .export_as("PDF")?;

    println!("=== Creating generation ===");
    let created = client.create_generation(request).await?;
    println!("Generation id: {}", created.generation_id);
    for warning in &created.warnings {
        println!("  warning: {}", warning);
    }
    println!();

    println!("=== Waiting for completion ===");
    let done = client
        .poller()
        .wait_until_completed(
            &created.generation_id,
            Duration::from_secs(5),
            Duration::from_secs(600),
        )
        .await?;

    println!("Gamma URL: {}", done.gamma_url);
    if let Some(pdf) = &done.pdf_url {
        println!("PDF: {}", pdf);
    }
    for (name, url) in &done.export_urls {
        println!("  export {}: {}", name, url);
    }
    if let Some(credits) = &done.credits {
        println!("Credits: {}", serde_json::Value::Object(credits.clone()));
    }

    Ok(())
}
