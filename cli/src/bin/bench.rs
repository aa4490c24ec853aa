//! Manual benchmark for ad-hoc performance inspection: times image encoding
//! and the provider round trip, then prints a rough verdict.

use base64::Engine;
use clap::Parser;
use shared::providers::VisionProvider;
use shared::providers::groq::{GroqClient, GroqVision};
use shared::types::ImagePayload;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "bench")]
#[command(about = "Benchmark encoding and vision provider round-trip latency")]
struct Cli {
    /// Image to push through the vision provider
    image: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let Some(api_key) = std::env::var("GROQ_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
    else {
        println!("Error: GROQ_API_KEY not found.");
        return ExitCode::FAILURE;
    };

    if !cli.image.exists() {
        println!("Error: file {} not found.", cli.image.display());
        return ExitCode::FAILURE;
    }

    println!("--- Benchmarking vision analysis on: {} ---", cli.image.display());

    let data = match std::fs::read(&cli.image) {
        Ok(data) => data,
        Err(e) => {
            println!("Error: failed to read {}: {}", cli.image.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let encode_started = Instant::now();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&data);
    println!(
        "[1] Image encoding: {:.4} s ({} base64 chars)",
        encode_started.elapsed().as_secs_f64(),
        encoded.len()
    );

    let image = ImagePayload::from_file_name(
        data,
        cli.image.file_name().and_then(|name| name.to_str()),
    );
    let provider = GroqVision::new(GroqClient::new(api_key));

    println!("[2] Sending request to the vision provider...");
    let api_started = Instant::now();

    match provider.analyze(&image).await {
        Ok(analysis) => {
            let latency = api_started.elapsed().as_secs_f64();
            println!("[3] Response received!");
            println!("    Latency: {:.4} s", latency);
            match serde_json::to_string_pretty(&analysis) {
                Ok(pretty) => println!("    Output: {pretty}"),
                Err(e) => println!("    Output could not be serialized: {e}"),
            }

            println!();
            println!("--- Evaluation ---");
            if latency < 3.0 {
                println!("Speed: FAST (< 3s)");
            } else if latency < 5.0 {
                println!("Speed: MODERATE (3-5s)");
            } else {
                println!("Speed: SLOW (> 5s)");
            }

            if analysis.plant_name != "Unknown" && analysis.disease_name != "Unknown" {
                println!("Structure: VALID (plant and disease identified)");
            } else {
                println!("Structure: INCOMPLETE (model could not identify the image)");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Error during benchmark: {e}");
            ExitCode::FAILURE
        }
    }
}
