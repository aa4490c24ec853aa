use clap::Parser;
use clap::error::ErrorKind;
use log::info;
use serde_json::json;
use shared::providers::groq::{GroqClient, GroqVision};
use shared::providers::{VisionChain, VisionProvider};
use shared::types::{ImagePayload, VisionAnalysis};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "analyze")]
#[command(about = "Classify plant diseases from a photo using a hosted vision model")]
struct Cli {
    /// Path to the plant image to analyze
    image: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                error.exit();
            }
            let _ = error.print();
            println!(
                "{}",
                json!({ "success": false, "error": "Missing image path argument" })
            );
            return ExitCode::FAILURE;
        }
    };

    match run(&cli.image).await {
        Ok(result) => {
            println!("{}", json!({ "success": true, "result": result }));
            ExitCode::SUCCESS
        }
        Err(error) => {
            println!("{}", json!({ "success": false, "error": error }));
            ExitCode::FAILURE
        }
    }
}

async fn run(image_path: &Path) -> Result<VisionAnalysis, String> {
    let api_key = credential("GROQ_API_KEY")
        .ok_or_else(|| "GROQ_API_KEY not found in environment variables".to_string())?;
    analyze_file(image_path, api_key).await
}

async fn analyze_file(image_path: &Path, api_key: String) -> Result<VisionAnalysis, String> {
    if !image_path.exists() {
        return Err(format!("Image not found: {}", image_path.display()));
    }

    let data = std::fs::read(image_path)
        .map_err(|e| format!("Failed to read {}: {}", image_path.display(), e))?;
    let image = ImagePayload::from_file_name(
        data,
        image_path.file_name().and_then(|name| name.to_str()),
    );

    info!(
        "Sending image to the vision provider ({} bytes, {})",
        image.data.len(),
        image.media_type
    );

    let chain = VisionChain::new(vec![
        Box::new(GroqVision::new(GroqClient::new(api_key))) as Box<dyn VisionProvider>,
    ]);
    chain.analyze(&image).await.map_err(|e| e.to_string())
}

fn credential(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
