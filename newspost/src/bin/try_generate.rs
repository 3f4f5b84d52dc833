use std::path::{Path, PathBuf};

use clap::Parser;
use common::{Config, Secrets};

use newspost::generator::Generator;

/// Run the pipeline once for a topic against the configured APIs and print the result.
#[derive(Parser, Debug)]
#[command(name = "try_generate")]
struct Args {
    /// Topic to write about
    topic: String,

    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let _ = dotenv::dotenv();

    let config = Config::resolve(
        Path::new("config.default.toml"),
        args.config.as_deref(),
        |name| std::env::var(name).ok(),
    )
    .await?;
    let secrets = Secrets::from_env(&config)?;

    println!("\n{}", "=".repeat(60));
    println!("Topic: {}", args.topic);
    println!("Model: {}", config.llm.model);
    println!("{}", "=".repeat(60));

    let generator = Generator::from_config(&config, &secrets)?;
    match generator.generate(&args.topic).await {
        Ok(content) => {
            println!("\nTitle: {}", content.title);
            println!("Meta description: {}", content.meta_description);
            println!(
                "\n--- post ({} chars) ---\n{}",
                content.post_content.chars().count(),
                content.post_content
            );
        }
        Err(e) => {
            eprintln!("✗ Failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
