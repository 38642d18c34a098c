//! Summarize a local file from the command line.
//!
//! Shares the library pipeline with the server: extraction, chunking, and the
//! remote/local summarization split all behave exactly as they do behind the
//! `/upload` endpoint. Handy for smoke-testing a credential or eyeballing
//! fallback output without running the server.

use clap::Parser;
use docsum::config::Config;
use docsum::extract::extract_text;
use docsum::summarize::{Summarizer, SummarizerSettings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "summarize-file",
    about = "Extract text from a file and print its summary"
)]
struct Args {
    /// File to summarize.
    path: PathBuf,

    /// Skip the remote service even when a credential is configured.
    #[arg(long)]
    local_only: bool,

    /// Print the extracted text before the summary.
    #[arg(long)]
    show_text: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");

    let summarizer = if args.local_only {
        Summarizer::new(SummarizerSettings::from_config(&config), None)
    } else {
        Summarizer::from_config(&config)
    };

    let text = extract_text(&args.path).await;
    if args.show_text {
        println!("--- extracted text ---");
        println!("{text}");
        println!("--- summary ---");
    }
    println!("{}", summarizer.summarize(&text).await);
}
