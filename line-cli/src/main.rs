//! linebot CLI: serve the LINE webhook, verify a saved delivery's signature. Config from env and optional flags.

use anyhow::Result;
use clap::Parser;
use line_bot::run_server;
use line_cli::{check_signature, load_config, load_llm_config, Cli, Commands};
use llm_client::LlmConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            max_concurrency,
        } => {
            let config = load_config(bind, max_concurrency)?;
            let llm_config = load_llm_config(&config)?;
            run_server(config, llm_config.as_ref().map(|c| c as &dyn LlmConfig)).await
        }
        Commands::VerifySignature {
            body,
            signature,
            secret,
        } => {
            if check_signature(&body, &signature, secret)? {
                println!("signature OK");
                Ok(())
            } else {
                anyhow::bail!("signature mismatch")
            }
        }
    }
}
