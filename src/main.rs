// src/main.rs
// =============================================================================
// This is the entry point of the link-sentry CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the subcommand handler
// 4. Print results and exit with a code (0 = clean, 1 = broken links, 2 = error)
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tokio::io::AsyncReadExt;

use link_sentry::api::{ApiError, CheckLinksHandler, StaticTokenTable};
use link_sentry::checker::{
    normalize, BatchOrchestrator, BatchResult, LinkProber, ProbeOutcome, ReqwestTransport,
};
use link_sentry::cli::{CheckerArgs, Cli, Commands};
use link_sentry::logging;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match cli.command {
        Commands::Check {
            input,
            token,
            tokens,
            json,
            checker,
        } => handle_check(&input, token, tokens, json, &checker).await,
        Commands::Probe { url, checker } => handle_probe(&url, &checker).await,
    }
}

// Handles the 'check' subcommand
//
// The file contents go through the same boundary an HTTP front end would use:
// token check, body validation, then the batch engine.
async fn handle_check(
    input: &Path,
    token: Option<String>,
    tokens: Vec<(String, String)>,
    json: bool,
    args: &CheckerArgs,
) -> Result<i32> {
    let body = read_input(input).await?;

    let verifier = if tokens.is_empty() {
        StaticTokenTable::builtin()
    } else {
        StaticTokenTable::new(tokens)
    };
    let orchestrator =
        BatchOrchestrator::new(args.to_config()).context("Invalid checker settings")?;
    let handler = CheckLinksHandler::new(verifier, orchestrator);

    let authorization = token.map(|t| format!("Bearer {}", t));
    match handler.handle(authorization.as_deref(), &body).await {
        Ok(result) => {
            print_results(&result, json)?;
            Ok(if result.is_clean() { 0 } else { 1 })
        }
        Err(error) => {
            print_rejection(&error, json)?;
            Ok(2)
        }
    }
}

// Handles the 'probe' subcommand
async fn handle_probe(url: &str, args: &CheckerArgs) -> Result<i32> {
    let config = args.to_config();
    config.validate().context("Invalid checker settings")?;

    let transport = ReqwestTransport::new(&config).context("Failed to build HTTP client")?;
    let prober = LinkProber::new(transport, config.normalize);

    println!("🔍 Probing {}", normalize(url, config.normalize));

    match prober.probe(url).await {
        ProbeOutcome::Healthy => {
            println!("✅ OK");
            Ok(0)
        }
        ProbeOutcome::Broken { reason } => {
            println!("❌ BROKEN: {}", reason);
            Ok(1)
        }
    }
}

// "-" means stdin
async fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut body = String::new();
        tokio::io::stdin()
            .read_to_string(&mut body)
            .await
            .context("Failed to read links from stdin")?;
        Ok(body)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}

fn print_results(result: &BatchResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_table(result);
    }
    Ok(())
}

fn print_rejection(error: &ApiError, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&error.body())?);
    }
    eprintln!("Request rejected ({}): {}", error.status_code(), error);
    Ok(())
}

fn print_table(result: &BatchResult) {
    if result.is_clean() {
        println!("✅ No broken links found");
        return;
    }

    println!("{:<12} {:<6} {:<60} {:<25}", "SKU", "PAIS", "URL", "STATUS");
    println!("{}", "=".repeat(105));

    for report in &result.broken_links {
        let url_display = if report.original_url.chars().count() > 57 {
            format!("{}...", report.original_url.chars().take(57).collect::<String>())
        } else {
            report.original_url.clone()
        };

        println!(
            "{:<12} {:<6} {:<60} {:<25}",
            report.sku.as_deref().unwrap_or("-"),
            report.country.as_deref().unwrap_or("-"),
            url_display,
            report.status_reason
        );
    }

    println!();
    println!("❌ Broken: {}", result.count);
}
