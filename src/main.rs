use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use smartcv_client::{
    Config, EndpointResolver, HttpTransport, Shell, SummarizationResult, SummaryClient,
    SummaryView,
};

/// Summarize work experience into an ATS-friendly CV summary.
///
/// Without INPUT an interactive session starts: type or paste your experience,
/// press Enter on an empty line to submit, and type :quit to exit.
///
/// Backend URL: $SMARTCV_BACKEND_URL, then $GITPOD_WORKSPACE_URL, then
/// http://localhost:8000 (see smartcv.yaml / SMARTCV_* variables).
#[derive(Debug, Parser)]
#[command(name = "smartcv", version)]
struct Cli {
    /// File with the experience text to submit once; `-` reads stdin
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the summary
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();

    // Resolved once; shared read-only for the rest of the session
    let endpoint = Arc::new(EndpointResolver::from_config(&config.endpoint).resolve());
    let transport = Arc::new(HttpTransport::new(&config.client.user_agent)?);
    let client = SummaryClient::new(endpoint, &config.endpoint.predict_host_fragment, transport);
    let mut shell = Shell::new(client);
    let view = SummaryView::new();

    match cli.input {
        Some(source) => {
            let text = read_source(&source).await?;
            shell.set_input(text);
            if !run_once(&mut shell, &view).await {
                return Ok(ExitCode::FAILURE);
            }
        }
        None => interactive(&mut shell, &view).await?,
    }

    Ok(ExitCode::SUCCESS)
}

async fn read_source(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read {}", source.display()))
    }
}

/// Submit the shell's current input and print the outcome. Returns true on success.
async fn run_once(shell: &mut Shell, view: &SummaryView) -> bool {
    if !shell.can_submit() {
        return false;
    }

    eprintln!("{}", "Processing your request...".cyan());
    let outcome = match shell.submit().await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}", e.to_string().yellow());
            return false;
        }
    };

    match &outcome.result {
        SummarizationResult::Success { .. } => {
            print!("{}", view.format(&shell.blocks()));
            eprintln!(
                "{}",
                format!(
                    "Generated in {:.1}s",
                    outcome.elapsed().num_milliseconds() as f64 / 1000.0
                )
                .dimmed()
            );
            true
        }
        SummarizationResult::Failure { message } => {
            eprintln!("{}", view.format_error(message));
            false
        }
    }
}

async fn interactive(shell: &mut Shell, view: &SummaryView) -> Result<()> {
    let endpoint = shell.client().endpoint();
    println!("{}", "SmartCV Generator".bright_cyan().bold());
    println!(
        "{}",
        format!(
            "Backend: {} ({}, {})",
            endpoint.base_url,
            endpoint.source,
            shell.client().variant()
        )
        .dimmed()
    );
    println!("Enter your work experience. Submit with an empty line, :quit to exit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buffer = String::new();

    while let Some(line) = lines.next_line().await? {
        if line.trim() == ":quit" {
            break;
        }
        if !line.trim().is_empty() {
            buffer.push_str(&line);
            buffer.push('\n');
            continue;
        }
        if buffer.trim().is_empty() {
            continue;
        }

        shell.set_input(std::mem::take(&mut buffer));
        run_once(shell, view).await;
        println!();
    }

    if !buffer.trim().is_empty() {
        shell.set_input(buffer);
        run_once(shell, view).await;
    }

    Ok(())
}
