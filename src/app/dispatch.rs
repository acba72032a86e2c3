use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use std::io::{IsTerminal, Read};
use std::sync::Arc;

use mailtone::Config;
use mailtone::diff::{highlight_differences, render_marked, render_terminal};
use mailtone::history::create_history_store;
use mailtone::providers::{self, Provider};
use mailtone::rewrite::{RewriteOrchestrator, RewriteRequest, SubjectRequest};
use mailtone::ui::style;

fn orchestrator(config: &Config) -> Result<RewriteOrchestrator> {
    let provider: Arc<dyn Provider> = Arc::from(
        providers::create_provider(config).context("create chat-completion provider")?,
    );
    Ok(RewriteOrchestrator::new(provider, config))
}

fn read_source_text(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("read email text from stdin")?;
    Ok(buf)
}

async fn run_rewrite(config: &Config, request: RewriteRequest) -> Result<()> {
    let candidates = orchestrator(config)?
        .rewrite_email(&request)
        .await
        .context("Failed to rewrite email")?;

    let colored = std::io::stdout().is_terminal();
    for (i, candidate) in candidates.iter().enumerate() {
        let tokens = highlight_differences(&request.source_text, &candidate.email);
        let rendered = if colored {
            render_terminal(&tokens)
        } else {
            render_marked(&tokens)
        };
        println!(
            "{} {}",
            style::accent(format!("{}.", i + 1)),
            style::header(format!("Option {}", i + 1))
        );
        println!("{rendered}");
        println!("{}", style::dim(&candidate.explanation));
        println!();
    }
    Ok(())
}

async fn run_subject(config: &Config, request: SubjectRequest) -> Result<()> {
    let subjects = orchestrator(config)?
        .rewrite_subject(&request)
        .await
        .context("Failed to rewrite subject")?;

    for (i, subject) in subjects.iter().enumerate() {
        println!("{} {}", style::accent(format!("{}.", i + 1)), style::value(subject));
    }
    Ok(())
}

async fn run_history(config: &Config, limit: usize) -> Result<()> {
    let store = create_history_store(config)
        .await
        .context("Failed to load version history")?;
    let entries = store
        .recent(limit)
        .await
        .context("Failed to load version history")?;

    if entries.is_empty() {
        println!("{}", style::yellow("No saved versions yet."));
        return Ok(());
    }

    for entry in entries {
        println!(
            "{} {}",
            style::header(format!("{} / {}", entry.tone, entry.length)),
            style::dim(&entry.created_at)
        );
        println!("{}", entry.rewritten_email);
        println!();
    }
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Arc<Config>) -> Result<()> {
    match cli.command {
        Commands::Gateway { port, host } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            mailtone::gateway::run_gateway(&host, port, config).await
        }

        Commands::Rewrite {
            text,
            mode,
            purpose,
            tone,
            length,
            audience,
        } => {
            let request = RewriteRequest {
                source_text: read_source_text(text)?,
                purpose,
                tone,
                length,
                audience,
                mode,
            };
            run_rewrite(&config, request).await
        }

        Commands::Subject {
            subject,
            tone,
            audience,
        } => {
            run_subject(
                &config,
                SubjectRequest {
                    subject,
                    tone,
                    audience,
                },
            )
            .await
        }

        Commands::History { limit } => run_history(&config, limit).await,
    }
}
