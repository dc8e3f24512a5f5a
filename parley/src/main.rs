#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;
use args::{Args, Command};
use clap::Parser;
use parley_bridge::{ConversationRequest, ConverterRegistry, Item, Session};
use parley_config::Config;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = args.config.as_deref().map(Config::load).transpose()?;

    parley_telemetry::init(
        config.as_ref().and_then(|c| c.telemetry.as_ref()),
        args.log.as_deref(),
    )?;

    let registry = match config {
        Some(ref config) => ConverterRegistry::from_config(config),
        None => ConverterRegistry::with_defaults(),
    };
    let default_provider = config.as_ref().and_then(Config::default_provider);

    let output = match args.command {
        Command::Request {
            provider,
            request,
            history,
            session,
        } => {
            let provider = resolve_provider(provider.as_deref(), default_provider)?;
            let converter = registry.get(provider)?;

            let request: ConversationRequest = serde_json::from_slice(&read_input(&request)?)
                .with_context(|| format!("invalid canonical request in {}", request.display()))?;
            let items: Vec<Item> = match history {
                Some(ref path) => serde_json::from_slice(&read_input(path)?)
                    .with_context(|| format!("invalid session history in {}", path.display()))?,
                None => Vec::new(),
            };

            tracing::info!(provider, session_id = %session, history_len = items.len(), "converting request");

            converter.to_provider_request(&Session::with_history(session, items), &request)?
        }
        Command::Response {
            provider,
            payload,
            session,
        } => {
            let provider = resolve_provider(provider.as_deref(), default_provider)?;
            let converter = registry.get(provider)?;

            tracing::info!(provider, session_id = %session, "converting response");

            let response = converter.from_provider_response(&read_input(&payload)?, &session)?;
            serde_json::to_value(response)?
        }
    };

    write_output(&output, args.pretty)
}

fn resolve_provider<'a>(explicit: Option<&'a str>, configured: Option<&'a str>) -> anyhow::Result<&'a str> {
    explicit
        .or(configured)
        .context("no provider given; pass --provider or set default_provider in the configuration")
}

/// Read a file, or stdin when the path is `-`
fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(value: &serde_json::Value, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write output")?;
    Ok(())
}
