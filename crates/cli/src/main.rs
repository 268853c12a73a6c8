// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sb - switchboard for agent terminal sessions

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod dispatch;
mod env;
mod exit_error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{job, peek, send, stop, Context};
use output::OutputFormat;
use sb_engine::Response;

#[derive(Parser)]
#[command(
    name = "sb",
    version,
    about = "Switchboard - drive agent sessions in a terminal multiplexer"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send text to a session or agent
    Send(send::SendArgs),
    /// Inspect and manage send jobs
    Job(job::JobArgs),
    /// Stop a session, an agent, or every agent
    Stop(stop::StopArgs),
    /// Show the tail of a session's pane
    Peek(peek::PeekArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, skipping the cause chain when the top-level
/// message already contains it.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }
    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let state_dir = env::state_dir()?;
    let _guard = logging::setup_logging(&state_dir)?;
    let ctx = Context::new(state_dir, cli.output);

    let response = dispatch(cli.command, &ctx).await;
    tracing::debug!(
        exit_code = response.exit_code,
        replayed = response.replayed,
        "command finished"
    );
    emit(&response);

    if response.exit_code != 0 {
        return Err(exit_error::ExitError::silent(response.exit_code).into());
    }
    Ok(())
}

async fn dispatch(command: Commands, ctx: &Context) -> Response {
    match command {
        Commands::Send(args) => send::handle(args, ctx).await,
        Commands::Job(args) => job::handle(args.command, ctx).await,
        Commands::Stop(args) => stop::handle(args, ctx).await,
        Commands::Peek(args) => peek::handle(args, ctx).await,
    }
}

/// Successful output goes to stdout, errors to stderr.
fn emit(response: &Response) {
    if response.exit_code == 0 {
        print!("{}", response.body);
    } else {
        eprint!("{}", response.body);
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
