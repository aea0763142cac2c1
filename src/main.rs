//! Music Sessions MCP Server - Main Entry Point
//!
//! The actual implementation is in the `sessions_mcp` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::info;
use mcp_attr::server::serve_stdio;
use sessions_mcp::SessionsServerHandler;

/// Music Sessions MCP Server - track songs, production tasks and projects via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the sessions data file (TOML)
    file: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // No arguments: show help and exit with an error code
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    // stdout carries the MCP stream, logs go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let handler = SessionsServerHandler::new(&args.file)?;
    info!("serving {} over stdio", args.file);
    serve_stdio(handler).await?;
    Ok(())
}
