//! # PinCorp Console Library
//!
//! Core library for the `pincorp` workshop console. The binary only calls
//! [`run`]; everything else lives here so it can be tested.
//!
//! ## Module Organization
//! ```text
//! pincorp_console/
//! ├── lib.rs          ◄─── You are here (logging & run)
//! ├── cli.rs          ◄─── clap subcommands and dispatch
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── desk.rs     ◄─── Sales desk (cart, discount, customer, payment)
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── materials.rs, boms.rs, production.rs
//! │   ├── products.rs, customers.rs
//! │   └── sales.rs, reports.rs, config.rs
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! Instead of a single `AppState` struct, there are three focused state
//! types, and each command takes only the ones it needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Console State                                        │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐     │
//! │  │    Store         │ │  SalesDeskState  │ │    ConfigState       │     │
//! │  │                  │ │                  │ │                      │     │
//! │  │  • Collections   │ │  • Cart lines    │ │  • Data path         │     │
//! │  │  • Repositories  │ │  • Discount      │ │  • Low margin        │     │
//! │  │  • Snapshot file │ │  • Customer      │ │  • Report offset     │     │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use state::ConfigState;

/// Runs the console.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • PINCORP_* environment variables over defaults                     │
/// │     • --data overrides the snapshot path                                │
/// │                                                                         │
/// │  3. Execute Command ──────────────────────────────────────────────────► │
/// │     • Open the store from the snapshot (empty when missing)             │
/// │     • Mutations autosave the snapshot before committing                 │
/// │                                                                         │
/// │  4. Report ───────────────────────────────────────────────────────────► │
/// │     • Success: JSON on stdout, exit 0                                   │
/// │     • Failure: ApiError JSON on stderr, exit 1                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let mut config = ConfigState::from_env();
    if let Some(path) = cli.data {
        config.data_path = path;
    }

    info!(data = %config.data_path.display(), "Starting PinCorp console");

    match cli::execute(cli.command, &config) {
        Ok(value) => {
            print_json(&value);
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!(code = ?err.code, "Command failed");
            eprintln!("{}", to_pretty_json(&err));
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", to_pretty_json(value));
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"code":"INTERNAL","message":"{e}"}}"#))
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so stdout carries only command output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pincorp_store=trace` - Show trace for the store only
/// - Default: INFO, DEBUG for the `pincorp*` crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pincorp=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
