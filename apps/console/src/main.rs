//! # PinCorp Console Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (environment, then `--data`)
//! 3. Open the store from its snapshot
//! 4. Run one command and print the result as JSON

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    pincorp_console::run()
}
