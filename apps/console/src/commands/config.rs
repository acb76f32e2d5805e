//! # Config Commands
//!
//! Retrieval of the shell configuration.

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current configuration.
///
/// ## When Used
/// - Operator checks which data file is in use
/// - Currency formatting and report time zone
///
/// ## Returns
/// Complete configuration state (read-only)
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
