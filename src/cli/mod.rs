//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod config;
mod console;
mod logging;
mod version;

pub use commands::{FavSubcommand, Session, handle_fav_command};
pub use config::{ConfigSubcommand, handle_config_command};
pub use console::ConsoleNotifier;
pub use logging::init_logging;
pub use version::display_version;
