//! Default configuration values

use super::schema::Config;

pub const DEFAULT_KUBECTL: &str = "kubectl";

/// Get the default configuration
pub fn default_config() -> Config {
    Config::default()
}
