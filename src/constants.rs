//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Application name
pub const APP_NAME: &str = "Callisto";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Method used when a command line carries no `-X` flag
pub const DEFAULT_METHOD: &str = "GET";

/// Methods whose body is emitted when building a command line
pub const BODY_METHODS: [&str; 3] = ["POST", "PUT", "PATCH"];

/// Default value of the preset `User-Agent` header
pub const DEFAULT_USER_AGENT: &str = concat!("Callisto/", env!("CARGO_PKG_VERSION"));

/// Directory (under the platform config dir) holding the config file
pub const CONFIG_DIR_NAME: &str = "callisto";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file written by the binary
pub const LOG_FILE_NAME: &str = "callisto.log";

/// Environment variable holding the tracing filter
pub const LOG_ENV: &str = "CALLISTO_LOG";
