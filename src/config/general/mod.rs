mod log_level;

pub use log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// General settings that affect the whole binary, such as logging.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GeneralConfig {
    /// Logging level for the application.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Also write daily-rotated log files to the log directory.
    #[serde(default)]
    pub log_to_file: bool,
}
