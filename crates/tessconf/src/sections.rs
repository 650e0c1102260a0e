//! Configuration sections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which files a directory batch picks up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// File extensions, matched case-insensitively.
    /// Default: ["mid", "midi"]
    #[serde(default = "InputConfig::default_extensions")]
    pub extensions: Vec<String>,
}

impl InputConfig {
    fn default_extensions() -> Vec<String> {
        vec!["mid".to_string(), "midi".to_string()]
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: Self::default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format {:?} (expected svg or json)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Svg => "svg",
            Self::Json => "json",
        })
    }
}

/// Where and how the figure is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory figures are written to.
    /// Default: current directory
    #[serde(default = "OutputConfig::default_dir")]
    pub dir: PathBuf,

    /// Default: svg
    #[serde(default)]
    pub format: OutputFormat,
}

impl OutputConfig {
    fn default_dir() -> PathBuf {
        PathBuf::from(".")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
            format: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string.
    /// Default: info
    #[serde(default = "LoggingConfig::default_log_level")]
    pub log_level: String,
}

impl LoggingConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}

/// Three inclusive MIDI spans for a configured voice part. Band ordering is
/// checked when the catalog is built, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub lower: (u8, u8),
    pub comfortable: (u8, u8),
    pub upper: (u8, u8),
}
