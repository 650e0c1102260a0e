//! Configuration loading for tessitura.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/tessitura/config.toml` (system)
//! 2. `~/.config/tessitura/config.toml` (user)
//! 3. `./tessitura.toml` (local override, replaced by `--config` when given)
//! 4. Environment variables (`TESSITURA_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [input]
//! extensions = ["mid", "midi", "kar"]
//!
//! [output]
//! dir = "~/charts"
//! format = "svg"
//!
//! [logging]
//! log_level = "info"
//!
//! [voices."Countertenor"]
//! lower = [52, 54]
//! comfortable = [55, 72]
//! upper = [73, 76]
//!
//! [aliases]
//! "haute-contre" = "Countertenor"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, ConfigLayer, ConfigSources};
pub use sections::{InputConfig, LoggingConfig, OutputConfig, OutputFormat, VoiceConfig};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value in {origin}: {message}")]
    Invalid { origin: String, message: String },
}

/// Complete tessitura configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TessConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Extra or replacement voice parts, in file order.
    #[serde(default)]
    pub voices: Vec<(String, VoiceConfig)>,

    /// Extra `(substring, canonical part)` aliases.
    #[serde(default)]
    pub aliases: Vec<(String, String)>,
}

impl TessConfig {
    /// Load configuration, with `config_path` replacing `./tessitura.toml`,
    /// and report which files and env variables contributed.
    pub fn load_with_sources_from(
        config_path: Option<&std::path::Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = TessConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            let layer = loader::load_from_file(&path)?;
            config = loader::merge_configs(config, layer);
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources)?;

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        // Built by hand for stable section order and inline span arrays
        let mut output = String::new();

        output.push_str("# tessitura configuration\n\n");

        output.push_str("[input]\n");
        let extensions: Vec<String> = self
            .input
            .extensions
            .iter()
            .map(|e| format!("\"{}\"", e))
            .collect();
        output.push_str(&format!("extensions = [{}]\n", extensions.join(", ")));

        output.push_str("\n[output]\n");
        output.push_str(&format!("dir = \"{}\"\n", self.output.dir.display()));
        output.push_str(&format!("format = \"{}\"\n", self.output.format));

        output.push_str("\n[logging]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.logging.log_level));

        for (name, voice) in &self.voices {
            output.push_str(&format!("\n[voices.\"{}\"]\n", name));
            output.push_str(&format!("lower = [{}, {}]\n", voice.lower.0, voice.lower.1));
            output.push_str(&format!(
                "comfortable = [{}, {}]\n",
                voice.comfortable.0, voice.comfortable.1
            ));
            output.push_str(&format!("upper = [{}, {}]\n", voice.upper.0, voice.upper.1));
        }

        if !self.aliases.is_empty() {
            output.push_str("\n[aliases]\n");
            for (alias, target) in &self.aliases {
                output.push_str(&format!("\"{}\" = \"{}\"\n", alias, target));
            }
        }

        output
    }
}
