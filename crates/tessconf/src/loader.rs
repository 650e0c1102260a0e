//! Config file discovery, loading, and environment variable overlay.

use crate::sections::{OutputFormat, VoiceConfig};
use crate::{ConfigError, TessConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// The keys one config file actually sets. `None` leaves the value below untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer {
    pub extensions: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<String>,
    /// In file order.
    pub voices: Vec<(String, VoiceConfig)>,
    /// In file order, aliases lowercased.
    pub aliases: Vec<(String, String)>,
}

/// Discover config files, with `cli_path` replacing the local override.
///
/// Returns paths in load order (system, user, then `--config` or
/// `./tessitura.toml`). Only returns files that exist; a `cli_path` that
/// does not exist falls back to the local file.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut shared = vec![PathBuf::from("/etc/tessitura/config.toml")];

    // XDG_CONFIG_HOME or ~/.config
    if let Some(dirs) = directories::BaseDirs::new() {
        shared.push(dirs.config_dir().join("tessitura/config.toml"));
    }

    discover(&shared, Path::new("tessitura.toml"), cli_path)
}

fn discover(shared: &[PathBuf], local: &Path, cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = shared.iter().filter(|p| p.exists()).cloned().collect();

    let last = match cli_path {
        Some(path) if path.exists() => path,
        _ => local,
    };
    if last.exists() {
        files.push(last.to_path_buf());
    }

    files
}

/// Load one config layer from a TOML file.
pub fn load_from_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path)
}

/// Parse one config layer from a TOML string.
pub(crate) fn parse_toml(contents: &str, path: &Path) -> Result<ConfigLayer, ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let origin = path.display().to_string();
    let invalid = |message: String| ConfigError::Invalid {
        origin: origin.clone(),
        message,
    };

    let mut layer = ConfigLayer::default();

    if let Some(input) = table.get("input").and_then(|v| v.as_table()) {
        if let Some(exts) = input.get("extensions").and_then(|v| v.as_array()) {
            layer.extensions = Some(
                exts.iter()
                    .filter_map(|v| v.as_str())
                    .map(normalize_extension)
                    .filter(|e| !e.is_empty())
                    .collect(),
            );
        }
    }

    if let Some(output) = table.get("output").and_then(|v| v.as_table()) {
        if let Some(v) = output.get("dir").and_then(|v| v.as_str()) {
            layer.output_dir = Some(expand_path(v));
        }
        if let Some(v) = output.get("format").and_then(|v| v.as_str()) {
            layer.format = Some(v.parse().map_err(invalid)?);
        }
    }

    if let Some(logging) = table.get("logging").and_then(|v| v.as_table()) {
        if let Some(v) = logging.get("log_level").and_then(|v| v.as_str()) {
            layer.log_level = Some(v.to_string());
        }
    }

    if let Some(voices) = table.get("voices").and_then(|v| v.as_table()) {
        for (name, voice) in voices {
            let Some(voice) = voice.as_table() else {
                return Err(invalid(format!("voices.{} must be a table", name)));
            };
            let span = |key: &str| -> Result<(u8, u8), ConfigError> {
                voice
                    .get(key)
                    .and_then(parse_span)
                    .ok_or_else(|| invalid(format!("voices.{}.{} must be [low, high] within 0..=127", name, key)))
            };
            layer.voices.push((
                name.clone(),
                VoiceConfig {
                    lower: span("lower")?,
                    comfortable: span("comfortable")?,
                    upper: span("upper")?,
                },
            ));
        }
    }

    if let Some(aliases) = table.get("aliases").and_then(|v| v.as_table()) {
        for (alias, target) in aliases {
            let Some(target) = target.as_str() else {
                return Err(invalid(format!("aliases.{} must name a voice part", alias)));
            };
            layer.aliases.push((alias.to_lowercase(), target.to_string()));
        }
    }

    Ok(layer)
}

fn parse_span(value: &toml::Value) -> Option<(u8, u8)> {
    let array = value.as_array()?;
    if array.len() != 2 {
        return None;
    }
    let note = |v: &toml::Value| v.as_integer().and_then(|n| u8::try_from(n).ok()).filter(|n| *n <= 127);
    Some((note(&array[0])?, note(&array[1])?))
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

/// Apply a file layer on top of `base`.
///
/// Every key the layer sets wins. Voices and aliases accumulate, a later
/// entry replacing an earlier one with the same name in place.
pub fn merge_configs(base: TessConfig, layer: ConfigLayer) -> TessConfig {
    let mut config = base;

    if let Some(extensions) = layer.extensions {
        config.input.extensions = extensions;
    }
    if let Some(dir) = layer.output_dir {
        config.output.dir = dir;
    }
    if let Some(format) = layer.format {
        config.output.format = format;
    }
    if let Some(level) = layer.log_level {
        config.logging.log_level = level;
    }

    for (name, voice) in layer.voices {
        let folded = name.to_lowercase();
        match config.voices.iter_mut().find(|(n, _)| n.to_lowercase() == folded) {
            Some(existing) => existing.1 = voice,
            None => config.voices.push((name, voice)),
        }
    }

    for (alias, target) in layer.aliases {
        match config.aliases.iter_mut().find(|(a, _)| *a == alias) {
            Some(existing) => existing.1 = target,
            None => config.aliases.push((alias, target)),
        }
    }

    config
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(
    config: &mut TessConfig,
    sources: &mut ConfigSources,
) -> Result<(), ConfigError> {
    if let Ok(v) = env::var("TESSITURA_EXTENSIONS") {
        config.input.extensions = v
            .split(',')
            .map(normalize_extension)
            .filter(|e| !e.is_empty())
            .collect();
        sources.env_overrides.push("TESSITURA_EXTENSIONS".to_string());
    }
    if let Ok(v) = env::var("TESSITURA_OUTPUT_DIR") {
        config.output.dir = expand_path(&v);
        sources.env_overrides.push("TESSITURA_OUTPUT_DIR".to_string());
    }
    if let Ok(v) = env::var("TESSITURA_FORMAT") {
        config.output.format = v.parse().map_err(|message| ConfigError::Invalid {
            origin: "TESSITURA_FORMAT".to_string(),
            message,
        })?;
        sources.env_overrides.push("TESSITURA_FORMAT".to_string());
    }
    if let Ok(v) = env::var("TESSITURA_LOG_LEVEL") {
        config.logging.log_level = v;
        sources.env_overrides.push("TESSITURA_LOG_LEVEL".to_string());
    }
    // RUST_LOG wins over everything else for the log filter
    if let Ok(v) = env::var("RUST_LOG") {
        config.logging.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
    Ok(())
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str) -> ConfigLayer {
        parse_toml(toml, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/charts/out");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("charts/out"));
    }

    #[test]
    fn test_expand_path_absolute() {
        assert_eq!(expand_path("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_discover_override_replaces_local() {
        let dir = tempfile::tempdir().unwrap();
        let system = dir.path().join("system.toml");
        let user = dir.path().join("user.toml");
        let local = dir.path().join("tessitura.toml");
        let custom = dir.path().join("custom.toml");
        for path in [&system, &local, &custom] {
            std::fs::write(path, "").unwrap();
        }
        let shared = vec![system.clone(), user];

        assert_eq!(discover(&shared, &local, None), vec![system.clone(), local.clone()]);
        assert_eq!(
            discover(&shared, &local, Some(custom.as_path())),
            vec![system.clone(), custom]
        );
        assert_eq!(
            discover(&shared, &local, Some(dir.path().join("missing.toml").as_path())),
            vec![system, local]
        );
    }

    #[test]
    fn test_parse_minimal_toml() {
        let layer = parse("[output]\ndir = \"/srv/charts\"\n");
        assert_eq!(
            layer,
            ConfigLayer {
                output_dir: Some(PathBuf::from("/srv/charts")),
                ..ConfigLayer::default()
            }
        );
    }

    #[test]
    fn test_parse_full_toml() {
        let layer = parse(
            r#"
[input]
extensions = [".MID", "kar"]

[output]
dir = "/data/out"
format = "json"

[logging]
log_level = "debug"

[voices."Countertenor"]
lower = [52, 54]
comfortable = [55, 72]
upper = [73, 76]

[aliases]
"Haute-contre" = "Countertenor"
"#,
        );

        assert_eq!(layer.extensions, Some(vec!["MID".to_string(), "kar".to_string()]));
        assert_eq!(layer.output_dir, Some(PathBuf::from("/data/out")));
        assert_eq!(layer.format, Some(OutputFormat::Json));
        assert_eq!(layer.log_level.as_deref(), Some("debug"));
        assert_eq!(
            layer.voices,
            vec![(
                "Countertenor".to_string(),
                VoiceConfig {
                    lower: (52, 54),
                    comfortable: (55, 72),
                    upper: (73, 76),
                }
            )]
        );
        assert_eq!(
            layer.aliases,
            vec![("haute-contre".to_string(), "Countertenor".to_string())]
        );
    }

    #[test]
    fn test_voices_and_aliases_keep_file_order() {
        let layer = parse(
            r#"
[voices."Zeta"]
lower = [40, 41]
comfortable = [42, 50]
upper = [51, 52]

[voices."Alpha"]
lower = [60, 61]
comfortable = [62, 70]
upper = [71, 72]

[aliases]
"zz" = "Zeta"
"aa" = "Alpha"
"#,
        );

        let voices: Vec<&str> = layer.voices.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(voices, vec!["Zeta", "Alpha"]);
        let aliases: Vec<&str> = layer.aliases.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(aliases, vec!["zz", "aa"]);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let bad_format = "[output]\nformat = \"png\"\n";
        assert!(matches!(
            parse_toml(bad_format, Path::new("a.toml")),
            Err(ConfigError::Invalid { .. })
        ));

        let bad_span = "[voices.X]\nlower = [1]\ncomfortable = [2, 3]\nupper = [4, 5]\n";
        assert!(matches!(
            parse_toml(bad_span, Path::new("b.toml")),
            Err(ConfigError::Invalid { .. })
        ));

        let out_of_range = "[voices.X]\nlower = [1, 2]\ncomfortable = [3, 4]\nupper = [5, 200]\n";
        assert!(parse_toml(out_of_range, Path::new("c.toml")).is_err());

        assert!(matches!(
            parse_toml("not = [valid", Path::new("d.toml")),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_later_file_wins_even_when_setting_default() {
        let user = parse("[output]\nformat = \"json\"\n[logging]\nlog_level = \"warn\"\n");
        let local = parse("[output]\nformat = \"svg\"\n[logging]\nlog_level = \"info\"\n");

        let merged = merge_configs(merge_configs(TessConfig::default(), user), local);
        assert_eq!(merged.output.format, OutputFormat::Svg);
        assert_eq!(merged.logging.log_level, "info");
    }

    #[test]
    fn test_unset_keys_keep_lower_layer() {
        let user = parse("[output]\ndir = \"/base\"\n[input]\nextensions = [\"kar\"]\n");
        let local = parse("[output]\nformat = \"json\"\n");

        let merged = merge_configs(merge_configs(TessConfig::default(), user), local);
        assert_eq!(merged.output.dir, PathBuf::from("/base"));
        assert_eq!(merged.output.format, OutputFormat::Json);
        assert_eq!(merged.input.extensions, vec!["kar"]);
        assert_eq!(merged.logging.log_level, "info");
    }

    #[test]
    fn test_voices_accumulate_and_replace_by_name() {
        let voice = |lo: u8| VoiceConfig {
            lower: (lo, lo + 1),
            comfortable: (lo + 2, lo + 10),
            upper: (lo + 11, lo + 12),
        };

        let mut base = TessConfig::default();
        base.voices.push(("A".to_string(), voice(40)));
        let layer = ConfigLayer {
            voices: vec![("a".to_string(), voice(50)), ("B".to_string(), voice(60))],
            ..ConfigLayer::default()
        };

        let merged = merge_configs(base, layer);
        assert_eq!(
            merged.voices,
            vec![("A".to_string(), voice(50)), ("B".to_string(), voice(60))]
        );
    }
}
