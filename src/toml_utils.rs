// -- imports
use serde::Deserialize;
use std::path::Path;

use crate::compose::ComposeArgs;
use crate::error::{AppError, Result};
use crate::render::RenderConfigs;

// -- config

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    compose: ComposeArgs,
    render: RenderConfigs,
}

impl TomlConfig {
    /// Parse TOML config file with explicit base directory for path resolution.
    ///
    /// # Arguments
    ///
    /// * `toml_path` - Path to the TOML config file
    /// * `base_dir` - Base directory for resolving relative paths
    ///
    /// # Errors
    ///
    /// Returns `AppError` if:
    /// - The path is not a valid toml file
    /// - File read fails
    /// - TOML parsing fails
    pub fn from_toml(toml_path: &Path, base_dir: &Path) -> Result<Self> {
        if !toml_path.is_file() || toml_path.extension().is_none_or(|ext| ext != "toml") {
            return Err(AppError::Config(format!(
                "TOML config path is not a valid .toml file: {:?}",
                toml_path
            )));
        }

        let content = std::fs::read_to_string(toml_path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.resolve_paths(base_dir);

        // Transfer render config to compose args
        config.compose.render_cfg = config.render.clone();

        Ok(config)
    }

    /// Resolve relative paths against the base directory
    fn resolve_paths(&mut self, base_dir: &Path) {
        let compose = &mut self.compose;
        if !compose.source_dir.is_absolute() {
            compose.source_dir = base_dir.join(&compose.source_dir);
        }
        if !compose.output.is_absolute() {
            compose.output = base_dir.join(&compose.output);
        }

        if let Some(ref mut font) = self.render.label_font {
            if !font.is_absolute() {
                *font = base_dir.join(font.as_path());
            }
        }
    }
}

impl From<TomlConfig> for ComposeArgs {
    fn from(config: TomlConfig) -> Self {
        config.compose
    }
}

// -- public API

/// Parse TOML config file and return ComposeArgs.
///
/// # Arguments
///
/// * `toml_path` - Path to the TOML config file
/// * `base_dir` - Base directory for resolving relative paths
///
/// # Errors
///
/// Returns `AppError` if TOML parsing or path resolution fails.
pub fn parse_toml(toml_path: &Path, base_dir: &Path) -> Result<ComposeArgs> {
    TomlConfig::from_toml(toml_path, base_dir).map(Into::into)
}

// -- tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DecodePolicy, SourceOrder};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_from_toml_with_custom_values() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        let toml_content = r#"
[compose]
source_dir = "graphs"
pattern = "g_*.png"
output = "/tmp/overview.jpg"
order = "Lexicographic"
on_decode_error = "SkipAndWarn"
verbose = true

[render]
cell_units = 3.0
dpi = 50.0
padding = 4
background = [0, 0, 0]
label_font = "fonts/label.ttf"
label_size = 20.0
"#;
        fs::write(&toml_path, toml_content).unwrap();

        let config = TomlConfig::from_toml(&toml_path, temp_dir.path()).unwrap();

        assert_eq!(config.compose.source_dir, temp_dir.path().join("graphs"));
        assert_eq!(config.compose.pattern, "g_*.png");
        assert_eq!(config.compose.output, PathBuf::from("/tmp/overview.jpg"));
        assert_eq!(config.compose.order, SourceOrder::Lexicographic);
        assert_eq!(config.compose.on_decode_error, DecodePolicy::SkipAndWarn);
        assert!(config.compose.verbose);

        assert_eq!(config.render.cell_units, 3.0);
        assert_eq!(config.render.dpi, 50.0);
        assert_eq!(config.render.padding, 4);
        assert_eq!(config.render.background, [0, 0, 0]);
        assert_eq!(
            config.render.label_font,
            Some(temp_dir.path().join("fonts/label.ttf"))
        );
        assert_eq!(config.compose.render_cfg.label_size, 20.0);
    }

    #[test]
    fn test_parse_toml_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        fs::write(&toml_path, "[compose]\n").unwrap();

        let args = parse_toml(&toml_path, temp_dir.path()).unwrap();

        assert_eq!(args.source_dir, temp_dir.path().join("png"));
        assert_eq!(args.pattern, "*.png");
        assert_eq!(args.output, temp_dir.path().join("multi_graph.png"));
        assert_eq!(args.order, SourceOrder::Filesystem);
        assert_eq!(args.on_decode_error, DecodePolicy::Abort);
        assert_eq!(args.render_cfg.padding, 8);
        assert!(args.render_cfg.label_font.is_none());
    }

    #[test]
    fn test_from_toml_invalid_path() {
        let invalid_path = PathBuf::from("/nonexistent/config.toml");
        let base_dir = PathBuf::from("/tmp");
        assert!(TomlConfig::from_toml(&invalid_path, &base_dir).is_err());
    }

    #[test]
    fn test_from_toml_invalid_extension() {
        let temp_dir = TempDir::new().unwrap();
        let invalid_path = temp_dir.path().join("config.txt");
        fs::write(&invalid_path, "[compose]\npattern = \"*.png\"").unwrap();
        assert!(TomlConfig::from_toml(&invalid_path, temp_dir.path()).is_err());
    }

    #[test]
    fn test_parse_toml_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let invalid_toml_path = temp_dir.path().join("invalid.toml");
        fs::write(&invalid_toml_path, "invalid toml [[[").unwrap();
        assert!(parse_toml(&invalid_toml_path, temp_dir.path()).is_err());
    }

    #[test]
    fn test_parse_toml_unknown_policy() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        fs::write(&toml_path, "[compose]\non_decode_error = \"Ignore\"\n").unwrap();

        match parse_toml(&toml_path, temp_dir.path()) {
            Err(AppError::TomlConfig(e)) => assert!(e.to_string().contains("SkipAndWarn")),
            other => panic!("Expected TOML error, got {:?}", other),
        }
    }
}
