//! Configuration loading for the stone tools.
//!
//! `defaults/stone.default.toml` is embedded into the binary and always loaded first.
//! User files and command line overrides are layered on top with [`Loader`] before
//! the result is deserialized into [`StoneConfig`]. Overrides always win over files,
//! whatever order they were added in.

use crate::stone::lexing::LexerOptions;
use config::{Config, ConfigError, File, FileFormat, Value};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../../defaults/stone.default.toml");

/// Name of the per-directory configuration file
pub const LOCAL_FILE: &str = "stone.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct StoneConfig {
    pub lexer: LexerOptions,
    pub output: OutputConfig,
}

/// How `stone parse` renders trees
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Name of a format in the format registry
    pub format: String,
    pub show_lines: bool,
}

impl StoneConfig {
    /// Reject settings the basic grammar cannot parse with.
    ///
    /// Statements are separated by `;` or end-of-line tokens, so turning the latter off
    /// is only meaningful for dumping tokens.
    pub fn check_parse(&self) -> Result<(), ConfigError> {
        if !self.lexer.emit_eol {
            return Err(ConfigError::Message(
                "lexer.emit_eol = false is only supported by `stone tokens`; \
                 the basic grammar separates statements with end-of-line tokens"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// A user file layered over the defaults
#[derive(Debug, Clone)]
struct Layer {
    path: PathBuf,
    required: bool,
}

/// Collects user files and overrides, applied in order over the embedded defaults.
///
/// Nothing is read until [`Loader::build`], so a loader can be assembled from CLI
/// arguments before any file is known to exist.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    layers: Vec<Layer>,
    overrides: Vec<(String, Value)>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus `stone.toml` from `dir`, if there is one.
    pub fn discover(dir: impl AsRef<Path>) -> Self {
        Self::new().with_optional_file(dir.as_ref().join(LOCAL_FILE))
    }

    /// Layer a file that has to exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path, true)
    }

    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path, false)
    }

    /// Override one dotted key, e.g. `output.format`. Applied after every file.
    pub fn set_override(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.overrides.push((key.to_string(), value.into()));
        self
    }

    pub fn build(&self) -> Result<StoneConfig, ConfigError> {
        let mut builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        for layer in &self.layers {
            builder = builder.add_source(
                File::from(layer.path.as_path())
                    .format(FileFormat::Toml)
                    .required(layer.required),
            );
        }
        for (key, value) in &self.overrides {
            builder = builder.set_override(key.as_str(), value.clone())?;
        }
        let config: StoneConfig = builder.build()?.try_deserialize()?;
        log::debug!(
            "configuration loaded from {} file(s) and {} override(s)",
            self.layers.len(),
            self.overrides.len()
        );
        Ok(config)
    }

    fn layer(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.layers.push(Layer {
            path: path.as_ref().to_path_buf(),
            required,
        });
        self
    }
}

pub fn load_defaults() -> Result<StoneConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.lexer.emit_eol);
        assert_eq!(config.output.format, "sexp");
        assert!(!config.output.show_lines);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.format", "treeviz")
            .set_override("lexer.emit_eol", false)
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "treeviz");
        assert!(!config.lexer.emit_eol);
    }

    #[test]
    fn layers_user_file() {
        let path = std::env::temp_dir().join(format!("stone-config-{}.toml", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).expect("temp file");
            writeln!(file, "[output]\nshow_lines = true").expect("write config");
        }
        let config = Loader::new().with_file(&path).build().expect("config to build");
        std::fs::remove_file(&path).ok();

        assert!(config.output.show_lines);
        assert_eq!(config.output.format, "sexp");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/stone.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "sexp");
    }

    #[test]
    fn missing_required_file_fails() {
        assert!(Loader::new()
            .with_file("/nonexistent/stone.toml")
            .build()
            .is_err());
    }

    #[test]
    fn overrides_beat_later_files() {
        let dir = std::env::temp_dir().join(format!("stone-override-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("override.toml");
        std::fs::write(&path, "[output]\nformat = \"yaml\"\n").expect("write config");

        let config = Loader::new()
            .set_override("output.format", "json")
            .with_file(&path)
            .build()
            .expect("config to build");
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(config.output.format, "json");
    }

    #[test]
    fn discovers_local_file() {
        let dir = std::env::temp_dir().join(format!("stone-discover-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        std::fs::write(dir.join(LOCAL_FILE), "[output]\nformat = \"treeviz\"\n")
            .expect("write config");

        let found = Loader::discover(&dir).build().expect("config to build");
        std::fs::remove_dir_all(&dir).ok();
        let missing = Loader::discover(&dir).build().expect("config to build");

        assert_eq!(found.output.format, "treeviz");
        assert_eq!(missing.output.format, "sexp");
    }

    #[test]
    fn parsing_requires_end_of_line_tokens() {
        assert!(load_defaults().expect("defaults").check_parse().is_ok());

        let config = Loader::new()
            .set_override("lexer.emit_eol", false)
            .build()
            .expect("config to build");
        let err = config.check_parse().unwrap_err();
        assert!(err.to_string().contains("only supported by `stone tokens`"));
    }
}
