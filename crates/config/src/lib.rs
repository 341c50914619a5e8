//! Layered configuration for the shelf.
//!
//! Values are merged from, lowest priority first:
//! 1. built-in defaults (`books_data.csv` and `books/`, relative to the
//!    working directory),
//! 2. the user's config file (`config.toml` in the platform config
//!    directory), if there is one,
//! 3. a config file passed explicitly by the caller (TOML, YAML or JSON),
//! 4. environment variables prefixed with `SHELF_`, e.g. `SHELF_DATA_FILE`.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_DATA_FILE: &str = "books_data.csv";
pub const DEFAULT_COVERS_DIR: &str = "books";
pub const ENV_PREFIX: &str = "SHELF_";

/// Where the shelf keeps its record table and cover images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The CSV record table.
    pub data_file: PathBuf,
    /// Directory holding cover images.
    pub covers_dir: PathBuf,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            covers_dir: PathBuf::from(DEFAULT_COVERS_DIR),
        }
    }
}

impl Config {
    /// Loads configuration from every layer, including `file` when given.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(file)?)
    }

    /// The standard provider stack, for callers that want to add their own
    /// providers before extracting.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(user_file) = Self::default_file() {
            // Missing files are skipped by figment.
            figment = figment.merge(Toml::file(user_file));
        }
        if let Some(file) = file {
            if !file.is_file() {
                exn::bail!(ErrorKind::MissingFile(file.to_path_buf()));
            }
            figment = match file.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
                Some("toml") => figment.merge(Toml::file(file)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(file)),
                Some("json") => figment.merge(Json::file(file)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(file.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extracts and validates a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Extract)?;
        config.validate()?;
        debug!(
            data_file = %config.data_file.display(),
            covers_dir = %config.covers_dir.display(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Location of the per-user config file, whether or not it exists.
    pub fn default_file() -> Option<PathBuf> {
        ProjectDirs::from("", "", "shelf").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            exn::bail!(ErrorKind::EmptyPath("data_file"));
        }
        if self.covers_dir.as_os_str().is_empty() {
            exn::bail!(ErrorKind::EmptyPath("covers_dir"));
        }
        if self.data_file == self.covers_dir {
            exn::bail!(ErrorKind::SamePath);
        }
        if self.data_file.starts_with(&self.covers_dir) {
            exn::bail!(ErrorKind::DataFileInCoversDir);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;
    use std::fs;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|jail| {
            let dir = jail.directory().to_path_buf();
            jail.set_env("XDG_CONFIG_HOME", dir.display());
            let config = Config::load(None).unwrap();
            assert_eq!(config, Config::default());
            assert_eq!(config.data_file, Path::new("books_data.csv"));
            assert_eq!(config.covers_dir, Path::new("books"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            let dir = jail.directory().to_path_buf();
            jail.set_env("XDG_CONFIG_HOME", dir.display());
            jail.create_file("shelf.toml", "data_file = \"from_file.csv\"\ncovers_dir = \"covers\"")?;
            jail.set_env("SHELF_DATA_FILE", "from_env.csv");
            let config = Config::load(Some(Path::new("shelf.toml"))).unwrap();
            assert_eq!(config.data_file, Path::new("from_env.csv"));
            assert_eq!(config.covers_dir, Path::new("covers"));
            Ok(())
        });
    }

    #[test]
    fn test_env_validation() {
        Jail::expect_with(|jail| {
            let dir = jail.directory().to_path_buf();
            jail.set_env("XDG_CONFIG_HOME", dir.display());
            jail.set_env("SHELF_COVERS_DIR", "books_data.csv");
            let err = Config::load(None).unwrap_err();
            assert_eq!(*err, ErrorKind::SamePath);
            Ok(())
        });
    }

    #[rstest]
    #[case("shelf.yaml", "covers_dir: images\n")]
    #[case("shelf.yml", "covers_dir: images\n")]
    #[case("shelf.json", "{\"covers_dir\": \"images\"}")]
    #[case("shelf.toml", "covers_dir = \"images\"")]
    fn test_file_formats(#[case] name: &str, #[case] contents: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(match name {
            n if n.ends_with(".json") => Figment::from(Json::file(&path)),
            n if n.ends_with(".toml") => Figment::from(Toml::file(&path)),
            _ => Figment::from(Yaml::file(&path)),
        });
        let config = Config::from_figment(figment).unwrap();
        assert_eq!(config.covers_dir, Path::new("images"));
        assert_eq!(config.data_file, Path::new(DEFAULT_DATA_FILE));
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(*Config::figment(Some(&missing)).unwrap_err(), ErrorKind::MissingFile(missing));

        let ini = dir.path().join("shelf.ini");
        fs::write(&ini, "covers_dir=images").unwrap();
        assert_eq!(*Config::figment(Some(&ini)).unwrap_err(), ErrorKind::UnsupportedFormat(ini));
    }

    #[rstest]
    #[case("", "books", ErrorKind::EmptyPath("data_file"))]
    #[case("books_data.csv", "", ErrorKind::EmptyPath("covers_dir"))]
    #[case("same", "same", ErrorKind::SamePath)]
    #[case("books/books_data.csv", "books", ErrorKind::DataFileInCoversDir)]
    #[case("library/books_data.csv", "library/covers", ErrorKind::DataFileInCoversDir)]
    fn test_validate(#[case] data_file: &str, #[case] covers_dir: &str, #[case] expected: ErrorKind) {
        let config = Config { data_file: data_file.into(), covers_dir: covers_dir.into() };
        assert_eq!(*config.validate().unwrap_err(), expected);
    }

    #[test]
    fn test_bad_values_fail_extraction() {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Serialized::default("covers_dir", vec![1, 2, 3]));
        assert_eq!(*Config::from_figment(figment).unwrap_err(), ErrorKind::Extract);
    }
}
