//! # scribe-config
//!
//! Layered configuration loading for scribe using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SCRIBE_*` prefix, `__` as separator)
//! 2. Project-level `.scribe/config.toml`
//! 3. User-level `~/.config/scribe/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `SCRIBE_LOADER__DOCSTRING_STYLE` -> `loader.docstring_style`,
//! `SCRIBE_GENERAL__SEARCH_PATHS` -> `general.search_paths`.
//!
//! Requests add two more layers per object, see [`ScribeConfig::resolve_object`]:
//! the request's `global_config`, then the object's own `config`.
//!
//! ```no_run
//! use scribe_config::ScribeConfig;
//!
//! let config = ScribeConfig::load_with_dotenv().expect("config");
//! println!("style: {:?}", config.loader.docstring_style);
//! ```

mod error;
mod general;

pub use error::ConfigError;
pub use general::GeneralConfig;

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use scribe_core::LoaderOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScribeConfig {
    /// Defaults for every requested object.
    #[serde(default)]
    pub loader: LoaderOptions,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl ScribeConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    /// Load configuration, reading `.env` from the working directory first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source is malformed.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load configuration with an extra TOML file layered over the project file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source is malformed.
    pub fn load_with_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let figment = Self::file_layers()
            .merge(Toml::file(path.into()))
            .merge(Self::env());
        Ok(figment.extract()?)
    }

    /// The provider chain; public so tests can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::file_layers().merge(Self::env())
    }

    fn file_layers() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".scribe/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }
        figment
    }

    fn env() -> Env {
        Env::prefixed("SCRIBE_").split("__")
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("scribe").join("config.toml"))
    }

    /// Loader options for one requested object.
    ///
    /// The configured `loader` section is overridden by the request's
    /// `global_config`, itself overridden by the object's `config`. Nested
    /// tables merge key by key; lists are replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a request value has the wrong
    /// shape, e.g. an unknown docstring style.
    pub fn resolve_object(
        &self,
        global_config: &Map<String, Value>,
        object_config: &Map<String, Value>,
    ) -> Result<LoaderOptions, ConfigError> {
        let options = Figment::from(Serialized::defaults(&self.loader))
            .merge(Serialized::defaults(global_config))
            .merge(Serialized::defaults(object_config))
            .extract()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scribe_core::{DocstringStyle, Members};
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn defaults_extract() {
        let config: ScribeConfig = Figment::from(Serialized::defaults(ScribeConfig::default()))
            .extract()
            .expect("should extract defaults");
        assert_eq!(config, ScribeConfig::default());
        assert_eq!(config.loader.docstring_style, DocstringStyle::Google);
        assert!(config.loader.docstring_options.replace_admonitions);
    }

    #[test]
    fn object_config_wins_over_global_config() {
        let config = ScribeConfig::default();
        let options = config
            .resolve_object(
                &map(json!({"filters": ["!^_"], "docstring_style": "numpy", "members": true})),
                &map(json!({"members": ["a", "b"]})),
            )
            .unwrap();
        assert_eq!(options.filters, vec!["!^_"]);
        assert_eq!(options.docstring_style, DocstringStyle::Numpy);
        assert_eq!(options.members, Some(Members::Names(vec!["a".into(), "b".into()])));
    }

    #[test]
    fn nested_options_merge_key_by_key() {
        let mut config = ScribeConfig::default();
        config.loader.docstring_options.trim_doctest_flags = false;
        let options = config
            .resolve_object(
                &Map::new(),
                &map(json!({"docstring_options": {"replace_admonitions": false}, "members": false})),
            )
            .unwrap();
        assert!(!options.docstring_options.replace_admonitions);
        assert!(!options.docstring_options.trim_doctest_flags);
        assert_eq!(options.members, Some(Members::Enabled(false)));
    }

    #[test]
    fn unknown_style_is_an_error() {
        let result = ScribeConfig::default().resolve_object(&map(json!({"docstring_style": "epydoc"})), &Map::new());
        assert!(matches!(result, Err(ConfigError::Figment(_))));
    }
}
