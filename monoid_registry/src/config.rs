/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Registry configuration.
//!
//! Values are resolved in layers: **Env → File → Default**. A
//! [`Config`] starts from its defaults, may be loaded from a YAML file
//! with [`Config::from_yaml`], and environment variables are applied on
//! top with [`Config::with_env`].
//!
//! [`Config::global`] is a snapshot of the defaults overlaid with the
//! process environment, taken once on first use. Registries capture a
//! config when they are built; use [`crate::Registry::with_config`] to
//! run with a different one.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::Deserialize;
use serde::Serialize;

/// Environment variable overriding [`Config::preview_limit`].
pub const PREVIEW_LIMIT_ENV: &str = "MONOID_PREVIEW_LIMIT";

/// Environment variable overriding [`Config::trace_elisions`].
pub const TRACE_ELISIONS_ENV: &str = "MONOID_TRACE_ELISIONS";

/// Default number of characters kept when a value is rendered into an
/// error message.
pub const DEFAULT_PREVIEW_LIMIT: usize = 80;

/// Tunables consulted while combining.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of characters of a value rendered into an error.
    pub preview_limit: usize,
    /// Emit a trace event for every key dropped by zero-elision.
    pub trace_elisions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            trace_elisions: true,
        }
    }
}

static GLOBAL: LazyLock<Config> = LazyLock::new(Config::from_env);

impl Config {
    /// The process-wide configuration snapshot.
    pub fn global() -> &'static Config {
        &GLOBAL
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Config {
        Config::default().with_env()
    }

    /// Load a configuration from a YAML file. Keys missing from the
    /// file keep their defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Config, anyhow::Error> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Save this configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), anyhow::Error> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Overlay the process environment on this configuration.
    pub fn with_env(self) -> Config {
        self.with_overrides(|name| env::var(name).ok())
    }

    /// Overlay values produced by `lookup`, keyed by environment
    /// variable name. Unparseable values are logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        override_from(&lookup, PREVIEW_LIMIT_ENV, &mut self.preview_limit);
        override_from(&lookup, TRACE_ELISIONS_ENV, &mut self.trace_elisions);
        tracing::debug!(
            preview_limit = self.preview_limit,
            trace_elisions = self.trace_elisions,
            "resolved monoid registry configuration"
        );
        self
    }
}

fn override_from<F, T>(lookup: &F, env_var: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(env_var) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(e) => {
            tracing::error!(
                "failed to override config from value \"{}\" in ${}: {}",
                raw,
                env_var,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.preview_limit, 80);
        assert!(config.trace_elisions);
    }

    #[test]
    fn env_overrides_apply() {
        let config = Config::default().with_overrides(lookup(&[
            (PREVIEW_LIMIT_ENV, "16"),
            (TRACE_ELISIONS_ENV, "false"),
        ]));
        assert_eq!(config.preview_limit, 16);
        assert!(!config.trace_elisions);
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let config =
            Config::default().with_overrides(lookup(&[(PREVIEW_LIMIT_ENV, "lots")]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn yaml_roundtrip_and_partial_files() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("full.yaml");
        let config = Config {
            preview_limit: 12,
            trace_elisions: false,
        };
        config.to_yaml(&path).unwrap();
        assert_eq!(Config::from_yaml(&path).unwrap(), config);

        let partial = dir.path().join("partial.yaml");
        std::fs::write(&partial, "preview_limit: 40\n").unwrap();
        let loaded = Config::from_yaml(&partial).unwrap();
        assert_eq!(loaded.preview_limit, 40);
        assert!(loaded.trace_elisions);
    }

    #[test]
    fn missing_yaml_file_is_an_error() {
        assert!(Config::from_yaml("/nonexistent/monoid.yaml").is_err());
    }
}
