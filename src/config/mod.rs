// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::chain::ChainStoreConfig;
use crate::message_pool::MpoolConfig;
use crate::utils::io::{read_toml, read_toml_file};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, path::Path};
use tracing::level_filters::LevelFilter;

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub struct LogLevelFilter(pub LevelFilter);

impl Serialize for LogLevelFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogLevelFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<LevelFilter>()
            .map(LogLevelFilter)
            .map_err(|_| serde::de::Error::custom(format!("invalid log level filter `{s}`")))
    }
}

impl fmt::Display for LogLevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_string().to_ascii_lowercase())
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct LogValue {
    pub module: String,
    pub level: LogLevelFilter,
}

impl LogValue {
    pub fn new(module: &str, level: LogLevelFilter) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct LogConfig {
    /// Level used for every module without a filter of its own.
    pub default_level: LogLevelFilter,
    pub filters: Vec<LogValue>,
}

impl LogConfig {
    pub(crate) fn to_filter_string(&self) -> String {
        std::iter::once(self.default_level.to_string())
            .chain(
                self.filters
                    .iter()
                    .map(|f| format!("{}={}", f.module, f.level)),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevelFilter(LevelFilter::INFO),
            filters: vec![LogValue::new(
                "forest_mpool::message_pool",
                LogLevelFilter(LevelFilter::INFO),
            )],
        }
    }
}

/// Top-level configuration. Every section is optional in the TOML source.
#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub chain: ChainStoreConfig,
    pub mpool: MpoolConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        read_toml(toml)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        read_toml_file(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn empty_source_is_the_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Config::from_toml_str(
            r#"
            [mpool]
            verify_signatures = false

            [log]
            filters = [{ module = "forest_mpool::message_pool", level = "debug" }]
            "#,
        )
        .unwrap();
        assert!(!config.mpool.verify_signatures);
        assert_eq!(config.chain, ChainStoreConfig::default());
        assert_eq!(
            config.log.filters,
            vec![LogValue::new(
                "forest_mpool::message_pool",
                LogLevelFilter(LevelFilter::DEBUG)
            )]
        );
        assert_eq!(
            config.log.to_filter_string(),
            "info,forest_mpool::message_pool=debug"
        );
    }

    #[test]
    fn invalid_level_is_rejected() {
        let res = Config::from_toml_str(
            r#"
            [log]
            filters = [{ module = "x", level = "loud" }]
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chain]\nhead_change_capacity = 8").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.chain.head_change_capacity, 8);

        let err = Config::load(&file.path().with_extension("missing")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
