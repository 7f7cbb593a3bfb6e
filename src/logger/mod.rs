// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use tracing_subscriber::{EnvFilter, prelude::*};

use crate::config::LogConfig;

/// Installs a console logger filtered by `RUST_LOG` or, when that is unset,
/// by `config`. Returns an error if a global subscriber is already set.
pub fn setup_logger(config: &LogConfig) -> anyhow::Result<()> {
    let filter = get_env_filter(config)?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::Layer::new().with_filter(filter))
        .try_init()?;
    Ok(())
}

/// Returns an [`EnvFilter`] according to the `RUST_LOG` environment variable,
/// or built from the configured filters.
fn get_env_filter(config: &LogConfig) -> anyhow::Result<EnvFilter> {
    use std::env::{
        self,
        VarError::{NotPresent, NotUnicode},
    };
    match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(s) => Ok(EnvFilter::new(s)),
        Err(NotPresent) => Ok(EnvFilter::try_new(config.to_filter_string())?),
        Err(NotUnicode(_)) => Ok(EnvFilter::default()),
    }
}

#[test]
fn test_default_env_filter() {
    let _did_not_fail = EnvFilter::try_new(LogConfig::default().to_filter_string()).unwrap();
}
