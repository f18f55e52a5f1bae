// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Structured logging setup

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `level`. `verbose` raises the crate's
/// own events to `debug`. Logs go to stderr so stdout stays free for the
/// report.
pub fn init_logging(level: &str, verbose: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = if verbose {
                format!("{},meshprep=debug", level)
            } else {
                level.to_string()
            };
            EnvFilter::try_new(&directive)
                .map_err(|e| anyhow!("Invalid log level {:?}: {}", directive, e))?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

