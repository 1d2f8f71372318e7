// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware configuration path resolution.

use std::path::{Path, PathBuf};

use poacheck_core::config::PipelineConfig;
use poacheck_core::error::Result;
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.json";

/// Return the configuration directory (not created).
pub fn config_dir() -> PathBuf {
    dirs_fallback().join("poacheck")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Load the pipeline config from `explicit` if given, else from the default
/// location if a file exists there, else built-in defaults. An explicit path
/// that cannot be read is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<PipelineConfig> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "Loading config");
        return PipelineConfig::load(path);
    }

    let path = default_config_path();
    if path.exists() {
        info!(path = %path.display(), "Loading config");
        PipelineConfig::load(&path)
    } else {
        debug!(path = %path.display(), "No config file; using defaults");
        Ok(PipelineConfig::default())
    }
}

fn dirs_fallback() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}
