// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{HashwatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::HashwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.output))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_exclude_globs(cfg)?;
    validate_ignore_extensions(cfg)?;
    Ok(())
}

fn validate_exclude_globs(cfg: &RawConfigFile) -> Result<()> {
    for pat in cfg.watch.exclude.iter() {
        if let Err(err) = Glob::new(pat) {
            return Err(HashwatchError::ConfigError(format!(
                "[watch].exclude contains invalid glob pattern '{pat}': {err}"
            )));
        }
    }
    Ok(())
}

fn validate_ignore_extensions(cfg: &RawConfigFile) -> Result<()> {
    for ext in cfg.watch.ignore_extensions.iter() {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(HashwatchError::ConfigError(format!(
                "[watch].ignore_extensions entry '{ext}' must be a suffix starting with a dot (e.g. \".tmp\")"
            )));
        }
    }
    Ok(())
}
