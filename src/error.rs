use std::{io, path::PathBuf};

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal failure: {0}")]
    Terminal(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not open log file {}: {source}", path.display())]
    LogFile { path: PathBuf, source: io::Error },
}
