use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read '{}': {source}", path.display())]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write '{}': {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Emit(#[from] export::EmitError),
}
