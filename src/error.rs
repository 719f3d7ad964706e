//! Binary error surface. Every failure carries a fixed process exit code so
//! scripts can tell rejected input from a failed run.

use std::io;
use std::path::PathBuf;

use jiggen_core::ConfigError;
use jiggen_export::svg::SvgError;

/// Exit code for command-line misuse. Clap reports those before a
/// [`CliError`] can exist, so they have no variant below.
pub const USAGE_EXIT_CODE: i32 = 1;

/// What `jiggen render` can fail with: reading and understanding the
/// configuration (exit 2), or producing the output files (exit 3).
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("could not read config {path:?}: {source}")]
    ReadConfig { path: PathBuf, source: io::Error },
    #[error("invalid JSON config: {0}")]
    InvalidJson(serde_json::Error),
    #[error("invalid YAML config: {0}")]
    InvalidYaml(serde_yaml::Error),
    #[error(transparent)]
    Rejected(#[from] ConfigError),
    #[error("could not write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Svg(#[from] SvgError),
    #[error("could not encode {path:?}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl CliError {
    /// Process exit code: input problems are 2, output failures 3.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ReadConfig { .. }
            | Self::InvalidJson(_)
            | Self::InvalidYaml(_)
            | Self::Rejected(_) => 2,
            Self::Write { .. } | Self::Svg(_) | Self::Encode { .. } => 3,
        }
    }
}
