use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown focus word \"{0}\"")]
    UnknownFocusWord(String),
    #[error("lexicon not found at {}", .0.display())]
    MissingLexicon(PathBuf),
    #[error("invalid value for setting {key}: {value:?}")]
    InvalidSetting { key: String, value: String },
    #[error("failed to load lexicon: {0:#}")]
    Lexicon(anyhow::Error),
    #[error("failed to read corpus: {0:#}")]
    Corpus(anyhow::Error),
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::Output {
            path: path.into(),
            source,
        }
    }
}
