use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("DataMall request failed: {status}")]
    Upstream { status: StatusCode },
    #[error(transparent)]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("could not write output file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not replace output file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Deserialize {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] shared::error::ConfigError),
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

#[derive(Debug, Error)]
pub enum MainError {
    #[error(transparent)]
    Init(#[from] shared::error::InitializationError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
