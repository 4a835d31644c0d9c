use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("unreadable source {}: {reason}", path.display())]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("cannot write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("cannot read layout file {}: {source}", path.display())]
    LayoutFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse layout file {}: {source}", path.display())]
    LayoutParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
