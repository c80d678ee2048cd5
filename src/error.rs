use std::path::PathBuf;

use thiserror::Error;

/// A page could not be retrieved. The page is skipped, the run continues.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to download {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to download {url}: {status}")]
    Status { url: String, status: reqwest::StatusCode },
}

/// A single anchor could not be turned into an episode. Only that episode is skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("anchor {anchor}: no header table follows the anchor")]
    MissingHeader { anchor: u32 },
    #[error("anchor {anchor}: no body table follows the header")]
    MissingBody { anchor: u32 },
    #[error("anchor {anchor}: header has {fields} '|' fields, expected 3")]
    MalformedHeader { anchor: u32, fields: usize },
    #[error("anchor {anchor}: no episode number in label {label:?}")]
    BadEpisodeNumber { anchor: u32, label: String },
    #[error("anchor {anchor}: body has no title")]
    MissingTitle { anchor: u32 },
    #[error("anchor {anchor}: body has no description")]
    MissingDescription { anchor: u32 },
    #[error("anchor {anchor}: description is empty")]
    EmptyDescription { anchor: u32 },
}

impl ExtractionError {
    pub fn anchor(&self) -> u32 {
        match self {
            ExtractionError::MissingHeader { anchor }
            | ExtractionError::MissingBody { anchor }
            | ExtractionError::MalformedHeader { anchor, .. }
            | ExtractionError::BadEpisodeNumber { anchor, .. }
            | ExtractionError::MissingTitle { anchor }
            | ExtractionError::MissingDescription { anchor }
            | ExtractionError::EmptyDescription { anchor } => *anchor,
        }
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown template placeholder ${{{0}}}")]
    UnknownPlaceholder(String),
    #[error("invalid placeholder at byte {0}")]
    InvalidPlaceholder(usize),
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("No episodes found!")]
    NoEpisodes,
}
