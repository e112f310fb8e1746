use thiserror::Error;

/// Structural violation of the two-level platform/game tree contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDatasetError {
    #[error("dataset root `{0}` has no children")]
    MissingRootChildren(String),
    #[error("branch `{0}` has no children")]
    EmptyBranch(String),
    #[error("leaf `{0}` has no numeric value")]
    MissingLeafValue(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("layout target must have positive dimensions, got {width}x{height}")]
    NonPositiveDimensions { width: f64, height: f64 },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fetching {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("parsing dataset")]
    Parse(#[from] serde_json::Error),
}
