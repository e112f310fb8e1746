use std::fmt;
use std::path::PathBuf;

use crossbeam_channel::Sender;

use crate::error::LoadError;
use crate::model::Dataset;

/// The dataset the original visualization ships with.
pub const DEFAULT_DATASET_URL: &str =
    "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map/video-game-sales-data.json";

#[derive(Debug, Clone)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// `http(s)://...` is a URL, anything else a local path.
    pub fn parse(input: &str) -> Source {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Source::Url(trimmed.to_string())
        } else {
            Source::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug)]
pub enum LoadMsg {
    Done(Dataset),
    Error(String),
}

/// Fetch-and-parse collaborator. The render pipeline never runs while a
/// load is in flight; a failed load simply never produces a dataset, and
/// no retries happen here.
pub struct Loader {
    source: Source,
}

impl Loader {
    pub fn new(source: Source) -> Self {
        Self { source }
    }

    pub fn load(&self) -> Result<Dataset, LoadError> {
        let text = match &self.source {
            Source::File(path) => {
                std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?
            }
            Source::Url(url) => reqwest::blocking::get(url)
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text())
                .map_err(|source| LoadError::Http {
                    url: url.clone(),
                    source,
                })?,
        };
        let dataset: Dataset = serde_json::from_str(&text)?;
        tracing::info!(source = %self.source, "loaded dataset `{}`", dataset.name);
        Ok(dataset)
    }

    /// Run on a worker thread, reporting the outcome over the channel.
    pub fn run(&self, tx: Sender<LoadMsg>) {
        match self.load() {
            Ok(dataset) => {
                let _ = tx.send(LoadMsg::Done(dataset));
            }
            Err(e) => {
                tracing::warn!(source = %self.source, "load failed: {e}");
                let _ = tx.send(LoadMsg::Error(e.to_string()));
            }
        }
    }
}
