// Events delivered from background work to the TUI loop
//
// Loading runs off the UI thread; its outcome arrives over an mpsc channel
// so the coordinator is only ever touched by the loop that owns it.

use crate::demo;
use crate::derive::{enrich, Dataset, TimeBasis};
use crate::ingest;
use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Where a dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Demo,
    Paths(Vec<PathBuf>),
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Demo => write!(f, "demo archive"),
            Self::Paths(paths) if paths.len() == 1 => write!(f, "{}", paths[0].display()),
            Self::Paths(paths) => write!(f, "{} paths", paths.len()),
        }
    }
}

/// Outcome of background work
#[derive(Debug)]
pub enum AppEvent {
    /// A dataset is ready to be indexed
    Loaded {
        source: LoadSource,
        dataset: Dataset,
    },
    /// Ingestion failed as a batch
    LoadFailed { source: LoadSource, error: String },
}

/// Read and enrich a dataset
pub async fn load(source: &LoadSource, basis: TimeBasis) -> anyhow::Result<Dataset> {
    let messages = match source {
        LoadSource::Demo => demo::demo_messages(),
        LoadSource::Paths(paths) => ingest::load_paths(paths, basis).await?,
    };
    Ok(enrich(messages, basis))
}

/// Load in the background and report the outcome on `tx`
pub fn spawn_load(source: LoadSource, basis: TimeBasis, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let event = match load(&source, basis).await {
            Ok(dataset) => AppEvent::Loaded { source, dataset },
            Err(e) => {
                tracing::error!("Loading {} failed: {:#}", source, e);
                AppEvent::LoadFailed {
                    source,
                    error: format!("{:#}", e),
                }
            }
        };
        // Receiver gone means the TUI already quit
        let _ = tx.send(event).await;
    });
}
