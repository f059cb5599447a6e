use std::sync::Arc;

use crate::config::Config;
use crate::store::{CvStore, FileBucket, JobStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub cvs: Arc<dyn CvStore>,
    /// Bucket holding the original CV files.
    pub bucket: Arc<dyn FileBucket>,
    pub config: Config,
}
