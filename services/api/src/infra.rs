use agent_card::catalog::GuideCatalog;
use agent_card::contacts::{ContactDirectory, VCardStore};
use agent_card::workflows::qualification::{Clipboard, ClipboardError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) directory: Arc<ContactDirectory>,
    pub(crate) vcards: Arc<VCardStore>,
    pub(crate) catalog: Arc<GuideCatalog>,
}

impl AppState {
    pub(crate) fn new(
        readiness: Arc<AtomicBool>,
        metrics: PrometheusHandle,
        directory: Arc<ContactDirectory>,
        public_dir: PathBuf,
    ) -> Self {
        let vcards = VCardStore::new(public_dir, directory.as_ref().clone());
        Self {
            readiness,
            metrics: Arc::new(metrics),
            directory,
            vcards: Arc::new(vcards),
            catalog: Arc::new(GuideCatalog::standard()),
        }
    }
}

/// Terminal stand-in for the browser clipboard: the text lands in a file.
#[derive(Debug, Clone)]
pub(crate) struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Clipboard for FileClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        fs::write(&self.path, text).map_err(|err| ClipboardError::Write(err.to_string()))
    }
}
