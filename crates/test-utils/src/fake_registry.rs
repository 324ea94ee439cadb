use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tf::errors::Result;
use tf::watch::WatchRegistry;

/// A call made against a [`FakeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Watch(PathBuf),
    Rewatch(PathBuf),
    Close,
}

/// A `WatchRegistry` that records calls instead of registering OS watches.
///
/// Tests drive the tailer by calling `on_file_event` / `on_dir_event`
/// directly, so nothing needs to be observed from the OS. Clones share the
/// call log.
#[derive(Debug, Clone, Default)]
pub struct FakeRegistry {
    calls: Arc<Mutex<Vec<RegistryCall>>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn watched(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RegistryCall::Watch(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn rewatched(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RegistryCall::Rewatch(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RegistryCall::Close))
            .count()
    }
}

impl WatchRegistry for FakeRegistry {
    fn watch(&mut self, path: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::Watch(path.to_path_buf()));
        Ok(())
    }

    fn rewatch(&mut self, path: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::Rewatch(path.to_path_buf()));
        Ok(())
    }

    fn close(&mut self) {
        self.calls.lock().unwrap().push(RegistryCall::Close);
    }
}
