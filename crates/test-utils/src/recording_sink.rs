use std::sync::{Arc, Mutex};
use std::time::Duration;

use tf::output::LineSink;

/// One unit of output as `tf` would print it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Line(String),
    Separator,
}

/// A sink that records everything in memory, in emission order.
///
/// Cloning shares the underlying buffer, so a test can keep one clone while
/// handing another (as `Arc<dyn LineSink>`) to the code under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    outputs: Arc<Mutex<Vec<Output>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_sink(&self) -> Arc<dyn LineSink> {
        Arc::new(self.clone())
    }

    pub fn outputs(&self) -> Vec<Output> {
        self.outputs.lock().unwrap().clone()
    }

    /// Only the followed lines, separators dropped.
    pub fn lines(&self) -> Vec<String> {
        self.outputs()
            .into_iter()
            .filter_map(|o| match o {
                Output::Line(text) => Some(text),
                Output::Separator => None,
            })
            .collect()
    }

    pub fn separator_count(&self) -> usize {
        self.outputs()
            .iter()
            .filter(|o| matches!(o, Output::Separator))
            .count()
    }

    /// Poll until at least `n` lines were recorded, then return all lines.
    ///
    /// Wrap in [`crate::with_timeout`]; this never gives up on its own.
    pub async fn wait_for_lines(&self, n: usize) -> Vec<String> {
        loop {
            let lines = self.lines();
            if lines.len() >= n {
                return lines;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl LineSink for RecordingSink {
    fn line(&self, text: &str) {
        self.outputs
            .lock()
            .unwrap()
            .push(Output::Line(text.to_string()));
    }

    fn separator(&self) {
        self.outputs.lock().unwrap().push(Output::Separator);
    }
}
