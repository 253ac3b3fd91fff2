use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use log::{debug, warn};
use tokio::time;

use super::{SentimentResult, ToyClassifier};
use crate::config::InferenceConfig;

/// Serves classification requests with a simulated inference latency.
///
/// Only one request is served at a time. A request arriving while another is
/// outstanding is ignored, so results are never delivered interleaved.
#[derive(Debug)]
pub struct Playground {
    classifier: ToyClassifier,
    latency: Duration,
    busy: AtomicBool,
}

impl Playground {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            classifier: ToyClassifier,
            latency: config.latency(),
            busy: AtomicBool::new(false),
        }
    }

    /// Classifies `text` after the configured latency.
    ///
    /// # Returns
    /// `None` if another request is still being served.
    pub async fn analyze(&self, text: &str, trained: bool) -> Option<SentimentResult> {
        if self.busy.swap(true, Ordering::AcqRel) {
            warn!("inference request ignored: another one is in flight");
            return None;
        }
        let _busy = BusyGuard(&self.busy);

        time::sleep(self.latency).await;
        let result = self.classifier.classify(text, trained);
        debug!(
            trained = trained,
            score = result.score;
            "classified as {}", result.label
        );

        Some(result)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Default for Playground {
    fn default() -> Self {
        Self::new(InferenceConfig::default())
    }
}

/// Clears the busy flag when the request finishes or its future is dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
