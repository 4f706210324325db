use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::source::PredictionSource;
use crate::models::Prediction;

/// Message shown for every kind of fetch failure; the cause only goes to the log.
pub const FETCH_ERROR_MESSAGE: &str = "Unable to load predictions. Please try again.";

/// Probability triples further than this from 1.0 get logged.
const PROBABILITY_SUM_TOLERANCE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewState {
    /// Initial state, and the state during every refetch
    Loading,
    /// Last fetch failed; stays here until a retry or the next scheduled refresh
    Error { message: String },
    /// Last fetch succeeded; the list may be empty
    Loaded { predictions: Vec<Prediction> },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    #[serde(flatten)]
    pub state: ViewState,
    /// Time of the last successful load
    pub last_updated: Option<DateTime<Utc>>,
}

/// In-memory state behind the prediction page.
///
/// Refreshes are not de-duplicated: two overlapping refreshes both hit the
/// source and whichever finishes last decides the final state.
pub struct PredictionView {
    source: Arc<dyn PredictionSource>,
    inner: RwLock<ViewSnapshot>,
}

impl PredictionView {
    pub fn new(source: Arc<dyn PredictionSource>) -> Self {
        PredictionView {
            source,
            inner: RwLock::new(ViewSnapshot {
                state: ViewState::Loading,
                last_updated: None,
            }),
        }
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.inner.read().await.clone()
    }

    /// Go to `Loading`, fetch, then land in `Loaded` or `Error`.
    pub async fn refresh(&self) {
        self.inner.write().await.state = ViewState::Loading;

        let next = match self.source.fetch_predictions().await {
            Ok(predictions) => {
                for (match_id, total) in unbalanced_probabilities(&predictions) {
                    warn!(
                        "Prediction {} probabilities sum to {:.3}",
                        match_id, total
                    );
                }
                info!(
                    "Loaded {} predictions from {}",
                    predictions.len(),
                    self.source.name()
                );
                ViewState::Loaded { predictions }
            }
            Err(e) => {
                warn!("Fetching predictions from {} failed: {:#}", self.source.name(), e);
                ViewState::Error {
                    message: FETCH_ERROR_MESSAGE.to_string(),
                }
            }
        };

        let mut inner = self.inner.write().await;
        if matches!(next, ViewState::Loaded { .. }) {
            inner.last_updated = Some(Utc::now());
        }
        inner.state = next;
    }

    /// User-triggered refetch.
    pub async fn retry(&self) {
        info!("Retry requested");
        self.refresh().await;
    }
}

/// Records whose outcome probabilities stray from 1.0, with their totals.
/// They are still shown; the sum is not enforced.
fn unbalanced_probabilities(predictions: &[Prediction]) -> Vec<(&str, f64)> {
    predictions
        .iter()
        .map(|p| (p.match_id.as_str(), p.probability_total()))
        .filter(|(_, total)| (total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE)
        .collect()
}
