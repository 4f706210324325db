use anyhow::Result;
use async_trait::async_trait;

use crate::models::Prediction;

/// Anything the prediction view can pull a fresh list from.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    /// Fetch the full current list. The view replaces its list wholesale.
    async fn fetch_predictions(&self) -> Result<Vec<Prediction>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
