use super::request::GenerationRequest;
use super::result::{BatchSummary, GenerationResult};
use super::Orchestrator;
use futures::stream::{self, StreamExt};
use tracing::info;

impl Orchestrator {
    /// Runs independent requests concurrently, at most `batch_concurrency` at a time.
    /// Results come back in request order.
    pub async fn generate_batch(&self, requests: Vec<GenerationRequest>) -> Vec<GenerationResult> {
        let concurrency = self.settings.batch_concurrency.max(1);
        info!(requests = requests.len(), concurrency, "Batch generation started");

        let results: Vec<GenerationResult> = stream::iter(requests)
            .map(|request| self.generate(request))
            .buffered(concurrency)
            .collect()
            .await;

        let summary = BatchSummary::from_results(&results);
        info!(
            total = summary.total,
            valid = summary.valid,
            needs_review = summary.needs_review,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Batch generation finished"
        );
        results
    }
}
