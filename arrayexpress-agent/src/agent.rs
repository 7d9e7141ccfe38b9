use serde::Serialize;

use crate::{
    backfill::{DEFAULT_PAGE_SIZE, PropagationSummary, SampleUpdatePropagator},
    model::{AgentResults, SubmissionEnvelope, UpdatedSamplesEnvelope},
    processor::{self, AccessionGenerator, SubmissionOutcome, SubmissionProcessor},
    publish::{self, Publisher},
    store::{self, Store},
};

#[derive(thiserror::Error, Debug, Serialize, Clone)]
#[serde(untagged)]
pub enum Error {
    #[error(transparent)]
    Processing(#[from] processor::error::Error),
    #[error(transparent)]
    Store(#[from] store::error::Error),
    #[error(transparent)]
    Publish(#[from] publish::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct Settings {
    pub accession_prefix: String,
    pub backfill_page_size: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accession_prefix: AccessionGenerator::DEFAULT_PREFIX.to_string(),
            backfill_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Handles the two inbound events against one store, publishing results through `P`.
pub struct Agent<S, P> {
    processor: SubmissionProcessor<S>,
    propagator: SampleUpdatePropagator<S>,
    publisher: P,
}

impl<S: Store, P: Publisher> Agent<S, P> {
    pub fn new(store: S, publisher: P, settings: Settings) -> Self {
        let Settings {
            accession_prefix,
            backfill_page_size,
        } = settings;

        Self {
            processor: SubmissionProcessor::new(
                store.clone(),
                AccessionGenerator::new(accession_prefix),
            ),
            propagator: SampleUpdatePropagator::new(store, backfill_page_size),
            publisher,
        }
    }

    /// Processes a submission and publishes its certificates. Nothing is published if processing fails.
    ///
    /// # Errors
    pub async fn handle_submission(&self, envelope: &SubmissionEnvelope) -> Result<AgentResults> {
        let submission_id = envelope.submission_id();
        tracing::info!(submission_id, "received submission");

        let SubmissionOutcome { certificates, .. } =
            self.processor.process_submission(envelope).await?;
        tracing::info!(submission_id, "processed submission");

        let results = AgentResults::new(submission_id, certificates);
        self.publisher.publish(&results).await?;
        tracing::info!(submission_id, "sent submission results");

        Ok(results)
    }

    /// # Errors
    pub async fn handle_sample_update(
        &self,
        envelope: &UpdatedSamplesEnvelope,
    ) -> Result<PropagationSummary> {
        let submission_id = envelope.submission_id.as_str();
        tracing::info!(submission_id, "received updated samples");

        let summary = self.propagator.propagate(envelope).await?;
        tracing::info!(
            submission_id,
            samples_skipped = summary.samples_skipped,
            relationships_saved = summary.relationships_saved,
            sample_uses_patched = summary.sample_uses_patched,
            "finished updating samples"
        );

        Ok(summary)
    }
}
