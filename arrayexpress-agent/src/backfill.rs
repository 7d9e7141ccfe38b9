use crate::{
    model::{Sample, UpdatedSamplesEnvelope},
    store::{PageRequest, Store, error::Result},
};

/// Page size used when scanning stored relationships for a sample.
pub const DEFAULT_PAGE_SIZE: u64 = 500;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PropagationSummary {
    pub samples_skipped: usize,
    pub pages_fetched: usize,
    pub relationships_saved: usize,
    pub sample_uses_patched: usize,
}

/// Writes newly accessioned samples into the relationships that referred to them by accession.
///
/// Pages are re-queried by index on every iteration rather than read through a stable cursor. A concurrent writer
/// that inserts or deletes matching relationships mid-scan can cause some to be visited twice and others to be
/// missed. Replaying the same notification is harmless, since patching only ever sets the same sample again.
pub struct SampleUpdatePropagator<S> {
    store: S,
    page_size: u64,
}

impl<S: Store> SampleUpdatePropagator<S> {
    pub fn new(store: S, page_size: u64) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    /// # Errors
    /// Only store failures. Samples without an accession are skipped.
    pub async fn propagate(&self, envelope: &UpdatedSamplesEnvelope) -> Result<PropagationSummary> {
        let UpdatedSamplesEnvelope {
            submission_id,
            updated_samples,
        } = envelope;

        let mut summary = PropagationSummary::default();

        for sample in updated_samples {
            let Some(accession) = sample.accession.as_deref() else {
                summary.samples_skipped += 1;
                continue;
            };

            self.propagate_sample(submission_id, accession, sample, &mut summary)
                .await?;

            tracing::debug!(
                %submission_id,
                sample_accession = accession,
                "updated relationships for sample"
            );
        }

        Ok(summary)
    }

    async fn propagate_sample(
        &self,
        submission_id: &str,
        accession: &str,
        sample: &Sample,
        summary: &mut PropagationSummary,
    ) -> Result<()> {
        let mut request = PageRequest::first(self.page_size);

        loop {
            let page = self
                .store
                .find_relationships_by_sample_accession(accession, request)
                .await?;
            summary.pages_fetched += 1;

            tracing::debug!(
                submission_id,
                sample_accession = accession,
                page = request.index,
                total_pages = page.total_pages,
                total_items = page.total_items,
                "fetched relationship page"
            );

            let is_last = page.is_last();

            for mut relationship in page.items {
                summary.sample_uses_patched += relationship.resolve_sample(sample);
                self.store.save_relationship(&relationship).await?;
                summary.relationships_saved += 1;
            }

            if is_last {
                return Ok(());
            }

            request = request.next();
        }
    }
}
