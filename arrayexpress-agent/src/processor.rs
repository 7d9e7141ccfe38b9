use uuid::Uuid;

use crate::{
    model::{
        Archive, ArrayExpressStudy, Certificate, Submission, SubmissionEnvelope, Submittable,
    },
    store::Store,
};
use error::Result;
use study::StudyOutcome;

mod assay;
pub mod error;
mod study;

/// The archive this agent speaks for. Everything tagged for another archive is ignored.
pub const ARCHIVE: Archive = Archive::ArrayExpress;

/// Hands out study accessions.
#[derive(Debug, Clone)]
pub struct AccessionGenerator {
    prefix: String,
}

impl AccessionGenerator {
    pub const DEFAULT_PREFIX: &'static str = "AE-MTAB-";

    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn next_accession(&self) -> String {
        format!("{}{}", self.prefix, Uuid::new_v4())
    }
}

impl Default for AccessionGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

/// Result of processing one submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// Copy of the submitted graph with accessions and statuses applied. The caller's graph is left untouched.
    pub submission: Submission,
    pub certificates: Vec<Certificate>,
}

pub struct SubmissionProcessor<S> {
    store: S,
    accessions: AccessionGenerator,
}

impl<S: Store> SubmissionProcessor<S> {
    pub fn new(store: S, accessions: AccessionGenerator) -> Self {
        Self { store, accessions }
    }

    /// Processes every study tagged for this archive, in submission order.
    ///
    /// # Errors
    /// [`error::Error::SampleNotResolved`] aborts the whole submission. Studies persisted before the failing one stay
    /// persisted. A study too large to store is not an error: it contributes no certificates and processing moves on.
    pub async fn process_submission(
        &self,
        envelope: &SubmissionEnvelope,
    ) -> Result<SubmissionOutcome> {
        let SubmissionEnvelope {
            submission: submitted,
            supporting_samples,
        } = envelope;

        let mut submission = submitted.clone();
        let mut certificates = Vec::new();

        for study in submitted.studies.iter().filter(|s| s.is_archived_in(ARCHIVE)) {
            let outcome = self
                .process_study(study.clone(), submitted, supporting_samples)
                .await?;

            match outcome {
                StudyOutcome::Persisted {
                    aggregate,
                    certificates: study_certificates,
                } => {
                    apply_persisted(&mut submission, &aggregate);
                    certificates.extend(study_certificates);
                }
                StudyOutcome::Oversized { study } => submission.replace_study(study),
            }
        }

        tracing::debug!(
            submission_id = %submitted.id,
            archive = %ARCHIVE,
            n_certificates = certificates.len(),
            "processed submission"
        );

        Ok(SubmissionOutcome {
            submission,
            certificates,
        })
    }
}

fn apply_persisted(submission: &mut Submission, aggregate: &ArrayExpressStudy) {
    submission.replace_study(aggregate.study.clone());
    submission.mark_processed(aggregate);
}
