use super::{ARCHIVE, SubmissionProcessor, assay::process_assay, error::Result};
use crate::{
    model::{
        ArrayExpressStudy, Assay, Certificate, ProcessingStatus, Sample, Study, Submission,
        Submittable, reference::Reference,
    },
    store::{self, Store},
};

pub(super) enum StudyOutcome {
    Persisted {
        aggregate: ArrayExpressStudy,
        certificates: Vec<Certificate>,
    },
    /// The study was accessioned but could not be stored.
    Oversized { study: Study },
}

impl<S: Store> SubmissionProcessor<S> {
    pub(super) async fn process_study(
        &self,
        mut study: Study,
        submission: &Submission,
        supporting_samples: &[Sample],
    ) -> Result<StudyOutcome> {
        let accession = study
            .accession
            .get_or_insert_with(|| self.accessions.next_accession())
            .clone();

        let mut aggregate = ArrayExpressStudy::new(accession.clone(), study);

        let mut certificates = vec![
            Certificate::new(&aggregate.study, ARCHIVE, ProcessingStatus::Curation)
                .with_accession(&accession),
        ];

        let assays: Vec<&Assay> = submission
            .assays
            .iter()
            .filter(|a| a.is_archived_in(ARCHIVE) && a.study_ref.is_match(&aggregate.study))
            .collect();

        for assay in assays {
            let assay_certificates =
                process_assay(assay, submission, supporting_samples, &mut aggregate)?;
            certificates.extend(assay_certificates);
        }

        // Two independent writes. A failure on the second leaves the root without its relationships.
        let saved = match self.store.save_study(&aggregate).await {
            Ok(()) => {
                self.store
                    .save_relationships(&aggregate.sample_data_relationships)
                    .await
            }
            err => err,
        };

        match saved {
            Ok(()) => {
                tracing::debug!(
                    study_accession = %accession,
                    n_relationships = aggregate.sample_data_relationships.len(),
                    "persisted study"
                );

                Ok(StudyOutcome::Persisted {
                    aggregate,
                    certificates,
                })
            }
            Err(err @ store::error::Error::SizeLimitExceeded { .. }) => {
                tracing::error!(
                    study_accession = %accession,
                    error = %err,
                    "study document exceeds size limit"
                );

                Ok(StudyOutcome::Oversized {
                    study: aggregate.study,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}
