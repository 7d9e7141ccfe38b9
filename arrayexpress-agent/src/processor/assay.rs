use super::{
    ARCHIVE,
    error::{Error, Result},
};
use crate::model::{
    ArrayExpressStudy, Assay, Certificate, ProcessingStatus, Sample, SampleDataRelationship,
    Submission, Submittable, reference::Reference,
};

/// Builds the relationship for one assay and appends it to `aggregate`, returning the certificates for the assay and
/// its data.
pub(super) fn process_assay(
    assay: &Assay,
    submission: &Submission,
    supporting_samples: &[Sample],
    aggregate: &mut ArrayExpressStudy,
) -> Result<Vec<Certificate>> {
    let mut relationship = SampleDataRelationship::new(assay.clone());

    let mut certificates = vec![Certificate::new(assay, ARCHIVE, ProcessingStatus::Curation)];

    let mut sample_uses = assay.sample_uses.clone();
    for sample_use in &mut sample_uses {
        let sample_ref = &mut sample_use.sample_ref;

        if !sample_ref.fill_in([submission.samples.as_slice(), supporting_samples]) {
            return Err(Error::SampleNotResolved {
                assay_id: assay.id.clone(),
                sample_ref: sample_ref.to_string(),
            });
        }
    }
    relationship.sample_uses = sample_uses;

    relationship.assay_data = submission
        .assay_data
        .iter()
        .filter(|ad| ad.is_archived_in(ARCHIVE) && ad.assay_ref.is_match(assay))
        .cloned()
        .collect();

    certificates.extend(
        relationship
            .assay_data
            .iter()
            .map(|ad| Certificate::new(ad, ARCHIVE, ProcessingStatus::Curation)),
    );

    aggregate.sample_data_relationships.push(relationship);

    Ok(certificates)
}
