use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Assay, AssayData, Sample, SampleUse, Study};

/// Links one assay to the samples it used and the data files it produced.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SampleDataRelationship {
    #[serde(rename = "_id")]
    pub id: String,
    pub assay: Assay,
    #[serde(default)]
    pub sample_uses: Vec<SampleUse>,
    #[serde(default)]
    pub assay_data: Vec<AssayData>,
}

impl SampleDataRelationship {
    /// Field path of the sample accession inside a stored relationship.
    pub const SAMPLE_ACCESSION_PATH: &'static str = "sampleUses.sampleRef.accession";

    #[must_use]
    pub fn new(assay: Assay) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            assay,
            sample_uses: Vec::new(),
            assay_data: Vec::new(),
        }
    }

    /// Attaches `sample` to every use whose reference carries the sample's accession, returning the number of uses
    /// patched. A sample without an accession patches nothing.
    pub fn resolve_sample(&mut self, sample: &Sample) -> usize {
        let Some(accession) = sample.accession.as_deref() else {
            return 0;
        };

        let mut n_patched = 0;
        for sample_use in &mut self.sample_uses {
            let sample_ref = &mut sample_use.sample_ref;

            if sample_ref.accession.as_deref() == Some(accession) {
                sample_ref.referenced_object = Some(sample.clone());
                n_patched += 1;
            }
        }

        n_patched
    }

    #[cfg(test)]
    pub(crate) fn references_sample(&self, accession: &str) -> bool {
        self.sample_uses
            .iter()
            .any(|u| u.sample_ref.accession.as_deref() == Some(accession))
    }
}

/// The aggregate root persisted for every study accepted by the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpressStudy {
    pub accession: String,
    pub study: Study,
    pub sample_data_relationships: Vec<SampleDataRelationship>,
}

impl ArrayExpressStudy {
    #[must_use]
    pub fn new(accession: String, study: Study) -> Self {
        Self {
            accession,
            study,
            sample_data_relationships: Vec::new(),
        }
    }

    #[must_use]
    pub fn to_document(&self) -> StudyDocument {
        StudyDocument {
            accession: self.accession.clone(),
            study: self.study.clone(),
            sample_data_relationship_ids: self
                .sample_data_relationships
                .iter()
                .map(|r| r.id.clone())
                .collect(),
        }
    }
}

/// Stored form of [`ArrayExpressStudy`]. Relationships live in their own collection and are referenced by id.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudyDocument {
    #[serde(rename = "_id")]
    pub accession: String,
    pub study: Study,
    #[serde(default)]
    pub sample_data_relationship_ids: Vec<String>,
}
