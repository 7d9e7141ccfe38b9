use garde::Validate;
use serde::{Deserialize, Serialize};

use super::{Archive, AssayRef, ProcessingStatus, SampleUse, StudyRef};

/// Identity shared by everything a submission can carry.
pub trait Submittable {
    fn id(&self) -> &str;
    fn alias(&self) -> Option<&str>;
    fn accession(&self) -> Option<&str>;
    fn team(&self) -> Option<&str>;
    fn archive(&self) -> Option<Archive>;

    fn is_archived_in(&self, archive: Archive) -> bool {
        self.archive() == Some(archive)
    }
}

macro_rules! impl_submittable {
    ($($ty:ty),*) => {
        $(
            impl Submittable for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn alias(&self) -> Option<&str> {
                    self.alias.as_deref()
                }

                fn accession(&self) -> Option<&str> {
                    self.accession.as_deref()
                }

                fn team(&self) -> Option<&str> {
                    self.team.as_deref()
                }

                fn archive(&self) -> Option<Archive> {
                    self.archive
                }
            }
        )*
    };
}

impl_submittable!(Study, Assay, AssayData, Sample);

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<Archive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProcessingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assay {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<Archive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProcessingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub study_ref: StudyRef,
    #[serde(default)]
    pub sample_uses: Vec<SampleUse>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssayData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<Archive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProcessingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub assay_ref: AssayRef,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<Archive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProcessingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxon_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxon: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
#[garde(allow_unvalidated)]
pub struct Submission {
    #[garde(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub studies: Vec<Study>,
    #[serde(default)]
    pub assays: Vec<Assay>,
    #[serde(default)]
    pub assay_data: Vec<AssayData>,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl Submission {
    pub(crate) fn replace_study(&mut self, study: Study) {
        if let Some(existing) = self.studies.iter_mut().find(|s| s.id == study.id) {
            *existing = study;
        }
    }

    /// Marks the study and everything its relationships own as processed.
    pub(crate) fn mark_processed(&mut self, aggregate: &super::ArrayExpressStudy) {
        let status = Some(ProcessingStatus::Processed);

        for study in self.studies.iter_mut().filter(|s| s.id == aggregate.study.id) {
            study.status = status;
        }

        for relationship in &aggregate.sample_data_relationships {
            for assay in self
                .assays
                .iter_mut()
                .filter(|a| a.id == relationship.assay.id)
            {
                assay.status = status;
            }

            for assay_data in &relationship.assay_data {
                for ad in self.assay_data.iter_mut().filter(|ad| ad.id == assay_data.id) {
                    ad.status = status;
                }
            }
        }
    }
}
