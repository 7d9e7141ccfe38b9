use serde::{Deserialize, Serialize};

use super::{Archive, ProcessingStatus, Submittable};

/// Outcome of processing a single submittable for an archive.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub subject_id: String,
    pub archive: Archive,
    pub status: ProcessingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
}

impl Certificate {
    #[must_use]
    pub fn new(subject: &impl Submittable, archive: Archive, status: ProcessingStatus) -> Self {
        Self {
            subject_id: subject.id().to_string(),
            archive,
            status,
            accession: None,
        }
    }

    #[must_use]
    pub fn with_accession(mut self, accession: impl Into<String>) -> Self {
        self.accession = Some(accession.into());
        self
    }
}

/// Everything the agent has to say about one submission.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentResults {
    pub submission_id: String,
    pub certificates: Vec<Certificate>,
}

impl AgentResults {
    #[must_use]
    pub fn new(submission_id: impl Into<String>, certificates: Vec<Certificate>) -> Self {
        Self {
            submission_id: submission_id.into(),
            certificates,
        }
    }
}
