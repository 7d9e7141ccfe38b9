use garde::Validate;
use serde::{Deserialize, Serialize};

use super::{Sample, Submission};

/// Inbound "submission" event.
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
#[garde(allow_unvalidated)]
pub struct SubmissionEnvelope {
    #[garde(dive)]
    pub submission: Submission,
    /// Samples owned outside this submission that its assays may still refer to.
    #[serde(default)]
    pub supporting_samples: Vec<Sample>,
}

impl SubmissionEnvelope {
    #[must_use]
    pub fn submission_id(&self) -> &str {
        &self.submission.id
    }
}

/// Inbound "samples-updated" event.
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
#[garde(allow_unvalidated)]
pub struct UpdatedSamplesEnvelope {
    #[garde(length(min = 1))]
    pub submission_id: String,
    #[serde(default)]
    pub updated_samples: Vec<Sample>,
}
