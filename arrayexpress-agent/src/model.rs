use serde::{Deserialize, Serialize};

pub mod aggregate;
pub mod certificate;
pub mod envelope;
pub mod reference;
pub mod submittable;

pub use aggregate::{ArrayExpressStudy, SampleDataRelationship};
pub use certificate::{AgentResults, Certificate};
pub use envelope::{SubmissionEnvelope, UpdatedSamplesEnvelope};
pub use reference::{AssayRef, SampleRef, SampleUse, StudyRef};
pub use submittable::{Assay, AssayData, Sample, Study, Submission, Submittable};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Archive {
    Usi,
    BioSamples,
    Ena,
    ArrayExpress,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ProcessingStatus {
    Draft,
    Submitted,
    Processing,
    /// Accepted by the agent and waiting on a curator.
    Curation,
    Processed,
    Completed,
    Error,
}
