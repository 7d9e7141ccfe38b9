use serde::Serialize;

use crate::store;

#[derive(thiserror::Error, Debug, Serialize, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Error {
    #[error("assay {assay_id} uses a sample found in neither the submission nor the supporting samples: {sample_ref}")]
    SampleNotResolved { assay_id: String, sample_ref: String },
    #[error(transparent)]
    #[serde(untagged)]
    Store(#[from] store::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
