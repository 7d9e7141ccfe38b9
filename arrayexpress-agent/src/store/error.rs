use serde::Serialize;

#[derive(thiserror::Error, Debug, Serialize, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Error {
    #[error("{collection} document {id} is {size} bytes, exceeding the {limit} byte limit")]
    SizeLimitExceeded {
        collection: String,
        id: String,
        size: usize,
        limit: usize,
    },
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    fn from_other_error(err: impl std::error::Error) -> Self {
        Self::Other {
            message: format!("{err:?}"),
        }
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        Self::from_other_error(err)
    }
}

impl From<mongodb::bson::ser::Error> for Error {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::from_other_error(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
