use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{agent, processor, publish};

#[derive(thiserror::Error, Serialize, Debug, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Error {
    #[error("simple invalid data")]
    SimpleData { reason: String },
    #[error("malformed request")]
    MalformedRequest {
        #[serde(skip)]
        status: StatusCode,
        message: String,
    },
    #[error(transparent)]
    #[serde(untagged)]
    Agent(#[from] agent::Error),
}

impl Error {
    fn status_code(&self) -> StatusCode {
        use Error::{Agent, MalformedRequest, SimpleData};
        use processor::error::Error::SampleNotResolved;

        match self {
            SimpleData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            MalformedRequest { status, .. } => *status,
            Agent(inner) => match inner {
                agent::Error::Processing(SampleNotResolved { .. }) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                agent::Error::Publish(publish::Error::Delivery { .. }) => StatusCode::BAD_GATEWAY,
                agent::Error::Processing(processor::error::Error::Store(_))
                | agent::Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(err: JsonRejection) -> Self {
        Self::MalformedRequest {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<garde::Report> for Error {
    fn from(err: garde::Report) -> Self {
        Self::SimpleData {
            reason: format!("{err:#}"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(error = %self);

        #[derive(Serialize)]
        struct ErrorResponse {
            status: u16,
            error: Option<Error>,
        }

        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return (
                status,
                axum::Json(ErrorResponse {
                    status: status.as_u16(),
                    error: None,
                }),
            )
                .into_response();
        }

        (
            status,
            axum::Json(ErrorResponse {
                status: status.as_u16(),
                error: Some(self),
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
