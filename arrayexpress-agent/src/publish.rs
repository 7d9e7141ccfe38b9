use serde::Serialize;
use url::Url;

use crate::model::AgentResults;

#[derive(thiserror::Error, Debug, Serialize, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Error {
    #[error("failed to publish results for submission {submission_id}: {message}")]
    Delivery {
        submission_id: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Outbound side of the "agent-results" event.
pub trait Publisher: Send + Sync + 'static {
    fn publish(&self, results: &AgentResults) -> impl Future<Output = Result<()>> + Send;
}

/// POSTs results as JSON to a fixed URL.
#[derive(Clone)]
pub struct HttpPublisher {
    http_client: reqwest::Client,
    results_url: Url,
}

impl HttpPublisher {
    #[must_use]
    pub fn new(http_client: reqwest::Client, results_url: Url) -> Self {
        Self {
            http_client,
            results_url,
        }
    }
}

impl Publisher for HttpPublisher {
    async fn publish(&self, results: &AgentResults) -> Result<()> {
        let delivery_error = |err: reqwest::Error| Error::Delivery {
            submission_id: results.submission_id.clone(),
            message: format!("{err:#}"),
        };

        self.http_client
            .post(self.results_url.clone())
            .json(results)
            .send()
            .await
            .map_err(delivery_error)?
            .error_for_status()
            .map_err(delivery_error)?;

        Ok(())
    }
}

/// Used when there is nowhere to send results, as in development.
#[derive(Clone, Default)]
pub struct LogPublisher;

impl Publisher for LogPublisher {
    async fn publish(&self, results: &AgentResults) -> Result<()> {
        tracing::info!(
            submission_id = %results.submission_id,
            n_certificates = results.certificates.len(),
            "agent results"
        );

        for certificate in &results.certificates {
            tracing::info!(
                subject_id = %certificate.subject_id,
                archive = %certificate.archive,
                status = %certificate.status,
                accession = certificate.accession.as_deref(),
                "certificate"
            );
        }

        Ok(())
    }
}

#[derive(Clone)]
pub enum ResultsPublisher {
    Http(HttpPublisher),
    Log(LogPublisher),
}

impl ResultsPublisher {
    #[must_use]
    pub fn new(results_url: Option<Url>) -> Self {
        match results_url {
            Some(url) => Self::Http(HttpPublisher::new(reqwest::Client::new(), url)),
            None => Self::Log(LogPublisher),
        }
    }
}

impl Publisher for ResultsPublisher {
    async fn publish(&self, results: &AgentResults) -> Result<()> {
        match self {
            Self::Http(publisher) => publisher.publish(results).await,
            Self::Log(publisher) => publisher.publish(results).await,
        }
    }
}
