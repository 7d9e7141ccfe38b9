use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, State, rejection::JsonRejection},
};
use garde::Validate;

use super::error::{Error, Result};
use crate::{
    agent::Agent,
    model::{AgentResults, SubmissionEnvelope, UpdatedSamplesEnvelope},
    publish::Publisher,
    store::Store,
};

pub(super) struct ValidJson<T>(T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
    T: Validate,
    <T as Validate>::Context: std::default::Default,
{
    type Rejection = Error;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let axum::Json(data) = axum::Json::<T>::from_request(req, state).await?;
        data.validate()?;

        Ok(Self(data))
    }
}

pub(super) async fn submission<S: Store, P: Publisher>(
    State(agent): State<Arc<Agent<S, P>>>,
    ValidJson(envelope): ValidJson<SubmissionEnvelope>,
) -> Result<Json<AgentResults>> {
    let results = agent.handle_submission(&envelope).await?;

    Ok(Json(results))
}

pub(super) async fn samples_updated<S: Store, P: Publisher>(
    State(agent): State<Arc<Agent<S, P>>>,
    ValidJson(envelope): ValidJson<UpdatedSamplesEnvelope>,
) -> Result<()> {
    agent.handle_sample_update(&envelope).await?;

    Ok(())
}
