use std::sync::Arc;

use axum::{Router, routing::post};

use crate::{agent::Agent, publish::Publisher, store::Store};

mod error;
mod handler;

pub(super) const SUBMISSIONS: &str = "/submissions";
pub(super) const SAMPLES_UPDATED: &str = "/samples-updated";

pub(super) fn router<S: Store, P: Publisher>() -> Router<Arc<Agent<S, P>>> {
    Router::new()
        .route(SUBMISSIONS, post(handler::submission::<S, P>))
        .route(SAMPLES_UPDATED, post(handler::samples_updated::<S, P>))
}
