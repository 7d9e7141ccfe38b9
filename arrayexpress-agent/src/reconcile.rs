use std::collections::HashSet;

use serde::Serialize;

use crate::store::{PageRequest, Store, error::Result};

/// An aggregate root whose relationship set was not (fully) written.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IncompleteStudy {
    pub accession: String,
    pub missing_relationship_ids: Vec<String>,
}

/// Pages through every stored study and reports those referring to relationships that do not exist. Nothing is
/// repaired.
///
/// # Errors
pub async fn find_incomplete_studies<S: Store>(
    store: &S,
    page_size: u64,
) -> Result<Vec<IncompleteStudy>> {
    let mut incomplete = Vec::new();
    let mut request = PageRequest::first(page_size.max(1));

    loop {
        let page = store.find_studies(request).await?;
        let is_last = page.is_last();

        for study in page.items {
            let existing: HashSet<String> = store
                .existing_relationship_ids(&study.sample_data_relationship_ids)
                .await?
                .into_iter()
                .collect();

            let missing_relationship_ids: Vec<String> = study
                .sample_data_relationship_ids
                .into_iter()
                .filter(|id| !existing.contains(id))
                .collect();

            if !missing_relationship_ids.is_empty() {
                tracing::warn!(
                    study_accession = %study.accession,
                    n_missing = missing_relationship_ids.len(),
                    "study is missing relationships"
                );

                incomplete.push(IncompleteStudy {
                    accession: study.accession,
                    missing_relationship_ids,
                });
            }
        }

        if is_last {
            return Ok(incomplete);
        }

        request = request.next();
    }
}
