pub mod error;
pub mod mongo;
mod page;

use crate::model::{ArrayExpressStudy, SampleDataRelationship, aggregate::StudyDocument};
use error::Result;
pub use mongo::MongoStore;
pub use page::{Page, PageRequest};

/// Largest document the store accepts, in bytes of BSON.
pub const MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Persistence for accessioned studies and their sample-data relationships.
///
/// Writes are per document. Nothing spans the aggregate root and its relationship set, so a failure between
/// [`Store::save_study`] and [`Store::save_relationships`] leaves a root whose relationships are missing. Such roots
/// are found by [`crate::reconcile::find_incomplete_studies`].
pub trait Store: Clone + Send + Sync + 'static {
    /// # Errors
    /// [`error::Error::SizeLimitExceeded`] when the serialized root is too large.
    fn save_study(
        &self,
        study: &ArrayExpressStudy,
    ) -> impl Future<Output = Result<()>> + Send;

    /// # Errors
    /// [`error::Error::SizeLimitExceeded`] when any one relationship is too large. No relationship is written in that
    /// case.
    fn save_relationships(
        &self,
        relationships: &[SampleDataRelationship],
    ) -> impl Future<Output = Result<()>> + Send;

    fn save_relationship(
        &self,
        relationship: &SampleDataRelationship,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Relationships with at least one sample use referring to `accession`, ordered by id.
    fn find_relationships_by_sample_accession(
        &self,
        accession: &str,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<SampleDataRelationship>>> + Send;

    /// Stored aggregate roots, ordered by accession.
    fn find_studies(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<StudyDocument>>> + Send;

    /// The subset of `ids` that exist in the relationship collection.
    fn existing_relationship_ids(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Size of `document` once serialized to BSON, checked against `limit`.
///
/// # Errors
/// [`error::Error::SizeLimitExceeded`] if the document is larger than `limit`.
pub fn check_document_size<T: serde::Serialize>(
    collection: &str,
    id: &str,
    document: &T,
    limit: usize,
) -> Result<usize> {
    let size = mongodb::bson::to_vec(document)?.len();

    if size > limit {
        return Err(error::Error::SizeLimitExceeded {
            collection: collection.to_string(),
            id: id.to_string(),
            size,
            limit,
        });
    }

    Ok(size)
}
