use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Bson, Document, doc},
    options::{FindOptions, IndexOptions, ReplaceOptions},
};

use super::{
    MAX_DOCUMENT_SIZE, Page, PageRequest, Store, check_document_size,
    error::Result,
};
use crate::model::{ArrayExpressStudy, SampleDataRelationship, aggregate::StudyDocument};

const STUDIES: &str = "arrayExpressStudy";
const RELATIONSHIPS: &str = "sampleDataRelationship";
const SAMPLE_ACCESSION_INDEX: &str = "sample_use_ref_accession";

#[derive(Clone)]
pub struct MongoStore {
    studies: Collection<StudyDocument>,
    relationships: Collection<SampleDataRelationship>,
    max_document_size: usize,
}

impl MongoStore {
    /// # Errors
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;

        Ok(Self::new(&client.database(db_name)))
    }

    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            studies: db.collection(STUDIES),
            relationships: db.collection(RELATIONSHIPS),
            max_document_size: MAX_DOCUMENT_SIZE,
        }
    }

    /// Lowers the per-document limit below the server's own, mostly so that oversized aggregates can be exercised
    /// without building 16 MiB of test data.
    #[must_use]
    pub fn with_max_document_size(mut self, max_document_size: usize) -> Self {
        self.max_document_size = max_document_size;
        self
    }

    /// # Errors
    pub async fn ensure_indexes(&self) -> Result<()> {
        let mut keys = Document::new();
        keys.insert(SampleDataRelationship::SAMPLE_ACCESSION_PATH, 1);

        let index = IndexModel::builder()
            .keys(keys)
            .options(
                IndexOptions::builder()
                    .name(SAMPLE_ACCESSION_INDEX.to_string())
                    .build(),
            )
            .build();

        self.relationships.create_index(index, None).await?;

        Ok(())
    }

    fn page_options(page: PageRequest) -> FindOptions {
        FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(page.offset())
            .limit(i64::try_from(page.size).unwrap_or(i64::MAX))
            .build()
    }

    fn upsert() -> ReplaceOptions {
        ReplaceOptions::builder().upsert(true).build()
    }

    async fn replace_relationship(&self, relationship: &SampleDataRelationship) -> Result<()> {
        self.relationships
            .replace_one(doc! { "_id": relationship.id.as_str() }, relationship, Self::upsert())
            .await?;

        Ok(())
    }
}

impl Store for MongoStore {
    async fn save_study(&self, study: &ArrayExpressStudy) -> Result<()> {
        let document = study.to_document();
        check_document_size(STUDIES, &document.accession, &document, self.max_document_size)?;

        self.studies
            .replace_one(doc! { "_id": document.accession.as_str() }, &document, Self::upsert())
            .await?;

        Ok(())
    }

    async fn save_relationships(&self, relationships: &[SampleDataRelationship]) -> Result<()> {
        for relationship in relationships {
            check_document_size(
                RELATIONSHIPS,
                &relationship.id,
                relationship,
                self.max_document_size,
            )?;
        }

        for relationship in relationships {
            self.replace_relationship(relationship).await?;
        }

        Ok(())
    }

    async fn save_relationship(&self, relationship: &SampleDataRelationship) -> Result<()> {
        check_document_size(
            RELATIONSHIPS,
            &relationship.id,
            relationship,
            self.max_document_size,
        )?;

        self.replace_relationship(relationship).await
    }

    async fn find_relationships_by_sample_accession(
        &self,
        accession: &str,
        page: PageRequest,
    ) -> Result<Page<SampleDataRelationship>> {
        let mut filter = Document::new();
        filter.insert(SampleDataRelationship::SAMPLE_ACCESSION_PATH, accession);

        let total_items = self
            .relationships
            .count_documents(filter.clone(), None)
            .await?;

        let items = self
            .relationships
            .find(filter, Self::page_options(page))
            .await?
            .try_collect()
            .await?;

        Ok(Page::new(items, page, total_items))
    }

    async fn find_studies(&self, page: PageRequest) -> Result<Page<StudyDocument>> {
        let total_items = self.studies.count_documents(None, None).await?;

        let items = self
            .studies
            .find(None, Self::page_options(page))
            .await?
            .try_collect()
            .await?;

        Ok(Page::new(items, page, total_items))
    }

    async fn existing_relationship_ids(&self, ids: &[String]) -> Result<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let existing = self
            .relationships
            .distinct("_id", doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await?;

        Ok(existing
            .into_iter()
            .filter_map(|id| match id {
                Bson::String(id) => Some(id),
                _ => None,
            })
            .collect())
    }
}
