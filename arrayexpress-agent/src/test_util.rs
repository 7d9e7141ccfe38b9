use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

use rstest::fixture;

use crate::{
    model::{
        Archive, ArrayExpressStudy, Assay, AssayData, AssayRef, Sample, SampleDataRelationship,
        SampleRef, SampleUse, Study, StudyRef, Submission, SubmissionEnvelope,
        aggregate::StudyDocument,
    },
    publish::Publisher,
    store::{
        MAX_DOCUMENT_SIZE, Page, PageRequest, Store, check_document_size,
        error::{Error, Result},
    },
};

pub const TEAM: &str = "team-1";

#[derive(Default)]
pub struct StoreState {
    pub studies: BTreeMap<String, StudyDocument>,
    pub relationships: BTreeMap<String, SampleDataRelationship>,
    pub relationship_saves: HashMap<String, usize>,
    pub relationship_queries: usize,
}

type FindHook = dyn Fn(&mut StoreState, usize) + Send + Sync;

/// In-process stand-in for [`crate::store::MongoStore`], with the same ordering, pagination and size checks.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    max_document_size: usize,
    fail_relationship_writes: bool,
    after_find: Option<Arc<FindHook>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            max_document_size: MAX_DOCUMENT_SIZE,
            fail_relationship_writes: false,
            after_find: None,
        }
    }
}

impl InMemoryStore {
    pub fn with_max_document_size(mut self, max_document_size: usize) -> Self {
        self.max_document_size = max_document_size;
        self
    }

    /// Every relationship-set write fails, as if the process died between the two writes of a study.
    pub fn failing_relationship_writes(mut self) -> Self {
        self.fail_relationship_writes = true;
        self
    }

    /// Runs `hook` after each relationship page is read, with the number of pages read so far, to play the part of a
    /// concurrent writer.
    pub fn after_find(mut self, hook: impl Fn(&mut StoreState, usize) + Send + Sync + 'static) -> Self {
        self.after_find = Some(Arc::new(hook));
        self
    }

    pub fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap()
    }

    pub fn insert_relationship(&self, relationship: SampleDataRelationship) {
        self.state()
            .relationships
            .insert(relationship.id.clone(), relationship);
    }

    pub fn relationship(&self, id: &str) -> SampleDataRelationship {
        self.state().relationships.get(id).cloned().unwrap()
    }

    pub fn relationships(&self) -> Vec<SampleDataRelationship> {
        self.state().relationships.values().cloned().collect()
    }

    pub fn study(&self, accession: &str) -> Option<StudyDocument> {
        self.state().studies.get(accession).cloned()
    }

    pub fn n_studies(&self) -> usize {
        self.state().studies.len()
    }
}

impl Store for InMemoryStore {
    async fn save_study(&self, study: &ArrayExpressStudy) -> Result<()> {
        let document = study.to_document();
        check_document_size("studies", &document.accession, &document, self.max_document_size)?;

        self.state()
            .studies
            .insert(document.accession.clone(), document);

        Ok(())
    }

    async fn save_relationships(&self, relationships: &[SampleDataRelationship]) -> Result<()> {
        if self.fail_relationship_writes {
            return Err(Error::Other {
                message: "connection reset".to_string(),
            });
        }

        for relationship in relationships {
            check_document_size("relationships", &relationship.id, relationship, self.max_document_size)?;
        }

        for relationship in relationships {
            self.save_relationship(relationship).await?;
        }

        Ok(())
    }

    async fn save_relationship(&self, relationship: &SampleDataRelationship) -> Result<()> {
        let mut state = self.state();

        *state
            .relationship_saves
            .entry(relationship.id.clone())
            .or_default() += 1;
        state
            .relationships
            .insert(relationship.id.clone(), relationship.clone());

        Ok(())
    }

    async fn find_relationships_by_sample_accession(
        &self,
        accession: &str,
        page: PageRequest,
    ) -> Result<Page<SampleDataRelationship>> {
        let mut state = self.state();

        let matching = state
            .relationships
            .values()
            .filter(|r| r.references_sample(accession))
            .cloned()
            .collect();
        let page = Page::from_ordered(matching, page);

        state.relationship_queries += 1;
        if let Some(hook) = &self.after_find {
            let n_queries = state.relationship_queries;
            hook(&mut *state, n_queries);
        }

        Ok(page)
    }

    async fn find_studies(&self, page: PageRequest) -> Result<Page<StudyDocument>> {
        let studies = self.state().studies.values().cloned().collect();

        Ok(Page::from_ordered(studies, page))
    }

    async fn existing_relationship_ids(&self, ids: &[String]) -> Result<Vec<String>> {
        let state = self.state();

        Ok(ids
            .iter()
            .filter(|id| state.relationships.contains_key(*id))
            .cloned()
            .collect())
    }
}

/// Keeps everything it is asked to publish.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    published: Arc<Mutex<Vec<crate::model::AgentResults>>>,
    unreachable: bool,
}

impl RecordingPublisher {
    /// A publisher whose every delivery fails, as if the receiving end were down.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    pub fn published(&self) -> Vec<crate::model::AgentResults> {
        self.published.lock().unwrap().clone()
    }
}

impl Publisher for RecordingPublisher {
    async fn publish(&self, results: &crate::model::AgentResults) -> crate::publish::Result<()> {
        if self.unreachable {
            return Err(crate::publish::Error::Delivery {
                submission_id: results.submission_id.clone(),
                message: "connection refused".to_string(),
            });
        }

        self.published.lock().unwrap().push(results.clone());

        Ok(())
    }
}

#[fixture]
pub fn store() -> InMemoryStore {
    InMemoryStore::default()
}

#[fixture]
pub fn publisher() -> RecordingPublisher {
    RecordingPublisher::default()
}

pub fn study(alias: &str, archive: Archive) -> Study {
    Study {
        id: format!("{alias}-id"),
        alias: Some(alias.to_string()),
        team: Some(TEAM.to_string()),
        archive: Some(archive),
        ..Default::default()
    }
}

pub fn assay(alias: &str, archive: Archive, study_alias: &str, sample_accessions: &[&str]) -> Assay {
    Assay {
        id: format!("{alias}-id"),
        alias: Some(alias.to_string()),
        team: Some(TEAM.to_string()),
        archive: Some(archive),
        study_ref: StudyRef {
            alias: Some(study_alias.to_string()),
            team: Some(TEAM.to_string()),
            ..Default::default()
        },
        sample_uses: sample_accessions
            .iter()
            .map(|accession| sample_use(accession))
            .collect(),
        ..Default::default()
    }
}

pub fn assay_data(alias: &str, archive: Archive, assay_alias: &str) -> AssayData {
    AssayData {
        id: format!("{alias}-id"),
        alias: Some(alias.to_string()),
        team: Some(TEAM.to_string()),
        archive: Some(archive),
        assay_ref: AssayRef {
            alias: Some(assay_alias.to_string()),
            team: Some(TEAM.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn sample(accession: &str) -> Sample {
    Sample {
        id: format!("{accession}-id"),
        alias: Some(accession.to_lowercase()),
        accession: Some(accession.to_string()),
        team: Some(TEAM.to_string()),
        archive: Some(Archive::BioSamples),
        taxon_id: Some(9606),
        taxon: Some("Homo sapiens".to_string()),
        ..Default::default()
    }
}

pub fn sample_use(accession: &str) -> SampleUse {
    SampleUse {
        sample_ref: SampleRef {
            accession: Some(accession.to_string()),
            ..Default::default()
        },
    }
}

/// A relationship as the agent would have stored it before the sample was accessioned elsewhere.
pub fn stored_relationship(id: &str, sample_accessions: &[&str]) -> SampleDataRelationship {
    let mut relationship = SampleDataRelationship::new(assay(
        &format!("assay-{id}"),
        Archive::ArrayExpress,
        "study",
        sample_accessions,
    ));
    relationship.id = id.to_string();
    relationship.sample_uses = relationship.assay.sample_uses.clone();

    relationship
}

/// One study, one assay using one sample, one file.
pub fn single_assay_submission() -> SubmissionEnvelope {
    SubmissionEnvelope {
        submission: Submission {
            id: "submission-1".to_string(),
            studies: vec![study("study-1", Archive::ArrayExpress)],
            assays: vec![assay("assay-1", Archive::ArrayExpress, "study-1", &["SAMEA1"])],
            assay_data: vec![assay_data("data-1", Archive::ArrayExpress, "assay-1")],
            samples: vec![sample("SAMEA1")],
        },
        supporting_samples: vec![],
    }
}
