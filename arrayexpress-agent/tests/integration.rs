use arrayexpress_agent::{
    agent::{Agent, Settings},
    model::{
        Archive, Assay, AssayData, AssayRef, Sample, SampleRef, SampleUse, Study, StudyRef,
        Submission, SubmissionEnvelope, UpdatedSamplesEnvelope,
    },
    publish::LogPublisher,
    reconcile::find_incomplete_studies,
    server::{connect_store, util::DevContainer},
    store::{MongoStore, PageRequest, Store},
};
use pretty_assertions::assert_eq;
use uuid::Uuid;

const TEAM: &str = "team-1";

async fn mongo_store(container: &DevContainer) -> MongoStore {
    let db_name = format!("arrayexpress_agent_{}", Uuid::now_v7().simple());

    connect_store(&container.db_url().await.unwrap(), &db_name)
        .await
        .unwrap()
}

fn envelope(n_assays: usize) -> SubmissionEnvelope {
    let study = Study {
        id: "study-1-id".to_string(),
        alias: Some("study-1".to_string()),
        team: Some(TEAM.to_string()),
        archive: Some(Archive::ArrayExpress),
        ..Default::default()
    };

    let assays = (0..n_assays)
        .map(|i| Assay {
            id: format!("assay-{i}-id"),
            alias: Some(format!("assay-{i}")),
            team: Some(TEAM.to_string()),
            archive: Some(Archive::ArrayExpress),
            study_ref: StudyRef {
                alias: Some("study-1".to_string()),
                team: Some(TEAM.to_string()),
                ..Default::default()
            },
            sample_uses: vec![SampleUse {
                sample_ref: SampleRef {
                    accession: Some("SAMEA1".to_string()),
                    ..Default::default()
                },
            }],
            ..Default::default()
        })
        .collect();

    let assay_data = (0..n_assays)
        .map(|i| AssayData {
            id: format!("data-{i}-id"),
            alias: Some(format!("data-{i}")),
            team: Some(TEAM.to_string()),
            archive: Some(Archive::ArrayExpress),
            assay_ref: AssayRef {
                alias: Some(format!("assay-{i}")),
                team: Some(TEAM.to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
        .collect();

    SubmissionEnvelope {
        submission: Submission {
            id: "submission-1".to_string(),
            studies: vec![study],
            assays,
            assay_data,
            samples: vec![],
        },
        supporting_samples: vec![Sample {
            id: "SAMEA1-id".to_string(),
            accession: Some("SAMEA1".to_string()),
            ..Default::default()
        }],
    }
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn mongo_round_trip() {
    let container = DevContainer::new("arrayexpress-agent_integration_test")
        .await
        .unwrap();
    let store = mongo_store(&container).await;
    let agent = Agent::new(
        store.clone(),
        LogPublisher,
        Settings {
            backfill_page_size: 2,
            ..Default::default()
        },
    );

    let results = agent.handle_submission(&envelope(3)).await.unwrap();
    assert_eq!(results.certificates.len(), 7);

    let page = store
        .find_relationships_by_sample_accession("SAMEA1", PageRequest::new(0, 2))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 2);
    assert!(!page.is_last());

    let curated = Sample {
        id: "SAMEA1-id".to_string(),
        accession: Some("SAMEA1".to_string()),
        title: Some("curated".to_string()),
        ..Default::default()
    };
    let summary = agent
        .handle_sample_update(&UpdatedSamplesEnvelope {
            submission_id: "submission-2".to_string(),
            updated_samples: vec![curated.clone()],
        })
        .await
        .unwrap();
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.relationships_saved, 3);

    let all = store
        .find_relationships_by_sample_accession("SAMEA1", PageRequest::default())
        .await
        .unwrap();
    assert!(
        all.items
            .iter()
            .all(|r| r.sample_uses[0].sample_ref.referenced_object.as_ref() == Some(&curated))
    );

    let incomplete = find_incomplete_studies(&store, 10).await.unwrap();
    assert!(incomplete.is_empty());
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn oversized_relationships_leave_an_incomplete_study() {
    let container = DevContainer::new("arrayexpress-agent_integration_test_oversized")
        .await
        .unwrap();
    let store = mongo_store(&container).await.with_max_document_size(2048);
    let agent = Agent::new(store.clone(), LogPublisher, Settings::default());

    let mut envelope = envelope(1);
    envelope.submission.assays[0].title = Some("x".repeat(4096));

    let results = agent.handle_submission(&envelope).await.unwrap();
    assert!(results.certificates.is_empty());

    let incomplete = find_incomplete_studies(&store, 10).await.unwrap();
    assert_eq!(incomplete.len(), 1);
    assert_eq!(incomplete[0].missing_relationship_ids.len(), 1);
}
