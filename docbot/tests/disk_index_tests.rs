//! Persistence behavior of the on-disk vector index.

use std::collections::HashMap;

use docbot::{DiskIndex, DocbotError, IndexedDocument, VectorIndex};

const DIM: usize = 4;

fn document(id: &str, embedding: Vec<f32>) -> IndexedDocument {
    IndexedDocument {
        id: id.to_string(),
        text: format!("text of {id}"),
        embedding,
        metadata: HashMap::from([
            ("source".to_string(), format!("/wiki/{id}")),
            ("text".to_string(), format!("text of {id}")),
        ]),
    }
}

#[tokio::test]
async fn documents_survive_a_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let index = DiskIndex::open(dir.path()).await.unwrap();
        index.ensure_collection("docs", DIM).await.unwrap();
        index
            .upsert(
                "docs",
                &[document("1", vec![1.0, 0.0, 0.0, 0.0]), document("2", vec![0.0, 1.0, 0.0, 0.0])],
            )
            .await
            .unwrap();
    }

    let reopened = DiskIndex::open(dir.path()).await.unwrap();
    let mut ids = reopened.ids("docs").await.unwrap();
    ids.sort();
    assert_eq!(ids, vec!["1", "2"]);

    let results = reopened.search("docs", &[1.0, 0.0, 0.0, 0.0], 1).await.unwrap();
    assert_eq!(results[0].document.id, "1");
    assert_eq!(results[0].document.metadata["source"], "/wiki/1");
}

#[tokio::test]
async fn upsert_replaces_by_id_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let index = DiskIndex::open(dir.path()).await.unwrap();
        index.ensure_collection("docs", DIM).await.unwrap();
        index.upsert("docs", &[document("1", vec![1.0, 0.0, 0.0, 0.0])]).await.unwrap();
        index.upsert("docs", &[document("1", vec![0.0, 0.0, 0.0, 1.0])]).await.unwrap();
    }

    let reopened = DiskIndex::open(dir.path()).await.unwrap();
    assert_eq!(reopened.ids("docs").await.unwrap(), vec!["1"]);

    let results = reopened.search("docs", &[0.0, 0.0, 0.0, 1.0], 1).await.unwrap();
    assert_eq!(results[0].document.embedding, vec![0.0, 0.0, 0.0, 1.0]);
}

#[tokio::test]
async fn remove_persists() {
    let dir = tempfile::tempdir().unwrap();

    {
        let index = DiskIndex::open(dir.path()).await.unwrap();
        index.ensure_collection("docs", DIM).await.unwrap();
        index
            .upsert(
                "docs",
                &[document("1", vec![1.0, 0.0, 0.0, 0.0]), document("2", vec![0.0, 1.0, 0.0, 0.0])],
            )
            .await
            .unwrap();
        index.remove("docs", &["1"]).await.unwrap();
    }

    let reopened = DiskIndex::open(dir.path()).await.unwrap();
    assert_eq!(reopened.ids("docs").await.unwrap(), vec!["2"]);
}

#[tokio::test]
async fn ensure_collection_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let index = DiskIndex::open(dir.path()).await.unwrap();

    index.ensure_collection("docs", DIM).await.unwrap();
    index.upsert("docs", &[document("1", vec![1.0, 0.0, 0.0, 0.0])]).await.unwrap();
    index.ensure_collection("docs", DIM).await.unwrap();

    assert_eq!(index.ids("docs").await.unwrap(), vec!["1"], "re-ensure must not wipe data");
}

#[tokio::test]
async fn collections_are_independent_namespaces() {
    let dir = tempfile::tempdir().unwrap();
    let index = DiskIndex::open(dir.path()).await.unwrap();

    index.ensure_collection("eng", DIM).await.unwrap();
    index.ensure_collection("ops", DIM).await.unwrap();
    index.upsert("eng", &[document("1", vec![1.0, 0.0, 0.0, 0.0])]).await.unwrap();

    assert_eq!(index.ids("eng").await.unwrap().len(), 1);
    assert!(index.ids("ops").await.unwrap().is_empty());
}

#[tokio::test]
async fn mismatched_dimensions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let index = DiskIndex::open(dir.path()).await.unwrap();
    index.ensure_collection("docs", DIM).await.unwrap();

    let err = index.upsert("docs", &[document("1", vec![1.0, 0.0])]).await.unwrap_err();
    assert!(matches!(err, DocbotError::Index { .. }));
}

#[tokio::test]
async fn unknown_collection_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let index = DiskIndex::open(dir.path()).await.unwrap();

    let err = index.search("nope", &[1.0, 0.0, 0.0, 0.0], 1).await.unwrap_err();
    assert!(matches!(err, DocbotError::Index { .. }));
}

#[tokio::test]
async fn corrupt_collection_file_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("docs.json"), b"not json").await.unwrap();

    let err = DiskIndex::open(dir.path()).await.unwrap_err();
    assert!(matches!(err, DocbotError::Index { .. }));
}
