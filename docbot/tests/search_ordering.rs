//! Property tests for in-memory index search ordering.

use std::collections::HashMap;

use docbot::document::IndexedDocument;
use docbot::inmemory::InMemoryIndex;
use docbot::vectorstore::VectorIndex;
use proptest::prelude::*;

const DIM: usize = 16;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate an indexed document with a normalized embedding.
fn arb_document(dim: usize) -> impl Strategy<Value = IndexedDocument> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, text, embedding)| IndexedDocument {
            id,
            text: text.clone(),
            embedding,
            metadata: HashMap::from([
                ("source".to_string(), "/wiki/p".to_string()),
                ("text".to_string(), text),
            ]),
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any stored set, search returns results ordered by descending
    /// cosine similarity, bounded by `top_k` and by the collection size.
    #[test]
    fn results_ordered_descending_and_bounded_by_top_k(
        documents in proptest::collection::vec(arb_document(DIM), 1..20),
        query in arb_normalized_embedding(DIM),
        top_k in 1usize..25,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (results, unique_count) = rt.block_on(async {
            let index = InMemoryIndex::new();
            index.ensure_collection("test", DIM).await.unwrap();

            // Deduplicate by id so upsert overwrites do not shrink the
            // expected count.
            let mut deduped: HashMap<String, IndexedDocument> = HashMap::new();
            for document in &documents {
                deduped.entry(document.id.clone()).or_insert_with(|| document.clone());
            }
            let unique: Vec<IndexedDocument> = deduped.into_values().collect();
            let count = unique.len();

            index.upsert("test", &unique).await.unwrap();
            let results = index.search("test", &query, top_k).await.unwrap();
            (results, count)
        });

        prop_assert!(results.len() <= top_k);
        prop_assert!(results.len() <= unique_count);

        for window in results.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }
}
