use reco_core::score::recommend;
use reco_core::store::TopicStore;
use reco_core::TopicAssignment;
use tempfile::tempdir;

fn assignment(id: &str, score: f32) -> TopicAssignment {
    TopicAssignment { id: id.into(), label: String::new(), score }
}

#[test]
fn document_norm_covers_matched_positions_only() {
    // A and B overlap the query on t1 alone; because the document norm runs
    // over the matched positions, both collapse to exactly 1.0 no matter
    // what their other topics weigh.
    let dir = tempdir().unwrap();
    let mut store = TopicStore::create(dir.path().join("index")).unwrap();
    store.add_document(
        "doc://a".into(),
        "A".into(),
        vec![assignment("t1", 0.8), assignment("t2", 0.6)],
    );
    store.add_document(
        "doc://b".into(),
        "B".into(),
        vec![assignment("t1", 0.3), assignment("t3", 0.9)],
    );
    store.commit().unwrap();

    let results = recommend(&store, &vec![assignment("t1", 1.0)]).unwrap();
    assert_eq!(results.len(), 2);
    for r in &results {
        assert!((r.score - 1.0).abs() < 1e-6, "{} scored {}", r.uri, r.score);
    }
}

#[test]
fn output_is_sorted_non_increasing() {
    let dir = tempdir().unwrap();
    let mut store = TopicStore::create(dir.path().join("index")).unwrap();
    store.add_document(
        "doc://a".into(),
        "A".into(),
        vec![assignment("t1", 0.9), assignment("t2", 0.1)],
    );
    store.add_document("doc://b".into(), "B".into(), vec![assignment("t1", 0.5)]);
    store.add_document(
        "doc://c".into(),
        "C".into(),
        vec![assignment("t2", 0.2), assignment("t5", 0.9)],
    );
    store.commit().unwrap();

    let query = vec![assignment("t1", 1.0), assignment("t2", 1.0)];
    let results = recommend(&store, &query).unwrap();
    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn disjoint_documents_never_appear() {
    let dir = tempdir().unwrap();
    let mut store = TopicStore::create(dir.path().join("index")).unwrap();
    store.add_document("doc://far".into(), "Far".into(), vec![assignment("t9", 0.9)]);
    store.add_document("doc://near".into(), "Near".into(), vec![assignment("t1", 0.9)]);
    store.commit().unwrap();

    let results = recommend(&store, &vec![assignment("t1", 1.0)]).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].uri, "doc://near");
}

#[test]
fn querying_a_document_with_its_own_vector_scores_one() {
    let dir = tempdir().unwrap();
    let mut store = TopicStore::create(dir.path().join("index")).unwrap();
    let vector = vec![assignment("t1", 0.8), assignment("t2", 0.6), assignment("t3", 0.2)];
    store.add_document("doc://self".into(), "Self".into(), vector.clone());
    store.commit().unwrap();

    let results = recommend(&store, &vector).unwrap();
    assert_eq!(results.len(), 1);
    assert!((results[0].score - 1.0).abs() < 1e-6);
}

#[test]
fn zero_norm_candidates_score_zero() {
    let dir = tempdir().unwrap();
    let mut store = TopicStore::create(dir.path().join("index")).unwrap();
    store.add_document("doc://zero".into(), "Zero".into(), vec![assignment("t1", 0.0)]);
    store.add_document("doc://real".into(), "Real".into(), vec![assignment("t1", 0.4)]);
    store.commit().unwrap();

    let results = recommend(&store, &vec![assignment("t1", 1.0)]).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].uri, "doc://real");
    assert_eq!(results[1].score, 0.0);
    assert!(results.iter().all(|r| r.score.is_finite()));
}
