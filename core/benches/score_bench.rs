use criterion::{criterion_group, criterion_main, Criterion};
use reco_core::score::recommend;
use reco_core::store::TopicStore;
use reco_core::TopicAssignment;

fn bench_recommend(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let mut store = TopicStore::create(dir.path().join("bench_index")).unwrap();
    for d in 0..1000u32 {
        let topics = (0..5u32)
            .map(|t| TopicAssignment {
                id: format!("topic-{}", (d + t * 7) % 40),
                label: format!("label {t}"),
                score: 0.1 + t as f32 * 0.2,
            })
            .collect();
        store.add_document(format!("doc://{d}"), format!("doc {d}"), topics);
    }
    store.commit().unwrap();

    let query: Vec<TopicAssignment> = (0..5u32)
        .map(|t| TopicAssignment {
            id: format!("topic-{}", t * 7),
            label: String::new(),
            score: 1.0,
        })
        .collect();

    c.bench_function("recommend_1k_docs", |b| b.iter(|| recommend(&store, &query).unwrap()));
}

criterion_group!(benches, bench_recommend);
criterion_main!(benches);
