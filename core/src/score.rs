use crate::error::Result;
use crate::index::TopicVector;
use crate::store::TopicStore;
use std::collections::{HashMap, HashSet};

/// One ranked result: similarity against the query plus the stored
/// uri/title of the candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub score: f32,
    pub uri: String,
    pub title: String,
}

/// Rank committed documents against `query`, best first.
///
/// Candidates are every document sharing at least one topic id with the
/// query. Each scores `dot / (doc_norm * query_norm)`: the dot product and
/// the document norm run over the candidate's matched topic positions only,
/// while the query norm covers the whole query vector. A zero denominator
/// scores 0.0 rather than producing a non-finite value.
pub fn recommend(store: &TopicStore, query: &TopicVector) -> Result<Vec<Recommendation>> {
    let mut query_weights: HashMap<&str, f32> = HashMap::new();
    let mut wanted: HashSet<String> = HashSet::new();
    let mut query_norm = 0.0f32;
    for assignment in query {
        query_norm += assignment.score * assignment.score;
        query_weights.insert(assignment.id.as_str(), assignment.score);
        wanted.insert(assignment.id.clone());
    }
    let query_norm = query_norm.sqrt();

    let mut results = Vec::new();
    for candidate in store.lookup_by_topics(&wanted)? {
        let mut dot = 0.0f32;
        let mut doc_norm = 0.0f32;
        for &position in &candidate.matched {
            let topic = &candidate.topics[position];
            let weight = query_weights.get(topic.id.as_str()).copied().unwrap_or(0.0);
            dot += topic.score * weight;
            doc_norm += topic.score * topic.score;
        }
        let doc_norm = doc_norm.sqrt();
        let denom = doc_norm * query_norm;
        let score = if denom == 0.0 { 0.0 } else { dot / denom };
        results.push(Recommendation {
            score,
            uri: candidate.uri,
            title: candidate.title,
        });
    }

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(results)
}
