use serde::{Deserialize, Serialize};

pub type TopicId = u32;
pub type DocId = u32;

/// One topic attached to a document by the prediction service. `id` is an
/// opaque identifier from the external taxonomy; `score` is non-negative on
/// whatever scale the predictor uses, consistent within one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicAssignment {
    pub id: String,
    pub label: String,
    pub score: f32,
}

/// Ordered topic assignments for one document. Ids are expected unique
/// within a vector; duplicates coming from upstream are kept as-is.
pub type TopicVector = Vec<TopicAssignment>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocRecord {
    pub uri: String,
    /// Best-effort extracted title, may be empty.
    pub title: String,
    pub topics: TopicVector,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub score: f32,
}

/// A document returned by a topic lookup.
#[derive(Debug, Clone)]
pub struct MatchedDocument {
    pub uri: String,
    pub title: String,
    /// The document's full topic vector, in indexed order.
    pub topics: TopicVector,
    /// Indices into `topics` that intersect the queried id set.
    pub matched: Vec<usize>,
}
