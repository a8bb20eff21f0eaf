use crate::error::Result;
use crate::index::TopicVector;
use crate::store::TopicStore;

/// Topic count asked of the predictor for every document.
pub const TOPIC_LIMIT: usize = 5;

/// Any predictor-side failure, normalized to a single reason. Transport
/// errors, malformed payloads and non-success statuses all end up here.
#[derive(Debug, Clone, thiserror::Error)]
#[error("prediction failed: {0}")]
pub struct PredictionFailed(pub String);

/// Title and topic vector extracted from one reference.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub title: String,
    pub topics: TopicVector,
}

/// External content-understanding service. Implementations own transport,
/// authentication and endpoint configuration.
pub trait TopicPredictor {
    fn predict(
        &self,
        reference: &str,
        topic_limit: usize,
    ) -> std::result::Result<Prediction, PredictionFailed>;
}

/// Outcome of one indexing batch: successes counted, failures kept with the
/// reference that caused them.
#[derive(Debug, Default)]
pub struct IndexReport {
    pub indexed: u32,
    pub failed: Vec<(String, PredictionFailed)>,
}

/// Predict and insert every reference, then commit once. A failed prediction
/// skips that reference only; the rest of the batch still lands durably.
pub fn run_indexing<P: TopicPredictor>(
    store: &mut TopicStore,
    predictor: &P,
    references: &[String],
    topic_limit: usize,
) -> Result<IndexReport> {
    let mut report = IndexReport::default();
    for reference in references {
        tracing::info!(%reference, "indexing");
        match predictor.predict(reference, topic_limit) {
            Ok(prediction) => {
                store.add_document(reference.clone(), prediction.title, prediction.topics);
                report.indexed += 1;
            }
            Err(failure) => {
                tracing::warn!(%reference, error = %failure, "prediction failed, skipping");
                report.failed.push((reference.clone(), failure));
            }
        }
    }
    store.commit()?;
    Ok(report)
}
