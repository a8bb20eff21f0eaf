pub mod error;
pub mod index;
pub mod indexer;
pub mod persist;
pub mod score;
pub mod store;

pub use error::StoreError;
pub use index::{DocId, DocRecord, MatchedDocument, Posting, TopicAssignment, TopicId, TopicVector};
