use crate::error::{Result, StoreError};
use crate::index::{DocId, DocRecord, MatchedDocument, Posting, TopicId, TopicVector};
use crate::persist::{
    load_postings_for_topic, load_store_header, save_docs, save_meta, save_postings_for_topic,
    save_topic_map, IndexPaths, MetaFile,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const STORE_VERSION: u32 = 1;

/// Document table plus inverted topic index, durable under one directory.
///
/// A store built with [`TopicStore::create`] accumulates documents in
/// memory; nothing is visible to lookups until [`TopicStore::commit`] writes
/// the batch out. [`TopicStore::open`] loads a committed store for querying.
#[derive(Debug)]
pub struct TopicStore {
    paths: IndexPaths,
    /// External topic id -> internal numeric id used for posting files.
    topic_ids: HashMap<String, TopicId>,
    docs: HashMap<DocId, DocRecord>,
    pending: HashMap<TopicId, Vec<Posting>>,
    next_doc_id: DocId,
    next_topic_id: TopicId,
}

impl TopicStore {
    /// Open an existing committed store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let paths = IndexPaths::new(&path);
        if !paths.meta().is_file() {
            return Err(StoreError::NotFound(paths.root));
        }
        let (topic_ids, docs, meta) = load_store_header(&paths)?;
        let next_topic_id = topic_ids.len() as TopicId;
        Ok(Self {
            paths,
            topic_ids,
            docs,
            pending: HashMap::new(),
            next_doc_id: meta.num_docs,
            next_topic_id,
        })
    }

    /// Create a fresh, empty store, replacing whatever was at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::flush(&path)?;
        let paths = IndexPaths::new(&path);
        fs::create_dir_all(&paths.root).map_err(|source| StoreError::Create {
            path: paths.root.clone(),
            source,
        })?;
        Ok(Self {
            paths,
            topic_ids: HashMap::new(),
            docs: HashMap::new(),
            pending: HashMap::new(),
            next_doc_id: 0,
            next_topic_id: 0,
        })
    }

    /// Remove any persisted store at `path`. Doing it again is a no-op.
    pub fn flush<P: AsRef<Path>>(path: P) -> Result<()> {
        match fs::remove_dir_all(path.as_ref()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a document and one posting per topic assignment. No uniqueness
    /// check on `uri`: indexing the same reference twice stores it twice.
    pub fn add_document(&mut self, uri: String, title: String, topics: TopicVector) -> DocId {
        let doc_id = self.next_doc_id;
        self.next_doc_id += 1;
        for assignment in &topics {
            let topic_id = match self.topic_ids.get(&assignment.id) {
                Some(&id) => id,
                None => {
                    let id = self.next_topic_id;
                    self.next_topic_id += 1;
                    self.topic_ids.insert(assignment.id.clone(), id);
                    id
                }
            };
            self.pending
                .entry(topic_id)
                .or_default()
                .push(Posting { doc_id, score: assignment.score });
        }
        self.docs.insert(doc_id, DocRecord { uri, title, topics });
        doc_id
    }

    /// Write the batch out. Additions become visible to lookups from here on.
    pub fn commit(&mut self) -> Result<()> {
        for (topic_id, postings) in self.pending.iter_mut() {
            postings.sort_by_key(|p| p.doc_id);
            save_postings_for_topic(&self.paths, *topic_id, postings)?;
        }
        save_topic_map(&self.paths, &self.topic_ids)?;
        save_docs(&self.paths, &self.docs)?;
        let meta = MetaFile {
            num_docs: self.next_doc_id,
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "".into()),
            version: STORE_VERSION,
        };
        save_meta(&self.paths, &meta)?;
        self.pending.clear();
        tracing::info!(num_docs = meta.num_docs, topics = self.topic_ids.len(), "store committed");
        Ok(())
    }

    /// All committed documents carrying at least one of `topic_ids` (logical
    /// OR), in ascending doc id order. Raw set lookup; ranking happens in
    /// the recommender.
    pub fn lookup_by_topics(&self, topic_ids: &HashSet<String>) -> Result<Vec<MatchedDocument>> {
        let mut hits: BTreeSet<DocId> = BTreeSet::new();
        for external in topic_ids {
            if let Some(&topic_id) = self.topic_ids.get(external) {
                let postings = match load_postings_for_topic(&self.paths, topic_id) {
                    Ok(p) => p,
                    // Topic known but no posting file yet: only pending,
                    // uncommitted additions reference it.
                    Err(StoreError::Io(ref e)) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(e),
                };
                for posting in postings {
                    hits.insert(posting.doc_id);
                }
            }
        }

        let mut out = Vec::with_capacity(hits.len());
        for doc_id in hits {
            if let Some(doc) = self.docs.get(&doc_id) {
                let matched = doc
                    .topics
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| topic_ids.contains(&t.id))
                    .map(|(i, _)| i)
                    .collect();
                out.push(MatchedDocument {
                    uri: doc.uri.clone(),
                    title: doc.title.clone(),
                    topics: doc.topics.clone(),
                    matched,
                });
            }
        }
        Ok(out)
    }

    pub fn num_docs(&self) -> u32 {
        self.next_doc_id
    }
}
