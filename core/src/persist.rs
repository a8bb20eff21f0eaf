use crate::error::Result;
use crate::index::{DocId, DocRecord, Posting, TopicId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

#[derive(Debug)]
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub(crate) fn topics(&self) -> PathBuf { self.root.join("topics.bin") }
    pub(crate) fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    pub(crate) fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    fn postings_dir(&self) -> PathBuf { self.root.join("postings") }
}

pub fn save_topic_map(paths: &IndexPaths, map: &HashMap<String, TopicId>) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.topics())?;
    let bytes = bincode::serialize(map)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_topic_map(paths: &IndexPaths) -> Result<HashMap<String, TopicId>> {
    let mut f = File::open(paths.topics())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let map = bincode::deserialize(&buf)?;
    Ok(map)
}

pub fn save_docs(paths: &IndexPaths, docs: &HashMap<DocId, DocRecord>) -> Result<()> {
    let mut f = File::create(paths.docs())?;
    let bytes = bincode::serialize(docs)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_docs(paths: &IndexPaths) -> Result<HashMap<DocId, DocRecord>> {
    let mut f = File::open(paths.docs())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let docs = bincode::deserialize(&buf)?;
    Ok(docs)
}

pub fn save_postings_for_topic(paths: &IndexPaths, topic_id: TopicId, postings: &[Posting]) -> Result<()> {
    let dir = paths.postings_dir();
    create_dir_all(&dir)?;
    let file = dir.join(format!("{topic_id:08}.postings.bin"));
    let mut f = File::create(file)?;
    let bytes = bincode::serialize(postings)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_postings_for_topic(paths: &IndexPaths, topic_id: TopicId) -> Result<Vec<Posting>> {
    let file = paths.postings_dir().join(format!("{topic_id:08}.postings.bin"));
    let mut f = File::open(file)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let postings = bincode::deserialize(&buf)?;
    Ok(postings)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Load the structures required to answer lookups: topic map, document
/// table, meta. Postings stay on disk and are read per topic.
pub fn load_store_header(paths: &IndexPaths) -> Result<(HashMap<String, TopicId>, HashMap<DocId, DocRecord>, MetaFile)> {
    let topic_map = load_topic_map(paths)?;
    let docs = load_docs(paths)?;
    let meta = load_meta(paths)?;
    Ok((topic_map, docs, meta))
}
