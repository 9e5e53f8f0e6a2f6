use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{
    Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, TantivyError, Term,
    doc,
};

use super::query::KeywordQueryBuilder;
use super::schema::{self, IndexFields};
use crate::domain::{DocId, DocumentType, SearchQuery, SearchResult};
use crate::error::{FolioError, Result};

pub const DEFAULT_WRITER_MEMORY: usize = 50_000_000;
/// Smallest heap tantivy accepts for one indexing thread.
pub const MIN_WRITER_MEMORY: usize = 15_000_000;

pub struct IndexEngine {
    fields: IndexFields,
    keywords: KeywordQueryBuilder,
    reader: IndexReader,
    writer: Mutex<Option<IndexWriter>>,
    location: String,
}

impl IndexEngine {
    pub fn in_memory(writer_memory: usize) -> Result<Self> {
        let index = Index::create_in_ram(schema::build());
        Self::from_index(index, writer_memory, "in-memory".to_string())
    }

    /// Opens (or creates) an index under `path`. Fails with
    /// [`FolioError::IndexLocked`] if another engine already owns it.
    pub fn open_in_dir(path: &Path, writer_memory: usize) -> Result<Self> {
        std::fs::create_dir_all(path)?;
        let directory = MmapDirectory::open(path).map_err(TantivyError::from)?;
        let index = Index::open_or_create(directory, schema::build())?;
        Self::from_index(index, writer_memory, path.display().to_string())
    }

    fn from_index(index: Index, writer_memory: usize, location: String) -> Result<Self> {
        let fields = IndexFields::from_schema(&index.schema())?;

        let writer: IndexWriter = index
            .writer_with_num_threads(1, writer_memory.max(MIN_WRITER_MEMORY))
            .map_err(|e| match e {
                TantivyError::LockFailure(..) => FolioError::IndexLocked(location.clone()),
                other => FolioError::Index(other),
            })?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        let keywords = KeywordQueryBuilder::new(&index, fields.content);

        tracing::info!(location = %location, "index engine opened");

        Ok(Self {
            fields,
            keywords,
            reader,
            writer: Mutex::new(Some(writer)),
            location,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Replaces any entry for `document_id` and commits. Searches started after
    /// this returns observe the new entry.
    pub fn upsert(
        &self,
        document_id: &DocId,
        filename: &str,
        doc_type: DocumentType,
        content: &str,
    ) -> Result<()> {
        if content.is_empty() {
            tracing::warn!(
                document_id = %document_id,
                filename,
                "indexing document without extracted text"
            );
        }

        let mut guard = self.lock_writer();
        let writer = guard.as_mut().ok_or(FolioError::IndexClosed)?;

        writer.delete_term(self.id_term(document_id));
        writer.add_document(doc!(
            self.fields.document_id => document_id.as_str(),
            self.fields.filename => filename,
            self.fields.content => content,
            self.fields.doc_type => doc_type.as_str(),
        ))?;
        Self::commit(writer, document_id)?;
        self.reader.reload()?;

        tracing::debug!(document_id = %document_id, filename, doc_type = %doc_type, "document indexed");
        Ok(())
    }

    pub fn remove(&self, document_id: &DocId) -> Result<()> {
        let mut guard = self.lock_writer();
        let writer = guard.as_mut().ok_or(FolioError::IndexClosed)?;

        writer.delete_term(self.id_term(document_id));
        Self::commit(writer, document_id)?;
        self.reader.reload()?;

        tracing::debug!(document_id = %document_id, "document removed from index");
        Ok(())
    }

    fn commit(writer: &mut IndexWriter, document_id: &DocId) -> Result<()> {
        if let Err(e) = writer.commit() {
            tracing::error!(document_id = %document_id, error = %e, "index commit failed, rolling back");
            if let Err(rollback) = writer.rollback() {
                tracing::error!(error = %rollback, "index rollback failed");
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// A point-in-time view; later commits are not visible through it.
    pub fn snapshot(&self) -> IndexSnapshot<'_> {
        IndexSnapshot {
            engine: self,
            searcher: self.reader.searcher(),
        }
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        self.snapshot().search(query)
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Releases the writer. Later mutations fail with [`FolioError::IndexClosed`];
    /// searches keep working against the last commit.
    pub fn shutdown(&self) -> Result<()> {
        let writer = self.lock_writer().take();
        if let Some(writer) = writer {
            writer.wait_merging_threads()?;
            tracing::info!(location = %self.location, "index writer released");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.lock_writer().is_none()
    }

    fn lock_writer(&self) -> MutexGuard<'_, Option<IndexWriter>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn id_term(&self, document_id: &DocId) -> Term {
        Term::from_field_text(self.fields.document_id, document_id.as_str())
    }
}

fn stored_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string()
}

impl Drop for IndexEngine {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::error!(location = %self.location, error = %e, "failed to release index writer");
        }
    }
}

pub struct IndexSnapshot<'a> {
    engine: &'a IndexEngine,
    searcher: Searcher,
}

impl IndexSnapshot<'_> {
    pub fn num_docs(&self) -> u64 {
        self.searcher.num_docs()
    }

    /// Results sorted by descending score. No criteria, an empty index, or
    /// keywords with nothing searchable all yield an empty list.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        if !query.has_criteria() || self.searcher.num_docs() == 0 {
            return Ok(Vec::new());
        }

        let engine = self.engine;
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(2);

        if let Some(keywords) = query.keywords() {
            let Some(keyword_query) = engine.keywords.build(keywords) else {
                return Ok(Vec::new());
            };
            clauses.push((Occur::Must, keyword_query));
        }

        if let Some(doc_type) = query.doc_type_filter() {
            let term = Term::from_field_text(engine.fields.doc_type, &doc_type);
            clauses.push((
                Occur::Must,
                Box::new(TermQuery::new(term, IndexRecordOption::Basic)),
            ));
        }

        let combined = BooleanQuery::new(clauses);
        let top_docs = self
            .searcher
            .search(&combined, &TopDocs::with_limit(query.effective_limit()))?;

        top_docs
            .into_iter()
            .map(|(score, address)| {
                let doc: TantivyDocument = self.searcher.doc(address)?;
                Ok(SearchResult {
                    document_id: DocId::from_string(stored_text(&doc, engine.fields.document_id)),
                    file_name: stored_text(&doc, engine.fields.filename),
                    doc_type: stored_text(&doc, engine.fields.doc_type),
                    score,
                })
            })
            .collect()
    }
}
