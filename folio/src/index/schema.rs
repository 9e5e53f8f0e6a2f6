use tantivy::schema::{Field, STORED, STRING, Schema, TEXT};

use crate::error::Result;

pub(super) const DOCUMENT_ID: &str = "document_id";
pub(super) const FILENAME: &str = "filename";
pub(super) const CONTENT: &str = "content";
pub(super) const DOC_TYPE: &str = "doc_type";

#[derive(Debug, Clone, Copy)]
pub(super) struct IndexFields {
    pub document_id: Field,
    pub filename: Field,
    pub content: Field,
    pub doc_type: Field,
}

impl IndexFields {
    /// Resolves the fields of an existing schema, failing if one is missing.
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        Ok(Self {
            document_id: schema.get_field(DOCUMENT_ID)?,
            filename: schema.get_field(FILENAME)?,
            content: schema.get_field(CONTENT)?,
            doc_type: schema.get_field(DOC_TYPE)?,
        })
    }
}

/// `document_id` and `doc_type` are exact-match; `content` is indexed only.
pub(super) fn build() -> Schema {
    let mut builder = Schema::builder();
    builder.add_text_field(DOCUMENT_ID, STRING | STORED);
    builder.add_text_field(FILENAME, TEXT | STORED);
    builder.add_text_field(CONTENT, TEXT);
    builder.add_text_field(DOC_TYPE, STRING | STORED);
    builder.build()
}
