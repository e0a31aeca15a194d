use std::collections::HashMap;

use crate::error::IngestError;
use crate::records::CorpusDocument;

/// In-memory lookup from `doc_id` to its document.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    documents: HashMap<i64, CorpusDocument>,
}

impl DocumentIndex {
    pub fn from_documents(documents: Vec<CorpusDocument>) -> Result<Self, IngestError> {
        let mut map = HashMap::with_capacity(documents.len());
        for doc in documents {
            let doc_id = doc.doc_id;
            if map.insert(doc_id, doc).is_some() {
                return Err(IngestError::DuplicateDocument { doc_id });
            }
        }
        Ok(Self { documents: map })
    }

    /// A miss is always an error: it means the claims reference a corpus
    /// this index was not built from.
    pub fn lookup(&self, doc_id: i64) -> Result<&CorpusDocument, IngestError> {
        self.documents
            .get(&doc_id)
            .ok_or(IngestError::DocumentNotFound { doc_id })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
