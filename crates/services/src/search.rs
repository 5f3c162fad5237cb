use std::sync::Arc;

use docflow_documents::Document;
use docflow_storage::DocumentRepository;

pub struct SearchService {
    repo: Arc<dyn DocumentRepository>,
}

impl SearchService {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    pub fn find(&self, query: &str) -> Vec<Document> {
        self.repo.search(query)
    }
}
