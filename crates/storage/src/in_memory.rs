use std::collections::HashMap;
use std::sync::RwLock;

use docflow_core::{DomainError, DomainResult};
use docflow_documents::{Document, DocumentAttachment};

use crate::quota::QuotaManager;
use crate::repository::DocumentRepository;

/// In-memory document store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    docs: RwLock<HashMap<String, Document>>,
    attachments: RwLock<HashMap<String, DocumentAttachment>>,
    quota: QuotaManager,
}

impl InMemoryDocumentStore {
    pub fn new(quota: QuotaManager) -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            attachments: RwLock::new(HashMap::new()),
            quota,
        }
    }

    pub fn quota(&self) -> &QuotaManager {
        &self.quota
    }

    /// Persist attachment bytes accounting against the quota.
    ///
    /// Quota capacity is allocated before the attachment is accepted; an
    /// over-quota request fails with `QuotaExceeded` and leaves the
    /// attachment registry unchanged.
    pub fn store_attachment(
        &self,
        number: &str,
        attachment: DocumentAttachment,
    ) -> DomainResult<()> {
        self.quota.allocate(attachment.size)?;
        let mut attachments = self
            .attachments
            .write()
            .map_err(|_| DomainError::conflict("attachment lock poisoned"))?;
        attachments.insert(format!("{number}:{}", attachment.filename), attachment);
        Ok(())
    }

    pub fn attachment(&self, number: &str, filename: &str) -> Option<DocumentAttachment> {
        self.attachments
            .read()
            .ok()
            .and_then(|attachments| attachments.get(&format!("{number}:{filename}")).cloned())
    }
}

impl DocumentRepository for InMemoryDocumentStore {
    fn save(&self, doc: &Document) -> DomainResult<()> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| DomainError::conflict("store lock poisoned"))?;
        docs.insert(doc.number().to_string(), doc.clone());
        Ok(())
    }

    fn get(&self, number: &str) -> DomainResult<Document> {
        let docs = self
            .docs
            .read()
            .map_err(|_| DomainError::conflict("store lock poisoned"))?;
        docs.get(number)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("document '{number}'")))
    }

    fn exists(&self, number: &str) -> bool {
        self.docs
            .read()
            .map(|docs| docs.contains_key(number))
            .unwrap_or(false)
    }

    fn search(&self, query: &str) -> Vec<Document> {
        let needle = query.to_lowercase();
        self.docs
            .read()
            .map(|docs| {
                docs.values()
                    .filter(|d| {
                        d.title().to_lowercase().contains(&needle)
                            || d.number().to_lowercase().contains(&needle)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docflow_core::{DocumentId, UserId};
    use docflow_documents::DocumentKind;

    fn store() -> InMemoryDocumentStore {
        InMemoryDocumentStore::new(QuotaManager::new(1_000))
    }

    fn doc(number: &str, title: &str) -> Document {
        Document::new(
            DocumentId::new(),
            number,
            title,
            UserId::new(),
            DocumentKind::Generic,
            Utc::now(),
        )
    }

    fn attachment(filename: &str, size: u64) -> DocumentAttachment {
        DocumentAttachment {
            filename: filename.into(),
            content_type: "application/pdf".into(),
            size,
            checksum: "d41d8cd9".into(),
        }
    }

    #[test]
    fn save_upserts_and_get_returns_the_latest_copy() {
        let store = store();
        store.save(&doc("DOC-1", "Draft")).unwrap();
        store.save(&doc("DOC-1", "Final")).unwrap();
        assert_eq!(store.get("DOC-1").unwrap().title(), "Final");
    }

    #[test]
    fn get_unknown_number_is_not_found() {
        let store = store();
        assert!(matches!(
            store.get("DOC-404").unwrap_err(),
            DomainError::NotFound(_)
        ));
        assert!(!store.exists("DOC-404"));
    }

    #[test]
    fn search_matches_title_or_number_case_insensitively() {
        let store = store();
        store.save(&doc("DOC-1", "Supply contract")).unwrap();
        store.save(&doc("DOC-2", "Invoice April")).unwrap();
        store.save(&doc("INV-3", "Misc")).unwrap();

        let hits = store.search("CONTRACT");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number(), "DOC-1");

        let mut hits: Vec<String> = store
            .search("inv")
            .into_iter()
            .map(|d| d.number().to_string())
            .collect();
        hits.sort();
        assert_eq!(hits, vec!["DOC-2", "INV-3"]);

        assert!(store.search("nothing").is_empty());
    }

    #[test]
    fn over_quota_attachment_is_rejected_without_side_effects() {
        let store = store();
        store
            .store_attachment("DOC-1", attachment("scan.pdf", 900))
            .unwrap();
        assert!(store.attachment("DOC-1", "scan.pdf").is_some());

        let err = store
            .store_attachment("DOC-1", attachment("big.pdf", 200))
            .unwrap_err();
        assert!(matches!(err, DomainError::QuotaExceeded(_)));
        assert!(store.attachment("DOC-1", "big.pdf").is_none());
        assert_eq!(store.quota().used_bytes(), 900);
    }
}
